use std::fmt;

/// Result alias for assembly operations.
pub type AssembleResult<T> = Result<T, AssembleError>;

/// Error raised while assembling or initializing an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// An initializer key was neither claimed by the assembler nor known to
    /// the target. Raised only under [`MismatchPolicy::Strict`].
    ///
    /// [`MismatchPolicy::Strict`]: crate::MismatchPolicy::Strict
    PropertyMismatch {
        /// Name of the assembler type that rejected the key.
        assembler: &'static str,
        /// The offending initializer key.
        property: String,
    },
    /// An explicitly supplied target did not satisfy the assembler's
    /// declared interface. Always raised, before any property is applied.
    TypeMismatch {
        /// Name of the assembler type that rejected the target.
        assembler: &'static str,
        /// Name of the interface the assembler requires.
        expected: &'static str,
        /// Type name of what was supplied instead.
        found: &'static str,
    },
}

impl AssembleError {
    /// Builds a [`Self::PropertyMismatch`] for the given key.
    #[must_use]
    pub fn property_mismatch(assembler: &'static str, property: impl Into<String>) -> Self {
        Self::PropertyMismatch {
            assembler,
            property: property.into(),
        }
    }

    /// Builds a [`Self::TypeMismatch`] for an unacceptable target.
    #[must_use]
    pub fn type_mismatch(assembler: &'static str, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            assembler,
            expected,
            found,
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PropertyMismatch { assembler, property } => {
                write!(f, "the property '{property}' is not found on the '{assembler}' instance")
            }
            Self::TypeMismatch {
                assembler,
                expected,
                found,
            } => {
                write!(f, "'{assembler}' expects a target of type '{expected}', got '{found}'")
            }
        }
    }
}

impl std::error::Error for AssembleError {}
