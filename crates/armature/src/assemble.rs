use crate::assembler::Assembler;
use crate::error::{AssembleError, AssembleResult};
use crate::init::Init;
use crate::registry::{Instance, InstanceId, Registry};
use crate::value::{Props, Value};

/// How an initializer key that matches neither the assembler nor the
/// target is handled.
///
/// Configured per [`Registry`] via [`Registry::with_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Fail with [`AssembleError::PropertyMismatch`]. A failed
    /// construction leaves no instance and no association behind.
    #[default]
    Strict,
    /// Emit a warning and keep the value on the instance as overflow.
    Lenient,
}

impl Registry {
    /// Assembles a new instance: acquires a target, binds it, and applies
    /// the initializer.
    ///
    /// The initializer is first normalized for the assembler (see
    /// [`Init::normalize`]). An entry under the assembler's reserved
    /// [`target_property`](Assembler::target_property) key supplies the
    /// target explicitly and must hold a [`Value::Target`] whose record
    /// satisfies the assembler's interface; otherwise a fresh target comes
    /// from the [`Assembler::create`] hook. The target and the new
    /// instance are then associated, overwriting any prior association for
    /// that target.
    ///
    /// Property application runs last: the value property first (when
    /// declared and present), then the remaining admitted entries in
    /// insertion order, each routed per [`set_property`](Self::set_property).
    ///
    /// # Errors
    /// [`AssembleError::TypeMismatch`] if an explicit target fails the
    /// interface check; nothing is applied or associated in that case.
    /// [`AssembleError::PropertyMismatch`] under the strict policy for an
    /// unroutable key; the instance and its association are discarded,
    /// while target mutations already applied remain (targets are
    /// host-owned and never destroyed here).
    pub fn assemble(
        &mut self,
        assembler: &'static dyn Assembler,
        init: impl Into<Init>,
    ) -> AssembleResult<InstanceId> {
        let mut props = init.into().normalize(assembler.value_property());

        // Target acquisition: an explicit entry under the reserved key
        // wins over the factory. The entry is consumed either way.
        let target = match props.shift_remove(assembler.target_property()) {
            Some(Value::Target(id)) => {
                let supplied = self.record(id).interface();
                let expected = assembler.interface();
                if !expected.accepts(supplied) {
                    return Err(AssembleError::type_mismatch(
                        assembler.name(),
                        expected.name(),
                        supplied.name(),
                    ));
                }
                id
            }
            Some(Value::Undefined) | None => assembler.create(self, &props),
            Some(other) => {
                return Err(AssembleError::type_mismatch(
                    assembler.name(),
                    assembler.interface().name(),
                    other.kind_name(),
                ));
            }
        };

        let instance = self.insert_instance(Instance::new(assembler, target));
        self.bind(target, instance);

        match self.apply(instance, props) {
            Ok(()) => Ok(instance),
            Err(err) => {
                self.unbind(target, instance);
                self.discard_instance(instance);
                Err(err)
            }
        }
    }

    /// Re-runs property application for an already-assembled instance
    /// against its bound target.
    ///
    /// The binding is settled, so an entry under the reserved target key
    /// is ignored. Unlike construction, a strict mismatch does not discard
    /// the instance; entries applied before the offending one remain.
    ///
    /// # Errors
    /// [`AssembleError::PropertyMismatch`] under the strict policy.
    ///
    /// # Panics
    /// Panics if `instance` was not issued by this registry.
    pub fn initialize(&mut self, instance: InstanceId, init: impl Into<Init>) -> AssembleResult<()> {
        let assembler = self.instance(instance).assembler();
        let mut props = init.into().normalize(assembler.value_property());
        props.shift_remove(assembler.target_property());
        self.apply(instance, props)
    }

    /// Applies normalized entries: value property first, then the rest in
    /// insertion order, skipping non-admitted keys.
    fn apply(&mut self, instance: InstanceId, mut props: Props) -> AssembleResult<()> {
        let assembler = self.instance(instance).assembler();

        if let Some(name) = assembler.value_property() {
            if let Some(value) = props.shift_remove(name) {
                self.set_property(instance, name, value)?;
            }
        }

        for (key, value) in props {
            if !assembler.admits(&key) {
                continue;
            }
            self.set_property(instance, &key, value)?;
        }
        Ok(())
    }

    /// Routes one property write through the dispatch rule.
    ///
    /// [`Value::Undefined`] counts as absent and is skipped outright, so
    /// sparse initializers never clobber existing state. Otherwise, in
    /// order: a key the assembler [`claims`](Assembler::claims) lands on
    /// the instance; a key it [`delegates`](Assembler::delegates) lands on
    /// the target; a key the target's interface declares, or the target
    /// already carries, lands on the target; anything else is a mismatch
    /// handled per the registry's [`MismatchPolicy`].
    ///
    /// # Errors
    /// [`AssembleError::PropertyMismatch`] under the strict policy.
    ///
    /// # Panics
    /// Panics if `instance` was not issued by this registry.
    pub fn set_property(
        &mut self,
        instance: InstanceId,
        key: &str,
        value: impl Into<Value>,
    ) -> AssembleResult<()> {
        let value = value.into();
        if value.is_undefined() {
            return Ok(());
        }

        let (assembler, target) = {
            let cell = self.instance(instance);
            (cell.assembler(), cell.target())
        };

        if assembler.claims().contains(&key) {
            self.instance_mut(instance).props_mut().insert(key.to_owned(), value);
            return Ok(());
        }
        if assembler.delegates().contains(&key) {
            self.record_mut(target).set(key, value);
            return Ok(());
        }

        // Fallback: the target answers for keys its interface declares or
        // that it already carries.
        let record = self.record(target);
        if record.interface().declares(key) || record.has(key) {
            self.record_mut(target).set(key, value);
            return Ok(());
        }

        match self.policy() {
            MismatchPolicy::Strict => Err(AssembleError::property_mismatch(assembler.name(), key)),
            MismatchPolicy::Lenient => {
                tracing::warn!(
                    assembler = assembler.name(),
                    property = key,
                    "property matches neither the assembler nor the target, keeping it on the instance"
                );
                self.instance_mut(instance).props_mut().insert(key.to_owned(), value);
                Ok(())
            }
        }
    }

    /// Reads a property through the instance.
    ///
    /// A [`delegated`](Assembler::delegates) key reads from the bound
    /// target (with the record's declared-key fallback); any other key
    /// reads from the instance's own properties, which hold claimed keys
    /// and lenient overflow. Returns `None` for keys never written.
    ///
    /// # Panics
    /// Panics if `instance` was not issued by this registry.
    #[must_use]
    pub fn property(&self, instance: InstanceId, key: &str) -> Option<&Value> {
        let cell = self.instance(instance);
        if cell.assembler().delegates().contains(&key) {
            return self.record(cell.target()).get(key);
        }
        cell.props().get(key)
    }
}
