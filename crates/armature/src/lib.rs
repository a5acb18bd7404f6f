#![doc = include_str!("../../../README.md")]

mod assemble;
mod assembler;
mod error;
mod init;
mod interface;
mod record;
mod registry;
mod value;

pub use crate::{
    assemble::MismatchPolicy,
    assembler::{Assembler, PLAIN, Plain, TARGET_PROPERTY},
    error::{AssembleError, AssembleResult},
    init::Init,
    interface::{Interface, RECORD},
    record::Record,
    registry::{Entity, Instance, InstanceId, Registry, TargetId},
    value::{Props, Value, ValueKind},
};
