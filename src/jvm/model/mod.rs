//! Tree representations of classes
//!
//! This is the in-memory product of reading a class file, and the input of writing one. Every
//! part is plain owned data and can be edited freely:
//!
//!   - __Class__ is represented using [`ClassNode`]
//!   - __Method__ is represented using [`MethodNode`], whose body is an
//!     [`InsnList`](crate::jvm::code::InsnList)
//!   - __Field__ is represented using [`FieldNode`]
//!
//! Annotations and extension attributes hang off of all three.

mod annotation;
mod attribute;
mod class;
mod field;
mod method;

pub use annotation::*;
pub use attribute::*;
pub use class::*;
pub use field::*;
pub use method::*;
