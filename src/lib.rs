//! Editable in-memory JVM class trees
//!
//! The [`jvm`] module holds the class model (classes, fields, methods, instruction lists with
//! identity-carrying labels) along with the algorithms that work over it:
//!
//!   - [`jvm::cloner`] deep copies classes, members and instruction lists
//!   - [`jvm::code::code_utils`] computes free local slots, stack swaps, integer pushes and
//!     primitive boxing sequences
//!   - [`jvm::class_info`] lazily resolves class descriptors and their super types
//!
//! Reading and writing class files is left to an external codec.

pub mod jvm;
mod util;
