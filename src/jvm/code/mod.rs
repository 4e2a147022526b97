//! Method bodies as editable instruction sequences
//!
//! ### Structure
//!
//! A method body is an [`InsnList`]: an ordered sequence of [`Instruction`]s, where order is
//! execution order. Straight-line instructions sit next to [`BranchInstruction`]s (wrapped in
//! [`Instruction::Branch`]), and jump targets are [`Label`]s placed into the sequence with
//! [`Instruction::Label`].
//!
//! Labels are identities: a branch refers to _that_ label, not to a position or a number. This is
//! what makes it safe to insert or remove instructions without fixing up offsets, and is also
//! why copying a body needs care (see [`crate::jvm::cloner`]).
//!
//! ### Utilities
//!
//! [`code_utils`] holds the free-standing slot and stack computations, and [`InsnListExts`]
//! exposes the same operations as appending helpers on an [`InsnList`].
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se18/html/jvms-6.html#jvms-6.5

pub mod code_utils;
mod insn_list;
mod insn_list_exts;
mod instructions;
mod label;

pub use insn_list::*;
pub use insn_list_exts::*;
pub use instructions::*;
pub use label::*;
