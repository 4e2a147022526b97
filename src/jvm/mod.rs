//! Manipulate JVM classes
//!
//! ### Simple example
//!
//! Consider specializing a copy of a method without disturbing the original:
//!
//! ```
//! use commons_asm::jvm::cloner;
//! use commons_asm::jvm::code::{code_utils, BranchInstruction, Instruction, InsnListExts, Label, OrdComparison};
//! use commons_asm::jvm::model::MethodNode;
//! use commons_asm::jvm::*;
//!
//! // `static int clamp(int)`: returns its argument, or 0 when negative
//! let mut clamp = MethodNode::new(
//!     MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
//!     UnqualifiedName::from_string(String::from("clamp")).unwrap(),
//!     MethodDescriptor::parse("(I)I").unwrap(),
//! );
//! let negative = Label::fresh();
//! clamp.instructions.add(Instruction::ILoad(0));
//! clamp.instructions.add(Instruction::Branch(BranchInstruction::If(OrdComparison::LT, negative)));
//! clamp.instructions.add(Instruction::ILoad(0));
//! clamp.instructions.add(Instruction::Branch(BranchInstruction::IReturn));
//! clamp.instructions.add(Instruction::Label(negative));
//! clamp.instructions.push_int(0);
//! clamp.instructions.add(Instruction::Branch(BranchInstruction::IReturn));
//!
//! // The copy branches to its own label, so it can be edited independently
//! let mut copy = cloner::clone_method(&clamp);
//! assert!(!copy.instructions.contains_label(negative));
//! copy.instructions.insert(3, Instruction::IAdd);
//! copy.instructions.insert(3, code_utils::int_push(1000));
//!
//! assert_eq!(code_utils::free_local_index(&copy), 1);
//! assert!(copy.check_structure().is_ok());
//! assert_eq!(clamp.instructions.len(), 7);
//! ```

mod access_flags;
pub mod class_info;
pub mod cloner;
pub mod code;
mod descriptors;
mod errors;
pub mod model;
mod names;
mod version;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
pub use version::*;

pub use crate::util::Width;
