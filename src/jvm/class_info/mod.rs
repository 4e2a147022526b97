//! Lazily populated class descriptors and the hierarchies between them
//!
//! A [`ClassInfo`] describes a class by its name, flags and direct supertypes. Those are enough to
//! walk the type hierarchy, so the body of the class is only loaded when someone asks for it.
//!
//! Descriptors are handed out by a [`ClassInfoProvider`], which caches them for the lifetime of
//! its [`ClassInfoArenas`] and loads classes through an injected [`ClassProvider`]:
//!
//! ```
//! use commons_asm::jvm::class_info::{ClassInfoArenas, ClassInfoProvider, MapClassProvider};
//! use commons_asm::jvm::model::ClassNode;
//! use commons_asm::jvm::{BinaryName, ClassAccessFlags, Version};
//!
//! let name = BinaryName::from_dotted("me.Example").unwrap();
//! let classes: MapClassProvider = vec![
//!     ClassNode::empty(name.clone()),
//!     ClassNode::new(Version::JAVA8, ClassAccessFlags::PUBLIC, BinaryName::OBJECT, None),
//! ]
//! .into_iter()
//! .collect();
//!
//! let arenas = ClassInfoArenas::new();
//! let provider = ClassInfoProvider::new(&arenas, &classes);
//! let supertypes = provider.of(&name).unwrap().recursive_resolve_supertypes(false).unwrap();
//! assert_eq!(supertypes.len(), 1);
//! assert_eq!(supertypes[0].name, BinaryName::OBJECT);
//! ```

mod info;
mod provider;

pub use info::*;
pub use provider::*;
