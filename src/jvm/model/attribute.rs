use crate::jvm::ModuleResolutionFlags;
use std::sync::Arc;

/// Extension attribute attached to a class, field or method
///
/// Only the module attributes are understood. Everything else is kept as an opaque payload,
/// which copies of the owning node share instead of duplicating.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// Hashes of the modules a module depends on
    ///
    /// `modules` and `hashes` are parallel lists.
    ModuleHashes {
        algorithm: String,
        modules: Vec<String>,
        hashes: Vec<Vec<u8>>,
    },

    ModuleResolution(ModuleResolutionFlags),

    /// Operating system and architecture a module is restricted to
    ModuleTarget { platform: String },

    Opaque(Arc<OpaqueAttribute>),
}

/// Attribute which is carried along but not interpreted
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OpaqueAttribute {
    pub name: String,
    pub info: Vec<u8>,
}

impl Attribute {
    /// Name of the attribute, as it appears in the class file
    pub fn name(&self) -> &str {
        match self {
            Attribute::ModuleHashes { .. } => "ModuleHashes",
            Attribute::ModuleResolution(_) => "ModuleResolution",
            Attribute::ModuleTarget { .. } => "ModuleTarget",
            Attribute::Opaque(opaque) => &opaque.name,
        }
    }

    /// Wrap an attribute which isn't understood
    pub fn opaque(name: impl Into<String>, info: Vec<u8>) -> Attribute {
        Attribute::Opaque(Arc::new(OpaqueAttribute {
            name: name.into(),
            info,
        }))
    }
}
