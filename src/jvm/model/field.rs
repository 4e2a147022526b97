use super::{Annotations, Attribute, TypeAnnotations};
use crate::jvm::code::Constant;
use crate::jvm::{BinaryName, FieldAccessFlags, FieldType, UnqualifiedName};

/// In-memory representation of a field
#[derive(Debug, PartialEq)]
pub struct FieldNode {
    pub access_flags: FieldAccessFlags,
    pub name: UnqualifiedName,
    pub descriptor: FieldType<BinaryName>,

    /// Generic field signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,

    /// Constant field value (only meaningful on `static` fields)
    pub constant_value: Option<Constant>,

    pub annotations: Annotations,
    pub type_annotations: TypeAnnotations,
    pub attributes: Vec<Attribute>,
}

impl FieldNode {
    /// Create a new field with no signature, value, annotations or attributes
    pub fn new(
        access_flags: FieldAccessFlags,
        name: UnqualifiedName,
        descriptor: FieldType<BinaryName>,
    ) -> FieldNode {
        FieldNode {
            access_flags,
            name,
            descriptor,
            generic_signature: None,
            constant_value: None,
            annotations: Annotations::default(),
            type_annotations: TypeAnnotations::default(),
            attributes: vec![],
        }
    }
}
