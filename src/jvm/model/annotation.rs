use crate::jvm::code::Label;
use crate::jvm::{BinaryName, FieldType};

/// Annotation on a class, member, parameter or type use
///
/// [Format](https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.16)
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Type of the annotation interface
    pub descriptor: FieldType<BinaryName>,

    /// Element names and values, in declaration order
    pub values: Vec<(String, AnnotationValue)>,
}

/// Value of an annotation element
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Enum {
        descriptor: FieldType<BinaryName>,
        constant: String,
    },

    /// Class literal (`None` is `void.class`)
    Class(Option<FieldType<BinaryName>>),
    Annotation(Annotation),
    Array(Vec<AnnotationValue>),
}

/// Annotation on a type use
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAnnotation {
    /// Packed `type_ref` (target type and target info)
    pub type_ref: u32,

    /// Path to the annotated part of the type (`None` when the whole type is annotated)
    pub type_path: Option<TypePath>,
    pub annotation: Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePath(pub Vec<TypePathStep>);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypePathStep {
    ArrayElement,
    InnerType,
    WildcardBound,
    TypeArgument(u8),
}

/// Runtime visible and invisible annotations of one element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    pub visible: Vec<Annotation>,
    pub invisible: Vec<Annotation>,
}

/// Runtime visible and invisible type annotations of one element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeAnnotations {
    pub visible: Vec<TypeAnnotation>,
    pub invisible: Vec<TypeAnnotation>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.invisible.is_empty()
    }
}

impl TypeAnnotations {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.invisible.is_empty()
    }
}

/// Type annotation on a local variable, which is live over label ranges of the method body
///
/// Not `Clone`: copying one into another method body has to remap the labels.
#[derive(Debug, PartialEq)]
pub struct LocalVariableAnnotation {
    pub visible: bool,
    pub type_annotation: TypeAnnotation,
    pub ranges: Vec<LocalRange>,
}

/// Range of code over which a local variable slot holds a particular variable
#[derive(Debug, PartialEq, Eq)]
pub struct LocalRange {
    pub start: Label,
    pub end: Label,
    pub index: u16,
}
