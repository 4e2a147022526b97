use super::{Annotations, Attribute, FieldNode, MethodNode, TypeAnnotations};
use crate::jvm::code::{BranchInstruction, Instruction, InvokeType, MethodRef};
use crate::jvm::{
    BinaryName, ClassAccessFlags, FieldType, MethodAccessFlags, MethodDescriptor, Name,
    UnqualifiedName, Version,
};

/// In-memory representation of a class
#[derive(Debug, PartialEq)]
pub struct ClassNode {
    pub version: Version,
    pub access_flags: ClassAccessFlags,
    pub name: BinaryName,

    /// Generic class signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,

    /// Super class (only `java/lang/Object` has none)
    pub superclass: Option<BinaryName>,

    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<BinaryName>,

    /// Name of the source file the class was compiled from
    pub source_file: Option<String>,

    pub fields: Vec<FieldNode>,
    pub methods: Vec<MethodNode>,
    pub annotations: Annotations,
    pub type_annotations: TypeAnnotations,
    pub attributes: Vec<Attribute>,
}

impl ClassNode {
    /// Create a class with no members
    pub fn new(
        version: Version,
        access_flags: ClassAccessFlags,
        name: BinaryName,
        superclass: Option<BinaryName>,
    ) -> ClassNode {
        ClassNode {
            version,
            access_flags,
            name,
            generic_signature: None,
            superclass,
            interfaces: vec![],
            source_file: None,
            fields: vec![],
            methods: vec![],
            annotations: Annotations::default(),
            type_annotations: TypeAnnotations::default(),
            attributes: vec![],
        }
    }

    /// Public Java 8 class extending `java/lang/Object`, with a public constructor which only
    /// calls `super()`
    pub fn empty(name: BinaryName) -> ClassNode {
        let mut class = ClassNode::new(
            Version::JAVA8,
            ClassAccessFlags::PUBLIC,
            name,
            Some(BinaryName::OBJECT),
        );

        let no_args = MethodDescriptor {
            parameters: vec![],
            return_type: None,
        };
        let mut constructor =
            MethodNode::new(MethodAccessFlags::PUBLIC, UnqualifiedName::INIT, no_args.clone());
        constructor.instructions.add(Instruction::ALoad(0));
        constructor.instructions.add(Instruction::Invoke(
            InvokeType::Special,
            MethodRef {
                owner: BinaryName::OBJECT,
                name: UnqualifiedName::INIT,
                descriptor: no_args,
                is_interface: false,
            },
        ));
        constructor
            .instructions
            .add(Instruction::Branch(BranchInstruction::Return));
        class.methods.push(constructor);

        class
    }

    /// Find a field by name and type
    pub fn field(&self, name: &str, descriptor: &FieldType<BinaryName>) -> Option<&FieldNode> {
        self.fields
            .iter()
            .find(|field| field.name.as_str() == name && &field.descriptor == descriptor)
    }

    pub fn field_mut(
        &mut self,
        name: &str,
        descriptor: &FieldType<BinaryName>,
    ) -> Option<&mut FieldNode> {
        self.fields
            .iter_mut()
            .find(|field| field.name.as_str() == name && &field.descriptor == descriptor)
    }

    /// Find a method by name and descriptor
    pub fn method(
        &self,
        name: &str,
        descriptor: &MethodDescriptor<BinaryName>,
    ) -> Option<&MethodNode> {
        self.methods
            .iter()
            .find(|method| method.name.as_str() == name && &method.descriptor == descriptor)
    }

    pub fn method_mut(
        &mut self,
        name: &str,
        descriptor: &MethodDescriptor<BinaryName>,
    ) -> Option<&mut MethodNode> {
        self.methods
            .iter_mut()
            .find(|method| method.name.as_str() == name && &method.descriptor == descriptor)
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }
}
