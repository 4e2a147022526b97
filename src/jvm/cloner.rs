//! Deep copies of classes and their parts
//!
//! Most of the model is plain data, but method bodies are not: branches, line numbers, exception
//! handlers and local variable ranges all refer to labels by identity. A copy of a body that
//! reused the original labels would have its branches point into a body it doesn't own, so every
//! copy gets fresh labels, remapped consistently across everything that refers to them.
//!
//! Copying a body happens in two passes. The first collects every label placed in the body and
//! prepares its replacement. The second copies instructions, substituting replacements. Since
//! all replacements exist before the second pass starts, a branch which appears before its
//! target is remapped the same way as one that appears after it.

use crate::jvm::code::{InsnList, Instruction, Label};
use crate::jvm::model::{
    Annotation, Attribute, ClassNode, FieldNode, LocalRange, LocalVariable,
    LocalVariableAnnotation, MethodNode, TryCatchBlock, TypeAnnotation,
};
use crate::jvm::{Name, RenderDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// Replacement for each label placed in a body
pub type LabelMap = HashMap<Label, Label>;

/// Prepare a fresh label for every label placed in the list
pub fn clone_labels(insns: &InsnList) -> LabelMap {
    insns.labels().map(|label| (label, Label::fresh())).collect()
}

/// Look up the replacement of a label
///
/// A label which was never placed (so has no prepared replacement) gets one on the spot, and
/// keeps it for every later use within the same map.
fn remap_label(labels: &mut LabelMap, label: Label) -> Label {
    *labels.entry(label).or_insert_with(|| {
        let replacement = Label::fresh();
        log::warn!(
            "Label {:?} is referenced but never placed, substituting {:?}",
            label,
            replacement
        );
        replacement
    })
}

/// Copy an instruction list, giving the copy its own labels
pub fn clone_instructions(insns: &InsnList) -> InsnList {
    let mut labels = clone_labels(insns);
    clone_instructions_with(insns, &mut labels)
}

/// Copy an instruction list, using (and extending) an existing label map
///
/// This is useful when several lists, or a list and the exception table referring into it,
/// need to be remapped consistently.
pub fn clone_instructions_with(insns: &InsnList, labels: &mut LabelMap) -> InsnList {
    insns
        .iter()
        .map(|insn: &Instruction| insn.map_labels(|label| remap_label(labels, label)))
        .collect()
}

/// Copy a method, body included
pub fn clone_method(method: &MethodNode) -> MethodNode {
    log::trace!(
        "Cloning method {}{}",
        method.name.as_str(),
        method.descriptor.render()
    );

    let mut labels = clone_labels(&method.instructions);
    let instructions = clone_instructions_with(&method.instructions, &mut labels);

    let try_catch_blocks = method
        .try_catch_blocks
        .iter()
        .map(|block| TryCatchBlock {
            start: remap_label(&mut labels, block.start),
            end: remap_label(&mut labels, block.end),
            handler: remap_label(&mut labels, block.handler),
            catch_type: block.catch_type.clone(),
            type_annotations: block.type_annotations.clone(),
        })
        .collect();

    let local_variables = method
        .local_variables
        .iter()
        .map(|local| LocalVariable {
            name: local.name.clone(),
            descriptor: local.descriptor.clone(),
            generic_signature: local.generic_signature.clone(),
            start: remap_label(&mut labels, local.start),
            end: remap_label(&mut labels, local.end),
            index: local.index,
        })
        .collect();

    let local_variable_annotations = method
        .local_variable_annotations
        .iter()
        .map(|annotation| LocalVariableAnnotation {
            visible: annotation.visible,
            type_annotation: clone_type_annotation(&annotation.type_annotation),
            ranges: annotation
                .ranges
                .iter()
                .map(|range| LocalRange {
                    start: remap_label(&mut labels, range.start),
                    end: remap_label(&mut labels, range.end),
                    index: range.index,
                })
                .collect(),
        })
        .collect();

    MethodNode {
        access_flags: method.access_flags,
        name: method.name.clone(),
        descriptor: method.descriptor.clone(),
        generic_signature: method.generic_signature.clone(),
        exceptions: method.exceptions.clone(),
        instructions,
        try_catch_blocks,
        local_variables,
        local_variable_annotations,
        max_stack: method.max_stack,
        max_locals: method.max_locals,
        annotations: method.annotations.clone(),
        type_annotations: method.type_annotations.clone(),
        parameter_annotations: method.parameter_annotations.clone(),
        annotation_default: method.annotation_default.clone(),
        attributes: method.attributes.iter().map(clone_attribute).collect(),
    }
}

/// Copy a field
pub fn clone_field(field: &FieldNode) -> FieldNode {
    log::trace!("Cloning field {}", field.name.as_str());
    FieldNode {
        access_flags: field.access_flags,
        name: field.name.clone(),
        descriptor: field.descriptor.clone(),
        generic_signature: field.generic_signature.clone(),
        constant_value: field.constant_value.clone(),
        annotations: field.annotations.clone(),
        type_annotations: field.type_annotations.clone(),
        attributes: field.attributes.iter().map(clone_attribute).collect(),
    }
}

/// Copy a class, along with all of its fields and methods
pub fn clone_class(class: &ClassNode) -> ClassNode {
    log::trace!("Cloning class {}", class.name.as_str());
    ClassNode {
        version: class.version,
        access_flags: class.access_flags,
        name: class.name.clone(),
        generic_signature: class.generic_signature.clone(),
        superclass: class.superclass.clone(),
        interfaces: class.interfaces.clone(),
        source_file: class.source_file.clone(),
        fields: class.fields.iter().map(clone_field).collect(),
        methods: class.methods.iter().map(clone_method).collect(),
        annotations: class.annotations.clone(),
        type_annotations: class.type_annotations.clone(),
        attributes: class.attributes.iter().map(clone_attribute).collect(),
    }
}

pub fn clone_annotation(annotation: &Annotation) -> Annotation {
    annotation.clone()
}

pub fn clone_type_annotation(type_annotation: &TypeAnnotation) -> TypeAnnotation {
    type_annotation.clone()
}

/// Copy an attribute
///
/// The module attributes are copied field by field. Opaque attributes can't be looked into, so
/// the copy shares the payload of the original.
pub fn clone_attribute(attribute: &Attribute) -> Attribute {
    match attribute {
        Attribute::ModuleHashes {
            algorithm,
            modules,
            hashes,
        } => Attribute::ModuleHashes {
            algorithm: algorithm.clone(),
            modules: modules.clone(),
            hashes: hashes.clone(),
        },
        Attribute::ModuleResolution(resolution) => Attribute::ModuleResolution(*resolution),
        Attribute::ModuleTarget { platform } => Attribute::ModuleTarget {
            platform: platform.clone(),
        },
        Attribute::Opaque(opaque) => Attribute::Opaque(Arc::clone(opaque)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::code::{BranchInstruction, OrdComparison};
    use crate::jvm::model::{Annotations, AnnotationValue, TypeAnnotations};
    use crate::jvm::{
        BinaryName, FieldAccessFlags, FieldType, MethodAccessFlags, MethodDescriptor,
        ModuleResolutionFlags, ParseDescriptor, UnqualifiedName,
    };
    use std::collections::HashSet;

    fn name(name: &str) -> UnqualifiedName {
        UnqualifiedName::from_string(String::from(name)).unwrap()
    }

    /// `static int abs(int)` with a forward branch, a line number and an exception handler
    fn abs_method() -> MethodNode {
        let mut method = MethodNode::new(
            MethodAccessFlags::STATIC,
            name("abs"),
            MethodDescriptor::parse("(I)I").unwrap(),
        );
        let (start, positive, end) = (Label::fresh(), Label::fresh(), Label::fresh());
        method.instructions = InsnList::from(vec![
            Instruction::Label(start),
            Instruction::LineNumber(10, start),
            Instruction::ILoad(0),
            Instruction::Branch(BranchInstruction::If(OrdComparison::GE, positive)),
            Instruction::ILoad(0),
            Instruction::INeg,
            Instruction::Branch(BranchInstruction::IReturn),
            Instruction::Label(positive),
            Instruction::ILoad(0),
            Instruction::Branch(BranchInstruction::IReturn),
            Instruction::Label(end),
        ]);
        method.try_catch_blocks.push(TryCatchBlock {
            start,
            end: positive,
            handler: end,
            catch_type: None,
            type_annotations: TypeAnnotations::default(),
        });
        method.local_variables.push(LocalVariable {
            name: name("x"),
            descriptor: FieldType::int(),
            generic_signature: None,
            start,
            end,
            index: 0,
        });
        method
    }

    #[test]
    fn cloned_labels_are_fresh_and_consistent() {
        let original = abs_method();
        let clone = clone_method(&original);
        assert!(clone.check_structure().is_ok());

        let original_labels: HashSet<Label> = original.instructions.labels().collect();
        let clone_labels: HashSet<Label> = clone.instructions.labels().collect();
        assert_eq!(clone_labels.len(), 3);
        assert!(original_labels.is_disjoint(&clone_labels));

        // The forward branch targets the clone's own `positive` label
        let positive = clone.instructions.labels().nth(1).unwrap();
        assert_eq!(
            clone.instructions[3],
            Instruction::Branch(BranchInstruction::If(OrdComparison::GE, positive))
        );
        assert_eq!(clone.try_catch_blocks[0].end, positive);
        assert_eq!(
            clone.local_variables[0].start,
            clone.instructions.labels().next().unwrap()
        );
        for label in clone.referenced_labels() {
            assert!(clone_labels.contains(&label));
        }
    }

    #[test]
    fn cloned_body_is_independent() {
        let original = abs_method();
        let mut clone = clone_method(&original);
        clone.instructions.insert(2, Instruction::Nop);
        clone.try_catch_blocks.clear();

        assert_eq!(original.instructions.len(), 11);
        assert_eq!(original.try_catch_blocks.len(), 1);
        assert!(original.check_structure().is_ok());
    }

    #[test]
    fn dangling_labels_are_remapped_consistently() {
        let missing = Label::fresh();
        let insns = InsnList::from(vec![
            Instruction::Branch(BranchInstruction::Goto(missing)),
            Instruction::LineNumber(4, missing),
        ]);
        let clone = clone_instructions(&insns);
        let targets: Vec<Label> = clone.iter().flat_map(Instruction::referenced_labels).collect();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], targets[1]);
        assert_ne!(targets[0], missing);
    }

    #[test]
    fn shared_label_map() {
        let target = Label::fresh();
        let body = InsnList::from(vec![Instruction::Label(target)]);
        let jump = InsnList::from(vec![Instruction::Branch(BranchInstruction::Goto(target))]);

        let mut labels = clone_labels(&body);
        let body_clone = clone_instructions_with(&body, &mut labels);
        let jump_clone = clone_instructions_with(&jump, &mut labels);
        assert_eq!(jump_clone[0].referenced_labels(), body_clone.labels().collect::<Vec<_>>());
    }

    #[test]
    fn attributes() {
        let opaque = Attribute::opaque("Custom", vec![1, 2, 3]);
        match (&opaque, clone_attribute(&opaque)) {
            (Attribute::Opaque(a), Attribute::Opaque(b)) => assert!(Arc::ptr_eq(a, &b)),
            _ => panic!("opaque attribute changed kind"),
        }

        let hashes = Attribute::ModuleHashes {
            algorithm: String::from("SHA-256"),
            modules: vec![String::from("java.base")],
            hashes: vec![vec![0xca, 0xfe]],
        };
        assert_eq!(clone_attribute(&hashes), hashes);

        let resolution = Attribute::ModuleResolution(ModuleResolutionFlags::WARN_INCUBATING);
        assert_eq!(clone_attribute(&resolution).name(), "ModuleResolution");
    }

    #[test]
    fn whole_class() {
        let mut class = ClassNode::empty(BinaryName::from_dotted("a.Abs").unwrap());
        class.methods.push(abs_method());
        let mut field = FieldNode::new(
            FieldAccessFlags::PUBLIC,
            name("cache"),
            FieldType::object(BinaryName::OBJECT),
        );
        field.annotations = Annotations {
            visible: vec![Annotation {
                descriptor: FieldType::object(BinaryName::from_dotted("a.Marker").unwrap()),
                values: vec![(String::from("value"), AnnotationValue::Int(3))],
            }],
            invisible: vec![],
        };
        class.fields.push(field);
        class.attributes.push(Attribute::ModuleTarget {
            platform: String::from("linux-amd64"),
        });

        let clone = clone_class(&class);
        assert_eq!(clone.name, class.name);
        assert_eq!(clone.fields, class.fields);
        assert_eq!(clone.attributes, class.attributes);
        assert_eq!(clone.methods.len(), 2);
        assert_eq!(clone.methods[1].name, class.methods[1].name);
        assert_ne!(clone.methods[1].instructions, class.methods[1].instructions);
    }
}
