use super::{AnnotationValue, Annotations, Attribute, LocalVariableAnnotation, TypeAnnotations};
use crate::jvm::code::{InsnList, Label};
use crate::jvm::{
    BinaryName, Error, FieldType, MethodAccessFlags, MethodDescriptor, UnqualifiedName, Width,
};
use std::collections::HashSet;

/// In-memory representation of a method
#[derive(Debug, PartialEq)]
pub struct MethodNode {
    pub access_flags: MethodAccessFlags,
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor<BinaryName>,

    /// Generic method signature
    ///
    /// [Format](https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html#jvms-4.7.9.1)
    pub generic_signature: Option<String>,

    /// Which exceptions can this method throw?
    ///
    /// Note: this does not need to include `RuntimeException`, `Error`, or subclasses
    pub exceptions: Vec<BinaryName>,

    /// Method body (empty for `abstract` and `native` methods)
    pub instructions: InsnList,
    pub try_catch_blocks: Vec<TryCatchBlock>,
    pub local_variables: Vec<LocalVariable>,
    pub local_variable_annotations: Vec<LocalVariableAnnotation>,
    pub max_stack: u16,
    pub max_locals: u16,

    pub annotations: Annotations,
    pub type_annotations: TypeAnnotations,

    /// Annotations on each declared parameter
    pub parameter_annotations: Vec<Annotations>,

    /// Default value of an annotation interface element
    pub annotation_default: Option<AnnotationValue>,
    pub attributes: Vec<Attribute>,
}

/// Exception handler covering the code between `start` (inclusive) and `end` (exclusive)
#[derive(Debug, PartialEq)]
pub struct TryCatchBlock {
    pub start: Label,
    pub end: Label,
    pub handler: Label,

    /// Exception class caught (`None` catches everything, as for `finally`)
    pub catch_type: Option<BinaryName>,
    pub type_annotations: TypeAnnotations,
}

/// Debug information about a local variable
#[derive(Debug, PartialEq)]
pub struct LocalVariable {
    pub name: UnqualifiedName,
    pub descriptor: FieldType<BinaryName>,
    pub generic_signature: Option<String>,
    pub start: Label,
    pub end: Label,
    pub index: u16,
}

impl MethodNode {
    /// Create a new method with an empty body
    pub fn new(
        access_flags: MethodAccessFlags,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<BinaryName>,
    ) -> MethodNode {
        MethodNode {
            access_flags,
            name,
            descriptor,
            generic_signature: None,
            exceptions: vec![],
            instructions: InsnList::new(),
            try_catch_blocks: vec![],
            local_variables: vec![],
            local_variable_annotations: vec![],
            max_stack: 0,
            max_locals: 0,
            annotations: Annotations::default(),
            type_annotations: TypeAnnotations::default(),
            parameter_annotations: vec![],
            annotation_default: None,
            attributes: vec![],
        }
    }

    /// Does the method have no `this` parameter?
    pub fn is_static(&self) -> bool {
        self.access_flags.is_static()
    }

    /// Labels referred to from outside of the `Label` markers themselves (branches, line numbers,
    /// exception handlers, local variable ranges)
    pub fn referenced_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = self
            .instructions
            .iter()
            .flat_map(|insn| insn.referenced_labels())
            .collect();
        for block in &self.try_catch_blocks {
            labels.extend([block.start, block.end, block.handler]);
        }
        for local in &self.local_variables {
            labels.extend([local.start, local.end]);
        }
        for annotation in &self.local_variable_annotations {
            for range in &annotation.ranges {
                labels.extend([range.start, range.end]);
            }
        }
        labels
    }

    /// Check that the body is well formed enough to be edited and copied
    ///
    ///   - every label is placed at most once
    ///   - every referenced label is placed
    ///   - the parameters fit in the 255 slots a method may have
    ///   - no local load/store/`iinc` partly overlaps a parameter (the upper half of a
    ///     `long`/`double`, or a wide access starting on a narrow parameter)
    ///
    /// This does not verify the bytecode.
    pub fn check_structure(&self) -> Result<(), Error> {
        let mut placed = HashSet::new();
        for label in self.instructions.labels() {
            if !placed.insert(label) {
                return Err(Error::DuplicateLabel(label));
            }
        }

        if let Some(dangling) = self
            .referenced_labels()
            .into_iter()
            .find(|label| !placed.contains(label))
        {
            return Err(Error::DanglingLabel(dangling));
        }

        let parameter_slots = self.descriptor.parameter_length(!self.is_static());
        if parameter_slots > 255 {
            return Err(Error::TooManyParameterSlots(parameter_slots));
        }

        // `[start, end)` slot range of each parameter
        let mut start: u32 = if self.is_static() { 0 } else { 1 };
        let mut ranges = vec![];
        for parameter_type in &self.descriptor.parameters {
            let end = start + parameter_type.width() as u32;
            ranges.push((start, end));
            start = end;
        }
        for insn in self.instructions.iter() {
            let (slot, width) = match (insn.local_slot(), insn.local_width()) {
                (Some(slot), Some(width)) => (slot, width),
                _ => continue,
            };
            let (access_start, access_end) = (u32::from(slot), u32::from(slot) + width);
            let overlapping = ranges.iter().position(|&(start, end)| {
                access_start < end && start < access_end && (start, end) != (access_start, access_end)
            });
            if let Some(parameter) = overlapping {
                return Err(Error::SlotWidthMismatch { slot, parameter });
            }
        }

        Ok(())
    }
}
