use super::code_utils;
use super::{BranchInstruction, InsnList, Instruction, Number};
use crate::jvm::{BaseType, BinaryName, FieldType, Width};

/// Appending helpers for building up instruction lists
pub trait InsnListExts {
    /// Push an integer constant onto the stack, using the shortest encoding
    fn push_int(&mut self, integer: i32);

    /// Push any numeric constant onto the stack, using the shortest encoding
    fn push_number(&mut self, number: Number);

    /// Swap the top two values of the stack, accounting for the different possible type widths
    fn push_swap(&mut self, top: &impl Width, bottom: &impl Width);

    /// Convert the object on top of the stack into a value of the given type
    fn push_unbox(&mut self, target: &FieldType<BinaryName>);

    /// Box the primitive on top of the stack
    ///
    /// Returns whether anything was emitted (reference types are left untouched).
    fn push_box(&mut self, primitive: &FieldType<BinaryName>) -> bool;

    /// Get a local at a particular offset
    fn get_local(&mut self, offset: u16, field_type: &FieldType<BinaryName>);

    /// Set a local at a particular offset
    fn set_local(&mut self, offset: u16, field_type: &FieldType<BinaryName>);

    /// Return from the method
    fn return_(&mut self, field_type_opt: Option<&FieldType<BinaryName>>);
}

impl InsnListExts for InsnList {
    fn push_int(&mut self, integer: i32) {
        self.add(code_utils::int_push(integer));
    }

    fn push_number(&mut self, number: Number) {
        self.add(code_utils::number_push(number));
    }

    fn push_swap(&mut self, top: &impl Width, bottom: &impl Width) {
        self.append(&mut code_utils::stack_swap(top, bottom));
    }

    fn push_unbox(&mut self, target: &FieldType<BinaryName>) {
        self.append(&mut code_utils::unbox(target));
    }

    fn push_box(&mut self, primitive: &FieldType<BinaryName>) -> bool {
        match code_utils::box_primitive(primitive) {
            Some(insn) => {
                self.add(insn);
                true
            }
            None => false,
        }
    }

    fn get_local(&mut self, offset: u16, field_type: &FieldType<BinaryName>) {
        let insn = match field_type {
            FieldType::Base(
                BaseType::Int
                | BaseType::Char
                | BaseType::Short
                | BaseType::Byte
                | BaseType::Boolean,
            ) => Instruction::ILoad(offset),
            FieldType::Base(BaseType::Float) => Instruction::FLoad(offset),
            FieldType::Base(BaseType::Long) => Instruction::LLoad(offset),
            FieldType::Base(BaseType::Double) => Instruction::DLoad(offset),
            FieldType::Ref(_) => Instruction::ALoad(offset),
        };
        self.add(insn);
    }

    fn set_local(&mut self, offset: u16, field_type: &FieldType<BinaryName>) {
        let insn = match field_type {
            FieldType::Base(
                BaseType::Int
                | BaseType::Char
                | BaseType::Short
                | BaseType::Byte
                | BaseType::Boolean,
            ) => Instruction::IStore(offset),
            FieldType::Base(BaseType::Float) => Instruction::FStore(offset),
            FieldType::Base(BaseType::Long) => Instruction::LStore(offset),
            FieldType::Base(BaseType::Double) => Instruction::DStore(offset),
            FieldType::Ref(_) => Instruction::AStore(offset),
        };
        self.add(insn);
    }

    fn return_(&mut self, field_type_opt: Option<&FieldType<BinaryName>>) {
        let insn = match field_type_opt {
            None => BranchInstruction::Return,
            Some(FieldType::Base(
                BaseType::Int
                | BaseType::Char
                | BaseType::Short
                | BaseType::Byte
                | BaseType::Boolean,
            )) => BranchInstruction::IReturn,
            Some(FieldType::Base(BaseType::Float)) => BranchInstruction::FReturn,
            Some(FieldType::Base(BaseType::Long)) => BranchInstruction::LReturn,
            Some(FieldType::Base(BaseType::Double)) => BranchInstruction::DReturn,
            Some(FieldType::Ref(_)) => BranchInstruction::AReturn,
        };
        self.add(Instruction::Branch(insn));
    }
}
