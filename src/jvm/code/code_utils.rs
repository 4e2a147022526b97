//! Slot and stack utilities for hand-written bytecode
//!
//! These are the small computations that keep coming up when splicing instructions into an
//! existing method: finding a local variable slot nobody uses, pushing an `int` in the shortest
//! form, swapping operands of different widths, and boxing or unboxing primitives.

use super::{opcodes, Constant, InsnList, Instruction, InvokeType, MethodRef, Number};
use crate::jvm::model::MethodNode;
use crate::jvm::{BaseType, BinaryName, FieldType, MethodDescriptor, RefType, UnqualifiedName, Width};

/// First local variable slot which is not used by any parameter or any load/store/`iinc` in the
/// method body
///
/// Slots are scanned in instruction order: an access at or above the running index moves the
/// index past it (two slots for `long`/`double` loads and stores).
pub fn free_local_index(method: &MethodNode) -> u32 {
    let mut index = method.descriptor.parameter_length(!method.is_static()) as u32;
    for insn in method.instructions.iter() {
        let (slot, width) = match (insn.local_slot(), insn.local_width()) {
            (Some(slot), Some(width)) => (u32::from(slot), width),
            _ => continue,
        };
        if slot >= index {
            index = slot + width;
        }
    }
    index
}

/// Slot holding each declared parameter (`this` is not included)
pub fn parameter_indices(method: &MethodNode) -> Vec<u32> {
    let mut current: u32 = if method.is_static() { 0 } else { 1 };
    method
        .descriptor
        .parameters
        .iter()
        .map(|parameter| {
            let index = current;
            current += parameter.width() as u32;
            index
        })
        .collect()
}

/// Instructions which swap the top two stack values, given their types
///
/// `top` is the type of the value on top of the stack and `bottom` the one just under it.
pub fn stack_swap(top: &impl Width, bottom: &impl Width) -> InsnList {
    let insns = match (top.width(), bottom.width()) {
        (2, 2) => vec![Instruction::Dup2X2, Instruction::Pop2],
        (2, _) => vec![Instruction::Dup2X1, Instruction::Pop2],
        (_, 2) => vec![Instruction::DupX2, Instruction::Pop],
        _ => vec![Instruction::Swap],
    };
    InsnList::from(insns)
}

/// Numeric value pushed by a constant-loading instruction
pub fn to_number(insn: &Instruction) -> Option<Number> {
    let opcode = insn.opcode()?;
    let number = match opcode {
        opcodes::ICONST_M1..=opcodes::ICONST_5 => {
            Number::Int(i32::from(opcode) - i32::from(opcodes::ICONST_0))
        }
        opcodes::LCONST_0..=opcodes::LCONST_1 => Number::Long(i64::from(opcode - opcodes::LCONST_0)),
        opcodes::FCONST_0..=opcodes::FCONST_2 => {
            Number::Float(f32::from(opcode - opcodes::FCONST_0))
        }
        opcodes::DCONST_0..=opcodes::DCONST_1 => {
            Number::Double(f64::from(opcode - opcodes::DCONST_0))
        }
        _ => match insn {
            Instruction::BiPush(b) => Number::Int(i32::from(*b)),
            Instruction::SiPush(s) => Number::Int(i32::from(*s)),
            Instruction::Ldc(Constant::Integer(i)) => Number::Int(*i),
            Instruction::Ldc(Constant::Long(l)) => Number::Long(*l),
            Instruction::Ldc(Constant::Float(f)) => Number::Float(*f),
            Instruction::Ldc(Constant::Double(d)) => Number::Double(*d),
            _ => return None,
        },
    };
    Some(number)
}

/// Shortest instruction pushing an `int` constant
pub fn int_push(value: i32) -> Instruction {
    match value {
        -1 => Instruction::IConstM1,
        0 => Instruction::IConst0,
        1 => Instruction::IConst1,
        2 => Instruction::IConst2,
        3 => Instruction::IConst3,
        4 => Instruction::IConst4,
        5 => Instruction::IConst5,
        -128..=127 => Instruction::BiPush(value as i8),
        -32768..=32767 => Instruction::SiPush(value as i16),
        _ => Instruction::Ldc(Constant::Integer(value)),
    }
}

/// Shortest instruction pushing a numeric constant
///
/// `-0.0` has no inline form (`fconst_0`/`dconst_0` push `+0.0`), so it is loaded as a constant.
pub fn number_push(number: Number) -> Instruction {
    match number {
        Number::Int(i) => int_push(i),
        Number::Long(0) => Instruction::LConst0,
        Number::Long(1) => Instruction::LConst1,
        Number::Float(f) if f.to_bits() == 0f32.to_bits() => Instruction::FConst0,
        Number::Float(f) if f == 1.0 => Instruction::FConst1,
        Number::Float(f) if f == 2.0 => Instruction::FConst2,
        Number::Double(d) if d.to_bits() == 0f64.to_bits() => Instruction::DConst0,
        Number::Double(d) if d == 1.0 => Instruction::DConst1,
        other => Instruction::Ldc(other.to_constant()),
    }
}

/// Boxed class of a primitive, along with the accessor returning the primitive
fn wrapper(base_type: BaseType) -> (BinaryName, UnqualifiedName) {
    match base_type {
        BaseType::Boolean => (BinaryName::BOOLEAN, UnqualifiedName::BOOLEANVALUE),
        BaseType::Byte => (BinaryName::BYTE, UnqualifiedName::BYTEVALUE),
        BaseType::Short => (BinaryName::SHORT, UnqualifiedName::SHORTVALUE),
        BaseType::Char => (BinaryName::CHARACTER, UnqualifiedName::CHARVALUE),
        BaseType::Int => (BinaryName::INTEGER, UnqualifiedName::INTVALUE),
        BaseType::Float => (BinaryName::FLOAT, UnqualifiedName::FLOATVALUE),
        BaseType::Long => (BinaryName::LONG, UnqualifiedName::LONGVALUE),
        BaseType::Double => (BinaryName::DOUBLE, UnqualifiedName::DOUBLEVALUE),
    }
}

/// Instructions converting the object on top of the stack into `target`
///
/// Primitives are cast to their wrapper and unwrapped, anything else is just cast.
pub fn unbox(target: &FieldType<BinaryName>) -> InsnList {
    let base_type = match target {
        FieldType::Base(base_type) => *base_type,
        FieldType::Ref(ref_type) => {
            return InsnList::from(vec![Instruction::CheckCast(ref_type.clone())])
        }
    };
    let (class, accessor) = wrapper(base_type);
    let unwrap = MethodRef {
        owner: class.clone(),
        name: accessor,
        descriptor: MethodDescriptor {
            parameters: vec![],
            return_type: Some(FieldType::Base(base_type)),
        },
        is_interface: false,
    };
    InsnList::from(vec![
        Instruction::CheckCast(RefType::Object(class)),
        Instruction::Invoke(InvokeType::Virtual, unwrap),
    ])
}

/// Instruction converting the primitive on top of the stack into its wrapper object
///
/// Returns `None` for reference types, which need no boxing.
pub fn box_primitive(primitive: &FieldType<BinaryName>) -> Option<Instruction> {
    let base_type = match primitive {
        FieldType::Base(base_type) => *base_type,
        FieldType::Ref(_) => return None,
    };
    let (class, _) = wrapper(base_type);
    let value_of = MethodRef {
        owner: class.clone(),
        name: UnqualifiedName::VALUEOF,
        descriptor: MethodDescriptor {
            parameters: vec![FieldType::Base(base_type)],
            return_type: Some(FieldType::object(class)),
        },
        is_interface: false,
    };
    Some(Instruction::Invoke(InvokeType::Static, value_of))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{MethodAccessFlags, Name, ParseDescriptor};

    fn method(access_flags: MethodAccessFlags, descriptor: &str, body: Vec<Instruction>) -> MethodNode {
        let mut method = MethodNode::new(
            access_flags,
            UnqualifiedName::from_string(String::from("test")).unwrap(),
            MethodDescriptor::parse(descriptor).unwrap(),
        );
        method.instructions = InsnList::from(body);
        method
    }

    #[test]
    fn free_local_from_parameters() {
        let static_method = method(MethodAccessFlags::STATIC, "(IJ)V", vec![]);
        assert_eq!(free_local_index(&static_method), 3);

        let instance_method = method(MethodAccessFlags::PUBLIC, "()V", vec![]);
        assert_eq!(free_local_index(&instance_method), 1);
    }

    #[test]
    fn free_local_from_body() {
        let body = vec![
            Instruction::ILoad(0),
            Instruction::DConst1,
            Instruction::DStore(3),
            Instruction::IInc(1, 1),
        ];
        assert_eq!(free_local_index(&method(MethodAccessFlags::STATIC, "(I)V", body)), 5);

        let body = vec![Instruction::IInc(7, -1), Instruction::AStore(2)];
        assert_eq!(free_local_index(&method(MethodAccessFlags::STATIC, "()V", body)), 8);
    }

    #[test]
    fn parameter_slots() {
        let static_method = method(MethodAccessFlags::STATIC, "(IJLjava/lang/String;D[I)V", vec![]);
        assert_eq!(parameter_indices(&static_method), vec![0, 1, 3, 4, 6]);

        let instance_method = method(MethodAccessFlags::PUBLIC, "(JI)V", vec![]);
        assert_eq!(parameter_indices(&instance_method), vec![1, 3]);
    }

    #[test]
    fn number_push_round_trip() {
        let cases = [
            (Number::Long(1), Instruction::LConst1),
            (Number::Long(2), Instruction::Ldc(Constant::Long(2))),
            (Number::Float(2.0), Instruction::FConst2),
            (Number::Float(-0.0), Instruction::Ldc(Constant::Float(-0.0))),
            (Number::Double(0.0), Instruction::DConst0),
            (Number::Double(0.5), Instruction::Ldc(Constant::Double(0.5))),
            (Number::Int(100), Instruction::BiPush(100)),
        ];
        for (number, expected) in cases {
            let insn = number_push(number);
            assert_eq!(insn, expected, "push of {:?}", number);
            assert_eq!(to_number(&insn), Some(number));
        }
    }

    #[test]
    fn slots_past_u16() {
        let descriptor = format!("({})V", "J".repeat(40000));
        let wide = method(MethodAccessFlags::STATIC, &descriptor, vec![]);
        assert_eq!(free_local_index(&wide), 80000);

        let indices = parameter_indices(&wide);
        assert_eq!(indices.len(), 40000);
        assert_eq!(indices.last(), Some(&79998));
    }

    #[test]
    fn int_push_round_trip() {
        let cases: [(i32, u8); 10] = [
            (-1, opcodes::ICONST_M1),
            (0, opcodes::ICONST_0),
            (5, opcodes::ICONST_5),
            (6, opcodes::BIPUSH),
            (-128, opcodes::BIPUSH),
            (127, opcodes::BIPUSH),
            (128, opcodes::SIPUSH),
            (32767, opcodes::SIPUSH),
            (32768, opcodes::LDC),
            (-40000, opcodes::LDC),
        ];
        for (value, expected_opcode) in cases {
            let insn = int_push(value);
            assert_eq!(insn.opcode(), Some(expected_opcode), "opcode for {}", value);
            assert_eq!(to_number(&insn), Some(Number::Int(value)));
        }
    }

    #[test]
    fn non_int_numbers() {
        assert_eq!(to_number(&Instruction::LConst1), Some(Number::Long(1)));
        assert_eq!(to_number(&Instruction::FConst2), Some(Number::Float(2.0)));
        assert_eq!(to_number(&Instruction::DConst0), Some(Number::Double(0.0)));
        assert_eq!(
            to_number(&Instruction::Ldc(Constant::Double(1.5))),
            Some(Number::Double(1.5))
        );
        assert_eq!(to_number(&Instruction::Ldc(Constant::String(String::from("1")))), None);
        assert_eq!(to_number(&Instruction::AConstNull), None);
        assert_eq!(to_number(&Instruction::ILoad(0)), None);
    }

    /// Run stack manipulation instructions over a stack of slots (wide values fill two slots)
    fn simulate(stack: &mut Vec<char>, insns: &InsnList) {
        for insn in insns {
            let len = stack.len();
            match insn {
                Instruction::Pop => {
                    stack.pop();
                }
                Instruction::Pop2 => stack.truncate(len - 2),
                Instruction::Swap => stack.swap(len - 1, len - 2),
                Instruction::DupX2 => {
                    let top = stack[len - 1];
                    stack.insert(len - 3, top);
                }
                Instruction::Dup2X1 | Instruction::Dup2X2 => {
                    let depth = if insn == &Instruction::Dup2X1 { 3 } else { 4 };
                    let top: Vec<char> = stack[len - 2..].to_vec();
                    for (i, slot) in top.into_iter().enumerate() {
                        stack.insert(len - depth + i, slot);
                    }
                }
                other => panic!("unexpected instruction {:?}", other),
            }
        }
    }

    #[test]
    fn swap_sequences() {
        let int: FieldType<BinaryName> = FieldType::int();
        let long: FieldType<BinaryName> = FieldType::long();
        let double: FieldType<BinaryName> = FieldType::double();

        // 1-slot over 2-slot, then back
        let mut stack = vec!['x', 'b', 'b', 't'];
        simulate(&mut stack, &stack_swap(&int, &long));
        assert_eq!(stack, vec!['x', 't', 'b', 'b']);
        simulate(&mut stack, &stack_swap(&long, &int));
        assert_eq!(stack, vec!['x', 'b', 'b', 't']);

        let mut stack = vec!['b', 'b', 't', 't'];
        simulate(&mut stack, &stack_swap(&double, &long));
        assert_eq!(stack, vec!['t', 't', 'b', 'b']);

        let mut stack = vec!['b', 't'];
        simulate(&mut stack, &stack_swap(&int, &int));
        assert_eq!(stack, vec!['t', 'b']);
    }

    #[test]
    fn box_then_unbox_preserves_type() {
        for base_type in BaseType::ALL {
            let primitive = FieldType::Base(base_type);

            let boxed_type = match box_primitive(&primitive) {
                Some(Instruction::Invoke(InvokeType::Static, method)) => {
                    assert_eq!(method.descriptor.parameters, vec![primitive.clone()]);
                    method.descriptor.return_type.unwrap()
                }
                other => panic!("unexpected boxing {:?}", other),
            };

            let unboxing = unbox(&primitive);
            assert_eq!(unboxing.len(), 2);
            match (&unboxing[0], &unboxing[1]) {
                (Instruction::CheckCast(cast), Instruction::Invoke(InvokeType::Virtual, method)) => {
                    assert_eq!(FieldType::Ref(cast.clone()), boxed_type);
                    assert_eq!(FieldType::object(method.owner.clone()), boxed_type);
                    assert_eq!(method.descriptor.return_type, Some(primitive.clone()));
                }
                other => panic!("unexpected unboxing {:?}", other),
            }
        }
    }

    #[test]
    fn references_are_only_cast() {
        let string = FieldType::object(BinaryName::STRING);
        assert_eq!(box_primitive(&string), None);
        assert_eq!(
            unbox(&string),
            InsnList::from(vec![Instruction::CheckCast(RefType::Object(BinaryName::STRING))])
        );
    }
}
