//! The instructions of a method body
//!
//! The representation is slightly different from the raw class file format, to make it more
//! convenient to inspect and rewrite bytecode:
//!
//!   - The "wide" instruction doesn't show up at all, but instead gets merged into the
//!     instructions it is allowed to modify
//!
//!   - Some instructions (like the branches) get abstracted into one instruction with a field.
//!     This helps with repetitive pattern matches and also simplifies tasks like inverting a
//!     branch condition.
//!
//!   - Jump targets are [`Label`]s, not offsets. Labels are placed into the instruction stream
//!     using the [`Instruction::Label`] pseudo-instruction.
//!
//!   - `jsr`/`ret` are omitted, as is the distinction between `ldc`, `ldc_w` and `ldc2_w`.

use super::Label;
use crate::jvm::{BaseType, BinaryName, FieldType, MethodDescriptor, RefType, UnqualifiedName};
use std::ops::Not;

/// JVM bytecode instruction, or a pseudo-instruction marking a position in the code
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Nop,
    AConstNull,
    IConstM1,
    IConst0,
    IConst1,
    IConst2,
    IConst3,
    IConst4,
    IConst5,
    LConst0,
    LConst1,
    FConst0,
    FConst1,
    FConst2,
    DConst0,
    DConst1,
    BiPush(i8),
    SiPush(i16),
    Ldc(Constant), // covers `ldc`, `ldc_w`, and `ldc2_w`
    ILoad(u16),    // covers `iload`, `iload{0,3}`, and `wide iload`
    LLoad(u16),
    FLoad(u16),
    DLoad(u16),
    ALoad(u16),
    IALoad,
    LALoad,
    FALoad,
    DALoad,
    AALoad,
    BALoad,
    CALoad,
    SALoad,
    IStore(u16), // covers `istore`, `istore{0,3}`, and `wide istore`
    LStore(u16),
    FStore(u16),
    DStore(u16),
    AStore(u16),
    IAStore,
    LAStore,
    FAStore,
    DAStore,
    AAStore,
    BAStore,
    CAStore,
    SAStore,
    Pop,
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
    IAdd,
    LAdd,
    FAdd,
    DAdd,
    ISub,
    LSub,
    FSub,
    DSub,
    IMul,
    LMul,
    FMul,
    DMul,
    IDiv,
    LDiv,
    FDiv,
    DDiv,
    IRem,
    LRem,
    FRem,
    DRem,
    INeg,
    LNeg,
    FNeg,
    DNeg,
    ISh(ShiftType), // covers `ishr`, `ishl`, and `iushr`
    LSh(ShiftType), // covers `lshr`, `lshl`, and `lushr`
    IAnd,
    LAnd,
    IOr,
    LOr,
    IXor,
    LXor,
    IInc(u16, i16), // covers `iinc` and `wide iinc`
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    I2B,
    I2C,
    I2S,
    LCmp,
    FCmp(CompareMode), // covers `fcmpl` and `fcmpg`
    DCmp(CompareMode), // covers `dcmpl` and `dcmpg`
    GetStatic(FieldRef),
    PutStatic(FieldRef),
    GetField(FieldRef),
    PutField(FieldRef),
    Invoke(InvokeType, MethodRef),
    InvokeDynamic(InvokeDynamicRef),
    New(BinaryName),
    NewArray(BaseType),
    ANewArray(RefType<BinaryName>),
    ArrayLength,
    CheckCast(RefType<BinaryName>),
    InstanceOf(RefType<BinaryName>),
    MonitorEnter,
    MonitorExit,
    MultiANewArray(RefType<BinaryName>, u8),

    /// Marks the position of a label (no opcode)
    Label(Label),

    /// Source line number starting at a label (no opcode)
    LineNumber(u16, Label),

    /// Instruction which may jump or end the method
    Branch(BranchInstruction),
}

/// Instructions that may jump somewhere other than the next instruction, or not continue at all
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BranchInstruction {
    If(OrdComparison, Label), // covers `ifeq`, `ifne`, `iflt`, `ifge`, `ifgt`, `ifle`
    IfICmp(OrdComparison, Label), // covers `if_icmpeq`, `if_icmpne`, `if_icmplt`, ... `if_icmple`
    IfACmp(EqComparison, Label), // covers `if_acmpeq`, `if_acmpne`
    IfNull(EqComparison, Label), // covers `ifnull`, `ifnonnull`
    Goto(Label),               // covers `goto` and `goto_w`
    TableSwitch {
        /// Jump target if the argument is less than `low` or greater than
        /// `low + targets.len() - 1`
        default: Label,

        /// Value associated with the first jump target
        low: i32,

        /// Jump targets
        targets: Vec<Label>,
    },
    LookupSwitch {
        /// Jump target if there is no corresponding key
        default: Label,

        /// Jump targets (sorted so that the keys are ascending)
        targets: Vec<(i32, Label)>,
    },
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
    Return,
    AThrow,
}

/// Constant loadable with `ldc`
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Class(RefType<BinaryName>),
    MethodType(MethodDescriptor<BinaryName>),
    MethodHandle(Box<MethodHandle>),
}

/// Numeric value pushed by a constant-loading instruction
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Symbolic reference to a field
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub owner: BinaryName,
    pub name: UnqualifiedName,
    pub descriptor: FieldType<BinaryName>,
}

/// Symbolic reference to a method
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub owner: BinaryName,
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor<BinaryName>,

    /// Whether `owner` is an interface
    pub is_interface: bool,
}

/// Call site of an `invokedynamic`
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeDynamicRef {
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor<BinaryName>,
    pub bootstrap: MethodHandle,
    pub arguments: Vec<Constant>,
}

/// Method handle constant
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodHandle {
    pub kind: HandleKind,
    pub owner: BinaryName,
    pub name: UnqualifiedName,

    /// Field or method descriptor, depending on `kind`
    pub descriptor: String,
    pub is_interface: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

/// Possible bit shifts
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ShiftType {
    Left,
    LogicalRight,
    ArithmeticRight,
}

/// Comparison modes for floating point
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CompareMode {
    /// -1 on NaN
    L,

    /// 1 on NaN
    G,
}

/// Binary comparison operators available for `int` branches
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum OrdComparison {
    EQ,
    GE,
    GT,
    LE,
    LT,
    NE,
}

impl Not for OrdComparison {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            OrdComparison::EQ => OrdComparison::NE,
            OrdComparison::GE => OrdComparison::LT,
            OrdComparison::GT => OrdComparison::LE,
            OrdComparison::LE => OrdComparison::GT,
            OrdComparison::LT => OrdComparison::GE,
            OrdComparison::NE => OrdComparison::EQ,
        }
    }
}

/// Equality/inequality comparison operators
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum EqComparison {
    EQ,
    NE,
}

impl Not for EqComparison {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            EqComparison::EQ => EqComparison::NE,
            EqComparison::NE => EqComparison::EQ,
        }
    }
}

/// Type of method to invoke
///
/// Note: `InvokeDynamic` is kept separate because it does not refer to a method on a class.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum InvokeType {
    Virtual,
    Special,
    Static,
    Interface,
}

/// Opcodes used when classifying instructions
pub mod opcodes {
    pub const NOP: u8 = 0x00;
    pub const ACONST_NULL: u8 = 0x01;
    pub const ICONST_M1: u8 = 0x02;
    pub const ICONST_0: u8 = 0x03;
    pub const ICONST_5: u8 = 0x08;
    pub const LCONST_0: u8 = 0x09;
    pub const LCONST_1: u8 = 0x0a;
    pub const FCONST_0: u8 = 0x0b;
    pub const FCONST_2: u8 = 0x0d;
    pub const DCONST_0: u8 = 0x0e;
    pub const DCONST_1: u8 = 0x0f;
    pub const BIPUSH: u8 = 0x10;
    pub const SIPUSH: u8 = 0x11;
    pub const LDC: u8 = 0x12;
    pub const ILOAD: u8 = 0x15;
    pub const LLOAD: u8 = 0x16;
    pub const DLOAD: u8 = 0x18;
    pub const ALOAD: u8 = 0x19;
    pub const ISTORE: u8 = 0x36;
    pub const LSTORE: u8 = 0x37;
    pub const DSTORE: u8 = 0x39;
    pub const ASTORE: u8 = 0x3a;
    pub const IINC: u8 = 0x84;
    pub const CHECKCAST: u8 = 0xc0;
    pub const INVOKEVIRTUAL: u8 = 0xb6;
    pub const INVOKESPECIAL: u8 = 0xb7;
    pub const INVOKESTATIC: u8 = 0xb8;
    pub const RETURN: u8 = 0xb1;
}

impl Instruction {
    /// Opcode of the instruction, in its unabbreviated form (so `iload_0` is reported as
    /// `iload`, `goto_w` as `goto` and all constant loads as `ldc`)
    ///
    /// Pseudo-instructions have no opcode.
    pub fn opcode(&self) -> Option<u8> {
        use Instruction::*;
        let opcode: u8 = match self {
            Nop => 0x00,
            AConstNull => 0x01,
            IConstM1 => 0x02,
            IConst0 => 0x03,
            IConst1 => 0x04,
            IConst2 => 0x05,
            IConst3 => 0x06,
            IConst4 => 0x07,
            IConst5 => 0x08,
            LConst0 => 0x09,
            LConst1 => 0x0a,
            FConst0 => 0x0b,
            FConst1 => 0x0c,
            FConst2 => 0x0d,
            DConst0 => 0x0e,
            DConst1 => 0x0f,
            BiPush(_) => 0x10,
            SiPush(_) => 0x11,
            Ldc(_) => 0x12,
            ILoad(_) => 0x15,
            LLoad(_) => 0x16,
            FLoad(_) => 0x17,
            DLoad(_) => 0x18,
            ALoad(_) => 0x19,
            IALoad => 0x2e,
            LALoad => 0x2f,
            FALoad => 0x30,
            DALoad => 0x31,
            AALoad => 0x32,
            BALoad => 0x33,
            CALoad => 0x34,
            SALoad => 0x35,
            IStore(_) => 0x36,
            LStore(_) => 0x37,
            FStore(_) => 0x38,
            DStore(_) => 0x39,
            AStore(_) => 0x3a,
            IAStore => 0x4f,
            LAStore => 0x50,
            FAStore => 0x51,
            DAStore => 0x52,
            AAStore => 0x53,
            BAStore => 0x54,
            CAStore => 0x55,
            SAStore => 0x56,
            Pop => 0x57,
            Pop2 => 0x58,
            Dup => 0x59,
            DupX1 => 0x5a,
            DupX2 => 0x5b,
            Dup2 => 0x5c,
            Dup2X1 => 0x5d,
            Dup2X2 => 0x5e,
            Swap => 0x5f,
            IAdd => 0x60,
            LAdd => 0x61,
            FAdd => 0x62,
            DAdd => 0x63,
            ISub => 0x64,
            LSub => 0x65,
            FSub => 0x66,
            DSub => 0x67,
            IMul => 0x68,
            LMul => 0x69,
            FMul => 0x6a,
            DMul => 0x6b,
            IDiv => 0x6c,
            LDiv => 0x6d,
            FDiv => 0x6e,
            DDiv => 0x6f,
            IRem => 0x70,
            LRem => 0x71,
            FRem => 0x72,
            DRem => 0x73,
            INeg => 0x74,
            LNeg => 0x75,
            FNeg => 0x76,
            DNeg => 0x77,
            ISh(ShiftType::Left) => 0x78,
            LSh(ShiftType::Left) => 0x79,
            ISh(ShiftType::ArithmeticRight) => 0x7a,
            LSh(ShiftType::ArithmeticRight) => 0x7b,
            ISh(ShiftType::LogicalRight) => 0x7c,
            LSh(ShiftType::LogicalRight) => 0x7d,
            IAnd => 0x7e,
            LAnd => 0x7f,
            IOr => 0x80,
            LOr => 0x81,
            IXor => 0x82,
            LXor => 0x83,
            IInc(_, _) => 0x84,
            I2L => 0x85,
            I2F => 0x86,
            I2D => 0x87,
            L2I => 0x88,
            L2F => 0x89,
            L2D => 0x8a,
            F2I => 0x8b,
            F2L => 0x8c,
            F2D => 0x8d,
            D2I => 0x8e,
            D2L => 0x8f,
            D2F => 0x90,
            I2B => 0x91,
            I2C => 0x92,
            I2S => 0x93,
            LCmp => 0x94,
            FCmp(CompareMode::L) => 0x95,
            FCmp(CompareMode::G) => 0x96,
            DCmp(CompareMode::L) => 0x97,
            DCmp(CompareMode::G) => 0x98,
            GetStatic(_) => 0xb2,
            PutStatic(_) => 0xb3,
            GetField(_) => 0xb4,
            PutField(_) => 0xb5,
            Invoke(InvokeType::Virtual, _) => 0xb6,
            Invoke(InvokeType::Special, _) => 0xb7,
            Invoke(InvokeType::Static, _) => 0xb8,
            Invoke(InvokeType::Interface, _) => 0xb9,
            InvokeDynamic(_) => 0xba,
            New(_) => 0xbb,
            NewArray(_) => 0xbc,
            ANewArray(_) => 0xbd,
            ArrayLength => 0xbe,
            CheckCast(_) => 0xc0,
            InstanceOf(_) => 0xc1,
            MonitorEnter => 0xc2,
            MonitorExit => 0xc3,
            MultiANewArray(_, _) => 0xc5,
            Label(_) | LineNumber(_, _) => return None,
            Branch(branch) => branch.opcode(),
        };
        Some(opcode)
    }

    /// Local variable slot read or written by the instruction, if any
    pub fn local_slot(&self) -> Option<u16> {
        use Instruction::*;
        match self {
            ILoad(idx) | LLoad(idx) | FLoad(idx) | DLoad(idx) | ALoad(idx) | IStore(idx)
            | LStore(idx) | FStore(idx) | DStore(idx) | AStore(idx) | IInc(idx, _) => Some(*idx),
            _ => None,
        }
    }

    /// Number of local variable slots read or written by the instruction, if any
    pub fn local_width(&self) -> Option<u32> {
        use Instruction::*;
        match self {
            LLoad(_) | DLoad(_) | LStore(_) | DStore(_) => Some(2),
            other => other.local_slot().map(|_| 1),
        }
    }

    /// Labels this instruction refers to (excluding the label it places, if any)
    pub fn referenced_labels(&self) -> Vec<Label> {
        match self {
            Instruction::LineNumber(_, label) => vec![*label],
            Instruction::Branch(branch) => branch.jump_targets(),
            _ => vec![],
        }
    }

    /// Copy the instruction, replacing every label it mentions (placed or referenced)
    pub fn map_labels(&self, mut map_label: impl FnMut(Label) -> Label) -> Instruction {
        match self {
            Instruction::Label(label) => Instruction::Label(map_label(*label)),
            Instruction::LineNumber(line, label) => Instruction::LineNumber(*line, map_label(*label)),
            Instruction::Branch(branch) => Instruction::Branch(branch.map_labels(map_label)),
            other => other.clone(),
        }
    }
}

impl BranchInstruction {
    /// Opcode of the branch instruction
    pub fn opcode(&self) -> u8 {
        match self {
            BranchInstruction::If(comp, _) => match comp {
                OrdComparison::EQ => 0x99,
                OrdComparison::NE => 0x9a,
                OrdComparison::LT => 0x9b,
                OrdComparison::GE => 0x9c,
                OrdComparison::GT => 0x9d,
                OrdComparison::LE => 0x9e,
            },
            BranchInstruction::IfICmp(comp, _) => match comp {
                OrdComparison::EQ => 0x9f,
                OrdComparison::NE => 0xa0,
                OrdComparison::LT => 0xa1,
                OrdComparison::GE => 0xa2,
                OrdComparison::GT => 0xa3,
                OrdComparison::LE => 0xa4,
            },
            BranchInstruction::IfACmp(EqComparison::EQ, _) => 0xa5,
            BranchInstruction::IfACmp(EqComparison::NE, _) => 0xa6,
            BranchInstruction::Goto(_) => 0xa7,
            BranchInstruction::TableSwitch { .. } => 0xaa,
            BranchInstruction::LookupSwitch { .. } => 0xab,
            BranchInstruction::IReturn => 0xac,
            BranchInstruction::LReturn => 0xad,
            BranchInstruction::FReturn => 0xae,
            BranchInstruction::DReturn => 0xaf,
            BranchInstruction::AReturn => 0xb0,
            BranchInstruction::Return => 0xb1,
            BranchInstruction::AThrow => 0xbf,
            BranchInstruction::IfNull(EqComparison::EQ, _) => 0xc6,
            BranchInstruction::IfNull(EqComparison::NE, _) => 0xc7,
        }
    }

    /// Labels the instruction may jump to
    pub fn jump_targets(&self) -> Vec<Label> {
        match self {
            BranchInstruction::If(_, lbl)
            | BranchInstruction::IfICmp(_, lbl)
            | BranchInstruction::IfACmp(_, lbl)
            | BranchInstruction::IfNull(_, lbl)
            | BranchInstruction::Goto(lbl) => vec![*lbl],
            BranchInstruction::TableSwitch {
                default, targets, ..
            } => {
                let mut ts = vec![*default];
                ts.extend(targets.iter().copied());
                ts
            }
            BranchInstruction::LookupSwitch {
                default, targets, ..
            } => {
                let mut ts = vec![*default];
                ts.extend(targets.iter().map(|(_, target)| *target));
                ts
            }
            BranchInstruction::IReturn
            | BranchInstruction::LReturn
            | BranchInstruction::FReturn
            | BranchInstruction::DReturn
            | BranchInstruction::AReturn
            | BranchInstruction::Return
            | BranchInstruction::AThrow => vec![],
        }
    }

    pub fn map_labels(&self, mut map_label: impl FnMut(Label) -> Label) -> BranchInstruction {
        use BranchInstruction::*;

        match self {
            If(op, lbl) => If(*op, map_label(*lbl)),
            IfICmp(op, lbl) => IfICmp(*op, map_label(*lbl)),
            IfACmp(op, lbl) => IfACmp(*op, map_label(*lbl)),
            IfNull(op, lbl) => IfNull(*op, map_label(*lbl)),
            Goto(lbl) => Goto(map_label(*lbl)),
            TableSwitch {
                default,
                low,
                targets,
            } => TableSwitch {
                default: map_label(*default),
                low: *low,
                targets: targets.iter().map(|lbl| map_label(*lbl)).collect(),
            },
            LookupSwitch { default, targets } => LookupSwitch {
                default: map_label(*default),
                targets: targets
                    .iter()
                    .map(|(key, lbl)| (*key, map_label(*lbl)))
                    .collect(),
            },
            IReturn => IReturn,
            LReturn => LReturn,
            FReturn => FReturn,
            DReturn => DReturn,
            AReturn => AReturn,
            Return => Return,
            AThrow => AThrow,
        }
    }
}

impl Number {
    /// Constant-pool form of the number
    pub fn to_constant(self) -> Constant {
        match self {
            Number::Int(i) => Constant::Integer(i),
            Number::Long(l) => Constant::Long(l),
            Number::Float(f) => Constant::Float(f),
            Number::Double(d) => Constant::Double(d),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pseudo_instructions_have_no_opcode() {
        let label = Label::fresh();
        assert_eq!(Instruction::Label(label).opcode(), None);
        assert_eq!(Instruction::LineNumber(12, label).opcode(), None);
        assert_eq!(Instruction::Nop.opcode(), Some(opcodes::NOP));
        assert_eq!(Instruction::ILoad(300).opcode(), Some(opcodes::ILOAD));
        assert_eq!(
            Instruction::Branch(BranchInstruction::Return).opcode(),
            Some(opcodes::RETURN)
        );
        assert_eq!(
            Instruction::Branch(BranchInstruction::IfNull(EqComparison::NE, label)).opcode(),
            Some(0xc7)
        );
    }

    #[test]
    fn switch_labels() {
        let (l1, l2, l3) = (Label::fresh(), Label::fresh(), Label::fresh());
        let switch = BranchInstruction::TableSwitch {
            default: l1,
            low: 4,
            targets: vec![l2, l3, l2],
        };
        assert_eq!(switch.jump_targets(), vec![l1, l2, l3, l2]);

        let replacement = Label::fresh();
        let mapped = switch.map_labels(|lbl| if lbl == l2 { replacement } else { lbl });
        assert_eq!(mapped.jump_targets(), vec![l1, replacement, l3, replacement]);
    }

    #[test]
    fn inverted_comparisons() {
        assert_eq!(!OrdComparison::LT, OrdComparison::GE);
        assert_eq!(!!OrdComparison::GT, OrdComparison::GT);
        assert_eq!(!EqComparison::EQ, EqComparison::NE);
    }
}
