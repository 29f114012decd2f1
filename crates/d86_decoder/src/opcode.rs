use crate::errors::{DecodeError, Result};
use crate::TryFromEncoding;
use bitflags::bitflags;
use d86_instruction::{Mnemonic, OperandSize, Register, Segment};

bitflags! {
    /// The bit fields an op code class carries in its first byte.
    pub struct Fields: u8 {
        /// `d` (or `v` for shifts), bit 1.
        const DIRECTION = 0b0000_0001;
        /// `w`, bit 0.
        const WIDTH = 0b0000_0010;
        /// `w`, bit 3 (`mov reg, imm`).
        const WIDTH_HIGH = 0b0000_0100;
        /// `s`, bit 1.
        const SIGN_EXTEND = 0b0000_1000;
        /// A register in bits 2-0.
        const REGISTER = 0b0001_0000;
        /// A segment register in bits 4-3.
        const SEGMENT = 0b0010_0000;

        const DIRECTION_AND_WIDTH = Self::DIRECTION.bits() | Self::WIDTH.bits();
        const SIGN_EXTEND_AND_WIDTH = Self::SIGN_EXTEND.bits() | Self::WIDTH.bits();
        const REGISTER_AND_WIDTH_HIGH = Self::REGISTER.bits() | Self::WIDTH_HIGH.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    SegmentOverride,
    Lock,
    RepNe,
    Rep,
}

/// Op codes that take their mnemonic from the `reg` field of the ModR/M byte that follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    /// `0x80-0x83`
    Immediate,
    /// `0xD0-0xD3`
    Shift,
    /// `0xF6/0xF7`
    Unary,
    /// `0xFE`
    IncDec,
    /// `0xFF`
    Indirect,
    /// `0x8F`
    Pop,
    /// `0xC6/0xC7`
    Move,
}

impl Group {
    /// The mnemonic and operand form selected by `sub_op`, or `None` if the group leaves it
    /// undefined.
    pub fn resolve(self, sub_op: u8) -> Option<(Mnemonic, Form)> {
        use Mnemonic::*;

        const IMMEDIATE: [Mnemonic; 8] = [Add, Or, Adc, Sbb, And, Sub, Xor, Cmp];
        const SHIFT: [Option<Mnemonic>; 8] = [
            Some(Rol),
            Some(Ror),
            Some(Rcl),
            Some(Rcr),
            Some(Shl),
            Some(Shr),
            None,
            Some(Sar),
        ];
        const INDIRECT: [Option<Mnemonic>; 8] = [
            Some(Inc),
            Some(Dec),
            Some(Call),
            Some(CallFar),
            Some(Jmp),
            Some(JmpFar),
            Some(Push),
            None,
        ];

        let sub_op = sub_op as usize;
        match self {
            Group::Immediate => IMMEDIATE.get(sub_op).map(|&m| (m, Form::RmImm)),
            Group::Shift => SHIFT.get(sub_op).copied().flatten().map(|m| (m, Form::RmCount)),
            Group::Unary => match sub_op {
                0 => Some((Test, Form::RmImm)),
                2 => Some((Not, Form::Rm)),
                3 => Some((Neg, Form::Rm)),
                4 => Some((Mul, Form::Rm)),
                5 => Some((Imul, Form::Rm)),
                6 => Some((Div, Form::Rm)),
                7 => Some((Idiv, Form::Rm)),
                _ => None,
            },
            Group::IncDec => match sub_op {
                0 => Some((Inc, Form::Rm)),
                1 => Some((Dec, Form::Rm)),
                _ => None,
            },
            Group::Indirect => INDIRECT.get(sub_op).copied().flatten().map(|m| (m, Form::Rm)),
            Group::Pop => (sub_op == 0).then(|| (Pop, Form::Rm)),
            Group::Move => (sub_op == 0).then(|| (Mov, Form::RmImm)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Fixed(Mnemonic),
    Group(Group),
    Prefix(Prefix),
}

/// How the operands of an instruction are laid out after its op code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    /// No operands.
    Implied,
    /// Register from `reg`, register or memory from `r/m`, ordered by `d`.
    RegRm,
    /// Segment register from `reg`, register or memory from `r/m`, ordered by `d`.
    SegRm,
    /// A single register or memory operand.
    Rm,
    /// Register or memory, then an immediate.
    RmImm,
    /// Register or memory, then a shift count of 1 or `cl` (selected by `v`).
    RmCount,
    /// Accumulator, then an immediate.
    AccImm,
    /// Register embedded in the op code, then an immediate.
    RegImm,
    /// Register embedded in the op code.
    Reg,
    /// `ax` and a register embedded in the op code.
    AccReg,
    /// Segment register embedded in the op code.
    Seg,
    /// Accumulator and a direct memory address, ordered by `d`.
    AccMem,
    /// Accumulator and an 8-bit port number.
    AccPort,
    /// Accumulator and the port in `dx`.
    AccDx,
    /// 8-bit relative offset.
    Rel8,
    /// 16-bit relative offset.
    Rel16,
    /// `offset:segment` pointer.
    Far,
    Imm8,
    Imm16,
    /// Coprocessor op code from the op code and `reg`, then register or memory.
    Esc,
}

impl Form {
    pub fn needs_modrm(self) -> bool {
        matches!(
            self,
            Form::RegRm | Form::SegRm | Form::Rm | Form::RmImm | Form::RmCount | Form::Esc
        )
    }
}

/// A rule in [OPCODE_TABLE]. A byte belongs to the class when `byte & mask == value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeClass {
    pub mask: u8,
    pub value: u8,
    pub opcode: Opcode,
    pub fields: Fields,
    pub form: Form,
    /// Size used when the class has no width field.
    pub operand_size: OperandSize,
    /// Operand order used when the class has no direction field.
    pub direction: bool,
}

impl OpcodeClass {
    const fn new(mask: u8, value: u8, opcode: Opcode, form: Form) -> Self {
        Self {
            mask,
            value,
            opcode,
            fields: Fields::empty(),
            form,
            operand_size: OperandSize::Word,
            direction: false,
        }
    }

    const fn with(self, fields: Fields) -> Self {
        Self { fields, ..self }
    }

    const fn byte(self) -> Self {
        Self {
            operand_size: OperandSize::Byte,
            ..self
        }
    }

    const fn reversed(self) -> Self {
        Self {
            direction: true,
            ..self
        }
    }

    pub fn matches(&self, op_code: u8) -> bool {
        op_code & self.mask == self.value
    }

    pub fn needs_modrm(&self) -> bool {
        matches!(self.opcode, Opcode::Group(_)) || self.form.needs_modrm()
    }

    fn extract(&'static self, op_code: u8) -> Result<OpcodeMatch> {
        let bit = |n: u8| op_code >> n & 1 == 1;
        let size = |wide: bool| {
            if wide {
                OperandSize::Word
            } else {
                OperandSize::Byte
            }
        };

        let direction = if self.fields.contains(Fields::DIRECTION) {
            bit(1)
        } else {
            self.direction
        };

        let operand_size = if self.fields.contains(Fields::WIDTH) {
            size(bit(0))
        } else if self.fields.contains(Fields::WIDTH_HIGH) {
            size(bit(3))
        } else {
            self.operand_size
        };

        let register = if self.fields.contains(Fields::REGISTER) {
            Some(Register::try_from_encoding(op_code & 0b111)?)
        } else {
            None
        };

        let segment = if self.fields.contains(Fields::SEGMENT) {
            Some(Segment::try_from_encoding(op_code >> 3 & 0b11)?)
        } else {
            None
        };

        Ok(OpcodeMatch {
            op_code,
            class: self,
            direction,
            operand_size,
            sign_extend: self.fields.contains(Fields::SIGN_EXTEND) && bit(1),
            register,
            segment,
        })
    }
}

/// The result of classifying a first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeMatch {
    pub op_code: u8,
    pub class: &'static OpcodeClass,
    /// `true` when the `reg` (or accumulator) operand comes first.
    pub direction: bool,
    pub operand_size: OperandSize,
    pub sign_extend: bool,
    pub register: Option<Register>,
    pub segment: Option<Segment>,
}

impl OpcodeMatch {
    pub fn opcode(&self) -> Opcode {
        self.class.opcode
    }

    pub fn needs_modrm(&self) -> bool {
        self.class.needs_modrm()
    }
}

const fn fixed(mask: u8, value: u8, mnemonic: Mnemonic, form: Form) -> OpcodeClass {
    OpcodeClass::new(mask, value, Opcode::Fixed(mnemonic), form)
}

const fn exact(value: u8, mnemonic: Mnemonic, form: Form) -> OpcodeClass {
    fixed(0xFF, value, mnemonic, form)
}

const fn group(mask: u8, value: u8, group: Group) -> OpcodeClass {
    OpcodeClass::new(mask, value, Opcode::Group(group), Form::Rm)
}

const fn prefix(mask: u8, value: u8, prefix: Prefix) -> OpcodeClass {
    OpcodeClass::new(mask, value, Opcode::Prefix(prefix), Form::Implied)
}

/// Arithmetic `00ooo0dw` (register with register/memory) and `00ooo10w` (immediate to
/// accumulator).
macro_rules! arithmetic {
    ($op:expr, $mnemonic:expr) => {
        [
            fixed(0xFC, $op << 3, $mnemonic, Form::RegRm).with(Fields::DIRECTION_AND_WIDTH),
            fixed(0xFE, $op << 3 | 0b100, $mnemonic, Form::AccImm).with(Fields::WIDTH),
        ]
    };
}

const D: Fields = Fields::DIRECTION_AND_WIDTH;
const W: Fields = Fields::WIDTH;

use Mnemonic as M;

const ADD: [OpcodeClass; 2] = arithmetic!(0b000, M::Add);
const OR: [OpcodeClass; 2] = arithmetic!(0b001, M::Or);
const ADC: [OpcodeClass; 2] = arithmetic!(0b010, M::Adc);
const SBB: [OpcodeClass; 2] = arithmetic!(0b011, M::Sbb);
const AND: [OpcodeClass; 2] = arithmetic!(0b100, M::And);
const SUB: [OpcodeClass; 2] = arithmetic!(0b101, M::Sub);
const XOR: [OpcodeClass; 2] = arithmetic!(0b110, M::Xor);
const CMP: [OpcodeClass; 2] = arithmetic!(0b111, M::Cmp);

/// Every op code class of the 8086, tested in order. The first rule that matches wins, so
/// exact rules come before the wider patterns they carve out of.
pub static OPCODE_TABLE: &[OpcodeClass] = &[
    // Exact op codes.
    exact(0x27, M::Daa, Form::Implied).byte(),
    exact(0x2F, M::Das, Form::Implied).byte(),
    exact(0x37, M::Aaa, Form::Implied).byte(),
    exact(0x3F, M::Aas, Form::Implied).byte(),
    exact(0x70, M::Jo, Form::Rel8),
    exact(0x71, M::Jno, Form::Rel8),
    exact(0x72, M::Jb, Form::Rel8),
    exact(0x73, M::Jnb, Form::Rel8),
    exact(0x74, M::Je, Form::Rel8),
    exact(0x75, M::Jne, Form::Rel8),
    exact(0x76, M::Jbe, Form::Rel8),
    exact(0x77, M::Jnbe, Form::Rel8),
    exact(0x78, M::Js, Form::Rel8),
    exact(0x79, M::Jns, Form::Rel8),
    exact(0x7A, M::Jp, Form::Rel8),
    exact(0x7B, M::Jnp, Form::Rel8),
    exact(0x7C, M::Jl, Form::Rel8),
    exact(0x7D, M::Jnl, Form::Rel8),
    exact(0x7E, M::Jle, Form::Rel8),
    exact(0x7F, M::Jnle, Form::Rel8),
    exact(0x8D, M::Lea, Form::RegRm).reversed(),
    group(0xFF, 0x8F, Group::Pop),
    exact(0x90, M::Nop, Form::Implied),
    exact(0x98, M::Cbw, Form::Implied),
    exact(0x99, M::Cwd, Form::Implied),
    exact(0x9A, M::Call, Form::Far),
    exact(0x9B, M::Wait, Form::Implied),
    exact(0x9C, M::Pushf, Form::Implied),
    exact(0x9D, M::Popf, Form::Implied),
    exact(0x9E, M::Sahf, Form::Implied).byte(),
    exact(0x9F, M::Lahf, Form::Implied).byte(),
    exact(0xC2, M::Ret, Form::Imm16),
    exact(0xC3, M::Ret, Form::Implied),
    exact(0xC4, M::Les, Form::RegRm).reversed(),
    exact(0xC5, M::Lds, Form::RegRm).reversed(),
    exact(0xCA, M::Retf, Form::Imm16),
    exact(0xCB, M::Retf, Form::Implied),
    exact(0xCC, M::Int3, Form::Implied),
    exact(0xCD, M::Int, Form::Imm8),
    exact(0xCE, M::Into, Form::Implied),
    exact(0xCF, M::Iret, Form::Implied),
    exact(0xD4, M::Aam, Form::Imm8).byte(),
    exact(0xD5, M::Aad, Form::Imm8).byte(),
    exact(0xD6, M::Salc, Form::Implied).byte(),
    exact(0xD7, M::Xlat, Form::Implied).byte(),
    exact(0xE0, M::Loopnz, Form::Rel8),
    exact(0xE1, M::Loopz, Form::Rel8),
    exact(0xE2, M::Loop, Form::Rel8),
    exact(0xE3, M::Jcxz, Form::Rel8),
    exact(0xE8, M::Call, Form::Rel16),
    exact(0xE9, M::Jmp, Form::Rel16),
    exact(0xEA, M::Jmp, Form::Far),
    exact(0xEB, M::Jmp, Form::Rel8),
    prefix(0xFF, 0xF0, Prefix::Lock),
    prefix(0xFF, 0xF2, Prefix::RepNe),
    prefix(0xFF, 0xF3, Prefix::Rep),
    exact(0xF4, M::Hlt, Form::Implied),
    exact(0xF5, M::Cmc, Form::Implied),
    exact(0xF8, M::Clc, Form::Implied),
    exact(0xF9, M::Stc, Form::Implied),
    exact(0xFA, M::Cli, Form::Implied),
    exact(0xFB, M::Sti, Form::Implied),
    exact(0xFC, M::Cld, Form::Implied),
    exact(0xFD, M::Std, Form::Implied),
    group(0xFF, 0xFE, Group::IncDec).with(W),
    group(0xFF, 0xFF, Group::Indirect).with(W),
    // Byte/word pairs.
    fixed(0xFE, 0x84, M::Test, Form::RegRm).with(W),
    fixed(0xFE, 0x86, M::Xchg, Form::RegRm).with(W),
    fixed(0xFE, 0xA4, M::Movs, Form::Implied).with(W),
    fixed(0xFE, 0xA6, M::Cmps, Form::Implied).with(W),
    fixed(0xFE, 0xA8, M::Test, Form::AccImm).with(W),
    fixed(0xFE, 0xAA, M::Stos, Form::Implied).with(W),
    fixed(0xFE, 0xAC, M::Lods, Form::Implied).with(W),
    fixed(0xFE, 0xAE, M::Scas, Form::Implied).with(W),
    group(0xFE, 0xC6, Group::Move).with(W),
    fixed(0xFE, 0xE4, M::In, Form::AccPort).with(W),
    fixed(0xFE, 0xE6, M::Out, Form::AccPort).with(W).reversed(),
    fixed(0xFE, 0xEC, M::In, Form::AccDx).with(W),
    fixed(0xFE, 0xEE, M::Out, Form::AccDx).with(W).reversed(),
    group(0xFE, 0xF6, Group::Unary).with(W),
    // mov sreg, r/m16 and mov r/m16, sreg
    fixed(0xFD, 0x8C, M::Mov, Form::SegRm).with(Fields::DIRECTION),
    // Direction and width.
    group(0xFC, 0x80, Group::Immediate).with(Fields::SIGN_EXTEND_AND_WIDTH),
    fixed(0xFC, 0x88, M::Mov, Form::RegRm).with(D),
    fixed(0xFC, 0xA0, M::Mov, Form::AccMem).with(D),
    group(0xFC, 0xD0, Group::Shift).with(D),
    ADD[0],
    ADD[1],
    OR[0],
    OR[1],
    ADC[0],
    ADC[1],
    SBB[0],
    SBB[1],
    AND[0],
    AND[1],
    SUB[0],
    SUB[1],
    XOR[0],
    XOR[1],
    CMP[0],
    CMP[1],
    // Register embedded in the op code.
    fixed(0xF8, 0x40, M::Inc, Form::Reg).with(Fields::REGISTER),
    fixed(0xF8, 0x48, M::Dec, Form::Reg).with(Fields::REGISTER),
    fixed(0xF8, 0x50, M::Push, Form::Reg).with(Fields::REGISTER),
    fixed(0xF8, 0x58, M::Pop, Form::Reg).with(Fields::REGISTER),
    fixed(0xF8, 0x90, M::Xchg, Form::AccReg).with(Fields::REGISTER),
    fixed(0xF8, 0xD8, M::Esc, Form::Esc),
    fixed(0xF0, 0xB0, M::Mov, Form::RegImm).with(Fields::REGISTER_AND_WIDTH_HIGH),
    // Segment register embedded in the op code.
    fixed(0xE7, 0x06, M::Push, Form::Seg).with(Fields::SEGMENT),
    fixed(0xE7, 0x07, M::Pop, Form::Seg).with(Fields::SEGMENT),
    prefix(0xE7, 0x26, Prefix::SegmentOverride).with(Fields::SEGMENT),
];

/// Classify the first byte of an instruction. The offset of an [DecodeError::UnknownOpcode]
/// is left at 0 for the caller to fill in.
pub fn classify(op_code: u8) -> Result<OpcodeMatch> {
    OPCODE_TABLE
        .iter()
        .find(|class| class.matches(op_code))
        .ok_or(DecodeError::UnknownOpcode {
            opcode: op_code,
            offset: 0,
        })?
        .extract(op_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNDEFINED: [u8; 21] = [
        0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E,
        0x6F, 0xC0, 0xC1, 0xC8, 0xC9, 0xF1,
    ];

    macro_rules! test_classify {
        ($op_code:expr, $opcode:expr, $form:expr, $operand_size:expr) => {{
            let m = classify($op_code).unwrap();
            assert_eq!(m.opcode(), $opcode, "op code {:#04x}", $op_code);
            assert_eq!(m.class.form, $form, "op code {:#04x}", $op_code);
            assert_eq!(m.operand_size, $operand_size, "op code {:#04x}", $op_code);
            m
        }};
    }

    #[test]
    fn every_byte_classifies_or_is_unknown() {
        for op_code in 0..=u8::MAX {
            match classify(op_code) {
                Ok(m) => {
                    assert!(!UNDEFINED.contains(&op_code), "{:#04x}", op_code);
                    assert_eq!(m.op_code, op_code);
                }
                Err(err) => {
                    assert!(UNDEFINED.contains(&op_code), "{:#04x}", op_code);
                    assert_eq!(
                        err,
                        DecodeError::UnknownOpcode {
                            opcode: op_code,
                            offset: 0
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn every_rule_is_reachable() {
        for (index, class) in OPCODE_TABLE.iter().enumerate() {
            let reachable = (0..=u8::MAX).any(|op_code| {
                OPCODE_TABLE
                    .iter()
                    .position(|c| c.matches(op_code))
                    .map_or(false, |first| first == index)
            });
            assert!(reachable, "rule {} ({:?}) is shadowed", index, class);
        }
    }

    #[test]
    fn composite_fields() {
        assert_eq!(Fields::DIRECTION_AND_WIDTH, Fields::DIRECTION | Fields::WIDTH);
        assert_eq!(Fields::SIGN_EXTEND_AND_WIDTH, Fields::SIGN_EXTEND | Fields::WIDTH);
        assert_eq!(Fields::REGISTER_AND_WIDTH_HIGH, Fields::REGISTER | Fields::WIDTH_HIGH);
    }

    #[test]
    fn inc_register() {
        let m = test_classify!(0x40, Opcode::Fixed(Mnemonic::Inc), Form::Reg, OperandSize::Word);
        assert_eq!(m.register, Some(Register::AlAx));
        assert!(!m.needs_modrm());

        let m = classify(0x4F).unwrap();
        assert_eq!(m.opcode(), Opcode::Fixed(Mnemonic::Dec));
        assert_eq!(m.register, Some(Register::BhDi));
    }

    #[test]
    fn immediate_group() {
        let m = test_classify!(
            0x80,
            Opcode::Group(Group::Immediate),
            Form::Rm,
            OperandSize::Byte
        );
        assert!(m.needs_modrm());
        assert!(!m.sign_extend);
        assert_eq!(Group::Immediate.resolve(0), Some((Mnemonic::Add, Form::RmImm)));
        assert_eq!(Group::Immediate.resolve(7), Some((Mnemonic::Cmp, Form::RmImm)));

        let m = classify(0x83).unwrap();
        assert_eq!(m.operand_size, OperandSize::Word);
        assert!(m.sign_extend);

        let m = classify(0x81).unwrap();
        assert_eq!(m.operand_size, OperandSize::Word);
        assert!(!m.sign_extend);

        let m = classify(0x82).unwrap();
        assert_eq!(m.operand_size, OperandSize::Byte);
        assert!(m.sign_extend);
    }

    #[test]
    fn direction_and_width() {
        let m = test_classify!(0x00, Opcode::Fixed(Mnemonic::Add), Form::RegRm, OperandSize::Byte);
        assert!(!m.direction);

        let m = test_classify!(0x03, Opcode::Fixed(Mnemonic::Add), Form::RegRm, OperandSize::Word);
        assert!(m.direction);

        let m = test_classify!(0x8A, Opcode::Fixed(Mnemonic::Mov), Form::RegRm, OperandSize::Byte);
        assert!(m.direction);

        test_classify!(0x3D, Opcode::Fixed(Mnemonic::Cmp), Form::AccImm, OperandSize::Word);
        test_classify!(0x2C, Opcode::Fixed(Mnemonic::Sub), Form::AccImm, OperandSize::Byte);
    }

    #[test]
    fn fixed_operand_order() {
        assert!(classify(0x8D).unwrap().direction);
        assert!(classify(0xC4).unwrap().direction);
        assert!(!classify(0x85).unwrap().direction);
        assert!(!classify(0x87).unwrap().direction);
        assert!(!classify(0xE4).unwrap().direction);
        assert!(classify(0xE6).unwrap().direction);
    }

    #[test]
    fn mov_register_immediate_width_is_bit_3() {
        let m = test_classify!(0xB4, Opcode::Fixed(Mnemonic::Mov), Form::RegImm, OperandSize::Byte);
        assert_eq!(m.register, Some(Register::AhSp));

        let m = test_classify!(0xBC, Opcode::Fixed(Mnemonic::Mov), Form::RegImm, OperandSize::Word);
        assert_eq!(m.register, Some(Register::AhSp));
    }

    #[test]
    fn segment_registers() {
        let m = test_classify!(0x1E, Opcode::Fixed(Mnemonic::Push), Form::Seg, OperandSize::Word);
        assert_eq!(m.segment, Some(Segment::DS));

        let m = test_classify!(0x0F, Opcode::Fixed(Mnemonic::Pop), Form::Seg, OperandSize::Word);
        assert_eq!(m.segment, Some(Segment::CS));

        let m = classify(0x36).unwrap();
        assert_eq!(m.opcode(), Opcode::Prefix(Prefix::SegmentOverride));
        assert_eq!(m.segment, Some(Segment::SS));

        let m = test_classify!(0x8E, Opcode::Fixed(Mnemonic::Mov), Form::SegRm, OperandSize::Word);
        assert!(m.direction);
        assert!(!classify(0x8C).unwrap().direction);
    }

    #[test]
    fn nop_before_xchg() {
        test_classify!(0x90, Opcode::Fixed(Mnemonic::Nop), Form::Implied, OperandSize::Word);
        let m = test_classify!(0x93, Opcode::Fixed(Mnemonic::Xchg), Form::AccReg, OperandSize::Word);
        assert_eq!(m.register, Some(Register::BlBx));
    }

    #[test]
    fn prefixes() {
        assert_eq!(classify(0xF0).unwrap().opcode(), Opcode::Prefix(Prefix::Lock));
        assert_eq!(classify(0xF2).unwrap().opcode(), Opcode::Prefix(Prefix::RepNe));
        assert_eq!(classify(0xF3).unwrap().opcode(), Opcode::Prefix(Prefix::Rep));
    }

    #[test]
    fn groups() {
        assert_eq!(Group::Shift.resolve(4), Some((Mnemonic::Shl, Form::RmCount)));
        assert_eq!(Group::Shift.resolve(6), None);
        assert_eq!(Group::Unary.resolve(0), Some((Mnemonic::Test, Form::RmImm)));
        assert_eq!(Group::Unary.resolve(1), None);
        assert_eq!(Group::Unary.resolve(3), Some((Mnemonic::Neg, Form::Rm)));
        assert_eq!(Group::IncDec.resolve(1), Some((Mnemonic::Dec, Form::Rm)));
        assert_eq!(Group::IncDec.resolve(2), None);
        assert_eq!(Group::Indirect.resolve(3), Some((Mnemonic::CallFar, Form::Rm)));
        assert_eq!(Group::Indirect.resolve(7), None);
        assert_eq!(Group::Pop.resolve(0), Some((Mnemonic::Pop, Form::Rm)));
        assert_eq!(Group::Pop.resolve(1), None);
        assert_eq!(Group::Move.resolve(0), Some((Mnemonic::Mov, Form::RmImm)));

        assert_eq!(classify(0xFE).unwrap().operand_size, OperandSize::Byte);
        assert_eq!(classify(0xFF).unwrap().operand_size, OperandSize::Word);
        assert!(classify(0xD2).unwrap().direction);
    }
}
