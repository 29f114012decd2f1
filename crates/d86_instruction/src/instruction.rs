use crate::display::Within;
use crate::{Mnemonic, OperandSet, OperandSize, Segment};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Equal,
    NotEqual,
}

/// A single decoded 8086 instruction, including every prefix byte that preceded it.
///
/// ```rust
/// use d86_instruction::*;
///
/// // add byte [es:bx+si+0x8], al
/// let i = Instruction {
///     offset: 0,
///     bytes: vec![0x26, 0x00, 0x40, 0x08],
///     mnemonic: Mnemonic::Add,
///     operand_size: OperandSize::Byte,
///     operands: OperandSet::DestinationAndSource(
///         Operand::Indirect(AddressingMode::BxSi, Displacement::Byte(8)),
///         Operand::Register(SizedRegister(Register::AlAx, OperandSize::Byte)),
///     ),
///     segment_override: Some(Segment::ES),
///     repeat: None,
///     lock: false,
/// };
///
/// assert_eq!(i.len(), 4);
/// assert_eq!(i.to_string(), "add byte [es:bx+si+0x8], al");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Position of the first byte (prefixes included) in the decoded stream.
    pub offset: usize,
    /// Every byte consumed while decoding this instruction, in stream order.
    pub bytes: Vec<u8>,
    pub mnemonic: Mnemonic,
    pub operand_size: OperandSize,
    pub operands: OperandSet,
    pub segment_override: Option<Segment>,
    pub repeat: Option<Repeat>,
    pub lock: bool,
}

impl Instruction {
    /// Number of bytes the instruction occupies.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the byte directly after this instruction.
    pub fn next_offset(&self) -> usize {
        self.offset.wrapping_add(self.len())
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Within {
            item: self,
            instruction: self,
        }
        .fmt(f)
    }
}
