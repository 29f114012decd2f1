use crate::errors::{DecodeError, Result};
use crate::TryFromEncoding;
use d86_instruction::{AddressingMode, Displacement, Operand, OperandSize, Register, SizedRegister};

/// The `mod` field of a ModR/M byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `00`: memory without displacement, or a direct address when `r/m` is `110`.
    Memory,
    /// `01`: memory with a sign-extended 8-bit displacement.
    MemoryByteDisplacement,
    /// `10`: memory with a 16-bit displacement.
    MemoryWordDisplacement,
    /// `11`: `r/m` names a register.
    Register,
}

/// A decomposed ModR/M byte.
///
/// ```text
/// 7 6 | 5 4 3 | 2 1 0
/// mod |  reg  |  r/m
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRm {
    pub mode: Mode,
    /// A register, or the sub-op code for extension groups.
    pub reg: u8,
    pub rm: u8,
}

impl ModRm {
    pub fn new(mode: Mode, reg: u8, rm: u8) -> Self {
        Self {
            mode,
            reg: reg & 0b111,
            rm: rm & 0b111,
        }
    }

    pub fn try_from_byte(byte: u8) -> Result<Self> {
        let mode = match byte >> 6 {
            0b00 => Mode::Memory,
            0b01 => Mode::MemoryByteDisplacement,
            0b10 => Mode::MemoryWordDisplacement,
            0b11 => Mode::Register,
            _ => return Err(DecodeError::InvalidEncoding { byte }),
        };

        Ok(Self {
            mode,
            reg: (byte >> 3) & 0b111,
            rm: byte & 0b111,
        })
    }

    pub fn as_byte(&self) -> u8 {
        let mode = match self.mode {
            Mode::Memory => 0b00,
            Mode::MemoryByteDisplacement => 0b01,
            Mode::MemoryWordDisplacement => 0b10,
            Mode::Register => 0b11,
        };

        mode << 6 | self.reg << 3 | self.rm
    }

    /// `mod == 00` with `r/m == 110` is a direct address instead of `[bp]`.
    pub fn is_direct(&self) -> bool {
        self.mode == Mode::Memory && self.rm == 0b110
    }

    /// Number of bytes following the ModR/M byte that belong to the operand.
    pub fn displacement_len(&self) -> usize {
        match self.mode {
            Mode::Memory if self.is_direct() => 2,
            Mode::Memory | Mode::Register => 0,
            Mode::MemoryByteDisplacement => 1,
            Mode::MemoryWordDisplacement => 2,
        }
    }

    /// The `reg` field as a register operand.
    pub fn register(&self, operand_size: OperandSize) -> Result<Operand> {
        Ok(Operand::Register(SizedRegister(
            Register::try_from_encoding(self.reg)?,
            operand_size,
        )))
    }

    /// Resolve the `r/m` field into an operand. `trailing` holds the bytes that follow the
    /// ModR/M byte; only the first [ModRm::displacement_len] of them are used, and that count
    /// is returned along with the operand. The caller owns the stream position.
    pub fn resolve(&self, operand_size: OperandSize, trailing: &[u8]) -> Result<(Operand, usize)> {
        let needed = self.displacement_len();
        let trailing = trailing
            .get(..needed)
            .ok_or(DecodeError::TruncatedInput { offset: 0, needed })?;

        let operand = match self.mode {
            Mode::Register => Operand::Register(SizedRegister(
                Register::try_from_encoding(self.rm)?,
                operand_size,
            )),

            Mode::Memory if self.is_direct() => {
                Operand::Direct(u16::from_le_bytes([trailing[0], trailing[1]]))
            }

            Mode::Memory => Operand::Indirect(
                AddressingMode::try_from_encoding(self.rm)?,
                Displacement::None,
            ),

            Mode::MemoryByteDisplacement => Operand::Indirect(
                AddressingMode::try_from_encoding(self.rm)?,
                Displacement::Byte(trailing[0] as i8),
            ),

            Mode::MemoryWordDisplacement => Operand::Indirect(
                AddressingMode::try_from_encoding(self.rm)?,
                Displacement::Word(i16::from_le_bytes([trailing[0], trailing[1]])),
            ),
        };

        Ok((operand, needed))
    }
}

/// Resolve a raw ModR/M byte. See [ModRm::resolve].
pub fn resolve(
    modrm_byte: u8,
    operand_size: OperandSize,
    trailing: &[u8],
) -> Result<(Operand, usize)> {
    ModRm::try_from_byte(modrm_byte)?.resolve(operand_size, trailing)
}
