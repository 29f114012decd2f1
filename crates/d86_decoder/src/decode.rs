use crate::cursor::{ByteCursor, ByteSource};
use crate::errors::{DecodeError, Result};
use crate::modrm::ModRm;
use crate::opcode::{classify, Form, Opcode, OpcodeMatch, Prefix};
use d86_instruction::{
    Address, Displacement, Immediate, Instruction, Operand, OperandSet, OperandSize, Register,
    Repeat, Segment, SizedRegister,
};

/// The longest instruction without prefixes: op code, ModR/M, 2 displacement and 2 immediate
/// bytes.
const MAX_INSTRUCTION_LEN: usize = 6;

/// Reads from a copy of the caller's source and records every byte it hands out.
struct Fetch<S> {
    source: S,
    bytes: Vec<u8>,
}

impl<S: ByteSource> Fetch<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            bytes: Vec::with_capacity(MAX_INSTRUCTION_LEN),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = self
            .source
            .read_byte()
            .ok_or(DecodeError::TruncatedInput {
                offset: 0,
                needed: 1,
            })?;
        self.bytes.push(byte);
        Ok(byte)
    }

    fn read_exact(&mut self, count: usize) -> Result<&[u8]> {
        let start = self.bytes.len();
        let bytes = self
            .source
            .read_exact(count)
            .ok_or(DecodeError::TruncatedInput {
                offset: 0,
                needed: count,
            })?;
        self.bytes.extend_from_slice(bytes);
        Ok(&self.bytes[start..])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_immediate(&mut self, operand_size: OperandSize, sign_extend: bool) -> Result<Immediate> {
        Ok(match operand_size {
            OperandSize::Byte => Immediate::Byte(self.read_u8()?),
            OperandSize::Word if sign_extend => Immediate::Word(self.read_u8()? as i8 as u16),
            OperandSize::Word => Immediate::Word(self.read_u16()?),
        })
    }

    fn read_modrm(&mut self) -> Result<ModRm> {
        ModRm::try_from_byte(self.read_u8()?)
    }

    /// The ModR/M byte read for a group, or a fresh one.
    fn modrm(&mut self, modrm: Option<ModRm>) -> Result<ModRm> {
        match modrm {
            Some(modrm) => Ok(modrm),
            None => self.read_modrm(),
        }
    }

    /// Reads exactly the displacement the ModR/M byte asks for and resolves the `r/m` operand.
    fn register_or_memory(&mut self, modrm: &ModRm, operand_size: OperandSize) -> Result<Operand> {
        let start = self.bytes.len();
        self.read_exact(modrm.displacement_len())?;
        let (operand, consumed) = modrm.resolve(operand_size, &self.bytes[start..])?;
        debug_assert_eq!(start + consumed, self.bytes.len());
        Ok(operand)
    }

    fn assemble(&mut self, first: u8, offset: usize) -> Result<Instruction> {
        let mut op_code = first;
        let mut segment_override = None;
        let mut repeat = None;
        let mut lock = false;

        let (m, mnemonic, form, modrm) = loop {
            let m = classify(op_code)?;
            match m.opcode() {
                Opcode::Prefix(prefix) => {
                    match prefix {
                        Prefix::SegmentOverride => segment_override = m.segment,
                        Prefix::Lock => lock = true,
                        Prefix::RepNe => repeat = Some(Repeat::NotEqual),
                        Prefix::Rep => repeat = Some(Repeat::Equal),
                    }
                    op_code = self.read_u8()?;
                }

                Opcode::Fixed(mnemonic) => break (m, mnemonic, m.class.form, None),

                Opcode::Group(group) => {
                    let modrm = self.read_modrm()?;
                    let (mnemonic, form) =
                        group
                            .resolve(modrm.reg)
                            .ok_or(DecodeError::UnknownExtension {
                                opcode: op_code,
                                sub_op: modrm.reg,
                                offset: 0,
                            })?;
                    break (m, mnemonic, form, Some(modrm));
                }
            }
        };

        let operands = self.operands(&m, form, modrm)?;

        Ok(Instruction {
            offset,
            bytes: std::mem::take(&mut self.bytes),
            mnemonic,
            operand_size: m.operand_size,
            operands,
            segment_override,
            repeat,
            lock,
        })
    }

    fn operands(&mut self, m: &OpcodeMatch, form: Form, modrm: Option<ModRm>) -> Result<OperandSet> {
        use OperandSet::{Destination, DestinationAndSource};

        let size = m.operand_size;
        let accumulator = Operand::Register(SizedRegister(Register::AlAx, size));
        let ordered = |first: Operand, second: Operand, reversed: bool| {
            if reversed {
                DestinationAndSource(second, first)
            } else {
                DestinationAndSource(first, second)
            }
        };
        let embedded_register = || {
            m.register
                .ok_or(DecodeError::InvalidEncoding { byte: m.op_code })
        };

        Ok(match form {
            Form::Implied => OperandSet::None,

            Form::RegRm => {
                let modrm = self.modrm(modrm)?;
                let register_or_memory = self.register_or_memory(&modrm, size)?;
                ordered(register_or_memory, modrm.register(size)?, m.direction)
            }

            Form::SegRm => {
                let modrm = self.modrm(modrm)?;
                let segment =
                    Segment::from_encoding(modrm.reg).ok_or(DecodeError::UnknownExtension {
                        opcode: m.op_code,
                        sub_op: modrm.reg,
                        offset: 0,
                    })?;
                let register_or_memory = self.register_or_memory(&modrm, OperandSize::Word)?;
                ordered(register_or_memory, Operand::Segment(segment), m.direction)
            }

            Form::Rm => {
                let modrm = self.modrm(modrm)?;
                Destination(self.register_or_memory(&modrm, size)?)
            }

            Form::RmImm => {
                let modrm = self.modrm(modrm)?;
                let register_or_memory = self.register_or_memory(&modrm, size)?;
                let immediate = self.read_immediate(size, m.sign_extend)?;
                DestinationAndSource(register_or_memory, Operand::Immediate(immediate))
            }

            Form::RmCount => {
                let modrm = self.modrm(modrm)?;
                let register_or_memory = self.register_or_memory(&modrm, size)?;
                let count = if m.direction {
                    Operand::Register(SizedRegister(Register::ClCx, OperandSize::Byte))
                } else {
                    Operand::Immediate(Immediate::Byte(1))
                };
                DestinationAndSource(register_or_memory, count)
            }

            Form::AccImm => DestinationAndSource(
                accumulator,
                Operand::Immediate(self.read_immediate(size, false)?),
            ),

            Form::RegImm => DestinationAndSource(
                Operand::Register(SizedRegister(embedded_register()?, size)),
                Operand::Immediate(self.read_immediate(size, false)?),
            ),

            Form::Reg => Destination(Operand::Register(SizedRegister(
                embedded_register()?,
                OperandSize::Word,
            ))),

            Form::AccReg => DestinationAndSource(
                accumulator,
                Operand::Register(SizedRegister(embedded_register()?, OperandSize::Word)),
            ),

            Form::Seg => Destination(Operand::Segment(
                m.segment
                    .ok_or(DecodeError::InvalidEncoding { byte: m.op_code })?,
            )),

            Form::AccMem => ordered(accumulator, Operand::Direct(self.read_u16()?), m.direction),

            Form::AccPort => ordered(
                accumulator,
                Operand::Immediate(Immediate::Byte(self.read_u8()?)),
                m.direction,
            ),

            Form::AccDx => ordered(
                accumulator,
                Operand::Register(SizedRegister(Register::DlDx, OperandSize::Word)),
                m.direction,
            ),

            Form::Rel8 => Destination(Operand::Relative(Displacement::Byte(self.read_u8()? as i8))),

            Form::Rel16 => {
                Destination(Operand::Relative(Displacement::Word(self.read_u16()? as i16)))
            }

            Form::Far => {
                let offset = self.read_u16()?;
                let segment = self.read_u16()?;
                Destination(Operand::Far(Address::new(segment, offset)))
            }

            Form::Imm8 => Destination(Operand::Immediate(Immediate::Byte(self.read_u8()?))),

            Form::Imm16 => Destination(Operand::Immediate(Immediate::Word(self.read_u16()?))),

            Form::Esc => {
                let modrm = self.modrm(modrm)?;
                let external = (m.op_code & 0b111) << 3 | modrm.reg;
                let register_or_memory = self.register_or_memory(&modrm, OperandSize::Word)?;
                DestinationAndSource(
                    Operand::Immediate(Immediate::Byte(external)),
                    register_or_memory,
                )
            }
        })
    }
}

/// Decode the instruction at the current position of `source`, prefixes included.
///
/// Decoding works on a copy of `source` that is only written back when the whole instruction
/// was decoded, so on failure `source` still points at the first byte of the instruction.
/// Error offsets are positions in `source`.
pub fn decode_instruction<S>(source: &mut S) -> Result<Instruction>
where
    S: ByteSource + Clone,
{
    let offset = source.position();
    let mut fetch = Fetch::new(source.clone());

    let first = fetch.source.read_byte().ok_or(DecodeError::EndOfStream)?;
    fetch.bytes.push(first);

    let instruction = fetch
        .assemble(first, offset)
        .map_err(|err| err.at(offset))?;

    *source = fetch.source;
    Ok(instruction)
}

/// Decodes a buffer loaded at `origin`, one instruction at a time. Offsets in instructions and
/// errors include the origin and wrap around at `usize::MAX`.
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    origin: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_origin(data, 0)
    }

    pub fn with_origin(data: &'a [u8], origin: usize) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            origin,
        }
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Offset of the next instruction.
    pub fn offset(&self) -> usize {
        self.origin.wrapping_add(self.cursor.position())
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Decode the next instruction. On failure nothing is consumed; use [Decoder::skip_byte]
    /// to move past bytes that do not decode.
    pub fn decode_one(&mut self) -> Result<Instruction> {
        let offset = self.offset();
        let mut instruction = decode_instruction(&mut self.cursor).map_err(|err| err.at(offset))?;
        instruction.offset = offset;
        Ok(instruction)
    }

    pub fn skip_byte(&mut self) -> Option<u8> {
        self.cursor.read_byte()
    }
}

#[cfg(test)]
#[path = "_tests/decode.rs"]
mod tests;
