use crate::operand::write_signed_hex;
use crate::{Instruction, Operand, OperandSize, Repeat};
use std::fmt::{Display, Formatter};

/// Renders an item with the instruction it belongs to as context. Operands need it for the
/// width marker, the segment override and the instruction length.
pub(crate) struct Within<'a, I> {
    pub item: &'a I,
    pub instruction: &'a Instruction,
}

impl Display for Within<'_, Instruction> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let instruction = self.item;

        if instruction.lock {
            "lock ".fmt(f)?;
        }

        match instruction.repeat {
            Some(Repeat::Equal) => "rep ".fmt(f)?,
            Some(Repeat::NotEqual) => "repne ".fmt(f)?,
            None => {}
        }

        // An override without a memory operand applies to an implied one (string instructions).
        if let Some(segment) = instruction.segment_override {
            if !instruction.operands.iter().any(Operand::is_memory) {
                write!(f, "{}: ", segment)?;
            }
        }

        instruction.mnemonic.fmt(f)?;
        if instruction.mnemonic.is_string() {
            match instruction.operand_size {
                OperandSize::Byte => "b".fmt(f)?,
                OperandSize::Word => "w".fmt(f)?,
            }
        }

        for (index, operand) in instruction.operands.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            Within {
                item: operand,
                instruction,
            }
            .fmt(f)?;
        }

        Ok(())
    }
}

impl Within<'_, Operand> {
    fn write_memory_prefix(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.instruction.mnemonic.takes_address() {
            write!(f, "{} ", self.instruction.operand_size)?;
        }
        "[".fmt(f)?;
        if let Some(segment) = self.instruction.segment_override {
            write!(f, "{}:", segment)?;
        }
        Ok(())
    }
}

impl Display for Within<'_, Operand> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.item {
            Operand::Register(register) => register.fmt(f),

            Operand::Segment(segment) => segment.fmt(f),

            Operand::Direct(address) => {
                self.write_memory_prefix(f)?;
                write!(f, "{:#06x}]", address)
            }

            Operand::Indirect(mode, displacement) => {
                self.write_memory_prefix(f)?;
                write!(f, "{}{}]", mode, displacement)
            }

            Operand::Immediate(immediate) => immediate.fmt(f),

            // Relative to the start of the instruction, the way `$` works in an assembler.
            Operand::Relative(displacement) => {
                "$".fmt(f)?;
                write_signed_hex(
                    f,
                    displacement.value() as i32 + self.instruction.len() as i32,
                )
            }

            Operand::Far(address) => address.fmt(f),
        }
    }
}
