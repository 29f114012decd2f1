use crate::{Address, Segment, SizedRegister};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSize {
    Byte,
    Word,
}

impl Display for OperandSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSize::Byte => f.write_str("byte"),
            OperandSize::Word => f.write_str("word"),
        }
    }
}

const EFFECTIVE_ADDRESSES: [&str; 8] = ["bx+si", "bx+di", "bp+si", "bp+di", "si", "di", "bp", "bx"];

/// The base/index combination selected by the `r/m` field of a memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Bp,
    Bx,
}

impl AddressingMode {
    const ALL: [AddressingMode; 8] = [
        AddressingMode::BxSi,
        AddressingMode::BxDi,
        AddressingMode::BpSi,
        AddressingMode::BpDi,
        AddressingMode::Si,
        AddressingMode::Di,
        AddressingMode::Bp,
        AddressingMode::Bx,
    ];

    pub fn from_encoding(encoding: u8) -> Option<Self> {
        Self::ALL.get(encoding as usize).copied()
    }

    pub fn expression(self) -> &'static str {
        EFFECTIVE_ADDRESSES[self as usize]
    }
}

impl Display for AddressingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.expression())
    }
}

/// A signed offset, either added to an effective address or relative to the instruction pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Displacement {
    None,
    Byte(i8),
    Word(i16),
}

impl Displacement {
    pub fn value(self) -> i16 {
        match self {
            Displacement::None => 0,
            Displacement::Byte(offset) => offset as i16,
            Displacement::Word(offset) => offset,
        }
    }
}

/// Writes `value` as signed hex, e.g. `+0x12` or `-0x1`.
pub(crate) fn write_signed_hex(f: &mut Formatter<'_>, value: i32) -> std::fmt::Result {
    if value < 0 {
        write!(f, "-{:#x}", value.unsigned_abs())
    } else {
        write!(f, "+{:#x}", value)
    }
}

impl Display for Displacement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Displacement::None => Ok(()),
            _ => write_signed_hex(f, self.value() as i32),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Immediate {
    Byte(u8),
    Word(u16),
}

impl Display for Immediate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Immediate::Byte(value) => write!(f, "{:#x}", value),
            Immediate::Word(value) => write!(f, "{:#x}", value),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Register(SizedRegister),
    Segment(Segment),
    /// Memory at a fixed 16-bit address.
    Direct(u16),
    /// Memory at a base/index combination plus an optional displacement.
    Indirect(AddressingMode, Displacement),
    Immediate(Immediate),
    /// Offset of a jump, call or loop target from the end of the instruction.
    Relative(Displacement),
    /// A `segment:offset` pointer encoded directly in the instruction.
    Far(Address),
}

impl Operand {
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Direct(_) | Operand::Indirect(..))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSet {
    None,
    Destination(Operand),
    DestinationAndSource(Operand, Operand),
}

impl OperandSet {
    pub fn len(&self) -> usize {
        match self {
            OperandSet::None => 0,
            OperandSet::Destination(_) => 1,
            OperandSet::DestinationAndSource(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OperandSet::None)
    }

    /// The operands in encoding order, destination first.
    pub fn iter(&self) -> impl Iterator<Item = &Operand> {
        let (first, second) = match self {
            OperandSet::None => (None, None),
            OperandSet::Destination(destination) => (Some(destination), None),
            OperandSet::DestinationAndSource(destination, source) => {
                (Some(destination), Some(source))
            }
        };
        first.into_iter().chain(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Register;

    #[test]
    fn effective_addresses() {
        let expected = ["bx+si", "bx+di", "bp+si", "bp+di", "si", "di", "bp", "bx"];
        for (encoding, expression) in expected.iter().enumerate() {
            let mode = AddressingMode::from_encoding(encoding as u8).unwrap();
            assert_eq!(mode.to_string(), *expression);
        }
        assert_eq!(AddressingMode::from_encoding(8), None);
    }

    #[test]
    fn displacement_is_signed_hex() {
        assert_eq!(Displacement::None.to_string(), "");
        assert_eq!(Displacement::Byte(0x12).to_string(), "+0x12");
        assert_eq!(Displacement::Byte(-1).to_string(), "-0x1");
        assert_eq!(Displacement::Word(0x3412).to_string(), "+0x3412");
        assert_eq!(Displacement::Word(i16::MIN).to_string(), "-0x8000");
        assert_eq!(Displacement::Byte(0).to_string(), "+0x0");
    }

    #[test]
    fn operand_set_iterates_in_order() {
        let ax = Operand::Register(SizedRegister(Register::AlAx, OperandSize::Word));
        let one = Operand::Immediate(Immediate::Byte(1));

        assert_eq!(OperandSet::None.iter().count(), 0);
        assert!(OperandSet::None.is_empty());
        assert_eq!(OperandSet::Destination(ax).len(), 1);

        let set = OperandSet::DestinationAndSource(ax, one);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![ax, one]);
    }
}
