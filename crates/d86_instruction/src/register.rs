use crate::OperandSize;

const BYTE_REGISTER_NAMES: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
const WORD_REGISTER_NAMES: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];
const SEGMENT_NAMES: [&str; 4] = ["es", "cs", "ss", "ds"];

/// A general purpose register as it is encoded in a 3-bit `reg` or `r/m` field. Which of the
/// two names applies depends on the operand size of the instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    AlAx,
    ClCx,
    DlDx,
    BlBx,
    AhSp,
    ChBp,
    DhSi,
    BhDi,
}

impl Register {
    const ALL: [Register; 8] = [
        Register::AlAx,
        Register::ClCx,
        Register::DlDx,
        Register::BlBx,
        Register::AhSp,
        Register::ChBp,
        Register::DhSi,
        Register::BhDi,
    ];

    /// Returns the register for a 3-bit encoding, or `None` if the value does not fit in 3 bits.
    pub fn from_encoding(encoding: u8) -> Option<Self> {
        Self::ALL.get(encoding as usize).copied()
    }

    pub fn name(self, operand_size: OperandSize) -> &'static str {
        match operand_size {
            OperandSize::Byte => BYTE_REGISTER_NAMES[self as usize],
            OperandSize::Word => WORD_REGISTER_NAMES[self as usize],
        }
    }
}

/// A [Register] together with the width it is accessed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizedRegister(pub Register, pub OperandSize);

impl SizedRegister {
    pub fn name(&self) -> &'static str {
        self.0.name(self.1)
    }
}

impl std::fmt::Display for SizedRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    ES,
    CS,
    SS,
    DS,
}

impl Segment {
    const ALL: [Segment; 4] = [Segment::ES, Segment::CS, Segment::SS, Segment::DS];

    /// Returns the segment register for a 2-bit encoding.
    pub fn from_encoding(encoding: u8) -> Option<Self> {
        Self::ALL.get(encoding as usize).copied()
    }

    pub fn name(self) -> &'static str {
        SEGMENT_NAMES[self as usize]
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_names_follow_operand_size() {
        let expected = [
            ("al", "ax"),
            ("cl", "cx"),
            ("dl", "dx"),
            ("bl", "bx"),
            ("ah", "sp"),
            ("ch", "bp"),
            ("dh", "si"),
            ("bh", "di"),
        ];

        for (encoding, (byte, word)) in expected.iter().enumerate() {
            let register = Register::from_encoding(encoding as u8).unwrap();
            assert_eq!(register.name(OperandSize::Byte), *byte);
            assert_eq!(register.name(OperandSize::Word), *word);
        }

        assert_eq!(Register::from_encoding(8), None);
    }

    #[test]
    fn segment_encodings() {
        assert_eq!(Segment::from_encoding(0b00), Some(Segment::ES));
        assert_eq!(Segment::from_encoding(0b01), Some(Segment::CS));
        assert_eq!(Segment::from_encoding(0b10), Some(Segment::SS));
        assert_eq!(Segment::from_encoding(0b11), Some(Segment::DS));
        assert_eq!(Segment::from_encoding(0b100), None);
    }
}
