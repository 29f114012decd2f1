//! Decoder for 8086 machine code.
//!
//! The decoder turns a stream of bytes into [Instruction]s, one at a time. Decoding is split into
//! three steps: the first byte is classified against an ordered table of op code patterns
//! ([classify]), a ModR/M byte is resolved into a register or memory operand when the class
//! needs one ([ModRm]), and everything is assembled into an [Instruction] whose `bytes` are
//! exactly the bytes that were consumed ([decode_instruction], [Decoder]).
//!
//! ```rust
//! use d86_decoder::Decoder;
//!
//! let mut decoder = Decoder::new(&[0x40, 0x00, 0x00]);
//! assert_eq!(decoder.decode_one().unwrap().to_string(), "inc ax");
//! assert_eq!(decoder.decode_one().unwrap().to_string(), "add byte [bx+si], al");
//! assert!(decoder.is_at_end());
//! ```

mod cursor;
mod decode;
mod errors;
mod modrm;
mod opcode;

pub use cursor::{ByteCursor, ByteSource};
pub use decode::{decode_instruction, Decoder};
pub use errors::{DecodeError, Result};
pub use modrm::{resolve, Mode, ModRm};
pub use opcode::{
    classify, Fields, Form, Group, Opcode, OpcodeClass, OpcodeMatch, Prefix, OPCODE_TABLE,
};

pub use d86_instruction::Instruction;

use d86_instruction::{AddressingMode, Register, Segment};

/// Conversion from a bit field of an op code or ModR/M byte.
trait TryFromEncoding<T> {
    fn try_from_encoding(encoding: u8) -> Result<T>;
}

impl TryFromEncoding<Self> for Register {
    fn try_from_encoding(encoding: u8) -> Result<Self> {
        Register::from_encoding(encoding).ok_or(DecodeError::InvalidEncoding { byte: encoding })
    }
}

impl TryFromEncoding<Self> for Segment {
    fn try_from_encoding(encoding: u8) -> Result<Self> {
        Segment::from_encoding(encoding).ok_or(DecodeError::InvalidEncoding { byte: encoding })
    }
}

impl TryFromEncoding<Self> for AddressingMode {
    fn try_from_encoding(encoding: u8) -> Result<Self> {
        AddressingMode::from_encoding(encoding)
            .ok_or(DecodeError::InvalidEncoding { byte: encoding })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodings_out_of_range_are_invalid() {
        assert_eq!(
            Register::try_from_encoding(0b1000),
            Err(DecodeError::InvalidEncoding { byte: 0b1000 })
        );
        assert_eq!(
            Segment::try_from_encoding(0b100),
            Err(DecodeError::InvalidEncoding { byte: 0b100 })
        );
        assert_eq!(
            AddressingMode::try_from_encoding(77),
            Err(DecodeError::InvalidEncoding { byte: 77 })
        );
        assert_eq!(Register::try_from_encoding(0b111), Ok(Register::BhDi));
    }
}
