use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// No bytes were left when a new instruction was requested. This is the normal way for a
    /// decoding pass to end.
    #[error("end of stream")]
    EndOfStream,

    #[error("unknown op code ({opcode:#04x}) at offset {offset:#x}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("op code {opcode:#04x} has no extension /{sub_op} (at offset {offset:#x})")]
    UnknownExtension {
        opcode: u8,
        sub_op: u8,
        offset: usize,
    },

    /// The stream ended in the middle of an instruction.
    #[error("instruction at offset {offset:#x} is truncated, a {needed}-byte read failed")]
    TruncatedInput { offset: usize, needed: usize },

    #[error("invalid encoding ({byte:#010b})")]
    InvalidEncoding { byte: u8 },
}

impl DecodeError {
    /// Rebase the error onto the offset of the instruction that failed. Components that only
    /// see part of an instruction report offset 0.
    pub fn at(self, offset: usize) -> Self {
        match self {
            DecodeError::UnknownOpcode { opcode, .. } => {
                DecodeError::UnknownOpcode { opcode, offset }
            }
            DecodeError::UnknownExtension { opcode, sub_op, .. } => DecodeError::UnknownExtension {
                opcode,
                sub_op,
                offset,
            },
            DecodeError::TruncatedInput { needed, .. } => {
                DecodeError::TruncatedInput { offset, needed }
            }
            err => err,
        }
    }

    /// The offset of the failing instruction, if the error is tied to one.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::UnknownExtension { offset, .. }
            | DecodeError::TruncatedInput { offset, .. } => Some(offset),
            DecodeError::EndOfStream | DecodeError::InvalidEncoding { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_offsets() {
        assert_eq!(
            DecodeError::UnknownOpcode {
                opcode: 0x60,
                offset: 0
            }
            .at(0x20),
            DecodeError::UnknownOpcode {
                opcode: 0x60,
                offset: 0x20
            }
        );
        assert_eq!(
            DecodeError::TruncatedInput {
                offset: 0,
                needed: 2
            }
            .at(7)
            .offset(),
            Some(7)
        );
        assert_eq!(DecodeError::EndOfStream.at(3), DecodeError::EndOfStream);
        assert_eq!(DecodeError::InvalidEncoding { byte: 0xFF }.at(3).offset(), None);
    }

    #[test]
    fn messages() {
        assert_eq!(
            DecodeError::UnknownOpcode {
                opcode: 0x0F,
                offset: 0x100
            }
            .to_string(),
            "unknown op code (0x0f) at offset 0x100"
        );
        assert_eq!(
            DecodeError::TruncatedInput {
                offset: 0x10,
                needed: 2
            }
            .to_string(),
            "instruction at offset 0x10 is truncated, a 2-byte read failed"
        );
    }
}
