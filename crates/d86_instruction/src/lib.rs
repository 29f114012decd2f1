//! This crate holds all the structs and constants to represent a decoded instruction for the
//! 8086 microprocessor.

mod address;
mod display;
mod instruction;
mod mnemonic;
mod operand;
mod register;

pub use address::Address;
pub use instruction::{Instruction, Repeat};
pub use mnemonic::Mnemonic;
pub use operand::{AddressingMode, Displacement, Immediate, Operand, OperandSet, OperandSize};
pub use register::{Register, Segment, SizedRegister};
