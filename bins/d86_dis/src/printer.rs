use d86_instruction::Instruction;
use std::fmt::Display;
use std::io::{self, Write};

/// Bytes that fit in the byte column before the text is pushed to the right.
const BYTES_TO_PRINT: usize = 6;

fn write_line(
    out: &mut impl Write,
    offset: usize,
    bytes: &[u8],
    text: impl Display,
) -> io::Result<()> {
    let b: String = bytes.iter().map(|b| format!("{:02X} ", b)).collect();

    writeln!(
        out,
        "{:08X}  {:<width$}{}",
        offset,
        b,
        text,
        width = BYTES_TO_PRINT * 3
    )
}

pub fn write_instruction(out: &mut impl Write, instruction: &Instruction) -> io::Result<()> {
    write_line(out, instruction.offset, &instruction.bytes, instruction)
}

/// A byte that did not decode.
pub fn write_data_byte(out: &mut impl Write, offset: usize, byte: u8) -> io::Result<()> {
    write_line(out, offset, &[byte], format_args!("db {:#04x}", byte))
}
