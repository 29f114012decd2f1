mod config;
mod printer;

use clap::Parser;
use config::Config;
use d86_decoder::{DecodeError, Decoder};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
enum Error {
    #[error("could not read {}: {}", .path.display(), .source)]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write listing: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    instructions: usize,
    data_bytes: usize,
}

/// Write a listing of `data` to `out`, one line per instruction. Bytes that do not decode are
/// written as `db` lines and decoding resumes at the next byte, unless `strict` is set.
fn disassemble(
    data: &[u8],
    origin: usize,
    strict: bool,
    out: &mut impl Write,
) -> Result<Summary, Error> {
    let mut decoder = Decoder::with_origin(data, origin);
    let mut summary = Summary::default();

    loop {
        match decoder.decode_one() {
            Ok(instruction) => {
                debug!(offset = instruction.offset, bytes = instruction.len(), "decoded");
                printer::write_instruction(out, &instruction)?;
                summary.instructions += 1;
            }

            Err(DecodeError::EndOfStream) => break,

            Err(err) if strict => return Err(err.into()),

            Err(err) => {
                let offset = decoder.offset();
                warn!(offset, "{}", err);
                match decoder.skip_byte() {
                    Some(byte) => printer::write_data_byte(out, offset, byte)?,
                    None => break,
                }
                summary.data_bytes += 1;
            }
        }
    }

    Ok(summary)
}

fn run(config: &Config) -> Result<(), Error> {
    let data = std::fs::read(&config.binary).map_err(|source| Error::Load {
        path: config.binary.clone(),
        source,
    })?;

    let origin = config.origin();
    info!(
        path = %config.binary.display(),
        bytes = data.len(),
        origin,
        "loaded binary"
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    // Whatever was decoded before a failure still goes out.
    let result = disassemble(&data, origin, config.strict, &mut out);
    out.flush()?;
    let summary = result?;

    info!(
        instructions = summary.instructions,
        data_bytes = summary.data_bytes,
        "done"
    );

    Ok(())
}

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level())
        .with_target(false)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(data: &[u8], origin: usize, strict: bool) -> (Result<Summary, Error>, String) {
        let mut out = vec![];
        let result = disassemble(data, origin, strict, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn hello_world_com() {
        // mov ah, 0x9 / mov dx, 0x109 / int 0x21 / ret
        let data = [0xB4, 0x09, 0xBA, 0x09, 0x01, 0xCD, 0x21, 0xC3];
        let (result, text) = listing(&data, 0x100, false);

        assert_eq!(
            result.unwrap(),
            Summary {
                instructions: 4,
                data_bytes: 0
            }
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("00000100  B4 09 "));
        assert!(lines[0].ends_with("mov ah, 0x9"));
        assert!(lines[1].starts_with("00000102  BA 09 01 "));
        assert!(lines[1].ends_with("mov dx, 0x109"));
        assert!(lines[2].ends_with("int 0x21"));
        assert!(lines[3].starts_with("00000107  C3 "));
        assert!(lines[3].ends_with("ret"));
    }

    #[test]
    fn undecodable_bytes_become_data() {
        let (result, text) = listing(&[0x90, 0x60, 0x40], 0, false);

        assert_eq!(
            result.unwrap(),
            Summary {
                instructions: 2,
                data_bytes: 1
            }
        );
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("00000001  60 "));
        assert!(lines[1].ends_with("db 0x60"));
        assert!(lines[2].ends_with("inc ax"));
    }

    #[test]
    fn truncated_tail_becomes_data() {
        // mov ax, imm16 with only one byte of the immediate.
        let (result, text) = listing(&[0xB8, 0x34], 0, false);

        assert_eq!(
            result.unwrap(),
            Summary {
                instructions: 0,
                data_bytes: 2
            }
        );
        assert!(text.lines().all(|line| line.contains("db ")));
    }

    #[test]
    fn strict_mode_stops_at_the_first_failure() {
        let (result, text) = listing(&[0x90, 0x60, 0x40], 0x100, true);

        match result {
            Err(Error::Decode(err)) => assert_eq!(
                err,
                DecodeError::UnknownOpcode {
                    opcode: 0x60,
                    offset: 0x101
                }
            ),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn empty_input_is_an_empty_listing() {
        let (result, text) = listing(&[], 0, true);
        assert_eq!(result.unwrap(), Summary::default());
        assert!(text.is_empty());
    }
}
