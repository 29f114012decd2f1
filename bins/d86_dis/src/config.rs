use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Load offset of a `.com` program inside its segment.
const COM_ORIGIN: usize = 0x100;

/// Highest address of the 8086's 1 MiB address space.
const MAX_ORIGIN: usize = 0xF_FFFF;

#[derive(Debug, Parser)]
#[command(name = "d86-dis", version, about = "Disassemble a flat 8086 binary")]
pub struct Config {
    /// The binary file to disassemble
    pub binary: PathBuf,

    /// Offset the binary is loaded at, in decimal or 0x-prefixed hex, up to 0xfffff [default:
    /// 0x100 for .com files, 0 otherwise]
    #[arg(short, long, value_parser = parse_origin)]
    pub origin: Option<usize>,

    /// Stop at the first byte that does not decode instead of emitting it as data
    #[arg(long)]
    pub strict: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// The origin given on the command line, or the one implied by the file name.
    pub fn origin(&self) -> usize {
        self.origin
            .unwrap_or_else(|| detect_origin(self.binary.as_path()))
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

fn detect_origin(path: &Path) -> usize {
    match path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("com") => COM_ORIGIN,
        _ => 0,
    }
}

fn parse_number(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|err| format!("invalid number \"{}\" ({})", s, err))
}

fn parse_origin(s: &str) -> Result<usize, String> {
    match parse_number(s)? {
        origin if origin <= MAX_ORIGIN => Ok(origin),
        origin => Err(format!(
            "origin {:#x} is outside the 1 MiB address space (max {:#x})",
            origin, MAX_ORIGIN
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_origin() {
        let tests = [
            ("test.com", 0x100),   // Com
            ("TEST.COM", 0x100),   // Case-sensitivity
            ("bios.rom", 0),       // Raw
            ("program.exe", 0),    // Not loaded at 0x100
            ("boot", 0),           // no extension
            ("dir.com/boot", 0),   // only the file name counts
        ];

        for (path, expected) in tests {
            assert_eq!(detect_origin(Path::new(path)), expected, "{}", path);
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("256"), Ok(256));
        assert_eq!(parse_number("0x100"), Ok(0x100));
        assert_eq!(parse_number("0XF000"), Ok(0xF000));
        assert!(parse_number("0x").is_err());
        assert!(parse_number("ten").is_err());
    }

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("0x7c00"), Ok(0x7C00));
        assert_eq!(parse_origin("0xfffff"), Ok(MAX_ORIGIN));
        assert!(parse_origin("0x100000").is_err());
        assert!(parse_origin("0xFFFFFFFFFFFFFFFF").is_err());
    }

    #[test]
    fn origin_from_arguments() {
        let config = Config::try_parse_from(["d86-dis", "hello.com"]).unwrap();
        assert_eq!(config.origin(), 0x100);
        assert!(!config.strict);
        assert_eq!(config.log_level(), Level::WARN);

        let config =
            Config::try_parse_from(["d86-dis", "--origin", "0x7c00", "--strict", "-vv", "boot.bin"])
                .unwrap();
        assert_eq!(config.origin(), 0x7C00);
        assert!(config.strict);
        assert_eq!(config.log_level(), Level::DEBUG);
    }

    #[test]
    fn origin_outside_the_address_space_is_rejected() {
        assert!(Config::try_parse_from(["d86-dis", "--origin", "0xFFFFFFFFFFFFFFFF", "f.bin"])
            .is_err());
    }

    #[test]
    fn binary_is_required() {
        assert!(Config::try_parse_from(["d86-dis"]).is_err());
    }
}
