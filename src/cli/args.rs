//! CLI argument definitions using clap
//!
//! ```text
//! hexpatch [OPTIONS] [FILE]
//! hexpatch -i -o -a 1F00 -d 0,0,1a,95,AB < image.hex
//! ```
//!
//! `--address` and `--data` may repeat. Each data list is written at the
//! most recent address; a list following another list continues right
//! after it.

use std::path::PathBuf;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::record::Address;

/// Comma separated byte values given to `--data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteList(pub Vec<u8>);

/// One contiguous edit: bytes written starting at `address`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// First address written
    pub address: Address,
    /// Bytes to write, in address order
    pub bytes: Vec<u8>,
}

/// hexpatch - edit Intel HEX files without changing their layout
#[derive(Parser, Debug)]
#[command(name = "hexpatch")]
#[command(version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),

    /// Input file
    pub file: Option<PathBuf>,

    /// Read the image from stdin
    #[arg(short = 'i', long = "stdin")]
    pub stdin: bool,

    /// Write the edited image to stdout
    #[arg(short = 'o', long = "stdout")]
    pub stdout: bool,

    /// Address to overwrite, hexadecimal 0 to FFFFFFFFFFFFFFFF (e.g. EAF00F1)
    #[arg(short = 'a', long = "address", value_parser = parse_address)]
    pub address: Vec<Address>,

    /// Bytes to write, hexadecimal and comma separated (e.g. 0,0,1a,95,AB)
    #[arg(short = 'd', long = "data", value_parser = parse_byte_list)]
    pub data: Vec<ByteList>,

    /// Reject records whose resolved address exceeds this hex value
    #[arg(long, value_parser = parse_address)]
    pub max_jump: Option<Address>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave checksums of edited records untouched
    #[arg(long)]
    pub no_checksum: bool,

    /// Fail if any input record carries a wrong checksum
    #[arg(long)]
    pub verify: bool,

    /// Edits in command-line order, resolved from `address` and `data`
    #[arg(skip)]
    pub edits: Vec<Edit>,
}

impl Cli {
    /// Parse command line arguments, exiting on error
    pub fn parse_args() -> Self {
        let matches = Cli::command().get_matches();
        Self::from_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Parse from an explicit argument list (first item is the binary name)
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Cli::from_arg_matches(matches)?;

        let address_at: Vec<usize> = matches
            .indices_of("address")
            .map(|i| i.collect())
            .unwrap_or_default();
        let data_at: Vec<usize> = matches
            .indices_of("data")
            .map(|i| i.collect())
            .unwrap_or_default();

        cli.edits = plan_edits(
            address_at.into_iter().zip(cli.address.iter().copied()),
            data_at.into_iter().zip(cli.data.iter().cloned()),
        );
        Ok(cli)
    }

    /// True if any `--address` was given
    pub fn address_set(&self) -> bool {
        !self.address.is_empty()
    }
}

/// Interleaves addresses and data lists by command-line position.
///
/// Data lists before the first address start at 0.
fn plan_edits(
    addresses: impl Iterator<Item = (usize, Address)>,
    data: impl Iterator<Item = (usize, ByteList)>,
) -> Vec<Edit> {
    enum Step {
        Seek(Address),
        Write(Vec<u8>),
    }

    let mut steps: Vec<(usize, Step)> = addresses
        .map(|(i, a)| (i, Step::Seek(a)))
        .chain(data.map(|(i, ByteList(bytes))| (i, Step::Write(bytes))))
        .collect();
    steps.sort_by_key(|(i, _)| *i);

    let mut next = 0;
    let mut edits = Vec::new();
    for (_, step) in steps {
        match step {
            Step::Seek(address) => next = address,
            Step::Write(bytes) => {
                let address = next;
                next = next.wrapping_add(bytes.len() as Address);
                edits.push(Edit { address, bytes });
            }
        }
    }
    edits
}

fn parse_hex_u64(s: &str) -> Result<u64, String> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).map_err(|e| format!("{}: on {}", e, s))
}

fn parse_address(s: &str) -> Result<Address, String> {
    parse_hex_u64(s)
}

fn parse_byte_list(s: &str) -> Result<ByteList, String> {
    s.split(',')
        .map(|value| {
            let v = parse_hex_u64(value)?;
            u8::try_from(v)
                .map_err(|_| format!("{} is greater than 0xFF. Use byte values only.", value))
        })
        .collect::<Result<Vec<u8>, String>>()
        .map(ByteList)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_args(std::iter::once("hexpatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-i", "-o", "--verify", "--max-jump", "FFFF"]);
        assert!(cli.stdin);
        assert!(cli.stdout);
        assert!(cli.verify);
        assert!(!cli.no_checksum);
        assert_eq!(cli.max_jump, Some(0xFFFF));
        assert_eq!(cli.file, None);
    }

    #[test]
    fn test_file_positional() {
        let cli = parse(&["image.hex", "-o"]);
        assert_eq!(cli.file, Some(PathBuf::from("image.hex")));
    }

    #[test]
    fn test_single_edit() {
        let cli = parse(&["-a", "EAF00F1", "-d", "0,0,1a,95,AB"]);
        assert!(cli.address_set());
        assert_eq!(
            cli.edits,
            vec![Edit {
                address: 0xEAF00F1,
                bytes: vec![0x00, 0x00, 0x1A, 0x95, 0xAB]
            }]
        );
    }

    #[test]
    fn test_data_lists_continue() {
        let cli = parse(&[
            "-a", "100", "-d", "1,2", "-d", "3", "-a", "0x200", "-d", "4",
        ]);
        assert_eq!(
            cli.edits,
            vec![
                Edit {
                    address: 0x100,
                    bytes: vec![1, 2]
                },
                Edit {
                    address: 0x102,
                    bytes: vec![3]
                },
                Edit {
                    address: 0x200,
                    bytes: vec![4]
                },
            ]
        );
    }

    #[test]
    fn test_data_before_address_starts_at_zero() {
        let cli = parse(&["-d", "7", "-a", "10"]);
        assert_eq!(
            cli.edits,
            vec![Edit {
                address: 0,
                bytes: vec![7]
            }]
        );
    }

    #[test]
    fn test_byte_out_of_range_rejected() {
        let result = Cli::try_parse_args(["hexpatch", "-a", "0", "-d", "1,100"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_flags() {
        for flag in ["-v", "-V", "--version"] {
            let err = Cli::try_parse_args(["hexpatch", flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        }
    }

    #[test]
    fn test_bad_address_rejected() {
        let result = Cli::try_parse_args(["hexpatch", "-a", "xyz"]);
        assert!(result.is_err());
    }
}
