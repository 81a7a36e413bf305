use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Berkeley-format size summary for one binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSizeSummary {
    pub text: u64,
    pub data: u64,
    pub bss: u64,
    pub dec: u64,
    pub hex: u64,
    pub filename: String,
}

impl ImageSizeSummary {
    /// Bytes stored in flash: code plus initialized data. Saturates at
    /// `u64::MAX`.
    pub fn flash_bytes(&self) -> u64 {
        self.text.saturating_add(self.data)
    }

    /// Bytes occupied in RAM at runtime: initialized plus zeroed data.
    /// Saturates at `u64::MAX`.
    pub fn ram_bytes(&self) -> u64 {
        self.data.saturating_add(self.bss)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("No size summary line found in toolchain output")]
    NoSummaryLine,
    #[error("Size summary field '{field}' out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: String },
}

// text data bss (0x-prefixed hex), dec (decimal), hex (bare hex), filename.
static SUMMARY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(0x[0-9a-fA-F]+)\s+(0x[0-9a-fA-F]+)\s+(0x[0-9a-fA-F]+)\s+([0-9]+)\s+([0-9a-fA-F]+)\s+(\S.*?)\s*$",
    )
    .expect("size summary regex compiles")
});

/// Parse the output of `ft32-elf-size --format=berkeley -x`.
///
/// The first line matching the six-field grammar wins; the header line and
/// anything else are ignored. No matching line is a hard error.
pub fn parse_image_size_summary(output: &str) -> Result<ImageSizeSummary, SizeParseError> {
    let caps = output
        .lines()
        .find_map(|line| SUMMARY_LINE.captures(line))
        .ok_or(SizeParseError::NoSummaryLine)?;

    Ok(ImageSizeSummary {
        text: parse_field("text", &caps[1], 16)?,
        data: parse_field("data", &caps[2], 16)?,
        bss: parse_field("bss", &caps[3], 16)?,
        dec: parse_field("dec", &caps[4], 10)?,
        hex: parse_field("hex", &caps[5], 16)?,
        filename: caps[6].to_string(),
    })
}

fn parse_field(field: &'static str, raw: &str, radix: u32) -> Result<u64, SizeParseError> {
    let digits = if radix == 16 { raw.trim_start_matches("0x") } else { raw };
    u64::from_str_radix(digits, radix)
        .map_err(|_| SizeParseError::FieldOutOfRange { field, value: raw.to_string() })
}
