//! Reading load records from CSV traces.
//!
//! A trace has a header row and one row per executed load. The columns
//! `pc`, `width` and `value` are required. The program counter may be
//! written in decimal or as `0x`-prefixed hexadecimal; every other field
//! is a (possibly signed) decimal integer.
//!
//! Optional columns:
//!  - an eligibility column (`eligible` by default), nonzero when the load
//!    may consume a predicted value;
//!  - `mmio` and `alias_risk`, which make the load ineligible when nonzero.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TraceError;
use crate::load::*;

const REQUIRED: [&str; 3] = ["pc", "width", "value"];

/// Split a decimal integer into its sign and digits. Single underscores
/// between digits are allowed, as in `1_000`.
fn split_decimal(s: &str) -> Option<(bool, impl Iterator<Item = u64> + '_)> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let valid = digits.split('_')
        .all(|grp| !grp.is_empty() && grp.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return None;
    }
    let iter = digits.bytes()
        .filter(|b| *b != b'_')
        .map(|b| (b - b'0') as u64);
    Some((neg, iter))
}

/// Parse an unsigned decimal integer.
pub fn parse_dec(s: &str) -> Option<u64> {
    let (neg, digits) = split_decimal(s)?;
    let mut res = 0u64;
    for d in digits {
        res = res.checked_mul(10)?.checked_add(d)?;
    }
    if neg && res != 0 { None } else { Some(res) }
}

/// Parse an unsigned integer in decimal or `0x`-prefixed hexadecimal.
pub fn parse_uint(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.get(..2) {
        Some("0x") | Some("0X") => {
            let digits = &s[2..];
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            u64::from_str_radix(digits, 16).ok()
        },
        _ => parse_dec(s),
    }
}

/// Parse a signed decimal integer of any size, reduced to its 64-bit
/// two's complement representation.
pub fn parse_int(s: &str) -> Option<u64> {
    let (neg, digits) = split_decimal(s)?;
    let res = digits.fold(0u64, |acc, d| acc.wrapping_mul(10).wrapping_add(d));
    Some(if neg { res.wrapping_neg() } else { res })
}

/// Parse a signed decimal flag, returning true when it is nonzero.
pub fn parse_flag(s: &str) -> Option<bool> {
    let (_, mut digits) = split_decimal(s)?;
    Some(digits.any(|d| d != 0))
}

/// Column indices for the fields we care about.
#[derive(Clone, Copy, Debug)]
struct Columns {
    pc: usize,
    width: usize,
    value: usize,
    eligible: Option<usize>,
    mmio: Option<usize>,
    alias_risk: Option<usize>,
}
impl Columns {
    fn from_headers(headers: &csv::StringRecord, eligibility_field: &str)
        -> Result<Self, TraceError>
    {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        match (find("pc"), find("width"), find("value")) {
            (Some(pc), Some(width), Some(value)) => Ok(Self {
                pc,
                width,
                value,
                eligible: find(eligibility_field),
                mmio: find("mmio"),
                alias_risk: find("alias_risk"),
            }),
            _ => Err(TraceError::MissingColumns {
                required: REQUIRED.iter().map(|s| s.to_string()).collect(),
                found: headers.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

/// A load trace stored as CSV.
pub struct CsvTrace<R: Read> {
    reader: csv::Reader<R>,
    cols: Columns,
    record: csv::StringRecord,
}

impl CsvTrace<File> {
    /// Open a trace file.
    pub fn from_path(path: impl AsRef<Path>, eligibility_field: &str)
        -> Result<Self, TraceError>
    {
        let file = File::open(path)?;
        Self::from_reader(file, eligibility_field)
    }
}

impl<R: Read> CsvTrace<R> {
    /// Read a trace from some reader. Fails when the header is missing
    /// any of the required columns.
    pub fn from_reader(rdr: R, eligibility_field: &str)
        -> Result<Self, TraceError>
    {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers = reader.headers()?.clone();
        let cols = Columns::from_headers(&headers, eligibility_field)?;
        Ok(Self {
            reader,
            cols,
            record: csv::StringRecord::new(),
        })
    }

    /// Returns true if the trace carries its own eligibility column.
    pub fn has_eligibility(&self) -> bool { self.cols.eligible.is_some() }

    fn parse_record(&self) -> Result<LoadRecord, TraceError> {
        let line = self.record.position().map_or(0, |p| p.line());
        let malformed = |reason: String| TraceError::Malformed { line, reason };
        let field = |idx: usize, name: &str| {
            self.record.get(idx)
                .ok_or_else(|| malformed(format!("missing field '{}'", name)))
        };

        let pc_raw = field(self.cols.pc, "pc")?;
        let pc = parse_uint(pc_raw)
            .ok_or_else(|| malformed(format!("bad pc '{}'", pc_raw)))?;

        let width_raw = field(self.cols.width, "width")?;
        let width = parse_dec(width_raw)
            .ok_or_else(|| malformed(format!("bad width '{}'", width_raw)))
            .and_then(|w| AccessWidth::try_from(w)
                .map_err(|e| malformed(e.to_string())))?;

        let value_raw = field(self.cols.value, "value")?;
        let value = parse_int(value_raw)
            .ok_or_else(|| malformed(format!("bad value '{}'", value_raw)))?;

        // Optional flags: unparsable values fall back to the defaults
        let flag = |idx: Option<usize>| {
            idx.and_then(|i| self.record.get(i)).and_then(parse_flag)
        };
        let mut eligible = flag(self.cols.eligible).unwrap_or(true);
        if flag(self.cols.mmio) == Some(true) {
            eligible = false;
        }
        if flag(self.cols.alias_risk) == Some(true) {
            eligible = false;
        }

        Ok(LoadRecord { pc, width, value, eligible })
    }
}

impl<R: Read> Iterator for CsvTrace<R> {
    type Item = Result<LoadRecord, TraceError>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => Some(self.parse_record()),
            Err(e) => {
                // Bad UTF-8 only spoils one row
                if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) {
                    let line = e.position().map_or(0, |p| p.line());
                    Some(Err(TraceError::Malformed { line, reason: e.to_string() }))
                } else {
                    Some(Err(TraceError::Csv(e)))
                }
            },
        }
    }
}
