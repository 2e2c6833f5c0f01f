//! Trace parsing.
//!
//! A trace holds one event per line: an operation (`r`/`R` or `w`/`W`),
//! whitespace, and a hexadecimal address with an optional `0x` prefix.
//! Blank lines and `#` comments are ignored. Addresses must fit the
//! configured address width.

use std::io::BufRead;

use crate::common::data::AccessType;
use crate::common::error::TraceError;

/// One memory access from the trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// Accessed byte address.
    pub addr: u64,
    /// Read or write.
    pub op: AccessType,
}

impl TraceEvent {
    /// Creates a read event.
    pub const fn read(addr: u64) -> Self {
        Self {
            addr,
            op: AccessType::Read,
        }
    }

    /// Creates a write event.
    pub const fn write(addr: u64) -> Self {
        Self {
            addr,
            op: AccessType::Write,
        }
    }
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] if the line is not exactly an operation
/// and an address, and [`TraceError::AddressOutOfRange`] if the address has
/// bits above `address_width`.
pub fn parse_line(
    line_no: usize,
    text: &str,
    address_width: u32,
) -> Result<Option<TraceEvent>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| TraceError::Malformed {
        line: line_no,
        reason,
    };

    let mut fields = text.split_whitespace();
    let (Some(op_field), Some(addr_field), None) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(format!("expected `<r|w> <hex address>`, got `{text}`")));
    };

    let op = match op_field {
        "r" | "R" => AccessType::Read,
        "w" | "W" => AccessType::Write,
        other => return Err(malformed(format!("unknown operation `{other}`"))),
    };

    let digits = addr_field
        .strip_prefix("0x")
        .or_else(|| addr_field.strip_prefix("0X"))
        .unwrap_or(addr_field);
    let addr = u64::from_str_radix(digits, 16)
        .map_err(|e| malformed(format!("invalid address `{addr_field}`: {e}")))?;

    if address_width < u64::BITS && addr >> address_width != 0 {
        return Err(TraceError::AddressOutOfRange {
            line: line_no,
            addr,
            width: address_width,
        });
    }

    Ok(Some(TraceEvent { addr, op }))
}

/// Streams events from a buffered reader.
///
/// Yields one item per non-blank, non-comment line. Malformed lines,
/// including lines that are not valid UTF-8, are yielded as errors so the
/// caller can decide to skip them; a failed read is yielded as
/// [`TraceError::Io`].
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    address_width: u32,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`, validating addresses against `address_width`.
    pub fn new(reader: R, address_width: u32) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            address_width,
        }
    }

    /// Number of lines consumed so far.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            self.line_no += 1;
            let Ok(line) = std::str::from_utf8(&self.buf) else {
                return Some(Err(TraceError::Malformed {
                    line: self.line_no,
                    reason: "line is not valid UTF-8".to_owned(),
                }));
            };
            match parse_line(self.line_no, line, self.address_width) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
