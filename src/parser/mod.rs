//! # Telegram Parser
//!
//! Turns one complete plaintext telegram into a caller-declared record of
//! typed fields. The parser consumes the telegram in a single pass:
//!
//! 1. envelope checks — the telegram must start with `/` and contain `!`;
//!    with CRC checking enabled the four hex characters after `!` must
//!    match CRC-16 over `/`..`!` inclusive
//! 2. the identification line is offered to the record under the reserved
//!    all-255 OBIS identifier
//! 3. the remaining bytes are split into logical data lines — a line break
//!    only terminates a line outside parentheses and when the next line
//!    does not continue the current one with another `(` fragment
//! 4. each logical line is parsed: OBIS identifier first, then dispatch to
//!    the matching field descriptor
//!
//! Parsing fails fast; the returned [`ParseError`] points at the offending
//! byte and [`ParseError::render`] turns it into a caret diagnostic.

pub mod error;
pub mod obis;
pub mod value;

use log::debug;

use crate::fields::Record;
use crate::util::crc16::crc16_update;

pub use error::{ParseError, ParseErrorKind};
pub use obis::Obis;

/// Switches for a parser run.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Verify the CRC trailer. When disabled the telegram still needs the
    /// `/` prefix and `!` terminator, but everything after `!` is ignored.
    pub check_crc: bool,

    /// Report data lines that no declared field matches as
    /// [`ParseErrorKind::UnknownField`] instead of skipping them.
    pub unknown_error: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            check_crc: true,
            unknown_error: false,
        }
    }
}

/// Parse a telegram into `record` with default options (CRC checked,
/// unknown lines skipped).
pub fn parse(record: &mut dyn Record, telegram: &[u8]) -> Result<(), ParseError> {
    parse_with(record, telegram, ParseOptions::default())
}

/// Parse a telegram into `record`.
///
/// `telegram` must hold the complete telegram starting at `/`; with CRC
/// checking enabled the four-character trailer must follow the `!`.
/// Trailing bytes beyond the telegram are ignored.
pub fn parse_with(
    record: &mut dyn Record,
    telegram: &[u8],
    options: ParseOptions,
) -> Result<(), ParseError> {
    if telegram.first() != Some(&b'/') {
        return Err(ParseError::new(ParseErrorKind::StartMarkerMissing, 0));
    }

    // The payload starts after '/' and runs up to (but not including) '!'.
    let terminator = telegram
        .iter()
        .position(|&b| b == b'!')
        .ok_or_else(|| ParseError::new(ParseErrorKind::EndMarkerMissing, telegram.len()))?;

    if options.check_crc {
        let mut crc = 0u16;
        for &byte in &telegram[..=terminator] {
            crc = crc16_update(crc, byte);
        }

        let (trailer, _) = value::parse_crc(telegram, terminator + 1, telegram.len())?;
        if trailer != crc {
            return Err(ParseError::new(ParseErrorKind::ChecksumMismatch, terminator + 1));
        }
    }

    parse_data(record, telegram, 1, terminator, options.unknown_error)?;
    debug!("parsed telegram ({} bytes)", terminator + 1);
    Ok(())
}

/// Parse the payload between `/` and `!`, splitting it into logical lines.
fn parse_data(
    record: &mut dyn Record,
    buf: &[u8],
    pos: usize,
    end: usize,
    unknown_error: bool,
) -> Result<(), ParseError> {
    let mut line_start = pos;
    let mut line_end = pos;

    // The identification line runs up to the first line break. Its content
    // is free-form, so it is offered under the reserved identifier without
    // the unknown-field bookkeeping of regular data lines.
    while line_end < end {
        if buf[line_end] == b'\r' || buf[line_end] == b'\n' {
            record.parse_line(Obis::IDENTIFICATION, buf, line_start, line_end)?;
            line_end += 1;
            line_start = line_end;
            break;
        }
        line_end += 1;
    }

    // Data lines. Parentheses are tracked so that values containing line
    // breaks stay part of their logical line, and a physical line starting
    // with a '(' fragment continues the previous one:
    //
    //   0-1:24.3.0(120517020000)(08)(60)(1)(0-1:24.2.1)(m3)
    //   (00124.477)
    let mut open_paren = false;
    while line_end < end {
        match buf[line_end] {
            b'(' => {
                if open_paren {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedOpenParen, line_end));
                }
                open_paren = true;
            }
            b')' => {
                if !open_paren {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedCloseParen, line_end));
                }
                open_paren = false;
            }
            b'\r' | b'\n' => {
                let continues_below = end - line_end > 2
                    && (buf[line_end + 1] == b'(' || buf[line_end + 2] == b'(');

                if !open_paren && !continues_below {
                    parse_line(record, buf, line_start, line_end, unknown_error)?;
                    line_start = line_end + 1;
                }
            }
            _ => {}
        }
        line_end += 1;
    }

    if line_end != line_start {
        return Err(ParseError::new(ParseErrorKind::LastLineNotTerminated, line_end));
    }

    Ok(())
}

/// Parse one logical data line: OBIS identifier, then field dispatch.
fn parse_line(
    record: &mut dyn Record,
    buf: &[u8],
    line_start: usize,
    line_end: usize,
    unknown_error: bool,
) -> Result<(), ParseError> {
    if line_start == line_end {
        return Ok(());
    }

    let (id, after_id) = obis::parse(buf, line_start, line_end)?;
    let next = record.parse_line(id, buf, after_id, line_end)?;

    // An untouched cursor means no descriptor claimed the line; a cursor
    // that moved but stopped short means the descriptor left data behind.
    if next != after_id && next != line_end {
        return Err(ParseError::new(ParseErrorKind::TrailingCharacters, next));
    }
    if next == after_id && unknown_error {
        return Err(ParseError::new(ParseErrorKind::UnknownField, line_start));
    }

    Ok(())
}
