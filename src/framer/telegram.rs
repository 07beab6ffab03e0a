//! # Plaintext Telegram Framer
//!
//! Locates P1 telegrams inside an unsynchronised byte stream. A telegram
//! starts at `/`, ends at `!` and is optionally followed by a four-character
//! hex CRC trailer. The framer is a byte-at-a-time state machine: it needs
//! no look-ahead, tolerates garbage between telegrams, truncated packets and
//! bursty UART reads, and recovers from every error by waiting for the next
//! `/`.
//!
//! The framer never allocates. It writes into a caller-supplied buffer and
//! yields telegrams as borrowed slices that stay valid until the next
//! [`TelegramFramer::feed`] call.

use log::{debug, warn};
use thiserror::Error;

use crate::util::crc16::crc16;

/// Errors reported while framing a plaintext telegram.
///
/// All of them are recoverable: the framer is back in its start state when
/// the error is returned and the next byte is processed normally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramFramerError {
    /// The telegram outgrew the caller's buffer and was dropped.
    #[error("telegram exceeds the receive buffer")]
    BufferOverflow,

    /// A `/` arrived in the middle of a packet; a fresh packet was started.
    #[error("packet start symbol inside a packet")]
    PacketStartSymbolInPacket,

    /// A CRC trailer byte was not a hex character.
    #[error("incorrect CRC character")]
    IncorrectCrcCharacter,

    /// The CRC trailer did not match the telegram contents.
    #[error("CRC mismatch")]
    CrcMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitingForStart,
    WaitingForEnd,
    WaitingForCrc,
}

/// Accumulates the four hex characters of the CRC trailer.
#[derive(Debug, Default, Clone, Copy)]
struct CrcTrailer {
    value: u16,
    nibbles: u8,
}

impl CrcTrailer {
    /// Fold in one trailer byte. Returns `false` for non-hex input.
    fn push(&mut self, byte: u8) -> bool {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'A'..=b'F' => byte - b'A' + 10,
            b'a'..=b'f' => byte - b'a' + 10,
            _ => return false,
        };
        self.value = (self.value << 4) | u16::from(nibble);
        self.nibbles += 1;
        true
    }

    fn is_complete(&self) -> bool {
        self.nibbles == 4
    }
}

/// Streaming framer for plaintext P1 telegrams.
///
/// ```
/// use dsmr_rs::framer::TelegramFramer;
///
/// let mut buffer = [0u8; 2048];
/// let mut framer = TelegramFramer::new(&mut buffer, true);
///
/// for &byte in b"noise /some !a3D4 noise" {
///     match framer.feed(byte) {
///         Ok(Some(telegram)) => assert_eq!(telegram, b"/some !"),
///         Ok(None) => {}
///         Err(e) => eprintln!("framing error: {e}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct TelegramFramer<'a> {
    buffer: &'a mut [u8],
    len: usize,
    state: State,
    trailer: CrcTrailer,
    check_crc: bool,
}

impl<'a> TelegramFramer<'a> {
    /// Create a framer around a caller-owned buffer.
    ///
    /// With `check_crc` enabled a telegram is only yielded after its
    /// four-character trailer matched; otherwise it is yielded at `!`.
    pub fn new(buffer: &'a mut [u8], check_crc: bool) -> Self {
        Self {
            buffer,
            len: 0,
            state: State::WaitingForStart,
            trailer: CrcTrailer::default(),
            check_crc,
        }
    }

    /// Process one byte from the wire.
    ///
    /// Returns `Ok(Some(telegram))` when a complete telegram (including the
    /// trailing `!`, excluding the CRC trailer) became available. The slice
    /// borrows the framer's buffer and is invalidated by the next `feed`.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, TelegramFramerError> {
        if self.len >= self.buffer.len() {
            // Buffer exhausted by the current packet. Drop it and
            // resynchronise; a '/' is allowed to open a new packet at once.
            self.len = 0;
            self.state = State::WaitingForStart;
            if byte != b'/' {
                warn!("dropping oversized telegram");
                return Err(TelegramFramerError::BufferOverflow);
            }
        }

        if byte == b'/' {
            self.len = 0;
            self.push(byte);
            let previous = core::mem::replace(&mut self.state, State::WaitingForEnd);
            if previous != State::WaitingForStart {
                return Err(TelegramFramerError::PacketStartSymbolInPacket);
            }
            return Ok(None);
        }

        match self.state {
            State::WaitingForStart => Ok(None),

            State::WaitingForEnd => {
                self.push(byte);
                if byte != b'!' {
                    return Ok(None);
                }

                if !self.check_crc {
                    self.state = State::WaitingForStart;
                    debug!("telegram framed ({} bytes, CRC skipped)", self.len);
                    return Ok(Some(&self.buffer[..self.len]));
                }

                self.state = State::WaitingForCrc;
                self.trailer = CrcTrailer::default();
                Ok(None)
            }

            State::WaitingForCrc => {
                if !self.trailer.push(byte) {
                    self.state = State::WaitingForStart;
                    return Err(TelegramFramerError::IncorrectCrcCharacter);
                }

                if !self.trailer.is_complete() {
                    return Ok(None);
                }

                self.state = State::WaitingForStart;

                let calculated = crc16(&self.buffer[..self.len]);
                if self.trailer.value != calculated {
                    warn!(
                        "telegram CRC mismatch: trailer {:04x}, calculated {:04x}",
                        self.trailer.value, calculated
                    );
                    return Err(TelegramFramerError::CrcMismatch);
                }

                debug!("telegram framed ({} bytes)", self.len);
                Ok(Some(&self.buffer[..self.len]))
            }
        }
    }

    fn push(&mut self, byte: u8) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = byte;
            self.len += 1;
        }
    }
}
