//! # Encrypted Packet Framer
//!
//! Streaming counterpart of [`crate::dlms::decryptor`]: reassembles a DLMS
//! container byte by byte from the wire, validates its fixed header, and on
//! completion decrypts the inner telegram with AES-128-GCM.
//!
//! There is no framing marker beyond the 0xDB tag byte and no checksum over
//! the header, so the framer commits to a packet on the tag byte, validates
//! the header once all 18 bytes arrived, and relies on GCM authentication to
//! reject everything that only looked like a packet. Smart meters transmit
//! one packet roughly every ten seconds; when bytes stop arriving mid-packet
//! the caller is expected to call [`EncryptedFramer::reset`] after an idle
//! gap (about one second) so the next transmission starts clean.

use log::{debug, warn};
use thiserror::Error;

use crate::dlms::crypto::{Aes128GcmBackend, RustCryptoAes128Gcm, AAD};
use crate::dlms::key::{EncryptionKey, EncryptionKeyError};
use crate::dlms::packet::{DlmsHeader, DlmsPacket};

/// Errors reported while reassembling or decrypting a DLMS packet.
///
/// All of them are recoverable: the framer is back in its start state when
/// the error is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptedFramerError {
    /// The announced packet does not fit the caller's buffers.
    #[error("DLMS packet exceeds the receive buffer")]
    BufferOverflow,

    /// Fixed header bytes or the announced length are inconsistent.
    #[error("DLMS packet header corrupted")]
    HeaderCorrupted,

    /// The crypto backend rejected the installed key.
    #[error("failed to set encryption key")]
    FailedToSetEncryptionKey,

    /// GCM tag verification failed.
    #[error("decryption failed")]
    DecryptionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitingForStart,
    AccumulatingHeader,
    AccumulatingBody,
}

/// Accumulates the fixed 18-byte packet header.
#[derive(Debug, Clone, Copy)]
struct HeaderAccumulator {
    bytes: [u8; DlmsHeader::LEN],
    len: usize,
}

impl HeaderAccumulator {
    fn new() -> Self {
        Self {
            bytes: [0u8; DlmsHeader::LEN],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.len < DlmsHeader::LEN {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.len == DlmsHeader::LEN
    }

    fn header(&self) -> DlmsHeader {
        DlmsHeader::new(self.bytes)
    }
}

/// Streaming framer for encrypted DLMS packets.
///
/// Owns two caller-supplied buffer views: one that receives the encrypted
/// body (ciphertext plus tag) and one that receives the decrypted telegram.
/// Decrypted telegrams are yielded as borrowed slices into the latter and
/// stay valid until the next [`feed`](Self::feed) call.
pub struct EncryptedFramer<'a, A: Aes128GcmBackend = RustCryptoAes128Gcm> {
    state: State,
    header: HeaderAccumulator,
    body_buffer: &'a mut [u8],
    body_len: usize,
    expected_body_len: usize,
    telegram_buffer: &'a mut [u8],
    key: EncryptionKey,
    _backend: core::marker::PhantomData<A>,
}

impl<'a> EncryptedFramer<'a> {
    /// Create a framer around two caller-owned buffers, using the default
    /// crypto backend.
    pub fn new(body_buffer: &'a mut [u8], telegram_buffer: &'a mut [u8]) -> Self {
        Self::with_backend(body_buffer, telegram_buffer)
    }
}

impl<'a, A: Aes128GcmBackend> EncryptedFramer<'a, A> {
    /// Create a framer around a specific crypto backend.
    pub fn with_backend(body_buffer: &'a mut [u8], telegram_buffer: &'a mut [u8]) -> Self {
        Self {
            state: State::WaitingForStart,
            header: HeaderAccumulator::new(),
            body_buffer,
            body_len: 0,
            expected_body_len: 0,
            telegram_buffer,
            key: EncryptionKey::default(),
            _backend: core::marker::PhantomData,
        }
    }

    /// Install the decryption key from a 32-character hex string.
    ///
    /// The key may be replaced at any time; it takes effect for the next
    /// completed packet.
    pub fn set_encryption_key(&mut self, key_hex: &str) -> Result<(), EncryptionKeyError> {
        self.key = EncryptionKey::from_hex(key_hex)?;
        Ok(())
    }

    /// Install an already-decoded 16-byte key.
    pub fn set_key(&mut self, key: EncryptionKey) {
        self.key = key;
    }

    /// Process one byte from the wire.
    ///
    /// Returns `Ok(Some(telegram))` when a packet completed and its contents
    /// authenticated. The slice borrows the telegram buffer and is
    /// invalidated by the next `feed`.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, EncryptedFramerError> {
        match self.state {
            State::WaitingForStart => {
                if byte == DlmsHeader::TAG {
                    self.header = HeaderAccumulator::new();
                    self.header.push(byte);
                    self.body_len = 0;
                    self.state = State::AccumulatingHeader;
                }
                Ok(None)
            }

            State::AccumulatingHeader => {
                self.header.push(byte);
                if !self.header.is_complete() {
                    return Ok(None);
                }

                let header = self.header.header();
                if !header.is_consistent() || header.body_len() <= 25 {
                    self.state = State::WaitingForStart;
                    warn!("rejecting DLMS packet with corrupted header");
                    return Err(EncryptedFramerError::HeaderCorrupted);
                }

                let body_len = header.body_len() as usize;
                let telegram_len = body_len - DlmsPacket::GCM_TAG_LEN;
                if body_len > self.body_buffer.len()
                    || telegram_len > self.telegram_buffer.len()
                {
                    self.state = State::WaitingForStart;
                    warn!("DLMS packet of {body_len} bytes exceeds the receive buffer");
                    return Err(EncryptedFramerError::BufferOverflow);
                }

                debug!(
                    "DLMS header accepted (invocation counter {}, {} byte body)",
                    header.invocation_counter(),
                    body_len
                );
                self.expected_body_len = body_len;
                self.state = State::AccumulatingBody;
                Ok(None)
            }

            State::AccumulatingBody => {
                if self.body_len < self.body_buffer.len() {
                    self.body_buffer[self.body_len] = byte;
                    self.body_len += 1;
                }

                if self.body_len != self.expected_body_len {
                    return Ok(None);
                }

                self.state = State::WaitingForStart;
                self.decrypt()
            }
        }
    }

    /// Reset the state machine after an inter-frame gap.
    ///
    /// Call this when no bytes arrived for about a second and no telegram
    /// was produced; any partially received packet is abandoned. O(1), does
    /// not touch the buffers.
    pub fn reset(&mut self) {
        self.state = State::WaitingForStart;
    }

    fn decrypt(&mut self) -> Result<Option<&[u8]>, EncryptedFramerError> {
        let mut backend = A::default();
        if !backend.set_key(&self.key) {
            return Err(EncryptedFramerError::FailedToSetEncryptionKey);
        }

        // The tag is always the last 12 bytes of the body.
        let telegram_len = self.body_len - DlmsPacket::GCM_TAG_LEN;
        let (ciphertext, tag) = self.body_buffer[..self.body_len].split_at(telegram_len);
        let mut tag_bytes = [0u8; DlmsPacket::GCM_TAG_LEN];
        tag_bytes.copy_from_slice(tag);

        let telegram = &mut self.telegram_buffer[..telegram_len];
        telegram.copy_from_slice(ciphertext);

        let nonce = self.header.header().nonce();
        if !backend.decrypt_in_place(&nonce, &AAD, telegram, &tag_bytes) {
            warn!("DLMS packet failed authentication");
            return Err(EncryptedFramerError::DecryptionFailed);
        }

        debug!("decrypted DLMS packet ({telegram_len} byte telegram)");
        Ok(Some(telegram))
    }
}
