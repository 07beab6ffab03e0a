//! # One-Shot DLMS Packet Decryption
//!
//! For callers that already hold a complete DLMS packet (read from a file,
//! reassembled elsewhere) this module decrypts it in a single call, either
//! into a caller-supplied output buffer or in place inside the packet
//! buffer. Byte-stream reassembly lives in [`crate::framer::encrypted`].

use log::{debug, warn};
use thiserror::Error;

use super::crypto::{Aes128GcmBackend, RustCryptoAes128Gcm, AAD};
use super::key::EncryptionKey;
use super::packet::DlmsPacket;

/// Errors from one-shot DLMS packet decryption.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptError {
    /// The input is shorter than the smallest possible packet.
    #[error("encrypted telegram is too small")]
    EncryptedTelegramIsTooSmall,

    /// Fixed header bytes or the announced length are inconsistent.
    #[error("DLMS packet header corrupted")]
    HeaderCorrupted,

    /// The output buffer cannot hold the decrypted telegram.
    #[error("decrypted telegram buffer is too small")]
    DecryptedTelegramBufferIsTooSmall,

    /// The crypto backend rejected the key.
    #[error("failed to set encryption key")]
    FailedToSetEncryptionKey,

    /// GCM tag verification failed.
    #[error("decryption failed")]
    DecryptionFailed,
}

/// Decrypts complete DLMS packets into a caller-supplied telegram buffer.
pub struct DlmsDecryptor<'a, A: Aes128GcmBackend = RustCryptoAes128Gcm> {
    telegram_buffer: &'a mut [u8],
    backend: A,
}

impl<'a> DlmsDecryptor<'a> {
    /// Create a decryptor that writes telegrams into `telegram_buffer`,
    /// using the default crypto backend.
    pub fn new(telegram_buffer: &'a mut [u8]) -> Self {
        Self::with_backend(telegram_buffer)
    }

    /// Decrypt a packet inside its own buffer, without copying.
    ///
    /// On success the returned slice aliases the ciphertext region of
    /// `packet`, now holding the plaintext telegram.
    pub fn decrypt_in_place<'p>(
        packet: &'p mut [u8],
        key: &EncryptionKey,
    ) -> Result<&'p [u8], DecryptError> {
        Self::decrypt_in_place_with(packet, key)
    }
}

impl<'a, A: Aes128GcmBackend> DlmsDecryptor<'a, A> {
    /// Create a decryptor around a specific crypto backend.
    pub fn with_backend(telegram_buffer: &'a mut [u8]) -> Self {
        Self {
            telegram_buffer,
            backend: A::default(),
        }
    }

    /// Decrypt `packet` with `key`, returning the telegram as a view into
    /// this decryptor's buffer. The view is valid until the next call.
    pub fn decrypt(
        &mut self,
        packet: &[u8],
        key: &EncryptionKey,
    ) -> Result<&[u8], DecryptError> {
        if packet.len() < DlmsPacket::MIN_LEN {
            return Err(DecryptError::EncryptedTelegramIsTooSmall);
        }

        let packet = DlmsPacket::parse(packet).map_err(|_| DecryptError::HeaderCorrupted)?;
        let ciphertext = packet.ciphertext();

        if self.telegram_buffer.len() < ciphertext.len() {
            return Err(DecryptError::DecryptedTelegramBufferIsTooSmall);
        }

        if !self.backend.set_key(key) {
            return Err(DecryptError::FailedToSetEncryptionKey);
        }

        let output = &mut self.telegram_buffer[..ciphertext.len()];
        output.copy_from_slice(ciphertext);

        if !self
            .backend
            .decrypt_in_place(&packet.nonce(), &AAD, output, &packet.tag())
        {
            warn!("DLMS packet failed authentication");
            return Err(DecryptError::DecryptionFailed);
        }

        debug!("decrypted DLMS packet ({} byte telegram)", output.len());
        Ok(output)
    }

    /// [`DlmsDecryptor::decrypt_in_place`] with an explicit backend.
    pub fn decrypt_in_place_with<'p>(
        packet: &'p mut [u8],
        key: &EncryptionKey,
    ) -> Result<&'p [u8], DecryptError> {
        if packet.len() < DlmsPacket::MIN_LEN {
            return Err(DecryptError::EncryptedTelegramIsTooSmall);
        }

        let (nonce, tag, range) = {
            let parsed = DlmsPacket::parse(packet).map_err(|_| DecryptError::HeaderCorrupted)?;
            (parsed.nonce(), parsed.tag(), parsed.ciphertext_range())
        };

        let mut backend = A::default();
        if !backend.set_key(key) {
            return Err(DecryptError::FailedToSetEncryptionKey);
        }

        let telegram = &mut packet[range];
        if !backend.decrypt_in_place(&nonce, &AAD, telegram, &tag) {
            warn!("DLMS packet failed authentication");
            return Err(DecryptError::DecryptionFailed);
        }

        debug!("decrypted DLMS packet in place ({} byte telegram)", telegram.len());
        Ok(telegram)
    }
}
