//! # AES-128 Encryption Key
//!
//! Smart meters that wrap their telegrams in a DLMS container are provisioned
//! with a 16-byte AES key by the utility. Operators receive it as a 32
//! character hex string, so that is the primary constructor here.

use crate::util::hex;
use thiserror::Error;

/// Errors produced when installing an encryption key from a hex string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionKeyError {
    /// The hex string does not contain exactly 32 characters.
    #[error("Encryption key length is not 32 hex characters")]
    LengthIsNot32Bytes,

    /// The string contains characters outside `[0-9a-fA-F]`.
    #[error("Encryption key contains non-hex symbols")]
    ContainsNonHexSymbols,
}

/// A validated AES-128 key for DLMS packet decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionKey {
    key: [u8; 16],
}

impl EncryptionKey {
    /// Parse a key from a hex string like `"00112233445566778899AABBCCDDEEFF"`.
    ///
    /// Both uppercase and lowercase hex are accepted.
    pub fn from_hex(key_hex: &str) -> Result<Self, EncryptionKeyError> {
        if key_hex.len() != 32 {
            return Err(EncryptionKeyError::LengthIsNot32Bytes);
        }

        let bytes =
            hex::decode_hex(key_hex).map_err(|_| EncryptionKeyError::ContainsNonHexSymbols)?;

        // decode_hex strips whitespace, so a 32-char input may still decode short.
        if bytes.len() != 16 {
            return Err(EncryptionKeyError::ContainsNonHexSymbols);
        }

        let mut key = [0u8; 16];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.key
    }
}

impl From<[u8; 16]> for EncryptionKey {
    fn from(key: [u8; 16]) -> Self {
        Self { key }
    }
}

impl Default for EncryptionKey {
    /// An all-zero key. Decryption with it fails authentication for any
    /// real packet; callers are expected to install a provisioned key.
    fn default() -> Self {
        Self { key: [0u8; 16] }
    }
}
