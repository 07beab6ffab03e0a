//! # Crate-Level Error Type
//!
//! Each subsystem reports its own error enum so callers can match on
//! exactly the failures that concern them. `DsmrError` folds them into one
//! type for pipelines that chain framing, decryption and parsing behind a
//! single `?`.

use thiserror::Error;

use crate::dlms::decryptor::DecryptError;
use crate::dlms::key::EncryptionKeyError;
use crate::framer::encrypted::EncryptedFramerError;
use crate::framer::telegram::TelegramFramerError;
use crate::parser::error::ParseError;

/// Any error this crate can produce.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsmrError {
    /// Plaintext framing failed.
    #[error(transparent)]
    Framing(#[from] TelegramFramerError),

    /// Encrypted packet framing or decryption failed.
    #[error(transparent)]
    EncryptedFraming(#[from] EncryptedFramerError),

    /// An encryption key could not be installed.
    #[error(transparent)]
    Key(#[from] EncryptionKeyError),

    /// One-shot DLMS decryption failed.
    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    /// Telegram parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
