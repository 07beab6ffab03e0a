//! # Streaming Framers
//!
//! Byte-at-a-time state machines that pull complete telegrams out of an
//! unsynchronised serial stream:
//!
//! - [`telegram`] — plaintext telegrams bracketed by `/` and `!`, with an
//!   optional CRC-16 trailer
//! - [`encrypted`] — DLMS containers that are decrypted on completion
//!
//! Both framers are allocation-free, own nothing beyond views into
//! caller-supplied buffers, process each byte in O(1) and recover from any
//! error by resynchronising on the next start marker. They are not thread
//! safe; wrap them in external mutual exclusion if shared.

pub mod encrypted;
pub mod telegram;

pub use encrypted::{EncryptedFramer, EncryptedFramerError};
pub use telegram::{TelegramFramer, TelegramFramerError};
