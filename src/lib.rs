//! # dsmr-rs - DSMR P1 Telegram Framing, Decryption and Parsing
//!
//! The dsmr-rs crate ingests and interprets P1 telegrams emitted by
//! DSMR-compliant smart electricity meters: the ASCII records carrying
//! energy, power, voltage, gas and water measurements, and the AES-128-GCM
//! encrypted DLMS containers some deployments wrap them in.
//!
//! ## Features
//!
//! - Locate telegrams in an unsynchronised byte stream with a streaming,
//!   allocation-free framer, including CRC-16 verification
//! - Reassemble and decrypt DLMS-wrapped telegrams byte by byte, or decrypt
//!   a complete packet in one shot
//! - Parse telegrams into caller-declared records of strongly typed fields,
//!   dispatched by OBIS identifier
//! - A full field library covering the DSMR 4/5 and Luxembourg schemas
//! - Structured error reporting with byte-exact caret diagnostics
//!
//! ## Usage
//!
//! To use the dsmr-rs crate in your Rust project, add the following to your
//! Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! dsmr-rs = "0.1.0"
//! ```
//!
//! Frame and parse a telegram from serial bytes:
//!
//! ```rust
//! use dsmr_rs::fields::{library, FixedField, RawField};
//! use dsmr_rs::framer::TelegramFramer;
//! use dsmr_rs::{dsmr_record, parser};
//!
//! dsmr_record! {
//!     pub struct MeterData {
//!         identification: RawField = library::identification(),
//!         power_delivered: FixedField = library::power_delivered(),
//!     }
//! }
//!
//! let mut buffer = [0u8; 2048];
//! let mut framer = TelegramFramer::new(&mut buffer, false);
//!
//! let mut data = MeterData::default();
//! for &byte in b"noise /AAA5MTR\r\n\r\n1-0:1.7.0(00.333*kW)\r\n! noise" {
//!     if let Ok(Some(telegram)) = framer.feed(byte) {
//!         parser::parse_with(
//!             &mut data,
//!             telegram,
//!             parser::ParseOptions { check_crc: false, unknown_error: false },
//!         )
//!         .unwrap();
//!     }
//! }
//! assert_eq!(data.power_delivered.value(), 0.333);
//! ```
//!
//! The crate performs no I/O and owns no buffers: serial port reading,
//! inter-frame-gap timing and buffer allocation belong to the caller.

pub mod dlms;
pub mod error;
pub mod fields;
pub mod framer;
pub mod parser;
pub mod util;

pub use dlms::{DlmsDecryptor, EncryptionKey};
pub use error::DsmrError;
pub use fields::{Field, FieldValue, Record};
pub use framer::{EncryptedFramer, TelegramFramer};
pub use parser::{Obis, ParseError, ParseErrorKind, ParseOptions};
