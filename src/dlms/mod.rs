//! # DLMS Container Handling
//!
//! Some meters (notably the Luxembourg "Smarty" deployment) do not put the
//! P1 telegram on the wire as plain ASCII: they wrap it in a DLMS
//! general-glo-ciphering container encrypted with AES-128-GCM. This module
//! holds everything needed to open that wrapper:
//!
//! - [`key`] — the provisioned AES-128 key and its hex-string constructor
//! - [`crypto`] — the GCM primitive behind a pluggable backend trait
//! - [`packet`] — the fixed 18-byte header and whole-packet layout
//! - [`decryptor`] — one-shot decryption of a complete packet
//!
//! Streaming reassembly of a packet from a raw byte stream lives in
//! [`crate::framer::encrypted`].

pub mod crypto;
pub mod decryptor;
pub mod key;
pub mod packet;

pub use crypto::{Aes128GcmBackend, RustCryptoAes128Gcm, AAD};
pub use decryptor::{DecryptError, DlmsDecryptor};
pub use key::{EncryptionKey, EncryptionKeyError};
pub use packet::{DlmsHeader, DlmsPacket, HeaderCorrupted};
