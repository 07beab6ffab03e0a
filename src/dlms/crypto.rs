//! # AES-128-GCM Primitive
//!
//! The DLMS channel security scheme encrypts the telegram with AES-128-GCM
//! using a 12-byte nonce (system title + invocation counter), a fixed 17-byte
//! AAD and a tag truncated to 12 bytes.
//!
//! The cipher is reached through the [`Aes128GcmBackend`] trait so that an
//! alternative provider (a hardware AES engine, another software
//! implementation) can be dropped in. [`RustCryptoAes128Gcm`], built on the
//! `aes-gcm` crate, is the default backend.

use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::aes::Aes128;
use aes_gcm::{AesGcm, KeyInit};

use super::key::EncryptionKey;

/// AES-128-GCM with a 12-byte nonce and a 12-byte truncated tag.
pub type Aes128Gcm12 = AesGcm<Aes128, U12, U12>;

/// Additional authenticated data for every DLMS P1 packet: the security
/// control field (0x30) followed by the authentication key published in the
/// P1 channel-security specification. It is identical for all meters.
pub const AAD: [u8; 17] = [
    0x30, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
    0xEE, 0xFF,
];

/// Authenticated decryption provider for DLMS packets.
///
/// `decrypt_in_place` must verify the tag over AAD + ciphertext *before*
/// releasing any plaintext; on failure the buffer contents are unspecified
/// and must not be exposed by the caller.
pub trait Aes128GcmBackend: Default {
    /// Install the AES-128 key. Returns `false` if the provider rejects it.
    fn set_key(&mut self, key: &EncryptionKey) -> bool;

    /// Decrypt `buffer` in place and authenticate it against `tag`.
    ///
    /// Returns `true` when the tag matches and `buffer` holds the plaintext.
    fn decrypt_in_place(
        &self,
        nonce: &[u8; 12],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &[u8; 12],
    ) -> bool;
}

/// Default backend using the RustCrypto `aes-gcm` implementation.
#[derive(Default)]
pub struct RustCryptoAes128Gcm {
    cipher: Option<Aes128Gcm12>,
}

impl Aes128GcmBackend for RustCryptoAes128Gcm {
    fn set_key(&mut self, key: &EncryptionKey) -> bool {
        self.cipher = Some(Aes128Gcm12::new(GenericArray::from_slice(key.as_bytes())));
        true
    }

    fn decrypt_in_place(
        &self,
        nonce: &[u8; 12],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &[u8; 12],
    ) -> bool {
        let Some(cipher) = &self.cipher else {
            return false;
        };

        cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                aad,
                buffer,
                GenericArray::from_slice(tag),
            )
            .is_ok()
    }
}
