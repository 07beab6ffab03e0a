//! # DLMS Packet Layout
//!
//! An encrypted P1 packet is a DLMS "general-glo-ciphering" container:
//!
//! ```text
//! offset  size  field
//!      0     1  tag, always 0xDB
//!      1     1  system title length, always 0x08
//!      2     8  system title
//!     10     1  long-form length indicator, always 0x82
//!     11     2  total length, big endian
//!     13     1  security control field, always 0x30
//!     14     4  invocation counter, big endian
//!     18     N  ciphertext
//!   18+N    12  GCM tag (truncated)
//! ```
//!
//! The total length counts the security control field, the invocation
//! counter, the ciphertext and the tag. The layout is defined by byte
//! offset, so every multi-byte field is decoded explicitly as big endian
//! rather than through a packed struct.

use thiserror::Error;

/// The fixed header bytes could not be validated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("DLMS packet header corrupted")]
pub struct HeaderCorrupted;

/// The 18-byte fixed header of a DLMS packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlmsHeader {
    bytes: [u8; Self::LEN],
}

impl DlmsHeader {
    /// Size of the fixed header in bytes.
    pub const LEN: usize = 18;

    /// Start-of-packet marker.
    pub const TAG: u8 = 0xDB;

    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self { bytes }
    }

    /// Length of ciphertext plus GCM tag announced by the header.
    ///
    /// Computed as total length minus the security control field and the
    /// invocation counter. Signed, because a corrupt total length may
    /// announce less than the five bytes already consumed.
    pub fn body_len(&self) -> i32 {
        let total = u16::from_be_bytes([self.bytes[11], self.bytes[12]]);
        i32::from(total) - 5
    }

    /// Check the constant header fields. There is no checksum over the
    /// header, so this plus a length sanity check is the best validation
    /// available before committing to a body.
    pub fn is_consistent(&self) -> bool {
        self.bytes[0] == Self::TAG
            && self.bytes[1] == 0x08
            && self.bytes[10] == 0x82
            && self.bytes[13] == 0x30
    }

    /// GCM nonce (also called IV): system title followed by the invocation
    /// counter, both in transmission order.
    pub fn nonce(&self) -> [u8; 12] {
        let mut nonce = [0u8; 12];
        nonce[..8].copy_from_slice(&self.bytes[2..10]);
        nonce[8..].copy_from_slice(&self.bytes[14..18]);
        nonce
    }

    /// The meter's 8-byte system title.
    pub fn system_title(&self) -> &[u8] {
        &self.bytes[2..10]
    }

    /// The monotonic frame counter used in the nonce.
    pub fn invocation_counter(&self) -> u32 {
        u32::from_be_bytes([self.bytes[14], self.bytes[15], self.bytes[16], self.bytes[17]])
    }
}

/// A validated view over a complete DLMS packet.
#[derive(Debug, Clone, Copy)]
pub struct DlmsPacket<'a> {
    bytes: &'a [u8],
    ciphertext_len: usize,
}

impl<'a> DlmsPacket<'a> {
    /// Length of the truncated GCM tag.
    pub const GCM_TAG_LEN: usize = 12;

    /// Smallest possible packet: header plus tag, zero ciphertext.
    pub const MIN_LEN: usize = DlmsHeader::LEN + Self::GCM_TAG_LEN;

    /// Validate `bytes` as a complete DLMS packet.
    ///
    /// Checks the fixed header bytes and that the buffer length matches the
    /// announced total length exactly.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, HeaderCorrupted> {
        if bytes.len() < Self::MIN_LEN {
            return Err(HeaderCorrupted);
        }

        let header = Self::header_of(bytes);
        let ciphertext_len = header.body_len() - Self::GCM_TAG_LEN as i32;
        if !header.is_consistent() || ciphertext_len < 0 {
            return Err(HeaderCorrupted);
        }

        let ciphertext_len = ciphertext_len as usize;
        if bytes.len() != DlmsHeader::LEN + ciphertext_len + Self::GCM_TAG_LEN {
            return Err(HeaderCorrupted);
        }

        Ok(Self {
            bytes,
            ciphertext_len,
        })
    }

    fn header_of(bytes: &[u8]) -> DlmsHeader {
        let mut header = [0u8; DlmsHeader::LEN];
        header.copy_from_slice(&bytes[..DlmsHeader::LEN]);
        DlmsHeader::new(header)
    }

    /// The fixed header.
    pub fn header(&self) -> DlmsHeader {
        Self::header_of(self.bytes)
    }

    /// GCM nonce derived from the header.
    pub fn nonce(&self) -> [u8; 12] {
        self.header().nonce()
    }

    /// The encrypted telegram, without the trailing tag.
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[DlmsHeader::LEN..DlmsHeader::LEN + self.ciphertext_len]
    }

    /// Position of the ciphertext within the packet, for in-place decryption.
    pub fn ciphertext_range(&self) -> core::ops::Range<usize> {
        DlmsHeader::LEN..DlmsHeader::LEN + self.ciphertext_len
    }

    /// The truncated GCM tag, always the last 12 bytes.
    pub fn tag(&self) -> [u8; 12] {
        let mut tag = [0u8; 12];
        tag.copy_from_slice(&self.bytes[DlmsHeader::LEN + self.ciphertext_len..]);
        tag
    }
}
