//! Shared helpers for the encrypted-packet test suites: builds DLMS
//! containers with the same scheme the meters use (AES-128-GCM, 12-byte
//! truncated tag, fixed AAD) so the tests need no binary fixtures.
#![allow(dead_code)]

use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::aes::Aes128;
use aes_gcm::{AesGcm, KeyInit};

use dsmr_rs::dlms::AAD;

type Aes128Gcm12 = AesGcm<Aes128, U12, U12>;

/// Telegram of a Sagemcom T210-D-R as transmitted by the Luxembourg
/// "Smarty" deployment.
pub const TELEGRAM_SAGEMCOM_T210_D_R: &str = "/EST5\\253710000_A\r\n\
\r\n\
1-3:0.2.8(50)\r\n\
0-0:1.0.0(221006155014S)\r\n\
1-0:1.8.0(006545766*Wh)\r\n\
1-0:1.8.1(005017120*Wh)\r\n\
1-0:1.8.2(001528646*Wh)\r\n\
1-0:1.7.0(000000286*W)\r\n\
1-0:2.8.0(000000058*Wh)\r\n\
1-0:2.8.1(000000000*Wh)\r\n\
1-0:2.8.2(000000058*Wh)\r\n\
1-0:2.7.0(000000000*W)\r\n\
1-0:3.8.0(000000747*varh)\r\n\
1-0:3.8.1(000000000*varh)\r\n\
1-0:3.8.2(000000747*varh)\r\n\
1-0:3.7.0(000000000*var)\r\n\
1-0:4.8.0(003897726*varh)\r\n\
1-0:4.8.1(002692848*varh)\r\n\
1-0:4.8.2(001204878*varh)\r\n\
1-0:4.7.0(000000166*var)\r\n\
!7EF9\r\n";

pub const KEY_HEX: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub const SYSTEM_TITLE: &[u8; 8] = b"SYSTEMID";

pub const INVOCATION_COUNTER: [u8; 4] = [0x10, 0x00, 0x00, 0x01];

/// Build a complete DLMS packet around `plaintext`.
pub fn encrypted_packet(plaintext: &[u8]) -> Vec<u8> {
    let key: [u8; 16] = [0xAA; 16];
    let cipher = Aes128Gcm12::new(GenericArray::from_slice(&key));

    let mut nonce = [0u8; 12];
    nonce[..8].copy_from_slice(SYSTEM_TITLE);
    nonce[8..].copy_from_slice(&INVOCATION_COUNTER);

    let mut body = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), &AAD, &mut body)
        .expect("encryption cannot fail");

    let total_len = (1 + 4 + body.len() + tag.len()) as u16;

    let mut packet = vec![0xDB, 0x08];
    packet.extend_from_slice(SYSTEM_TITLE);
    packet.push(0x82);
    packet.extend_from_slice(&total_len.to_be_bytes());
    packet.push(0x30);
    packet.extend_from_slice(&INVOCATION_COUNTER);
    packet.extend_from_slice(&body);
    packet.extend_from_slice(&tag);
    packet
}

/// The reference packet used across the encrypted suites.
pub fn sample_packet() -> Vec<u8> {
    encrypted_packet(TELEGRAM_SAGEMCOM_T210_D_R.as_bytes())
}

/// Overwrite the announced total length of a packet.
pub fn change_length(packet: &mut [u8], total_len: u16) {
    packet[11..13].copy_from_slice(&total_len.to_be_bytes());
}
