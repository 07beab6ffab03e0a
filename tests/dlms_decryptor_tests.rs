//! Tests for one-shot DLMS packet decryption: the happy path, the error
//! matrix, and the zero-copy in-place variant.

mod common;

use common::{change_length, sample_packet, KEY_HEX, TELEGRAM_SAGEMCOM_T210_D_R};
use dsmr_rs::dlms::{DecryptError, DlmsDecryptor, EncryptionKey};

#[test]
fn decrypts_a_correct_packet() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let telegram = decryptor.decrypt(&sample_packet(), &key).unwrap();

    assert_eq!(telegram, TELEGRAM_SAGEMCOM_T210_D_R.as_bytes());
    assert!(telegram.starts_with(b"/EST5\\253710000_A\r\n"));
    assert!(telegram.ends_with(b"1-0:4.7.0(000000166*var)\r\n!7EF9\r\n"));
}

#[test]
fn decrypts_in_place() {
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();
    let mut packet = sample_packet();

    let telegram = DlmsDecryptor::decrypt_in_place(&mut packet, &key).unwrap();

    assert_eq!(telegram, TELEGRAM_SAGEMCOM_T210_D_R.as_bytes());
}

#[test]
fn fails_on_tampered_packet() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let mut packet = sample_packet();
    packet[50] ^= 0xFF;

    assert_eq!(
        decryptor.decrypt(&packet, &key),
        Err(DecryptError::DecryptionFailed)
    );
}

#[test]
fn fails_on_corrupted_header() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let mut packet = sample_packet();
    packet[0] = 0;

    assert_eq!(
        decryptor.decrypt(&packet, &key),
        Err(DecryptError::HeaderCorrupted)
    );
}

#[test]
fn fails_when_announced_length_disagrees_with_data() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let packet = sample_packet();

    assert_eq!(
        decryptor.decrypt(&packet[..packet.len() - 1], &key),
        Err(DecryptError::HeaderCorrupted)
    );
}

#[test]
fn fails_when_announced_length_underflows() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let mut packet = sample_packet();
    change_length(&mut packet, 16);

    assert_eq!(
        decryptor.decrypt(&packet, &key),
        Err(DecryptError::HeaderCorrupted)
    );
}

#[test]
fn fails_when_packet_is_too_small() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    assert_eq!(
        decryptor.decrypt(&[0u8; 10], &key),
        Err(DecryptError::EncryptedTelegramIsTooSmall)
    );
}

#[test]
fn fails_when_output_buffer_is_too_small() {
    let mut telegram_buffer = [0u8; 10];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    assert_eq!(
        decryptor.decrypt(&sample_packet(), &key),
        Err(DecryptError::DecryptedTelegramBufferIsTooSmall)
    );
}

#[test]
fn decryptor_is_reusable_after_errors() {
    let mut telegram_buffer = [0u8; 2000];
    let mut decryptor = DlmsDecryptor::new(&mut telegram_buffer);
    let key = EncryptionKey::from_hex(KEY_HEX).unwrap();

    let mut tampered = sample_packet();
    tampered[50] ^= 0xFF;
    assert!(decryptor.decrypt(&tampered, &key).is_err());

    let telegram = decryptor.decrypt(&sample_packet(), &key).unwrap();
    assert_eq!(telegram, TELEGRAM_SAGEMCOM_T210_D_R.as_bytes());
}
