//! Bytes handed to the engine for each key form.

use proptest::prelude::*;
use rowmap::rowmap_security::{hex_literal_len, KeyError, KeyFormatter, KeyMaterial, Wipe};

/// Leaves every byte in place
struct LeakyWipe;

impl Wipe for LeakyWipe {
    fn zero(&self, _bytes: &mut [u8]) {}
}

fn formatted(key: KeyMaterial<'_>) -> Vec<u8> {
    KeyFormatter::new()
        .apply(key, |bytes| Ok(bytes.to_vec()))
        .unwrap()
}

#[test]
fn test_raw_bytes_become_quoted_hex() {
    assert_eq!(formatted(KeyMaterial::Raw(&[0x01, 0xAB])), b"x'01ab'".to_vec());
    assert_eq!(formatted(KeyMaterial::Raw(&[])), b"x''".to_vec());
}

#[test]
fn test_32_byte_key_literal() {
    let key = [0xA5u8; 32];
    let out = formatted(KeyMaterial::Raw(&key));
    assert_eq!(out.len(), 67);
    assert_eq!(&out[..2], b"x'");
    assert_eq!(out[66], b'\'');
    assert!(out[2..66].chunks(2).all(|pair| pair == b"a5"));
}

#[test]
fn test_passphrase_passes_through() {
    assert_eq!(formatted(KeyMaterial::Passphrase("correct horse")), b"correct horse".to_vec());
    assert_eq!(formatted(KeyMaterial::from("")), Vec::<u8>::new());
}

#[test]
fn test_scratch_wiped_on_engine_error() {
    let mut formatter = KeyFormatter::new();
    let err = formatter
        .apply(KeyMaterial::Raw(b"secret-key-bytes"), |bytes| -> Result<(), _> {
            assert_eq!(bytes.len(), hex_literal_len(16));
            Err(rowmap::rowmap_security::EngineError::new("disk I/O error"))
        })
        .unwrap_err();
    assert!(matches!(err, KeyError::Engine(_)));
    assert!(formatter.scratch().iter().all(|b| *b == 0));
}

#[test]
fn test_incomplete_wipe_is_an_error() {
    let mut formatter = KeyFormatter::with_wiper(LeakyWipe);
    let err = formatter
        .apply(KeyMaterial::Raw(&[0xff; 8]), |_| Ok(()))
        .unwrap_err();
    assert_eq!(
        err,
        KeyError::SecureWipeFailure {
            remaining: hex_literal_len(8)
        }
    );
}

proptest! {
    #[test]
    fn prop_raw_literal_shape(raw in proptest::collection::vec(any::<u8>(), 0..48)) {
        let out = formatted(KeyMaterial::Raw(&raw));
        prop_assert_eq!(out.len(), 2 * raw.len() + 3);
        prop_assert_eq!(&out[..2], b"x'");
        prop_assert_eq!(out[out.len() - 1], b'\'');
        let digits = &out[2..out.len() - 1];
        prop_assert!(digits.iter().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(c)));
        prop_assert_eq!(hex::decode(digits).unwrap(), raw);
    }
}
