//! Cryptographic Utilities

use std::ops::RangeInclusive;

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Uniformly pick a number from `range` using the OS RNG
pub fn random_in_range(range: RangeInclusive<u32>) -> u32 {
    OsRng.gen_range(range)
}

/// Encode bytes as unpadded base64url (JWS segment encoding)
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA-512
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA-512 tag in constant time
pub fn verify_hmac_sha512(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha512_rfc4231_case2() {
        let mac = hmac_sha512(b"Jefe", b"what do ya want for nothing?");
        let expected = hex::decode(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737",
        )
        .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_verify_hmac_sha512() {
        let key = [7u8; 32];
        let tag = hmac_sha512(&key, b"payload");
        assert!(verify_hmac_sha512(&key, b"payload", &tag));
        assert!(!verify_hmac_sha512(&key, b"payload!", &tag));
        assert!(!verify_hmac_sha512(&[8u8; 32], b"payload", &tag));
        assert!(!verify_hmac_sha512(&key, b"payload", &tag[..32]));
    }

    #[test]
    fn test_base64url_has_no_padding_or_plus() {
        let encoded = to_base64url(&[0xfb, 0xff, 0xfe, 0x01]);
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(from_base64url(&encoded).unwrap(), vec![0xfb, 0xff, 0xfe, 0x01]);
    }

    #[test]
    fn test_random_in_range_bounds() {
        for _ in 0..1_000 {
            let n = random_in_range(100_000..=999_999);
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
