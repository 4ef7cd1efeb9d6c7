//! Checksummed public identity (34 bytes)
//!
//! The first 32 bytes are the public key payload, the last two are the first
//! two bytes of SHA3-512 over the payload.

use sha3::{Digest, Sha3_512};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Payload was not 32 bytes
    #[error("invalid payload length: expected 32 bytes, got {0}")]
    InvalidPayloadLength(usize),
    /// Printable form was not 70 characters
    #[error("invalid identity length: expected 70 characters, got {0}")]
    InvalidLength(usize),
    /// Printable form did not start with 0x
    #[error("identity strings must start with 0x")]
    MissingPrefix,
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Checksum did not match payload
    #[error("bad checksum")]
    BadChecksum,
}

/// Public identity: 32 payload bytes followed by a 2-byte checksum
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity([u8; 34]);

fn checksum(payload: &[u8]) -> [u8; 2] {
    let digest = Sha3_512::digest(payload);
    [digest[0], digest[1]]
}

impl Identity {
    /// Size of identity in bytes
    pub const LEN: usize = 34;

    /// Size of the payload in bytes
    pub const PAYLOAD_LEN: usize = 32;

    /// Length of the printable form, including the 0x prefix
    pub const HEX_LEN: usize = 70;

    /// Build an identity from a 32-byte payload, appending the checksum
    pub fn generate(payload: &[u8]) -> Result<Self, IdentityError> {
        if payload.len() != Self::PAYLOAD_LEN {
            return Err(IdentityError::InvalidPayloadLength(payload.len()));
        }
        let mut bytes = [0u8; 34];
        bytes[..32].copy_from_slice(payload);
        bytes[32..].copy_from_slice(&checksum(payload));
        Ok(Identity(bytes))
    }

    /// Build an identity from a fixed-size payload
    pub fn from_payload(payload: [u8; 32]) -> Self {
        let mut bytes = [0u8; 34];
        bytes[..32].copy_from_slice(&payload);
        bytes[32..].copy_from_slice(&checksum(&payload));
        Identity(bytes)
    }

    /// Create identity from raw bytes, rejecting a bad checksum
    pub fn from_bytes(bytes: [u8; 34]) -> Result<Self, IdentityError> {
        if !Self::validate_bytes(&bytes) {
            return Err(IdentityError::BadChecksum);
        }
        Ok(Identity(bytes))
    }

    /// Check that the trailing checksum matches the payload
    pub fn validate_bytes(bytes: &[u8; 34]) -> bool {
        checksum(&bytes[..32]) == bytes[32..]
    }

    /// Recompute the checksum and compare it to the stored one
    pub fn validate(&self) -> bool {
        Self::validate_bytes(&self.0)
    }

    /// Parse the printable `0x`-prefixed form
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        if s.len() != Self::HEX_LEN {
            return Err(IdentityError::InvalidLength(s.len()));
        }
        let digits = s.strip_prefix("0x").ok_or(IdentityError::MissingPrefix)?;
        let mut bytes = [0u8; 34];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| IdentityError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 34] {
        &self.0
    }

    /// Get the 32-byte payload (the public key)
    pub fn payload(&self) -> [u8; 32] {
        let mut payload = [0u8; 32];
        payload.copy_from_slice(&self.0[..32]);
        payload
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..3])
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Serde implementation (behind feature flag)
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Identity {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Identity {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Identity::parse(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ZERO_PAYLOAD_ID: &str =
        "0x0000000000000000000000000000000000000000000000000000000000000000ad56";

    // ==================== Generation tests ====================

    #[test]
    fn test_generate_zero_payload() {
        let id = Identity::generate(&[0u8; 32]).unwrap();
        assert_eq!(id.to_hex(), ZERO_PAYLOAD_ID);
        assert!(id.validate());
    }

    #[test]
    fn test_generate_known_checksum() {
        // sha3_512([0xab; 32]) starts with 90a5
        let id = Identity::generate(&[0xab; 32]).unwrap();
        assert_eq!(&id.as_bytes()[32..], &[0x90, 0xa5]);
    }

    #[test]
    fn test_generate_wrong_length() {
        assert_eq!(
            Identity::generate(&[0u8; 31]),
            Err(IdentityError::InvalidPayloadLength(31))
        );
        assert_eq!(
            Identity::generate(&[0u8; 33]),
            Err(IdentityError::InvalidPayloadLength(33))
        );
        assert_eq!(
            Identity::generate(&[]),
            Err(IdentityError::InvalidPayloadLength(0))
        );
    }

    #[test]
    fn test_from_payload_matches_generate() {
        let payload = [0x42; 32];
        assert_eq!(
            Identity::from_payload(payload),
            Identity::generate(&payload).unwrap()
        );
        assert_eq!(Identity::from_payload(payload).payload(), payload);
    }

    // ==================== Parsing tests ====================

    #[test]
    fn test_parse_valid() {
        let id = Identity::parse(ZERO_PAYLOAD_ID).unwrap();
        assert_eq!(id.payload(), [0u8; 32]);
        assert_eq!(id.to_string(), ZERO_PAYLOAD_ID);
    }

    #[test]
    fn test_parse_uppercase_hex() {
        let upper = ZERO_PAYLOAD_ID.replace("ad56", "AD56");
        let id = Identity::parse(&upper).unwrap();
        assert_eq!(id.to_hex(), ZERO_PAYLOAD_ID);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            Identity::parse("blah"),
            Err(IdentityError::InvalidLength(4))
        );
        assert_eq!(Identity::parse(""), Err(IdentityError::InvalidLength(0)));
        assert!(matches!(
            Identity::parse("0xblahblahblah"),
            Err(IdentityError::InvalidLength(14))
        ));
    }

    #[test]
    fn test_parse_missing_prefix() {
        let no_prefix = format!("00{}", &ZERO_PAYLOAD_ID[2..]);
        assert_eq!(
            Identity::parse(&no_prefix),
            Err(IdentityError::MissingPrefix)
        );
    }

    #[test]
    fn test_parse_malformed_hex() {
        let bad = format!("0x{}", "zz".repeat(34));
        assert!(matches!(
            Identity::parse(&bad),
            Err(IdentityError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_parse_bad_checksum() {
        let bad = "0x12345678901234567890123456789012345678901234567890123456789012345678";
        assert_eq!(Identity::parse(bad), Err(IdentityError::BadChecksum));
    }

    #[test]
    fn test_parse_multibyte_input_does_not_panic() {
        // 70 bytes, but the prefix position lands inside a multi-byte char
        let s = format!("é{}", "0".repeat(68));
        assert_eq!(s.len(), 70);
        assert!(Identity::parse(&s).is_err());

        let s = format!("0x{}é", "0".repeat(66));
        assert_eq!(s.len(), 70);
        assert!(Identity::parse(&s).is_err());
    }

    #[test]
    fn test_from_str() {
        let id: Identity = ZERO_PAYLOAD_ID.parse().unwrap();
        assert_eq!(id, Identity::from_payload([0u8; 32]));
    }

    // ==================== Validation tests ====================

    #[test]
    fn test_from_bytes_rejects_bad_checksum() {
        let mut bytes = *Identity::from_payload([7u8; 32]).as_bytes();
        bytes[33] ^= 0x01;
        assert_eq!(Identity::from_bytes(bytes), Err(IdentityError::BadChecksum));
    }

    #[test]
    fn test_short_form() {
        let id = Identity::from_payload([0xab; 32]);
        assert_eq!(id.short(), "ababab");
    }

    #[test]
    fn test_debug_format() {
        let id = Identity::from_payload([0u8; 32]);
        let expected = format!("Identity({})", ZERO_PAYLOAD_ID);
        assert_eq!(format!("{:?}", id), expected);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_string_form() {
        let id = Identity::from_payload([1u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad = format!("\"0x{}\"", "12".repeat(34));
        assert!(serde_json::from_str::<Identity>(&bad).is_err());
    }

    // ==================== Checksum properties ====================

    #[test]
    fn test_every_single_bit_flip_breaks_checksum() {
        let mut counting = [0u8; 32];
        for (i, b) in counting.iter_mut().enumerate() {
            *b = i as u8;
        }
        for payload in [[0u8; 32], [0xab; 32], [0xff; 32], counting] {
            let original = *Identity::from_payload(payload).as_bytes();
            for bit in 0..256 {
                let mut bytes = original;
                bytes[bit / 8] ^= 1 << (bit % 8);
                assert!(!Identity::validate_bytes(&bytes), "bit {} collided", bit);
            }
        }
    }

    #[test]
    fn test_random_payloads_validate() {
        use rand::RngCore;
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let mut payload = [0u8; 32];
            rng.fill_bytes(&mut payload);
            let id = Identity::generate(&payload).unwrap();
            assert!(id.validate());
        }
    }

    proptest! {
        #[test]
        fn prop_generated_identities_roundtrip(payload in proptest::array::uniform32(any::<u8>())) {
            let id = Identity::from_payload(payload);
            prop_assert!(id.validate());
            prop_assert_eq!(Identity::parse(&id.to_hex()).unwrap(), id);
        }

        #[test]
        fn prop_parse_never_panics(s in "\\PC{0,80}") {
            let _ = Identity::parse(&s);
        }
    }
}
