//! On-disk value envelope.
//!
//! ```text
//! +---------+----------------+-----------------+
//! | version | crc32 (u32 le) | JSON payload    |
//! | 1 byte  | 4 bytes        | remaining bytes |
//! +---------+----------------+-----------------+
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StoreError;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

const HEADER_LEN: usize = 5;

/// Serialize a value into an envelope.
pub fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    let payload = serde_json::to_vec(value)?;
    let checksum = crc32fast::hash(&payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.push(ENVELOPE_VERSION);
    bytes.extend_from_slice(&checksum.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Verify and deserialize an envelope.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    let (&version, rest) = bytes
        .split_first()
        .ok_or_else(|| StoreError::InvalidFormat("Empty value".to_string()))?;
    if version != ENVELOPE_VERSION {
        return Err(StoreError::InvalidFormat(format!(
            "Unsupported envelope version: expected {}, got {}",
            ENVELOPE_VERSION, version
        )));
    }

    let (checksum_bytes, payload) = rest
        .split_first_chunk::<4>()
        .ok_or_else(|| StoreError::InvalidFormat("Truncated envelope header".to_string()))?;
    let expected = u32::from_le_bytes(*checksum_bytes);
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(StoreError::InvalidFormat(format!(
            "Checksum mismatch: expected {:08x}, got {:08x}",
            expected, actual
        )));
    }

    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = encode_value(&"V4").unwrap();
        assert_eq!(bytes.first(), Some(&ENVELOPE_VERSION));
        assert_eq!(bytes.len(), HEADER_LEN + "\"V4\"".len());
        let back: String = decode_value(&bytes).unwrap();
        assert_eq!(back, "V4");
    }

    #[test]
    fn test_corrupted_payload_is_rejected() {
        let mut bytes = encode_value(&vec![1, 2, 3]).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last = b'0';
        }
        let result: Result<Vec<u32>, _> = decode_value(&bytes);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let mut bytes = encode_value(&true).unwrap();
        if let Some(first) = bytes.first_mut() {
            *first = 9;
        }
        let result: Result<bool, _> = decode_value(&bytes);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let result: Result<bool, _> = decode_value(&[ENVELOPE_VERSION, 0, 0]);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
        let result: Result<bool, _> = decode_value(&[]);
        assert!(matches!(result, Err(StoreError::InvalidFormat(_))));
    }
}
