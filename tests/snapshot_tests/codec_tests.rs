//! Tests for the snapshot codec
//!
//! These tests verify:
//! - Header layout (magic, version, CRC, length)
//! - Decoding restores keys, empty indexes and column order
//! - Truncation, bad magic, bad version, length and CRC mismatches

use kcvstore::snapshot::{decode, encode, HEADER_SIZE};
use kcvstore::store::KeySpace;
use kcvstore::{ColumnIndex, KcvError};

type StringKeySpace = KeySpace<String, String, String>;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_keyspace() -> StringKeySpace {
    let mut keyspace = KeySpace::new();

    let a: ColumnIndex<String, String> = ["ac", "aa", "ab"]
        .iter()
        .map(|c| (c.to_string(), "x".to_string()))
        .collect();
    keyspace.insert("a".to_string(), a);
    keyspace.insert("empty".to_string(), ColumnIndex::new());

    keyspace
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_writes_header() {
    let bytes = encode(&sample_keyspace()).unwrap();

    assert!(bytes.len() > HEADER_SIZE);
    assert_eq!(&bytes[0..4], b"KCVS");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 1);

    let payload_len = u64::from_le_bytes(bytes[10..18].try_into().unwrap());
    assert_eq!(payload_len as usize, bytes.len() - HEADER_SIZE);

    let crc = u32::from_le_bytes(bytes[6..10].try_into().unwrap());
    assert_eq!(crc, crc32fast::hash(&bytes[HEADER_SIZE..]));
}

#[test]
fn test_encode_empty_keyspace() {
    let bytes = encode(&StringKeySpace::new()).unwrap();
    let decoded: StringKeySpace = decode(&bytes).unwrap();

    assert!(decoded.is_empty());
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_restores_keyspace() {
    let keyspace = sample_keyspace();

    let bytes = encode(&keyspace).unwrap();
    let decoded: StringKeySpace = decode(&bytes).unwrap();

    assert_eq!(decoded, keyspace);
}

#[test]
fn test_decode_keeps_empty_index_and_order() {
    let bytes = encode(&sample_keyspace()).unwrap();
    let decoded: StringKeySpace = decode(&bytes).unwrap();

    assert!(decoded["empty"].is_empty());

    let columns: Vec<&str> = decoded["a"].items().map(|(c, _)| c.as_str()).collect();
    assert_eq!(columns, ["aa", "ab", "ac"]);
}

#[test]
fn test_decode_non_string_types() {
    let mut keyspace: KeySpace<u64, i32, Vec<u8>> = KeySpace::new();
    keyspace
        .entry(9)
        .or_default()
        .insert_or_update(-1, vec![0, 1, 2]);

    let bytes = encode(&keyspace).unwrap();
    let decoded: KeySpace<u64, i32, Vec<u8>> = decode(&bytes).unwrap();

    assert_eq!(decoded[&9].get(&-1), Some(&vec![0, 1, 2]));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_decode_truncated_header() {
    let bytes = encode(&sample_keyspace()).unwrap();

    let result = decode::<String, String, String>(&bytes[..HEADER_SIZE - 1]);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

#[test]
fn test_decode_empty_input() {
    let result = decode::<String, String, String>(&[]);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

#[test]
fn test_decode_bad_magic() {
    let mut bytes = encode(&sample_keyspace()).unwrap();
    bytes[0] = b'X';

    let result = decode::<String, String, String>(&bytes);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

#[test]
fn test_decode_unsupported_version() {
    let mut bytes = encode(&sample_keyspace()).unwrap();
    bytes[4..6].copy_from_slice(&7u16.to_le_bytes());

    let result = decode::<String, String, String>(&bytes);

    assert!(matches!(result, Err(KcvError::UnsupportedVersion(7))));
}

#[test]
fn test_decode_truncated_payload() {
    let bytes = encode(&sample_keyspace()).unwrap();

    let result = decode::<String, String, String>(&bytes[..bytes.len() - 3]);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

#[test]
fn test_decode_trailing_garbage() {
    let mut bytes = encode(&sample_keyspace()).unwrap();
    bytes.extend_from_slice(b"junk");

    let result = decode::<String, String, String>(&bytes);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}

#[test]
fn test_decode_crc_mismatch() {
    let mut bytes = encode(&sample_keyspace()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;

    let result = decode::<String, String, String>(&bytes);

    assert!(matches!(result, Err(KcvError::SnapshotCorrupt(_))));
}
