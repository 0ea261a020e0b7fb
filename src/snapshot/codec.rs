//! Snapshot codec
//!
//! Converts a key space to and from the framed snapshot bytes.

use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KcvError, Result};
use crate::store::KeySpace;

use super::{HEADER_SIZE, MAGIC, VERSION};

/// Encode a full key space into snapshot bytes
///
/// Format: magic (4) + version (2) + crc (4) + payload_len (8) + payload
pub fn encode<K, C, V>(keyspace: &KeySpace<K, C, V>) -> Result<Vec<u8>>
where
    K: Serialize + Eq + Hash,
    C: Serialize + Ord,
    V: Serialize,
{
    let payload =
        bincode::serialize(keyspace).map_err(|e| KcvError::Serialization(e.to_string()))?;
    let crc = crc32fast::hash(&payload);

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Decode snapshot bytes into a key space
///
/// The header, length and checksum are all verified before the payload is
/// handed to bincode.
pub fn decode<K, C, V>(bytes: &[u8]) -> Result<KeySpace<K, C, V>>
where
    K: DeserializeOwned + Eq + Hash,
    C: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    if bytes.len() < HEADER_SIZE {
        return Err(KcvError::SnapshotCorrupt(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(KcvError::SnapshotCorrupt(format!(
            "Invalid snapshot magic: expected KCVS, got {:?}",
            &bytes[0..4]
        )));
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(KcvError::UnsupportedVersion(version));
    }

    let expected_crc = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[10..HEADER_SIZE]);
    let payload_len = u64::from_le_bytes(len_bytes);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() as u64 != payload_len {
        return Err(KcvError::SnapshotCorrupt(format!(
            "Payload length mismatch: header says {}, found {}",
            payload_len,
            payload.len()
        )));
    }

    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(KcvError::SnapshotCorrupt(format!(
            "CRC mismatch: expected {:08x}, computed {:08x}",
            expected_crc, actual_crc
        )));
    }

    bincode::deserialize(payload).map_err(|e| KcvError::SnapshotCorrupt(e.to_string()))
}
