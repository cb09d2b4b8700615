//! Serializers for the persisted fingerprint index.

use super::fingerprint_cache::CacheIndexFile;
use crate::error::CacheError;
use serde::{Deserialize, Serialize};

/// On-disk encoding of the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheFormat {
    /// MessagePack, zstd-compressed
    #[default]
    MsgPack,
    /// Pretty-printed JSON, for debugging
    Json,
}

impl CacheFormat {
    pub fn codec(self) -> &'static dyn IndexCodec {
        match self {
            Self::MsgPack => &MsgPackCodec,
            Self::Json => &JsonCodec,
        }
    }
}

pub trait IndexCodec: Send + Sync {
    fn encode(&self, index: &CacheIndexFile) -> Result<Vec<u8>, CacheError>;
    fn decode(&self, bytes: &[u8]) -> Result<CacheIndexFile, CacheError>;
}

pub struct MsgPackCodec;

impl IndexCodec for MsgPackCodec {
    fn encode(&self, index: &CacheIndexFile) -> Result<Vec<u8>, CacheError> {
        let bytes = rmp_serde::to_vec(index)
            .map_err(|e| CacheError::Encode(format!("MSGPACK error: {}", e)))?;

        zstd::encode_all(&bytes[..], 0)
            .map_err(|e| CacheError::Encode(format!("Zstd compression failed: {}", e)))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CacheIndexFile, CacheError> {
        let decompressed = zstd::decode_all(bytes)
            .map_err(|e| CacheError::Decode(format!("Zstd decompression failed: {}", e)))?;

        rmp_serde::from_slice(&decompressed)
            .map_err(|e| CacheError::Decode(format!("MSGPACK error: {}", e)))
    }
}

pub struct JsonCodec;

impl IndexCodec for JsonCodec {
    fn encode(&self, index: &CacheIndexFile) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec_pretty(index).map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CacheIndexFile, CacheError> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}
