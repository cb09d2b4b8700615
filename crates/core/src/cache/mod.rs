pub mod codec;
pub mod fingerprint_cache;

pub use codec::{CacheFormat, IndexCodec, JsonCodec, MsgPackCodec};
pub use fingerprint_cache::{
    CACHE_FILE_NAME, CacheIndexFile, CacheRecord, Fingerprint, FingerprintCache,
};
