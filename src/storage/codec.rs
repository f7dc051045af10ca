//! Log record codec seam.

use crate::LogRecord;
use crate::Result;
use crate::SerializationError;

/// Turns log records into engine values and back.
pub trait LogCodec: Send + Sync + 'static {
    fn encode(
        &self,
        record: &LogRecord,
    ) -> Result<Vec<u8>>;

    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<LogRecord>;
}

/// Default codec: serde + bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl LogCodec for BincodeCodec {
    fn encode(
        &self,
        record: &LogRecord,
    ) -> Result<Vec<u8>> {
        bincode::serialize(record).map_err(|e| SerializationError::Encode(e.to_string()).into())
    }

    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<LogRecord> {
        bincode::deserialize(bytes).map_err(|e| SerializationError::Decode(e.to_string()).into())
    }
}
