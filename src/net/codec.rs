//! Event encoding: JSON for text relays, bincode for binary ones.

use crate::error::CodecError;

use super::event::MatchEvent;

pub fn encode_json(event: &MatchEvent) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_json(text: &str) -> Result<MatchEvent, CodecError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode_binary(event: &MatchEvent) -> Result<Vec<u8>, CodecError> {
    Ok(bincode::serialize(event)?)
}

pub fn decode_binary(bytes: &[u8]) -> Result<MatchEvent, CodecError> {
    Ok(bincode::deserialize(bytes)?)
}
