//! Relay boundary: event payloads and their encodings.

pub mod codec;
pub mod event;

pub use codec::{decode_binary, decode_json, encode_binary, encode_json};
pub use event::MatchEvent;
