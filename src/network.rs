use crate::event::{MessageError, PeerMessage};


pub const PORT: u16 = 38617;

pub fn serialize_message(msg: &PeerMessage) -> String {
    // Plain data with string keys: serialization cannot fail.
    serde_json::to_string(msg).unwrap()
}

pub fn parse_message(s: &str) -> Result<PeerMessage, MessageError> {
    serde_json::from_str(s).map_err(|err| MessageError::Json(err.to_string()))
}
