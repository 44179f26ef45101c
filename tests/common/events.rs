//! Event-stream frame builders
//!
//! Frames are built the way Bedrock sends them: a JSON envelope
//! `{"bytes": "<base64>"}` around the model's own JSON chunk.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bedrock_llm::core::providers::bedrock::streaming::{
    AwsEventStreamCodec, EventStreamHeader, EventStreamMarshaller, EventStreamMessage,
};
use bytes::{Bytes, BytesMut};
use serde_json::{Value, json};

/// Headers of a well-formed chunk event
pub fn chunk_headers() -> Vec<EventStreamHeader> {
    vec![
        EventStreamHeader::string(":event-type", "chunk"),
        EventStreamHeader::string(":content-type", "application/json"),
        EventStreamHeader::string(":message-type", "event"),
    ]
}

/// Frame carrying `chunk` under arbitrary headers
pub fn event_with_headers(headers: Vec<EventStreamHeader>, chunk: &Value) -> Bytes {
    let envelope = json!({ "bytes": STANDARD.encode(chunk.to_string()) });
    AwsEventStreamCodec
        .marshal(&EventStreamMessage::new(headers, envelope.to_string()))
        .expect("test frame should encode")
}

/// Well-formed chunk event carrying `chunk`
pub fn chunk_event(chunk: Value) -> Bytes {
    event_with_headers(chunk_headers(), &chunk)
}

/// Concatenate frames into one wire buffer
pub fn concat(frames: &[Bytes]) -> Bytes {
    let mut wire = BytesMut::new();
    for frame in frames {
        wire.extend_from_slice(frame);
    }
    wire.freeze()
}

/// Cut a buffer into pieces of at most `size` bytes
pub fn split_every(wire: &Bytes, size: usize) -> Vec<Bytes> {
    (0..wire.len())
        .step_by(size)
        .map(|start| wire.slice(start..(start + size).min(wire.len())))
        .collect()
}
