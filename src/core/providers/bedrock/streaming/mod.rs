//! Streaming Module for Bedrock
//!
//! Decodes `invoke-with-response-stream` bodies into text. Each frame carries a
//! JSON envelope whose `bytes` field is the base64 encoding of the model's own
//! JSON chunk.

pub mod event_stream;

pub use event_stream::{
    AwsEventStreamCodec, EventStreamHeader, EventStreamMarshaller, EventStreamMessage,
    HeaderValue, event_frames,
};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use futures::TryStreamExt;
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::callbacks::TokenObserver;
use crate::core::providers::bedrock::chat::prepare_output;
use crate::core::providers::bedrock::error::BedrockError;
use crate::core::providers::bedrock::model_config::ProviderKind;
use crate::core::providers::bedrock::transport::ByteStream;
use crate::core::providers::unified_provider::ProviderError;

pub const EVENT_TYPE_HEADER: &str = ":event-type";
pub const CONTENT_TYPE_HEADER: &str = ":content-type";
pub const MESSAGE_TYPE_HEADER: &str = ":message-type";

/// Check that an event is a JSON `chunk` event.
///
/// `:message-type` may be absent; when present it must be `event`.
pub fn validate_event(
    message: &EventStreamMessage,
    frame: &[u8],
    position: u64,
) -> Result<(), ProviderError> {
    let is_chunk = message.string_header(EVENT_TYPE_HEADER) == Some("chunk");
    let is_json = message.string_header(CONTENT_TYPE_HEADER) == Some("application/json");
    let is_event = matches!(message.string_header(MESSAGE_TYPE_HEADER), None | Some("event"));

    if is_chunk && is_json && is_event {
        Ok(())
    } else {
        Err(BedrockError::stream_decode(
            position,
            frame,
            format!(
                "Failed to get event chunk: got {}",
                String::from_utf8_lossy(frame)
            ),
        ))
    }
}

/// Decode a chunk event's payload into the model's JSON object.
///
/// The payload is `{"bytes": "<base64>"}` and the base64 decodes to the JSON
/// the model emitted for this chunk.
pub fn decode_event_payload(payload: &[u8], position: u64) -> Result<Value, ProviderError> {
    let fail = |message: String| BedrockError::stream_decode(position, payload, message);

    let envelope = std::str::from_utf8(payload)
        .map_err(|e| fail(format!("event payload is not UTF-8: {}", e)))?;
    let envelope: Value = serde_json::from_str(envelope)
        .map_err(|e| fail(format!("event payload is not JSON: {}", e)))?;
    let encoded = envelope
        .get("bytes")
        .and_then(Value::as_str)
        .ok_or_else(|| fail("event payload has no 'bytes' field".to_string()))?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| fail(format!("invalid base64 in event payload: {}", e)))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|e| fail(format!("decoded chunk is not UTF-8: {}", e)))?;

    serde_json::from_str(&decoded).map_err(|e| fail(format!("decoded chunk is not JSON: {}", e)))
}

/// Turn one raw frame into its text fragment
pub fn decode_frame(
    provider: ProviderKind,
    marshaller: &dyn EventStreamMarshaller,
    frame: &Bytes,
    position: u64,
) -> Result<String, ProviderError> {
    let message = marshaller.unmarshal(frame).map_err(|e| at_position(e, position))?;
    validate_event(&message, frame, position)?;
    let chunk = decode_event_payload(&message.payload, position)?;
    prepare_output(provider, &chunk, true)
}

/// Drive a streamed body to completion.
///
/// Frames are decoded strictly in order; each fragment reaches `observer`
/// before the next frame is read. Any failure discards the text gathered so
/// far.
pub async fn collect_text(
    provider: ProviderKind,
    body: ByteStream,
    marshaller: &dyn EventStreamMarshaller,
    observer: &dyn TokenObserver,
) -> Result<String, ProviderError> {
    let (text, frames) = event_frames(body)
        .try_fold(
            (String::new(), 0u64),
            |(mut text, position), frame| async move {
                let fragment = decode_frame(provider, marshaller, &frame, position)?;
                trace!(position, len = fragment.len(), "Decoded stream fragment");

                observer.on_new_token(&fragment).await;
                text.push_str(&fragment);
                Ok((text, position + 1))
            },
        )
        .await?;

    debug!(frames, chars = text.len(), "Stream completed");
    Ok(text)
}

/// Codecs report offsets within a frame; stamp the frame index instead
fn at_position(error: ProviderError, frame_index: u64) -> ProviderError {
    match error {
        ProviderError::Streaming {
            provider,
            stream_type,
            last_chunk,
            message,
            ..
        } => ProviderError::Streaming {
            provider,
            stream_type,
            position: Some(frame_index),
            last_chunk,
            message,
        },
        other => other,
    }
}
