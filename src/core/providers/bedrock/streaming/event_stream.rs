//! AWS Event Stream codec
//!
//! Binary framing used by `invoke-with-response-stream`. Every frame is laid
//! out as
//!
//! ```text
//! total_len:u32 | headers_len:u32 | prelude_crc:u32 | headers | payload | message_crc:u32
//! ```
//!
//! with all integers big endian and both checksums CRC-32/IEEE.

use async_stream::try_stream;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::core::providers::bedrock::error::BedrockError;
use crate::core::providers::bedrock::transport::ByteStream;
use crate::core::providers::unified_provider::ProviderError;

const PRELUDE_LEN: usize = 12;
const CRC_LEN: usize = 4;
/// Prelude plus trailing message checksum
pub const MIN_FRAME_LEN: usize = PRELUDE_LEN + CRC_LEN;
/// Largest frame the event-stream format allows (16 MiB)
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// One decoded event-stream frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventStreamMessage {
    pub headers: Vec<EventStreamHeader>,
    pub payload: Bytes,
}

impl EventStreamMessage {
    /// Create a message from headers and payload
    pub fn new(headers: Vec<EventStreamHeader>, payload: impl Into<Bytes>) -> Self {
        Self {
            headers,
            payload: payload.into(),
        }
    }

    /// Look up a header by name
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|header| header.name == name)
            .map(|header| &header.value)
    }

    /// Look up a string-typed header by name
    pub fn string_header(&self, name: &str) -> Option<&str> {
        match self.header(name) {
            Some(HeaderValue::String(value)) => Some(value),
            _ => None,
        }
    }
}

/// Event stream header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStreamHeader {
    pub name: String,
    pub value: HeaderValue,
}

impl EventStreamHeader {
    pub fn new(name: impl Into<String>, value: HeaderValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Shorthand for the common string-typed header
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, HeaderValue::String(value.into()))
    }
}

/// Header value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    ByteArray(Bytes),
    String(String),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    Uuid([u8; 16]),
}

impl HeaderValue {
    fn type_code(&self) -> u8 {
        match self {
            Self::Boolean(true) => 0,
            Self::Boolean(false) => 1,
            Self::Byte(_) => 2,
            Self::Short(_) => 3,
            Self::Integer(_) => 4,
            Self::Long(_) => 5,
            Self::ByteArray(_) => 6,
            Self::String(_) => 7,
            Self::Timestamp(_) => 8,
            Self::Uuid(_) => 9,
        }
    }
}

/// Converts between raw frames and [`EventStreamMessage`]s
pub trait EventStreamMarshaller: Send + Sync {
    /// Decode exactly one complete frame
    fn unmarshal(&self, frame: &[u8]) -> Result<EventStreamMessage, ProviderError>;

    /// Encode one message as a complete frame
    fn marshal(&self, message: &EventStreamMessage) -> Result<Bytes, ProviderError>;
}

/// Default codec for the AWS binary event-stream format
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsEventStreamCodec;

impl EventStreamMarshaller for AwsEventStreamCodec {
    fn unmarshal(&self, frame: &[u8]) -> Result<EventStreamMessage, ProviderError> {
        if frame.len() < MIN_FRAME_LEN {
            return Err(BedrockError::stream_decode(
                0,
                frame,
                format!("frame of {} bytes is shorter than the prelude", frame.len()),
            ));
        }
        if frame.len() > MAX_FRAME_LEN {
            return Err(BedrockError::stream_decode(
                0,
                &frame[..PRELUDE_LEN],
                format!("frame of {} bytes exceeds the maximum", frame.len()),
            ));
        }

        let mut prelude = &frame[..PRELUDE_LEN];
        let total_len = prelude.get_u32() as usize;
        let headers_len = prelude.get_u32() as usize;
        let prelude_crc = prelude.get_u32();

        if total_len != frame.len() {
            return Err(BedrockError::stream_decode(
                0,
                frame,
                format!(
                    "frame length mismatch: prelude says {}, got {}",
                    total_len,
                    frame.len()
                ),
            ));
        }
        if crc32(&frame[..8]) != prelude_crc {
            return Err(BedrockError::stream_decode(0, frame, "prelude checksum mismatch"));
        }

        let message_crc = (&frame[total_len - CRC_LEN..]).get_u32();
        if crc32(&frame[..total_len - CRC_LEN]) != message_crc {
            return Err(BedrockError::stream_decode(0, frame, "message checksum mismatch"));
        }

        let headers_end = PRELUDE_LEN + headers_len;
        if headers_end > total_len - CRC_LEN {
            return Err(BedrockError::stream_decode(
                0,
                frame,
                "headers overrun the frame",
            ));
        }

        let headers = decode_headers(&frame[PRELUDE_LEN..headers_end])
            .map_err(|message| BedrockError::stream_decode(0, frame, message))?;
        let payload = Bytes::copy_from_slice(&frame[headers_end..total_len - CRC_LEN]);

        Ok(EventStreamMessage { headers, payload })
    }

    fn marshal(&self, message: &EventStreamMessage) -> Result<Bytes, ProviderError> {
        let headers = encode_headers(&message.headers)?;
        let total_len = MIN_FRAME_LEN + headers.len() + message.payload.len();
        let too_long = |what: &str| {
            ProviderError::serialization("bedrock", format!("event-stream {} too long", what))
        };
        let total_len_u32 = u32::try_from(total_len).map_err(|_| too_long("frame"))?;
        let headers_len_u32 = u32::try_from(headers.len()).map_err(|_| too_long("headers"))?;

        let mut frame = BytesMut::with_capacity(total_len);
        frame.put_u32(total_len_u32);
        frame.put_u32(headers_len_u32);
        let prelude_crc = crc32(&frame[..8]);
        frame.put_u32(prelude_crc);
        frame.put_slice(&headers);
        frame.put_slice(&message.payload);
        let message_crc = crc32(&frame);
        frame.put_u32(message_crc);

        Ok(frame.freeze())
    }
}

fn decode_headers(mut buf: &[u8]) -> Result<Vec<EventStreamHeader>, String> {
    let mut headers = Vec::new();

    while buf.has_remaining() {
        let name_len = buf.get_u8() as usize;
        let name = take(&mut buf, name_len, "header name")?;
        let name = String::from_utf8(name.to_vec())
            .map_err(|_| "header name is not UTF-8".to_string())?;

        if !buf.has_remaining() {
            return Err(format!("header '{}' has no value type", name));
        }
        let value = match buf.get_u8() {
            0 => HeaderValue::Boolean(true),
            1 => HeaderValue::Boolean(false),
            2 => HeaderValue::Byte(take(&mut buf, 1, &name)?.get_i8()),
            3 => HeaderValue::Short(take(&mut buf, 2, &name)?.get_i16()),
            4 => HeaderValue::Integer(take(&mut buf, 4, &name)?.get_i32()),
            5 => HeaderValue::Long(take(&mut buf, 8, &name)?.get_i64()),
            6 => {
                let len = take(&mut buf, 2, &name)?.get_u16() as usize;
                HeaderValue::ByteArray(Bytes::copy_from_slice(take(&mut buf, len, &name)?))
            }
            7 => {
                let len = take(&mut buf, 2, &name)?.get_u16() as usize;
                let raw = take(&mut buf, len, &name)?;
                HeaderValue::String(
                    String::from_utf8(raw.to_vec())
                        .map_err(|_| format!("header '{}' is not UTF-8", name))?,
                )
            }
            8 => HeaderValue::Timestamp(take(&mut buf, 8, &name)?.get_i64()),
            9 => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(take(&mut buf, 16, &name)?);
                HeaderValue::Uuid(uuid)
            }
            other => return Err(format!("header '{}' has unknown type {}", name, other)),
        };

        headers.push(EventStreamHeader { name, value });
    }

    Ok(headers)
}

/// Split `len` bytes off the front of `buf`
fn take<'a>(buf: &mut &'a [u8], len: usize, what: &str) -> Result<&'a [u8], String> {
    if buf.len() < len {
        return Err(format!("truncated {}", what));
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

fn encode_headers(headers: &[EventStreamHeader]) -> Result<BytesMut, ProviderError> {
    let invalid = |message: String| ProviderError::serialization("bedrock", message);
    let mut buf = BytesMut::new();

    for header in headers {
        let name_len = u8::try_from(header.name.len())
            .map_err(|_| invalid(format!("header name '{}' too long", header.name)))?;
        buf.put_u8(name_len);
        buf.put_slice(header.name.as_bytes());
        buf.put_u8(header.value.type_code());

        match &header.value {
            HeaderValue::Boolean(_) => {}
            HeaderValue::Byte(v) => buf.put_i8(*v),
            HeaderValue::Short(v) => buf.put_i16(*v),
            HeaderValue::Integer(v) => buf.put_i32(*v),
            HeaderValue::Long(v) | HeaderValue::Timestamp(v) => buf.put_i64(*v),
            HeaderValue::ByteArray(v) => {
                let len = u16::try_from(v.len())
                    .map_err(|_| invalid(format!("header '{}' too long", header.name)))?;
                buf.put_u16(len);
                buf.put_slice(v);
            }
            HeaderValue::String(v) => {
                let len = u16::try_from(v.len())
                    .map_err(|_| invalid(format!("header '{}' too long", header.name)))?;
                buf.put_u16(len);
                buf.put_slice(v.as_bytes());
            }
            HeaderValue::Uuid(v) => buf.put_slice(v),
        }
    }

    Ok(buf)
}

/// Re-chunk a byte stream into complete frames.
///
/// Transport chunk boundaries need not line up with frames: bytes are held
/// only until the frame they belong to is complete. Leftover bytes at end of
/// stream are an error.
pub fn event_frames(
    mut body: ByteStream,
) -> impl Stream<Item = Result<Bytes, ProviderError>> + Send {
    try_stream! {
        let mut buffer = BytesMut::new();
        let mut position: u64 = 0;

        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);

            while let Some(frame_len) = complete_frame_len(&buffer, position)? {
                position += 1;
                yield buffer.split_to(frame_len).freeze();
            }
        }

        if !buffer.is_empty() {
            Err::<(), _>(BedrockError::stream_decode(
                position,
                &buffer,
                format!("stream ended inside a frame ({} trailing bytes)", buffer.len()),
            ))?;
        }
    }
}

/// Length of the frame at the head of `buffer`, once all of it has arrived
fn complete_frame_len(buffer: &[u8], position: u64) -> Result<Option<usize>, ProviderError> {
    if buffer.len() < 4 {
        return Ok(None);
    }
    let frame_len = (&buffer[..4]).get_u32() as usize;
    if frame_len < MIN_FRAME_LEN {
        return Err(BedrockError::stream_decode(
            position,
            buffer,
            format!("declared frame length {} is below the minimum", frame_len),
        ));
    }
    if frame_len > MAX_FRAME_LEN {
        return Err(BedrockError::stream_decode(
            position,
            &buffer[..4],
            format!(
                "declared frame length {} exceeds the maximum of {}",
                frame_len, MAX_FRAME_LEN
            ),
        ));
    }
    Ok((buffer.len() >= frame_len).then_some(frame_len))
}

/// CRC-32/IEEE, reflected, as used by the event-stream checksums
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}
