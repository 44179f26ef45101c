//! Streaming invocation tests
//!
//! `invoke_with_observer` over scripted event-stream bodies: fragment order,
//! chunking independence and failure behaviour.

#[cfg(test)]
mod tests {
    use crate::common::events::{chunk_headers, concat, split_every};
    use crate::common::{ScriptedTransport, chunk_event, event_with_headers, llm};
    use crate::{assert_err, assert_ok};
    use bedrock_llm::core::providers::bedrock::streaming::{
        AwsEventStreamCodec, EventStreamHeader, EventStreamMarshaller, EventStreamMessage,
    };
    use bedrock_llm::{ProviderError, TokenObserver};
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const PROMPT: &str = "What is your name?";
    const ANSWER: &str = "Hello! My name is Claude.";

    /// Observer collecting every fragment
    #[derive(Default)]
    struct Collector {
        tokens: Mutex<Vec<String>>,
    }

    impl Collector {
        fn tokens(&self) -> Vec<String> {
            self.tokens.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl TokenObserver for Collector {
        async fn on_new_token(&self, token: &str) {
            // Yield so a racing reader would be visible as reordering
            tokio::task::yield_now().await;
            self.tokens.lock().unwrap().push(token.to_string());
        }
    }

    #[tokio::test]
    async fn test_single_event_stream() {
        let transport = ScriptedTransport::chunks(vec![chunk_event(json!({"outputText": ANSWER}))]);
        let llm = llm("amazon.model", true, transport.clone());
        let observer = Collector::default();

        let text = assert_ok!(llm.invoke_with_observer(PROMPT, &observer).await);

        assert_eq!(text, ANSWER);
        assert_eq!(observer.tokens(), vec![ANSWER]);
        assert_eq!(text, observer.tokens().concat());

        let (url, _) = transport.single_request();
        assert_eq!(
            url.as_str(),
            "https://bedrock.us-east-1.amazonaws.com/model/amazon.model/invoke-with-response-stream"
        );
    }

    #[tokio::test]
    async fn test_fragments_in_arrival_order() {
        let frames = vec![
            chunk_event(json!({"completion": "Hello"})),
            chunk_event(json!({"completion": "! My name"})),
            chunk_event(json!({"completion": " is Claude."})),
        ];
        let llm = llm("anthropic.claude-v2", true, ScriptedTransport::chunks(frames));
        let observer = Collector::default();

        let text = assert_ok!(llm.invoke_with_observer(PROMPT, &observer).await);

        assert_eq!(observer.tokens(), vec!["Hello", "! My name", " is Claude."]);
        assert_eq!(text, ANSWER);
    }

    #[tokio::test]
    async fn test_ai21_stream_chunks() {
        let frames = vec![
            chunk_event(json!({"data": {"text": "Jurassic"}})),
            chunk_event(json!({"data": {"text": " here"}})),
        ];
        let llm = llm("ai21.j2-ultra", true, ScriptedTransport::chunks(frames));

        assert_eq!(assert_ok!(llm.invoke(PROMPT).await), "Jurassic here");
    }

    #[tokio::test]
    async fn test_chunking_does_not_change_result() {
        let frames = vec![
            chunk_event(json!({"outputText": "one "})),
            chunk_event(json!({"outputText": "two "})),
            chunk_event(json!({"outputText": "three"})),
        ];
        let wire = concat(&frames);

        for size in [1, 7, 16, 64, wire.len()] {
            let observer = Collector::default();
            let transport = ScriptedTransport::chunks(split_every(&wire, size));
            let llm = llm("amazon.model", true, transport);

            let text = assert_ok!(llm.invoke_with_observer(PROMPT, &observer).await);
            assert_eq!(text, "one two three", "chunk size {}", size);
            assert_eq!(observer.tokens(), vec!["one ", "two ", "three"]);
        }
    }

    #[tokio::test]
    async fn test_empty_stream_returns_empty_text() {
        let llm = llm("amazon.model", true, ScriptedTransport::chunks(Vec::new()));
        assert_eq!(assert_ok!(llm.invoke(PROMPT).await), "");
    }

    #[tokio::test]
    async fn test_missing_content_type_fails() {
        let malformed = event_with_headers(
            vec![
                EventStreamHeader::string(":event-type", "chunk"),
                EventStreamHeader::string(":message-type", "event"),
            ],
            &json!({"outputText": "never returned"}),
        );
        let transport = ScriptedTransport::chunks(vec![
            chunk_event(json!({"outputText": "partial"})),
            malformed,
        ]);
        let llm = llm("amazon.model", true, transport);
        let observer = Collector::default();

        let err = assert_err!(llm.invoke_with_observer(PROMPT, &observer).await);

        match &err {
            ProviderError::Streaming {
                position,
                last_chunk,
                message,
                ..
            } => {
                assert_eq!(*position, Some(1));
                assert!(message.starts_with("Failed to get event chunk: got "));
                assert!(last_chunk.as_deref().unwrap().contains(":message-type"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // Fragments before the bad event were observed, nothing is returned
        assert_eq!(observer.tokens(), vec!["partial"]);
    }

    #[tokio::test]
    async fn test_exception_event_fails() {
        let exception = event_with_headers(
            vec![
                EventStreamHeader::string(":exception-type", "throttlingException"),
                EventStreamHeader::string(":content-type", "application/json"),
                EventStreamHeader::string(":message-type", "exception"),
            ],
            &json!({"message": "Too many requests"}),
        );
        let llm = llm("amazon.model", true, ScriptedTransport::chunks(vec![exception]));

        let err = assert_err!(llm.invoke(PROMPT).await);
        assert!(matches!(err, ProviderError::Streaming { .. }));
    }

    #[tokio::test]
    async fn test_exception_message_type_with_chunk_headers_fails() {
        let exception = event_with_headers(
            vec![
                EventStreamHeader::string(":event-type", "chunk"),
                EventStreamHeader::string(":content-type", "application/json"),
                EventStreamHeader::string(":message-type", "exception"),
            ],
            &json!({"outputText": "leaked"}),
        );
        let llm = llm("amazon.model", true, ScriptedTransport::chunks(vec![exception]));
        let observer = Collector::default();

        let err = assert_err!(llm.invoke_with_observer(PROMPT, &observer).await);

        assert!(matches!(err, ProviderError::Streaming { position: Some(0), .. }));
        assert!(err.to_string().contains("Failed to get event chunk"));
        assert!(observer.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_stream_fails() {
        let frame = chunk_event(json!({"outputText": "cut"}));
        let truncated = frame.slice(..frame.len() - 3);
        let llm = llm("amazon.model", true, ScriptedTransport::chunks(vec![truncated]));

        let err = assert_err!(llm.invoke(PROMPT).await);
        assert!(matches!(err, ProviderError::Streaming { .. }));
    }

    #[tokio::test]
    async fn test_wrong_chunk_shape_fails() {
        // An Anthropic-shaped chunk on an Amazon model
        let transport = ScriptedTransport::chunks(vec![chunk_event(json!({"completion": "x"}))]);
        let llm = llm("amazon.model", true, transport);

        let err = assert_err!(llm.invoke(PROMPT).await);
        assert!(matches!(err, ProviderError::ResponseParsing { .. }));
    }

    #[tokio::test]
    async fn test_bad_status_on_stream() {
        let transport = ScriptedTransport::text(500, "Internal Server Error", "boom");
        let llm = llm("amazon.model", true, transport);

        let err = assert_err!(llm.invoke(PROMPT).await);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_non_streaming_does_not_notify() {
        let transport = ScriptedTransport::json(200, r#"{"results":[{"outputText":"whole"}]}"#);
        let llm = llm("amazon.model", false, transport);
        let observer = Collector::default();

        assert_eq!(assert_ok!(llm.invoke_with_observer(PROMPT, &observer).await), "whole");
        assert!(observer.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_closure_observer() {
        let transport = ScriptedTransport::chunks(vec![
            chunk_event(json!({"outputText": "a"})),
            chunk_event(json!({"outputText": "b"})),
        ]);
        let llm = llm("amazon.model", true, transport);

        let count = AtomicUsize::new(0);
        let observer = |_: &str| {
            count.fetch_add(1, Ordering::SeqCst);
        };

        assert_eq!(assert_ok!(llm.invoke_with_observer(PROMPT, &observer).await), "ab");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    /// Codec that counts decoded frames and delegates to the AWS codec
    #[derive(Default)]
    struct CountingCodec {
        frames: AtomicUsize,
    }

    impl EventStreamMarshaller for CountingCodec {
        fn unmarshal(&self, frame: &[u8]) -> Result<EventStreamMessage, ProviderError> {
            self.frames.fetch_add(1, Ordering::SeqCst);
            AwsEventStreamCodec.unmarshal(frame)
        }

        fn marshal(&self, message: &EventStreamMessage) -> Result<Bytes, ProviderError> {
            AwsEventStreamCodec.marshal(message)
        }
    }

    #[tokio::test]
    async fn test_custom_marshaller() {
        let codec = Arc::new(CountingCodec::default());
        let frames = vec![
            event_with_headers(chunk_headers(), &json!({"outputText": "x"})),
            event_with_headers(chunk_headers(), &json!({"outputText": "y"})),
        ];
        let llm = llm("amazon.model", true, ScriptedTransport::chunks(frames))
            .with_marshaller(codec.clone());

        assert_eq!(assert_ok!(llm.invoke(PROMPT).await), "xy");
        assert_eq!(codec.frames.load(Ordering::SeqCst), 2);
    }
}
