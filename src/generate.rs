//! One generation attempt, from prompt to history record.

use crate::client::ChatClient;
use crate::error::{Error, Result};
use crate::history::{HistoryRecord, HistoryStore};
use crate::stream::{ContentAccumulator, DecodeOutcome, StreamEvent, StreamSink};
use crate::template;

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Free-form prompt text, possibly already carrying a template hint.
    pub prompt: String,
    /// Template to hint. `None` leaves the prompt's own hint alone; an empty
    /// id removes it.
    pub template: Option<String>,
    /// Stream the reply instead of waiting for the full response.
    pub stream: bool,
}

/// Result of a successful attempt.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The record written to history.
    pub record: HistoryRecord,
    /// How the stream ended; `None` for non-streamed requests.
    pub outcome: Option<DecodeOutcome>,
}

impl Generation {
    /// Full model reply.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.record.content
    }
}

/// Forwards every event to the caller while keeping a copy of the reply.
struct Tee<'a, S: ?Sized> {
    acc: ContentAccumulator,
    inner: &'a mut S,
}

impl<S: StreamSink + ?Sized> StreamSink for Tee<'_, S> {
    fn on_event(&mut self, event: StreamEvent) {
        self.acc.on_event(event.clone());
        self.inner.on_event(event);
    }
}

/// Build the prompt that will be sent for `request`.
///
/// # Errors
///
/// Returns [`Error::EmptyPrompt`] for blank prompts and
/// [`Error::InvalidTemplate`] for unknown template ids.
pub fn prepare_prompt(request: &GenerateRequest) -> Result<String> {
    if request.prompt.trim().is_empty() {
        return Err(Error::EmptyPrompt);
    }

    match request.template.as_deref() {
        Some(id) => {
            let chosen = template::resolve(id)?;
            Ok(template::apply_template(&request.prompt, chosen.map(|t| t.id)))
        }
        None => Ok(request.prompt.clone()),
    }
}

/// Runs generation attempts against a client and records successes.
pub struct Generator<S: HistoryStore> {
    client: ChatClient,
    store: S,
}

impl<S: HistoryStore> Generator<S> {
    #[must_use]
    pub fn new(client: ChatClient, store: S) -> Self {
        Self { client, store }
    }

    /// History backing this generator.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one attempt.
    ///
    /// Deltas are forwarded to `sink` as they arrive; a non-streamed reply
    /// arrives as a single delta followed by `End`. History is written only
    /// once a non-empty reply is complete. Taking `&mut self` keeps at most
    /// one attempt in flight per generator.
    ///
    /// # Errors
    ///
    /// Returns prompt validation errors before any network call, transport
    /// and protocol errors from the client, [`Error::Protocol`] if the reply
    /// is empty, and storage errors from the history write.
    pub async fn generate<K: StreamSink + ?Sized>(
        &mut self,
        request: &GenerateRequest,
        sink: &mut K,
    ) -> Result<Generation> {
        let prompt = prepare_prompt(request)?;

        let (content, outcome) = if request.stream {
            let mut tee = Tee {
                acc: ContentAccumulator::new(),
                inner: sink,
            };
            let outcome = self.client.stream(&prompt, &mut tee).await?;
            log::debug!(
                "stream finished ({outcome:?}) after {} deltas",
                tee.acc.delta_count()
            );
            (tee.acc.into_content(), Some(outcome))
        } else {
            let content = self.client.complete(&prompt).await?;
            sink.on_event(StreamEvent::Delta {
                text: content.clone(),
            });
            sink.on_event(StreamEvent::End);
            (content, None)
        };

        if content.trim().is_empty() {
            return Err(Error::Protocol("no valid response received".to_string()));
        }

        let record = self.store.add(&prompt, &content)?;
        Ok(Generation { record, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::history::MemoryBackend;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator_for(server: &MockServer) -> Generator<MemoryBackend> {
        let api = ApiConfig {
            endpoint: format!("{}/chat/completions", server.uri()),
            api_key: Some("sk-test".to_string()),
            ..ApiConfig::default()
        };
        Generator::new(ChatClient::new(&api).unwrap(), MemoryBackend::with_capacity(10))
    }

    fn request(prompt: &str, stream: bool) -> GenerateRequest {
        GenerateRequest {
            prompt: prompt.to_string(),
            template: None,
            stream,
        }
    }

    #[test]
    fn prepare_rejects_blank_prompt() {
        let err = prepare_prompt(&request("  \n", true)).unwrap_err();
        assert!(matches!(err, Error::EmptyPrompt));
    }

    #[test]
    fn prepare_applies_and_removes_template() {
        let mut req = request("Quarterly sales", true);
        req.template = Some("chart-pie-plain-text".to_string());
        let prompt = prepare_prompt(&req).unwrap();
        assert_eq!(prompt, "Quarterly sales\n\nUse template: chart-pie-plain-text");

        let mut req = request(&prompt, true);
        req.template = Some(String::new());
        assert_eq!(
            prepare_prompt(&req).unwrap(),
            "Quarterly sales"
        );
    }

    #[test]
    fn prepare_rejects_unknown_template() {
        let mut req = request("x", true);
        req.template = Some("no-such-template".to_string());
        let err = prepare_prompt(&req).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
    }

    #[tokio::test]
    async fn streamed_success_records_history() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"infographic \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"chart-wordcloud\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let mut generator = generator_for(&server);
        let mut seen = Vec::new();
        let generation = generator
            .generate(&request("tags", true), &mut |e: StreamEvent| seen.push(e))
            .await
            .unwrap();

        assert_eq!(generation.content(), "infographic chart-wordcloud");
        assert_eq!(generation.outcome, Some(DecodeOutcome::Sentinel));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], StreamEvent::End);

        let history = generator.store().list().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].prompt, "tags");
        assert_eq!(history[0].content, "infographic chart-wordcloud");
    }

    #[tokio::test]
    async fn non_streamed_success_emits_single_delta() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "infographic compare-swot"}}]
            })))
            .mount(&server)
            .await;

        let mut generator = generator_for(&server);
        let mut seen = Vec::new();
        let generation = generator
            .generate(&request("swot", false), &mut |e: StreamEvent| seen.push(e))
            .await
            .unwrap();

        assert_eq!(generation.outcome, None);
        assert_eq!(
            seen,
            vec![
                StreamEvent::Delta {
                    text: "infographic compare-swot".to_string()
                },
                StreamEvent::End,
            ]
        );
        assert_eq!(generator.store().list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_stream_is_protocol_error_without_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"))
            .mount(&server)
            .await;

        let mut generator = generator_for(&server);
        let err = generator
            .generate(&request("x", true), &mut |_: StreamEvent| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
        assert!(generator.store().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_error_leaves_history_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut generator = generator_for(&server);
        let err = generator
            .generate(&request("x", true), &mut |_: StreamEvent| {})
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(generator.store().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn connection_failure_leaves_history_untouched() {
        let api = ApiConfig {
            endpoint: "http://127.0.0.1:1/chat/completions".to_string(),
            api_key: Some("sk-test".to_string()),
            ..ApiConfig::default()
        };
        let mut generator =
            Generator::new(ChatClient::new(&api).unwrap(), MemoryBackend::with_capacity(10));

        for stream in [true, false] {
            let err = generator
                .generate(&request("x", stream), &mut |_: StreamEvent| {})
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Transport { status: None, .. }));
        }
        assert!(generator.store().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_prompt_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut generator = generator_for(&server);
        let err = generator
            .generate(&request("   ", true), &mut |_: StreamEvent| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPrompt));
    }
}
