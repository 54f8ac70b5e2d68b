//! AI-written history and trivia for a catalog title.
//!
//! One request per lookup, no retries and no caching. Every failure turns
//! into [`FALLBACK_TEXT`] so the UI never has to handle an error.

use std::fmt;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const FALLBACK_TEXT: &str = "Failed to fetch historical data. Please try again later.";

pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.8;
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

pub fn prompt_for(title: &str) -> String {
    format!(
        "Provide a detailed history and fun facts about the classic video game: {}. Keep it informative and engaging.",
        title
    )
}

/// Everything a generator needs to answer one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn for_title(model: &str, title: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt_for(title),
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug)]
pub enum TriviaError {
    MissingApiKey,
    Transport(String),
    Status(u16, String),
    Malformed(String),
}

impl fmt::Display for TriviaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriviaError::MissingApiKey => write!(f, "no API key configured (set API_KEY)"),
            TriviaError::Transport(msg) => write!(f, "transport error: {}", msg),
            TriviaError::Status(code, body) => write!(f, "HTTP {}: {}", code, body),
            TriviaError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for TriviaError {}

impl From<ureq::Error> for TriviaError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                TriviaError::Status(code, response.into_string().unwrap_or_default())
            }
            ureq::Error::Transport(transport) => TriviaError::Transport(transport.to_string()),
        }
    }
}

/// Anything that can turn a prompt into text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String, TriviaError>;
}

// Wire format of the generateContent endpoint.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

impl<'a> From<&'a GenerationRequest> for WireRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![WireContent {
                parts: vec![WirePart { text: &request.prompt }],
            }],
            generation_config: WireGenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireResponseContent>,
}

#[derive(Debug, Deserialize)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

impl WireResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(config.request_timeout()).build(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, TriviaError> {
        let key = self.api_key.as_deref().ok_or(TriviaError::MissingApiKey)?;
        let response: WireResponse = self
            .agent
            .post(&self.endpoint(&request.model))
            .set("x-goog-api-key", key)
            .send_json(WireRequest::from(request))?
            .into_json()
            .map_err(|e| TriviaError::Malformed(e.to_string()))?;
        response
            .text()
            .ok_or_else(|| TriviaError::Malformed("no text in the first candidate".to_string()))
    }
}

/// Ask for the history of `title`. Never fails: errors are logged and
/// replaced with [`FALLBACK_TEXT`].
pub fn fetch_game_info(generator: &dyn TextGenerator, model: &str, title: &str) -> String {
    let request = GenerationRequest::for_title(model, title);
    match generator.generate(&request) {
        Ok(text) if !text.trim().is_empty() => {
            log::info!("Fetched history for {} ({} chars)", title, text.len());
            text
        }
        Ok(_) => {
            log::error!("History request for {} returned no text", title);
            FALLBACK_TEXT.to_string()
        }
        Err(e) => {
            log::error!("History request for {} failed: {}", title, e);
            FALLBACK_TEXT.to_string()
        }
    }
}

/// A finished lookup, tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaReply {
    pub token: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriviaState {
    Idle,
    Loading { title: String },
    Ready { title: String, text: String },
}

/// Runs lookups off the UI thread and keeps only the newest answer.
pub struct TriviaDesk {
    generator: Arc<dyn TextGenerator>,
    model: String,
    token: u64,
    state: TriviaState,
}

impl TriviaDesk {
    pub fn new(generator: Arc<dyn TextGenerator>, model: &str) -> Self {
        Self {
            generator,
            model: model.to_string(),
            token: 0,
            state: TriviaState::Idle,
        }
    }

    pub fn state(&self) -> &TriviaState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TriviaState::Loading { .. })
    }

    /// Start a lookup on a worker thread. Any lookup still in flight becomes
    /// stale. `deliver` runs on the worker with the reply.
    pub fn request<F>(&mut self, title: &str, deliver: F) -> u64
    where
        F: FnOnce(TriviaReply) + Send + 'static,
    {
        self.token += 1;
        let token = self.token;
        self.state = TriviaState::Loading { title: title.to_string() };
        log::info!("Requesting history for {} (request {})", title, token);

        let generator = Arc::clone(&self.generator);
        let model = self.model.clone();
        let title = title.to_string();
        thread::spawn(move || {
            let text = fetch_game_info(generator.as_ref(), &model, &title);
            deliver(TriviaReply { token, text });
        });
        token
    }

    /// Apply a reply if it answers the newest request. Returns whether it
    /// was applied.
    pub fn apply(&mut self, reply: TriviaReply) -> bool {
        if reply.token != self.token {
            log::debug!("Dropping stale history reply {} (current {})", reply.token, self.token);
            return false;
        }
        let title = match &self.state {
            TriviaState::Loading { title } => title.clone(),
            _ => return false,
        };
        self.state = TriviaState::Ready { title, text: reply.text };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::config::DEFAULT_MODEL;

    struct Canned(Result<String, fn() -> TriviaError>);

    impl TextGenerator for Canned {
        fn generate(&self, _request: &GenerationRequest) -> Result<String, TriviaError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// Records every request it sees.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl TextGenerator for Recorder {
        fn generate(&self, request: &GenerationRequest) -> Result<String, TriviaError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(format!("About: {}", request.prompt))
        }
    }

    #[test]
    fn test_success_returns_generated_text() {
        let generator = Canned(Ok("Tetris was created in 1984.".to_string()));
        assert_eq!(
            fetch_game_info(&generator, "m", "Tetris"),
            "Tetris was created in 1984."
        );
    }

    #[test]
    fn test_every_failure_returns_fallback() {
        let failures: [fn() -> TriviaError; 4] = [
            || TriviaError::MissingApiKey,
            || TriviaError::Transport("dns".to_string()),
            || TriviaError::Status(429, "quota".to_string()),
            || TriviaError::Malformed("eof".to_string()),
        ];
        for make in failures {
            let generator = Canned(Err(make));
            assert_eq!(fetch_game_info(&generator, "m", "Pong"), FALLBACK_TEXT);
        }
        let blank = Canned(Ok("   ".to_string()));
        assert_eq!(fetch_game_info(&blank, "m", "Pong"), FALLBACK_TEXT);
    }

    #[test]
    fn test_request_parameters() {
        let recorder = Recorder::default();
        fetch_game_info(&recorder, DEFAULT_MODEL, "Galaga");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(
            request.prompt,
            "Provide a detailed history and fun facts about the classic video game: Galaga. Keep it informative and engaging."
        );
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.top_p, 0.8);
        assert_eq!(request.max_output_tokens, 1000);
    }

    #[test]
    fn test_wire_request_shape() {
        let request = GenerationRequest::for_title("m", "Joust");
        let json = serde_json::to_value(WireRequest::from(&request)).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], request.prompt.as_str());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
        assert!((json["generationConfig"]["topP"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_wire_response_joins_first_candidate_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Pac-Man " }, { "text": "ate dots." } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        let response: WireResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("Pac-Man ate dots."));

        let empty: WireResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert_eq!(empty.text(), None);
        let blocked: WireResponse = serde_json::from_str(r#"{ "promptFeedback": {} }"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn test_missing_key_fails_before_any_request() {
        let config = Config { api_key: None, api_base: "http://127.0.0.1:9".to_string(), ..Config::default() };
        let client = GeminiClient::new(&config);
        let result = client.generate(&GenerationRequest::for_title("m", "Pong"));
        assert!(matches!(result, Err(TriviaError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_url() {
        let config = Config { api_base: "https://example.test/v1beta/".to_string(), ..Config::default() };
        let client = GeminiClient::new(&config);
        assert_eq!(
            client.endpoint("gemini-3-flash-preview"),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_desk_delivers_reply() {
        let mut desk = TriviaDesk::new(Arc::new(Canned(Ok("Fun facts".to_string()))), "m");
        let (tx, rx) = mpsc::channel();
        let token = desk.request("Frogger", move |reply| {
            let _ = tx.send(reply);
        });
        assert!(desk.is_loading());

        let reply = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.token, token);
        assert!(desk.apply(reply));
        assert_eq!(
            desk.state(),
            &TriviaState::Ready { title: "Frogger".to_string(), text: "Fun facts".to_string() }
        );
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let mut desk = TriviaDesk::new(Arc::new(Recorder::default()), "m");
        let (tx, rx) = mpsc::channel();
        let tx2 = tx.clone();
        let first = desk.request("Frogger", move |reply| {
            let _ = tx.send(reply);
        });
        let second = desk.request("Joust", move |reply| {
            let _ = tx2.send(reply);
        });
        assert_ne!(first, second);

        let mut replies: Vec<TriviaReply> = (0..2).map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap()).collect();
        replies.sort_by_key(|r| r.token);
        let [old, new]: [TriviaReply; 2] = replies.try_into().unwrap();

        assert!(!desk.apply(old));
        assert!(desk.is_loading());
        assert!(desk.apply(new));
        match desk.state() {
            TriviaState::Ready { title, text } => {
                assert_eq!(title, "Joust");
                assert!(text.contains("Joust"));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }
}
