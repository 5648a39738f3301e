//! Speech-to-text for uploaded journal audio.
//!
//! `SpeechRecognizer` is the seam the HTTP layer depends on. The bundled
//! `HttpSpeechRecognizer` decodes a WAV upload to 16-bit mono PCM and posts it
//! to a Google-style `recognize` endpoint in a single attempt.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::SpeechSettings;

// ============================================================================
// SpeechRecognizer trait
// ============================================================================

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe an uploaded audio file.
    async fn recognize(&self, audio: &[u8]) -> Result<String, SpeechError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum SpeechError {
    /// The upload is not audio we can decode.
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// The service answered but produced no transcript.
    #[error("Could not understand audio")]
    Unrecognized,

    #[error("Speech recognition service error: {0}")]
    Service(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<hound::Error> for SpeechError {
    fn from(err: hound::Error) -> Self {
        SpeechError::InvalidAudio(err.to_string())
    }
}

impl SpeechError {
    /// True when the failure lies with the caller's audio rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SpeechError::InvalidAudio(_) | SpeechError::Unrecognized)
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub timeout: Duration,
}

impl From<&SpeechSettings> for SpeechConfig {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }
}

// ============================================================================
// Audio decoding
// ============================================================================

/// Mono 16-bit PCM ready to send to the service.
#[derive(Debug)]
pub struct PcmAudio {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl PcmAudio {
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn duration_ms(&self) -> u64 {
        (self.samples.len() as u64 * 1000) / self.sample_rate.max(1) as u64
    }
}

/// Decode a WAV file, mixing all channels down to one.
pub fn decode_wav(bytes: &[u8]) -> Result<PcmAudio, SpeechError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample as i32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| rescale_to_i16(v, bits)))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<_, _>>()?,
    };

    if samples.is_empty() {
        return Err(SpeechError::InvalidAudio("no samples".to_string()));
    }

    let channels = spec.channels.max(1) as usize;
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    } else {
        samples
    };

    Ok(PcmAudio {
        sample_rate: spec.sample_rate,
        samples: mono,
    })
}

fn rescale_to_i16(sample: i32, bits: i32) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

// ============================================================================
// Recognition API structs (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<RecognizeAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeAlternative {
    transcript: Option<String>,
}

/// Pick the first non-empty transcript from a newline-delimited JSON reply.
fn parse_transcript(body: &str) -> Result<String, SpeechError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let response: RecognizeResponse = serde_json::from_str(line)
            .map_err(|e| SpeechError::Service(format!("malformed response: {}", e)))?;

        let transcript = response
            .result
            .into_iter()
            .flat_map(|r| r.alternative)
            .filter_map(|a| a.transcript)
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty());

        if let Some(text) = transcript {
            return Ok(text);
        }
    }

    Err(SpeechError::Unrecognized)
}

// ============================================================================
// HttpSpeechRecognizer
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpSpeechRecognizer {
    client: Client,
    config: SpeechConfig,
}

impl HttpSpeechRecognizer {
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a recognizer pointed at a custom base URL (for testing / self-hosted services)
    pub fn with_base_url(mut config: SpeechConfig, base_url: String) -> Result<Self, SpeechError> {
        config.base_url = base_url;
        Self::new(config)
    }

    /// Send already-decoded PCM to the service. One attempt, no retry.
    pub async fn recognize_pcm(&self, audio: &PcmAudio) -> Result<String, SpeechError> {
        let url = format!("{}/recognize", self.config.base_url);

        let mut query = vec![
            ("output", "json".to_string()),
            ("lang", self.config.language.clone()),
        ];
        if !self.config.api_key.is_empty() {
            query.push(("key", self.config.api_key.clone()));
        }

        let response = self
            .client
            .post(&url)
            .query(&query)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/l16; rate={}", audio.sample_rate),
            )
            .body(audio.to_le_bytes())
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        let body = response.text().await.map_err(redact_url)?;

        if !status.is_success() {
            tracing::error!(code = status.as_u16(), body = %body, "Speech API error");
            return Err(SpeechError::Service(format!("status {}", status.as_u16())));
        }

        parse_transcript(&body)
    }
}

/// The request URL carries the API key, so it never goes into an error.
fn redact_url(err: reqwest::Error) -> SpeechError {
    SpeechError::Http(err.without_url())
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechRecognizer {
    async fn recognize(&self, audio: &[u8]) -> Result<String, SpeechError> {
        let pcm = decode_wav(audio)?;
        tracing::debug!(
            sample_rate = pcm.sample_rate,
            duration_ms = pcm.duration_ms(),
            "Sending audio to speech API"
        );
        self.recognize_pcm(&pcm).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

// ============================================================================
// TESTS
// ============================================================================
