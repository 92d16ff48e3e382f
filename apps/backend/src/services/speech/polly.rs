//! AWS Polly speech synthesis.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_polly::{
    config::{Credentials, Region},
    types::{OutputFormat, TextType, VoiceId},
    Client, Config,
};

use super::{normalize_language, primary_subtag, SpeechError, SpeechKind, SpeechSynthesizer, VoiceRequest};

/// Default Polly voice per language, most specific tag first.
const VOICES: &[(&str, &str)] = &[
    ("en_GB", "Amy"),
    ("en_AU", "Nicole"),
    ("pt_PT", "Ines"),
    ("en", "Joanna"),
    ("fr", "Celine"),
    ("de", "Marlene"),
    ("es", "Lucia"),
    ("it", "Carla"),
    ("ja", "Mizuki"),
    ("ko", "Seoyeon"),
    ("nl", "Lotte"),
    ("pt", "Camila"),
    ("ru", "Tatyana"),
    ("zh", "Zhiyu"),
];

/// Synthesizes mp3 audio with AWS Polly.
pub struct PollySynthesizer {
    client: Client,
    default_voice: Option<String>,
}

impl PollySynthesizer {
    /// Create a synthesizer for `region`.
    ///
    /// Uses AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY when both are set,
    /// otherwise the standard AWS credential chain.
    pub async fn new(region: &str, default_voice: Option<String>) -> Self {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok();

        let client = match (access_key, secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = Credentials::new(
                    access_key,
                    secret_key,
                    std::env::var("AWS_SESSION_TOKEN").ok(),
                    None,  // expiry
                    "env", // provider name
                );
                let config = Config::builder()
                    .region(Region::new(region.to_string()))
                    .credentials_provider(credentials)
                    .behavior_version_latest()
                    .build();
                Client::from_conf(config)
            }
            _ => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.to_string()))
                    .load()
                    .await;
                Client::new(&shared)
            }
        };

        Self {
            client,
            default_voice,
        }
    }

    fn voice_for(&self, request: &VoiceRequest) -> Result<String, SpeechError> {
        if let Some(voice) = request.voice.as_deref().filter(|v| !v.trim().is_empty()) {
            return Ok(voice.trim().to_string());
        }
        default_voice(&request.language)
            .map(str::to_string)
            .or_else(|| self.default_voice.clone())
            .ok_or_else(|| SpeechError::UnsupportedLanguage(request.language.clone()))
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceRequest) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let voice_id = self.voice_for(voice)?;

        let output = self
            .client
            .synthesize_speech()
            .text(to_ssml(text, voice.kind))
            .text_type(TextType::Ssml)
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(voice_id.as_str()))
            .send()
            .await
            .map_err(|e| SpeechError::Backend(e.to_string()))?;

        let bytes = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| SpeechError::Backend(e.to_string()))?
            .into_bytes()
            .to_vec();

        if bytes.is_empty() {
            return Err(SpeechError::Backend("empty audio stream".to_string()));
        }

        tracing::debug!("Synthesized {} bytes with voice {}", bytes.len(), voice_id);
        Ok(bytes)
    }
}

/// Default voice for a language tag, if Polly has one.
pub fn default_voice(language: &str) -> Option<&'static str> {
    let normalized = normalize_language(language);
    let primary = primary_subtag(&normalized);
    VOICES
        .iter()
        .find(|(tag, _)| *tag == normalized)
        .or_else(|| VOICES.iter().find(|(tag, _)| *tag == primary))
        .map(|(_, voice)| *voice)
}

/// Wrap text in SSML; single words are read slowly.
fn to_ssml(text: &str, kind: SpeechKind) -> String {
    let escaped = escape_xml(text.trim());
    match kind {
        SpeechKind::Word => format!("<speak><prosody rate=\"slow\">{}</prosody></speak>", escaped),
        SpeechKind::Phrase => format!("<speak>{}</speak>", escaped),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
