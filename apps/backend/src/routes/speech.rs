//! Pronunciation endpoints

use axum::{extract::State, Json};
use base64::{engine::general_purpose, Engine as _};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::speech::{SpeechError, VoiceRequest};
use crate::AppState;

/// POST /get_ipa
///
/// Lookup failures are reported in the body with an empty `ipa`, not as an
/// error status. Each entry of `languages` is transcribed independently.
pub async fn get_ipa(
    State(state): State<AppState>,
    Json(req): Json<IpaRequest>,
) -> Json<IpaResponse> {
    let mut response = match state.transcriber.transcribe(&req.word, &req.language) {
        Ok(ipa) => IpaResponse {
            ipa,
            ..Default::default()
        },
        Err(e) => {
            tracing::info!("No IPA for '{}' ({}): {}", req.word, req.language, e);
            IpaResponse {
                ipa: String::new(),
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    for (language, result) in state.transcriber.transcribe_many(&req.word, &req.languages) {
        let entry = match result {
            Ok(ipa) => LanguageTranscription {
                ipa: Some(ipa),
                error: None,
            },
            Err(e) => LanguageTranscription {
                ipa: None,
                error: Some(e.to_string()),
            },
        };
        response.transcriptions.insert(language, entry);
    }

    Json(response)
}

/// POST /get_audio
pub async fn get_audio(
    State(state): State<AppState>,
    Json(req): Json<AudioRequest>,
) -> Result<Json<AudioResponse>> {
    if req.word.trim().is_empty() {
        return Err(ApiError::Speech(SpeechError::EmptyText));
    }

    let voice = VoiceRequest {
        language: req.language,
        voice: req.voice.filter(|v| !v.trim().is_empty()),
        kind: req.kind,
    };

    let audio = state.synthesizer.synthesize(&req.word, &voice).await?;

    Ok(Json(AudioResponse {
        audio: general_purpose::STANDARD.encode(audio),
    }))
}
