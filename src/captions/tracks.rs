//! Caption track discovery from a player-response document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the player's caption track list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl CaptionTrack {
    fn language(&self) -> &str {
        self.language_code.as_deref().unwrap_or("")
    }
}

/// Video facts pulled out of the player response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub video_id: Option<String>,
    pub duration: Option<f64>,
    pub captions_url: Option<String>,
}

/// Prefer `en`, then any `en-*` variant, then whatever comes first.
pub fn select_caption_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language() == "en")
        .or_else(|| tracks.iter().find(|t| t.language().starts_with("en")))
        .or_else(|| tracks.first())
}

/// Resolve the JSON-escaped separators that appear in embedded caption URLs.
pub fn unescape_caption_url(url: &str) -> String {
    url.replace("\\u0026", "&").replace("\\u003d", "=")
}

/// Extract video facts from a player response.
///
/// When the response lists no caption tracks, a legacy player config
/// (`args.raw_player_response`, either an object or a JSON string) is
/// consulted and its first track is taken.
pub fn parse_player_response(response: &Value) -> PlayerData {
    let details = &response["videoDetails"];
    let video_id = details["videoId"].as_str().map(str::to_string);
    let duration = match &details["lengthSeconds"] {
        Value::String(s) => s.parse::<f64>().ok(),
        other => other.as_f64(),
    };

    let tracks = caption_tracks(response);
    let captions_url = match select_caption_track(&tracks) {
        Some(track) => Some(track.base_url.clone()),
        None => legacy_player_response(response)
            .and_then(|legacy| caption_tracks(&legacy).into_iter().next())
            .map(|track| track.base_url),
    }
    .map(|url| unescape_caption_url(&url));

    PlayerData {
        video_id,
        duration,
        captions_url,
    }
}

fn caption_tracks(response: &Value) -> Vec<CaptionTrack> {
    serde_json::from_value(
        response["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"].clone(),
    )
    .unwrap_or_default()
}

fn legacy_player_response(response: &Value) -> Option<Value> {
    match &response["args"]["raw_player_response"] {
        Value::String(raw) => serde_json::from_str(raw).ok(),
        legacy @ Value::Object(_) => Some(legacy.clone()),
        _ => None,
    }
}
