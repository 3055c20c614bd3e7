//! Captions payload decoding (json3 events and timed-text XML).

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::{DecodeError, DecodeResult};
use crate::log_debug;
use crate::models::transcript::sort_units;
use crate::models::TranscriptUnit;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    t_start_ms: Option<f64>,
    d_duration_ms: Option<f64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Decode a captions payload.
///
/// `json_requested` is set when the track was fetched with a JSON format
/// parameter; only then is the JSON shape attempted. Timed-text XML is the
/// fallback for every other case.
pub fn decode_captions(payload: &str, json_requested: bool) -> DecodeResult<Vec<TranscriptUnit>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    if json_requested && trimmed.starts_with('{') {
        match decode_json(trimmed) {
            Ok(units) if !units.is_empty() => return Ok(units),
            Ok(_) => log_debug!("json3 payload had no usable events, trying XML"),
            Err(e) => log_debug!("json3 parse failed ({}), trying XML", e),
        }
    }

    let units = decode_xml(payload);
    if units.is_empty() {
        return Err(DecodeError::NoUnits);
    }
    Ok(units)
}

/// Decode the json3 caption format: `{"events":[{"tStartMs", "dDurationMs", "segs":[{"utf8"}]}]}`.
pub fn decode_json(payload: &str) -> Result<Vec<TranscriptUnit>, serde_json::Error> {
    let parsed: Json3Payload = serde_json::from_str(payload)?;

    let mut units: Vec<TranscriptUnit> = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let start_ms = event.t_start_ms?;
            let segs = event.segs?;
            let text: String = segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptUnit::new(
                start_ms / 1000.0,
                event.d_duration_ms.unwrap_or(0.0) / 1000.0,
                text,
            ))
        })
        .collect();

    sort_units(&mut units);
    Ok(units)
}

fn text_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<text\b([^>]*)>(.*?)</text>").expect("valid text element regex")
    })
}

fn start_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bstart\s*=\s*["']?([\d.]+)"#).expect("valid start attribute regex")
    })
}

fn dur_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bdur\s*=\s*["']?([\d.]+)"#).expect("valid dur attribute regex")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(amp|lt|gt|quot|#39);").expect("valid entity regex"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

/// Decode timed-text XML: `<text start="S" dur="D">TEXT</text>` elements.
/// Elements without a parsable start, or with empty text, are skipped.
pub fn decode_xml(payload: &str) -> Vec<TranscriptUnit> {
    let mut units: Vec<TranscriptUnit> = text_element_regex()
        .captures_iter(payload)
        .filter_map(|caps| {
            let attrs = caps.get(1)?.as_str();
            let start = attr_value(start_attr_regex(), attrs)?;
            let duration = attr_value(dur_attr_regex(), attrs).unwrap_or(0.0);
            let text = clean_text(caps.get(2)?.as_str());
            if text.is_empty() {
                return None;
            }
            Some(TranscriptUnit::new(start, duration, text))
        })
        .collect();

    sort_units(&mut units);
    units
}

fn attr_value(re: &Regex, attrs: &str) -> Option<f64> {
    re.captures(attrs)?.get(1)?.as_str().parse().ok()
}

/// Unescape the five standard entities, then strip any markup left behind.
pub fn clean_text(raw: &str) -> String {
    let unescaped = entity_regex().replace_all(raw, |caps: &Captures| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        }
        .to_string()
    });
    tag_regex().replace_all(&unescaped, "").trim().to_string()
}
