//! Transcript sources that arrive as page text rather than a caption track.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::log_debug;
use crate::models::transcript::sort_units;
use crate::models::TranscriptUnit;
use crate::utils::parse_timestamp;

const ENABLE_LOGS: bool = true;

/// Duration assumed for units whose source reports none.
const NOMINAL_UNIT_SECS: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct CueGroup {
    #[serde(default)]
    cues: Vec<Cue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cue {
    start_time: Option<NumberOrString>,
    duration_time: Option<NumberOrString>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn value(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse an embedded `cueGroups` array. Malformed input yields no units.
pub fn parse_cue_groups(json: &str) -> Vec<TranscriptUnit> {
    let groups: Vec<CueGroup> = match serde_json::from_str(json) {
        Ok(groups) => groups,
        Err(_) => return Vec::new(),
    };

    let mut units: Vec<TranscriptUnit> = groups
        .iter()
        .flat_map(|g| g.cues.iter())
        .filter_map(|cue| {
            let start = cue.start_time.as_ref()?.value()?;
            let text = cue.text.as_deref()?.trim();
            if text.is_empty() {
                return None;
            }
            let duration = cue
                .duration_time
                .as_ref()
                .and_then(NumberOrString::value)
                .unwrap_or(NOMINAL_UNIT_SECS);
            Some(TranscriptUnit::new(start, duration, text))
        })
        .collect();

    sort_units(&mut units);
    units
}

/// Transcript data embedded in the watch page's script text: cue groups
/// first, then search-panel snippets.
pub fn parse_initial_data(page: &str) -> Vec<TranscriptUnit> {
    if let Some(caps) = cue_groups_regex().captures(page) {
        let units = parse_cue_groups(&format!("[{}]", &caps[1]));
        if !units.is_empty() {
            return units;
        }
        log_debug!("Embedded cue groups held no usable cues");
    }

    parse_search_panel(page)
}

/// Scrape `startMs` / `snippet.text` pairs from an embedded
/// `transcriptSearchPanelRenderer`.
pub fn parse_search_panel(page: &str) -> Vec<TranscriptUnit> {
    if !page.contains("\"transcriptSearchPanelRenderer\"") {
        return Vec::new();
    }

    let mut units: Vec<TranscriptUnit> = snippet_regex()
        .captures_iter(page)
        .filter_map(|caps| {
            let start_ms: u64 = caps[1].parse().ok()?;
            let text = caps[2].replace("\\n", " ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptUnit::new(
                start_ms as f64 / 1000.0,
                NOMINAL_UNIT_SECS,
                text,
            ))
        })
        .collect();

    sort_units(&mut units);
    units
}

fn cue_groups_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)"cueGroups":\s*\[(.*?)\]\s*,\s*"(?:actions|trackingParams)"#)
            .expect("valid cue groups regex")
    })
}

fn snippet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)"startMs":\s*"(\d+)".*?"snippet":\s*\{.*?"text":\s*"([^"]+)""#)
            .expect("valid search panel snippet regex")
    })
}

/// Parse transcript-panel text where a timestamp line (`1:23`) is followed
/// by the caption line it labels.
pub fn parse_panel_text(text: &str) -> Vec<TranscriptUnit> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut units = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let start = parse_timestamp(lines[i]);
        let next = lines.get(i + 1).copied();

        match (start, next) {
            (Some(start), Some(caption)) if parse_timestamp(caption).is_none() => {
                units.push(TranscriptUnit::new(start, NOMINAL_UNIT_SECS, caption));
                i += 2;
            }
            _ => i += 1,
        }
    }

    sort_units(&mut units);
    units
}
