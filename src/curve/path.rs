//! Minimal path-command tokenizer for engagement curves.
//!
//! Only the subset emitted by the heatmap renderer is understood: move,
//! line and cubic curve commands with absolute coordinates. Quadratic
//! commands are tokenized but contribute no points.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::CurvePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommandKind {
    Move,
    Line,
    Cubic,
    Quadratic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: PathCommandKind,
    pub coords: Vec<f64>,
}

fn command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([MLCQ])\s*([-\d.,eE+\s]*)").expect("valid path regex"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("valid number regex")
    })
}

pub fn parse_path(d: &str) -> Vec<PathCommand> {
    command_regex()
        .captures_iter(d)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().to_ascii_uppercase();
            let kind = match letter.as_str() {
                "M" => PathCommandKind::Move,
                "L" => PathCommandKind::Line,
                "C" => PathCommandKind::Cubic,
                "Q" => PathCommandKind::Quadratic,
                _ => return None,
            };
            let args = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let coords = number_regex()
                .find_iter(args)
                .filter_map(|n| n.as_str().parse::<f64>().ok())
                .collect();
            Some(PathCommand { kind, coords })
        })
        .collect()
}

/// Flatten commands into a polyline. Cubic segments keep only their end
/// point; control points are discarded.
pub fn extract_points(commands: &[PathCommand]) -> Vec<CurvePoint> {
    let mut points = Vec::new();

    for command in commands {
        match command.kind {
            PathCommandKind::Move | PathCommandKind::Line => {
                for pair in command.coords.chunks_exact(2) {
                    points.push(CurvePoint { x: pair[0], y: pair[1] });
                }
            }
            PathCommandKind::Cubic => {
                for sextuple in command.coords.chunks_exact(6) {
                    points.push(CurvePoint {
                        x: sextuple[4],
                        y: sextuple[5],
                    });
                }
            }
            PathCommandKind::Quadratic => {}
        }
    }

    points
}
