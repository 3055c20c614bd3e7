use crate::detection::phrases::phrase_tables;
use crate::models::{SignalMatch, TranscriptUnit};

/// Scan every transcript unit against every phrase table.
///
/// Each (unit, phrase) containment yields one match at the unit's start.
/// Repeats are kept on purpose; the cluster detector scores them.
pub fn scan_signals(units: &[TranscriptUnit]) -> Vec<SignalMatch> {
    let tables = phrase_tables();
    let mut matches = Vec::new();

    for unit in units {
        let text = unit.text.to_lowercase();

        for table in &tables {
            for phrase in table.phrases {
                if text.contains(phrase) {
                    matches.push(SignalMatch::new(unit.start, table.category, *phrase));
                }
            }
        }
    }

    matches
}
