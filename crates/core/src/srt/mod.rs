//! This module is responsible for cue parsing and the mechanical pipeline stages.
//! It normalizes loose subtitle text, flattens cue lines and rebuilds the output.

use anyhow::{anyhow, Result};
use tracing::debug;

/// Represents a single subtitle cue (index, time range, text lines).
/// The time range is kept as the verbatim input string; timing is never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub index: u32,
    pub time_range: String,
    pub text: Vec<String>,
}

/// Normalize loosely formatted subtitle text into numbered cues.
/// This function should locate time-range lines, attach the text lines that
/// follow them and renumber every kept cue from 1. Stale counters are
/// discarded, stray text merges into the preceding cue, and a cue that
/// collected no text is dropped entirely.
pub fn normalize(input: &str) -> Vec<Cue> {
    let mut cues: Vec<Cue> = Vec::new();
    let mut lines = input.lines();
    while let Some(raw) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.contains("-->") {
            let mut text = Vec::new();
            for follow in lines.by_ref() {
                let follow = follow.trim();
                if follow.is_empty() {
                    break;
                }
                text.push(follow.to_string());
            }
            if text.is_empty() {
                debug!("dropping cue without text at {line}");
                continue;
            }
            cues.push(Cue {
                index: cues.len() as u32 + 1,
                time_range: line.to_string(),
                text,
            });
        } else if line.chars().all(|c| c.is_ascii_digit()) {
            // stale counter from the source file
        } else if let Some(prev) = cues.last_mut() {
            prev.text.push(line.to_string());
        } else {
            debug!("dropping stray line before the first cue: {line}");
        }
    }
    cues
}

/// Format cues back to subtitle text.
/// The way this works is by writing each cue sequentially with blank lines.
pub fn format(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!(
            "{}\n{}\n{}\n\n",
            cue.index,
            cue.time_range,
            cue.text.join("\n")
        ));
    }
    out
}

/// Collapse every cue's text lines into one space-joined display line.
/// Cues carrying no text are silently skipped, the same leniency the
/// reference output applies to short sections.
pub fn flatten(cues: &[Cue]) -> Vec<Cue> {
    cues.iter()
        .filter(|cue| !cue.text.is_empty())
        .map(|cue| Cue {
            index: cue.index,
            time_range: cue.time_range.clone(),
            text: vec![cue.text.join(" ")],
        })
        .collect()
}

/// Renumber cues from 1 and pull out the flat text column.
/// This function should return the renumbered cues together with the ordered
/// text list that becomes the translation working set.
pub fn extract(cues: &[Cue]) -> (Vec<Cue>, Vec<String>) {
    let mut renumbered = Vec::with_capacity(cues.len());
    let mut texts = Vec::with_capacity(cues.len());
    for (i, cue) in cues.iter().enumerate() {
        renumbered.push(Cue {
            index: i as u32 + 1,
            time_range: cue.time_range.clone(),
            text: cue.text.clone(),
        });
        texts.push(cue.text.join(" "));
    }
    (renumbered, texts)
}

/// Re-zip cues with their translated lines by position.
/// Each cue takes the translated line at `index - 1`; the call fails when the
/// translation list is shorter than the highest cue index.
pub fn recompose(cues: &[Cue], translations: &[String]) -> Result<Vec<Cue>> {
    let mut out = Vec::with_capacity(cues.len());
    for cue in cues {
        let text = translations.get(cue.index as usize - 1).ok_or_else(|| {
            anyhow!(
                "no translated line for cue {} ({} lines available)",
                cue.index,
                translations.len()
            )
        })?;
        out.push(Cue {
            index: cue.index,
            time_range: cue.time_range.clone(),
            text: vec![text.clone()],
        });
    }
    Ok(out)
}
