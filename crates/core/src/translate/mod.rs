//! Translation orchestration for the subtitle pipeline.
//! This module wires cue parsing, sentence translation and artifact output.

use crate::sentence::{self, Segmentation};
use crate::srt;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Default source language for sentence translation.
pub const DEFAULT_SOURCE_LANG: &str = "en";
/// Default target language for sentence translation.
pub const DEFAULT_TARGET_LANG: &str = "fa";

/// Translates a single sentence between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target`, returning plain text.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

pub mod google;

/// Options controlling a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Language code of the input subtitle text.
    pub source_lang: String,
    /// Language code the sentences are translated into.
    pub target_lang: String,
    /// Directory for artifacts and the final subtitle; the input file's
    /// directory when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            output_dir: None,
        }
    }
}

impl PipelineOptions {
    /// Directory where a run over `input` writes its files.
    pub fn resolve_output_dir(&self, input: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => input.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
        }
    }
}

/// Checkpoint files written between pipeline stages, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Standardized,
    SingleLine,
    CueText,
    Sentences,
    Translations,
    LineToSentence,
    LineToLength,
}

impl Artifact {
    /// File name of this artifact inside the output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Standardized => "0001-standardized.srt",
            Artifact::SingleLine => "0002-single_line.srt",
            Artifact::CueText => "0003-cue_text.txt",
            Artifact::Sentences => "0004-sentences.txt",
            Artifact::Translations => "0005-translations.txt",
            Artifact::LineToSentence => "0006-line_to_sentence.txt",
            Artifact::LineToLength => "0007-line_to_length.txt",
        }
    }
}

/// Writes intermediate artifacts, or swallows them when disabled.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    dir: Option<PathBuf>,
}

impl ArtifactSink {
    /// Sink that persists artifacts under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Sink that keeps no checkpoint files around.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    /// Persist one artifact if the sink is enabled.
    pub fn write(&self, artifact: Artifact, content: &str) -> Result<()> {
        if let Some(dir) = &self.dir {
            let path = dir.join(artifact.file_name());
            fs::write(&path, content)?;
            debug!("wrote {}", path.display());
        }
        Ok(())
    }
}

/// Outcome of translating the extracted cue lines.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// One translated part per cue line of every terminated sentence.
    pub lines: Vec<String>,
    /// The segmentation the parts were derived from.
    pub segmentation: Segmentation,
}

/// Translate cue lines sentence by sentence and redistribute the results.
/// Each terminated sentence is translated once, in order; a failed call falls
/// back to the original sentence text so one bad response never aborts the
/// run. A trailing sentence without terminal punctuation yields no parts,
/// which the recomposer later reports as a count mismatch.
pub async fn translate_lines<T>(
    lines: &[String],
    translator: &T,
    source: &str,
    target: &str,
) -> TranslationOutcome
where
    T: Translator + ?Sized,
{
    let segmentation = sentence::segment(lines);
    info!(
        "grouped {} cue lines into {} sentences",
        lines.len(),
        segmentation.sentences.len()
    );
    let mut parts = Vec::with_capacity(lines.len());
    for (no, sent) in segmentation.sentences.iter().enumerate() {
        if !sent.terminated {
            warn!(
                "sentence {} has no terminal punctuation; its {} lines stay untranslated",
                no + 1,
                sent.line_numbers.len()
            );
            continue;
        }
        let percentages = sentence::length_percentages(sent);
        let translated = match translator.translate(&sent.text, source, target).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "translation failed for sentence {}: {err}; keeping original text",
                    no + 1
                );
                sent.text.clone()
            }
        };
        let split = sentence::split_by_percentages(&translated, &percentages);
        trace!("sentence {} split into {} parts", no + 1, split.len());
        parts.extend(split);
    }
    TranslationOutcome {
        lines: parts,
        segmentation,
    }
}

/// Run the whole pipeline on a subtitle file and write the translated copy.
/// This function should normalize, flatten, extract, translate and recompose
/// in order, persisting each checkpoint artifact before the next stage runs.
/// It returns the path of the final translated subtitle.
pub async fn process_file<T>(
    input: &Path,
    translator: &T,
    options: &PipelineOptions,
    sink: &ArtifactSink,
) -> Result<PathBuf>
where
    T: Translator + ?Sized,
{
    trace!("process_file input={}", input.display());
    let out_dir = options.resolve_output_dir(input);
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&out_dir)?;
    }

    info!("reading {}", input.display());
    let raw = fs::read_to_string(input)?;
    let cues = srt::normalize(&raw);
    info!("standardized {} cues", cues.len());
    sink.write(Artifact::Standardized, &srt::format(&cues))?;

    let flat = srt::flatten(&cues);
    sink.write(Artifact::SingleLine, &srt::format(&flat))?;

    let (numbered, texts) = srt::extract(&flat);
    sink.write(Artifact::CueText, &joined_lines(&texts))?;

    info!(
        "translating {} -> {}",
        options.source_lang, options.target_lang
    );
    let outcome = translate_lines(&texts, translator, &options.source_lang, &options.target_lang).await;
    let sentence_lines: Vec<&str> = outcome
        .segmentation
        .sentences
        .iter()
        .map(|s| s.text.as_str())
        .collect();
    sink.write(Artifact::Sentences, &joined_lines(&sentence_lines))?;
    sink.write(Artifact::Translations, &joined_lines(&outcome.lines))?;
    sink.write(
        Artifact::LineToSentence,
        &format_mapping(&outcome.segmentation.line_to_sentence),
    )?;
    sink.write(
        Artifact::LineToLength,
        &format_mapping(&outcome.segmentation.line_to_length),
    )?;

    let final_cues = srt::recompose(&numbered, &outcome.lines)?;
    let out_path = out_dir.join(format!(
        "{}_{}.srt",
        input.file_stem().unwrap_or_default().to_string_lossy(),
        options.target_lang
    ));
    fs::write(&out_path, srt::format(&final_cues))?;
    info!("wrote {}", out_path.display());
    Ok(out_path)
}

/// Join values one per line, each followed by a newline.
fn joined_lines<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(item.as_ref());
        out.push('\n');
    }
    out
}

/// Serialize a line mapping as `line:value` rows in ascending line order.
fn format_mapping(map: &BTreeMap<usize, usize>) -> String {
    let mut out = String::new();
    for (line, value) in map {
        out.push_str(&format!("{line}:{value}\n"));
    }
    out
}
