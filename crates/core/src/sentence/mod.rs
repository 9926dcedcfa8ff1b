//! Sentence grouping and proportional redistribution of translated text.
//! This module maps cue lines to sentences and splits translations back
//! across the original cue boundaries by character-length share.

use std::collections::BTreeMap;
use tracing::trace;

/// Punctuation that closes a sentence at the end of a cue line.
const SENTENCE_ENDINGS: &[char] = &['.', '?', '!', ']'];

/// A sentence assembled from one or more consecutive cue lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Space-joined text of the contributing cue lines.
    pub text: String,
    /// 1-based numbers of the contributing cue lines, in order.
    pub line_numbers: Vec<usize>,
    /// Character count of each contributing cue line, in the same order.
    pub line_lengths: Vec<usize>,
    /// False only for a trailing buffer without terminal punctuation.
    pub terminated: bool,
}

/// Result of grouping cue lines into sentences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub sentences: Vec<Sentence>,
    /// Maps each cue-line number to its 1-based sentence number.
    pub line_to_sentence: BTreeMap<usize, usize>,
    /// Maps each cue-line number to its original character count. Lines of a
    /// trailing unterminated sentence are absent from this map.
    pub line_to_length: BTreeMap<usize, usize>,
}

/// Group cue lines into sentences bounded by terminal punctuation.
/// This function should accumulate lines until one ends with a sentence
/// ending, then emit the buffer and record both line mappings. A leftover
/// buffer still becomes a final sentence, but its lines only reach the
/// sentence map, not the length map.
pub fn segment(lines: &[String]) -> Segmentation {
    let mut seg = Segmentation::default();
    let mut buffer: Vec<String> = Vec::new();
    let mut numbers: Vec<usize> = Vec::new();
    let mut lengths: Vec<usize> = Vec::new();
    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if !line.is_empty() {
            buffer.push(line.to_string());
            numbers.push(idx + 1);
            lengths.push(line.chars().count());
        }
        if line.ends_with(SENTENCE_ENDINGS) {
            let sentence_no = seg.sentences.len() + 1;
            for (number, length) in numbers.iter().zip(&lengths) {
                seg.line_to_sentence.insert(*number, sentence_no);
                seg.line_to_length.insert(*number, *length);
            }
            seg.sentences.push(Sentence {
                text: buffer.join(" "),
                line_numbers: std::mem::take(&mut numbers),
                line_lengths: std::mem::take(&mut lengths),
                terminated: true,
            });
            buffer.clear();
        }
    }
    if !buffer.is_empty() {
        let sentence_no = seg.sentences.len() + 1;
        for number in &numbers {
            seg.line_to_sentence.insert(*number, sentence_no);
        }
        seg.sentences.push(Sentence {
            text: buffer.join(" "),
            line_numbers: numbers,
            line_lengths: lengths,
            terminated: false,
        });
    }
    seg
}

/// Compute one length share per contributing cue line.
/// Each entry is `length * 100 / total + 1` over the joined sentence length,
/// so a single-line sentence always yields `[101]`. The shares are
/// thresholds for splitting, not a partition, and need not sum to 100.
pub fn length_percentages(sentence: &Sentence) -> Vec<usize> {
    let total = sentence.text.chars().count();
    sentence
        .line_lengths
        .iter()
        .map(|length| length * 100 / total + 1)
        .collect()
}

/// Split a translated sentence into word groups sized by the given shares.
/// The way this works is by filling each part with whole words until the
/// next word would push it past `total * share / 100` characters, counting
/// one separator per word already taken. The last share is never measured:
/// the final part absorbs every remaining word, and any part may come out
/// empty when no word fits its target.
pub fn split_by_percentages(sentence: &str, percentages: &[usize]) -> Vec<String> {
    trace!(
        "split_by_percentages chars={} shares={:?}",
        sentence.chars().count(),
        percentages
    );
    if percentages.is_empty() {
        return Vec::new();
    }
    let total = sentence.chars().count();
    let words: Vec<&str> = sentence.split_whitespace().collect();
    let mut parts = Vec::with_capacity(percentages.len());
    let mut cursor = 0;
    for percent in &percentages[..percentages.len() - 1] {
        let target = total * percent / 100;
        let mut part: Vec<&str> = Vec::new();
        let mut part_chars = 0;
        while cursor < words.len() {
            let word_chars = words[cursor].chars().count();
            if part_chars + word_chars + part.len() > target {
                break;
            }
            part_chars += word_chars;
            part.push(words[cursor]);
            cursor += 1;
        }
        parts.push(part.join(" "));
    }
    parts.push(words[cursor..].join(" "));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    /// Lines accumulate until terminal punctuation closes the sentence.
    #[test]
    fn groups_lines_into_sentences() {
        let seg = segment(&lines(&["Hello", "world.", "How are you?"]));
        assert_eq!(seg.sentences.len(), 2);
        assert_eq!(seg.sentences[0].text, "Hello world.");
        assert_eq!(seg.sentences[0].line_numbers, vec![1, 2]);
        assert_eq!(seg.sentences[0].line_lengths, vec![5, 6]);
        assert!(seg.sentences[0].terminated);
        assert_eq!(seg.sentences[1].text, "How are you?");
        assert_eq!(seg.line_to_sentence[&1], 1);
        assert_eq!(seg.line_to_sentence[&2], 1);
        assert_eq!(seg.line_to_sentence[&3], 2);
        assert_eq!(seg.line_to_length[&3], 12);
    }

    /// Exclamation marks and closing brackets also end a sentence.
    #[test]
    fn brackets_and_exclamations_terminate() {
        let seg = segment(&lines(&["[dramatic music]", "Wow!"]));
        assert_eq!(seg.sentences.len(), 2);
        assert!(seg.sentences.iter().all(|s| s.terminated));
    }

    /// Empty lines consume a line number but join no sentence.
    #[test]
    fn skips_empty_lines() {
        let seg = segment(&lines(&["Hello world.", "", "This is great."]));
        assert_eq!(seg.sentences.len(), 2);
        assert_eq!(seg.line_to_sentence.get(&2), None);
        assert_eq!(seg.line_to_sentence[&1], 1);
        assert_eq!(seg.line_to_sentence[&3], 2);
    }

    /// A trailing buffer becomes a sentence that is mapped but not measured.
    #[test]
    fn trailing_sentence_skips_length_map() {
        let seg = segment(&lines(&["Hello world.", "and then"]));
        assert_eq!(seg.sentences.len(), 2);
        assert!(!seg.sentences[1].terminated);
        assert_eq!(seg.line_to_sentence[&2], 2);
        assert_eq!(seg.line_to_length.get(&2), None);
        assert_eq!(seg.line_to_length[&1], 12);
    }

    /// A single-line sentence always gets the full 101 share.
    #[test]
    fn single_line_share_is_101() {
        let seg = segment(&lines(&["Hello world."]));
        assert_eq!(length_percentages(&seg.sentences[0]), vec![101]);
    }

    /// Shares follow floor(length * 100 / total) + 1 over the joined text.
    #[test]
    fn shares_use_joined_length() {
        let first = "a".repeat(10);
        let second = format!("{}.", "b".repeat(29));
        let seg = segment(&lines(&[first.as_str(), second.as_str()]));
        let shares = length_percentages(&seg.sentences[0]);
        assert_eq!(shares, vec![25, 74]);
        assert!(shares.iter().all(|p| (1..=101).contains(p)));
    }

    /// Splitting conserves every word across the output parts.
    #[test]
    fn split_conserves_words() {
        let sentence = "one two three four five";
        let parts = split_by_percentages(sentence, &[40, 30, 101]);
        assert_eq!(parts.len(), 3);
        let rejoined: Vec<&str> = parts
            .iter()
            .flat_map(|p| p.split_whitespace())
            .collect();
        assert_eq!(rejoined, vec!["one", "two", "three", "four", "five"]);
    }

    /// A lone share hands the whole sentence to a single part.
    #[test]
    fn single_share_keeps_sentence_whole() {
        let parts = split_by_percentages("everything stays together", &[101]);
        assert_eq!(parts, vec!["everything stays together".to_string()]);
    }

    /// A tiny share may produce an empty part; the words move on.
    #[test]
    fn small_share_yields_empty_part() {
        let parts = split_by_percentages("alpha beta", &[1, 101]);
        assert_eq!(parts[0], "");
        assert_eq!(parts[1], "alpha beta");
    }

    /// An oversized early share can drain every word, leaving the rest empty.
    #[test]
    fn oversized_share_leaves_empty_tail() {
        let parts = split_by_percentages("ab cd", &[101, 50]);
        assert_eq!(parts, vec!["ab cd".to_string(), String::new()]);
    }

    /// Lengths are counted in characters, so multi-byte text splits cleanly.
    #[test]
    fn splits_by_characters_not_bytes() {
        let parts = split_by_percentages("سلام دنیا", &[51, 101]);
        assert_eq!(parts, vec!["سلام".to_string(), "دنیا".to_string()]);
    }

    /// The greedy fill stops at the first word that would pass the target.
    #[test]
    fn fill_counts_separators() {
        // total 22 chars, share 51 -> target 11; "Hello there" fits exactly
        // (5 + 5 chars + 1 separator), "my" would overflow.
        let parts = split_by_percentages("Hello there my friend.", &[51, 101]);
        assert_eq!(parts[0], "Hello there");
        assert_eq!(parts[1], "my friend.");
    }
}
