//! Sentence-aware subtitle translation library.
//! This crate normalizes subtitle cues, regroups them into full sentences,
//! translates each sentence and redistributes the text over the original timing.

pub mod sentence;
pub mod srt;
pub mod translate;
