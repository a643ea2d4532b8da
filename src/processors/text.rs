//! OCR text normalization and identity-number run search.
//!
//! Raw OCR text is noisy: glyph confusions, stray punctuation, ragged
//! whitespace. This module cleans the text while keeping a map back to the
//! original character offsets, then searches for a run of exactly twelve
//! digits, either contiguous or grouped 4-4-4 with single spaces. The
//! offset map lets the validator recover the run's bounding box from
//! per-character OCR geometry.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::ID_NUMBER_LEN;

/// Twelve digits, optionally grouped 4-4-4 by single spaces. Exactness is
/// enforced separately by boundary checks around each match.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4} ?\d{4} ?\d{4}").expect("digit run pattern is valid")
});

/// Common OCR glyph confusions for numeric fields.
fn unconfuse(c: char) -> char {
    match c {
        'O' | 'o' => '0',
        'I' | 'l' | '|' => '1',
        'S' | 's' => '5',
        'B' => '8',
        _ => c,
    }
}

/// Cleaned OCR text plus a map from each cleaned character to the index of
/// the original character it came from.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    /// The cleaned text: digits and single spaces only.
    pub text: String,
    /// `offsets[i]` is the original character index of `text[i]`.
    pub offsets: Vec<usize>,
}

/// Normalizes raw OCR text for digit-run matching.
///
/// Applies the confusion map, keeps digits, folds any whitespace to a
/// single space, drops everything else, and collapses repeated spaces.
pub fn normalize_ocr_text(raw: &str) -> NormalizedText {
    let mut text = String::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(raw.len());
    let mut last_was_space = true; // also trims leading spaces

    for (index, c) in raw.chars().enumerate() {
        let c = unconfuse(c);
        if c.is_ascii_digit() {
            text.push(c);
            offsets.push(index);
            last_was_space = false;
        } else if c.is_whitespace() {
            if !last_was_space {
                text.push(' ');
                offsets.push(index);
                last_was_space = true;
            }
        }
        // Remaining punctuation and letters are dropped.
    }

    if text.ends_with(' ') {
        text.pop();
        offsets.pop();
    }

    NormalizedText { text, offsets }
}

/// A validated run of exactly twelve digits found in OCR text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitRun {
    /// The twelve digits, in reading order, with grouping spaces removed.
    pub digits: String,
    /// Original character indices (into the raw OCR text) of each digit.
    pub digit_offsets: Vec<usize>,
}

/// Searches raw OCR text for a run of exactly [`ID_NUMBER_LEN`] digits.
///
/// A candidate match is rejected when it touches further digits on either
/// side; a 13-digit run therefore never yields a partial 12-digit match.
/// Returns the first qualifying run in reading order, or `None`.
pub fn find_digit_run(raw: &str) -> Option<DigitRun> {
    let normalized = normalize_ocr_text(raw);
    let text = normalized.text.as_str();

    let mut search_from = 0;
    while let Some(found) = DIGIT_RUN.find_at(text, search_from) {
        let preceded_by_digit = text[..found.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let followed_by_digit = text[found.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());

        if preceded_by_digit || followed_by_digit {
            // Part of a longer digit run; resume just past this start.
            search_from = found.start() + 1;
            continue;
        }

        let mut digits = String::with_capacity(ID_NUMBER_LEN);
        let mut digit_offsets = Vec::with_capacity(ID_NUMBER_LEN);
        for (pos, c) in text[found.start()..found.end()].chars().enumerate() {
            if c.is_ascii_digit() {
                digits.push(c);
                digit_offsets.push(normalized.offsets[found.start() + pos]);
            }
        }
        debug_assert_eq!(digits.len(), ID_NUMBER_LEN);
        return Some(DigitRun {
            digits,
            digit_offsets,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_noise_and_collapses_whitespace() {
        let normalized = normalize_ocr_text("  Name: 1234\t 5678 \n9012!! ");
        assert_eq!(normalized.text, "1234 5678 9012");
    }

    #[test]
    fn normalization_applies_confusion_map() {
        let normalized = normalize_ocr_text("l2O4");
        assert_eq!(normalized.text, "1204");
    }

    #[test]
    fn finds_grouped_run() {
        let run = find_digit_run("ID 1234 5678 9012 extra").unwrap();
        assert_eq!(run.digits, "123456789012");
        assert_eq!(run.digit_offsets.len(), 12);
    }

    #[test]
    fn finds_contiguous_run() {
        let run = find_digit_run("123456789012").unwrap();
        assert_eq!(run.digits, "123456789012");
    }

    #[test]
    fn rejects_partial_match_inside_longer_run() {
        assert!(find_digit_run("1234567890123").is_none());
        assert!(find_digit_run("01234 5678 9012").is_none());
    }

    #[test]
    fn rejects_short_runs() {
        assert!(find_digit_run("1234 5678").is_none());
        assert!(find_digit_run("no digits here").is_none());
    }

    #[test]
    fn skips_long_run_but_finds_later_valid_run() {
        let run = find_digit_run("1234567890123 then 1111 2222 3333").unwrap();
        assert_eq!(run.digits, "111122223333");
    }

    #[test]
    fn digit_offsets_point_at_original_characters() {
        let raw = "x 12 34 5678 9012"; // grouped 2-2-4-4 still forms 12 digits
        let run = find_digit_run(raw);
        // Two-digit groups break the 4-4-4 shape, so no match here.
        assert!(run.is_none());

        let raw = "ab 1234 5678 9012";
        let run = find_digit_run(raw).unwrap();
        let chars: Vec<char> = raw.chars().collect();
        for (i, &offset) in run.digit_offsets.iter().enumerate() {
            assert_eq!(
                chars[offset],
                run.digits.chars().nth(i).unwrap(),
                "offset {} should point at digit {}",
                offset,
                i
            );
        }
    }
}
