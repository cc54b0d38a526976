//! Label splitting, training windows and label generation

use super::ngram::{SENTINEL, TERMINATOR};
use std::iter;

/// Split a name at its first dot into `(label, suffix)`.
///
/// `None` when either side would be empty.
#[must_use]
pub fn split_name(name: &str) -> Option<(&str, &str)> {
    let (label, suffix) = name.split_once('.')?;
    if label.is_empty() || suffix.is_empty() {
        return None;
    }
    Some((label, suffix))
}

/// The `(context, next char)` pairs that training `label` observes.
///
/// One pair per character of `label` plus one for the terminator. Contexts
/// are `ngram_size` characters wide, left-padded with sentinels.
#[must_use]
pub fn training_ngrams(label: &str, ngram_size: usize) -> Vec<(String, char)> {
    let padded: Vec<char> = iter::repeat(SENTINEL)
        .take(ngram_size)
        .chain(label.chars())
        .collect();

    label
        .chars()
        .chain(iter::once(TERMINATOR))
        .enumerate()
        .map(|(i, next)| (padded[i..i + ngram_size].iter().collect(), next))
        .collect()
}

/// Generate one label by repeatedly asking `next_char` for the character
/// following the current context.
///
/// A label ends on the terminator or after `max_label_len + ngram_size`
/// draws. Labels that come out empty or longer than `max_label_len` bytes
/// are discarded and generation restarts, at most `max_attempts` times.
pub fn generate_label<F>(
    ngram_size: usize,
    max_label_len: usize,
    max_attempts: usize,
    mut next_char: F,
) -> Option<String>
where
    F: FnMut(&str) -> char,
{
    for _ in 0..max_attempts {
        let mut chars: Vec<char> = vec![SENTINEL; ngram_size];

        for i in 0..max_label_len + ngram_size {
            let context: String = chars[i..i + ngram_size].iter().collect();
            let next = next_char(&context);
            if next == TERMINATOR {
                break;
            }
            chars.push(next);
        }

        let raw: String = chars.into_iter().collect();
        let label = raw.trim_matches(SENTINEL);
        if !label.is_empty() && label.len() <= max_label_len {
            return Some(label.to_string());
        }
    }
    None
}

/// Strip hyphen and dot artifacts from both ends of a generated name.
#[must_use]
pub fn clean_name(name: &str) -> &str {
    name.trim_matches(|c| c == '-' || c == '.')
}
