use std::sync::OnceLock;

use regex::Regex;

fn digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    // \d is Unicode-aware: every decimal digit (category Nd), not just 0-9
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Lowercases the message and removes decimal digits and ASCII punctuation.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    digits()
        .replace_all(&lowered, "")
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Zero-pads at the end so the sequence is exactly `len` long. Longer
/// sequences keep their last `len` indices.
pub fn pad_sequence(mut sequence: Vec<u32>, len: usize) -> Vec<u32> {
    if sequence.len() > len {
        sequence.drain(..sequence.len() - len);
    }
    sequence.resize(len, 0);
    sequence
}
