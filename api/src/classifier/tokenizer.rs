use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::LoadError;

/// Characters replaced by a space before splitting into words.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Word-to-index vocabulary fitted at training time.
#[derive(Debug, Clone, Deserialize)]
pub struct Tokenizer {
    word_index: HashMap<String, u32>,
    #[serde(default)]
    num_words: Option<u32>,
    #[serde(default)]
    oov_token: Option<String>,
}

impl Tokenizer {
    #[cfg(test)]
    pub(crate) fn new(word_index: HashMap<String, u32>) -> Self {
        Self {
            word_index,
            num_words: None,
            oov_token: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_num_words(mut self, num_words: u32) -> Self {
        self.num_words = Some(num_words);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_oov_token(mut self, oov_token: impl Into<String>) -> Self {
        self.oov_token = Some(oov_token.into());
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Maps each known word of `text` to its index. Unknown words, and words
    /// ranked outside `num_words`, map to the OOV index or are dropped.
    pub fn texts_to_sequence(&self, text: &str) -> Vec<u32> {
        let oov_index = self
            .oov_token
            .as_ref()
            .and_then(|token| self.word_index.get(token).copied());

        text.to_lowercase()
            .split(|c: char| c == ' ' || FILTERS.contains(c))
            .filter(|word| !word.is_empty())
            .filter_map(|word| match self.word_index.get(word) {
                Some(&index) if self.within_limit(index) => Some(index),
                _ => oov_index,
            })
            .collect()
    }

    /// A `num_words` of 0 means no limit.
    fn within_limit(&self, index: u32) -> bool {
        match self.num_words {
            Some(n) if n > 0 => index < n,
            _ => true,
        }
    }

    pub fn vocab_len(&self) -> usize {
        self.word_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> HashMap<String, u32> {
        [("<OOV>", 1), ("free", 2), ("prize", 3), ("you", 4), ("won", 5)]
            .into_iter()
            .map(|(w, i)| (w.to_string(), i))
            .collect()
    }

    #[test]
    fn test_known_words_in_order() {
        let tokenizer = Tokenizer::new(vocab());
        assert_eq!(tokenizer.texts_to_sequence("you won free prize"), vec![4, 5, 2, 3]);
    }

    #[test]
    fn test_unknown_words_dropped_without_oov() {
        let tokenizer = Tokenizer::new(vocab());
        assert_eq!(tokenizer.texts_to_sequence("you have won"), vec![4, 5]);
    }

    #[test]
    fn test_unknown_words_map_to_oov() {
        let tokenizer = Tokenizer::new(vocab()).with_oov_token("<OOV>");
        assert_eq!(tokenizer.texts_to_sequence("you have won"), vec![4, 1, 5]);
    }

    #[test]
    fn test_num_words_limits_vocabulary() {
        let tokenizer = Tokenizer::new(vocab()).with_num_words(4);
        assert_eq!(tokenizer.texts_to_sequence("free prize you won"), vec![2, 3]);

        let tokenizer = tokenizer.with_oov_token("<OOV>");
        assert_eq!(
            tokenizer.texts_to_sequence("free prize you won"),
            vec![2, 3, 1, 1]
        );
    }

    #[test]
    fn test_zero_num_words_is_unlimited() {
        let tokenizer = Tokenizer::new(vocab()).with_num_words(0);
        assert_eq!(tokenizer.texts_to_sequence("free prize you won"), vec![2, 3, 4, 5]);

        let tokenizer: Tokenizer =
            serde_json::from_str(r#"{"word_index": {"hi": 1}, "num_words": 0}"#).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("hi"), vec![1]);
    }

    #[test]
    fn test_splits_on_filters_and_whitespace() {
        let tokenizer = Tokenizer::new(vocab());
        assert_eq!(tokenizer.texts_to_sequence("FREE,prize\tyou\n\nwon!"), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let tokenizer: Tokenizer =
            serde_json::from_str(r#"{"word_index": {"hello": 1}}"#).unwrap();
        assert_eq!(tokenizer.vocab_len(), 1);
        assert_eq!(tokenizer.texts_to_sequence("hello there"), vec![1]);
    }
}
