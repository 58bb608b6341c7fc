use std::collections::{BTreeSet, HashMap};

use log::debug;

/// Index of a word in a `WordBank`. Ids follow the lexicographic order of the
/// words they name.
pub type WordId = u32;

#[derive(Clone, Debug)]
pub struct WordBank {
  words: Vec<String>,
  ids: HashMap<String, WordId>,
}

impl WordBank {
  fn canonicalize_word(word: &str) -> Option<String> {
    let word = word.trim();
    (!word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
      .then(|| word.to_ascii_lowercase())
  }

  /// Builds a bank from raw candidate words. Words are lower-cased and
  /// de-duplicated; anything that is not purely ASCII-alphabetic is dropped.
  pub fn from_words<S>(words: impl IntoIterator<Item = S>) -> Self
  where
    S: AsRef<str>,
  {
    let (word_set, rejected) = words.into_iter().fold(
      (BTreeSet::new(), 0usize),
      |(mut word_set, rejected), word| match Self::canonicalize_word(word.as_ref()) {
        Some(word) => {
          word_set.insert(word);
          (word_set, rejected)
        }
        None => (word_set, rejected + 1),
      },
    );
    if rejected > 0 {
      debug!("Dropped {rejected} words that are not ASCII-alphabetic");
    }

    let words: Vec<_> = word_set.into_iter().collect();
    let ids = words
      .iter()
      .enumerate()
      .map(|(id, word)| (word.clone(), id as WordId))
      .collect();
    Self { words, ids }
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn id(&self, word: &str) -> Option<WordId> {
    Self::canonicalize_word(word).and_then(|word| self.ids.get(&word).copied())
  }

  pub fn get(&self, id: WordId) -> Option<&str> {
    self.words.get(id as usize).map(|word| word.as_str())
  }

  /// Length of the word in letters, or 0 for an unknown id.
  pub fn word_len(&self, id: WordId) -> usize {
    self.get(id).map_or(0, str::len)
  }

  /// The letter at `idx` of word `id`.
  pub fn letter(&self, id: WordId, idx: usize) -> Option<u8> {
    self.get(id).and_then(|word| word.as_bytes().get(idx).copied())
  }

  pub fn all_ids(&self) -> impl Iterator<Item = WordId> {
    0..self.words.len() as WordId
  }

  pub fn all_words_with_id(&self) -> impl Iterator<Item = (WordId, &str)> {
    self
      .words
      .iter()
      .enumerate()
      .map(|(id, word)| (id as WordId, word.as_str()))
  }
}
