use std::collections::BTreeMap;

use itertools::Itertools;
use util::{
  error::{FillError, FillResult},
  grid::{Grid, MutGridlike},
};

use crate::{
  slot::{Overlap, SlotId, SlotModel},
  word_bank::{WordBank, WordId},
};

/// A partial mapping from slots to words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
  words: BTreeMap<SlotId, WordId>,
}

impl Assignment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn get(&self, slot: SlotId) -> Option<WordId> {
    self.words.get(&slot).copied()
  }

  pub fn is_assigned(&self, slot: SlotId) -> bool {
    self.words.contains_key(&slot)
  }

  /// Assigns `word` to `slot`, returning the word it replaced.
  pub fn assign(&mut self, slot: SlotId, word: WordId) -> Option<WordId> {
    self.words.insert(slot, word)
  }

  pub fn unassign(&mut self, slot: SlotId) -> Option<WordId> {
    self.words.remove(&slot)
  }

  pub fn is_complete(&self, model: &SlotModel) -> bool {
    model.ids().all(|slot| self.is_assigned(slot))
  }

  /// `(slot, word)` pairs in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
    self.words.iter().map(|(&slot, &word)| (slot, word))
  }

  pub fn words<'a>(&'a self, bank: &'a WordBank) -> impl Iterator<Item = (SlotId, &'a str)> {
    self
      .iter()
      .filter_map(|(slot, word)| bank.get(word).map(|word| (slot, word)))
  }

  fn letters_agree(
    model: &SlotModel,
    bank: &WordBank,
    (x, word_x): (SlotId, WordId),
    (y, word_y): (SlotId, WordId),
  ) -> bool {
    model.overlap(x, y).is_none_or(|Overlap { this_idx, other_idx }| {
      bank.letter(word_x, this_idx) == bank.letter(word_y, other_idx)
    })
  }

  /// True when no word is used twice and every pair of assigned neighbors
  /// agrees on their shared letter.
  pub fn consistent(&self, model: &SlotModel, bank: &WordBank) -> bool {
    self.words.values().all_unique()
      && self.iter().all(|(x, word_x)| {
        model.neighbors(x).iter().all(|&y| {
          self
            .get(y)
            .is_none_or(|word_y| Self::letters_agree(model, bank, (x, word_x), (y, word_y)))
        })
      })
  }

  /// Whether assigning `word` to `slot` would keep an already consistent
  /// assignment consistent. Only checks against the other assigned slots.
  pub fn consistent_with(
    &self,
    model: &SlotModel,
    bank: &WordBank,
    slot: SlotId,
    word: WordId,
  ) -> bool {
    !self.iter().any(|(other, other_word)| other != slot && other_word == word)
      && model.neighbors(slot).iter().all(|&y| {
        self
          .get(y)
          .is_none_or(|word_y| Self::letters_agree(model, bank, (slot, word), (y, word_y)))
      })
  }

  /// Writes the assigned words into a grid covering the model. Cells no
  /// assigned slot covers are left `None`.
  pub fn letter_grid(&self, model: &SlotModel, bank: &WordBank) -> FillResult<Grid<Option<char>>> {
    let (width, height) = model.bounds();
    let mut letter_grid = Grid::new(width, height);

    for (slot_id, word_id) in self.iter() {
      let slot = model.slot(slot_id);
      let word = bank
        .get(word_id)
        .ok_or_else(|| FillError::Internal(format!("Unknown word id {word_id}")))?;
      if word.len() != slot.length as usize {
        return Err(
          FillError::Internal(format!(
            "Word {word} does not fit slot {slot} of length {}",
            slot.length
          ))
          .into(),
        );
      }

      for (c, tile_pos) in word.chars().zip(slot.cells()) {
        let tile = letter_grid.get_mut(tile_pos).ok_or_else(|| {
          FillError::Internal(format!("Position {tile_pos} is out of bounds"))
        })?;
        match tile {
          Some(existing_c) => {
            if c != *existing_c {
              return Err(
                FillError::Internal(format!(
                  "Conflicting letter assignment at position {tile_pos}: {c} vs {existing_c}"
                ))
                .into(),
              );
            }
          }
          None => *tile = Some(c),
        }
      }
    }

    Ok(letter_grid)
  }
}
