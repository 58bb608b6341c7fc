use std::collections::BTreeSet;

use log::debug;

use crate::{
  slot::{SlotId, SlotModel},
  word_bank::{WordBank, WordId},
};

/// The words still considered possible for each slot, indexed by `SlotId`.
/// Sets iterate in `WordId` order, which is lexicographic word order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domains {
  domains: Vec<BTreeSet<WordId>>,
}

impl Domains {
  /// Seeds every slot with the whole bank.
  pub fn new(model: &SlotModel, bank: &WordBank) -> Self {
    let all_words: BTreeSet<_> = bank.all_ids().collect();
    Self {
      domains: model.ids().map(|_| all_words.clone()).collect(),
    }
  }

  pub fn get(&self, slot: SlotId) -> &BTreeSet<WordId> {
    &self.domains[slot]
  }

  pub(crate) fn get_mut(&mut self, slot: SlotId) -> &mut BTreeSet<WordId> {
    &mut self.domains[slot]
  }

  pub fn size(&self, slot: SlotId) -> usize {
    self.domains[slot].len()
  }

  pub fn contains(&self, slot: SlotId, word: WordId) -> bool {
    self.domains[slot].contains(&word)
  }

  pub fn total_size(&self) -> usize {
    self.domains.iter().map(BTreeSet::len).sum()
  }

  pub fn words<'a>(&'a self, slot: SlotId, bank: &'a WordBank) -> impl Iterator<Item = &'a str> {
    self.domains[slot].iter().filter_map(|&id| bank.get(id))
  }

  /// Drops every word whose length differs from its slot's length. Returns the
  /// first slot left with an empty domain, if any.
  pub fn enforce_node_consistency(&mut self, model: &SlotModel, bank: &WordBank) -> Option<SlotId> {
    for (id, slot) in model.slots() {
      let length = slot.length as usize;
      self.domains[id].retain(|&word| bank.word_len(word) == length);
    }
    debug!(
      "Node consistency left {} candidates across {} slots",
      self.total_size(),
      model.len()
    );

    model.ids().find(|&id| self.domains[id].is_empty())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use crate::{
    slot::{Slot, SlotModel},
    word_bank::WordBank,
  };

  use super::Domains;

  #[gtest]
  fn test_seeded_with_whole_bank() {
    let model = SlotModel::new([Slot::across(0, 0, 3), Slot::down(0, 0, 2)]).unwrap();
    let bank = WordBank::from_words(["cat", "at", "dog"]);
    let domains = Domains::new(&model, &bank);
    expect_that!(domains.size(0), eq(3));
    expect_that!(domains.size(1), eq(3));
    expect_that!(domains.total_size(), eq(6));
  }

  #[gtest]
  fn test_node_consistency_matches_lengths() {
    let model = SlotModel::new([Slot::across(0, 0, 3), Slot::down(0, 0, 2)]).unwrap();
    let bank = WordBank::from_words(["cat", "at", "dog", "bird", "ox"]);
    let mut domains = Domains::new(&model, &bank);

    expect_that!(domains.enforce_node_consistency(&model, &bank), none());
    expect_that!(domains.words(0, &bank).collect::<Vec<_>>(), container_eq(["cat", "dog"]));
    expect_that!(domains.words(1, &bank).collect::<Vec<_>>(), container_eq(["at", "ox"]));
    for (id, slot) in model.slots() {
      for word in domains.words(id, &bank) {
        expect_that!(word.len(), eq(slot.length as usize));
      }
    }
  }

  #[gtest]
  fn test_node_consistency_reports_empty_slot() {
    let model = SlotModel::new([Slot::across(0, 0, 3), Slot::across(0, 2, 5)]).unwrap();
    let bank = WordBank::from_words(["cat", "dog"]);
    let mut domains = Domains::new(&model, &bank);

    expect_that!(domains.enforce_node_consistency(&model, &bank), some(eq(1)));
    expect_that!(domains.size(0), eq(2));
    expect_that!(domains.size(1), eq(0));
  }
}
