use std::cmp::Reverse;

use itertools::Itertools;
use log::{debug, trace};

use crate::{
  assignment::Assignment,
  domain::Domains,
  slot::{SlotId, SlotModel},
  word_bank::{WordBank, WordId},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
  /// Partial assignments the search recursed into, including the empty one.
  pub states: usize,
  /// Tentative assignments undone after their subtree failed.
  pub backtracks: usize,
}

/// Chronological backtracking over partial assignments. The domains are only
/// read; every tentative assignment is undone before control returns to the
/// frame that made it.
pub struct Search<'a> {
  model: &'a SlotModel,
  bank: &'a WordBank,
  domains: &'a Domains,
  stats: SearchStats,
}

impl<'a> Search<'a> {
  pub fn new(model: &'a SlotModel, bank: &'a WordBank, domains: &'a Domains) -> Self {
    Self {
      model,
      bank,
      domains,
      stats: SearchStats::default(),
    }
  }

  pub fn stats(&self) -> SearchStats {
    self.stats
  }

  /// Searches from the empty assignment, returning the first complete
  /// consistent assignment found.
  pub fn run(&mut self) -> Option<Assignment> {
    let mut assignment = Assignment::new();
    let found = self.backtrack(&mut assignment);
    debug!(
      "Search {} after {} states and {} backtracks",
      if found { "succeeded" } else { "failed" },
      self.stats.states,
      self.stats.backtracks
    );
    found.then_some(assignment)
  }

  /// The unassigned slot with the fewest remaining words, preferring more
  /// neighbors and then the lower slot id. `None` once every slot is assigned.
  pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
    self
      .model
      .ids()
      .filter(|&slot| !assignment.is_assigned(slot))
      .min_by_key(|&slot| (self.domains.size(slot), Reverse(self.model.degree(slot)), slot))
  }

  /// The words of `slot`'s domain, fewest conflicts first, where a word's
  /// conflicts are the unassigned neighbors whose domains also hold it. Ties
  /// keep lexicographic order.
  pub fn order_domain_values(&self, slot: SlotId, assignment: &Assignment) -> Vec<WordId> {
    let unassigned_neighbors: Vec<_> = self
      .model
      .neighbors(slot)
      .iter()
      .copied()
      .filter(|&neighbor| !assignment.is_assigned(neighbor))
      .collect();

    self
      .domains
      .get(slot)
      .iter()
      .copied()
      .sorted_by_key(|&word| {
        let conflicts = unassigned_neighbors
          .iter()
          .filter(|&&neighbor| self.domains.contains(neighbor, word))
          .count();
        (conflicts, word)
      })
      .collect()
  }

  fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
    self.stats.states += 1;
    let Some(slot) = self.select_unassigned_variable(assignment) else {
      return true;
    };

    for word in self.order_domain_values(slot, assignment) {
      if !assignment.consistent_with(self.model, self.bank, slot, word) {
        continue;
      }

      assignment.assign(slot, word);
      trace!(
        "Trying {} = {}",
        self.model.slot(slot),
        self.bank.get(word).unwrap_or("?")
      );
      if self.backtrack(assignment) {
        return true;
      }
      assignment.unassign(slot);
      self.stats.backtracks += 1;
    }

    false
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use crate::{
    arc_consistency::{ArcConsistency, Propagation},
    assignment::Assignment,
    domain::Domains,
    slot::{Slot, SlotModel},
    word_bank::WordBank,
  };

  use super::{Search, SearchStats};

  fn reduced_domains(model: &SlotModel, bank: &WordBank) -> Domains {
    let mut domains = Domains::new(model, bank);
    assert_that!(domains.enforce_node_consistency(model, bank), none());
    assert_that!(
      ArcConsistency::new(model, bank).ac3(&mut domains, None),
      eq(Propagation::Consistent)
    );
    domains
  }

  fn crossing() -> (SlotModel, WordBank) {
    let model = SlotModel::new([Slot::across(0, 0, 3), Slot::down(1, 0, 3)]).unwrap();
    let bank = WordBank::from_words(["cat", "dog", "ace", "tag"]);
    (model, bank)
  }

  fn names<'a>(bank: &'a WordBank, words: &[u32]) -> Vec<&'a str> {
    words.iter().map(|&word| bank.get(word).unwrap()).collect()
  }

  #[gtest]
  fn test_select_minimum_remaining_values() {
    let (model, bank) = crossing();
    let domains = reduced_domains(&model, &bank);
    let search = Search::new(&model, &bank, &domains);

    expect_that!(search.select_unassigned_variable(&Assignment::new()), some(eq(1)));
  }

  #[gtest]
  fn test_select_prefers_degree() {
    let model =
      SlotModel::new([Slot::across(0, 0, 3), Slot::down(2, 0, 3), Slot::across(2, 2, 3)]).unwrap();
    let bank = WordBank::from_words(["abc", "def"]);
    let mut domains = Domains::new(&model, &bank);
    assert_that!(domains.enforce_node_consistency(&model, &bank), none());
    let search = Search::new(&model, &bank, &domains);

    expect_that!(model.degree(1), eq(2));
    expect_that!(search.select_unassigned_variable(&Assignment::new()), some(eq(1)));

    let mut assignment = Assignment::new();
    assignment.assign(1, 0);
    expect_that!(search.select_unassigned_variable(&assignment), some(eq(0)));
    assignment.assign(0, 1);
    assignment.assign(2, 1);
    expect_that!(search.select_unassigned_variable(&assignment), none());
  }

  #[gtest]
  fn test_order_least_constraining_first() {
    let (model, bank) = crossing();
    let domains = reduced_domains(&model, &bank);
    let search = Search::new(&model, &bank, &domains);

    expect_that!(
      names(&bank, &search.order_domain_values(0, &Assignment::new())),
      container_eq(["tag", "ace", "cat"])
    );

    let mut assignment = Assignment::new();
    assignment.assign(1, bank.id("ace").unwrap());
    expect_that!(
      names(&bank, &search.order_domain_values(0, &assignment)),
      container_eq(["ace", "cat", "tag"])
    );
  }

  #[gtest]
  fn test_run_crossing() {
    let (model, bank) = crossing();
    let domains = reduced_domains(&model, &bank);
    let mut search = Search::new(&model, &bank, &domains);

    let assignment = search.run();
    assert_that!(assignment, some(anything()));
    let assignment = assignment.unwrap();
    expect_that!(
      assignment.words(&bank).collect::<Vec<_>>(),
      container_eq([(0, "cat"), (1, "ace")])
    );
    expect_that!(
      search.stats(),
      eq(SearchStats {
        states: 3,
        backtracks: 0
      })
    );
  }

  #[gtest]
  fn test_run_exhausts_on_repeated_words() {
    let model = SlotModel::new([Slot::across(0, 0, 2), Slot::down(0, 0, 2)]).unwrap();
    let bank = WordBank::from_words(["ab", "cd"]);
    let domains = reduced_domains(&model, &bank);
    let mut search = Search::new(&model, &bank, &domains);

    expect_that!(search.run(), none());
    expect_that!(search.stats().backtracks, eq(2));
  }

  #[gtest]
  fn test_run_leaves_domains_untouched() {
    let (model, bank) = crossing();
    let domains = reduced_domains(&model, &bank);
    let before = domains.clone();

    let _ = Search::new(&model, &bank, &domains).run();
    expect_true!(domains == before);
  }
}
