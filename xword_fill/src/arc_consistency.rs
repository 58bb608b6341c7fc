//! AC-3 over the crossing constraints of a puzzle. A pair of neighboring slots
//! `(x, y)` is arc consistent when every word left for `x` has at least one
//! word left for `y` with the same letter in their shared cell.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::{
  domain::Domains,
  slot::{Overlap, SlotId, SlotModel},
  word_bank::WordBank,
};

/// Outcome of running AC-3 to a fixed point.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
  /// The queue drained and no domain is empty.
  Consistent,
  /// The domain of this slot was emptied; the puzzle has no fill.
  Wipeout(SlotId),
}

pub struct ArcConsistency<'a> {
  model: &'a SlotModel,
  bank: &'a WordBank,
}

impl<'a> ArcConsistency<'a> {
  pub fn new(model: &'a SlotModel, bank: &'a WordBank) -> Self {
    Self { model, bank }
  }

  /// Removes every word from `x`'s domain that has no partner in `y`'s domain
  /// agreeing on their shared cell. Returns whether anything was removed.
  pub fn revise(&self, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let Some(Overlap { this_idx, other_idx }) = self.model.overlap(x, y) else {
      return false;
    };

    let supported: HashSet<u8> = domains
      .get(y)
      .iter()
      .filter_map(|&word| self.bank.letter(word, other_idx))
      .collect();

    let before = domains.size(x);
    domains.get_mut(x).retain(|&word| {
      self
        .bank
        .letter(word, this_idx)
        .is_some_and(|c| supported.contains(&c))
    });
    let removed = before - domains.size(x);

    if removed > 0 {
      trace!(
        "Revising {} against {} removed {removed} words",
        self.model.slot(x),
        self.model.slot(y)
      );
    }
    removed > 0
  }

  /// Runs AC-3 until the work queue is empty. Starts from `initial_arcs` if
  /// given, otherwise from every ordered neighbor pair.
  pub fn ac3(
    &self,
    domains: &mut Domains,
    initial_arcs: Option<Vec<(SlotId, SlotId)>>,
  ) -> Propagation {
    let initial_arcs = initial_arcs.unwrap_or_else(|| self.model.arcs().collect());

    let mut queued = HashSet::new();
    let mut queue: VecDeque<_> = initial_arcs
      .into_iter()
      .filter(|&arc| queued.insert(arc))
      .collect();

    while let Some((x, y)) = queue.pop_front() {
      queued.remove(&(x, y));
      if !self.revise(domains, x, y) {
        continue;
      }

      if domains.get(x).is_empty() {
        debug!("Arc consistency emptied the domain of {}", self.model.slot(x));
        return Propagation::Wipeout(x);
      }

      for &z in self.model.neighbors(x) {
        if z != y && queued.insert((z, x)) {
          queue.push_back((z, x));
        }
      }
    }

    debug!("Arc consistency left {} candidates", domains.total_size());
    Propagation::Consistent
  }
}
