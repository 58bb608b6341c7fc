use std::fmt::Display;

use log::debug;
use util::{error::FillResult, grid::Grid};

use crate::{
  arc_consistency::{ArcConsistency, Propagation},
  assignment::Assignment,
  domain::Domains,
  search::Search,
  slot::{SlotId, SlotModel},
  word_bank::WordBank,
};

/// Why a puzzle has no fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unsatisfiable {
  /// No word in the bank has this slot's length. Search never started.
  EmptyDomain { slot: SlotId },
  /// Arc consistency removed every word from this slot.
  Wipeout { slot: SlotId },
  /// Search tried every candidate without completing the grid.
  Exhausted,
}

impl Display for Unsatisfiable {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Unsatisfiable::EmptyDomain { slot } => write!(f, "no word fits slot {slot}"),
      Unsatisfiable::Wipeout { slot } => write!(f, "crossings leave no word for slot {slot}"),
      Unsatisfiable::Exhausted => write!(f, "search exhausted every candidate"),
    }
  }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
  Solved(Assignment),
  Unsatisfiable(Unsatisfiable),
}

impl SolveOutcome {
  pub fn assignment(&self) -> Option<&Assignment> {
    match self {
      SolveOutcome::Solved(assignment) => Some(assignment),
      SolveOutcome::Unsatisfiable(_) => None,
    }
  }

  pub fn unsatisfiable(&self) -> Option<Unsatisfiable> {
    match self {
      SolveOutcome::Solved(_) => None,
      SolveOutcome::Unsatisfiable(reason) => Some(*reason),
    }
  }
}

#[derive(Clone, Debug)]
pub struct Solver {
  model: SlotModel,
  bank: WordBank,
}

impl Solver {
  pub fn new(model: SlotModel, bank: WordBank) -> Self {
    Self { model, bank }
  }

  pub fn from_grid<S>(grid: &Grid<bool>, words: impl IntoIterator<Item = S>) -> FillResult<Self>
  where
    S: AsRef<str>,
  {
    Ok(Self::new(SlotModel::from_grid(grid)?, WordBank::from_words(words)))
  }

  pub fn model(&self) -> &SlotModel {
    &self.model
  }

  pub fn bank(&self) -> &WordBank {
    &self.bank
  }

  /// Finds a fill: node consistency, then arc consistency, then backtracking
  /// search over the reduced domains. Each call works on fresh domains.
  pub fn solve(&self) -> SolveOutcome {
    debug!(
      "Solving {} slots with {} candidate words",
      self.model.len(),
      self.bank.len()
    );
    let mut domains = Domains::new(&self.model, &self.bank);

    if let Some(slot) = domains.enforce_node_consistency(&self.model, &self.bank) {
      debug!("No word has the length of {}", self.model.slot(slot));
      return SolveOutcome::Unsatisfiable(Unsatisfiable::EmptyDomain { slot });
    }

    if let Propagation::Wipeout(slot) =
      ArcConsistency::new(&self.model, &self.bank).ac3(&mut domains, None)
    {
      return SolveOutcome::Unsatisfiable(Unsatisfiable::Wipeout { slot });
    }

    match Search::new(&self.model, &self.bank, &domains).run() {
      Some(assignment) => SolveOutcome::Solved(assignment),
      None => SolveOutcome::Unsatisfiable(Unsatisfiable::Exhausted),
    }
  }
}
