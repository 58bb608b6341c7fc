use std::{
  collections::HashMap,
  fmt::Display,
  ops::Range,
};

use itertools::Itertools;
use util::{
  error::{FillError, FillResult},
  grid::{Grid, Gridlike},
  pos::{Diff, Pos},
};

/// Runs of fillable cells shorter than this are not slots.
pub const MIN_SLOT_LENGTH: u32 = 2;

pub type SlotId = usize;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Orientation {
  Across,
  Down,
}

impl Orientation {
  pub const fn step(self) -> Diff {
    match self {
      Orientation::Across => Diff::DX,
      Orientation::Down => Diff::DY,
    }
  }
}

impl Display for Orientation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Orientation::Across => "across",
        Orientation::Down => "down",
      }
    )
  }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Slot {
  pub pos: Pos,
  pub orientation: Orientation,
  pub length: u32,
}

impl Slot {
  pub fn across(x: i32, y: i32, length: u32) -> Self {
    Self {
      pos: Pos { x, y },
      orientation: Orientation::Across,
      length,
    }
  }

  pub fn down(x: i32, y: i32, length: u32) -> Self {
    Self {
      pos: Pos { x, y },
      orientation: Orientation::Down,
      length,
    }
  }

  pub fn cells(&self) -> impl Iterator<Item = Pos> {
    let Slot { pos, orientation, length } = *self;
    (0..length as i32).map(move |idx| pos + idx * orientation.step())
  }

  /// Row-major position, with across before down for slots starting on the
  /// same cell. Length only separates slots that cannot coexist.
  fn canonical_key(&self) -> (i32, i32, Orientation, u32) {
    (self.pos.y, self.pos.x, self.orientation, self.length)
  }
}

impl Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{},{} {}", self.pos.y, self.pos.x, self.orientation)
  }
}

/// Where two neighboring slots cross: `this_idx` is the letter index within
/// the first slot of the pair, `other_idx` within the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlap {
  pub this_idx: usize,
  pub other_idx: usize,
}

impl Overlap {
  const fn flipped(self) -> Self {
    Self {
      this_idx: self.other_idx,
      other_idx: self.this_idx,
    }
  }
}

struct Run {
  pos: Pos,
  length: u32,
}

/// The immutable geometry of a puzzle: its slots, in canonical order, and
/// which pairs of slots cross.
#[derive(Clone, Debug)]
pub struct SlotModel {
  slots: Vec<Slot>,
  neighbors: Vec<Vec<SlotId>>,
  overlaps: HashMap<(SlotId, SlotId), Overlap>,
}

impl SlotModel {
  pub fn new(slots: impl IntoIterator<Item = Slot>) -> FillResult<Self> {
    let slots: Vec<_> = slots
      .into_iter()
      .sorted_by_key(Slot::canonical_key)
      .collect();

    if let Some(slot) = slots.iter().find(|slot| slot.length == 0) {
      return Err(FillError::Geometry(format!("Slot {slot} has zero length")).into());
    }
    if let Some(slot) = slots.iter().find(|slot| slot.pos.x < 0 || slot.pos.y < 0) {
      return Err(FillError::Geometry(format!("Slot {slot} starts outside the grid")).into());
    }
    if let Some((slot, _)) = slots.iter().tuple_windows().find(|(a, b)| a == b) {
      return Err(FillError::Geometry(format!("Slot {slot} appears twice")).into());
    }

    let mut cell_owners: HashMap<Pos, Vec<(SlotId, usize)>> = HashMap::new();
    for (id, slot) in slots.iter().enumerate() {
      for (idx, cell) in slot.cells().enumerate() {
        cell_owners.entry(cell).or_default().push((id, idx));
      }
    }

    let mut overlaps = HashMap::new();
    for owners in cell_owners.values() {
      for (&(x, x_idx), &(y, y_idx)) in owners.iter().tuple_combinations() {
        if slots[x].orientation == slots[y].orientation {
          return Err(
            FillError::Geometry(format!(
              "Slots {} and {} run over each other",
              slots[x], slots[y]
            ))
            .into(),
          );
        }
        // Crossing slots share at most one cell.
        let overlap = Overlap {
          this_idx: x_idx,
          other_idx: y_idx,
        };
        overlaps.insert((x, y), overlap);
        overlaps.insert((y, x), overlap.flipped());
      }
    }

    let neighbors: Vec<Vec<_>> = overlaps
      .keys()
      .fold(vec![Vec::new(); slots.len()], |mut neighbors, &(x, y)| {
        neighbors[x].push(y);
        neighbors
      })
      .into_iter()
      .map(|ids| ids.into_iter().sorted().collect())
      .collect();

    Ok(Self {
      slots,
      neighbors,
      overlaps,
    })
  }

  /// Derives the slots of a grid of fillable (`true`) and blocked (`false`)
  /// cells: every maximal run of at least `MIN_SLOT_LENGTH` fillable cells in
  /// a row or column.
  pub fn from_grid(grid: &Grid<bool>) -> FillResult<Self> {
    let across = Self::iterate_row_runs(grid).map(|Run { pos, length }| Slot {
      pos,
      orientation: Orientation::Across,
      length,
    });
    let down = Self::iterate_col_runs(grid).map(|Run { pos, length }| Slot {
      pos,
      orientation: Orientation::Down,
      length,
    });

    Self::new(across.chain(down).filter(|slot| slot.length >= MIN_SLOT_LENGTH))
  }

  /// Builds a grid from a layout literal, one line per row, with `_` for a
  /// fillable cell and `X` for a blocked one. Surrounding whitespace and blank
  /// lines are ignored.
  pub fn build_grid(layout: &str) -> FillResult<Grid<bool>> {
    let (width, height, board) = layout
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .try_fold(
        (None, 0, vec![]),
        |(width, height, mut board), line| -> FillResult<_> {
          board.extend(
            line
              .chars()
              .map(|c| match c {
                '_' => Ok(true),
                'X' => Ok(false),
                _ => Err(FillError::Parse(format!("Unrecognized board character '{c}'")).into()),
              })
              .collect::<FillResult<Vec<_>>>()?,
          );
          let line_width = line.chars().count();
          if let Some(width) = width {
            if line_width != width {
              return Err(
                FillError::Parse(format!("Board line lengths differ: {line_width} vs {width}"))
                  .into(),
              );
            }
          }

          Ok((Some(line_width), height + 1, board))
        },
      )?;

    let width =
      width.ok_or_else(|| FillError::Parse("Empty board string".to_owned()))? as u32;
    Grid::from_vec(board, width, height)
  }

  fn iterate_board_row_runs<'a, G: Gridlike<bool> + 'a>(
    board: G,
  ) -> impl Iterator<Item = Run> + 'a {
    struct FillableRuns<I> {
      x: u32,
      y: u32,
      iter: Option<I>,
    }

    impl<I> Iterator for FillableRuns<I>
    where
      I: Iterator<Item = bool>,
    {
      type Item = Run;

      fn next(&mut self) -> Option<Run> {
        let iter = self.iter.as_mut()?;

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => break,
            Some(false) => {}
            None => return None,
          }
        }
        let mut length = 1;
        let pos = Pos {
          x: (self.x - 1) as i32,
          y: self.y as i32,
        };

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => length += 1,
            Some(false) => break,
            None => {
              self.iter = None;
              break;
            }
          }
        }

        Some(Run { pos, length })
      }
    }

    (0..board.height()).flat_map(move |y| {
      FillableRuns {
        x: 0,
        y,
        iter: Some(board.iter_row(y).cloned()),
      }
      .collect::<Vec<_>>()
    })
  }

  fn iterate_row_runs(grid: &Grid<bool>) -> impl Iterator<Item = Run> + '_ {
    Self::iterate_board_row_runs(grid)
  }

  fn iterate_col_runs(grid: &Grid<bool>) -> impl Iterator<Item = Run> + '_ {
    Self::iterate_board_row_runs(grid.transpose()).map(|run| Run {
      pos: run.pos.transpose(),
      ..run
    })
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn ids(&self) -> Range<SlotId> {
    0..self.slots.len()
  }

  pub fn slot(&self, id: SlotId) -> &Slot {
    &self.slots[id]
  }

  pub fn slots(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
    self.slots.iter().enumerate()
  }

  /// Neighbors of `id`, in ascending id order.
  pub fn neighbors(&self, id: SlotId) -> &[SlotId] {
    &self.neighbors[id]
  }

  pub fn degree(&self, id: SlotId) -> usize {
    self.neighbors[id].len()
  }

  pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<Overlap> {
    self.overlaps.get(&(x, y)).copied()
  }

  /// Every ordered neighbor pair `(x, y)`, ascending by `x` and then `y`.
  pub fn arcs(&self) -> impl Iterator<Item = (SlotId, SlotId)> + '_ {
    self
      .ids()
      .flat_map(move |x| self.neighbors(x).iter().map(move |&y| (x, y)))
  }

  /// Smallest (width, height) containing every slot cell.
  pub fn bounds(&self) -> (u32, u32) {
    self
      .slots
      .iter()
      .flat_map(Slot::cells)
      .fold((0, 0), |(width, height), cell| {
        (width.max(cell.x as u32 + 1), height.max(cell.y as u32 + 1))
      })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::pos::Pos;

  use super::{Orientation, Overlap, Slot, SlotModel};

  #[gtest]
  fn test_empty_layout() {
    expect_that!(SlotModel::build_grid(""), err(anything()));
    expect_that!(SlotModel::build_grid("\n   \n"), err(anything()));
  }

  #[gtest]
  fn test_bad_layout() {
    expect_that!(SlotModel::build_grid("__\n_?"), err(anything()));
    expect_that!(SlotModel::build_grid("___\n_X"), err(anything()));
  }

  #[gtest]
  fn test_row_runs() {
    let grid = SlotModel::build_grid(
      "__X___
       X_____",
    )
    .unwrap();
    let runs: Vec<_> =
      SlotModel::iterate_row_runs(&grid).map(|run| (run.pos, run.length)).collect();
    expect_that!(
      runs,
      container_eq([(Pos::zero(), 2), (Pos { x: 3, y: 0 }, 3), (Pos { x: 1, y: 1 }, 5)])
    );
  }

  #[gtest]
  fn test_col_runs() {
    let grid = SlotModel::build_grid(
      "__
       X_",
    )
    .unwrap();
    let runs: Vec<_> =
      SlotModel::iterate_col_runs(&grid).map(|run| (run.pos, run.length)).collect();
    expect_that!(runs, container_eq([(Pos::zero(), 1), (Pos { x: 1, y: 0 }, 2)]));
  }

  #[gtest]
  fn test_single_cells_are_not_slots() {
    let grid = SlotModel::build_grid(
      "__
       X_",
    )
    .unwrap();
    let model = SlotModel::from_grid(&grid).unwrap();
    expect_that!(model.len(), eq(2));
    expect_that!(*model.slot(0), eq(Slot::across(0, 0, 2)));
    expect_that!(*model.slot(1), eq(Slot::down(1, 0, 2)));
    expect_that!(
      model.overlap(0, 1),
      some(eq(Overlap {
        this_idx: 1,
        other_idx: 0
      }))
    );
    expect_that!(
      model.overlap(1, 0),
      some(eq(Overlap {
        this_idx: 0,
        other_idx: 1
      }))
    );
  }

  #[gtest]
  fn test_ring_neighbors() {
    let grid = SlotModel::build_grid(
      "___
       _X_
       ___",
    )
    .unwrap();
    let model = SlotModel::from_grid(&grid).unwrap();
    expect_that!(
      model.slots().map(|(_, slot)| *slot).collect::<Vec<_>>(),
      container_eq([
        Slot::across(0, 0, 3),
        Slot::down(0, 0, 3),
        Slot::down(2, 0, 3),
        Slot::across(0, 2, 3),
      ])
    );
    expect_that!(model.neighbors(0).to_vec(), container_eq([1, 2]));
    expect_that!(model.neighbors(3).to_vec(), container_eq([1, 2]));
    expect_that!(model.degree(1), eq(2));
    expect_that!(model.overlap(0, 3), none());
    expect_that!(
      model.overlap(3, 2),
      some(eq(Overlap {
        this_idx: 2,
        other_idx: 2
      }))
    );
    expect_that!(model.bounds(), eq((3, 3)));
    expect_that!(
      model.arcs().collect::<Vec<_>>(),
      container_eq([(0, 1), (0, 2), (1, 0), (1, 3), (2, 0), (2, 3), (3, 1), (3, 2)])
    );
  }

  #[gtest]
  fn test_canonical_order() {
    let model =
      SlotModel::new([Slot::down(1, 0, 3), Slot::across(0, 1, 3), Slot::across(0, 0, 2)]).unwrap();
    expect_that!(*model.slot(0), eq(Slot::across(0, 0, 2)));
    expect_that!(*model.slot(1), eq(Slot::down(1, 0, 3)));
    expect_that!(model.slot(2).orientation, eq(Orientation::Across));
    expect_that!(model.neighbors(1).to_vec(), container_eq([0, 2]));
  }

  #[gtest]
  fn test_isolated_slot() {
    let model = SlotModel::new([Slot::across(0, 0, 3), Slot::across(0, 2, 3)]).unwrap();
    expect_that!(model.degree(0), eq(0));
    expect_that!(model.arcs().count(), eq(0));
  }

  #[gtest]
  fn test_bad_geometry() {
    expect_that!(SlotModel::new([Slot::across(0, 0, 0)]), err(anything()));
    expect_that!(SlotModel::new([Slot::down(-1, 0, 3)]), err(anything()));
    expect_that!(SlotModel::new([Slot::across(0, 0, 3), Slot::across(0, 0, 3)]), err(anything()));
    expect_that!(SlotModel::new([Slot::across(0, 0, 3), Slot::across(1, 0, 3)]), err(anything()));
  }

  #[gtest]
  fn test_repeated_slot_among_others() {
    let result =
      SlotModel::new([Slot::across(0, 0, 1), Slot::across(0, 0, 2), Slot::across(0, 0, 1)]);
    expect_that!(result, err(anything()));
  }

  #[gtest]
  fn test_parallel_slots_sharing_a_cell() {
    expect_that!(SlotModel::new([Slot::across(0, 0, 1), Slot::across(0, 0, 2)]), err(anything()));
    expect_that!(SlotModel::new([Slot::down(0, 0, 3), Slot::down(0, 2, 2)]), err(anything()));
    expect_that!(SlotModel::new([Slot::across(0, 0, 3), Slot::down(2, 0, 2)]), ok(anything()));
  }

  #[gtest]
  fn test_display() {
    expect_that!(Slot::down(4, 2, 5).to_string(), eq("2,4 down"));
  }
}
