#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;

use std::process::ExitCode;

use args::{Args, Layout};
use clap::Parser;
use env_logger::Env;
use log::info;
use util::{error::FillResult, time::time_fn};
use xword_fill::{
  slot::SlotModel,
  solver::{SolveOutcome, Solver},
};

/// Printed for cells no slot covers.
const BLOCKED_TILE: char = '#';

const fn ring() -> &'static str {
  "___
   _X_
   ___"
}

const fn square() -> &'static str {
  "___
   ___
   ___"
}

const fn stairs() -> &'static str {
  "___XX
   _X___
   ___X_
   XX___"
}

fn layout(layout: Layout) -> &'static str {
  match layout {
    Layout::Ring => ring(),
    Layout::Square => square(),
    Layout::Stairs => stairs(),
  }
}

fn main() -> FillResult<ExitCode> {
  let args = Args::parse();
  env_logger::Builder::from_env(
    Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
  )
  .init();

  let grid = SlotModel::build_grid(layout(args.layout))?;
  let solver = Solver::from_grid(&grid, &args.words)?;

  let (time, outcome) = time_fn(|| solver.solve());

  match outcome {
    SolveOutcome::Solved(assignment) => {
      let letter_grid = assignment.letter_grid(solver.model(), solver.bank())?;
      print!("{}", letter_grid.map(|tile| tile.unwrap_or(BLOCKED_TILE)));
      println!();
      for (slot, word) in assignment.words(solver.bank()) {
        println!("{} {word}", solver.model().slot(slot));
      }
      println!("Took {}s", time.as_secs_f32());
      Ok(ExitCode::SUCCESS)
    }
    SolveOutcome::Unsatisfiable(reason) => {
      info!("Unsatisfiable: {reason}");
      println!("No solution.");
      Ok(ExitCode::FAILURE)
    }
  }
}
