use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Layout {
  Ring,
  Square,
  Stairs,
}

#[derive(Parser, Debug)]
#[command(version, about = "Fill a crossword grid from a word list", long_about = None)]
pub struct Args {
  #[arg(long, default_value = "ring")]
  pub layout: Layout,

  /// Log solver progress. `RUST_LOG` takes precedence when set.
  #[arg(long)]
  pub verbose: bool,

  /// Candidate words for the fill.
  #[arg(required = true)]
  pub words: Vec<String>,
}
