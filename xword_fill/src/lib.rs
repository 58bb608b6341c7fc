#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod arc_consistency;
pub mod assignment;
pub mod domain;
pub mod search;
pub mod slot;
pub mod solver;
pub mod word_bank;
