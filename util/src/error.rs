use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum FillError {
  Internal(String),
  Geometry(String),
  Parse(String),
}

impl Display for FillError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      FillError::Internal(msg) => write!(f, "Internal error: {msg}"),
      FillError::Geometry(msg) => write!(f, "Geometry error: {msg}"),
      FillError::Parse(msg) => write!(f, "Parse error: {msg}"),
    }
  }
}

impl Error for FillError {}

pub type FillResult<T = ()> = Result<T, Box<dyn Error>>;
