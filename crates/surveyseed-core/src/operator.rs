//! Comparison operators allowed in conditional rules.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

/// The closed set of comparison operators a conditional rule may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Operator {
  #[strum(serialize = "<=")]
  LessThanOrEqual,
  #[strum(serialize = "<")]
  LessThan,
  #[strum(serialize = ">")]
  GreaterThan,
  #[strum(serialize = ">=")]
  GreaterThanOrEqual,
  #[strum(serialize = "==")]
  Equal,
  #[strum(serialize = "!=")]
  NotEqual,
}

impl Operator {
  /// Parse an operator symbol, surrounding whitespace ignored.
  pub fn parse(symbol: &str) -> Result<Self> {
    Self::from_str(symbol.trim())
      .map_err(|_| Error::UnknownOperator(symbol.to_owned()))
  }
}
