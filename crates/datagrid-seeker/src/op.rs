//! Comparison operators for where clauses.
//!
//! The [`Op`] enum covers the operators a grid filter can hand to a query
//! backend: the SQL comparison operators plus `LIKE`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator for a where clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>` or `!=`).
    Ne,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Gte,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Lte,
    /// SQL `LIKE` with `%` and `_` wildcards.
    Like,
}

impl Op {
    /// Parses an SQL operator token.
    ///
    /// Accepts `=`, `<>`, `!=`, `>`, `>=`, `<`, `<=` and `like` (any case).
    pub fn parse(token: &str) -> Option<Op> {
        match token {
            "=" => Some(Op::Eq),
            "<>" | "!=" => Some(Op::Ne),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Gte),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Lte),
            t if t.eq_ignore_ascii_case("like") => Some(Op::Like),
            _ => None,
        }
    }

    /// Returns `true` for the ordering-based operators.
    pub fn is_comparison(self) -> bool {
        !matches!(self, Op::Like)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Like => false,
        }
    }

    /// Returns the SQL spelling of this operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "like",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::parse(s).ok_or_else(|| format!("unknown operator '{}'", s))
    }
}
