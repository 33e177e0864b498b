//! Where clauses.
//!
//! A [`Clause`] is a single predicate: a field path, an operator and the
//! raw comparison text as it arrived from the filter state.

use crate::error::Result;
use crate::like::LikePattern;
use crate::op::Op;
use crate::record::Record;
use crate::value::{compare_scalars, Scalar};

/// A single filter predicate.
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field path to compare (`u.name` or a column name).
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: String,
    pattern: Option<LikePattern>,
}

impl Clause {
    /// Creates a new clause, compiling the pattern for `LIKE`.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let pattern = match op {
            Op::Like => Some(LikePattern::new(&value)?),
            _ => None,
        };
        Ok(Clause {
            field: field.into(),
            op,
            value,
            pattern,
        })
    }

    /// Evaluates this clause against a record.
    ///
    /// A missing or null column never matches, as with SQL `NULL`.
    pub fn matches(&self, record: &Record) -> bool {
        let field_value = match record.lookup(&self.field) {
            Some(Scalar::Null) | None => return false,
            Some(v) => v,
        };

        match &self.pattern {
            Some(pattern) => pattern.is_match(&field_value.to_string()),
            None => {
                let clause_value = Scalar::String(self.value.clone());
                let ordering = match field_value {
                    Scalar::Bool(b) => match self.value.as_str() {
                        "1" | "true" => b.cmp(&true),
                        "0" | "false" => b.cmp(&false),
                        _ => return self.op == Op::Ne,
                    },
                    other => compare_scalars(other, &clause_value),
                };
                self.op.eval_ordering(ordering)
            }
        }
    }
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.op == other.op && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Record {
        Record::new()
            .with("u_name", "Ada Lovelace")
            .with("u_age", 36i64)
            .with("u_active", true)
            .with("u_notes", Scalar::Null)
    }

    #[test]
    fn string_equality_is_exact() {
        assert!(Clause::new("u.name", Op::Eq, "Ada Lovelace").unwrap().matches(&row()));
        assert!(!Clause::new("u.name", Op::Eq, "ada lovelace").unwrap().matches(&row()));
    }

    #[test]
    fn like_is_case_insensitive() {
        assert!(Clause::new("u.name", Op::Like, "%love%").unwrap().matches(&row()));
        assert!(!Clause::new("u.name", Op::Like, "love%").unwrap().matches(&row()));
    }

    #[test]
    fn numeric_comparisons_parse_clause_text() {
        assert!(Clause::new("u.age", Op::Gte, "36").unwrap().matches(&row()));
        assert!(Clause::new("u.age", Op::Gt, "4").unwrap().matches(&row()));
        assert!(!Clause::new("u.age", Op::Lt, "36").unwrap().matches(&row()));
        assert!(Clause::new("u.age", Op::Ne, "35").unwrap().matches(&row()));
    }

    #[test]
    fn bool_columns_accept_flags() {
        assert!(Clause::new("u.active", Op::Eq, "1").unwrap().matches(&row()));
        assert!(Clause::new("u.active", Op::Eq, "true").unwrap().matches(&row()));
        assert!(!Clause::new("u.active", Op::Eq, "0").unwrap().matches(&row()));
    }

    #[test]
    fn null_never_matches() {
        assert!(!Clause::new("u.notes", Op::Ne, "x").unwrap().matches(&row()));
        assert!(!Clause::new("u.missing", Op::Like, "%").unwrap().matches(&row()));
    }
}
