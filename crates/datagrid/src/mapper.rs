//! Field mapping: which columns a grid shows and how each is filtered.
//!
//! A [`FieldMapper`] is an ordered registry of [`FieldSpec`]s. A column
//! either reads a record attribute directly or calls a named
//! [`Computation`] with a parameter list. String parameters that name a
//! record column are replaced by that row's value before the call.
//!
//! Each direct column carries a [`MatchRule`] that turns a raw filter value
//! into a where clause:
//!
//! | Rule                     | Operator | Value     |
//! |--------------------------|----------|-----------|
//! | `equal`, `select`        | `=`      | `v`       |
//! | `contains`, `like`       | `like`   | `%v%`     |
//! | `startsWith`, `rlike`    | `like`   | `v%`      |
//! | `endsWith`, `llike`      | `like`   | `%v`      |
//! | `=` `>=` `>` `<>` `!=` `<=` `<` | as given | `v` |
//! | anything else            | none     | `v`       |

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use datagrid_seeker::{column_key, Op, Record, Scalar};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Errors raised by [`FieldMapper`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    /// The key was never registered with the mapper.
    #[error("undefined field '{0}'")]
    UndefinedField(String),
}

/// How a raw filter value becomes a where clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Exact match.
    Equal,
    /// Exact match, offered as a drop-down of existing values.
    Select,
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// A raw comparison operator applied to the value as typed.
    Compare(Op),
    /// The column cannot be filtered.
    None,
}

impl MatchRule {
    /// Parses a rule name. Unknown names yield [`MatchRule::None`].
    pub fn parse(name: &str) -> MatchRule {
        match name {
            "equal" => MatchRule::Equal,
            "select" => MatchRule::Select,
            "contains" | "like" => MatchRule::Contains,
            "startsWith" | "rlike" => MatchRule::StartsWith,
            "endsWith" | "llike" => MatchRule::EndsWith,
            other => match Op::parse(other) {
                Some(op) if op.is_comparison() => MatchRule::Compare(op),
                _ => MatchRule::None,
            },
        }
    }

    /// Returns `true` unless this is [`MatchRule::None`].
    pub fn is_filterable(self) -> bool {
        self != MatchRule::None
    }

    /// Applies the rule to a raw value.
    pub fn pattern(self, value: &str) -> SearchPattern {
        let (op, value) = match self {
            MatchRule::Equal | MatchRule::Select => (Some(Op::Eq), value.to_string()),
            MatchRule::Contains => (Some(Op::Like), format!("%{}%", value)),
            MatchRule::StartsWith => (Some(Op::Like), format!("{}%", value)),
            MatchRule::EndsWith => (Some(Op::Like), format!("%{}", value)),
            MatchRule::Compare(op) => (Some(op), value.to_string()),
            MatchRule::None => (None, value.to_string()),
        };
        SearchPattern { op, value }
    }
}

impl From<&str> for MatchRule {
    fn from(name: &str) -> Self {
        MatchRule::parse(name)
    }
}

impl From<Op> for MatchRule {
    fn from(op: Op) -> Self {
        match op {
            Op::Like => MatchRule::Contains,
            op => MatchRule::Compare(op),
        }
    }
}

/// Operator and transformed value for one filter.
///
/// `op` is `None` when the field cannot be filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    pub op: Option<Op>,
    pub value: String,
}

impl SearchPattern {
    pub fn is_filterable(&self) -> bool {
        self.op.is_some()
    }
}

/// Kind of filter input the HTML view offers for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterControl {
    /// No filter.
    NA,
    /// Drop-down of the column's distinct values.
    Select,
    /// Free text.
    Input,
}

impl FilterControl {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterControl::NA => "NA",
            FilterControl::Select => "Select",
            FilterControl::Input => "Input",
        }
    }
}

/// A named function computing a column value from its parameters.
///
/// The name is part of the column's identity: two computations with the
/// same name and parameters are treated as the same column and share
/// cached results.
#[derive(Clone)]
pub struct Computation {
    name: String,
    func: Rc<dyn Fn(&[Scalar]) -> Scalar>,
}

impl Computation {
    pub fn new(name: impl Into<String>, func: impl Fn(&[Scalar]) -> Scalar + 'static) -> Self {
        Computation {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Scalar]) -> Scalar {
        (self.func)(args)
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation").field("name", &self.name).finish()
    }
}

/// Where a column's value comes from.
#[derive(Debug, Clone)]
pub enum ValueSource {
    /// A record attribute, addressed by query path (`u.name`).
    Direct(String),
    /// A computation over literal and record-bound parameters.
    Computed {
        computation: Computation,
        params: Vec<Scalar>,
    },
}

/// One registered column.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field path for direct columns, content hash for computed ones.
    pub key: String,
    pub header: String,
    pub rule: MatchRule,
    pub source: ValueSource,
}

impl FieldSpec {
    pub fn is_computed(&self) -> bool {
        matches!(self.source, ValueSource::Computed { .. })
    }
}

/// Identity hash of a computation call.
///
/// Used both as the key of a computed column (over its declared
/// parameters) and as the cache key of a result (over the resolved ones).
pub fn computation_key(name: &str, params: &[Scalar]) -> String {
    let identity = serde_json::json!([name, params]).to_string();
    hex::encode(Sha256::digest(identity.as_bytes()))
}

/// Ordered registry of grid columns.
///
/// Computed values are cached per mapper under the hash of the computation
/// name and its resolved arguments, so identical calls run once for the
/// mapper's lifetime. The cache uses interior mutability: a mapper belongs
/// to one request and is not `Sync`.
///
/// # Example
///
/// ```
/// use datagrid::{Computation, FieldMapper};
/// use datagrid_seeker::{Op, Record, Scalar};
///
/// let mut mapper = FieldMapper::new();
/// mapper
///     .add_mapping("Name", "u.name", "contains")
///     .add_mapping_method(
///         "Greeting",
///         Computation::new("greet", |args| format!("Hello, {}", args[0]).into()),
///         vec![Scalar::from("u.name")],
///     );
///
/// let row = Record::new().with("u_name", "Ada");
/// let keys: Vec<String> = mapper.keys().map(str::to_string).collect();
/// assert_eq!(mapper.value(&row, "u.name").unwrap(), Scalar::from("Ada"));
/// assert_eq!(mapper.value(&row, &keys[1]).unwrap(), Scalar::from("Hello, Ada"));
///
/// let pattern = mapper.search_pattern("u.name", "da");
/// assert_eq!(pattern.op, Some(Op::Like));
/// assert_eq!(pattern.value, "%da%");
/// ```
#[derive(Debug, Default)]
pub struct FieldMapper {
    fields: Vec<FieldSpec>,
    cache: RefCell<HashMap<String, Scalar>>,
    computed_calls: Cell<usize>,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a direct column keyed by its field path.
    pub fn add_mapping(
        &mut self,
        header: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<MatchRule>,
    ) -> &mut Self {
        let field = field.into();
        self.register(FieldSpec {
            key: field.clone(),
            header: header.into(),
            rule: rule.into(),
            source: ValueSource::Direct(field),
        })
    }

    /// Registers a computed column. Computed columns are never filterable.
    pub fn add_mapping_method(
        &mut self,
        header: impl Into<String>,
        computation: Computation,
        params: Vec<Scalar>,
    ) -> &mut Self {
        let key = computation_key(computation.name(), &params);
        self.register(FieldSpec {
            key,
            header: header.into(),
            rule: MatchRule::None,
            source: ValueSource::Computed {
                computation,
                params,
            },
        })
    }

    fn register(&mut self, spec: FieldSpec) -> &mut Self {
        tracing::trace!(key = %spec.key, header = %spec.header, "register column");
        match self.fields.iter_mut().find(|f| f.key == spec.key) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    /// Looks up a column by key.
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Columns in registration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Column keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// `(key, header)` pairs in registration order.
    pub fn headers(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.key.as_str(), f.header.as_str()))
            .collect()
    }

    /// Match rule of a column, if registered.
    pub fn rule(&self, key: &str) -> Option<MatchRule> {
        self.field(key).map(|f| f.rule)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of column `key` for one record.
    ///
    /// Direct columns read the hydrated attribute and yield `Null` when the
    /// record lacks it. Computed columns substitute record values for
    /// parameters naming a column, then run the computation unless an
    /// identical call is cached.
    pub fn value(&self, record: &Record, key: &str) -> Result<Scalar, MapperError> {
        let spec = self
            .field(key)
            .ok_or_else(|| MapperError::UndefinedField(key.to_string()))?;

        match &spec.source {
            ValueSource::Direct(field) => Ok(record.lookup(field).cloned().unwrap_or_default()),
            ValueSource::Computed {
                computation,
                params,
            } => {
                let args: Vec<Scalar> = params.iter().map(|p| resolve_param(record, p)).collect();
                let hash = computation_key(computation.name(), &args);

                if let Some(hit) = self.cache.borrow().get(&hash) {
                    return Ok(hit.clone());
                }

                let value = computation.call(&args);
                self.computed_calls.set(self.computed_calls.get() + 1);
                self.cache.borrow_mut().insert(hash, value.clone());
                Ok(value)
            }
        }
    }

    /// Display text of column `key` for one record.
    pub fn display(&self, record: &Record, key: &str) -> Result<String, MapperError> {
        self.value(record, key).map(|v| v.to_string())
    }

    /// Number of computations actually invoked so far.
    pub fn computed_calls(&self) -> usize {
        self.computed_calls.get()
    }

    /// Turns a raw filter value into an operator and value.
    ///
    /// Unregistered fields are not filterable; this is not an error.
    pub fn search_pattern(&self, field: &str, value: &str) -> SearchPattern {
        self.rule(field)
            .unwrap_or(MatchRule::None)
            .pattern(value)
    }

    /// Filter control the HTML view renders for column `key`.
    pub fn filter_control(&self, key: &str) -> FilterControl {
        match self.rule(key) {
            Some(MatchRule::Select) => FilterControl::Select,
            Some(rule) if rule.is_filterable() => FilterControl::Input,
            _ => FilterControl::NA,
        }
    }
}

fn resolve_param(record: &Record, param: &Scalar) -> Scalar {
    match param {
        Scalar::String(name) => record
            .get(column_key(name).as_ref())
            .cloned()
            .unwrap_or_else(|| param.clone()),
        other => other.clone(),
    }
}
