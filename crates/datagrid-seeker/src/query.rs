//! Query builder, the backend collaborator trait, and the in-memory backend.
//!
//! [`RecordQuery`] is the seam between the grid and whatever actually stores
//! the rows (an ORM query, a SQL builder, a REST client). [`MemoryQuery`]
//! implements it over a `Vec<Record>` using [`Query`].

use crate::clause::Clause;
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{compare_by_orderings, Dir, OrderBy};
use crate::record::Record;
use crate::value::{compare_scalars, Scalar};

/// A query for filtering, ordering and paging records.
///
/// All clauses are combined with AND, the way successive `addWhere` calls
/// on an ORM query builder behave. Limit and offset are only set through
/// [`RecordQuery::set_limit`] and [`RecordQuery::set_offset`].
///
/// # Example
///
/// ```
/// use datagrid_seeker::{Dir, Query, Record};
///
/// let rows = vec![
///     Record::new().with("u_name", "Ada").with("u_age", 36i64),
///     Record::new().with("u_name", "Alan").with("u_age", 41i64),
///     Record::new().with("u_name", "Grace").with("u_age", 85i64),
/// ];
///
/// let query = Query::new()
///     .and_like("u.name", "a%")
///     .unwrap()
///     .order_by("u.age", Dir::Desc);
///
/// let results = query.filter(&rows);
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].lookup("u.name").unwrap().to_string(), "Alan");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all records.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a clause with any operator.
    ///
    /// Returns an error only when a `LIKE` pattern fails to compile.
    pub fn and(mut self, field: &str, op: Op, value: &str) -> Result<Self> {
        self.clauses.push(Clause::new(field, op, value)?);
        Ok(self)
    }

    /// Adds a `LIKE` clause.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_like(self, field: &str, pattern: &str) -> Result<Self> {
        self.and(field, Op::Like, pattern)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Adds an ordering clause.
    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the where clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Filters a slice, returning references to matching records.
    ///
    /// Results are sorted according to the query's ordering clauses,
    /// then offset and limit are applied.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut results: Vec<&'a Record> = records.iter().filter(|r| self.matches(r)).collect();

        if !self.orderings.is_empty() {
            // Stable sort keeps backend order for ties.
            results.sort_by(|a, b| compare_by_orderings(a, b, &self.orderings));
        }

        let offset = self.offset.unwrap_or(0);
        if offset > 0 {
            if offset >= results.len() {
                return Vec::new();
            }
            results.drain(..offset);
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        results
    }

    /// Counts matching records, ignoring limit and offset.
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.matches(r)).count()
    }
}

/// The query collaborator a grid drives.
///
/// This mirrors the small slice of an ORM query builder the grid needs:
/// ordering, where clauses, paging, counting, execution, and the distinct
/// values of one field for select-style filter controls.
pub trait RecordQuery {
    /// Appends an ordering on `field`.
    fn add_order_by(&mut self, field: &str, dir: Dir);

    /// Appends a where clause. Multiple clauses are combined with AND.
    fn add_where(&mut self, field: &str, op: Op, value: &str) -> Result<()>;

    /// Limits the rows returned by [`execute`](Self::execute).
    fn set_limit(&mut self, limit: usize);

    /// Skips rows before returning from [`execute`](Self::execute).
    fn set_offset(&mut self, offset: usize);

    /// Counts matching rows, ignoring limit and offset.
    fn count(&self) -> Result<usize>;

    /// Runs the query and hydrates the resulting rows.
    fn execute(&self) -> Result<Vec<Record>>;

    /// Distinct non-null values of `field` among matching rows, ascending.
    ///
    /// Ordering, limit and offset of the query are ignored.
    fn distinct(&self, field: &str) -> Result<Vec<Scalar>>;
}

/// In-memory [`RecordQuery`] backend over owned records.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    records: Vec<Record>,
    query: Query,
}

impl MemoryQuery {
    /// Creates a backend over `records` with an empty query.
    pub fn new(records: Vec<Record>) -> Self {
        MemoryQuery {
            records,
            query: Query::new(),
        }
    }

    /// Returns the query accumulated so far.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns all backing records, unfiltered.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl RecordQuery for MemoryQuery {
    fn add_order_by(&mut self, field: &str, dir: Dir) {
        tracing::trace!(field, dir = dir.as_str(), "order by");
        self.query.orderings.push(OrderBy::new(field, dir));
    }

    fn add_where(&mut self, field: &str, op: Op, value: &str) -> Result<()> {
        tracing::trace!(field, op = op.as_sql(), value, "where");
        self.query.clauses.push(Clause::new(field, op, value)?);
        Ok(())
    }

    fn set_limit(&mut self, limit: usize) {
        self.query.limit = Some(limit);
    }

    fn set_offset(&mut self, offset: usize) {
        self.query.offset = Some(offset);
    }

    fn count(&self) -> Result<usize> {
        Ok(self.query.count(&self.records))
    }

    fn execute(&self) -> Result<Vec<Record>> {
        Ok(self.query.filter(&self.records).into_iter().cloned().collect())
    }

    fn distinct(&self, field: &str) -> Result<Vec<Scalar>> {
        let mut values: Vec<Scalar> = Vec::new();
        for record in self.records.iter().filter(|r| self.query.matches(r)) {
            match record.lookup(field) {
                Some(Scalar::Null) | None => {}
                Some(v) if values.contains(v) => {}
                Some(v) => values.push(v.clone()),
            }
        }
        values.sort_by(compare_scalars);
        Ok(values)
    }
}
