//! Seeker - record model and query collaborators for datagrid.
//!
//! Seeker holds the pieces a grid needs from a data source:
//!
//! - [`Record`] and [`Scalar`]: hydrated rows in the scalar wire format
//! - [`Op`] and [`LikePattern`]: the comparison operators a filter can emit
//! - [`Dir`] and [`OrderBy`]: ordering
//! - [`RecordQuery`]: the ORM-like collaborator trait the grid drives
//! - [`MemoryQuery`]: an in-memory implementation over `Vec<Record>`
//!
//! # Quick Start
//!
//! ```rust
//! use datagrid_seeker::{Dir, MemoryQuery, Op, Record, RecordQuery};
//!
//! let rows = vec![
//!     Record::new().with("u_name", "Ada").with("u_age", 36i64),
//!     Record::new().with("u_name", "Grace").with("u_age", 85i64),
//! ];
//!
//! let mut query = MemoryQuery::new(rows);
//! query.add_where("u.age", Op::Gt, "40").unwrap();
//! query.add_order_by("u.name", Dir::Asc);
//!
//! assert_eq!(query.count().unwrap(), 1);
//! let found = query.execute().unwrap();
//! assert_eq!(found[0].lookup("u.name").unwrap().to_string(), "Grace");
//! ```
//!
//! # Field paths
//!
//! Clauses and orderings address fields by query path (`u.name`). Records
//! store hydrated column names (`u_name`); [`column_key`] maps one to the
//! other and [`Record::lookup`] accepts either.

mod clause;
mod error;
mod like;
mod op;
mod ordering;
mod query;
mod record;
mod value;

pub use clause::Clause;
pub use error::{Result, SeekerError};
pub use like::LikePattern;
pub use op::Op;
pub use ordering::{compare_by_orderings, Dir, OrderBy};
pub use query::{MemoryQuery, Query, RecordQuery};
pub use record::{column_key, Record};
pub use value::{compare_scalars, Number, Scalar};
