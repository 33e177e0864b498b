//! Loading grid rows from CSV.

use std::path::Path;

use anyhow::{Context, Result};
use datagrid::FieldMapper;
use datagrid_seeker::{column_key, Record, Scalar};

use crate::cli::ColumnArg;

/// A CSV file read into hydrated records.
#[derive(Debug)]
pub struct Table {
    /// Field paths from the header row.
    pub fields: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn load(path: &Path) -> Result<Table> {
        let reader = csv::Reader::from_path(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        Self::read(reader).with_context(|| format!("cannot read rows from {}", path.display()))
    }

    pub fn read<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
        let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record: Record = fields
                .iter()
                .zip(row.iter())
                .map(|(field, raw)| (column_key(field).into_owned(), Scalar::infer(raw)))
                .collect();
            records.push(record);
        }
        tracing::debug!(columns = fields.len(), rows = records.len(), "loaded rows");
        Ok(Table { fields, records })
    }

    /// Mapper for the requested columns, or every CSV column when none are
    /// given.
    pub fn mapper(&self, columns: &[ColumnArg]) -> FieldMapper {
        let mut mapper = FieldMapper::new();
        if columns.is_empty() {
            for field in &self.fields {
                mapper.add_mapping(header_for(field), field.as_str(), "contains");
            }
        } else {
            for column in columns {
                mapper.add_mapping(
                    column.header.as_str(),
                    column.field.as_str(),
                    column.rule.as_str(),
                );
            }
        }
        mapper
    }
}

/// `u.first_name` to `First name`.
fn header_for(field: &str) -> String {
    let name = field.rsplit('.').next().unwrap_or(field).replace('_', " ");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
