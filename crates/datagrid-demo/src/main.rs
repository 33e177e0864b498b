//! `gridview`: replays one request against a datagrid over CSV rows.
//!
//! ```text
//! gridview people.csv --uri '/people?grid_action=sort&grid_value=u.age' --follow
//! ```

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use datagrid::{Dispatch, Grid, GridConfig, GridRequest, GridResponse, OutputFormat};
use datagrid_seeker::MemoryQuery;

mod cli;
mod logging;
mod rows;

use crate::cli::{Cli, ColumnArg};
use crate::rows::Table;

/// What a replayed request produced.
#[derive(Debug)]
enum Outcome {
    Redirect(String),
    Response(GridResponse),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let table = Table::load(&cli.rows)?;
    let config = match &cli.config {
        Some(path) => GridConfig::from_file(path)
            .with_context(|| format!("invalid grid config {}", path.display()))?,
        None => GridConfig::new()
            .export(OutputFormat::Csv)
            .export(OutputFormat::Pdf),
    };

    let outcome = serve(&table, &config, &cli.columns, &cli.uri, cli.follow)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match outcome {
        Outcome::Redirect(location) => {
            writeln!(out, "Status: 302 Found")?;
            writeln!(out, "Location: {}", location)?;
        }
        Outcome::Response(response) => {
            for (name, value) in response.header_lines() {
                writeln!(out, "{}: {}", name, value)?;
            }
            match &cli.output {
                Some(path) => write_body(path, &response.body)?,
                None => {
                    writeln!(out)?;
                    out.write_all(&response.body)?;
                    writeln!(out)?;
                }
            }
        }
    }
    Ok(())
}

/// Handles `uri`, following at most one redirect when `follow` is set.
fn serve(
    table: &Table,
    config: &GridConfig,
    columns: &[ColumnArg],
    uri: &str,
    follow: bool,
) -> Result<Outcome> {
    let mut uri = uri.to_string();
    let mut followed = false;
    loop {
        let request = GridRequest::from_uri(&uri)?;
        match Grid::from_request(config.clone(), table.mapper(columns), request)? {
            Dispatch::Redirect(redirect) if follow && !followed => {
                tracing::info!(location = redirect.location(), "following redirect");
                uri = redirect.location().to_string();
                followed = true;
            }
            Dispatch::Redirect(redirect) => {
                return Ok(Outcome::Redirect(redirect.location().to_string()))
            }
            Dispatch::Render(grid) => {
                let mut query = MemoryQuery::new(table.records.clone());
                let response = grid.generate(&mut query)?;
                tracing::info!(
                    format = %grid.format(),
                    bytes = response.body.len(),
                    "rendered grid"
                );
                return Ok(Outcome::Response(response));
            }
        }
    }
}

fn write_body(path: &Path, body: &[u8]) -> Result<()> {
    std::fs::write(path, body).with_context(|| format!("cannot write {}", path.display()))
}
