//! Command-line arguments for `gridview`.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "gridview",
    version,
    about = "Serve one grid request against rows loaded from a CSV file",
    long_about = "Loads rows from a CSV file whose headers are field paths (u.name),\n\
                  replays a request URI against a datagrid and prints either the\n\
                  redirect it answers with or the rendered response."
)]
pub struct Cli {
    /// CSV file with one header row of field paths.
    #[arg(value_name = "ROWS")]
    pub rows: PathBuf,

    /// Request to replay, as `path?query`.
    #[arg(long, default_value = "/")]
    pub uri: String,

    /// YAML grid configuration.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Column as `Header=field:rule` (repeatable). Defaults to every CSV
    /// column with the `contains` rule.
    #[arg(long = "column", short = 'c', value_name = "SPEC")]
    pub columns: Vec<ColumnArg>,

    /// Follow a redirect once and render the resulting grid.
    #[arg(long, short = 'f')]
    pub follow: bool,

    /// Write the response body here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// One `--column` specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnArg {
    pub header: String,
    pub field: String,
    pub rule: String,
}

impl FromStr for ColumnArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (header, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected Header=field[:rule], got '{}'", s))?;
        let (field, rule) = rest.split_once(':').unwrap_or((rest, "contains"));
        if header.is_empty() || field.is_empty() {
            return Err(format!("header and field must not be empty in '{}'", s));
        }
        Ok(ColumnArg {
            header: header.to_string(),
            field: field.to_string(),
            rule: rule.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_spec_parsing() {
        assert_eq!(
            "Age=u.age:>=".parse::<ColumnArg>().unwrap(),
            ColumnArg {
                header: "Age".into(),
                field: "u.age".into(),
                rule: ">=".into()
            }
        );
        assert_eq!("Name=u.name".parse::<ColumnArg>().unwrap().rule, "contains");
        assert!("u.name".parse::<ColumnArg>().is_err());
        assert!("=u.name".parse::<ColumnArg>().is_err());
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "gridview",
            "people.csv",
            "--uri",
            "/people?type=csv",
            "-c",
            "City=u.city:select",
            "-vv",
            "--follow",
        ])
        .unwrap();
        assert_eq!(cli.rows, PathBuf::from("people.csv"));
        assert_eq!(cli.columns.len(), 1);
        assert_eq!(cli.verbose, 2);
        assert!(cli.follow);
    }
}
