//! Delimited (CSV) export.
//!
//! Every field is quoted, fields are separated by `,` and rows by CRLF. The
//! last row carries no terminator, so the output of an empty grid is just
//! the header line.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::RenderError;

/// Writes a header row followed by data rows.
///
/// Embedded quotes are doubled, as RFC 4180 requires.
///
/// # Example
///
/// ```
/// use datagrid_render::write_csv;
///
/// let out = write_csv(
///     &["Name", "City"],
///     vec![vec!["Ada".to_string(), "London".to_string()]],
/// )
/// .unwrap();
/// assert_eq!(out, "\"Name\",\"City\"\r\n\"Ada\",\"London\"");
/// ```
pub fn write_csv<H, I, R, S>(headers: &[H], rows: I) -> Result<String, RenderError>
where
    H: AsRef<str>,
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(vec![]);

    wtr.write_record(headers.iter().map(|h| h.as_ref().as_bytes()))?;
    for row in rows {
        let fields: Vec<S> = row.into_iter().collect();
        wtr.write_record(fields.iter().map(|f| f.as_ref().as_bytes()))?;
    }

    let bytes = wtr.into_inner()?;
    let mut out = String::from_utf8(bytes)?;
    if out.ends_with("\r\n") {
        out.truncate(out.len() - 2);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(write_csv(&["A", "B"], rows).unwrap(), "\"A\",\"B\"");
    }

    #[test]
    fn rows_joined_by_crlf() {
        let out = write_csv(
            &["n"],
            vec![vec!["1"], vec!["2"], vec!["3"]],
        )
        .unwrap();
        assert_eq!(out, "\"n\"\r\n\"1\"\r\n\"2\"\r\n\"3\"");
    }

    #[test]
    fn quotes_are_doubled() {
        let out = write_csv(&["q"], vec![vec!["say \"hi\", then go"]]).unwrap();
        assert_eq!(out, "\"q\"\r\n\"say \"\"hi\"\", then go\"");
    }

    #[test]
    fn empty_values_stay_quoted() {
        let out = write_csv(&["a", "b"], vec![vec!["", "x"]]).unwrap();
        assert_eq!(out, "\"a\",\"b\"\r\n\"\",\"x\"");
    }
}
