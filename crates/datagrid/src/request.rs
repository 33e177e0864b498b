//! The inbound request as the grid sees it: a path and its query pairs.

use crate::error::GridError;

/// Path and decoded query parameters of the current request.
///
/// Parameter order is preserved. When a name repeats, [`get`](Self::get)
/// returns the last occurrence.
///
/// ```
/// use datagrid::GridRequest;
///
/// let request = GridRequest::from_uri("/users?grid_action=sort&grid_value=u.name").unwrap();
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.get("grid_value"), Some("u.name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRequest {
    path: String,
    query_string: String,
    params: Vec<(String, String)>,
}

impl GridRequest {
    /// A request for `path` without parameters.
    pub fn new(path: impl Into<String>) -> Self {
        GridRequest {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Parses a raw query string (without the leading `?`).
    pub fn parse(path: impl Into<String>, query_string: &str) -> Result<Self, GridError> {
        let params: Vec<(String, String)> = serde_urlencoded::from_str(query_string)?;
        Ok(GridRequest {
            path: path.into(),
            query_string: query_string.to_string(),
            params,
        })
    }

    /// Parses `path?query`.
    pub fn from_uri(uri: &str) -> Result<Self, GridError> {
        match uri.split_once('?') {
            Some((path, query)) => Self::parse(path, query),
            None => Ok(Self::new(uri)),
        }
    }

    /// Adds a parameter, builder style.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self.query_string = encode_pairs(&self.params).unwrap_or_default();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string as received.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of parameter `name`; the last one wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// URL of the current path with modified parameters.
    ///
    /// Parameters named in `remove` are dropped, then each pair in `set`
    /// replaces the existing value (keeping its position) or is appended.
    pub fn url_with(&self, remove: &[&str], set: &[(&str, &str)]) -> Result<String, GridError> {
        let mut params: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(n, _)| !remove.contains(&n.as_str()))
            .cloned()
            .collect();

        for (name, value) in set {
            replace_param(&mut params, name, value);
        }
        build_url(&self.path, &params)
    }
}

/// Sets `name` to `value` in place, dropping later duplicates.
pub(crate) fn replace_param(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    match params.iter().position(|(n, _)| n == name) {
        Some(pos) => {
            params[pos].1 = value.to_string();
            let mut seen = false;
            params.retain(|(n, _)| {
                if n != name {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => params.push((name.to_string(), value.to_string())),
    }
}

pub(crate) fn build_url(path: &str, params: &[(String, String)]) -> Result<String, GridError> {
    if params.is_empty() {
        return Ok(path.to_string());
    }
    Ok(format!("{}?{}", path, encode_pairs(params)?))
}

fn encode_pairs(params: &[(String, String)]) -> Result<String, GridError> {
    Ok(serde_urlencoded::to_string(params)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_decodes() {
        let request = GridRequest::parse("/users", "grid=%7B%7D&q=a+b&q=c").unwrap();
        assert_eq!(request.get("grid"), Some("{}"));
        assert_eq!(request.get("q"), Some("c"));
        assert_eq!(request.params().len(), 3);
        assert_eq!(request.query_string(), "grid=%7B%7D&q=a+b&q=c");
    }

    #[test]
    fn uri_without_query() {
        let request = GridRequest::from_uri("/users").unwrap();
        assert_eq!(request.path(), "/users");
        assert!(request.params().is_empty());
        assert_eq!(request.url_with(&[], &[]).unwrap(), "/users");
    }

    #[test]
    fn url_with_replaces_in_place() {
        let request = GridRequest::from_uri("/u?a=1&grid=x&b=2&grid=y").unwrap();
        let url = request.url_with(&["b"], &[("grid", "z"), ("c", "3")]).unwrap();
        assert_eq!(url, "/u?a=1&grid=z&c=3");
    }

    #[test]
    fn with_param_updates_query_string() {
        let request = GridRequest::new("/u").with_param("type", "csv");
        assert_eq!(request.query_string(), "type=csv");
        assert_eq!(request.get("type"), Some("csv"));
    }
}
