//! Filter state: the sort, page and per-field filters of one grid.
//!
//! The state travels in the URL as compact JSON so a grid view stays
//! shareable and bookmarkable:
//!
//! ```text
//! {"sort":{"field":"u.name","direction":"desc"},"page":2,"filters":{"u.city":"Lon"}}
//! ```
//!
//! An empty filter mapping always encodes as `{}`. Decoding is lenient: it
//! also accepts `[]` for the mapping, numeric strings for `page`, and
//! number or boolean filter values.

use std::collections::BTreeMap;
use std::fmt;

use datagrid_seeker::Dir;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Separates `field,,value` sections in a filter action value.
pub const SECTION_SEPARATOR: char = '|';

/// Separates the field from the value inside one section.
pub const PAIR_SEPARATOR: &str = ",,";

/// Current sort column and direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Sorted field key, or `None` when unsorted.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub direction: Dir,
}

/// Serializable sort/filter/page selection for one grid.
///
/// # Example
///
/// ```
/// use datagrid::FilterState;
/// use datagrid_seeker::Dir;
///
/// let mut state = FilterState::new();
/// state.sort("u.name");
/// state.sort("u.name");
/// state.filter("u.city,,London|u.name,,|");
///
/// assert_eq!(state.sort.direction, Dir::Desc);
/// assert_eq!(state.filters.len(), 1);
///
/// let decoded = FilterState::decode(&state.encode()).unwrap();
/// assert_eq!(decoded, state);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub sort: SortSpec,
    /// Current page, 1-based. Not clamped to the number of pages.
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: usize,
    /// Raw filter values by field key.
    #[serde(default, deserialize_with = "deserialize_filters")]
    pub filters: BTreeMap<String, String>,
}

fn first_page() -> usize {
    1
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            sort: SortSpec::default(),
            page: first_page(),
            filters: BTreeMap::new(),
        }
    }
}

impl FilterState {
    /// A fresh state: unsorted, ascending, page 1, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts on `field`.
    ///
    /// Sorting the current field again flips the direction; a new field
    /// starts ascending. Either way the grid returns to page 1.
    pub fn sort(&mut self, field: &str) {
        if self.sort.field.as_deref() == Some(field) {
            self.sort.direction = self.sort.direction.toggle();
        } else {
            self.sort.field = Some(field.to_string());
            self.sort.direction = Dir::Asc;
        }
        self.page = 1;
    }

    /// Replaces all filters from a `field,,value|field,,value` spec.
    ///
    /// Sections without a `,,` separator, with an empty field, or with an
    /// empty value are dropped. A trailing `|` is allowed.
    pub fn filter(&mut self, raw: &str) {
        self.filters = raw
            .split(SECTION_SEPARATOR)
            .filter_map(|section| section.split_once(PAIR_SEPARATOR))
            .filter(|(field, value)| !field.is_empty() && !value.is_empty())
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect();
    }

    /// Sets one filter value, keeping the others.
    pub fn add_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(field.into(), value.into());
    }

    /// Jumps to page `page`. Only the page changes.
    pub fn page(&mut self, page: usize) {
        self.page = page;
    }

    /// Resets to the fresh state.
    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// Returns the filter value for `field`, if any.
    pub fn filter_value(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    /// Returns `Some(direction)` when the grid is sorted on `field`.
    pub fn sorted_on(&self, field: &str) -> Option<Dir> {
        (self.sort.field.as_deref() == Some(field)).then_some(self.sort.direction)
    }

    /// Encodes the state as compact JSON.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "sort": {
                "field": self.sort.field,
                "direction": self.sort.direction.as_str(),
            },
            "page": self.page,
            "filters": self.filters,
        })
        .to_string()
    }

    /// Decodes a state produced by [`encode`](Self::encode) or by an older
    /// encoder.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Stable key for a grid, derived from the request path.
///
/// Grids on different pages get different keys, so their state parameters
/// never collide in shared links.
///
/// ```
/// let key = datagrid::generate_key("/reports/users");
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, datagrid::generate_key("/reports/users"));
/// assert_ne!(key, datagrid::generate_key("/reports/orders"));
/// ```
pub fn generate_key(path: &str) -> String {
    hex::encode(Sha256::digest(path.as_bytes()))
}

fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageRepr {
        Number(u64),
        Text(String),
    }

    match PageRepr::deserialize(deserializer)? {
        PageRepr::Number(n) => usize::try_from(n).map_err(de::Error::custom),
        PageRepr::Text(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| de::Error::custom(format!("invalid page number '{}'", s))),
    }
}

fn deserialize_filters<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut filters = BTreeMap::new();
    match Value::deserialize(deserializer)? {
        Value::Null => {}
        Value::Array(items) if items.is_empty() => {}
        Value::Object(map) => {
            for (field, value) in map {
                let text = match value {
                    Value::Null => continue,
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(de::Error::custom(format!(
                            "filter '{}' must be a scalar, got {}",
                            field, other
                        )))
                    }
                };
                filters.insert(field, text);
            }
        }
        other => {
            return Err(de::Error::custom(format!(
                "filters must be an object, got {}",
                other
            )))
        }
    }
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_encoding() {
        let encoded = FilterState::new().encode();
        assert!(encoded.contains(r#""filters":{}"#));
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sort": { "field": null, "direction": "asc" },
                "page": 1,
                "filters": {},
            })
        );
    }

    #[test]
    fn sort_toggles_and_resets_page() {
        let mut state = FilterState::new();
        state.page(4);
        state.sort("name");
        assert_eq!(state.sort.field.as_deref(), Some("name"));
        assert_eq!(state.sort.direction, Dir::Asc);
        assert_eq!(state.page, 1);

        state.page(3);
        state.sort("name");
        assert_eq!(state.sort.direction, Dir::Desc);
        assert_eq!(state.page, 1);

        state.sort("name");
        assert_eq!(state.sort.direction, Dir::Asc);

        state.sort("city");
        assert_eq!(state.sort.field.as_deref(), Some("city"));
        assert_eq!(state.sort.direction, Dir::Asc);
    }

    #[test]
    fn filter_replaces_and_drops_empty() {
        let mut state = FilterState::new();
        state.add_filter("old", "x");
        state.filter("u.name,,Ada|u.city,,|broken|,,orphan|u.age,,3|");

        let expected: BTreeMap<String, String> = [("u.age", "3"), ("u.name", "Ada")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(state.filters, expected);
    }

    #[test]
    fn filter_value_may_contain_commas() {
        let mut state = FilterState::new();
        state.filter("u.name,,Lovelace, Ada");
        assert_eq!(state.filter_value("u.name"), Some("Lovelace, Ada"));
    }

    #[test]
    fn empty_filter_spec_clears_filters() {
        let mut state = FilterState::new();
        state.add_filter("u.name", "Ada");
        state.filter("");
        assert!(state.filters.is_empty());
    }

    #[test]
    fn page_changes_only_page() {
        let mut state = FilterState::new();
        state.sort("name");
        state.add_filter("city", "Paris");
        let before = state.clone();

        state.page(7);
        assert_eq!(state.page, 7);
        assert_eq!(state.sort, before.sort);
        assert_eq!(state.filters, before.filters);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = FilterState::new();
        state.sort("name");
        state.sort("name");
        state.page(9);
        state.add_filter("city", "Paris");
        state.clear();
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn decode_accepts_legacy_forms() {
        let state =
            FilterState::decode(r#"{"sort":{"field":null,"direction":"asc"},"page":"3","filters":[]}"#)
                .unwrap();
        assert_eq!(state.page, 3);
        assert!(state.filters.is_empty());

        let state = FilterState::decode(
            r#"{"sort":{"field":"age","direction":"desc"},"page":1,"filters":{"age":30,"active":true,"gone":null}}"#,
        )
        .unwrap();
        assert_eq!(state.filter_value("age"), Some("30"));
        assert_eq!(state.filter_value("active"), Some("true"));
        assert_eq!(state.filter_value("gone"), None);
        assert_eq!(state.sorted_on("age"), Some(Dir::Desc));
    }

    #[test]
    fn decode_fills_missing_parts() {
        let state = FilterState::decode("{}").unwrap();
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(FilterState::decode("not json").is_err());
        assert!(FilterState::decode(r#"{"page":"two"}"#).is_err());
        assert!(FilterState::decode(r#"{"filters":["a"]}"#).is_err());
        assert!(FilterState::decode(r#"{"sort":{"direction":"up"}}"#).is_err());
        assert!(FilterState::decode(r#"{"filters":{"a":{"b":1}}}"#).is_err());
    }

    #[test]
    fn key_is_hex_sha256() {
        assert_eq!(
            generate_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
