//! Grid configuration.
//!
//! [`GridConfig`] is a plain struct: set fields directly, chain the builder
//! methods, or load it from YAML:
//!
//! ```yaml
//! page_limit: 20
//! export_types: [csv, pdf]
//! title: Users
//! subtitle: Active accounts
//! params:
//!   state: users
//! ```
//!
//! Missing keys take their defaults, unknown keys are rejected.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::view::OutputFormat;

/// The grid template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/grid.html.j2");

/// Rows per HTML page unless configured otherwise.
pub const DEFAULT_PAGE_LIMIT: usize = 5;

/// Errors in grid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid grid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page_limit must be at least 1")]
    InvalidPageLimit,

    #[error("set either template or template_file, not both")]
    ConflictingTemplates,

    #[error("parameter name for '{0}' is empty")]
    EmptyParam(&'static str),

    #[error("parameter name '{0}' is used more than once")]
    DuplicateParam(String),
}

/// Names of the query parameters a grid reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamNames {
    /// Carries the encoded filter state.
    pub state: String,
    /// Names the action to apply.
    pub action: String,
    /// Carries the action's argument.
    pub value: String,
    /// Selects the output format.
    pub format: String,
}

impl Default for ParamNames {
    fn default() -> Self {
        ParamNames {
            state: "grid".into(),
            action: "grid_action".into(),
            value: "grid_value".into(),
            format: "type".into(),
        }
    }
}

impl ParamNames {
    /// Prefix of per-field filter inputs (`grid_value:u.name=Ada`).
    pub fn filter_input(&self, field: &str) -> String {
        format!("{}:{}", self.value, field)
    }

    /// Returns the field of a per-field filter input name.
    pub fn filter_field<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.value.as_str())?.strip_prefix(':')
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("state", &self.state),
            ("action", &self.action),
            ("value", &self.value),
            ("format", &self.format),
        ];
        for (i, (role, name)) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::EmptyParam(*role));
            }
            if names[..i].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::DuplicateParam(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Configuration of one grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Grid key; derived from the request path when unset.
    pub key: Option<String>,
    /// Rows per HTML page.
    pub page_limit: usize,
    /// Formats offered as export links.
    pub export_types: Vec<OutputFormat>,
    /// Inline template source for the HTML view.
    pub template: Option<String>,
    /// Template file for the HTML view.
    pub template_file: Option<PathBuf>,
    /// PDF title.
    pub title: String,
    /// PDF subtitle.
    pub subtitle: String,
    pub params: ParamNames,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            key: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            export_types: Vec::new(),
            template: None,
            template_file: None,
            title: String::new(),
            subtitle: String::new(),
            params: ParamNames::default(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Checks the invariants the builder methods cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 {
            return Err(ConfigError::InvalidPageLimit);
        }
        if self.template.is_some() && self.template_file.is_some() {
            return Err(ConfigError::ConflictingTemplates);
        }
        self.params.validate()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    /// Offers `format` as an export link. Registering twice is a no-op.
    pub fn export(mut self, format: OutputFormat) -> Self {
        if !self.export_types.contains(&format) {
            self.export_types.push(format);
        }
        self
    }

    pub fn template(mut self, source: impl Into<String>) -> Self {
        self.template = Some(source.into());
        self.template_file = None;
        self
    }

    pub fn template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_file = Some(path.into());
        self.template = None;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn params(mut self, params: ParamNames) -> Self {
        self.params = params;
        self
    }

    /// Source of the HTML template: inline, from file, or built in.
    pub fn template_source(&self) -> Result<Cow<'_, str>, ConfigError> {
        if let Some(source) = &self.template {
            return Ok(Cow::Borrowed(source));
        }
        match &self.template_file {
            Some(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                }),
            None => Ok(Cow::Borrowed(DEFAULT_TEMPLATE)),
        }
    }
}
