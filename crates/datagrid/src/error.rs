//! Error type for the grid controller.

use datagrid_render::RenderError;
use datagrid_seeker::SeekerError;

use crate::config::ConfigError;
use crate::mapper::MapperError;

/// Errors raised while handling a grid request.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The state parameter is not a valid encoded filter state.
    #[error("invalid grid state: {0}")]
    InvalidState(#[source] serde_json::Error),

    /// The action parameter names no known action.
    #[error("unknown grid action '{0}'")]
    UnknownAction(String),

    /// The action value is missing or does not fit the action.
    #[error("invalid value {value:?} for grid action '{action}'")]
    InvalidActionValue { action: String, value: String },

    /// The requested output format is not supported.
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),

    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The query backend failed.
    #[error("query failed: {0}")]
    Query(#[from] SeekerError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("malformed query string: {0}")]
    QueryString(#[from] serde_urlencoded::de::Error),

    #[error("cannot encode query string: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),

    #[error("cannot serialize grid document: {0}")]
    Document(#[from] serde_json::Error),
}

impl GridError {
    pub(crate) fn invalid_value(action: impl Into<String>, value: impl Into<String>) -> Self {
        GridError::InvalidActionValue {
            action: action.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            GridError::UnknownAction("zoom".into()).to_string(),
            "unknown grid action 'zoom'"
        );
        assert_eq!(
            GridError::invalid_value("page", "two").to_string(),
            "invalid value \"two\" for grid action 'page'"
        );
        assert_eq!(
            GridError::from(MapperError::UndefinedField("x".into())).to_string(),
            "undefined field 'x'"
        );
    }
}
