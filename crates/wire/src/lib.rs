//! YAML wire formats for portfolios and photo logs.
//!
//! The capture and fulfilment core exchanges plain values only. This crate defines the on-disk
//! shapes a persistence collaborator (and the `dentfolio` CLI) uses to hand those values over:
//! - portfolio files: a portfolio and its ordered requirements
//! - photo logs: finalized photos with their tags
//!
//! This crate focuses on:
//! - strict serialisation/deserialisation (`deny_unknown_fields`, field paths in errors)
//! - translation between wire structs and validated domain carriers
//!
//! It performs no I/O; callers read and write the text.

pub mod photo_log;
pub mod portfolio;

// Re-export facades
pub use photo_log::PhotoLog;
pub use portfolio::PortfolioFile;

// Re-export public domain-level carriers
pub use photo_log::PhotoRecordData;
pub use portfolio::{PortfolioData, RequirementData};

/// Errors returned by the `dentfolio-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// Deserialize `yaml_text` into `T`.
///
/// Text that is not YAML at all fails with [`WireError::InvalidYaml`]. YAML that does not match
/// the schema fails with [`WireError::Translation`] naming the failing field path.
pub(crate) fn parse_strict<T>(yaml_text: &str, what: &str) -> WireResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let document: serde_yaml::Value = serde_yaml::from_str(yaml_text)?;

    serde_path_to_error::deserialize::<_, T>(document).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        WireError::Translation(format!("{what} schema mismatch at {path}: {source}"))
    })
}
