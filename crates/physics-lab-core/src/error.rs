use thiserror::Error;

/// Errors raised while building or validating the static physics content.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parameter `{id}`: {reason}")]
    InvalidParameter { id: String, reason: String },

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("`{owner}`: {field} has {left} entries but {field}_uz has {right}")]
    MisalignedLocales {
        owner: String,
        field: &'static str,
        left: usize,
        right: usize,
    },

    #[error("unknown simulation `{0}`")]
    UnknownSimulation(String),

    #[error("preset `{preset}` sets unknown parameter `{parameter}`")]
    UnknownPresetParameter { preset: String, parameter: String },

    #[error("catalog parse failed: {0}")]
    Catalog(#[from] toml::de::Error),

    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
