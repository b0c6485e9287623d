use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod lexicon;
pub mod pages;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lexicon::{load_lexicon, Lexicon, NoiseRule};
pub use pages::{PageDraft, PageRecord, PageType};
pub use store::{InMemoryPageStore, PageStore, StoreError, UpsertOutcome};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read lexicon file {path}: {source}")]
    LexiconFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon file: {0}")]
    LexiconFileParse(#[source] serde_yaml::Error),

    #[error("invalid lexicon: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid page type: {0}")]
    InvalidPageType(String),
}
