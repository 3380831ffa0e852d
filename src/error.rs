//! Error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid json format: expected {0}")]
    InvalidFormat(&'static str),
    #[error("json response has no {0}")]
    MissingField(&'static str),
    #[error("{0} element is not an array")]
    NotAnArray(&'static str),
    #[error("response parsed but no channels")]
    EmptyCatalog,
    #[error("EPG channels not found")]
    EpgNotLoaded,
    #[error("Cannot find epg channel {0}")]
    EpgChannelNotFound(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
