//! Errors which abort a whole run.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unable to fetch calendar, status code: {0}")]
    Status(reqwest::StatusCode),
    #[error("unable to read HTML")]
    Read(#[source] io::Error),
    #[error("failed to find month")]
    MissingMonth,
    #[error("invalid month: `{0}`")]
    InvalidMonth(String),
    #[error("failed to find day")]
    MissingDay,
    #[error("failed to parse day: `{0}`")]
    InvalidDay(String),
    #[error("unable to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
