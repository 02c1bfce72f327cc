//! Where the calendar HTML comes from.

use std::path::PathBuf;

use reqwest::StatusCode;
use tracing::info;

use crate::{Error, Result};

pub static CALENDAR_URL: &str = "http://www.trivalleytriclub.com/calendar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A predownloaded HTML file.
    File(PathBuf),
    /// The live calendar page.
    Url(String),
}

impl Source {
    /// Use the test file if one is given, the club's calendar page otherwise.
    pub fn new(test_file: Option<PathBuf>) -> Self {
        match test_file {
            Some(path) => Source::File(path),
            None => Source::Url(String::from(CALENDAR_URL)),
        }
    }
}

/// Read the raw HTML bytes of the source.
pub async fn read(source: &Source) -> Result<Vec<u8>> {
    match source {
        Source::File(path) => std::fs::read(path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        }),
        Source::Url(url) => get_response(url).await,
    }
}

/// Get the calendar page with a single GET request.
async fn get_response(url: &str) -> Result<Vec<u8>> {
    info!("downloading {url}");
    let response = reqwest::get(url).await?;
    if response.status() != StatusCode::OK {
        return Err(Error::Status(response.status()));
    }
    Ok(response.bytes().await?.to_vec())
}
