//! Repair the calendar page's markup so it can be queried with selectors.

use std::io::Read;

use scraper::Html;
use tracing::debug;

use crate::{Error, Result};

/// Parse possibly malformed HTML and return the repaired document.
///
/// The page leaves tags unclosed and relies on implicit table structure, so it goes through the
/// lenient parser once, gets serialized back to well-formed markup and is parsed again.
pub fn normalize<R: Read>(mut reader: R) -> Result<Html> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).map_err(Error::Read)?;
    let lenient = Html::parse_document(&String::from_utf8_lossy(&raw));
    for error in &lenient.errors {
        debug!("repaired markup: {error}");
    }
    Ok(Html::parse_document(&lenient.html()))
}
