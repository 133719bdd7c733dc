//! Unwrapping of the provider's JSONP responses
use crate::error::{Result, SatError};
use serde::de::DeserializeOwned;

/// Returns the text between the first `(` and the last `)`, i.e. the argument
/// of the callback call `readSatellite(...)`.
pub fn strip_callback(text: &str) -> Result<&str> {
    let start = text.find('(').ok_or(SatError::Jsonp)?;
    let end = text.rfind(')').ok_or(SatError::Jsonp)?;
    if end <= start {
        return Err(SatError::Jsonp);
    }
    Ok(&text[start + 1..end])
}

/// The provider delimits strings with single quotes. Every `'` is replaced,
/// so a value that itself contains an apostrophe will not survive this.
pub fn normalize_quotes(payload: &str) -> String {
    payload.replace('\'', "\"")
}

pub fn parse<T: DeserializeOwned>(payload: &str) -> Result<T> {
    let value = serde_json::from_str(&normalize_quotes(payload))?;
    Ok(value)
}
