use credex_core::error::CredexError;
use serde::Serialize;

pub fn to_string<T: Serialize>(value: &T) -> Result<String, CredexError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}
