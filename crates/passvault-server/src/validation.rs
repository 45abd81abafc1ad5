//! Request body decoding and field checks.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty request")]
    EmptyBody,

    #[error("failed to decode request")]
    Decode(String),

    /// Required fields that were absent or empty, in declaration order.
    #[error("{}", describe_missing(.0))]
    MissingFields(Vec<&'static str>),
}

fn describe_missing(fields: &[&'static str]) -> String {
    fields
        .iter()
        .map(|field| format!("field {field} is a required field"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structural checks run after a body decodes.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collects the names of empty required fields.
fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<_> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Decode a JSON body and validate it. A blank body is reported as
/// [`ValidationError::EmptyBody`] rather than as a decode failure.
pub fn parse_body<T>(body: &[u8]) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Validate,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::EmptyBody);
    }
    let value: T =
        serde_json::from_slice(body).map_err(|e| ValidationError::Decode(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

/// Body of `POST /save` and `PUT /update/{entry_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    #[serde(default)]
    pub entry_type: String,
    #[serde(default)]
    pub entry_data: String,
}

impl Validate for EntryRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("entry_type", self.entry_type.as_str()),
            ("entry_data", self.entry_data.as_str()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyPartRequest {
    #[serde(default)]
    pub key_part: String,
}

impl Validate for KeyPartRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&[("key_part", self.key_part.as_str())])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub redirect_url: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("app_name", self.app_name.as_str()),
            ("secret", self.secret.as_str()),
            ("redirect_url", self.redirect_url.as_str()),
        ])
    }
}

/// Parse a positive id from a path segment.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
