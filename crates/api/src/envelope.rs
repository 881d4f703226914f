use std::fmt;

use cookcal_shared::{Error, Result};
use serde::{Deserialize, de::DeserializeOwned, de::IgnoredAny};

/// Backend status code, numeric or symbolic depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for EnvelopeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

/// `{ code, message, data }` wrapper around every backend response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<EnvelopeCode>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

pub fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;

    envelope
        .data
        .ok_or_else(|| Error::Parse("response envelope has no data".to_owned()))
}

/// Turns a non-2xx response into `Error::Server`, preferring the envelope message.
pub fn decode_failure(status: u16, body: &[u8]) -> Error {
    let envelope = serde_json::from_slice::<Envelope<IgnoredAny>>(body).ok();

    match envelope {
        Some(Envelope {
            code,
            message: Some(message),
            ..
        }) if !message.is_empty() => Error::Server {
            status,
            code: code.map(|code| code.to_string()),
            message,
        },
        _ => Error::Server {
            status,
            code: None,
            message: format!("request failed with status {status}"),
        },
    }
}
