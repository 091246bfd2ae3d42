//! Wire shapes for the authority's JSON API.
//!
//! Requests borrow from domain values; responses decode into these DTOs
//! first and are then mapped into domain types by the adapter.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ErrorBody;

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) name: &'a str,
    pub(super) login: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) login: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) token: String,
    #[serde(default)]
    pub(super) name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorPayloadDto {
    Text(String),
    Object {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        code: Option<String>,
    },
}

/// Interpret the body of a non-success response.
///
/// JSON objects become [`ErrorBody::Structured`], JSON strings and plain
/// text become [`ErrorBody::Raw`]. Markup error pages from proxies carry
/// nothing a user should see and are treated as empty.
pub(crate) fn parse_error_body(body: &[u8]) -> ErrorBody {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') {
        return ErrorBody::Empty;
    }

    match serde_json::from_str::<ErrorPayloadDto>(trimmed) {
        Ok(ErrorPayloadDto::Text(message)) => ErrorBody::Raw(message),
        Ok(ErrorPayloadDto::Object { message, code }) => ErrorBody::Structured { message, code },
        Err(_) if trimmed.starts_with('{') || trimmed.starts_with('[') => {
            ErrorBody::Structured {
                message: None,
                code: None,
            }
        }
        Err(_) => ErrorBody::Raw(trimmed.to_owned()),
    }
}

/// Whitespace-compacted, length-limited rendering of a body for logs.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
