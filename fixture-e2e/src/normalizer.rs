use crate::{
    data::{CanonicalResponse, ResponseData},
    error::Error,
};
use serde_json::Value;

/// Converts a transport-level response into its canonical form.
///
/// The body is only parsed when its first non-whitespace byte opens an object. Anything else,
/// array-rooted JSON included, is kept as an opaque string. A body that isn't valid UTF-8 can't
/// be held in a JSON string without loss, so it fails instead of being compared.
pub fn normalize(response_data: &ResponseData) -> Result<CanonicalResponse, Error> {
    Ok(CanonicalResponse {
        message: response_data.status_text.clone(),
        status_code: response_data.status_code,
        data: normalize_body(&response_data.body)?,
    })
}

pub fn normalize_body(body: &[u8]) -> Result<Value, Error> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    match body.iter().find(|byte| !byte.is_ascii_whitespace()) {
        Some(b'{') => serde_json::from_slice(body).map_err(Error::InvalidResponseBody),
        _ => String::from_utf8(body.to_vec())
            .map(Value::String)
            .map_err(Error::NonUtf8ResponseBody),
    }
}

/// Renders the status line text the way it appeared on the wire, e.g. `200 OK`.
///
/// `reason_phrase` is the phrase the server actually sent. The canonical reason for the code is
/// used only when none was received.
pub fn status_text(status: hyper::StatusCode, reason_phrase: Option<&[u8]>) -> String {
    let reason = match reason_phrase {
        Some(phrase) => Some(String::from_utf8_lossy(phrase).into_owned()),
        None => status.canonical_reason().map(String::from),
    };

    match reason {
        Some(reason) if !reason.is_empty() => format!("{} {}", status.as_u16(), reason),
        _ => status.as_u16().to_string(),
    }
}
