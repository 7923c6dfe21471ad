//! Request capture.
//!
//! Turns one inbound HTTP request into the [`Observation`] recorded in a
//! slot's circular log: request line, peer address, headers, query
//! parameters, and body. The store layers treat the result as opaque.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::body::to_bytes;
use axum::extract::Request;

use hookslot_core::Observation;

use crate::error::{ApiError, ApiResult};

/// Upper bound on how much request body is captured into a log entry.
pub const MAX_CAPTURED_BODY_BYTES: usize = 1024 * 1024;

/// Capture an inbound request as an observation.
///
/// Consumes the request. Header and body bytes that are not valid UTF-8
/// are decoded lossily rather than rejected; the log is a diagnostic
/// record, not a validator.
pub async fn capture(
    peer: Option<SocketAddr>,
    query_params: BTreeMap<String, String>,
    request: Request,
) -> ApiResult<Observation> {
    let (parts, body) = request.into_parts();

    let req_line = format!("{} {} {:?}", parts.method, parts.uri.path(), parts.version);

    let headers: BTreeMap<String, String> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let bytes = to_bytes(body, MAX_CAPTURED_BODY_BYTES)
        .await
        .map_err(|err| ApiError::invalid_input(format!("Failed to read request body: {}", err)))?;
    let body_data = String::from_utf8_lossy(&bytes).into_owned();

    Ok(Observation {
        req_line,
        host: peer.map(|addr| addr.ip().to_string()),
        port: peer.map(|addr| addr.port()),
        headers,
        query_params,
        body_data,
    })
}
