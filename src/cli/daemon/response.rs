//! HTTP plumbing between `tiny_http` and the router.

use std::io::Read;

use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use super::routes::{AdminRequest, AdminResponse, AdminState, route};

/// Largest request body read (form posts are tiny).
const MAX_BODY: u64 = 64 * 1024;

/// Read the request, route it and send the JSON response.
pub fn handle(mut request: Request, state: &AdminState) -> Result<()> {
    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_BODY)
        .read_to_string(&mut body)?;

    let authorization = header_value(&request, "Authorization");
    let response = route(
        state,
        &AdminRequest {
            method: request.method(),
            url: request.url(),
            authorization: authorization.as_deref(),
            body: &body,
        },
    );
    send_json(request, &response)
}

/// Respond with 503 Service Unavailable (daemon shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_json(
        request,
        &AdminResponse {
            status: 503,
            body: serde_json::json!({ "error": "shutting down" }),
        },
    )
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

fn send_json(request: Request, response: &AdminResponse) -> Result<()> {
    let body = serde_json::to_vec_pretty(&response.body)?;
    let mut http = Response::from_data(body)
        .with_status_code(StatusCode(response.status))
        .with_header(make_header("Content-Type", "application/json")?);
    if response.status == 401 {
        http = http.with_header(make_header("WWW-Authenticate", "Bearer")?);
    }
    request.respond(http)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
