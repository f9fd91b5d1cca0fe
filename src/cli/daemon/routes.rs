//! Admin request routing.
//!
//! | Request                              | Response                         |
//! |--------------------------------------|----------------------------------|
//! | `GET /admin`                         | status JSON                      |
//! | `GET /admin?generate_feed=true`      | manual run, report or error      |
//! | `POST /admin/settings` (form body)   | stores `exclude_tags`            |
//! | anything else                        | 404                              |
//!
//! Every request needs `Authorization: Bearer <token>`. Routing works on
//! plain values so it stays independent of the HTTP server.

use std::borrow::Cow;
use std::fs;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use serde_json::{Value, json};
use tiny_http::Method;

use crate::cli::settings::store_exclude_tags;
use crate::core::is_running;
use crate::feed::{EXCLUDE_TAGS_OPTION, FeedGenerator};
use crate::schedule::ScheduleStore;
use crate::{debug, log};

/// Shared state of the admin endpoint.
pub struct AdminState {
    pub generator: Arc<FeedGenerator>,
    pub schedule: ScheduleStore,
    pub token: Option<String>,
    pub public_url: Option<url::Url>,
}

/// The parts of an HTTP request routing looks at.
#[derive(Debug)]
pub struct AdminRequest<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    pub authorization: Option<&'a str>,
    pub body: &'a str,
}

/// Status code and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminResponse {
    pub status: u16,
    pub body: Value,
}

impl AdminResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

/// Check the bearer token.
///
/// With no token configured the endpoint is closed (403).
pub fn authorize(token: Option<&str>, authorization: Option<&str>) -> Result<(), AdminResponse> {
    let Some(expected) = token else {
        return Err(AdminResponse::error(403, "admin endpoint disabled: no token configured"));
    };

    let provided = authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(provided) if constant_time_eq(provided.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(AdminResponse::error(401, "unauthorized")),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Dispatch one request.
pub fn route(state: &AdminState, request: &AdminRequest<'_>) -> AdminResponse {
    if let Err(denied) = authorize(state.token.as_deref(), request.authorization) {
        debug!("admin"; "{} {} -> {}", request.method, request.url, denied.status);
        return denied;
    }

    let (path, query) = request.url.split_once('?').unwrap_or((request.url, ""));
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match (request.method, path) {
        (Method::Get, "/admin") if is_truthy(query_param(query, "generate_feed").as_deref()) => {
            generate(state)
        }
        (Method::Get, "/admin") => status(state),
        (Method::Post, "/admin/settings") => update_settings(state, request.body),
        _ => AdminResponse::error(404, "not found"),
    }
}

/// First value of `name` in a urlencoded string.
fn query_param<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "1" | "yes"))
}

fn generate(state: &AdminState) -> AdminResponse {
    match state.generator.run_manual() {
        Ok(report) => {
            let mut body = json!(report);
            body["url"] = json!(state.public_url.as_ref().map(url::Url::as_str));
            AdminResponse::ok(body)
        }
        Err(e) => {
            log!("error"; "manual feed run failed: {:#}", e);
            AdminResponse::error(500, format!("{e:#}"))
        }
    }
}

fn status(state: &AdminState) -> AdminResponse {
    let exclude = match state.generator.excluded_tags() {
        Ok(exclude) => exclude,
        Err(e) => return AdminResponse::error(500, format!("{e:#}")),
    };
    let schedule = match state.schedule.load() {
        Ok(schedule) => schedule,
        Err(e) => return AdminResponse::error(500, format!("failed to read schedule: {e}")),
    };

    let path = &state.generator.target().path;
    let metadata = fs::metadata(path).ok();
    let modified = metadata
        .as_ref()
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    AdminResponse::ok(json!({
        "feed": {
            "path": path,
            "url": state.public_url.as_ref().map(url::Url::as_str),
            "exists": metadata.is_some(),
            "bytes": metadata.as_ref().map(fs::Metadata::len),
            "modified": modified,
        },
        "exclude_tags": exclude.to_string(),
        "schedule": {
            "active": schedule.is_active(),
            "interval": schedule.interval,
            "next_run": schedule.next_run,
            "last_run": schedule.last_run,
            "last_error": schedule.last_error,
        },
        "running": is_running(),
    }))
}

fn update_settings(state: &AdminState, body: &str) -> AdminResponse {
    let Some(raw) = query_param(body, EXCLUDE_TAGS_OPTION) else {
        return AdminResponse::error(400, "missing form field `exclude_tags`");
    };

    match store_exclude_tags(state.generator.options(), &raw) {
        Ok(stored) => {
            log!("admin"; "exclude_tags set to `{}`", stored);
            AdminResponse::ok(json!({ "exclude_tags": stored }))
        }
        Err(e) => AdminResponse::error(500, format!("{e:#}")),
    }
}
