//! Leaderboard HTTP contract
//!
//! Transport agnostic: a server hands over method, path and body and writes
//! back the status and JSON this returns.
//!
//! - `GET /api/leaderboard/daily` → 200, today's entries, fastest first
//! - `POST /api/leaderboard` `{time, playerName?}` → 201 with the stored entry

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::leaderboard::{LeaderboardError, SharedLeaderboard};
use crate::platform::Clock;

pub const DAILY_PATH: &str = "/api/leaderboard/daily";
pub const SUBMIT_PATH: &str = "/api/leaderboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Time is required")]
    MissingTime,
    #[error("invalid request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error(transparent)]
    Rejected(#[from] LeaderboardError),
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::MissingTime | ApiError::MalformedBody(_) | ApiError::Rejected(_) => 400,
            ApiError::NotFound => 404,
            ApiError::MethodNotAllowed => 405,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        ApiResponse::ok(self.status(), json!({ "message": self.to_string() }))
    }
}

/// Body of a score submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitScore {
    time: Option<f64>,
    player_name: Option<String>,
}

/// Route one request against the shared leaderboard
pub fn handle<C: Clock>(board: &SharedLeaderboard<C>, request: ApiRequest<'_>) -> ApiResponse {
    let path = request.path.split('?').next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    let result = match (path, request.method) {
        (DAILY_PATH, Method::Get) => Ok(daily(board)),
        (SUBMIT_PATH, Method::Post) => submit(board, request.body),
        (DAILY_PATH, _) | (SUBMIT_PATH, _) => Err(ApiError::MethodNotAllowed),
        _ => Err(ApiError::NotFound),
    };

    result.unwrap_or_else(|err| {
        log::warn!("{:?} {} -> {}: {err}", request.method, request.path, err.status());
        err.into_response()
    })
}

fn daily<C: Clock>(board: &SharedLeaderboard<C>) -> ApiResponse {
    ApiResponse::ok(200, json!(board.scores()))
}

fn submit<C: Clock>(board: &SharedLeaderboard<C>, body: &str) -> Result<ApiResponse, ApiError> {
    let submission: SubmitScore = serde_json::from_str(body)?;
    // Zero counts as missing, same as an absent field
    let time = submission
        .time
        .filter(|t| *t != 0.0)
        .ok_or(ApiError::MissingTime)?;
    let entry = board.record_score(time, submission.player_name.as_deref())?;
    Ok(ApiResponse::ok(201, json!(entry)))
}
