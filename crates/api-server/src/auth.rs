use crate::error::{ApiError, Result};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

/// Static bearer tokens accepted on protected routes. An empty set accepts
/// nothing; use [`ApiTokens::disabled`] to open the routes.
#[derive(Debug, Default)]
pub struct ApiTokens {
    tokens:   HashSet<String>,
    disabled: bool,
}

impl ApiTokens {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens:   tokens.into_iter().map(Into::into).collect(),
            disabled: false,
        }
    }

    /// Lets every request through.
    pub fn disabled() -> Self {
        Self {
            tokens:   HashSet::new(),
            disabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.disabled || self.tokens.contains(token)
    }
}

/// Token from an `Authorization` value. The scheme is matched without regard
/// to case, and a bare token without a scheme is accepted too.
fn bearer_token(header: &str) -> &str {
    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => header,
    }
}

pub async fn require_bearer_token(
    State(tokens): State<Arc<ApiTokens>>,
    req: Request,
    next: Next,
) -> Result<Response> {
    if !tokens.is_enabled() {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingToken)?;

    if !tokens.accepts(bearer_token(header)) {
        debug!(path = %req.uri().path(), "rejected request with unknown token");
        return Err(ApiError::InvalidToken);
    }
    Ok(next.run(req).await)
}
