// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Auth-callback endpoint.
//!
//! The auth provider redirects here with an authorization code after a
//! wallet-signature sign-in. The code is exchanged for a session and an
//! empty profile is created on first authentication. Whatever happens, the
//! user lands back on the home page — failures are logged, not shown.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};
use url::Url;
use utoipa::IntoParams;

use crate::state::AppState;

/// The exchange never reads the provider response as anything but JSON.
#[derive(Debug, thiserror::Error)]
enum ExchangeError {
    #[error("invalid auth provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Query parameters of the auth callback.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Authorization code issued by the auth provider.
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangedSession {
    access_token: String,
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    id: String,
}

/// Exchange an authorization code for a session at the auth provider.
async fn exchange_code(
    http: &reqwest::Client,
    base_url: &str,
    code: &str,
) -> Result<ExchangedSession, ExchangeError> {
    let mut url = Url::parse(base_url)?.join("auth/v1/token")?;
    url.set_query(Some("grant_type=pkce"));

    let session = http
        .post(url)
        .json(&json!({ "auth_code": code }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(session)
}

/// Handle the auth provider's redirect.
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "Auth",
    params(CallbackQuery),
    responses((status = 303, description = "Redirect to the home page"))
)]
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    info!(code_present = query.code.is_some(), "Auth callback received");

    let (Some(code), Some(base_url)) = (query.code.as_deref(), state.auth_base_url.as_deref())
    else {
        return Redirect::to("/");
    };

    info!("Exchanging auth code for session");
    match exchange_code(&state.http, base_url, code).await {
        Ok(session) => {
            debug!(
                token_preview = %format!("{}...", &session.access_token[..session.access_token.len().min(10)]),
                "Auth session created"
            );
            info!(user_id = %session.user.id, "Authentication successful");

            // Profiles come into existence on first authentication.
            if let Err(e) = state.gateway().ensure_profile(&session.user.id) {
                error!(user_id = %session.user.id, error = %e, "Failed to ensure profile");
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to exchange code for session");
        }
    }

    Redirect::to("/")
}
