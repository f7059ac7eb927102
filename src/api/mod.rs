// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    gateway::{FileListPage, FileWithNft},
    models::{
        CreateNftRequest, CreateNftResponse, CreateVaultRequest, CreateVaultResponse,
        SaveFileRequest, SaveFileResponse, UpdateProfileResponse, WalletAddress,
    },
    state::AppState,
    storage::{FileRecord, NftRecord, ProfileRecord, VaultRecord},
};

pub mod files;
pub mod health;
pub mod nfts;
pub mod profile;
pub mod session;
pub mod vaults;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/profile", get(profile::get_profile))
        .route("/api/profile/update", put(profile::update_profile))
        .route("/api/tusky/vaults/create", post(vaults::create_vault))
        .route("/api/tusky/files", get(files::list_files))
        .route("/api/tusky/files/upload", post(files::save_file))
        .route("/api/nft/insert", post(nfts::insert_nft))
        .route("/auth/callback", get(session::auth_callback))
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .with_state(state);

    api_routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        profile::get_profile,
        profile::update_profile,
        vaults::create_vault,
        files::list_files,
        files::save_file,
        nfts::insert_nft,
        session::auth_callback,
        health::health,
        health::live
    ),
    components(
        schemas(
            WalletAddress,
            ProfileRecord,
            VaultRecord,
            FileRecord,
            NftRecord,
            FileWithNft,
            FileListPage,
            CreateVaultRequest,
            CreateVaultResponse,
            SaveFileRequest,
            SaveFileResponse,
            CreateNftRequest,
            CreateNftResponse,
            UpdateProfileResponse
        )
    ),
    tags(
        (name = "Profile", description = "Profile lookup and update"),
        (name = "Vaults", description = "Vault record persistence"),
        (name = "Files", description = "File record persistence and listing"),
        (name = "NFTs", description = "NFT record persistence"),
        (name = "Auth", description = "Session callback"),
        (name = "Health", description = "Liveness and readiness")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use crate::storage::{MetadataStore, StoragePaths};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (Router, AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut storage = MetadataStore::new(StoragePaths::new(dir.path()));
        storage.initialize().unwrap();
        let state = AppState::new(storage);
        (router(state.clone()), state, dir)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (app, _state, _dir) = test_app();
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let (app, _state, _dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn profile_update_without_token_is_unauthorized_and_mutates_nothing() {
        let (app, state, _dir) = test_app();
        state.gateway().ensure_profile("user-1").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/profile/update")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // The stored profile is untouched.
        let profile = state.gateway().get_profile("user-1").unwrap();
        assert!(profile.display_name.is_none());
        assert!(profile.avatar_url.is_none());
    }

    #[tokio::test]
    async fn list_files_rejects_out_of_range_limit_at_the_http_layer() {
        let (app, _state, _dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tusky/files?limit=1001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
