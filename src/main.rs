// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

use std::{env, net::SocketAddr, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use walruspass_server::api::router;
use walruspass_server::auth::AuthConfig;
use walruspass_server::config::{
    AUTH_BASE_URL_ENV, AVATAR_PUBLIC_BASE_URL_ENV, DATA_DIR_ENV, DEFAULT_AVATAR_PUBLIC_BASE_URL,
    DEFAULT_DATA_DIR, DEFAULT_SUI_RPC_URL, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV,
    SESSION_AUDIENCE_ENV, SESSION_ISSUER_ENV, SESSION_JWT_SECRET_ENV, SUI_RPC_URL_ENV,
    TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV,
};
use walruspass_server::reconcile::NftSaveReconciler;
use walruspass_server::state::AppState;
use walruspass_server::storage::{AvatarStore, MetadataStore, StoragePaths};
use walruspass_server::sui::SuiClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Install the ring crypto provider for rustls (must be done before any
    // TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize metadata storage
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let mut storage = MetadataStore::new(StoragePaths::new(&data_dir));
    storage
        .initialize()
        .expect("Failed to initialize metadata storage");
    info!(data_dir = %data_dir, "Metadata storage initialized");

    // Session-token verification settings
    let auth_config = AuthConfig {
        secret: env::var(SESSION_JWT_SECRET_ENV).ok(),
        issuer: env::var(SESSION_ISSUER_ENV).ok(),
        audience: env::var(SESSION_AUDIENCE_ENV).ok(),
    };
    if auth_config.secret.is_none() {
        info!("No session secret configured; running in development auth mode");
    }

    let avatar_base = env::var(AVATAR_PUBLIC_BASE_URL_ENV)
        .unwrap_or_else(|_| DEFAULT_AVATAR_PUBLIC_BASE_URL.to_string());

    let mut state = AppState::new(storage)
        .with_auth_config(auth_config)
        .with_avatars(AvatarStore::new(avatar_base));
    if let Ok(auth_base_url) = env::var(AUTH_BASE_URL_ENV) {
        state = state.with_auth_base_url(auth_base_url);
    }

    // Background reconciler for deferred NFT metadata saves
    let shutdown = CancellationToken::new();
    let rpc_url = env::var(SUI_RPC_URL_ENV).unwrap_or_else(|_| DEFAULT_SUI_RPC_URL.to_string());
    let chain = SuiClient::new(state.http.clone(), rpc_url);
    let reconciler = NftSaveReconciler::new(state.storage(), state.gateway(), chain);
    tokio::spawn(reconciler.run(shutdown.clone()));

    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    // Graceful shutdown on Ctrl-C: stop accepting connections and cancel
    // the reconciler
    let handle = Handle::new();
    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                shutdown.cancel();
                handle.graceful_shutdown(Some(Duration::from_secs(10)));
            }
        });
    }

    // Serve with TLS when both a certificate and key are configured
    let tls_paths = (
        env::var(TLS_CERT_PATH_ENV).ok(),
        env::var(TLS_KEY_PATH_ENV).ok(),
    );

    match tls_paths {
        (Some(cert), Some(key)) => {
            let tls_config = RustlsConfig::from_pem_file(&cert, &key)
                .await
                .expect("Failed to load TLS certificate/key");

            info!("WalrusPass server listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        _ => {
            info!("WalrusPass server listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }
}
