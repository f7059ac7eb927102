// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for metadata storage | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM cert/key; both set enables HTTPS | Optional |
//! | `SESSION_JWT_SECRET` | HS256 secret for bearer-token verification | Required for production |
//! | `SESSION_ISSUER` | Expected JWT issuer claim | Optional |
//! | `SESSION_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `AUTH_BASE_URL` | Auth provider base URL for code-for-session exchange | Optional |
//! | `AVATAR_PUBLIC_BASE_URL` | Public URL prefix for stored avatars | `/avatars` |
//! | `TUSKY_API_URL` | Encrypted-storage service base URL | `https://api.tusky.io` |
//! | `TUSKY_API_KEY` | Encrypted-storage service API key | Required for uploads |
//! | `SUI_RPC_URL` | Sui fullnode JSON-RPC endpoint | Testnet fullnode |
//! | `NFT_PACKAGE_ID` | On-chain package id of the gatekeeper contract | Required for minting |
//! | `NFT_LISTING_ID` | Shared listing object id for purchases | Required for buying |
//! | `DEMO_DOWNLOAD_PASSWORD` | Fixed decryption password for the public demo download path | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the metadata storage directory path.
///
/// All profile, vault, file, and NFT records plus stored avatars live here.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default root directory for metadata storage.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Environment variable for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable for the TLS certificate path (PEM).
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";

/// Environment variable for the TLS private key path (PEM).
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Environment variable for the HS256 session-token secret.
///
/// When unset the server runs in development mode: bearer tokens are
/// structurally decoded but signatures are not verified.
pub const SESSION_JWT_SECRET_ENV: &str = "SESSION_JWT_SECRET";

/// Environment variable for the expected session-token issuer claim.
pub const SESSION_ISSUER_ENV: &str = "SESSION_ISSUER";

/// Environment variable for the expected session-token audience claim.
pub const SESSION_AUDIENCE_ENV: &str = "SESSION_AUDIENCE";

/// Environment variable for the auth provider base URL used by the
/// `/auth/callback` code-for-session exchange.
pub const AUTH_BASE_URL_ENV: &str = "AUTH_BASE_URL";

/// Environment variable for the public URL prefix of stored avatars.
pub const AVATAR_PUBLIC_BASE_URL_ENV: &str = "AVATAR_PUBLIC_BASE_URL";

/// Default public URL prefix for stored avatars.
pub const DEFAULT_AVATAR_PUBLIC_BASE_URL: &str = "/avatars";

/// Environment variable for the encrypted-storage service base URL.
pub const TUSKY_API_URL_ENV: &str = "TUSKY_API_URL";

/// Default encrypted-storage service base URL.
pub const DEFAULT_TUSKY_API_URL: &str = "https://api.tusky.io";

/// Environment variable for the encrypted-storage service API key.
pub const TUSKY_API_KEY_ENV: &str = "TUSKY_API_KEY";

/// Environment variable for the Sui fullnode JSON-RPC endpoint.
pub const SUI_RPC_URL_ENV: &str = "SUI_RPC_URL";

/// Default Sui fullnode endpoint (testnet).
pub const DEFAULT_SUI_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";

/// Environment variable for the on-chain gatekeeper package id.
pub const NFT_PACKAGE_ID_ENV: &str = "NFT_PACKAGE_ID";

/// Environment variable for the shared listing object id.
pub const NFT_LISTING_ID_ENV: &str = "NFT_LISTING_ID";

/// Environment variable for the fixed demo download password.
pub const DEMO_DOWNLOAD_PASSWORD_ENV: &str = "DEMO_DOWNLOAD_PASSWORD";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
