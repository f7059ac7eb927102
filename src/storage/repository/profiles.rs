// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Profile repository.
//!
//! Profiles are created implicitly the first time an account authenticates
//! and are only ever mutated through the authenticated update operation.
//! Each profile is stored as a separate JSON file under `profiles/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{MetadataStore, StorageError, StorageResult};

/// Profile record for a signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileRecord {
    /// Account identifier (auth provider subject).
    pub id: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Optional public avatar URL.
    pub avatar_url: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Build an empty profile for a newly authenticated account.
    pub fn empty(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: user_id.into(),
            display_name: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository for profile operations.
pub struct ProfileRepository<'a> {
    storage: &'a MetadataStore,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new ProfileRepository.
    pub fn new(storage: &'a MetadataStore) -> Self {
        Self { storage }
    }

    /// Check if a profile exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().profile(user_id))
    }

    /// Get a profile by account id.
    pub fn get(&self, user_id: &str) -> StorageResult<ProfileRecord> {
        let path = self.storage.paths().profile(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Profile {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new profile.
    pub fn create(&self, profile: &ProfileRecord) -> StorageResult<()> {
        let user_id = &profile.id;

        if self.exists(user_id) {
            return Err(StorageError::AlreadyExists(format!("Profile {user_id}")));
        }

        self.storage
            .write_json(self.storage.paths().profile(user_id), profile)
    }

    /// Update an existing profile.
    pub fn update(&self, profile: &ProfileRecord) -> StorageResult<()> {
        let user_id = &profile.id;

        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("Profile {user_id}")));
        }

        self.storage
            .write_json(self.storage.paths().profile(user_id), profile)
    }
}
