// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Noderr Protocol Foundation
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::types::IdentityToken;
use crate::error::{LedgerError, LedgerResult, RecordKind};

/// Identity tokens, indexed by token id and by owner.
///
/// Both indices are only touched together inside `&mut self` methods, so any
/// caller holding the store's lock sees them consistent.
#[derive(Debug, Default)]
pub struct IdentityTokenStore {
    tokens: HashMap<String, IdentityToken>,
    by_owner: HashMap<String, String>,
}

impl IdentityTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for an owner that has none
    pub fn issue(
        &mut self,
        owner: &str,
        metadata: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<IdentityToken> {
        if self.by_owner.contains_key(owner) {
            warn!("Refusing second identity token for owner {}", owner);
            return Err(LedgerError::AlreadyExists {
                owner: owner.to_string(),
            });
        }

        let token = IdentityToken {
            token_id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            metadata: metadata.to_string(),
            issued_at: now,
            data_ids: Vec::new(),
        };

        self.by_owner.insert(owner.to_string(), token.token_id.clone());
        self.tokens.insert(token.token_id.clone(), token.clone());

        info!("Issued identity token {} for owner {}", token.token_id, owner);
        Ok(token)
    }

    /// Remove the owner's token entirely, returning it
    pub fn revoke(&mut self, owner: &str) -> LedgerResult<IdentityToken> {
        let token_id = self.by_owner.remove(owner).ok_or_else(|| {
            warn!("No identity token to revoke for owner {}", owner);
            LedgerError::not_found(RecordKind::IdentityOwner, owner)
        })?;

        let token = self
            .tokens
            .remove(&token_id)
            .ok_or_else(|| LedgerError::not_found(RecordKind::IdentityOwner, owner))?;

        info!("Revoked identity token {} for owner {}", token_id, owner);
        Ok(token)
    }

    pub fn has_token(&self, owner: &str) -> bool {
        self.by_owner.contains_key(owner)
    }

    pub fn contains(&self, token_id: &str) -> bool {
        self.tokens.contains_key(token_id)
    }

    pub fn get(&self, token_id: &str) -> Option<&IdentityToken> {
        self.tokens.get(token_id)
    }

    pub fn get_by_owner(&self, owner: &str) -> Option<&IdentityToken> {
        self.by_owner
            .get(owner)
            .and_then(|token_id| self.tokens.get(token_id))
    }

    /// Number of live tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
