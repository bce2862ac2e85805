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

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{AccessEntry, ProvenanceToken};
use crate::error::{LedgerError, LedgerResult, RecordKind};

/// Provenance tokens with their per-subject access lists.
///
/// Tokens are never removed. Expired grants stay in the access list and are
/// only judged when queried.
#[derive(Debug, Default)]
pub struct ProvenanceTokenStore {
    tokens: HashMap<String, ProvenanceToken>,
    /// Token ids in issuance order, per owner
    by_owner: HashMap<String, Vec<String>>,
}

impl ProvenanceTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token. Owners may hold any number of them.
    pub fn issue(
        &mut self,
        owner: &str,
        dataset_id: &str,
        metadata: &str,
        now: DateTime<Utc>,
    ) -> ProvenanceToken {
        let token = ProvenanceToken {
            token_id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            dataset_id: dataset_id.to_string(),
            metadata: metadata.to_string(),
            issued_at: now,
            access_list: HashMap::new(),
        };

        self.by_owner
            .entry(owner.to_string())
            .or_default()
            .push(token.token_id.clone());
        self.tokens.insert(token.token_id.clone(), token.clone());

        info!(
            "Issued provenance token {} for owner {} (dataset {})",
            token.token_id, owner, dataset_id
        );
        token
    }

    /// Grant `subject` access, replacing any earlier entry.
    ///
    /// A duration of `None` or zero seconds never expires.
    pub fn grant_access(
        &mut self,
        token_id: &str,
        subject: &str,
        duration_secs: Option<u64>,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let token = self.token_mut(token_id)?;

        let expiration = match duration_secs {
            Some(secs) if secs > 0 => {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                Some(
                    Duration::try_seconds(secs)
                        .and_then(|d| now.checked_add_signed(d))
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                )
            }
            _ => None,
        };

        token.access_list.insert(
            subject.to_string(),
            AccessEntry {
                has_access: true,
                expiration,
            },
        );

        debug!(
            "Granted {} access to provenance token {} (expires: {:?})",
            subject, token_id, expiration
        );
        Ok(())
    }

    /// Withdraw `subject`'s access. A subject without an entry is left alone.
    pub fn revoke_access(&mut self, token_id: &str, subject: &str) -> LedgerResult<()> {
        let token = self.token_mut(token_id)?;

        if let Some(entry) = token.access_list.get_mut(subject) {
            entry.has_access = false;
            entry.expiration = None;
            debug!("Revoked {} access to provenance token {}", subject, token_id);
        }

        Ok(())
    }

    /// Whether `subject` holds live access at `now`. Unknown tokens grant nothing.
    pub fn has_access(&self, token_id: &str, subject: &str, now: DateTime<Utc>) -> bool {
        self.tokens
            .get(token_id)
            .and_then(|token| token.access_list.get(subject))
            .map_or(false, |entry| entry.is_active_at(now))
    }

    pub fn contains(&self, token_id: &str) -> bool {
        self.tokens.contains_key(token_id)
    }

    pub fn get(&self, token_id: &str) -> Option<&ProvenanceToken> {
        self.tokens.get(token_id)
    }

    /// Tokens issued for `owner`, oldest first
    pub fn owned_by(&self, owner: &str) -> Vec<&ProvenanceToken> {
        self.by_owner
            .get(owner)
            .map(|ids| ids.iter().filter_map(|id| self.tokens.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn token_mut(&mut self, token_id: &str) -> LedgerResult<&mut ProvenanceToken> {
        self.tokens.get_mut(token_id).ok_or_else(|| {
            warn!("Provenance token not found: {}", token_id);
            LedgerError::not_found(RecordKind::ProvenanceToken, token_id)
        })
    }
}
