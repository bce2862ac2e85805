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

//! Simulated token ledger for identity (HIT) and provenance (PRVN) tokens.
//!
//! [`Ledger`] is the only type that touches more than one store. Each store
//! sits behind its own lock and cross-store operations always acquire them in
//! the order identities, provenance, licenses, links.

pub mod identity;
pub mod license;
pub mod links;
pub mod provenance;
pub mod registry;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult, RecordKind};

pub use identity::IdentityTokenStore;
pub use license::LicenseStore;
pub use links::LinkIndex;
pub use provenance::ProvenanceTokenStore;
pub use registry::ContractRegistry;
pub use types::{
    AccessEntry, ChainVerification, ContractRegistration, ContractType, IdentityToken, License,
    ProvenanceToken, TokenKind,
};

/// Record counts across the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub identity_tokens: usize,
    pub provenance_tokens: usize,
    pub licenses: usize,
    pub contracts: usize,
}

/// A provenance token issued by [`Ledger::issue_linked_prvn`], with both
/// tokens' verification taken while it was linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProvenance {
    pub token: ProvenanceToken,
    pub identity: ChainVerification,
    pub provenance: ChainVerification,
}

/// In-memory ledger shared by request handlers as `Arc<Ledger>`
pub struct Ledger {
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    registry: ContractRegistry,
    identities: RwLock<IdentityTokenStore>,
    provenance: RwLock<ProvenanceTokenStore>,
    licenses: RwLock<LicenseStore>,
    links: RwLock<LinkIndex>,
}

impl Ledger {
    /// Create a ledger and register its three contracts
    pub fn new(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        let ledger = Self {
            config,
            clock,
            registry: ContractRegistry::new(),
            identities: RwLock::new(IdentityTokenStore::new()),
            provenance: RwLock::new(ProvenanceTokenStore::new()),
            licenses: RwLock::new(LicenseStore::new()),
            links: RwLock::new(LinkIndex::new()),
        };

        let deployed_at = ledger.clock.now();
        for contract_type in ContractType::ALL {
            let settings = ledger.config.contract(contract_type);
            ledger.registry.register(ContractRegistration {
                address: settings.address.clone(),
                name: settings.name.clone(),
                symbol: settings.symbol.clone(),
                chain_id: ledger.config.chain_id,
                deployed_at,
                contract_type,
            });
        }

        info!(
            "Ledger ready on chain {} with {} contracts",
            ledger.config.chain_id,
            ledger.registry.len()
        );
        ledger
    }

    /// Ledger with the default deployment and the system clock
    pub fn with_defaults() -> Self {
        Self::new(LedgerConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current time according to the ledger's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // Identity tokens

    /// Issue an identity token. Fails if the owner already holds one.
    pub fn issue_hit(&self, owner: &str, metadata: &str) -> LedgerResult<IdentityToken> {
        let now = self.clock.now();
        self.identities.write().issue(owner, metadata, now)
    }

    /// Return the owner's live token, issuing one if there is none.
    ///
    /// `metadata` is only evaluated when a token is issued.
    pub fn get_or_issue_hit<F>(&self, owner: &str, metadata: F) -> LedgerResult<IdentityToken>
    where
        F: FnOnce() -> String,
    {
        let mut identities = self.identities.write();
        if let Some(existing) = identities.get_by_owner(owner) {
            return Ok(existing.clone());
        }

        let now = self.clock.now();
        identities.issue(owner, &metadata(), now)
    }

    /// Revoke the owner's token. Links held by the token are dropped with it.
    pub fn revoke_hit(&self, owner: &str) -> LedgerResult<()> {
        let mut identities = self.identities.write();
        let mut links = self.links.write();

        let token = identities.revoke(owner)?;
        let dropped = links.remove_hit(&token.token_id);
        if dropped > 0 {
            debug!("Dropped {} links held by identity token {}", dropped, token.token_id);
        }
        Ok(())
    }

    pub fn has_hit(&self, owner: &str) -> bool {
        self.identities.read().has_token(owner)
    }

    pub fn get_hit(&self, token_id: &str) -> Option<IdentityToken> {
        self.identities.read().get(token_id).cloned()
    }

    pub fn get_hit_by_owner(&self, owner: &str) -> Option<IdentityToken> {
        self.identities.read().get_by_owner(owner).cloned()
    }

    // Provenance tokens

    /// Issue a provenance token for a verification or dataset event
    pub fn issue_prvn(&self, owner: &str, dataset_id: &str, metadata: &str) -> ProvenanceToken {
        let now = self.clock.now();
        self.provenance.write().issue(owner, dataset_id, metadata, now)
    }

    /// Grant access to a provenance token, optionally for `duration_secs`
    pub fn grant_access(
        &self,
        token_id: &str,
        subject: &str,
        duration_secs: Option<u64>,
    ) -> LedgerResult<()> {
        let now = self.clock.now();
        self.provenance
            .write()
            .grant_access(token_id, subject, duration_secs, now)
    }

    pub fn revoke_access(&self, token_id: &str, subject: &str) -> LedgerResult<()> {
        self.provenance.write().revoke_access(token_id, subject)
    }

    /// Whether `subject` currently has access. Expiry is judged here, lazily.
    pub fn has_access(&self, token_id: &str, subject: &str) -> bool {
        let now = self.clock.now();
        self.provenance.read().has_access(token_id, subject, now)
    }

    pub fn get_prvn(&self, token_id: &str) -> Option<ProvenanceToken> {
        self.provenance.read().get(token_id).cloned()
    }

    /// Provenance tokens issued for `owner`, oldest first
    pub fn prvns_owned_by(&self, owner: &str) -> Vec<ProvenanceToken> {
        self.provenance
            .read()
            .owned_by(owner)
            .into_iter()
            .cloned()
            .collect()
    }

    // Licenses

    /// Create a license and grant the licensee perpetual access to the token.
    ///
    /// Nothing is recorded if the token does not exist.
    pub fn create_license(
        &self,
        token_id: &str,
        licensee: &str,
        fee: Decimal,
        royalty_percentage: Decimal,
    ) -> LedgerResult<License> {
        let now = self.clock.now();
        let mut provenance = self.provenance.write();
        let mut licenses = self.licenses.write();

        provenance.grant_access(token_id, licensee, None, now)?;
        Ok(licenses.create(token_id, licensee, fee, royalty_percentage, now))
    }

    /// Deactivate a license and withdraw the licensee's access.
    ///
    /// Access is withdrawn on every call, including for a license that is
    /// already inactive.
    pub fn revoke_license(&self, license_id: &str) -> LedgerResult<()> {
        let mut provenance = self.provenance.write();
        let mut licenses = self.licenses.write();

        let license = licenses
            .get(license_id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(RecordKind::License, license_id))?;

        if !license.active {
            debug!("License {} is already inactive", license_id);
        }

        provenance.revoke_access(&license.token_id, &license.licensee)?;
        licenses.deactivate(license_id)?;
        Ok(())
    }

    pub fn get_license(&self, license_id: &str) -> Option<License> {
        self.licenses.read().get(license_id).cloned()
    }

    /// Every license granted on a provenance token, active or not
    pub fn licenses_for_token(&self, token_id: &str) -> Vec<License> {
        self.licenses
            .read()
            .for_token(token_id)
            .into_iter()
            .cloned()
            .collect()
    }

    // Links

    /// Link a provenance token to an identity token. Linking twice is a no-op.
    pub fn link_hit_to_prvn(&self, hit_token_id: &str, prvn_token_id: &str) -> LedgerResult<()> {
        let identities = self.identities.read();
        let provenance = self.provenance.read();

        if !identities.contains(hit_token_id) {
            warn!("Cannot link unknown identity token {}", hit_token_id);
            return Err(LedgerError::invalid_reference(TokenKind::IdentityToken, hit_token_id));
        }
        if !provenance.contains(prvn_token_id) {
            warn!("Cannot link unknown provenance token {}", prvn_token_id);
            return Err(LedgerError::invalid_reference(TokenKind::ProvenanceToken, prvn_token_id));
        }

        self.links.write().link(hit_token_id, prvn_token_id);
        Ok(())
    }

    /// Issue a provenance token already linked to a live identity token.
    ///
    /// The HIT check, the issuance and the link happen under one set of
    /// locks, so a concurrent `revoke_hit` either precedes the call and
    /// nothing is recorded, or follows it and drops the link. The returned
    /// verifications describe both tokens as of that moment.
    pub fn issue_linked_prvn(
        &self,
        hit_token_id: &str,
        owner: &str,
        dataset_id: &str,
        metadata: &str,
    ) -> LedgerResult<LinkedProvenance> {
        let now = self.clock.now();
        let identities = self.identities.read();
        let mut provenance = self.provenance.write();
        let mut links = self.links.write();

        let hit_owner = match identities.get(hit_token_id) {
            Some(hit) => hit.owner.clone(),
            None => {
                warn!("Cannot link unknown identity token {}", hit_token_id);
                return Err(LedgerError::invalid_reference(TokenKind::IdentityToken, hit_token_id));
            }
        };

        let token = provenance.issue(owner, dataset_id, metadata, now);
        links.link(hit_token_id, &token.token_id);

        Ok(LinkedProvenance {
            identity: self.chain_verification(hit_token_id, TokenKind::IdentityToken, Some(hit_owner)),
            provenance: self.chain_verification(
                &token.token_id,
                TokenKind::ProvenanceToken,
                Some(token.owner.clone()),
            ),
            token,
        })
    }

    /// Provenance token ids linked to a HIT, in link order
    pub fn get_prvns_linked_to_hit(&self, hit_token_id: &str) -> Vec<String> {
        self.links.read().linked_to(hit_token_id)
    }

    // Contracts and verification

    pub fn register_contract(&self, registration: ContractRegistration) {
        self.registry.register(registration);
    }

    pub fn get_contract(&self, address: &str) -> Option<ContractRegistration> {
        self.registry.get(address)
    }

    pub fn contract_for(&self, contract_type: ContractType) -> Option<ContractRegistration> {
        self.registry.find_by_type(contract_type)
    }

    pub fn contracts(&self) -> Vec<ContractRegistration> {
        self.registry.all()
    }

    /// Report whether a token exists. Missing tokens are a negative answer,
    /// not an error.
    pub fn verify_on_chain(&self, token_id: &str, kind: TokenKind) -> ChainVerification {
        let owner = match kind {
            TokenKind::IdentityToken => self
                .identities
                .read()
                .get(token_id)
                .map(|token| token.owner.clone()),
            TokenKind::ProvenanceToken => self
                .provenance
                .read()
                .get(token_id)
                .map(|token| token.owner.clone()),
        };

        debug!("On-chain verification of {} {}: {}", kind, token_id, owner.is_some());
        self.chain_verification(token_id, kind, owner)
    }

    fn chain_verification(
        &self,
        token_id: &str,
        kind: TokenKind,
        owner: Option<String>,
    ) -> ChainVerification {
        ChainVerification {
            verified: owner.is_some(),
            contract_address: self.config.contract(kind.contract_type()).address.clone(),
            owner,
            token_id: token_id.to_string(),
            chain_id: self.config.chain_id,
        }
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            identity_tokens: self.identities.read().len(),
            provenance_tokens: self.provenance.read().len(),
            licenses: self.licenses.read().len(),
            contracts: self.registry.len(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_defaults()
    }
}
