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
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token kinds that can be verified on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Heirloom identity token (HIT)
    IdentityToken,
    /// Provenance token (PRVN)
    ProvenanceToken,
}

impl TokenKind {
    /// Contract that issues tokens of this kind
    pub fn contract_type(&self) -> ContractType {
        match self {
            TokenKind::IdentityToken => ContractType::IdentityToken,
            TokenKind::ProvenanceToken => ContractType::ProvenanceToken,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IdentityToken => write!(f, "HIT"),
            TokenKind::ProvenanceToken => write!(f, "PRVN"),
        }
    }
}

/// Kinds of simulated contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    IdentityToken,
    ProvenanceToken,
    License,
}

impl ContractType {
    /// All contract types, in registration order
    pub const ALL: [ContractType; 3] = [
        ContractType::IdentityToken,
        ContractType::ProvenanceToken,
        ContractType::License,
    ];
}

/// One identity token per live owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityToken {
    pub token_id: String,
    pub owner: String,
    /// Opaque caller payload, stored verbatim
    pub metadata: String,
    pub issued_at: DateTime<Utc>,
    /// Reserved for linked data references; never populated by the ledger
    pub data_ids: Vec<String>,
}

/// Access state for one subject on a provenance token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessEntry {
    pub has_access: bool,
    /// `None` means the grant does not expire
    pub expiration: Option<DateTime<Utc>>,
}

impl AccessEntry {
    /// Whether this entry grants access at `now`.
    ///
    /// A grant is still live at the exact instant it expires.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if !self.has_access {
            return false;
        }
        match self.expiration {
            Some(expiration) => expiration >= now,
            None => true,
        }
    }
}

/// Token attesting a single verification or dataset event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceToken {
    pub token_id: String,
    pub owner: String,
    pub dataset_id: String,
    /// Opaque caller payload, stored verbatim
    pub metadata: String,
    pub issued_at: DateTime<Utc>,
    pub access_list: HashMap<String, AccessEntry>,
}

/// Durable access grant on a provenance token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub license_id: String,
    /// Provenance token the license applies to
    pub token_id: String,
    pub licensee: String,
    pub fee: Decimal,
    pub royalty_percentage: Decimal,
    pub granted_at: DateTime<Utc>,
    pub active: bool,
}

/// Registry entry for a simulated contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRegistration {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub chain_id: u64,
    pub deployed_at: DateTime<Utc>,
    pub contract_type: ContractType,
}

/// Outcome of an on-chain verification query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    pub verified: bool,
    pub contract_address: String,
    /// `None` when the token does not exist
    pub owner: Option<String>,
    pub token_id: String,
    pub chain_id: u64,
}
