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

use std::fmt;

use thiserror::Error;

use crate::ledger::types::TokenKind;

/// What a failed lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Identity token, looked up by its owner
    IdentityOwner,
    /// Provenance token, looked up by token id
    ProvenanceToken,
    /// License, looked up by license id
    License,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::IdentityOwner => write!(f, "Identity token for owner"),
            RecordKind::ProvenanceToken => write!(f, "Provenance token"),
            RecordKind::License => write!(f, "License"),
        }
    }
}

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Identity token already exists for owner: {owner}")]
    AlreadyExists { owner: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Invalid {kind} reference: {id}")]
    InvalidReference { kind: TokenKind, id: String },
}

impl LedgerError {
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_reference(kind: TokenKind, id: &str) -> Self {
        LedgerError::InvalidReference {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
