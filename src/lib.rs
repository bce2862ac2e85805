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

pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod recording;

#[cfg(test)]
mod tests;

// Re-export common types
pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{ConfigError, ContractSettings, LedgerConfig};
pub use error::{LedgerError, LedgerResult, RecordKind};
pub use ledger::{
    AccessEntry, ChainVerification, ContractRegistration, ContractType, IdentityToken, Ledger,
    LedgerStats, License, LinkedProvenance, ProvenanceToken, TokenKind,
};
pub use recording::{
    DeviceInfo, RecordingError, VerificationEvent, VerificationMethod, VerificationReceipt,
    VerificationRecorder,
};

use std::sync::Arc;

/// Create a shareable ledger with the default deployment and system clock
pub fn create_ledger() -> Arc<Ledger> {
    Arc::new(Ledger::with_defaults())
}

/// Create a shareable ledger from environment configuration
pub fn create_ledger_from_env() -> Result<Arc<Ledger>, ConfigError> {
    let config = LedgerConfig::from_env()?;
    Ok(Arc::new(Ledger::new(config, Arc::new(SystemClock))))
}
