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

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ledger::types::ContractType;

/// Prefix for environment overrides, e.g. `HEIRLOOM_LEDGER__CHAIN_ID=137`
pub const ENV_PREFIX: &str = "HEIRLOOM_LEDGER";

/// Polygon Amoy testnet
pub const DEFAULT_CHAIN_ID: u64 = 80002;

/// Errors raised while loading ledger configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Address and display details of one simulated contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSettings {
    /// Contract address
    pub address: String,
    /// Human readable contract name
    pub name: String,
    /// Token symbol
    pub symbol: String,
}

impl ContractSettings {
    fn new(address: &str, name: &str, symbol: &str) -> Self {
        Self {
            address: address.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Configuration for the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Chain identifier reported by on-chain verification
    pub chain_id: u64,
    /// Identity token (HIT) contract
    pub identity: ContractSettings,
    /// Provenance token (PRVN) contract
    pub provenance: ContractSettings,
    /// License manager contract
    pub license: ContractSettings,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            identity: ContractSettings::new(
                "0x4a79551973Aa98f11d13d59b91C5A5c4cF869335",
                "Heirloom Identity Token",
                "HIT",
            ),
            provenance: ContractSettings::new(
                "0x5b98D84538EE3319AfC09D88C6b7c0eB3bf9403B",
                "Provenance Token",
                "PRVN",
            ),
            license: ContractSettings::new(
                "0x8E2f0C77b11d572056826bB35E8ACF150E586d5c",
                "License Manager",
                "LICENSE",
            ),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from `.env` and `HEIRLOOM_LEDGER__*` variables,
    /// falling back to the defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded ledger environment from .env");
        }

        Self::from_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Layer a configuration source over the defaults
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("chain_id", defaults.chain_id)?
            .set_default("identity.address", defaults.identity.address)?
            .set_default("identity.name", defaults.identity.name)?
            .set_default("identity.symbol", defaults.identity.symbol)?
            .set_default("provenance.address", defaults.provenance.address)?
            .set_default("provenance.name", defaults.provenance.name)?
            .set_default("provenance.symbol", defaults.provenance.symbol)?
            .set_default("license.address", defaults.license.address)?
            .set_default("license.name", defaults.license.name)?
            .set_default("license.symbol", defaults.license.symbol)?
            .add_source(source)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Settings for a given contract type
    pub fn contract(&self, contract_type: ContractType) -> &ContractSettings {
        match contract_type {
            ContractType::IdentityToken => &self.identity,
            ContractType::ProvenanceToken => &self.provenance,
            ContractType::License => &self.license,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_defaults_match_amoy_deployment() {
        let config = LedgerConfig::default();

        assert_eq!(config.chain_id, 80002);
        assert_eq!(config.identity.symbol, "HIT");
        assert_eq!(config.provenance.symbol, "PRVN");
        assert_eq!(config.license.symbol, "LICENSE");
        assert_eq!(
            config.contract(ContractType::ProvenanceToken).address,
            "0x5b98D84538EE3319AfC09D88C6b7c0eB3bf9403B"
        );
    }

    #[test]
    fn test_source_overrides_only_what_it_sets() {
        let source = File::from_str(
            r#"{ "chain_id": 137, "identity": { "address": "0xabc" } }"#,
            FileFormat::Json,
        );

        let config = LedgerConfig::from_source(source).unwrap();

        assert_eq!(config.chain_id, 137);
        assert_eq!(config.identity.address, "0xabc");
        assert_eq!(config.identity.name, "Heirloom Identity Token");
        assert_eq!(config.license, LedgerConfig::default().license);
    }
}
