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

use dashmap::DashMap;
use tracing::debug;

use super::types::{ContractRegistration, ContractType};

/// Catalog of simulated contracts, keyed by address
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts: DashMap<String, ContractRegistration>,
}

impl ContractRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            contracts: DashMap::new(),
        }
    }

    /// Register a contract. Re-registering an address replaces the entry.
    pub fn register(&self, registration: ContractRegistration) {
        debug!(
            "Registering {} contract {} at {}",
            registration.symbol, registration.name, registration.address
        );
        self.contracts.insert(registration.address.clone(), registration);
    }

    /// Look up a contract by address
    pub fn get(&self, address: &str) -> Option<ContractRegistration> {
        self.contracts.get(address).map(|entry| entry.value().clone())
    }

    /// Contract of the given type with the lowest address
    pub fn find_by_type(&self, contract_type: ContractType) -> Option<ContractRegistration> {
        self.contracts
            .iter()
            .filter(|entry| entry.value().contract_type == contract_type)
            .min_by(|a, b| a.key().cmp(b.key()))
            .map(|entry| entry.value().clone())
    }

    /// All registered contracts, ordered by address
    pub fn all(&self) -> Vec<ContractRegistration> {
        let mut contracts: Vec<ContractRegistration> =
            self.contracts.iter().map(|entry| entry.value().clone()).collect();
        contracts.sort_by(|a, b| a.address.cmp(&b.address));
        contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn registration(address: &str, symbol: &str, contract_type: ContractType) -> ContractRegistration {
        ContractRegistration {
            address: address.to_string(),
            name: format!("{} contract", symbol),
            symbol: symbol.to_string(),
            chain_id: 80002,
            deployed_at: Utc::now(),
            contract_type,
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ContractRegistry::new();
        registry.register(registration("0x01", "HIT", ContractType::IdentityToken));
        registry.register(registration("0x02", "PRVN", ContractType::ProvenanceToken));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("0x01").unwrap().symbol, "HIT");
        assert!(registry.get("0x03").is_none());
        assert_eq!(
            registry.find_by_type(ContractType::ProvenanceToken).unwrap().address,
            "0x02"
        );
        assert!(registry.find_by_type(ContractType::License).is_none());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = ContractRegistry::new();
        registry.register(registration("0x01", "HIT", ContractType::IdentityToken));
        registry.register(registration("0x01", "HIT2", ContractType::IdentityToken));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("0x01").unwrap().symbol, "HIT2");
    }

    #[test]
    fn test_find_by_type_is_deterministic() {
        let registry = ContractRegistry::new();
        registry.register(registration("0x09", "HIT", ContractType::IdentityToken));
        registry.register(registration("0x05", "HIT2", ContractType::IdentityToken));
        registry.register(registration("0x07", "HIT3", ContractType::IdentityToken));

        for _ in 0..10 {
            assert_eq!(
                registry.find_by_type(ContractType::IdentityToken).unwrap().address,
                "0x05"
            );
        }
    }
}
