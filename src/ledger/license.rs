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
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::types::License;
use crate::error::{LedgerError, LedgerResult, RecordKind};

/// License records. Records are deactivated, never deleted.
///
/// This store only keeps the records; the access-list side of creating and
/// revoking a license is applied by [`crate::Ledger`] under the same locks.
#[derive(Debug, Default)]
pub struct LicenseStore {
    licenses: HashMap<String, License>,
    /// License ids per provenance token, in grant order
    by_token: HashMap<String, Vec<String>>,
}

impl LicenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new active license
    pub fn create(
        &mut self,
        token_id: &str,
        licensee: &str,
        fee: Decimal,
        royalty_percentage: Decimal,
        now: DateTime<Utc>,
    ) -> License {
        let license = License {
            license_id: Uuid::new_v4().to_string(),
            token_id: token_id.to_string(),
            licensee: licensee.to_string(),
            fee,
            royalty_percentage,
            granted_at: now,
            active: true,
        };

        self.by_token
            .entry(token_id.to_string())
            .or_default()
            .push(license.license_id.clone());
        self.licenses.insert(license.license_id.clone(), license.clone());

        info!(
            "Created license {} on provenance token {} for {} (fee {}, royalty {}%)",
            license.license_id, token_id, licensee, fee, royalty_percentage
        );
        license
    }

    /// Mark a license inactive, returning its state from before the call
    pub fn deactivate(&mut self, license_id: &str) -> LedgerResult<License> {
        let license = self.licenses.get_mut(license_id).ok_or_else(|| {
            warn!("License not found: {}", license_id);
            LedgerError::not_found(RecordKind::License, license_id)
        })?;

        let before = license.clone();
        license.active = false;

        if before.active {
            info!("Revoked license {} held by {}", license_id, before.licensee);
        }
        Ok(before)
    }

    pub fn get(&self, license_id: &str) -> Option<&License> {
        self.licenses.get(license_id)
    }

    /// All licenses ever granted on a provenance token, oldest first
    pub fn for_token(&self, token_id: &str) -> Vec<&License> {
        self.by_token
            .get(token_id)
            .map(|ids| ids.iter().filter_map(|id| self.licenses.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_records_terms() {
        let mut store = LicenseStore::new();
        let now = Utc::now();
        let license = store.create("prvn-1", "acme-labs", dec!(250.00), dec!(12.5), now);

        assert!(license.active);
        assert_eq!(license.fee, dec!(250.00));
        assert_eq!(license.royalty_percentage, dec!(12.5));
        assert_eq!(license.granted_at, now);
        assert_eq!(store.get(&license.license_id), Some(&license));
    }

    #[test]
    fn test_deactivate_keeps_the_record() {
        let mut store = LicenseStore::new();
        let license = store.create("prvn-1", "acme-labs", dec!(10), dec!(1), Utc::now());

        let before = store.deactivate(&license.license_id).unwrap();
        assert!(before.active);
        assert!(!store.get(&license.license_id).unwrap().active);
        assert_eq!(store.len(), 1);

        // Second deactivation reports the already-inactive state
        let again = store.deactivate(&license.license_id).unwrap();
        assert!(!again.active);
    }

    #[test]
    fn test_deactivate_unknown_license() {
        let mut store = LicenseStore::new();
        assert!(matches!(
            store.deactivate("missing"),
            Err(LedgerError::NotFound { kind: RecordKind::License, .. })
        ));
    }

    #[test]
    fn test_many_licenses_per_token() {
        let mut store = LicenseStore::new();
        let a = store.create("prvn-1", "a", dec!(1), dec!(0), Utc::now());
        let b = store.create("prvn-1", "b", dec!(2), dec!(0), Utc::now());
        store.create("prvn-2", "c", dec!(3), dec!(0), Utc::now());

        let ids: Vec<String> = store.for_token("prvn-1").iter().map(|l| l.license_id.clone()).collect();
        assert_eq!(ids, vec![a.license_id, b.license_id]);
        assert!(store.for_token("prvn-9").is_empty());
    }
}
