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

//! Records verification outcomes on the ledger.
//!
//! A verification becomes a provenance token linked to the user's identity
//! token. Whether a verification should succeed is decided by the caller;
//! this module only records the fact.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Error types for verification recording
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Token failed on-chain verification: {token_id}")]
    Unverified { token_id: String },

    #[error("Confidence must be a finite number, got {0}")]
    NonFiniteConfidence(f64),
}

/// How the user was verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Face,
    Fingerprint,
    Device,
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMethod::Face => write!(f, "face"),
            VerificationMethod::Fingerprint => write!(f, "fingerprint"),
            VerificationMethod::Device => write!(f, "device"),
        }
    }
}

/// Device the verification ran on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
}

/// Metadata stored on a user's identity token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityMetadata<'a> {
    user_id: &'a str,
    username: String,
    created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Metadata stored on each verification's provenance token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerificationMetadata {
    verification_id: String,
    user_id: String,
    method: VerificationMethod,
    timestamp: DateTime<Utc>,
    confidence: f64,
    device_info: Option<DeviceInfo>,
    status: String,
}

/// What the caller gets back after recording a verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReceipt {
    pub hit_token_id: String,
    pub prvn_token_id: String,
    pub verification_id: String,
    pub method: VerificationMethod,
    pub timestamp: DateTime<Utc>,
    pub confidence: f64,
    /// "unknown" when no device info was supplied
    pub device_type: String,
    pub device_verified: bool,
    pub chain_id: u64,
    /// Identity token contract address
    pub contract_address: String,
}

/// A past verification, read back from its provenance token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationEvent {
    /// Provenance token id
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub method: VerificationMethod,
    pub confidence: f64,
    pub device_info: Option<DeviceInfo>,
    pub status: String,
}

/// Records verifications against a shared ledger
pub struct VerificationRecorder {
    ledger: Arc<Ledger>,
}

impl VerificationRecorder {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Record a verification for `user_id`.
    ///
    /// Issues the user's identity token on first use, then a provenance token
    /// for this verification, links the two and confirms both on chain. If the
    /// identity token is revoked before the link is made, no provenance token
    /// is recorded.
    pub fn record_verification(
        &self,
        user_id: &str,
        method: VerificationMethod,
        confidence: f64,
        device: Option<DeviceInfo>,
    ) -> Result<VerificationReceipt, RecordingError> {
        // NaN and infinities serialize as null and could not be read back
        if !confidence.is_finite() {
            return Err(RecordingError::NonFiniteConfidence(confidence));
        }

        let timestamp = self.ledger.now();
        let verification_id = Uuid::new_v4().to_string();

        let identity_metadata = serde_json::to_string(&IdentityMetadata {
            user_id,
            username: format!("user_{}", user_id.chars().take(8).collect::<String>()),
            created_at: timestamp,
            kind: "identity",
        })?;
        let hit = self
            .ledger
            .get_or_issue_hit(user_id, move || identity_metadata)?;

        let device_type = device
            .as_ref()
            .map(|d| d.device_type.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let verification_metadata = serde_json::to_string(&VerificationMetadata {
            verification_id: verification_id.clone(),
            user_id: user_id.to_string(),
            method,
            timestamp,
            confidence,
            device_info: device,
            status: "verified".to_string(),
        })?;
        let linked = self.ledger.issue_linked_prvn(
            &hit.token_id,
            user_id,
            &verification_id,
            &verification_metadata,
        )?;
        let prvn = linked.token;
        let hit_check = linked.identity;

        if !hit_check.verified {
            return Err(RecordingError::Unverified { token_id: hit.token_id });
        }
        if !linked.provenance.verified {
            return Err(RecordingError::Unverified { token_id: prvn.token_id });
        }

        info!(
            "Recorded {} verification {} for user {} (HIT {}, PRVN {})",
            method, verification_id, user_id, hit.token_id, prvn.token_id
        );

        Ok(VerificationReceipt {
            hit_token_id: hit.token_id,
            prvn_token_id: prvn.token_id,
            verification_id,
            method,
            timestamp,
            confidence,
            device_type,
            device_verified: true,
            chain_id: hit_check.chain_id,
            contract_address: hit_check.contract_address,
        })
    }

    /// Verifications linked to the user's identity token, oldest first.
    ///
    /// Tokens whose metadata cannot be read back are skipped.
    pub fn verification_history(&self, user_id: &str) -> Vec<VerificationEvent> {
        let hit = match self.ledger.get_hit_by_owner(user_id) {
            Some(hit) => hit,
            None => return Vec::new(),
        };

        self.ledger
            .get_prvns_linked_to_hit(&hit.token_id)
            .into_iter()
            .filter_map(|prvn_id| {
                let prvn = self.ledger.get_prvn(&prvn_id)?;
                match serde_json::from_str::<VerificationMetadata>(&prvn.metadata) {
                    Ok(metadata) => Some(VerificationEvent {
                        id: prvn.token_id,
                        timestamp: metadata.timestamp,
                        method: metadata.method,
                        confidence: metadata.confidence,
                        device_info: metadata.device_info,
                        status: metadata.status,
                    }),
                    Err(e) => {
                        warn!("Skipping provenance token {} with unreadable metadata: {}", prvn_id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::LedgerConfig;
    use chrono::{Duration, TimeZone};

    fn recorder() -> (VerificationRecorder, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
        let ledger = Arc::new(Ledger::new(LedgerConfig::default(), clock.clone()));
        (VerificationRecorder::new(ledger), clock)
    }

    #[test]
    fn test_first_verification_issues_identity_token() {
        let (recorder, _) = recorder();
        let device = DeviceInfo {
            device_type: "mobile".to_string(),
            platform: Some("ios".to_string()),
            browser: None,
        };

        let receipt = recorder
            .record_verification("0f9a2c6e-user", VerificationMethod::Face, 0.93, Some(device))
            .unwrap();

        let ledger = recorder.ledger();
        let hit = ledger.get_hit_by_owner("0f9a2c6e-user").unwrap();
        assert_eq!(hit.token_id, receipt.hit_token_id);
        assert_eq!(ledger.get_prvns_linked_to_hit(&hit.token_id), vec![receipt.prvn_token_id.clone()]);

        let identity: serde_json::Value = serde_json::from_str(&hit.metadata).unwrap();
        assert_eq!(identity["username"], "user_0f9a2c6e");
        assert_eq!(identity["type"], "identity");

        let prvn = ledger.get_prvn(&receipt.prvn_token_id).unwrap();
        assert_eq!(prvn.dataset_id, receipt.verification_id);
        let metadata: serde_json::Value = serde_json::from_str(&prvn.metadata).unwrap();
        assert_eq!(metadata["method"], "face");
        assert_eq!(metadata["status"], "verified");
        assert_eq!(metadata["deviceInfo"]["type"], "mobile");

        assert_eq!(receipt.device_type, "mobile");
        assert!(receipt.device_verified);
        assert_eq!(receipt.chain_id, 80002);
        assert_eq!(receipt.contract_address, ledger.config().identity.address);
    }

    #[test]
    fn test_repeat_verifications_share_identity_token() {
        let (recorder, clock) = recorder();

        let first = recorder
            .record_verification("user-1", VerificationMethod::Face, 0.91, None)
            .unwrap();
        clock.advance(Duration::minutes(5));
        let second = recorder
            .record_verification("user-1", VerificationMethod::Fingerprint, 0.99, None)
            .unwrap();

        assert_eq!(first.hit_token_id, second.hit_token_id);
        assert_ne!(first.prvn_token_id, second.prvn_token_id);
        assert_eq!(second.device_type, "unknown");

        let history = recorder.verification_history("user-1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.prvn_token_id);
        assert_eq!(history[0].method, VerificationMethod::Face);
        assert_eq!(history[1].method, VerificationMethod::Fingerprint);
        assert_eq!(history[1].timestamp - history[0].timestamp, Duration::minutes(5));
        assert_eq!(history[1].confidence, 0.99);
    }

    #[test]
    fn test_non_finite_confidence_is_rejected() {
        let (recorder, _) = recorder();

        for confidence in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                recorder.record_verification("user-1", VerificationMethod::Face, confidence, None),
                Err(RecordingError::NonFiniteConfidence(_))
            ));
        }

        let ledger = recorder.ledger();
        assert!(!ledger.has_hit("user-1"));
        assert!(ledger.prvns_owned_by("user-1").is_empty());

        recorder
            .record_verification("user-1", VerificationMethod::Face, 0.0, None)
            .unwrap();
        let history = recorder.verification_history("user-1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].confidence, 0.0);
    }

    #[test]
    fn test_history_for_unknown_user_is_empty() {
        let (recorder, _) = recorder();
        assert!(recorder.verification_history("nobody").is_empty());
    }

    #[test]
    fn test_history_skips_unreadable_metadata() {
        let (recorder, _) = recorder();
        let receipt = recorder
            .record_verification("user-1", VerificationMethod::Device, 1.0, None)
            .unwrap();

        let ledger = recorder.ledger();
        let foreign = ledger.issue_prvn("user-1", "manual-upload", "not json");
        ledger.link_hit_to_prvn(&receipt.hit_token_id, &foreign.token_id).unwrap();

        let history = recorder.verification_history("user-1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.prvn_token_id);
    }
}
