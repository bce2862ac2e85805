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

use tracing::debug;

/// Identity token id to the provenance tokens produced under it.
///
/// Existence of either token is checked by [`crate::Ledger`] before linking.
#[derive(Debug, Default)]
pub struct LinkIndex {
    links: HashMap<String, Vec<String>>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link. Returns `false` if the pair was already linked.
    pub fn link(&mut self, hit_token_id: &str, prvn_token_id: &str) -> bool {
        let linked = self.links.entry(hit_token_id.to_string()).or_default();
        if linked.iter().any(|id| id == prvn_token_id) {
            return false;
        }

        linked.push(prvn_token_id.to_string());
        debug!("Linked provenance token {} to identity token {}", prvn_token_id, hit_token_id);
        true
    }

    /// Provenance token ids linked to a HIT, in link order
    pub fn linked_to(&self, hit_token_id: &str) -> Vec<String> {
        self.links.get(hit_token_id).cloned().unwrap_or_default()
    }

    /// Drop every link held by a HIT, returning how many there were
    pub fn remove_hit(&mut self, hit_token_id: &str) -> usize {
        self.links.remove(hit_token_id).map_or(0, |linked| linked.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_is_idempotent() {
        let mut index = LinkIndex::new();
        assert!(index.link("hit-1", "prvn-1"));
        assert!(!index.link("hit-1", "prvn-1"));
        assert!(index.link("hit-1", "prvn-2"));

        assert_eq!(index.linked_to("hit-1"), vec!["prvn-1", "prvn-2"]);
    }

    #[test]
    fn test_unknown_hit_has_no_links() {
        let index = LinkIndex::new();
        assert!(index.linked_to("hit-404").is_empty());
    }

    #[test]
    fn test_remove_hit() {
        let mut index = LinkIndex::new();
        index.link("hit-1", "prvn-1");
        index.link("hit-1", "prvn-2");

        assert_eq!(index.remove_hit("hit-1"), 2);
        assert!(index.linked_to("hit-1").is_empty());
        assert_eq!(index.remove_hit("hit-1"), 0);
    }
}
