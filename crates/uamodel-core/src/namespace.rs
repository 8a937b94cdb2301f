// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The server namespace table.
//!
//! Maps namespace URIs to the indexes used inside [`NodeId`](crate::NodeId)s
//! and [`QualifiedName`](crate::QualifiedName)s. Index 0 is always the OPC UA
//! base namespace. Registration is append-only, so an index once handed out
//! stays valid for the lifetime of the table.
//!
//! The table counts URI lookups; callers that promise to resolve namespaces
//! only once can be checked against [`NamespaceTable::statistics`].

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::NamespaceError;
use crate::types::OPC_UA_NAMESPACE_URI;

// =============================================================================
// NamespaceTable
// =============================================================================

/// Thread-safe, append-only namespace URI table.
#[derive(Debug)]
pub struct NamespaceTable {
    uris: RwLock<Vec<String>>,
    stats: NamespaceStats,
}

#[derive(Debug, Default)]
struct NamespaceStats {
    lookups: AtomicU64,
    misses: AtomicU64,
    registrations: AtomicU64,
}

impl NamespaceTable {
    /// Largest number of namespaces an index can address.
    pub const MAX_NAMESPACES: usize = u16::MAX as usize + 1;

    /// Creates a table holding only the base namespace.
    pub fn new() -> Self {
        Self {
            uris: RwLock::new(vec![OPC_UA_NAMESPACE_URI.to_string()]),
            stats: NamespaceStats::default(),
        }
    }

    /// Creates a table with the base namespace followed by `uris`.
    pub fn with_uris<I, S>(uris: I) -> Result<Self, NamespaceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = Self::new();
        for uri in uris {
            table.try_register(uri)?;
        }
        Ok(table)
    }

    /// Registers `uri` and returns its index.
    ///
    /// Registering an already known URI returns the existing index. A full
    /// table yields `u16::MAX`; use [`try_register`](Self::try_register) to
    /// observe that failure.
    pub fn register(&self, uri: impl Into<String>) -> u16 {
        self.try_register(uri).unwrap_or(u16::MAX)
    }

    /// Registers `uri` and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::TableFull`] when all 65536 indexes are taken.
    pub fn try_register(&self, uri: impl Into<String>) -> Result<u16, NamespaceError> {
        let uri = uri.into();
        let mut uris = self.uris.write();

        if let Some(index) = uris.iter().position(|u| *u == uri) {
            return Ok(index as u16);
        }
        if uris.len() >= Self::MAX_NAMESPACES {
            return Err(NamespaceError::TableFull);
        }

        uris.push(uri);
        self.stats.registrations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(uri = %uris[uris.len() - 1], index = uris.len() - 1, "Namespace registered");
        Ok((uris.len() - 1) as u16)
    }

    /// Returns the index of `uri`, if registered.
    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.stats.lookups.fetch_add(1, Ordering::Relaxed);
        let index = self
            .uris
            .read()
            .iter()
            .position(|u| u == uri)
            .map(|i| i as u16);
        if index.is_none() {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }
        index
    }

    /// Returns the URI registered at `index`.
    pub fn uri(&self, index: u16) -> Option<String> {
        self.uris.read().get(index as usize).cloned()
    }

    /// Returns the number of registered namespaces.
    pub fn len(&self) -> usize {
        self.uris.read().len()
    }

    /// Always `false`; the base namespace is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a copy of all registered URIs in index order.
    pub fn uris(&self) -> Vec<String> {
        self.uris.read().clone()
    }

    /// Returns a snapshot of the lookup counters.
    pub fn statistics(&self) -> NamespaceStatistics {
        NamespaceStatistics {
            lookups: self.stats.lookups.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            registrations: self.stats.registrations.load(Ordering::Relaxed),
        }
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`NamespaceTable`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceStatistics {
    /// Number of `index_of` calls.
    pub lookups: u64,
    /// Number of `index_of` calls for unregistered URIs.
    pub misses: u64,
    /// Number of URIs registered after construction of the base namespace.
    pub registrations: u64,
}

// =============================================================================
// Tests
// =============================================================================
