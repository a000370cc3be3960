//! Calculation storage.
//!
//! [`CalculationRepository`] is the narrow interface the provider needs.
//! [`InMemoryRepository`] backs it with a `DashMap`, so concurrent requests
//! never observe a half-applied write.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use calcstack_model::types::Calculation;

/// Errors raised by a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No record with the given id.
    #[error("calculation not found: {id}")]
    NotFound {
        /// The requested id.
        id: String,
    },
    /// A record with the given id already exists.
    #[error("calculation already exists: {id}")]
    AlreadyExists {
        /// The conflicting id.
        id: String,
    },
}

/// Storage for calculation records.
pub trait CalculationRepository: Send + Sync + fmt::Debug {
    /// Insert a new record.
    fn create(&self, calculation: Calculation) -> Result<Calculation, StorageError>;

    /// All records, oldest first.
    fn list(&self) -> Vec<Calculation>;

    /// Fetch one record.
    fn get(&self, id: &str) -> Result<Calculation, StorageError>;

    /// Replace the expression and result of a record and bump `updated_at`.
    fn update(
        &self,
        id: &str,
        expression: String,
        result: String,
        now: DateTime<Utc>,
    ) -> Result<Calculation, StorageError>;

    /// Remove a record, returning it.
    fn delete(&self, id: &str) -> Result<Calculation, StorageError>;
}

/// A stored record with its insertion sequence number.
#[derive(Debug)]
struct StoredCalculation {
    seq: u64,
    calculation: Calculation,
}

/// In-memory repository. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: DashMap<String, StoredCalculation>,
    next_seq: AtomicU64,
}

impl InMemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CalculationRepository for InMemoryRepository {
    fn create(&self, calculation: Calculation) -> Result<Calculation, StorageError> {
        // Entry API makes the check and the insert atomic.
        match self.entries.entry(calculation.id.clone()) {
            Entry::Occupied(e) => Err(StorageError::AlreadyExists {
                id: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                e.insert(StoredCalculation {
                    seq,
                    calculation: calculation.clone(),
                });
                Ok(calculation)
            }
        }
    }

    fn list(&self) -> Vec<Calculation> {
        let mut stored: Vec<(u64, Calculation)> = self
            .entries
            .iter()
            .map(|r| (r.seq, r.calculation.clone()))
            .collect();
        stored.sort_by_key(|(seq, _)| *seq);
        stored.into_iter().map(|(_, c)| c).collect()
    }

    fn get(&self, id: &str) -> Result<Calculation, StorageError> {
        self.entries
            .get(id)
            .map(|r| r.calculation.clone())
            .ok_or_else(|| StorageError::NotFound { id: id.to_owned() })
    }

    fn update(
        &self,
        id: &str,
        expression: String,
        result: String,
        now: DateTime<Utc>,
    ) -> Result<Calculation, StorageError> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_owned() })?;
        let calculation = &mut entry.calculation;
        calculation.expression = expression;
        calculation.result = result;
        calculation.updated_at = now;
        Ok(calculation.clone())
    }

    fn delete(&self, id: &str) -> Result<Calculation, StorageError> {
        self.entries
            .remove(id)
            .map(|(_, stored)| stored.calculation)
            .ok_or_else(|| StorageError::NotFound { id: id.to_owned() })
    }
}
