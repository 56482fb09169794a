//! The numbering authority: strictly increasing queue numbers per scope.
//!
//! Issuance is an atomic increment of the per-scope last-issued number; two
//! concurrent booking requests can never observe the same value. Numbers are
//! never reused or reassigned, and a fresh scope starts at 1.

use deskline_core::scope::Scope;
use deskline_core::types::QueueNumber;
use std::collections::HashMap;
use std::sync::Mutex;

/// Issues unique, strictly increasing queue numbers per scope.
///
/// Independent of ticket content: the authority only tracks the last number
/// handed out for each (office, date) partition.
#[derive(Debug, Default)]
pub struct NumberingAuthority {
    last_issued: Mutex<HashMap<Scope, QueueNumber>>,
}

impl NumberingAuthority {
    /// Create an authority with no numbers issued.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_issued: Mutex::new(HashMap::new()),
        }
    }

    /// Issue the next queue number for a scope.
    ///
    /// Strictly greater than every number previously issued for the scope;
    /// atomic with respect to concurrent callers.
    #[allow(clippy::missing_panics_doc)] // Poisoned lock is recovered, not propagated
    pub fn issue(&self, scope: &Scope) -> QueueNumber {
        let mut last_issued = self
            .last_issued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let next = last_issued
            .get(scope)
            .map_or(QueueNumber::new(1), |last| last.next());
        last_issued.insert(scope.clone(), next);
        next
    }

    /// The last number issued for a scope, if any.
    #[allow(clippy::missing_panics_doc)] // Poisoned lock is recovered, not propagated
    #[must_use]
    pub fn last_issued(&self, scope: &Scope) -> Option<QueueNumber> {
        self.last_issued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(scope)
            .copied()
    }
}
