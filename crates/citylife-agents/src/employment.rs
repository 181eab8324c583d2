//! The unemployed pool.
//!
//! The employment office holds every person not currently on a business
//! roster, in first-in first-out order. Matching itself is driven from
//! the business observer pass each tick: businesses with open headcount
//! take candidates from the front of the queue, and fired employees go
//! to the back.

use std::collections::VecDeque;

use citylife_types::PersonId;
use tracing::debug;

use crate::error::AgentError;

/// FIFO pool of persons not currently employed.
#[derive(Debug, Clone, Default)]
pub struct EmploymentOffice {
    pool: VecDeque<PersonId>,
}

impl EmploymentOffice {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person to the back of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AlreadyPooled`] if the person is already
    /// queued; a person is in the pool at most once.
    pub fn enqueue(&mut self, person_id: PersonId) -> Result<(), AgentError> {
        if self.pool.contains(&person_id) {
            return Err(AgentError::AlreadyPooled(person_id));
        }
        self.pool.push_back(person_id);
        debug!(person = %person_id, pool = self.pool.len(), "joined unemployed pool");
        Ok(())
    }

    /// Take the longest-waiting person from the pool.
    pub fn take_next(&mut self) -> Option<PersonId> {
        self.pool.pop_front()
    }

    /// Whether the given person is waiting in the pool.
    pub fn contains(&self, person_id: PersonId) -> bool {
        self.pool.contains(&person_id)
    }

    /// Number of persons waiting.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
