//! Error types for the `citylife-agents` crate.
//!
//! All operations that can fail return typed errors rather than
//! panicking. Commute errors wrap the world crate's route and line
//! failures; roster errors guard the employment invariants (a person is
//! on at most one roster, and in the unemployed pool at most once).

use citylife_types::{BusinessId, PersonId};
use citylife_world::WorldError;

/// Errors that can occur during agent state operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A route or line lookup against the transport network failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A person is in the moving state without a scheduled arrival.
    #[error("person {0} is moving without a scheduled arrival")]
    MissingArrival(PersonId),

    /// A hire was attempted against a business at full headcount.
    #[error("business {business} is at full headcount ({headcount})")]
    RosterFull {
        /// The business whose roster is full.
        business: BusinessId,
        /// The maximum headcount of that business.
        headcount: usize,
    },

    /// A fire or pay lookup named a person not on the roster.
    #[error("person {person} is not employed by business {business}")]
    NotEmployed {
        /// The person that was looked up.
        person: PersonId,
        /// The business whose roster was searched.
        business: BusinessId,
    },

    /// A hire named a person already on the roster.
    #[error("person {person} is already employed by business {business}")]
    AlreadyEmployed {
        /// The person that was offered.
        person: PersonId,
        /// The business that already employs them.
        business: BusinessId,
    },

    /// A person was enqueued into the unemployed pool twice.
    #[error("person {0} is already in the unemployed pool")]
    AlreadyPooled(PersonId),
}
