//! pet-core: a deterministic virtual-pet simulation engine.
//!
//! The engine is a pure function of `(snapshot, now, optional action)`.
//! Hosts own the tick source, the clock and persistence; see `engine`.

pub mod achievement;
pub mod clock;
pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod event;
pub mod growth;
pub mod interaction;
pub mod mood;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod types;

pub use engine::{PetEngine, Step};
pub use error::{SimError, SimResult};
pub use interaction::InteractionKind;
pub use snapshot::PetSnapshot;
