//! Mayday Core - Crisis-Exercise State Engine
//!
//! This library is the deterministic heart of a crisis-management training
//! simulation: a fictional company's executive team rides out a reputation
//! crisis while the engine tracks three health gauges, runs timed decision
//! tasks, reviews authored documents and feeds stakeholder reactions back in.
//!
//! The engine is Sans-IO over [`mayday_env::EnvContext`]: time is a logical
//! clock the driver advances, randomness flows from a single seed, and the
//! only external calls are text-generation requests behind
//! [`mayday_env::TextGenerator`]. The same session replays identically under
//! a scripted environment.

pub mod catalog;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod setup;
pub mod state;

// Re-export key types for convenience
pub use error::EngineError;
pub use metrics::{CrisisBand, MetricDelta, Metrics};
pub use policy::{EngineConfig, FollowUpPolicy, ImpactPolicy};
pub use report::SessionReport;
pub use session::{SessionEngine, SessionPhase};
pub use setup::{verify_endpoint, SessionSetup};
pub use state::{DocumentKind, Participant, SimulationState};
