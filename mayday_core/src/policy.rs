//! Interchangeable policy strategies and the engine configuration.
//!
//! Two near-duplicate ancestries of this exercise diverge on how document
//! feedback moves the gauges and on whether follow-up tasks always spawn.
//! Both behaviors are preserved here as selectable strategies instead of
//! picking one arbitrarily.

use crate::metrics::MetricDelta;
use crate::state::DocumentKind;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum word count the content heuristic rewards as "thorough".
const THOROUGH_WORD_COUNT: usize = 40;

const APOLOGY_PATTERNS: &[&str] = &["sorry", "apolog", "regret"];
const CORRECTIVE_PATTERNS: &[&str] = &["corrective", "investigat", "measure", "fix", "remed"];

/// How a successfully reviewed document moves the gauges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactPolicy {
    /// Small fixed positive nudge for any reviewed document
    FixedNudge,
    /// Deterministic impact computed from the document text itself
    ContentHeuristic,
}

impl ImpactPolicy {
    /// Computes the metrics impact of a reviewed document.
    pub fn document_impact(&self, kind: DocumentKind, content: &str) -> MetricDelta {
        match self {
            ImpactPolicy::FixedNudge => MetricDelta {
                reputation: Some(2.0),
                trust: Some(1.0),
                crisis_level: None,
            },
            ImpactPolicy::ContentHeuristic => content_heuristic(kind, content),
        }
    }
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

fn content_heuristic(kind: DocumentKind, content: &str) -> MetricDelta {
    let lowered = content.to_lowercase();
    let mut reputation = 0.0;
    let mut trust = 0.0;
    let mut crisis_level = 0.0;

    if lowered.split_whitespace().count() >= THOROUGH_WORD_COUNT {
        reputation += 1.0;
    }
    if contains_any(&lowered, APOLOGY_PATTERNS) {
        trust += 2.0;
    }
    if contains_any(&lowered, CORRECTIVE_PATTERNS) {
        reputation += 2.0;
        crisis_level -= 3.0;
    }
    if kind == DocumentKind::PressRelease {
        reputation += 1.0;
    }

    MetricDelta {
        reputation: (reputation != 0.0).then_some(reputation),
        trust: (trust != 0.0).then_some(trust),
        crisis_level: (crisis_level != 0.0).then_some(crisis_level),
    }
}

/// Whether a choice resolution schedules its follow-up task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FollowUpPolicy {
    /// Every eligible resolution spawns the follow-up
    Always,
    /// Spawns with the given probability
    Coin(f64),
}

impl FollowUpPolicy {
    /// Decides whether to schedule the follow-up, drawing from the session RNG.
    pub fn should_spawn(&self, rng: &mut ChaCha8Rng) -> bool {
        match self {
            FollowUpPolicy::Always => true,
            FollowUpPolicy::Coin(p) => rng.gen_bool(p.clamp(0.0, 1.0)),
        }
    }
}

/// Tunable engine parameters. Defaults reproduce the reference exercise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Document impact strategy
    pub impact_policy: ImpactPolicy,
    /// Follow-up spawn strategy
    pub follow_up_policy: FollowUpPolicy,
    /// Penalty applied when a task countdown expires
    pub timeout_penalty: MetricDelta,
    /// Delay between a choice resolution and its follow-up spawn
    pub follow_up_delay: Duration,
    /// NPC opening messages are delayed uniformly within this window
    pub npc_greeting_window: Duration,
    /// How many NPCs (in generation order) send an opening message
    pub npc_greeting_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            impact_policy: ImpactPolicy::FixedNudge,
            follow_up_policy: FollowUpPolicy::Always,
            timeout_penalty: MetricDelta::all(-10.0, -10.0, 5.0),
            follow_up_delay: Duration::from_secs(3),
            npc_greeting_window: Duration::from_millis(5000),
            npc_greeting_count: 3,
        }
    }
}
