//! The three clamped percentage gauges and their bounded-delta updates.

use serde::{Deserialize, Serialize};

/// Clamps a gauge value to the [0, 100] band.
fn clamp_gauge(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// A partial metrics change. Absent fields leave the gauge untouched.
///
/// A present zero is applied as a no-op; under clamping the two readings are
/// observably identical, so callers may use either.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// Reputation change, if any
    pub reputation: Option<f64>,
    /// Trust change, if any
    pub trust: Option<f64>,
    /// Crisis-level change, if any
    pub crisis_level: Option<f64>,
}

impl MetricDelta {
    /// Delta touching reputation and trust only (the common task-impact shape).
    pub fn reputation_trust(reputation: f64, trust: f64) -> Self {
        Self {
            reputation: Some(reputation),
            trust: Some(trust),
            crisis_level: None,
        }
    }

    /// Delta touching all three gauges.
    pub fn all(reputation: f64, trust: f64, crisis_level: f64) -> Self {
        Self {
            reputation: Some(reputation),
            trust: Some(trust),
            crisis_level: Some(crisis_level),
        }
    }

    /// True if no field is present.
    pub fn is_empty(&self) -> bool {
        self.reputation.is_none() && self.trust.is_none() && self.crisis_level.is_none()
    }
}

/// Crisis severity bands shown to the facilitator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisBand {
    /// 0-24
    Low,
    /// 25-49
    Moderate,
    /// 50-74
    High,
    /// 75-100
    Critical,
}

impl CrisisBand {
    /// Maps a crisis level to its band.
    pub fn from_level(level: f64) -> Self {
        match (level / 25.0) as u32 {
            0 => CrisisBand::Low,
            1 => CrisisBand::Moderate,
            2 => CrisisBand::High,
            _ => CrisisBand::Critical,
        }
    }

    /// Human-readable band label.
    pub fn label(&self) -> &'static str {
        match self {
            CrisisBand::Low => "Low",
            CrisisBand::Moderate => "Moderate",
            CrisisBand::High => "High",
            CrisisBand::Critical => "Critical",
        }
    }
}

/// The three simulation health gauges, each clamped to [0, 100].
///
/// Mutated only through [`Metrics::apply`], one delta at a time, clamping
/// after each. Never fails.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Public reputation gauge
    pub reputation: f64,
    /// Stakeholder trust gauge
    pub trust: f64,
    /// Crisis severity gauge
    pub crisis_level: f64,
}

impl Default for Metrics {
    /// Baseline gauges at session setup, before the scenario's initial
    /// crisis level is applied.
    fn default() -> Self {
        Self {
            reputation: 70.0,
            trust: 60.0,
            crisis_level: 80.0,
        }
    }
}

impl Metrics {
    /// Applies a partial delta, clamping each touched gauge to [0, 100].
    pub fn apply(&mut self, delta: &MetricDelta) {
        if let Some(d) = delta.reputation {
            self.reputation = clamp_gauge(self.reputation + d);
        }
        if let Some(d) = delta.trust {
            self.trust = clamp_gauge(self.trust + d);
        }
        if let Some(d) = delta.crisis_level {
            self.crisis_level = clamp_gauge(self.crisis_level + d);
        }
    }

    /// Current crisis severity band.
    pub fn crisis_band(&self) -> CrisisBand {
        CrisisBand::from_level(self.crisis_level)
    }
}
