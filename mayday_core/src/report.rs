//! End-of-session report compiler.
//!
//! A pure function of the final state and the end time: no randomness, no
//! clock reads, identical inputs always produce an identical report.

use crate::state::{EventEntry, SimulationState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The facilitator-facing summary of one completed session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session length in whole minutes
    pub duration_minutes: u64,
    /// Final reputation, rounded
    pub reputation: i64,
    /// Final trust, rounded
    pub trust: i64,
    /// Final crisis level, rounded
    pub crisis_level: i64,
    /// Number of event-log entries
    pub events_logged: usize,
    /// Full chronology in append order
    pub timeline: Vec<EventEntry>,
    /// Qualitative strength bullets
    pub strengths: Vec<String>,
    /// Qualitative improvement bullets
    pub improvements: Vec<String>,
    /// Closing overall assessment
    pub assessment: String,
}

/// Derives the report from the final state and the session end time.
pub fn compile(state: &SimulationState, ended_at: Duration) -> SessionReport {
    let mut strengths = Vec::new();
    if state.metrics.reputation > 60.0 {
        strengths.push("Reputation held up reasonably well through the crisis".to_string());
    }
    if !state.documents.is_empty() {
        strengths.push("Active communication toward stakeholders".to_string());
    }
    if state.team_chat.len() > 5 {
        strengths.push("Good internal communication".to_string());
    }

    let mut improvements = Vec::new();
    if state.metrics.reputation < 50.0 {
        improvements
            .push("Reputation management needs faster and more decisive action".to_string());
    }
    if state.documents.len() < 2 {
        improvements.push("More active documentation and communication is needed".to_string());
    }
    if state.metrics.trust < 50.0 {
        improvements.push("Building stakeholder trust needs more attention".to_string());
    }

    let verdict = if state.metrics.reputation > 60.0 {
        "managed reasonably well"
    } else {
        "needs more practice"
    };
    let assessment = format!(
        "Overall the executive team {} in handling a reputation crisis. \
         Rapid response, transparent communication and consistent \
         decision-making matter most.",
        verdict
    );

    SessionReport {
        duration_minutes: ended_at.as_secs() / 60,
        reputation: state.metrics.reputation.round() as i64,
        trust: state.metrics.trust.round() as i64,
        crisis_level: state.metrics.crisis_level.round() as i64,
        events_logged: state.event_log.len(),
        timeline: state.event_log.clone(),
        strengths,
        improvements,
        assessment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Participant;

    fn final_state() -> SimulationState {
        let mut state = SimulationState::new(
            "Acme".to_string(),
            vec![Participant {
                name: "Aino".to_string(),
                title: "CEO".to_string(),
            }],
        );
        state.metrics.reputation = 66.4;
        state.metrics.trust = 44.0;
        state.metrics.crisis_level = 71.5;
        state.log_event(Duration::from_secs(30), "Task resolved: Media inquiry");
        state.log_event(Duration::from_secs(95), "Task timed out: Key customer concern");
        state
    }

    #[test]
    fn report_is_deterministic() {
        let state = final_state();
        let a = compile(&state, Duration::from_secs(181));
        let b = compile(&state, Duration::from_secs(181));
        assert_eq!(a, b);
    }

    #[test]
    fn duration_is_whole_minutes_and_metrics_round() {
        let report = compile(&final_state(), Duration::from_secs(181));
        assert_eq!(report.duration_minutes, 3);
        assert_eq!(report.reputation, 66);
        assert_eq!(report.trust, 44);
        assert_eq!(report.crisis_level, 72);
        assert_eq!(report.events_logged, 2);
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].time, "00:30");
    }

    #[test]
    fn threshold_bullets() {
        let state = final_state();
        let report = compile(&state, Duration::from_secs(60));

        // reputation 66.4 > 60, no documents, chat empty
        assert!(report
            .strengths
            .iter()
            .any(|s| s.contains("Reputation held up")));
        assert_eq!(report.strengths.len(), 1);

        // documents < 2 and trust < 50
        assert_eq!(report.improvements.len(), 2);
        assert!(report.assessment.contains("managed reasonably well"));

        let mut low = state;
        low.metrics.reputation = 40.0;
        let report = compile(&low, Duration::from_secs(60));
        assert!(report
            .improvements
            .iter()
            .any(|s| s.contains("faster and more decisive")));
        assert!(report.assessment.contains("needs more practice"));
    }
}
