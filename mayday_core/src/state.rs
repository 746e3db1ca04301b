//! The mutable simulation state aggregate and its record types.
//!
//! `SimulationState` is exclusively owned by the session engine; every other
//! component operates on references to it. All sequences except the active
//! task set are append-only.

use crate::metrics::{MetricDelta, Metrics};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Formats elapsed session time as `MM:SS` for log entries and timestamps.
pub fn time_label(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// One participant of the exercise, set once at setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant name
    pub name: String,
    /// Corporate role played, e.g. "CEO"
    pub title: String,
}

/// The crisis scenario selected for this session, immutable once chosen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Crisis {
    /// Scenario headline
    pub title: String,
    /// Situation description, also fed into generation prompts
    pub description: String,
    /// Crisis-level gauge value the session opens with
    pub initial_crisis_level: f64,
}

/// Stakeholder categories NPCs are drawn from, in fixed generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcCategory {
    /// Press and broadcast
    Media,
    /// Influencers and bloggers
    SocialMedia,
    /// Customer accounts
    Customers,
    /// Subcontractors and supply chain
    Suppliers,
    /// Investors
    Investors,
    /// Board of directors
    Board,
}

/// NPC attitude used when prompting for messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// Concerned and demanding
    Negative,
    /// Concerned but constructive
    Constructive,
}

/// A simulated external stakeholder. Generated once at session start, never
/// removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Npc {
    /// Unique id, `npc-N`
    pub id: String,
    /// Stakeholder category
    pub category: NpcCategory,
    /// Role label, e.g. "Business reporter"
    pub role: String,
    /// Fixed attitude (negative in this design)
    pub sentiment: Sentiment,
    /// Per-NPC trust gauge
    pub trust_level: f64,
}

/// A message received from an NPC (distinct from the team chat).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcMessage {
    /// Sending NPC id
    pub npc_id: String,
    /// Sending NPC role label
    pub role: String,
    /// Message text
    pub content: String,
    /// `MM:SS` since session start
    pub time: String,
}

/// A message in the internal team chat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamMessage {
    /// Sender name
    pub sender: String,
    /// Sender role label
    pub role: String,
    /// Message text
    pub content: String,
    /// `MM:SS` since session start
    pub time: String,
}

/// Kinds of documents participants can author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Public statement to the press
    PressRelease,
    /// Message to the organisation
    InternalMemo,
    /// Legal risk assessment
    LegalBrief,
    /// Technical incident report
    TechnicalReport,
}

impl DocumentKind {
    /// Human-readable label used in event-log entries.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::PressRelease => "Press release",
            DocumentKind::InternalMemo => "Internal memo",
            DocumentKind::LegalBrief => "Legal brief",
            DocumentKind::TechnicalReport => "Technical report",
        }
    }
}

/// An authored artifact. Feedback arrives asynchronously after creation;
/// already-submitted documents are never rolled back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Unique id, `doc-N`
    pub id: String,
    /// Document kind
    pub kind: DocumentKind,
    /// Author, always a known participant
    pub author: String,
    /// Free-text content
    pub content: String,
    /// `MM:SS` since session start
    pub time: String,
    /// Generated stakeholder feedback, or a visible error marker
    pub feedback: Option<String>,
    /// Metrics impact already applied for this document, if any
    pub impact: Option<MetricDelta>,
}

/// One decision option of a task.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskOption {
    /// Choice text shown to participants
    pub text: String,
    /// Metrics impact applied when chosen
    pub impact: MetricDelta,
}

/// Seed tasks that can spawn a follow-up after a choice resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskTemplate {
    /// The opening media statement demand
    MediaInquiry,
    /// The key customer threatening to walk
    KeyCustomer,
}

/// An unscheduled task definition: what the catalog authors and what
/// follow-up spawns carry. The engine assigns the id and deadline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskDef {
    /// Template identity, present only on seed tasks with follow-ups
    pub template: Option<TaskTemplate>,
    /// Task headline
    pub title: String,
    /// Situation description
    pub description: String,
    /// Countdown length
    pub time_limit: Duration,
    /// Urgency flag (display hint)
    pub urgent: bool,
    /// Decision options
    pub options: Vec<TaskOption>,
}

/// A live timed decision in the active working set.
///
/// A task leaves the set exactly once, by choice or by deadline expiry, and
/// its id is never reused within a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, `task-N`
    pub id: String,
    /// Template identity carried over from the definition
    pub template: Option<TaskTemplate>,
    /// Task headline
    pub title: String,
    /// Situation description
    pub description: String,
    /// Absolute logical time the countdown expires at
    pub deadline: Duration,
    /// Urgency flag
    pub urgent: bool,
    /// Decision options
    pub options: Vec<TaskOption>,
}

impl Task {
    /// Remaining countdown at logical time `now` (zero once expired).
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline.saturating_sub(now)
    }
}

/// One entry of the append-only event log driving the final report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    /// `MM:SS` since session start
    pub time: String,
    /// What happened
    pub description: String,
}

/// The single source of truth for one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationState {
    /// Company under crisis
    pub company: String,
    /// Exercise participants, immutable after setup
    pub participants: Vec<Participant>,
    /// Selected crisis; `None` only before the session starts
    pub crisis: Option<Crisis>,
    /// The three health gauges
    pub metrics: Metrics,
    /// Generated stakeholders
    pub npcs: Vec<Npc>,
    /// Active working set of timed decisions
    pub current_tasks: Vec<Task>,
    /// Authored documents, append-only
    pub documents: Vec<Document>,
    /// Internal team chat, append-only
    pub team_chat: Vec<TeamMessage>,
    /// Messages received from NPCs, append-only
    pub messages: Vec<NpcMessage>,
    /// Audit trail, append-only
    pub event_log: Vec<EventEntry>,
}

impl SimulationState {
    /// Creates the pre-start state for a validated setup bundle.
    pub fn new(company: String, participants: Vec<Participant>) -> Self {
        Self {
            company,
            participants,
            crisis: None,
            metrics: Metrics::default(),
            npcs: Vec::new(),
            current_tasks: Vec::new(),
            documents: Vec::new(),
            team_chat: Vec::new(),
            messages: Vec::new(),
            event_log: Vec::new(),
        }
    }

    /// Appends a timestamped event-log entry.
    pub fn log_event(&mut self, now: Duration, description: impl Into<String>) {
        let description = description.into();
        info!(at = %time_label(now), "{}", description);
        self.event_log.push(EventEntry {
            time: time_label(now),
            description,
        });
    }

    /// Position of an active task by id.
    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.current_tasks.iter().position(|t| t.id == task_id)
    }

    /// True if the author references a known participant.
    pub fn knows_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_labels_are_mm_ss() {
        assert_eq!(time_label(Duration::ZERO), "00:00");
        assert_eq!(time_label(Duration::from_secs(65)), "01:05");
        assert_eq!(time_label(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn task_remaining_saturates() {
        let task = Task {
            id: "task-0".to_string(),
            template: None,
            title: "t".to_string(),
            description: "d".to_string(),
            deadline: Duration::from_secs(10),
            urgent: false,
            options: vec![],
        };
        assert_eq!(task.remaining(Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(task.remaining(Duration::from_secs(11)), Duration::ZERO);
    }

    #[test]
    fn event_log_is_chronological_append() {
        let mut state = SimulationState::new("Acme".to_string(), vec![]);
        state.log_event(Duration::from_secs(5), "first");
        state.log_event(Duration::from_secs(70), "second");
        assert_eq!(state.event_log.len(), 2);
        assert_eq!(state.event_log[0].time, "00:05");
        assert_eq!(state.event_log[1].time, "01:10");
    }
}
