//! The session controller: owns the simulation state and its lifecycle.
//!
//! All mutation happens on a single logical thread. The engine keeps a
//! logical clock that the driver advances (`advance`); due scheduler entries
//! are dispatched one at a time, and every dispatch or post-await
//! continuation re-checks that the session is still active. Suspension
//! points are exactly the external text-generation calls.

use crate::catalog;
use crate::error::EngineError;
use crate::policy::EngineConfig;
use crate::report::{self, SessionReport};
use crate::scheduler::{Action, Scheduler};
use crate::setup::SessionSetup;
use crate::state::{
    time_label, Crisis, Document, DocumentKind, NpcMessage, Sentiment, SimulationState, Task,
    TaskDef, TeamMessage,
};
use mayday_env::{ChatMessage, EnvContext, TextGenerator};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Domain tag for the session RNG derivation.
const SESSION_RNG_DOMAIN: u64 = 0x6d61_7964_6179; // "mayday"

const SYSTEM_PROMPT: &str = "You are an expert in reputation crisis management. \
    Always answer concisely and realistically.";

/// Visible marker attached to a document when feedback generation fails.
pub const FEEDBACK_FAILED_MARKER: &str = "⚠️ Error analyzing stakeholder reactions";

/// Deterministic fallback message appended when NPC generation fails.
pub fn npc_fallback_message(role: &str) -> String {
    format!("[{}] requires urgent clarification.", role)
}

/// Session lifecycle phases. Linear; no backward transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Configuration collected, nothing running
    Setup,
    /// Crisis live, state mutable
    Active,
    /// Frozen; only the report remains
    Ended,
}

/// The session engine: single owner of [`SimulationState`].
///
/// Constructed from a validated setup bundle; callers must have run the
/// connection probe (`setup::verify_endpoint`) before `start()`.
pub struct SessionEngine {
    config: EngineConfig,
    generator: Arc<dyn TextGenerator>,
    phase: SessionPhase,
    now: Duration,
    state: SimulationState,
    scheduler: Scheduler,
    rng: ChaCha8Rng,
    next_task_id: u64,
    ended_at: Option<Duration>,
}

impl SessionEngine {
    /// Creates an engine in the Setup phase from a validated bundle.
    pub fn new(
        setup: SessionSetup,
        config: EngineConfig,
        ctx: Arc<dyn EnvContext>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, EngineError> {
        setup.validate()?;
        Ok(Self {
            config,
            generator,
            phase: SessionPhase::Setup,
            now: Duration::ZERO,
            state: SimulationState::new(setup.company, setup.participants),
            scheduler: Scheduler::new(),
            rng: ctx.derive_rng(SESSION_RNG_DOMAIN),
            next_task_id: 0,
            ended_at: None,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current logical time since session start.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Read access to the simulation state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Number of pending scheduler entries (deadlines, spawns, greetings).
    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    /// Enters the Active phase: selects the crisis, generates the NPC
    /// roster, seeds the authored initial tasks and schedules the NPC
    /// opening messages.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.phase != SessionPhase::Setup {
            return Err(EngineError::AlreadyStarted);
        }
        self.phase = SessionPhase::Active;

        let scenario = &catalog::CRISIS_SCENARIOS[self.rng.gen_range(0..catalog::CRISIS_SCENARIOS.len())];
        self.state.crisis = Some(Crisis {
            title: scenario.title.to_string(),
            description: scenario.description.to_string(),
            initial_crisis_level: scenario.initial_crisis_level,
        });
        self.state.metrics.crisis_level = scenario.initial_crisis_level;

        self.state.npcs = catalog::npc_roster();

        for def in catalog::initial_tasks() {
            self.insert_task(def);
        }

        let window_ms = self.config.npc_greeting_window.as_millis().max(1) as u64;
        let greeters: Vec<String> = self
            .state
            .npcs
            .iter()
            .take(self.config.npc_greeting_count)
            .map(|n| n.id.clone())
            .collect();
        for npc_id in greeters {
            let delay = Duration::from_millis(self.rng.gen_range(0..window_ms));
            self.scheduler
                .schedule(self.now + delay, Action::NpcGreeting { npc_id });
        }

        info!(
            company = %self.state.company,
            crisis = %scenario.title,
            "session started"
        );
        Ok(())
    }

    /// Advances the logical clock and dispatches every due action in
    /// (due, insertion) order. No-op unless the session is active.
    ///
    /// The clock steps to each entry's own due time before dispatch, so
    /// timestamps and spawned deadlines stay exact under coarse advances.
    pub async fn advance(&mut self, dt: Duration) {
        if self.phase != SessionPhase::Active {
            return;
        }
        let target = self.now + dt;
        while let Some((due, action)) = self.scheduler.pop_due(target) {
            if self.phase != SessionPhase::Active {
                break;
            }
            self.now = self.now.max(due);
            match action {
                Action::TaskDeadline { task_id } => self.on_deadline(&task_id),
                Action::SpawnTask { def } => {
                    self.insert_task(def);
                }
                Action::NpcGreeting { npc_id } => self.deliver_npc_message(&npc_id).await,
            }
        }
        self.now = target;
    }

    /// Resolves an active task by participant choice.
    ///
    /// Removes the task from the working set first, then applies the chosen
    /// option's impact, logs the resolution and consults the follow-up
    /// policy. Valid only while the task is in the working set.
    pub fn resolve_choice(&mut self, task_id: &str, option_index: usize) -> Result<(), EngineError> {
        if self.phase != SessionPhase::Active {
            return Err(EngineError::NotActive);
        }
        let idx = self
            .state
            .task_index(task_id)
            .ok_or_else(|| EngineError::UnknownTask(task_id.to_string()))?;
        if option_index >= self.state.current_tasks[idx].options.len() {
            return Err(EngineError::UnknownOption {
                task: task_id.to_string(),
                index: option_index,
            });
        }

        // Remove first so the stale deadline entry can never fire for it.
        let task = self.state.current_tasks.remove(idx);
        let option = task.options[option_index].clone();

        self.state.metrics.apply(&option.impact);
        self.state.log_event(
            self.now,
            format!("Task resolved: {} (choice: {})", task.title, option.text),
        );

        if let Some(template) = task.template {
            if self.config.follow_up_policy.should_spawn(&mut self.rng) {
                let def = catalog::follow_up(template, &option);
                self.scheduler
                    .schedule(self.now + self.config.follow_up_delay, Action::SpawnTask { def });
                debug!(task = %task.id, "follow-up scheduled");
            }
        }
        Ok(())
    }

    /// Submits an authored document and requests stakeholder feedback.
    ///
    /// The document is recorded before the generation call; a feedback
    /// failure attaches a visible error marker and never rolls the document
    /// back. Returns the document id.
    pub async fn submit_document(
        &mut self,
        kind: DocumentKind,
        author: &str,
        content: &str,
    ) -> Result<String, EngineError> {
        if self.phase != SessionPhase::Active {
            return Err(EngineError::NotActive);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(EngineError::EmptyDocument);
        }
        if !self.state.knows_participant(author) {
            return Err(EngineError::UnknownAuthor(author.to_string()));
        }
        let Some(crisis) = self.state.crisis.clone() else {
            return Err(EngineError::NotActive);
        };

        let doc_id = format!("doc-{}", self.state.documents.len());
        self.state.documents.push(Document {
            id: doc_id.clone(),
            kind,
            author: author.to_string(),
            content: content.to_string(),
            time: time_label(self.now),
            feedback: None,
            impact: None,
        });
        self.state.log_event(
            self.now,
            format!("Document published: {} ({})", kind.label(), author),
        );

        let prompt = feedback_prompt(&self.state.company, &crisis, kind, content);
        let outcome = self.generator.generate(&prompt).await;

        // The response may arrive after the facilitator ended the session.
        if self.phase != SessionPhase::Active {
            return Ok(doc_id);
        }
        match outcome {
            Ok(text) => {
                let impact = self.config.impact_policy.document_impact(kind, content);
                self.state.metrics.apply(&impact);
                if let Some(doc) = self.state.documents.iter_mut().find(|d| d.id == doc_id) {
                    doc.feedback = Some(text);
                    doc.impact = Some(impact);
                }
            }
            Err(err) => {
                warn!(document = %doc_id, error = %err, "feedback generation failed");
                if let Some(doc) = self.state.documents.iter_mut().find(|d| d.id == doc_id) {
                    doc.feedback = Some(FEEDBACK_FAILED_MARKER.to_string());
                }
            }
        }
        Ok(doc_id)
    }

    /// Appends a message to the internal team chat. Blank messages are
    /// ignored, matching the input surface's behavior.
    pub fn post_team_message(
        &mut self,
        sender: &str,
        role: &str,
        content: &str,
    ) -> Result<(), EngineError> {
        if self.phase != SessionPhase::Active {
            return Err(EngineError::NotActive);
        }
        let content = content.trim();
        if content.is_empty() {
            return Ok(());
        }
        self.state.team_chat.push(TeamMessage {
            sender: sender.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            time: time_label(self.now),
        });
        Ok(())
    }

    /// Ends the session. Requires explicit confirmation; without it the
    /// session remains active. Cancels every pending scheduled action,
    /// freezes the state and compiles the report.
    pub fn end(&mut self, confirmed: bool) -> Result<SessionReport, EngineError> {
        if !confirmed {
            return Err(EngineError::NotConfirmed);
        }
        if self.phase != SessionPhase::Active {
            return Err(EngineError::NotActive);
        }
        self.phase = SessionPhase::Ended;
        self.ended_at = Some(self.now);
        self.scheduler.clear();
        info!(duration = %time_label(self.now), "session ended");
        Ok(report::compile(&self.state, self.now))
    }

    /// The report of an ended session.
    pub fn report(&self) -> Option<SessionReport> {
        self.ended_at
            .map(|ended| report::compile(&self.state, ended))
    }

    /// Inserts a task definition into the working set with a fresh id and
    /// an absolute deadline, and schedules its countdown expiry.
    fn insert_task(&mut self, def: TaskDef) -> String {
        let id = format!("task-{}", self.next_task_id);
        self.next_task_id += 1;
        let deadline = self.now + def.time_limit;
        self.scheduler
            .schedule(deadline, Action::TaskDeadline { task_id: id.clone() });
        debug!(task = %id, title = %def.title, "task activated");
        self.state.current_tasks.push(Task {
            id: id.clone(),
            template: def.template,
            title: def.title,
            description: def.description,
            deadline,
            urgent: def.urgent,
            options: def.options,
        });
        id
    }

    /// Handles a countdown expiry. Entries for tasks that were already
    /// resolved by choice are stale and ignored.
    fn on_deadline(&mut self, task_id: &str) {
        let Some(idx) = self.state.task_index(task_id) else {
            return;
        };
        let task = self.state.current_tasks.remove(idx);
        let penalty = self.config.timeout_penalty;
        self.state.metrics.apply(&penalty);
        warn!(task = %task.id, title = %task.title, "task timed out");
        self.state
            .log_event(self.now, format!("Task timed out: {}", task.title));
    }

    /// Generates and appends one NPC's opening message. Generation failure
    /// substitutes the deterministic fallback; it never propagates.
    async fn deliver_npc_message(&mut self, npc_id: &str) {
        let Some(npc) = self.state.npcs.iter().find(|n| n.id == npc_id) else {
            return;
        };
        let (role, sentiment) = (npc.role.clone(), npc.sentiment);
        let Some(crisis) = self.state.crisis.clone() else {
            return;
        };
        let prompt = npc_prompt(&self.state.company, &crisis, &role, sentiment);

        let content = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(npc = %npc_id, error = %err, "NPC message generation failed");
                npc_fallback_message(&role)
            }
        };
        if self.phase != SessionPhase::Active {
            return;
        }
        self.state.messages.push(NpcMessage {
            npc_id: npc_id.to_string(),
            role,
            content,
            time: time_label(self.now),
        });
    }
}

fn npc_prompt(company: &str, crisis: &Crisis, role: &str, sentiment: Sentiment) -> Vec<ChatMessage> {
    let tone = match sentiment {
        Sentiment::Negative => "concerned and demanding",
        Sentiment::Constructive => "concerned but constructive",
    };
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "You are {} reacting to the following corporate reputation crisis:\n\n\
             Company: {}\nCrisis: {}\n\n\
             Write a short (2-3 sentences), realistic message or question this \
             person would send to the company. Be {}.",
            role, company, crisis.description, tone
        )),
    ]
}

fn feedback_prompt(
    company: &str,
    crisis: &Crisis,
    kind: DocumentKind,
    content: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Assess the following document published by {} during a reputation \
             crisis:\n\nCrisis: {}\n\nDocument ({}):\n{}\n\n\
             Give a short (1-2 sentences) assessment of how different \
             stakeholders (media, customers, investors) would likely react to \
             this document. Be realistic and critical.",
            company, crisis.description, kind.label(), content
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::verify_endpoint;
    use crate::state::Participant;
    use async_trait::async_trait;
    use mayday_env::{Endpoint, GeneratorError};
    use rand::SeedableRng;

    struct TestContext {
        seed: u64,
    }

    #[async_trait]
    impl EnvContext for TestContext {
        fn now(&self) -> Duration {
            Duration::ZERO
        }

        async fn sleep(&self, _duration: Duration) {}

        fn derive_rng(&self, seed_extension: u64) -> ChaCha8Rng {
            ChaCha8Rng::seed_from_u64(
                self.seed.wrapping_mul(0x517c_c1b7_2722_0a95) ^ seed_extension,
            )
        }

        fn seed(&self) -> u64 {
            self.seed
        }
    }

    struct CannedGenerator {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, GeneratorError> {
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(GeneratorError::transport("canned outage")),
            }
        }
    }

    fn fixture_setup() -> SessionSetup {
        SessionSetup {
            company: "Nordica Components".to_string(),
            participants: vec![
                Participant {
                    name: "Aino".to_string(),
                    title: "CEO".to_string(),
                },
                Participant {
                    name: "Mikko".to_string(),
                    title: "CCO".to_string(),
                },
            ],
            endpoint: Endpoint::Proxy {
                url: "https://ai.example.com/generate".to_string(),
            },
        }
    }

    fn engine_with(seed: u64, reply: Option<&'static str>) -> SessionEngine {
        SessionEngine::new(
            fixture_setup(),
            EngineConfig::default(),
            Arc::new(TestContext { seed }),
            Arc::new(CannedGenerator { reply }),
        )
        .unwrap()
    }

    fn started(seed: u64, reply: Option<&'static str>) -> SessionEngine {
        let mut engine = engine_with(seed, reply);
        engine.start().unwrap();
        engine
    }

    #[tokio::test]
    async fn start_seeds_the_session() {
        let engine = started(42, Some("ok"));
        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.state().current_tasks.len(), 2);
        assert_eq!(engine.state().npcs.len(), 7);
        let crisis = engine.state().crisis.as_ref().unwrap();
        assert_eq!(
            engine.state().metrics.crisis_level,
            crisis.initial_crisis_level
        );
        // 2 deadlines + 3 NPC greetings pending
        assert_eq!(engine.pending_actions(), 5);
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let mut engine = started(42, Some("ok"));
        assert_eq!(engine.start(), Err(EngineError::AlreadyStarted));
    }

    #[tokio::test]
    async fn same_seed_replays_the_same_session() {
        let a = started(7, Some("ok"));
        let b = started(7, Some("ok"));
        assert_eq!(
            a.state().crisis.as_ref().unwrap().title,
            b.state().crisis.as_ref().unwrap().title
        );
    }

    #[tokio::test]
    async fn choice_resolution_applies_the_impact() {
        let mut engine = started(42, Some("ok"));
        assert_eq!(engine.state().metrics.reputation, 70.0);
        assert_eq!(engine.state().metrics.trust, 60.0);

        // "Give an immediate statement": reputation -5, trust +5
        engine.resolve_choice("task-0", 0).unwrap();
        assert_eq!(engine.state().metrics.reputation, 65.0);
        assert_eq!(engine.state().metrics.trust, 65.0);
        assert_eq!(engine.state().current_tasks.len(), 1);
        let entry = engine.state().event_log.last().unwrap();
        assert!(entry.description.contains("Task resolved: Media inquiry"));
        assert!(entry.description.contains("Give an immediate statement"));

        // the task id has left the working set for good
        assert_eq!(
            engine.resolve_choice("task-0", 0),
            Err(EngineError::UnknownTask("task-0".to_string()))
        );
    }

    #[tokio::test]
    async fn invalid_option_leaves_the_task_active() {
        let mut engine = started(42, Some("ok"));
        let err = engine.resolve_choice("task-0", 9).unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
        assert_eq!(engine.state().current_tasks.len(), 2);
    }

    #[tokio::test]
    async fn follow_up_spawns_after_the_delay_with_a_fresh_id() {
        let mut engine = started(42, Some("ok"));
        engine.resolve_choice("task-0", 1).unwrap();
        assert_eq!(engine.state().current_tasks.len(), 1);

        engine.advance(Duration::from_secs(2)).await;
        assert_eq!(engine.state().current_tasks.len(), 1);

        engine.advance(Duration::from_secs(1)).await;
        assert_eq!(engine.state().current_tasks.len(), 2);
        let spawned = engine.state().current_tasks.last().unwrap();
        assert_eq!(spawned.id, "task-2");
        assert_eq!(spawned.title, "Media follow-up");
    }

    #[tokio::test]
    async fn stale_deadline_never_fires_for_a_resolved_task() {
        let mut engine = started(42, Some("ok"));
        engine.resolve_choice("task-0", 1).unwrap();

        // Run past the resolved task's original 600 s deadline. Its
        // follow-up spawns at 3 s and expires at 423 s, which shows the
        // timeout machinery is alive, yet the resolved seed task never
        // expires.
        engine.advance(Duration::from_secs(600)).await;
        assert!(!engine
            .state()
            .event_log
            .iter()
            .any(|e| e.description.contains("Task timed out: Media inquiry")));
        assert!(engine
            .state()
            .event_log
            .iter()
            .any(|e| e.description == "Task timed out: Media follow-up"));
    }

    #[tokio::test]
    async fn timeout_applies_the_penalty_and_logs() {
        let mut engine = started(42, Some("ok"));
        let initial_crisis = engine.state().metrics.crisis_level;

        engine.advance(Duration::from_secs(600)).await;
        assert_eq!(engine.state().current_tasks.len(), 1);
        let entry = engine
            .state()
            .event_log
            .iter()
            .find(|e| e.description == "Task timed out: Media inquiry")
            .unwrap();
        assert_eq!(entry.time, "10:00");
        assert_eq!(engine.state().metrics.reputation, 60.0);
        assert_eq!(engine.state().metrics.trust, 50.0);
        assert_eq!(
            engine.state().metrics.crisis_level,
            (initial_crisis + 5.0).min(100.0)
        );
    }

    #[tokio::test]
    async fn coarse_advance_stamps_entries_at_their_due_times() {
        let mut engine = started(42, Some("ok"));

        // One jump over both deadlines: each timeout must carry its own
        // deadline's label, not the post-jump time.
        engine.advance(Duration::from_secs(900)).await;
        let times: Vec<&str> = engine
            .state()
            .event_log
            .iter()
            .filter(|e| e.description.starts_with("Task timed out"))
            .map(|e| e.time.as_str())
            .collect();
        assert_eq!(times, vec!["10:00", "15:00"]);
        assert_eq!(engine.now(), Duration::from_secs(900));
    }

    #[tokio::test]
    async fn failed_probe_blocks_session_start() {
        let generator = Arc::new(CannedGenerator { reply: None });
        let mut engine = SessionEngine::new(
            fixture_setup(),
            EngineConfig::default(),
            Arc::new(TestContext { seed: 42 }),
            Arc::clone(&generator) as Arc<dyn TextGenerator>,
        )
        .unwrap();

        // The setup surface calls start() only after the probe succeeds.
        let probe = verify_endpoint(generator.as_ref()).await;
        assert!(probe.is_err());
        if probe.is_ok() {
            engine.start().unwrap();
        }
        assert_eq!(engine.phase(), SessionPhase::Setup);
        assert!(engine.state().crisis.is_none());
        assert_eq!(engine.pending_actions(), 0);
    }

    #[tokio::test]
    async fn npc_greetings_arrive_within_the_window() {
        let mut engine = started(42, Some("We demand answers."));
        engine.advance(Duration::from_secs(5)).await;
        assert_eq!(engine.state().messages.len(), 3);
        assert!(engine
            .state()
            .messages
            .iter()
            .all(|m| m.content == "We demand answers."));
    }

    #[tokio::test]
    async fn npc_failure_substitutes_the_fallback() {
        let mut engine = started(42, None);
        engine.advance(Duration::from_secs(5)).await;
        assert_eq!(engine.state().messages.len(), 3);
        for message in &engine.state().messages {
            assert_eq!(message.content, npc_fallback_message(&message.role));
        }
    }

    #[tokio::test]
    async fn empty_document_is_rejected_without_mutation() {
        let mut engine = started(42, Some("ok"));
        let events = engine.state().event_log.len();
        let err = engine
            .submit_document(DocumentKind::PressRelease, "Aino", "   ")
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::EmptyDocument);
        assert!(engine.state().documents.is_empty());
        assert_eq!(engine.state().event_log.len(), events);
    }

    #[tokio::test]
    async fn unknown_author_is_rejected() {
        let mut engine = started(42, Some("ok"));
        let err = engine
            .submit_document(DocumentKind::InternalMemo, "Nobody", "text")
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownAuthor("Nobody".to_string()));
        assert!(engine.state().documents.is_empty());
    }

    #[tokio::test]
    async fn document_feedback_attaches_and_nudges_metrics() {
        let mut engine = started(42, Some("Stakeholders remain wary."));
        let id = engine
            .submit_document(DocumentKind::PressRelease, "Aino", "We are investigating.")
            .await
            .unwrap();
        assert_eq!(id, "doc-0");

        let doc = &engine.state().documents[0];
        assert_eq!(doc.feedback.as_deref(), Some("Stakeholders remain wary."));
        assert!(doc.impact.is_some());
        // FixedNudge default: reputation +2, trust +1
        assert_eq!(engine.state().metrics.reputation, 72.0);
        assert_eq!(engine.state().metrics.trust, 61.0);
        assert!(engine
            .state()
            .event_log
            .iter()
            .any(|e| e.description == "Document published: Press release (Aino)"));
    }

    #[tokio::test]
    async fn feedback_failure_keeps_the_document_with_a_marker() {
        let mut engine = started(42, None);
        engine
            .submit_document(DocumentKind::LegalBrief, "Mikko", "Risk assessment.")
            .await
            .unwrap();

        let doc = &engine.state().documents[0];
        assert_eq!(doc.feedback.as_deref(), Some(FEEDBACK_FAILED_MARKER));
        assert!(doc.impact.is_none());
        assert_eq!(engine.state().metrics.reputation, 70.0);
        assert_eq!(engine.state().metrics.trust, 60.0);
    }

    #[tokio::test]
    async fn team_chat_appends_and_ignores_blanks() {
        let mut engine = started(42, Some("ok"));
        engine.post_team_message("Facilitator", "Moderator", "Status?").unwrap();
        engine.post_team_message("Facilitator", "Moderator", "   ").unwrap();
        assert_eq!(engine.state().team_chat.len(), 1);
        assert_eq!(engine.state().team_chat[0].content, "Status?");
    }

    #[tokio::test]
    async fn end_requires_confirmation() {
        let mut engine = started(42, Some("ok"));
        assert_eq!(engine.end(false).unwrap_err(), EngineError::NotConfirmed);
        assert_eq!(engine.phase(), SessionPhase::Active);
    }

    #[tokio::test]
    async fn ending_cancels_everything_pending() {
        let mut engine = started(42, Some("ok"));
        engine.resolve_choice("task-0", 1).unwrap();

        let report = engine.end(true).unwrap();
        assert_eq!(engine.phase(), SessionPhase::Ended);
        assert_eq!(engine.pending_actions(), 0);
        let snapshot = engine.state().clone();

        // Pending NPC greetings, deadlines and the follow-up spawn are gone:
        // no mutation can happen after the end.
        engine.advance(Duration::from_secs(3600)).await;
        assert_eq!(engine.state().messages.len(), snapshot.messages.len());
        assert_eq!(
            engine.state().current_tasks.len(),
            snapshot.current_tasks.len()
        );
        assert_eq!(engine.state().event_log.len(), snapshot.event_log.len());

        assert_eq!(
            engine
                .submit_document(DocumentKind::InternalMemo, "Aino", "late")
                .await
                .unwrap_err(),
            EngineError::NotActive
        );
        assert_eq!(engine.report(), Some(report));
    }
}
