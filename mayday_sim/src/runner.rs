//! Drives scripted exercises against the session engine and judges them.

use crate::context::SimContext;
use crate::exercises::ExerciseId;
use crate::generator::ScriptedGenerator;
use mayday_core::session::{npc_fallback_message, FEEDBACK_FAILED_MARKER};
use mayday_core::{
    DocumentKind, EngineConfig, Participant, SessionEngine, SessionReport, SessionSetup,
};
use mayday_env::{Endpoint, EnvContext};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Outcome of one exercise run, serialized as-is in `--json` mode.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseResult {
    /// Exercise that was run
    pub exercise: ExerciseId,

    /// Seed used
    pub seed: u64,

    /// Whether the exercise passed all assertions
    pub passed: bool,

    /// The session report, when the exercise reached a confirmed end
    pub report: Option<SessionReport>,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

/// Runs scripted exercises.
pub struct ExerciseRunner {
    /// Configuration seed
    seed: u64,
}

impl ExerciseRunner {
    /// Creates a new exercise runner.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Runs one exercise to completion and judges the outcome.
    pub async fn run(&self, exercise: ExerciseId) -> ExerciseResult {
        info!(exercise = %exercise, seed = self.seed, "running exercise");
        let outcome = match exercise {
            ExerciseId::FullExercise => full_exercise(self.seed).await,
            ExerciseId::DeadAir => dead_air(self.seed).await,
            ExerciseId::FeedOffline => feed_offline(self.seed).await,
            ExerciseId::Replay => replay(self.seed).await,
        };
        match outcome {
            Ok(report) => ExerciseResult {
                exercise,
                seed: self.seed,
                passed: true,
                report: Some(report),
                failure_reason: None,
            },
            Err(reason) => ExerciseResult {
                exercise,
                seed: self.seed,
                passed: false,
                report: None,
                failure_reason: Some(reason),
            },
        }
    }
}

/// Drives one unattended session in real time on the given context.
///
/// Ticks once per second through `EnvContext::sleep` and `advance`, then
/// ends confirmed after `duration`. Under `TokioContext` this is the
/// production pacing; under [`SimContext`](crate::SimContext) the sleeps
/// advance the virtual clock and the run completes immediately, which is
/// how the pacing loop itself gets tested.
pub async fn run_wall_clock(
    ctx: Arc<dyn EnvContext>,
    duration: Duration,
) -> Result<SessionReport, String> {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut engine = SessionEngine::new(
        exercise_setup(),
        EngineConfig::default(),
        Arc::clone(&ctx),
        generator,
    )
    .map_err(|e| format!("engine construction failed: {}", e))?;
    engine.start().map_err(|e| e.to_string())?;

    let tick = Duration::from_secs(1);
    let mut elapsed = Duration::ZERO;
    while elapsed < duration {
        ctx.sleep(tick).await;
        engine.advance(tick).await;
        elapsed += tick;
    }
    engine.end(true).map_err(|e| e.to_string())
}

fn check(cond: bool, reason: &str) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(reason.to_string())
    }
}

fn exercise_setup() -> SessionSetup {
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
            url: "https://ai.internal.example/generate".to_string(),
        },
    }
}

fn build_engine(seed: u64, generator: Arc<ScriptedGenerator>) -> Result<SessionEngine, String> {
    SessionEngine::new(
        exercise_setup(),
        EngineConfig::default(),
        SimContext::shared(seed),
        generator,
    )
    .map_err(|e| format!("engine construction failed: {}", e))
}

/// The happy path: choices resolve in time, follow-ups get handled, one
/// document goes out and the session ends confirmed.
async fn full_exercise(seed: u64) -> Result<SessionReport, String> {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut engine = build_engine(seed, generator)?;
    engine.start().map_err(|e| e.to_string())?;

    check(engine.state().current_tasks.len() == 2, "expected 2 seed tasks")?;
    check(engine.state().npcs.len() == 7, "expected 7 NPCs")?;
    check(engine.pending_actions() == 5, "expected 5 pending actions after start")?;

    engine.advance(Duration::from_secs(5)).await;
    check(
        engine.state().messages.len() == 3,
        "expected 3 NPC greetings within the window",
    )?;

    // Immediate statement: reputation -5, trust +5
    engine.resolve_choice("task-0", 0).map_err(|e| e.to_string())?;
    check(
        engine.state().metrics.reputation == 65.0 && engine.state().metrics.trust == 65.0,
        "media choice impact not applied",
    )?;

    engine.advance(Duration::from_secs(3)).await;
    check(
        engine.state().task_index("task-2").is_some(),
        "media follow-up did not spawn",
    )?;

    let doc_id = engine
        .submit_document(
            DocumentKind::PressRelease,
            "Aino",
            "We are investigating the incident and will publish corrective measures.",
        )
        .await
        .map_err(|e| e.to_string())?;
    let doc = engine
        .state()
        .documents
        .iter()
        .find(|d| d.id == doc_id)
        .ok_or_else(|| "submitted document missing from state".to_string())?;
    check(
        doc.feedback.as_deref().is_some_and(|f| f != FEEDBACK_FAILED_MARKER),
        "document feedback missing or marked failed",
    )?;

    // Personal call: reputation +3, trust +8
    engine.resolve_choice("task-1", 0).map_err(|e| e.to_string())?;
    engine.advance(Duration::from_secs(3)).await;
    check(
        engine.state().task_index("task-3").is_some(),
        "customer follow-up did not spawn",
    )?;

    engine.resolve_choice("task-2", 0).map_err(|e| e.to_string())?;
    engine.resolve_choice("task-3", 1).map_err(|e| e.to_string())?;
    check(
        engine.state().current_tasks.is_empty(),
        "working set not empty after all resolutions",
    )?;

    for i in 0..6 {
        engine
            .post_team_message("Aino", "CEO", &format!("Status update {}", i))
            .map_err(|e| e.to_string())?;
    }

    let report = engine.end(true).map_err(|e| e.to_string())?;
    check(engine.pending_actions() == 0, "pending actions survived the end")?;
    // 70/60 start, -5/+5, +2/+1 doc, +3/+8, +3/+3, +1/+5
    check(report.reputation == 74, "unexpected final reputation")?;
    check(report.trust == 82, "unexpected final trust")?;
    check(report.strengths.len() == 3, "expected all three strength bullets")?;
    check(
        report.events_logged == engine.state().event_log.len(),
        "report event count out of sync",
    )?;
    Ok(report)
}

/// Nobody does anything: both seed tasks must expire with the penalty and
/// the report must read as a failed exercise.
async fn dead_air(seed: u64) -> Result<SessionReport, String> {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut engine = build_engine(seed, generator)?;
    engine.start().map_err(|e| e.to_string())?;
    let initial_crisis = engine.state().metrics.crisis_level;

    engine.advance(Duration::from_secs(900)).await;
    check(
        engine.state().current_tasks.is_empty(),
        "tasks survived their deadlines",
    )?;
    let timeouts = engine
        .state()
        .event_log
        .iter()
        .filter(|e| e.description.starts_with("Task timed out"))
        .count();
    check(timeouts == 2, "expected 2 timeout entries")?;
    check(
        engine.state().metrics.reputation == 50.0 && engine.state().metrics.trust == 40.0,
        "timeout penalties not applied twice",
    )?;
    check(
        engine.state().metrics.crisis_level == (initial_crisis + 10.0).min(100.0),
        "crisis level did not rise with the timeouts",
    )?;
    check(
        engine.state().messages.len() == 3,
        "NPC greetings should still arrive",
    )?;

    let report = engine.end(true).map_err(|e| e.to_string())?;
    check(report.strengths.is_empty(), "a silent session earned a strength")?;
    check(report.improvements.len() == 2, "expected 2 improvement bullets")?;
    check(
        report.assessment.contains("needs more practice"),
        "assessment too generous",
    )?;
    Ok(report)
}

/// The endpoint is down the whole time: NPC fallbacks and the document
/// failure marker must appear, and metrics must not move on documents.
async fn feed_offline(seed: u64) -> Result<SessionReport, String> {
    let generator = Arc::new(ScriptedGenerator::new());
    generator.set_offline(true);
    let mut engine = build_engine(seed, Arc::clone(&generator))?;
    engine.start().map_err(|e| e.to_string())?;

    engine.advance(Duration::from_secs(5)).await;
    check(engine.state().messages.len() == 3, "expected 3 fallback greetings")?;
    check(
        engine
            .state()
            .messages
            .iter()
            .all(|m| m.content == npc_fallback_message(&m.role)),
        "fallback greeting text mismatch",
    )?;

    engine
        .submit_document(DocumentKind::InternalMemo, "Mikko", "Hold all statements.")
        .await
        .map_err(|e| e.to_string())?;
    let doc = &engine.state().documents[0];
    check(
        doc.feedback.as_deref() == Some(FEEDBACK_FAILED_MARKER),
        "failed feedback not marked",
    )?;
    check(
        engine.state().metrics.reputation == 70.0 && engine.state().metrics.trust == 60.0,
        "metrics moved on a failed review",
    )?;
    check(generator.call_count() == 4, "expected 4 generation attempts")?;

    engine.end(true).map_err(|e| e.to_string())
}

/// Runs one fixed script; used twice by `replay` for comparison.
async fn replay_once(seed: u64) -> Result<SessionReport, String> {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut engine = build_engine(seed, generator)?;
    engine.start().map_err(|e| e.to_string())?;

    engine.advance(Duration::from_secs(10)).await;
    engine.resolve_choice("task-0", 1).map_err(|e| e.to_string())?;
    engine.advance(Duration::from_secs(3)).await;
    engine
        .submit_document(DocumentKind::TechnicalReport, "Mikko", "Root cause pending.")
        .await
        .map_err(|e| e.to_string())?;
    engine.advance(Duration::from_secs(900)).await;
    engine.end(true).map_err(|e| e.to_string())
}

async fn replay(seed: u64) -> Result<SessionReport, String> {
    let first = replay_once(seed).await?;
    let second = replay_once(seed).await?;
    check(first == second, "same seed produced diverging reports")?;
    Ok(first)
}
