//! Scripted exercise identifiers.

use serde::Serialize;

/// Exercise identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseId {
    /// A full facilitated session: greetings, choices, follow-ups, a
    /// document and a confirmed end
    FullExercise,

    /// Nobody responds to anything; every task runs into its deadline
    DeadAir,

    /// The generation endpoint is down for the whole session
    FeedOffline,

    /// The same seed twice must produce byte-identical reports
    Replay,
}

impl ExerciseId {
    /// Returns a list of all exercises.
    pub fn all() -> Vec<ExerciseId> {
        vec![
            ExerciseId::FullExercise,
            ExerciseId::DeadAir,
            ExerciseId::FeedOffline,
            ExerciseId::Replay,
        ]
    }

    /// Returns the exercise name.
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseId::FullExercise => "full_exercise",
            ExerciseId::DeadAir => "dead_air",
            ExerciseId::FeedOffline => "feed_offline",
            ExerciseId::Replay => "replay",
        }
    }

    /// Returns a description of the exercise.
    pub fn description(&self) -> &'static str {
        match self {
            ExerciseId::FullExercise => {
                "Active session: choices, follow-ups, a document, confirmed end"
            }
            ExerciseId::DeadAir => "No responses at all; verify timeout penalties and the report",
            ExerciseId::FeedOffline => "Generation endpoint down; verify fallbacks and markers",
            ExerciseId::Replay => "Same seed twice; verify identical reports",
        }
    }
}

impl std::fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ExerciseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_exercise" | "full" => Ok(ExerciseId::FullExercise),
            "dead_air" | "deadair" => Ok(ExerciseId::DeadAir),
            "feed_offline" | "offline" => Ok(ExerciseId::FeedOffline),
            "replay" => Ok(ExerciseId::Replay),
            _ => Err(format!("Unknown exercise: {}", s)),
        }
    }
}
