//! Static exercise content: crisis scenarios, the NPC role table, the
//! authored initial tasks and follow-up templates.
//!
//! The tables are fixed data; which crisis a session gets is the only random
//! pick, made by the engine from the session RNG.

use crate::metrics::MetricDelta;
use crate::state::{Npc, NpcCategory, Sentiment, TaskDef, TaskOption, TaskTemplate};
use std::time::Duration;

/// One authored crisis scenario.
#[derive(Clone, Copy, Debug)]
pub struct CrisisScenario {
    /// Scenario headline
    pub title: &'static str,
    /// Situation description
    pub description: &'static str,
    /// Crisis-level gauge value the session opens with
    pub initial_crisis_level: f64,
}

/// The fixed scenario table a session's crisis is drawn from.
pub const CRISIS_SCENARIOS: &[CrisisScenario] = &[
    CrisisScenario {
        title: "Data breach exposed",
        description: "Word is spreading fast on social media that your company's \
            IT systems have been breached and customer data may have leaked. \
            Customers are worried, the media keeps calling, and investors are \
            demanding explanations.",
        initial_crisis_level: 85.0,
    },
    CrisisScenario {
        title: "Product defect sparks an uproar",
        description: "A serious quality defect has been found in one of your \
            product batches. Customers are reporting problems on social media \
            and the situation is spreading quickly. The authorities have been \
            in contact.",
        initial_crisis_level: 75.0,
    },
    CrisisScenario {
        title: "Executive misconduct revealed",
        description: "The media is reporting claims that a member of your \
            executive team acted unethically in business relationships. Staff \
            are shaken and customers are questioning the company's values.",
        initial_crisis_level: 80.0,
    },
];

/// NPC role table: category order is fixed, media gets two NPCs, every other
/// category one, each capped by its table size.
const NPC_ROLES: &[(NpcCategory, &[&str])] = &[
    (
        NpcCategory::Media,
        &["Reporter, national daily", "Business reporter", "Editor-in-chief"],
    ),
    (
        NpcCategory::SocialMedia,
        &["Social media influencer", "Video blogger", "Blogger"],
    ),
    (
        NpcCategory::Customers,
        &["Major enterprise customer", "Consumer customer", "Long-term partner"],
    ),
    (
        NpcCategory::Suppliers,
        &["Critical subcontractor", "Supply chain partner"],
    ),
    (
        NpcCategory::Investors,
        &["Institutional investor", "Venture capital investor"],
    ),
    (
        NpcCategory::Board,
        &["Chair of the board", "Board member"],
    ),
];

/// Starting trust gauge for every generated NPC.
const NPC_INITIAL_TRUST: f64 = 40.0;

/// Generates the session's NPC roster deterministically from the role table.
pub fn npc_roster() -> Vec<Npc> {
    let mut npcs = Vec::new();
    for (category, roles) in NPC_ROLES {
        let count = if *category == NpcCategory::Media { 2 } else { 1 };
        for role in roles.iter().take(count) {
            npcs.push(Npc {
                id: format!("npc-{}", npcs.len()),
                category: *category,
                role: (*role).to_string(),
                sentiment: Sentiment::Negative,
                trust_level: NPC_INITIAL_TRUST,
            });
        }
    }
    npcs
}

/// The fixed authored set of tasks every session opens with.
pub fn initial_tasks() -> Vec<TaskDef> {
    vec![
        TaskDef {
            template: Some(TaskTemplate::MediaInquiry),
            title: "Media inquiry".to_string(),
            description: "A reporter from the largest national daily demands a \
                statement about the crisis. You have ten minutes to respond."
                .to_string(),
            time_limit: Duration::from_secs(600),
            urgent: true,
            options: vec![
                TaskOption {
                    text: "Give an immediate statement".to_string(),
                    impact: MetricDelta::reputation_trust(-5.0, 5.0),
                },
                TaskOption {
                    text: "Ask for more time to prepare a thorough answer".to_string(),
                    impact: MetricDelta::reputation_trust(2.0, -3.0),
                },
                TaskOption {
                    text: "Decline to comment for now".to_string(),
                    impact: MetricDelta::reputation_trust(-10.0, -5.0),
                },
            ],
        },
        TaskDef {
            template: Some(TaskTemplate::KeyCustomer),
            title: "Key customer concern".to_string(),
            description: "Your largest customer threatens to terminate the \
                contract immediately unless they get a convincing explanation."
                .to_string(),
            time_limit: Duration::from_secs(900),
            urgent: false,
            options: vec![
                TaskOption {
                    text: "Call the customer personally".to_string(),
                    impact: MetricDelta::reputation_trust(3.0, 8.0),
                },
                TaskOption {
                    text: "Send a formal letter".to_string(),
                    impact: MetricDelta::reputation_trust(1.0, 2.0),
                },
                TaskOption {
                    text: "Offer compensation".to_string(),
                    impact: MetricDelta::reputation_trust(-2.0, 5.0),
                },
            ],
        },
    ]
}

/// Builds the follow-up task a seed-task choice leads to.
///
/// The derived description depends on the direction of the chosen option's
/// impact, not on which option it was.
pub fn follow_up(template: TaskTemplate, choice: &TaskOption) -> TaskDef {
    let options = vec![
        TaskOption {
            text: "Keep the dialogue open".to_string(),
            impact: MetricDelta::reputation_trust(3.0, 3.0),
        },
        TaskOption {
            text: "Escalate to the executive team".to_string(),
            impact: MetricDelta::reputation_trust(1.0, 5.0),
        },
    ];
    match template {
        TaskTemplate::MediaInquiry => {
            let mood = if choice.impact.reputation.unwrap_or(0.0) > 0.0 {
                "satisfied"
            } else {
                "skeptical"
            };
            TaskDef {
                template: None,
                title: "Media follow-up".to_string(),
                description: format!(
                    "The reporter sends follow-up questions based on your \
                     answer. The media appears {}.",
                    mood
                ),
                time_limit: Duration::from_secs(420),
                urgent: true,
                options,
            }
        }
        TaskTemplate::KeyCustomer => {
            let mood = if choice.impact.trust.unwrap_or(0.0) > 5.0 {
                "appears satisfied and is considering staying"
            } else {
                "demands further measures to restore trust"
            };
            TaskDef {
                template: None,
                title: "Customer's decision".to_string(),
                description: format!("The customer {}.", mood),
                time_limit: Duration::from_secs(600),
                urgent: false,
                options,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_two_media_one_each() {
        let npcs = npc_roster();
        assert_eq!(npcs.len(), 7);
        let media = npcs
            .iter()
            .filter(|n| n.category == NpcCategory::Media)
            .count();
        assert_eq!(media, 2);
        // ids are unique and sequential
        for (i, npc) in npcs.iter().enumerate() {
            assert_eq!(npc.id, format!("npc-{}", i));
            assert_eq!(npc.sentiment, Sentiment::Negative);
        }
    }

    #[test]
    fn scenario_levels_match_the_table() {
        let levels: Vec<f64> = CRISIS_SCENARIOS
            .iter()
            .map(|s| s.initial_crisis_level)
            .collect();
        assert_eq!(levels, vec![85.0, 75.0, 80.0]);
    }

    #[test]
    fn initial_tasks_are_the_authored_pair() {
        let tasks = initial_tasks();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].urgent);
        assert_eq!(tasks[0].time_limit, Duration::from_secs(600));
        assert_eq!(tasks[1].time_limit, Duration::from_secs(900));
        assert!(tasks.iter().all(|t| t.options.len() == 3));
    }

    #[test]
    fn follow_up_reads_the_impact_direction() {
        let tasks = initial_tasks();
        let positive = &tasks[0].options[1]; // reputation +2
        let negative = &tasks[0].options[0]; // reputation -5
        assert!(follow_up(TaskTemplate::MediaInquiry, positive)
            .description
            .contains("satisfied"));
        assert!(follow_up(TaskTemplate::MediaInquiry, negative)
            .description
            .contains("skeptical"));

        let warm = &tasks[1].options[0]; // trust +8
        let cool = &tasks[1].options[1]; // trust +2
        assert!(follow_up(TaskTemplate::KeyCustomer, warm)
            .description
            .contains("considering staying"));
        assert!(follow_up(TaskTemplate::KeyCustomer, cool)
            .description
            .contains("further measures"));
    }
}
