//! Team recommendation.
//!
//! Two phases:
//! 1. Coverage-greedy: walk the top `2 × max_agents` matches and admit an
//!    agent when it adds a specialization/technology tag the team lacks, or
//!    when its score is above [`STRONG_MATCH`].
//! 2. Dependency closure: for each agent admitted in phase one, add its
//!    `requires_agents` that exist in the index, while the cap allows.
//!
//! Phase two walks only the phase-one members and does not recurse into the
//! dependencies it adds, so it always terminates.

use serde::Serialize;
use std::collections::HashSet;

use crate::index::CapabilityIndex;
use crate::record::CapabilityRecord;

/// Score above which an agent joins even without new coverage.
pub const STRONG_MATCH: f64 = 0.7;
/// Score given to agents added only because a member requires them.
pub const REQUIRED_SCORE: f64 = 0.5;

/// Why an agent is on the team.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionReason {
    /// Brought at least one tag the team did not cover yet.
    NewCoverage,
    /// Nothing new, but scored above [`STRONG_MATCH`].
    StrongMatch,
    /// Added in the dependency pass.
    RequiredBy { agent: String },
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionReason::NewCoverage => write!(f, "adds new coverage"),
            SelectionReason::StrongMatch => write!(f, "strong match"),
            SelectionReason::RequiredBy { agent } => write!(f, "required by {agent}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub agent: String,
    pub match_score: f64,
    pub category: String,
    pub specializations: Vec<String>,
    pub technologies: Vec<String>,
    /// Tags this member added to the team's coverage.
    pub new_coverage: Vec<String>,
    pub avg_duration_hours: f64,
    pub reason: SelectionReason,
}

impl TeamMember {
    fn from_record(
        record: &CapabilityRecord,
        match_score: f64,
        new_coverage: Vec<String>,
        reason: SelectionReason,
    ) -> Self {
        Self {
            agent: record.name.clone(),
            match_score: (match_score * 1000.0).round() / 1000.0,
            category: record.category.clone(),
            specializations: record.specializations.clone(),
            technologies: record.technologies.clone(),
            new_coverage,
            avg_duration_hours: record.avg_task_duration_hours,
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Team {
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.members.iter().any(|m| m.agent == agent)
    }

    /// Sum of the members' average task durations.
    pub fn estimated_hours(&self) -> f64 {
        self.members.iter().map(|m| m.avg_duration_hours).sum()
    }
}

impl CapabilityIndex {
    /// Recommend at most `max_agents` agents for a project description.
    pub fn recommend_team(&self, project_description: &str, max_agents: usize) -> Team {
        let mut team = Team::default();
        if max_agents == 0 {
            return team;
        }

        let mut selected: HashSet<String> = HashSet::new();
        let mut coverage: HashSet<String> = HashSet::new();

        for (record, score) in self.find_agents(project_description, max_agents.saturating_mul(2)) {
            if team.len() >= max_agents {
                break;
            }

            let mut new_coverage = Vec::new();
            for tag in record.coverage_tags() {
                if !coverage.contains(tag) && !new_coverage.contains(tag) {
                    new_coverage.push(tag.clone());
                }
            }

            let reason = if !new_coverage.is_empty() {
                SelectionReason::NewCoverage
            } else if score > STRONG_MATCH {
                SelectionReason::StrongMatch
            } else {
                continue;
            };

            coverage.extend(new_coverage.iter().cloned());
            selected.insert(record.name.clone());
            team.members
                .push(TeamMember::from_record(record, score, new_coverage, reason));
        }

        let greedy: Vec<String> = team.members.iter().map(|m| m.agent.clone()).collect();
        for member in greedy {
            let Some(record) = self.get(&member) else {
                continue;
            };
            for required in &record.requires_agents {
                if team.len() >= max_agents {
                    return team;
                }
                if selected.contains(required) {
                    continue;
                }
                if let Some(dep) = self.get(required) {
                    selected.insert(dep.name.clone());
                    team.members.push(TeamMember::from_record(
                        dep,
                        REQUIRED_SCORE,
                        Vec::new(),
                        SelectionReason::RequiredBy {
                            agent: member.clone(),
                        },
                    ));
                }
            }
        }

        team
    }
}
