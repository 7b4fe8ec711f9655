mod agent;
mod handoff;
mod team;
mod triage;

pub use agent::{Agent, AgentOutcome};
pub use handoff::{HandoffPolicy, JsonHandoff, KeywordHandoff};
pub use team::{DevTeam, ProjectContext, ORCHESTRATOR};
pub use triage::{classify_and_answer, CrewReply, TriageCrew, TRIAGE_AGENT};
