use crate::llm::{ChatClient, ChatMessage};

use super::agent::{Agent, AgentOutcome};

pub const TRIAGE_AGENT: &str = "Triage Agent";

const TRIAGE_PROMPT: &str = "You are a triage agent that determines whether a request is related to \
construction planning, materials, or safety, and routes it to the appropriate specialized agent. \
Be brief and professional in your handoffs.";

const PLANNING_PROMPT: &str = "You are a construction planning specialist. You help with project \
timelines, resource allocation, and scheduling. Provide detailed but concise advice on \
construction planning.";

const MATERIALS_PROMPT: &str = "You are a construction materials specialist. You provide information \
about building materials, their costs, properties, and appropriate uses. Be specific and practical \
in your advice.";

const SAFETY_PROMPT: &str = "You are a construction safety specialist. You provide guidance on \
safety protocols, equipment, regulations, and best practices. Be thorough in safety \
recommendations.";

/// What the crew produced for one user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum CrewReply {
    Message {
        agent: String,
        text: String,
    },
    Handoff {
        from: String,
        to: String,
        message: String,
    },
}

/// Construction crew routed by the explicit JSON handoff protocol.
/// The triage agent starts every conversation.
pub struct TriageCrew {
    agents: Vec<Agent>,
    current: usize,
}

impl Default for TriageCrew {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageCrew {
    pub fn new() -> Self {
        let agents = vec![
            Agent::new(TRIAGE_AGENT, TRIAGE_PROMPT),
            Agent::new("Planning Agent", PLANNING_PROMPT),
            Agent::new("Materials Agent", MATERIALS_PROMPT),
            Agent::new("Safety Agent", SAFETY_PROMPT),
        ];
        Self { agents, current: 0 }
    }

    pub fn current_agent_name(&self) -> &str {
        &self.agents[self.current].name
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// One user turn through the active agent. A handoff reply moves the
    /// pointer; the next turn goes to the new agent.
    pub async fn process(&mut self, client: &ChatClient, input: &str) -> CrewReply {
        let peers: Vec<String> = self.agents.iter().map(|a| a.name.clone()).collect();
        let speaker = self.agents[self.current].name.clone();

        match self.agents[self.current].process(client, input, &peers).await {
            AgentOutcome::Reply(text) => CrewReply::Message {
                agent: speaker,
                text,
            },
            AgentOutcome::Handoff { target, message } => {
                self.transfer(&target);
                CrewReply::Handoff {
                    from: speaker,
                    to: target,
                    message,
                }
            }
        }
    }

    /// Moves the pointer to the named agent; unknown names leave it alone.
    fn transfer(&mut self, target: &str) -> bool {
        match self.agents.iter().position(|a| a.name == target) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Clears every history and puts the triage agent back in front.
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.reset();
        }
        self.current = 0;
    }
}

// One-shot classification: no histories, two sequential calls.

const ONE_SHOT_TRIAGE_PROMPT: &str = r#"You are a triage agent for construction industry queries. Analyze the user's query
and determine which specialized domain it belongs to:
1. PLANNING - For project planning, scheduling, timelines, resource allocation
2. MATERIALS - For questions about building materials, costs, properties, applications
3. SAFETY - For safety protocols, equipment, regulations, best practices

Respond ONLY with the domain name in all caps (PLANNING, MATERIALS, or SAFETY).
"#;

const GENERAL_PROMPT: &str = "You are a general construction industry assistant. Provide helpful \
advice on construction-related topics.";

/// Stateless triage: classify the query into a domain, then answer it with
/// that domain's specialist instructions. Anything the classifier returns
/// outside the known labels falls back to the general assistant.
///
/// Returns `(domain label, answer)`. API failures surface as the answer
/// text, same as everywhere else.
pub async fn classify_and_answer(client: &ChatClient, input: &str) -> (String, String) {
    let triage = [
        ChatMessage::system(ONE_SHOT_TRIAGE_PROMPT),
        ChatMessage::user(input),
    ];
    let domain = match client.chat(&triage).await {
        Ok(label) => label.trim().to_string(),
        Err(e) => e.to_string(),
    };

    let (label, instructions) = match domain.as_str() {
        "PLANNING" => ("PLANNING", PLANNING_PROMPT),
        "MATERIALS" => ("MATERIALS", MATERIALS_PROMPT),
        "SAFETY" => ("SAFETY", SAFETY_PROMPT),
        _ => ("GENERAL", GENERAL_PROMPT),
    };

    let messages = [ChatMessage::system(instructions), ChatMessage::user(input)];
    let answer = match client.chat(&messages).await {
        Ok(text) => text,
        Err(e) => e.to_string(),
    };

    (label.to_string(), answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crew_starts_with_the_triage_agent() {
        let crew = TriageCrew::new();
        assert_eq!(crew.current_agent_name(), TRIAGE_AGENT);
    }

    #[test]
    fn transfer_moves_only_to_known_agents() {
        let mut crew = TriageCrew::new();
        assert!(crew.transfer("Materials Agent"));
        assert_eq!(crew.current_agent_name(), "Materials Agent");

        assert!(!crew.transfer("Demolition Agent"));
        assert_eq!(crew.current_agent_name(), "Materials Agent");
    }

    #[test]
    fn reset_clears_histories_and_restores_triage() {
        let mut crew = TriageCrew::new();
        crew.transfer("Safety Agent");
        for agent in &mut crew.agents {
            agent.record_handoff("Planning Agent");
        }

        crew.reset();

        assert_eq!(crew.current_agent_name(), TRIAGE_AGENT);
        assert!(crew
            .agent("Safety Agent")
            .is_some_and(|a| a.history().is_empty()));
        assert!(crew.agents.iter().all(|a| a.history().is_empty()));
    }
}
