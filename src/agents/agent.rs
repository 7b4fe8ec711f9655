use crate::llm::{ChatClient, ChatMessage};

use super::handoff::{handoff_addendum, HandoffPolicy, JsonHandoff};

/// What an agent did with a turn: answered it, or asked to transfer it.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    Reply(String),
    Handoff { target: String, message: String },
}

/// A persona: a name, a static instruction block, and the turns it has
/// exchanged so far. Histories are per-agent and are not copied across
/// handoffs, so a receiving agent only sees what is re-sent to it.
pub struct Agent {
    pub name: String,
    instructions: String,
    history: Vec<ChatMessage>,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Clears the turn history. Instructions are static and survive.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Plain exchange: system prompt + history + the query.
    ///
    /// On success both the user turn and the assistant turn are appended
    /// to history. A failed call returns the error's display text as the
    /// reply and leaves history untouched; nothing propagates.
    pub async fn ask(&mut self, client: &ChatClient, query: &str) -> String {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(&self.instructions));
        messages.extend_from_slice(&self.history);
        messages.push(ChatMessage::user(query));

        match client.chat(&messages).await {
            Ok(reply) => {
                self.history.push(ChatMessage::user(query));
                self.history.push(ChatMessage::assistant(&reply));
                reply
            }
            Err(e) => e.to_string(),
        }
    }

    /// Exchange with the JSON handoff protocol advertised.
    ///
    /// `peers` is the full agent set including this agent; the addendum
    /// lists everyone else. A reply that is a well-formed handoff object
    /// naming a known peer becomes [`AgentOutcome::Handoff`] and leaves a
    /// single synthetic assistant turn in this agent's history. Everything
    /// else (malformed JSON, unknown targets, plain prose) is a normal
    /// reply recorded as one assistant turn.
    pub async fn process(
        &mut self,
        client: &ChatClient,
        input: &str,
        peers: &[String],
    ) -> AgentOutcome {
        let others: Vec<&str> = peers
            .iter()
            .filter(|p| p.as_str() != self.name)
            .map(String::as_str)
            .collect();

        let mut system = self.instructions.clone();
        if !others.is_empty() {
            system.push_str(&handoff_addendum(&others));
        }

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(&self.history);
        messages.push(ChatMessage::user(input));

        match client.chat(&messages).await {
            Ok(reply) => self.interpret(reply, peers),
            Err(e) => AgentOutcome::Reply(e.to_string()),
        }
    }

    /// Classifies a raw reply as a handoff or normal text and records the
    /// matching history turn. Faithful quirk: only the assistant side of
    /// the exchange is recorded on this path.
    fn interpret(&mut self, reply: String, peers: &[String]) -> AgentOutcome {
        if peers.iter().any(|p| p.as_str() != self.name) {
            if let Some(target) = JsonHandoff::new(peers).detect(&reply) {
                if target != self.name {
                    let message = self.record_handoff(&target);
                    return AgentOutcome::Handoff { target, message };
                }
            }
        }

        self.history.push(ChatMessage::assistant(&reply));
        AgentOutcome::Reply(reply)
    }

    /// Appends the synthetic assistant turn documenting a transfer and
    /// returns its text.
    pub fn record_handoff(&mut self, target: &str) -> String {
        let message = format!("I'm handing this conversation off to {target}.");
        self.history.push(ChatMessage::assistant(&message));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peers() -> Vec<String> {
        vec![
            "Triage Agent".to_string(),
            "Materials Agent".to_string(),
            "Safety Agent".to_string(),
        ]
    }

    #[test]
    fn handoff_reply_transfers_and_leaves_one_turn() {
        let mut agent = Agent::new("Triage Agent", "You triage.");
        let outcome = agent.interpret(r#"{"handoff": "Materials Agent"}"#.to_string(), &peers());

        assert_eq!(
            outcome,
            AgentOutcome::Handoff {
                target: "Materials Agent".to_string(),
                message: "I'm handing this conversation off to Materials Agent.".to_string(),
            }
        );
        assert_eq!(agent.history().len(), 1);
        assert_eq!(agent.history()[0].role, "assistant");
    }

    #[test]
    fn plain_reply_stays_with_the_agent() {
        let mut agent = Agent::new("Triage Agent", "You triage.");
        let outcome = agent.interpret("Concrete cures in about 28 days.".to_string(), &peers());

        assert_eq!(
            outcome,
            AgentOutcome::Reply("Concrete cures in about 28 days.".to_string())
        );
        assert_eq!(agent.history().len(), 1);
        assert_eq!(agent.history()[0].content, "Concrete cures in about 28 days.");
    }

    #[test]
    fn handoff_to_unknown_agent_is_a_normal_reply() {
        let mut agent = Agent::new("Triage Agent", "You triage.");
        let raw = r#"{"handoff": "Demolition Agent"}"#;
        let outcome = agent.interpret(raw.to_string(), &peers());

        // The raw JSON is kept as an ordinary assistant turn.
        assert_eq!(outcome, AgentOutcome::Reply(raw.to_string()));
        assert_eq!(agent.history()[0].content, raw);
    }

    #[test]
    fn handoff_to_self_is_a_normal_reply() {
        let mut agent = Agent::new("Triage Agent", "You triage.");
        let outcome = agent.interpret(r#"{"handoff": "Triage Agent"}"#.to_string(), &peers());

        assert!(matches!(outcome, AgentOutcome::Reply(_)));
    }

    #[test]
    fn record_handoff_appends_exactly_one_assistant_turn() {
        let mut agent = Agent::new("Triage Agent", "You triage.");
        let message = agent.record_handoff("Materials Agent");

        assert_eq!(
            message,
            "I'm handing this conversation off to Materials Agent."
        );
        assert_eq!(agent.history().len(), 1);
        assert_eq!(agent.history()[0].role, "assistant");
        assert_eq!(agent.history()[0].content, message);
    }

    #[test]
    fn reset_clears_history_only() {
        let mut agent = Agent::new("Planning Agent", "You plan.");
        agent.record_handoff("Safety Agent");
        agent.reset();

        assert!(agent.history().is_empty());
        assert_eq!(agent.name, "Planning Agent");
    }
}
