use serde::Serialize;
use serde_json::{Map, Value};

use crate::llm::ChatClient;
use crate::tools::WebSearchTool;

use super::agent::Agent;
use super::handoff::{HandoffPolicy, KeywordHandoff};

pub const ORCHESTRATOR: &str = "Project Orchestrator";

const ORCHESTRATOR_PROMPT: &str = r#"You are the central coordinator for the entire development process.

Your responsibilities:
- Understand user requirements and triage tasks to specialized agents
- Manage the flow of information between agents and the user
- Track project status and progress
- Identify dependencies and blockers
- Synthesize outputs from different agents into a cohesive product

You must maintain the big picture while coordinating the details of implementation.

When triaging a task, determine which specialized agent is most appropriate:
- Product Manager: For requirements gathering and clarification
- Software Architect: For system design and technology selection
- Frontend Developer: For UI/UX implementation and frontend code
- Backend Developer: For server-side implementation and APIs
- QA Tester: For quality assurance and testing
- Technical Writer: For documentation

Reply with your assessment and the agent you're handing off to.
"#;

const PRODUCT_MANAGER_PROMPT: &str = r#"You are an experienced product manager who helps define requirements and user stories.

Your responsibilities:
- Clarify user requirements through questions
- Break down vague requests into specific functional requirements
- Create clear user stories with acceptance criteria
- Identify potential scope issues early
- Help prioritize features for MVP vs future releases

Always maintain a business-focused perspective while translating client needs into technical specifications.
"#;

const ARCHITECT_PROMPT: &str = r#"You are an expert software architect who designs robust, scalable application architecture.

Your responsibilities:
- Design overall system architecture based on requirements
- Select appropriate technologies and frameworks
- Create high-level component diagrams
- Identify potential technical challenges
- Make architecture recommendations considering scalability, security, and performance

Focus on creating clear, maintainable designs that balance business needs with technical implementation.
"#;

const FRONTEND_DEV_PROMPT: &str = r#"You are a skilled frontend developer specializing in modern web technologies.

Your responsibilities:
- Write clean, efficient frontend code (HTML, CSS, JavaScript/TypeScript)
- Implement responsive, accessible UI components
- Create engaging user interfaces with excellent UX
- Work with modern frontend frameworks (React, Vue, Angular)

Always prioritize user experience, accessibility, and performance in your implementations.
"#;

const BACKEND_DEV_PROMPT: &str = r#"You are an experienced backend developer who excels at creating robust APIs and services.

Your responsibilities:
- Design and implement APIs and server-side functionality
- Create efficient database schemas and queries
- Write secure, well-tested backend code
- Implement proper error handling and logging

Focus on performance, security, and maintainability in all your code.
"#;

const QA_TESTER_PROMPT: &str = r#"You are a thorough QA tester who finds and reports issues.

Your responsibilities:
- Create test plans and test cases
- Review code for potential issues
- Design user acceptance testing scenarios
- Identify edge cases and potential bugs

Be meticulous and comprehensive in your testing approach.
"#;

const TECH_WRITER_PROMPT: &str = r#"You are a skilled technical writer who creates clear documentation.

Your responsibilities:
- Write user guides and README files
- Document APIs
- Create installation/setup instructions
- Explain complex concepts in simple terms

Make your documentation accessible to both technical and non-technical users.
"#;

/// Mutable project state shared with every agent by embedding its JSON
/// rendering in outgoing queries. Call sites update it ad hoc; nothing
/// here is validated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectContext {
    pub name: String,
    pub requirements: Vec<String>,
    pub architecture: Map<String, Value>,
    pub components: Vec<String>,
    pub status: Map<String, Value>,
}

/// The seven-persona development team with a single active-agent pointer.
///
/// The pointer and every history live inside this value, not in process
/// globals, so independent sessions never collide.
pub struct DevTeam {
    agents: Vec<Agent>,
    current: usize,
    pub context: ProjectContext,
    policy: KeywordHandoff,
}

impl Default for DevTeam {
    fn default() -> Self {
        Self::new()
    }
}

impl DevTeam {
    pub fn new() -> Self {
        // Orchestrator first: reset() and new() both point at index 0.
        let agents = vec![
            Agent::new(ORCHESTRATOR, ORCHESTRATOR_PROMPT),
            Agent::new("Product Manager", PRODUCT_MANAGER_PROMPT),
            Agent::new("Software Architect", ARCHITECT_PROMPT),
            Agent::new("Frontend Developer", FRONTEND_DEV_PROMPT),
            Agent::new("Backend Developer", BACKEND_DEV_PROMPT),
            Agent::new("QA Tester", QA_TESTER_PROMPT),
            Agent::new("Technical Writer", TECH_WRITER_PROMPT),
        ];

        Self {
            agents,
            current: 0,
            context: ProjectContext::default(),
            policy: KeywordHandoff,
        }
    }

    pub fn current_agent_name(&self) -> &str {
        &self.agents[self.current].name
    }

    /// Point the team directly at a named agent, bypassing triage.
    /// Returns false (pointer unchanged) for unknown names.
    pub fn focus(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.name == name)
    }

    /// Routes one query through the active agent, following at most one
    /// keyword handoff.
    ///
    /// The query is enriched with the project-context JSON, and with
    /// simulated web-search results when a non-orchestrator agent is asked
    /// to "search". If the reply asks to hand off to a different, known
    /// agent, the pointer moves and the original query is re-issued to the
    /// new agent together with the previous agent's reply. Errors never
    /// escape; they come back as reply text.
    pub async fn process_query(&mut self, client: &ChatClient, query: &str) -> String {
        let context_json =
            serde_json::to_string_pretty(&self.context).unwrap_or_else(|_| "{}".to_string());
        let mut enriched = format!(
            "User Query: {query}\n\n\
             Current Project Context:\n```json\n{context_json}\n```\n\n\
             Please consider the project context in your response."
        );

        if query.to_lowercase().contains("search") && self.current != 0 {
            let search_query = query.replace("search", "").trim().to_string();
            let results = WebSearchTool::search(client, &search_query).await;
            enriched.push_str(&format!(
                "\n\nWeb Search Results for '{search_query}':\n{results}"
            ));
        }

        let reply = self.agents[self.current].ask(client, &enriched).await;

        if let Some(target) = self.policy.detect(&reply) {
            if target != self.current_agent_name() {
                if let Some(next) = self.position(&target) {
                    let banner = format!(
                        "\n\n[Handoff from {} to {}]\n\n",
                        self.agents[self.current].name, target
                    );
                    self.current = next;

                    let handoff_query = format!(
                        "{banner}Previous agent said: {reply}\n\nOriginal user query: {query}"
                    );
                    let followup = self.agents[self.current].ask(client, &handoff_query).await;
                    return format!("{banner}{followup}");
                }
            }
        }

        reply
    }

    /// Clears every agent's history and hands the floor back to the
    /// orchestrator.
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.reset();
        }
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_starts_with_the_orchestrator() {
        let team = DevTeam::new();
        assert_eq!(team.current_agent_name(), ORCHESTRATOR);
        assert_eq!(team.agents.len(), 7);
    }

    #[test]
    fn focus_moves_the_pointer_only_for_known_agents() {
        let mut team = DevTeam::new();
        assert!(team.focus("Frontend Developer"));
        assert_eq!(team.current_agent_name(), "Frontend Developer");

        assert!(!team.focus("Intern"));
        assert_eq!(team.current_agent_name(), "Frontend Developer");
    }

    #[test]
    fn reset_restores_the_orchestrator_and_empties_histories() {
        let mut team = DevTeam::new();
        team.focus("QA Tester");
        for agent in &mut team.agents {
            agent.record_handoff("Technical Writer");
        }

        team.reset();

        assert_eq!(team.current_agent_name(), ORCHESTRATOR);
        assert!(team
            .agent("Technical Writer")
            .is_some_and(|a| a.history().is_empty()));
        assert!(team.agents.iter().all(|a| a.history().is_empty()));
    }

    #[test]
    fn context_serializes_with_all_sections() {
        let mut context = ProjectContext {
            name: "Widget".to_string(),
            requirements: vec!["does things".to_string()],
            ..Default::default()
        };
        context
            .status
            .insert("frontend_progress".to_string(), serde_json::json!(0));

        let json = serde_json::to_value(&context).expect("context serializes");
        assert_eq!(json["name"], "Widget");
        assert_eq!(json["requirements"][0], "does things");
        assert_eq!(json["status"]["frontend_progress"], 0);
        assert!(json["architecture"].is_object());
        assert!(json["components"].is_array());
    }
}
