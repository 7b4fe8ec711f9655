//! Handoff detection over raw model output.
//!
//! Two deliberately separate policies: an explicit JSON protocol the model
//! is instructed to follow, and a keyword scan over free text. Both are
//! string heuristics on an LLM's own reply, so they live behind one trait
//! to keep the brittleness visible and testable instead of inlined at the
//! call sites.

/// Decides whether a reply is actually a request to transfer control,
/// and to whom.
pub trait HandoffPolicy {
    /// Returns the target agent name when the reply asks for a handoff.
    fn detect(&self, reply: &str) -> Option<String>;
}

/// Explicit protocol: the system prompt tells the model to answer with
/// `{"handoff": "<agent name>"}` when it wants to transfer control.
///
/// Fires only when the entire trimmed reply is wrapped in braces, parses
/// as JSON, and names a known peer. Anything else falls through and the
/// reply is treated as normal text.
pub struct JsonHandoff<'a> {
    known: &'a [String],
}

impl<'a> JsonHandoff<'a> {
    pub fn new(known: &'a [String]) -> Self {
        Self { known }
    }
}

impl HandoffPolicy for JsonHandoff<'_> {
    fn detect(&self, reply: &str) -> Option<String> {
        let trimmed = reply.trim();
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
        let target = value.get("handoff")?.as_str()?;
        self.known
            .iter()
            .find(|name| name.as_str() == target)
            .cloned()
    }
}

/// Fixed routing table for the dev team. Outer order decides priority when
/// several entries match: the scan stops at the first keyword hit, agents
/// checked in table order.
const KEYWORD_TABLE: &[(&str, &[&str])] = &[
    (
        "Product Manager",
        &[
            "product manager",
            "requirements",
            "user stories",
            "clarify requirements",
        ],
    ),
    (
        "Software Architect",
        &[
            "architect",
            "architecture",
            "design",
            "system design",
            "technology selection",
        ],
    ),
    (
        "Frontend Developer",
        &[
            "frontend", "ui", "ux", "interface", "component", "react", "html", "css",
        ],
    ),
    (
        "Backend Developer",
        &["backend", "server", "api", "database", "service"],
    ),
    (
        "QA Tester",
        &["test", "qa", "quality assurance", "edge cases", "bugs"],
    ),
    (
        "Technical Writer",
        &["documentation", "docs", "readme", "guide", "manual"],
    ),
];

/// Free-text scan: requires a literal handoff phrase, then matches the
/// lowercased reply against the keyword table.
#[derive(Default)]
pub struct KeywordHandoff;

impl HandoffPolicy for KeywordHandoff {
    fn detect(&self, reply: &str) -> Option<String> {
        let lower = reply.to_lowercase();
        if !lower.contains("hand off to") && !lower.contains("handoff to") {
            return None;
        }
        for (agent, keywords) in KEYWORD_TABLE {
            for keyword in *keywords {
                if lower.contains(keyword) {
                    return Some((*agent).to_string());
                }
            }
        }
        None
    }
}

/// System-prompt addendum that advertises peers and the JSON protocol.
pub fn handoff_addendum(peers: &[&str]) -> String {
    format!(
        "\n\nYou can hand off the conversation to another agent if needed. \
         Available agents: {}. To hand off, respond with JSON formatted as: \
         {{\"handoff\": \"agent_name\"}}. Otherwise, respond normally.",
        peers.join(", ")
    )
}
