use regex::Regex;

use crate::router::{
    error::RouterError,
    keywords::{KeywordExtensions, KeywordKind, KeywordSets},
    types::{Intent, RoutingRule},
};

/// Explicit capability tag written at the start of a message, e.g. `[explain]` or `/plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityTag {
    Knowledge,
    Explain,
    Compare,
    Plan,
}

impl CapabilityTag {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "knowledge" | "ask" => Some(Self::Knowledge),
            "explain" | "explanation" => Some(Self::Explain),
            "compare" | "whatif" | "what-if" => Some(Self::Compare),
            "plan" | "intervention" => Some(Self::Plan),
            _ => None,
        }
    }
}

/// Session facts the routing table may consult besides the message itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingFacts {
    pub has_scenarios: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub rule: RoutingRule,
    /// Set when the Explanation capability must receive a scenario comparison.
    pub comparison: bool,
    /// Message text with any leading tag removed.
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    Tag(CapabilityTag),
    Keywords(KeywordKind),
    KeywordsWithHistory(KeywordKind),
    KeywordsInQuestion(KeywordKind),
    Always,
}

#[derive(Debug, Clone, Copy)]
struct RouteEntry {
    condition: Condition,
    intent: Intent,
    rule: RoutingRule,
    comparison: bool,
}

const fn entry(condition: Condition, intent: Intent, rule: RoutingRule) -> RouteEntry {
    RouteEntry {
        condition,
        intent,
        rule,
        comparison: false,
    }
}

const fn comparison_entry(condition: Condition, rule: RoutingRule) -> RouteEntry {
    RouteEntry {
        condition,
        intent: Intent::Explanation,
        rule,
        comparison: true,
    }
}

/// Evaluated top to bottom; the first matching entry decides.
const ROUTING_TABLE: &[RouteEntry] = &[
    entry(
        Condition::Tag(CapabilityTag::Knowledge),
        Intent::Knowledge,
        RoutingRule::ExplicitTag,
    ),
    entry(
        Condition::Tag(CapabilityTag::Explain),
        Intent::Explanation,
        RoutingRule::ExplicitTag,
    ),
    comparison_entry(Condition::Tag(CapabilityTag::Compare), RoutingRule::ExplicitTag),
    entry(
        Condition::Tag(CapabilityTag::Plan),
        Intent::Intervention,
        RoutingRule::ExplicitTag,
    ),
    entry(
        Condition::Keywords(KeywordKind::Clinical),
        Intent::Knowledge,
        RoutingRule::ClinicalQuestion,
    ),
    entry(
        Condition::Keywords(KeywordKind::Research),
        Intent::Knowledge,
        RoutingRule::Research,
    ),
    comparison_entry(
        Condition::KeywordsWithHistory(KeywordKind::Comparison),
        RoutingRule::Comparison,
    ),
    entry(
        Condition::Keywords(KeywordKind::Explanation),
        Intent::Explanation,
        RoutingRule::Explanation,
    ),
    entry(
        Condition::KeywordsInQuestion(KeywordKind::Plan),
        Intent::Knowledge,
        RoutingRule::PlanQuestionReroute,
    ),
    entry(
        Condition::Keywords(KeywordKind::Plan),
        Intent::Intervention,
        RoutingRule::Plan,
    ),
    entry(Condition::Always, Intent::Knowledge, RoutingRule::Default),
];

struct MessageView<'a> {
    tag: Option<CapabilityTag>,
    body: &'a str,
}

/// Keyword-driven intent selection over an ordered routing table.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    keywords: KeywordSets,
    tag_prefix: Regex,
    interrogative: Regex,
}

impl IntentClassifier {
    pub fn new(extensions: &KeywordExtensions) -> Result<Self, RouterError> {
        Ok(Self {
            keywords: KeywordSets::new(extensions)?,
            tag_prefix: compile_fixed(r"^\s*(?:\[([A-Za-z-]+)\]|/([A-Za-z-]+))(?:\s+|$)")?,
            interrogative: compile_fixed(
                r"(?i)(?:\b(?:what|how|why|when|which|who|whom|whose|where)\b|^\s*(?:should|can|could|would|will|is|are|am|does|do|did|may|might|shall)\b)",
            )?,
        })
    }

    pub fn classify(&self, message: &str, facts: RoutingFacts) -> Classification {
        let view = self.view(message);
        let matched = ROUTING_TABLE
            .iter()
            .find(|candidate| self.holds(candidate.condition, &view, facts))
            .copied()
            .unwrap_or_else(|| entry(Condition::Always, Intent::Knowledge, RoutingRule::Default));

        Classification {
            intent: matched.intent,
            rule: matched.rule,
            comparison: matched.comparison,
            message: view.body.to_string(),
        }
    }

    pub fn is_question(&self, text: &str) -> bool {
        text.contains('?') || self.interrogative.is_match(text)
    }

    fn view<'a>(&self, message: &'a str) -> MessageView<'a> {
        let trimmed = message.trim();
        let Some(captures) = self.tag_prefix.captures(trimmed) else {
            return MessageView {
                tag: None,
                body: trimmed,
            };
        };
        let tag = captures
            .get(1)
            .or_else(|| captures.get(2))
            .and_then(|name| CapabilityTag::parse(name.as_str()));
        match (tag, captures.get(0)) {
            (Some(tag), Some(whole)) => MessageView {
                tag: Some(tag),
                body: trimmed[whole.end()..].trim(),
            },
            _ => MessageView {
                tag: None,
                body: trimmed,
            },
        }
    }

    fn holds(&self, condition: Condition, view: &MessageView<'_>, facts: RoutingFacts) -> bool {
        match condition {
            Condition::Tag(tag) => view.tag == Some(tag),
            Condition::Keywords(kind) => self.keywords.get(kind).matches(view.body),
            Condition::KeywordsWithHistory(kind) => {
                facts.has_scenarios && self.keywords.get(kind).matches(view.body)
            }
            Condition::KeywordsInQuestion(kind) => {
                self.keywords.get(kind).matches(view.body) && self.is_question(view.body)
            }
            Condition::Always => true,
        }
    }
}

fn compile_fixed(source: &str) -> Result<Regex, RouterError> {
    Regex::new(source).map_err(|err| RouterError::InvalidPattern {
        pattern: source.to_string(),
        message: err.to_string(),
    })
}
