use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::router::error::RouterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    Clinical,
    Research,
    Comparison,
    Explanation,
    Plan,
}

// No bare "dose" or "monitor": "What if I lower the dasatinib dose?" must reach the
// comparison rule.
const CLINICAL: &[&str] = &[
    "discontinue",
    "discontinuation",
    "discontinued",
    "stop taking",
    "withdrawal",
    "monitoring schedule",
    "monitoring schedules",
    "follow-up schedule",
    "side effect",
    "side effects",
    "adverse event",
    "adverse events",
    "adverse effect",
    "adverse effects",
    "contraindication",
    "contraindications",
    "drug interaction",
    "drug interactions",
    "dose adjustment criteria",
    "dose reduction guideline",
    "dose reduction guidelines",
    "recommended screening",
    "toxicity",
    "cardiotoxicity",
];

const RESEARCH: &[&str] = &[
    "study",
    "studies",
    "research",
    "trial",
    "trials",
    "evidence",
    "literature",
    "paper",
    "papers",
    "publication",
    "publications",
    "meta-analysis",
    "cohort",
];

const COMPARISON: &[&str] = &[
    "compare",
    "comparison",
    "compared",
    "what if",
    "what-if",
    "scenario",
    "scenarios",
    "versus",
    "vs",
    "difference",
    "differences",
    "instead",
];

// No bare "how": "How should I reduce risk?" must fall through to the plan rules.
const EXPLANATION: &[&str] = &[
    "why",
    "explain",
    "explanation",
    "how does",
    "how did",
    "how is",
    "how are",
    "what drives",
    "what is driving",
    "contribute",
    "contributes",
    "contributing",
    "contribution",
    "factor",
    "factors",
    "driver",
    "drivers",
    "shap",
    "attribution",
];

const PLAN: &[&str] = &[
    "plan",
    "reduce",
    "lower",
    "decrease",
    "improve",
    "intervention",
    "interventions",
    "lifestyle",
    "action",
    "actions",
    "steps",
    "prevent",
    "prevention",
    "manage",
    "management",
];

/// Extra phrases appended to the built-in lists, one vector per keyword set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordExtensions {
    #[serde(default)]
    pub clinical: Vec<String>,
    #[serde(default)]
    pub research: Vec<String>,
    #[serde(default)]
    pub comparison: Vec<String>,
    #[serde(default)]
    pub explanation: Vec<String>,
    #[serde(default)]
    pub plan: Vec<String>,
}

impl KeywordExtensions {
    fn for_kind(&self, kind: KeywordKind) -> &[String] {
        match kind {
            KeywordKind::Clinical => &self.clinical,
            KeywordKind::Research => &self.research,
            KeywordKind::Comparison => &self.comparison,
            KeywordKind::Explanation => &self.explanation,
            KeywordKind::Plan => &self.plan,
        }
    }
}

/// Case-insensitive whole-word phrase matcher.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    pattern: Regex,
}

impl KeywordSet {
    pub fn builtin(kind: KeywordKind) -> &'static [&'static str] {
        match kind {
            KeywordKind::Clinical => CLINICAL,
            KeywordKind::Research => RESEARCH,
            KeywordKind::Comparison => COMPARISON,
            KeywordKind::Explanation => EXPLANATION,
            KeywordKind::Plan => PLAN,
        }
    }

    pub fn compile<S: AsRef<str>>(kind: KeywordKind, phrases: &[S]) -> Result<Self, RouterError> {
        let mut alternatives = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty() {
                return Err(RouterError::InvalidKeyword {
                    kind,
                    keyword: phrase.to_string(),
                    message: "keyword must not be blank".to_string(),
                });
            }
            let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
            alternatives.push(words.join(r"\s+"));
        }

        let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let pattern = Regex::new(&source).map_err(|err| RouterError::InvalidKeyword {
            kind,
            keyword: phrases
                .iter()
                .map(|phrase| phrase.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            message: err.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// Built-in phrases for `kind` plus any configured extensions.
    pub fn with_extensions(
        kind: KeywordKind,
        extensions: &KeywordExtensions,
    ) -> Result<Self, RouterError> {
        let phrases: Vec<&str> = Self::builtin(kind)
            .iter()
            .copied()
            .chain(extensions.for_kind(kind).iter().map(String::as_str))
            .collect();
        Self::compile(kind, &phrases)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// All keyword sets consulted by the routing table.
#[derive(Debug, Clone)]
pub struct KeywordSets {
    clinical: KeywordSet,
    research: KeywordSet,
    comparison: KeywordSet,
    explanation: KeywordSet,
    plan: KeywordSet,
}

impl KeywordSets {
    pub fn new(extensions: &KeywordExtensions) -> Result<Self, RouterError> {
        Ok(Self {
            clinical: KeywordSet::with_extensions(KeywordKind::Clinical, extensions)?,
            research: KeywordSet::with_extensions(KeywordKind::Research, extensions)?,
            comparison: KeywordSet::with_extensions(KeywordKind::Comparison, extensions)?,
            explanation: KeywordSet::with_extensions(KeywordKind::Explanation, extensions)?,
            plan: KeywordSet::with_extensions(KeywordKind::Plan, extensions)?,
        })
    }

    pub fn get(&self, kind: KeywordKind) -> &KeywordSet {
        match kind {
            KeywordKind::Clinical => &self.clinical,
            KeywordKind::Research => &self.research,
            KeywordKind::Comparison => &self.comparison,
            KeywordKind::Explanation => &self.explanation,
            KeywordKind::Plan => &self.plan,
        }
    }
}
