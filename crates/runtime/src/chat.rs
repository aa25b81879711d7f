//! Advice transcript: what the operator said and what the agent replied.
use std::collections::VecDeque;
use std::fmt;

use agent_core::{AdviceRuleStore, ControlCommand, ParseOutcome};

/// Author of a transcript line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum Speaker {
    #[strum(serialize = "You")]
    Operator,
    #[strum(serialize = "Agent")]
    Agent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Result of handling one utterance, rendered as the agent's reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdviceReply {
    RuleAdded(String),
    Cleared,
    Removed(Option<String>),
    Listed(Vec<String>),
    Unrecognized,
}

impl AdviceReply {
    /// Applies a parsed utterance to `advice` and describes the result.
    pub fn resolve(outcome: ParseOutcome, advice: &mut AdviceRuleStore) -> Self {
        match outcome {
            ParseOutcome::Rule(rule) => {
                let text = rule.text.clone();
                advice.add(rule);
                AdviceReply::RuleAdded(text)
            }
            ParseOutcome::Command(ControlCommand::Clear) => {
                let removed = advice.clear();
                tracing::info!(removed, "advice cleared");
                AdviceReply::Cleared
            }
            ParseOutcome::Command(ControlCommand::List) => AdviceReply::Listed(advice.texts()),
            ParseOutcome::Command(ControlCommand::RemoveLast) => {
                let removed = advice.remove_last().map(|rule| rule.text);
                tracing::info!(?removed, "advice rule removed");
                AdviceReply::Removed(removed)
            }
            ParseOutcome::Unrecognized => AdviceReply::Unrecognized,
        }
    }
}

impl fmt::Display for AdviceReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceReply::RuleAdded(text) => {
                write!(f, "Rule saved: {text}. I will keep it even if I lose a life.")
            }
            AdviceReply::Cleared => f.write_str("Advice cleared. I will keep learning."),
            AdviceReply::Removed(Some(text)) => write!(f, "Rule removed: {text}."),
            AdviceReply::Removed(None) => f.write_str("There is no advice to remove."),
            AdviceReply::Listed(texts) if texts.is_empty() => f.write_str("I have no advice yet."),
            AdviceReply::Listed(texts) => write!(f, "Current advice: {}.", texts.join(" | ")),
            AdviceReply::Unrecognized => {
                f.write_str("I did not understand. Try: \"get food when hunger is below 50%\".")
            }
        }
    }
}

/// Bounded ring of transcript lines; the oldest line is dropped when full.
#[derive(Clone, Debug)]
pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
    capacity: usize,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(TranscriptLine {
            speaker,
            text: text.into(),
        });
    }

    pub fn lines(&self) -> impl Iterator<Item = &TranscriptLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
