//! Free text to advice rule or control command.
//!
//! Keyword heuristics run first and in a fixed priority order; the intent
//! classifier is consulted only for the action clause and only when no keyword
//! fires. Predator avoidance outranks rock avoidance, so "avoid rocks and
//! predators" resolves to predators.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::classifier::{Classification, IntentClassifier};
use super::rule::{AdviceAction, AdviceCondition, AdviceRule, Direction, HungerOp, RuleId};

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(when|if)\b").expect("static regex"));

static HUNGER_THRESHOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"hunger[^0-9]*?(<=|>=|<|>|below|under|less than|over|above|greater than)?\s*(\d{1,3})\s*%?",
    )
    .expect("static regex")
});

static UNDO_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bundo\b").expect("static regex"));

static LIST_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\blist\b").expect("static regex"));

const AVOID_CUES: [&str; 6] = ["avoid", "stay away", "keep away", "dont", "don't", "do not"];
const FLEE_CUES: [&str; 4] = ["flee", "run", "escape", "hide"];
const ROCK_CUES: [&str; 3] = ["rock", "stone", "boulder"];
const FOOD_CUES: [&str; 5] = ["food", "eat", "forage", "berries", "fruit"];
const TREE_CUES: [&str; 2] = ["tree", "forest"];
const STAY_CUES: [&str; 7] = ["stay", "wait", "hold", "freeze", "still", "dont move", "don't move"];
const DIRECTION_CUES: [(Direction, [&str; 2]); 4] = [
    (Direction::North, ["north", "up"]),
    (Direction::South, ["south", "down"]),
    (Direction::West, ["west", "left"]),
    (Direction::East, ["east", "right"]),
];

const CLEAR_CUES: [&str; 6] = [
    "clear",
    "forget",
    "stop advice",
    "stop listening",
    "cancel",
    "never mind",
];
const CLEAR_EXACT: [&str; 3] = ["stop", "stop it", "stop now"];
const LIST_CUES: [&str; 2] = ["show rules", "show advice"];
const REMOVE_LAST_CUES: [&str; 3] = ["remove last", "delete last", "drop last"];

/// Rule-store lifecycle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ControlCommand {
    Clear,
    List,
    RemoveLast,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    Command(ControlCommand),
    Rule(AdviceRule),
    Unrecognized,
}

/// Stateful parser; owns the rule id counter.
#[derive(Clone, Debug)]
pub struct AdviceParser {
    classifier: Arc<IntentClassifier>,
    threshold: f64,
    next_id: u64,
}

impl AdviceParser {
    pub fn new(classifier: Arc<IntentClassifier>, threshold: f64) -> Self {
        Self {
            classifier,
            threshold,
            next_id: 1,
        }
    }

    pub fn classifier(&self) -> &Arc<IntentClassifier> {
        &self.classifier
    }

    pub fn parse(&mut self, utterance: &str) -> ParseOutcome {
        let lower = utterance.to_lowercase();
        if lower.trim().is_empty() {
            return ParseOutcome::Unrecognized;
        }

        if let Some(command) = control_command(&lower) {
            tracing::debug!(%command, "advice control command");
            return ParseOutcome::Command(command);
        }

        let (action_text, condition_text) = split_clauses(&lower);
        let source = action_source(&lower, action_text);

        let action = match keyword_action(source) {
            Some(action) => action,
            None => {
                let classification = self.classifier.classify(source);
                match classification.accept(self.threshold) {
                    Some(action) => {
                        tracing::debug!(
                            intent = ?classification.intent,
                            confidence = classification.confidence,
                            "advice action from classifier"
                        );
                        action
                    }
                    None => {
                        log_rejection(utterance, classification);
                        return ParseOutcome::Unrecognized;
                    }
                }
            }
        };

        let mut condition = parse_condition(condition_text);
        if condition == AdviceCondition::Always && condition_text.is_empty() {
            condition = parse_condition(&lower);
        }

        let id = RuleId(self.next_id);
        self.next_id += 1;
        ParseOutcome::Rule(AdviceRule::new(id, action, condition))
    }
}

fn log_rejection(utterance: &str, classification: Classification) {
    tracing::debug!(
        utterance,
        intent = ?classification.intent,
        confidence = classification.confidence,
        "advice not understood"
    );
}

/// Clear, then list, then remove-last; the first match wins.
pub fn control_command(lower: &str) -> Option<ControlCommand> {
    let trimmed = lower.trim();

    if CLEAR_CUES.iter().any(|cue| lower.contains(cue))
        || lower.contains("nevermind")
        || CLEAR_EXACT.contains(&trimmed)
    {
        return Some(ControlCommand::Clear);
    }
    if LIST_WORD.is_match(lower) || LIST_CUES.iter().any(|cue| lower.contains(cue)) {
        return Some(ControlCommand::List);
    }
    if REMOVE_LAST_CUES.iter().any(|cue| lower.contains(cue)) || UNDO_WORD.is_match(lower) {
        return Some(ControlCommand::RemoveLast);
    }
    None
}

/// Splits at the first standalone "when" or "if" into trimmed
/// `(action clause, condition clause)`.
pub fn split_clauses(lower: &str) -> (&str, &str) {
    match CLAUSE_SPLIT.find(lower) {
        Some(found) => (lower[..found.start()].trim(), lower[found.end()..].trim()),
        None => (lower.trim(), ""),
    }
}

/// Text the action is read from: the action clause, or the whole utterance
/// when a leading condition left that clause empty.
pub fn action_source<'a>(lower: &'a str, action_clause: &'a str) -> &'a str {
    if action_clause.is_empty() { lower } else { action_clause }
}

/// Ordered keyword tests over a lowercased action clause.
pub fn keyword_action(text: &str) -> Option<AdviceAction> {
    if text.is_empty() {
        return None;
    }
    let any = |cues: &[&str]| cues.iter().any(|cue| text.contains(cue));
    let avoid = any(&AVOID_CUES);

    if text.contains("predator") && (avoid || any(&FLEE_CUES)) {
        return Some(AdviceAction::AvoidPredator);
    }
    if any(&ROCK_CUES) && avoid {
        return Some(AdviceAction::AvoidRocks);
    }
    if any(&FOOD_CUES) {
        return Some(AdviceAction::SeekFood);
    }
    if any(&TREE_CUES) {
        return Some(AdviceAction::SeekTrees);
    }
    if any(&STAY_CUES) {
        return Some(AdviceAction::Stay);
    }

    DIRECTION_CUES
        .iter()
        .find(|(_, cues)| any(cues))
        .map(|(direction, _)| AdviceAction::Direction(*direction))
}

/// Resolves a lowercased condition clause; defaults to `Always`.
pub fn parse_condition(text: &str) -> AdviceCondition {
    let source = text.trim();
    if source.is_empty() || source.contains("always") {
        return AdviceCondition::Always;
    }

    if let Some(captures) = HUNGER_THRESHOLD.captures(source) {
        let op = match captures.get(1).map(|m| m.as_str()) {
            Some(">" | ">=" | "over" | "above" | "greater than") => HungerOp::Above,
            _ => HungerOp::Below,
        };
        let value = captures
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
            .min(100);
        return AdviceCondition::Hunger { op, value };
    }

    let near = source.contains("near") || source.contains("close");
    if source.contains("hungry") {
        AdviceCondition::Hunger {
            op: HungerOp::Below,
            value: 40,
        }
    } else if source.contains("predator") && near {
        AdviceCondition::PredatorNear
    } else if source.contains("food") && near {
        AdviceCondition::FoodNear
    } else {
        AdviceCondition::Always
    }
}
