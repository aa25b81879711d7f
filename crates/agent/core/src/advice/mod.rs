//! Natural-language advice: parsing, storage and bias composition.
//!
//! ```text
//! utterance ─► AdviceParser ─► AdviceRule ─► AdviceRuleStore
//!                   │                               │
//!            IntentClassifier          BiasComposer (per tick) ─► BiasVector
//! ```
mod bias;
mod classifier;
mod corpus;
mod parser;
mod rule;
mod store;

pub use bias::{BiasComposer, BiasVector};
pub use classifier::{Classification, Intent, IntentClassifier, Vocabulary, tokenize};
pub use corpus::TRAINING_CORPUS;
pub use parser::{
    AdviceParser, ControlCommand, ParseOutcome, action_source, control_command, keyword_action,
    parse_condition, split_clauses,
};
pub use rule::{AdviceAction, AdviceCondition, AdviceRule, Direction, HungerOp, RuleId};
pub use store::AdviceRuleStore;
