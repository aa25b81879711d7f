//! Show how the advice parser reads an utterance.

use std::path::PathBuf;
use std::sync::Arc;

use agent_core::advice::{action_source, control_command, keyword_action, split_clauses};
use agent_core::{AdviceParser, IntentClassifier, ParseOutcome};
use anyhow::Result;
use clap::Parser;
use console::style;

/// Show how an utterance is interpreted
#[derive(Parser)]
pub struct Parse {
    /// Advice text, e.g. `get food when hunger is below 50%`
    #[arg(value_name = "TEXT", required = true)]
    text: Vec<String>,

    /// Runtime config file (TOML) supplying the classifier threshold
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Parse {
    pub fn execute(self) -> Result<()> {
        let agent = super::agent_config(self.config.as_deref())?;
        let text = super::utterance(&self.text);
        let lower = text.to_lowercase();

        let classifier = Arc::new(IntentClassifier::pretrained());
        let mut parser = AdviceParser::new(Arc::clone(&classifier), agent.classifier_threshold);

        println!("{} {:?}", style("Input:").bold().cyan(), text);

        if let Some(command) = control_command(&lower) {
            println!("{} {}", style("Command:").bold().cyan(), command);
            return Ok(());
        }

        let (action_clause, condition_clause) = split_clauses(&lower);
        println!("{} {:?}", style("Action clause:").bold().cyan(), action_clause);
        println!(
            "{} {:?}",
            style("Condition clause:").bold().cyan(),
            condition_clause
        );

        let source = action_source(&lower, action_clause);
        if source != action_clause {
            println!("{} whole utterance", style("Action read from:").bold().cyan());
        }

        match keyword_action(source) {
            Some(action) => println!("{} {}", style("Keyword match:").bold().cyan(), action.describe()),
            None => {
                let classification = classifier.classify(source);
                let intent = classification
                    .intent
                    .map_or_else(|| "none".to_string(), |intent| intent.to_string());
                println!(
                    "{} {} ({:.3}, threshold {:.2})",
                    style("Classifier:").bold().cyan(),
                    intent,
                    classification.confidence,
                    agent.classifier_threshold
                );
            }
        }
        println!();

        match parser.parse(&text) {
            ParseOutcome::Rule(rule) => {
                println!("{}", style("=== Rule ===").bold().green());
                println!("  Id: {}", rule.id);
                println!("  Action: {:?}", rule.action);
                println!("  Condition: {:?}", rule.condition);
                println!("  Text: {}", rule.text);
            }
            ParseOutcome::Command(command) => {
                println!("{} {}", style("Command:").bold().green(), command);
            }
            ParseOutcome::Unrecognized => {
                println!("{}", style("Unrecognized").bold().red());
            }
        }

        Ok(())
    }
}
