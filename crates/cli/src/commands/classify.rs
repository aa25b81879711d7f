//! Raw intent classifier output.

use agent_core::{AgentConfig, IntentClassifier};
use anyhow::Result;
use clap::Parser;
use console::style;

/// Run the intent classifier on raw text
#[derive(Parser)]
pub struct Classify {
    /// Text to classify
    #[arg(value_name = "TEXT", required = true)]
    text: Vec<String>,

    /// Train with this seed instead of the built-in one
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Acceptance threshold to report against
    #[arg(short, long, default_value_t = AgentConfig::DEFAULT_CLASSIFIER_THRESHOLD)]
    threshold: f64,
}

impl Classify {
    pub fn execute(self) -> Result<()> {
        let text = super::utterance(&self.text);
        let classifier = match self.seed {
            Some(seed) => IntentClassifier::train(seed),
            None => IntentClassifier::pretrained(),
        };

        println!("{} {:#x}", style("Seed:").bold().cyan(), classifier.seed());
        println!(
            "{} {} tokens",
            style("Vocabulary:").bold().cyan(),
            classifier.vocabulary().len()
        );

        let classification = classifier.classify(&text);
        match classification.intent {
            Some(intent) => {
                println!("{} {}", style("Intent:").bold().cyan(), intent);
                println!(
                    "{} {:.3}",
                    style("Confidence:").bold().cyan(),
                    classification.confidence
                );
                match classification.accept(self.threshold) {
                    Some(action) => println!(
                        "{} {}",
                        style("Accepted as:").bold().green(),
                        action.describe()
                    ),
                    None => println!(
                        "{} below {:.2}",
                        style("Rejected:").bold().red(),
                        self.threshold
                    ),
                }
            }
            None => println!("{}", style("No known tokens").bold().red()),
        }

        Ok(())
    }
}
