//! Interactive advice console.
//!
//! Reads one utterance per line from stdin and replies the way the running
//! agent would. No simulation runs; only the rule store changes.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{AdviceParser, AdviceRuleStore, IntentClassifier};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::{AdviceReply, Speaker, Transcript};

/// Interactive advice console over stdin
#[derive(Parser)]
pub struct Advise {
    /// Runtime config file (TOML) supplying the classifier threshold
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the whole transcript when the session ends
    #[arg(long)]
    transcript: bool,
}

impl Advise {
    pub fn execute(self) -> Result<()> {
        let agent = super::agent_config(self.config.as_deref())?;
        let classifier = Arc::new(IntentClassifier::pretrained());
        let mut session = AdviceSession::new(AdviceParser::new(
            classifier,
            agent.classifier_threshold,
        ));

        println!(
            "{}",
            style("Type advice for the agent; `quit` or Ctrl-D to leave.").dim()
        );

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("{} ", style(">").bold().cyan());
            stdout.flush().context("Failed to flush stdout")?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if matches!(line, "quit" | "exit") {
                break;
            }

            let reply = session.submit(line);
            println!("{} {}", style(format!("{}:", Speaker::Agent)).bold().green(), reply);
        }

        println!();
        println!(
            "{} {}",
            style("Rules kept:").bold().yellow(),
            session.advice.len()
        );
        for rule in session.advice.rules() {
            println!("  {} {}", rule.id, rule.text);
        }
        if self.transcript {
            println!();
            println!("{}", style("=== Transcript ===").bold().green());
            for line in session.transcript.lines() {
                println!("  {line}");
            }
        }

        Ok(())
    }
}

struct AdviceSession {
    parser: AdviceParser,
    advice: AdviceRuleStore,
    transcript: Transcript,
}

impl AdviceSession {
    fn new(parser: AdviceParser) -> Self {
        Self {
            parser,
            advice: AdviceRuleStore::new(),
            transcript: Transcript::new(runtime::RuntimeConfig::DEFAULT_TRANSCRIPT_CAPACITY),
        }
    }

    fn submit(&mut self, utterance: &str) -> AdviceReply {
        self.transcript.push(Speaker::Operator, utterance);
        let reply = AdviceReply::resolve(self.parser.parse(utterance), &mut self.advice);
        self.transcript.push(Speaker::Agent, reply.to_string());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tracks_rules_and_transcript() {
        let classifier = Arc::new(IntentClassifier::pretrained());
        let mut session = AdviceSession::new(AdviceParser::new(classifier, 0.6));

        assert_eq!(
            session.submit("avoid predators"),
            AdviceReply::RuleAdded("avoid predators".into())
        );
        assert_eq!(session.submit("clear"), AdviceReply::Cleared);
        assert!(session.advice.is_empty());
        assert_eq!(session.transcript.len(), 4);
        assert_eq!(
            session.transcript.last().unwrap().to_string(),
            "Agent: Advice cleared. I will keep learning."
        );
    }
}
