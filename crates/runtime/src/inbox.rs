//! Cross-thread advice delivery.
//!
//! Utterances may be typed on any thread; they are queued here and applied by
//! the runtime at the start of the next step, so the rule store and the policy
//! are only ever touched by the logic thread.
use tokio::sync::mpsc;

/// Cloneable producer side of the advice queue.
#[derive(Clone, Debug)]
pub struct AdviceSender {
    tx: mpsc::UnboundedSender<String>,
}

impl AdviceSender {
    /// Queues an utterance; returns false once the runtime is gone.
    pub fn send(&self, utterance: impl Into<String>) -> bool {
        self.tx.send(utterance.into()).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side owned by the runtime.
#[derive(Debug)]
pub(crate) struct AdviceInbox {
    rx: mpsc::UnboundedReceiver<String>,
    tx: mpsc::UnboundedSender<String>,
}

impl AdviceInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    pub(crate) fn sender(&self) -> AdviceSender {
        AdviceSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, in arrival order. Never blocks.
    pub(crate) fn drain(&mut self) -> Vec<String> {
        let mut pending = Vec::new();
        while let Ok(utterance) = self.rx.try_recv() {
            pending.push(utterance);
        }
        pending
    }
}
