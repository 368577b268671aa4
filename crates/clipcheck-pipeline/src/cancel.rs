//! Cancellation token (§4.7, §5): checked before each adapter call and at
//! each worker-task boundary. A cancelled run waits for the in-flight
//! adapter call to return naturally rather than aborting it.

use tokio::sync::watch;

#[derive(Clone)]
pub struct CancelToken {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelSignal { rx })
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_observes_cancellation() {
        let (token, signal) = CancelToken::new();
        assert!(!signal.is_cancelled());
        token.cancel();
        assert!(signal.is_cancelled());
    }
}
