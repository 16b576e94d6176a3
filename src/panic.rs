//! Press-and-hold panic button
//!
//! A press arms a one-shot timer; releasing before it expires cancels it.
//! Expiry is reported to the App layer as [`ServiceResponse::PanicHoldElapsed`]
//! tagged with the press id, and only the press that is still held may fire.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::messages::ServiceResponse;

struct PendingHold {
    press_id: u64,
    timer: JoinHandle<()>,
}

pub struct PanicButton {
    hold: Duration,
    pending: Option<PendingHold>,
    next_press_id: u64,
    events: mpsc::UnboundedSender<ServiceResponse>,
}

impl PanicButton {
    pub fn new(hold: Duration, events: mpsc::UnboundedSender<ServiceResponse>) -> Self {
        PanicButton {
            hold,
            pending: None,
            next_press_id: 1,
            events,
        }
    }

    pub fn is_pressing(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a hold. Ignored while the emergency is already active or a hold is pending.
    pub fn press(&mut self, emergency_active: bool) -> bool {
        if emergency_active || self.pending.is_some() {
            return false;
        }

        let press_id = self.next_press_id;
        self.next_press_id += 1;

        let hold = self.hold;
        let events = self.events.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            let _ = events.send(ServiceResponse::PanicHoldElapsed { press_id });
        });

        tracing::debug!(press_id, "Panic hold started");
        self.pending = Some(PendingHold { press_id, timer });
        true
    }

    /// Let go of the button; returns whether a pending hold was cancelled
    pub fn release(&mut self) -> bool {
        match self.pending.take() {
            Some(hold) => {
                hold.timer.abort();
                tracing::debug!(press_id = hold.press_id, "Panic hold released");
                true
            }
            None => false,
        }
    }

    /// Accept an expiry. Returns true exactly once for the press still held.
    pub fn complete(&mut self, press_id: u64) -> bool {
        match &self.pending {
            Some(hold) if hold.press_id == press_id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for PanicButton {
    fn drop(&mut self) {
        if let Some(hold) = self.pending.take() {
            hold.timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> (PanicButton, mpsc::UnboundedReceiver<ServiceResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PanicButton::new(Duration::from_secs(3), tx), rx)
    }

    fn fired(rx: &mut mpsc::UnboundedReceiver<ServiceResponse>) -> Vec<u64> {
        let mut ids = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let ServiceResponse::PanicHoldElapsed { press_id } = msg {
                ids.push(press_id);
            }
        }
        ids
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_before_hold_does_not_fire() {
        let (mut panic, mut rx) = button();
        assert!(panic.press(false));
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(panic.release());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(fired(&mut rx).is_empty());
        assert!(!panic.is_pressing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_hold_fires_once() {
        let (mut panic, mut rx) = button();
        assert!(panic.press(false));
        tokio::time::sleep(Duration::from_millis(3001)).await;

        let ids = fired(&mut rx);
        assert_eq!(ids.len(), 1);
        assert!(panic.complete(ids[0]));
        assert!(!panic.complete(ids[0]));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(fired(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_rearmable_while_active() {
        let (mut panic, mut rx) = button();
        assert!(!panic.press(true));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(fired(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_press_while_holding_is_ignored() {
        let (mut panic, mut rx) = button();
        assert!(panic.press(false));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!panic.press(false));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(fired(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_is_discarded() {
        let (mut panic, _rx) = button();
        panic.press(false);
        panic.release();
        panic.press(false);
        // Expiry of the first press must not complete the second
        assert!(!panic.complete(1));
        assert!(panic.is_pressing());
        assert!(panic.complete(2));
    }
}
