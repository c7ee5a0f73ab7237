use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Sends a `ClockTick` every second until aborted or the receiver goes away.
pub struct ClockTicker {
    ui_events: mpsc::Sender<UiEvent>,
}

impl ClockTicker {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut seconds = interval(CLOCK_PERIOD);
        seconds.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first second has not passed yet.
        seconds.tick().await;

        loop {
            seconds.tick().await;
            if self.ui_events.send(UiEvent::ClockTick).await.is_err() {
                break;
            }
        }
    }
}

/// Owns the ticker task. The main loop calls `reconcile` after every event so
/// a ticker only exists while the game clock is running.
pub struct TickerHandle {
    ui_events: mpsc::Sender<UiEvent>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events, task: None }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn reconcile(&mut self, clock_running: bool) {
        match (clock_running, self.task.is_some()) {
            (true, false) => {
                log::debug!("starting clock ticker");
                let ticker = ClockTicker::new(self.ui_events.clone());
                self.task = Some(tokio::spawn(ticker.run()));
            }
            (false, true) => self.stop(),
            _ => {}
        }
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            log::debug!("stopping clock ticker");
            task.abort();
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reconcile_follows_the_clock() {
        let (tx, _rx) = mpsc::channel(4);
        let mut handle = TickerHandle::new(tx);
        assert!(!handle.is_active());

        handle.reconcile(true);
        assert!(handle.is_active());
        handle.reconcile(true);
        assert!(handle.is_active());

        handle.reconcile(false);
        assert!(!handle.is_active());
    }

    #[tokio::test]
    async fn ticker_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let task = tokio::spawn(ClockTicker::new(tx).run());
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("ticker should exit")
            .unwrap();
    }
}
