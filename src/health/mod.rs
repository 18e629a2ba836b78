use crate::api::HealthProbe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// API status as shown by the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Checking,
    Healthy,
    Unhealthy,
}

impl HealthState {
    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Checking => "Checking...",
            HealthState::Healthy => "API Healthy",
            HealthState::Unhealthy => "API Down",
        }
    }
}

/// Probe once; any successful answer counts as healthy
pub async fn probe_once<P: HealthProbe + ?Sized>(probe: &P) -> HealthState {
    match probe.check().await {
        Ok(report) => {
            debug!("Health check answered: {}", report.status);
            HealthState::Healthy
        }
        Err(e) => {
            debug!("Health check failed: {}", e);
            HealthState::Unhealthy
        }
    }
}

/// Background task probing the API on a fixed interval
///
/// The first probe runs immediately. A failure is only retried at the next
/// tick. The task is aborted when the monitor is stopped or dropped.
pub struct HealthMonitor {
    state: watch::Receiver<HealthState>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn<P: HealthProbe + 'static>(probe: Arc<P>, every: Duration) -> Self {
        let (tx, rx) = watch::channel(HealthState::Checking);
        let every = every.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let next = probe_once(probe.as_ref()).await;

                let changed = tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });
                if changed {
                    match next {
                        HealthState::Unhealthy => warn!("Rentals API is down"),
                        _ => info!("Rentals API is healthy"),
                    }
                }
            }
        });

        Self { state: rx, task }
    }

    pub fn state(&self) -> HealthState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state.clone()
    }

    /// Cancel the polling task; subscribers see the channel close
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::HealthReport;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::{sleep, Instant};

    struct SwitchProbe {
        healthy: AtomicBool,
        calls: AtomicUsize,
    }

    impl SwitchProbe {
        fn new(healthy: bool) -> Arc<Self> {
            Arc::new(Self {
                healthy: AtomicBool::new(healthy),
                calls: AtomicUsize::new(0),
            })
        }

        fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthProbe for SwitchProbe {
        async fn check(&self) -> Result<HealthReport, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.healthy.load(Ordering::SeqCst) {
                Ok(HealthReport {
                    status: "ok".to_string(),
                })
            } else {
                Err(ApiError::Status {
                    status: 503,
                    reason: "Service Unavailable".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn probe_once_maps_results() {
        assert_eq!(probe_once(SwitchProbe::new(true).as_ref()).await, HealthState::Healthy);
        assert_eq!(probe_once(SwitchProbe::new(false).as_ref()).await, HealthState::Unhealthy);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_within_one_interval() {
        let probe = SwitchProbe::new(false);
        let monitor = HealthMonitor::spawn(probe.clone(), Duration::from_secs(30));
        let mut rx = monitor.subscribe();
        assert_eq!(monitor.state(), HealthState::Checking);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), HealthState::Unhealthy);
        let failed_at = Instant::now();

        probe.set_healthy(true);
        rx.changed().await.unwrap();

        assert_eq!(monitor.state(), HealthState::Healthy);
        assert!(failed_at.elapsed() <= Duration::from_secs(30));
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_wait_for_the_next_tick() {
        let probe = SwitchProbe::new(false);
        let monitor = HealthMonitor::spawn(probe.clone(), Duration::from_secs(30));
        let mut rx = monitor.subscribe();
        rx.changed().await.unwrap();

        sleep(Duration::from_secs(29)).await;
        assert_eq!(probe.calls(), 1);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(probe.calls(), 2);
        assert_eq!(monitor.state(), HealthState::Unhealthy);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_ends_the_task() {
        let probe = SwitchProbe::new(true);
        let monitor = HealthMonitor::spawn(probe.clone(), Duration::from_secs(30));
        let mut rx = monitor.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), HealthState::Healthy);

        monitor.stop();

        assert!(rx.changed().await.is_err());
        sleep(Duration::from_secs(120)).await;
        assert_eq!(probe.calls(), 1);
    }

    #[test]
    fn labels_match_indicator_text() {
        assert_eq!(HealthState::Checking.label(), "Checking...");
        assert_eq!(HealthState::Unhealthy.label(), "API Down");
    }
}
