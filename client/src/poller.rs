use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::proxy::AuctionContract;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Background task repeating `get_price` on a fixed interval.
///
/// The first poll happens one interval after spawning. Failed polls are logged and the
/// loop carries on. Once [`PricePoller::stop`] returns, the callback never runs again;
/// dropping the poller cancels it as well.
pub struct PricePoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PricePoller {
    pub fn spawn<C, F>(contract: Arc<C>, period: Duration, on_price: F) -> Self
    where
        C: AuctionContract,
        F: Fn(u64) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let polled = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    polled = contract.get_price() => polled,
                };

                match polled {
                    Ok(price) => on_price(price),
                    Err(err) => log::warn!("price poll failed: {err}"),
                }
            }

            log::debug!("price poller stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    log::error!("price poller panicked: {err}");
                }
            }
        }
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
