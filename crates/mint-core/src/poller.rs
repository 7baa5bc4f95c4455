//! Fixed-interval background refresh of contract state.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::controller::MintController;
use crate::ports::{ClockPort, NotifierPort, WalletPort};

/// Owns both polling tasks. Dropping it cancels them.
#[derive(Debug)]
pub struct PollHandle {
    presale: JoinHandle<()>,
    supply: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.presale.abort();
        self.supply.abort();
    }

    pub fn presale_watch_finished(&self) -> bool {
        self.presale.is_finished()
    }

    pub fn supply_watch_finished(&self) -> bool {
        self.supply.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start the presale watcher (stops once the presale has ended) and the
/// supply watcher (runs until cancelled). The first tick fires one `period`
/// after spawning.
pub fn spawn_polling<W, C, N>(
    controller: Arc<MintController<W, C, N>>,
    period: Duration,
    runtime: &Handle,
) -> PollHandle
where
    W: WalletPort + Send + Sync + 'static,
    C: ClockPort + Send + Sync + 'static,
    N: NotifierPort + Send + Sync + 'static,
{
    let presale = runtime.spawn(watch_presale(Arc::clone(&controller), period));
    let supply = runtime.spawn(watch_supply(controller, period));
    PollHandle { presale, supply }
}

async fn watch_presale<W, C, N>(controller: Arc<MintController<W, C, N>>, period: Duration)
where
    W: WalletPort + Send + Sync + 'static,
    C: ClockPort + Send + Sync + 'static,
    N: NotifierPort + Send + Sync + 'static,
{
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let controller = Arc::clone(&controller);
        let ended = tokio::task::spawn_blocking(move || {
            matches!(controller.check_presale_started(), Ok(true))
                && matches!(controller.check_presale_ended(), Ok(true))
        })
        .await;
        match ended {
            Ok(true) => {
                info!("presale has ended, presale watcher stopping");
                break;
            }
            Ok(false) => debug!("presale watcher tick"),
            Err(e) => warn!(error = %e, "presale watcher tick failed"),
        }
    }
}

async fn watch_supply<W, C, N>(controller: Arc<MintController<W, C, N>>, period: Duration)
where
    W: WalletPort + Send + Sync + 'static,
    C: ClockPort + Send + Sync + 'static,
    N: NotifierPort + Send + Sync + 'static,
{
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let controller = Arc::clone(&controller);
        let refreshed =
            tokio::task::spawn_blocking(move || controller.refresh_tokens_minted()).await;
        if let Err(e) = refreshed {
            warn!(error = %e, "supply watcher tick failed");
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
