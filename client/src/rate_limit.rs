use std::{future::Future, time::Duration};

use log::debug;
use tokio::{
    sync::{Mutex, MutexGuard},
    time::{sleep_until, Instant},
};

/// Serializes requests and keeps at least `interval` between the completion of
/// one request and the start of the next.
#[derive(Debug)]
pub struct RequestGate {
    interval: Duration,
    last_completed: Mutex<Option<Instant>>,
}

/// Records the completion time when dropped, so a failed or cancelled request
/// still throttles its successor.
struct CompletionStamp<'a> {
    last_completed: MutexGuard<'a, Option<Instant>>,
}

impl Drop for CompletionStamp<'_> {
    fn drop(&mut self) {
        *self.last_completed = Some(Instant::now());
    }
}

impl RequestGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_completed: Mutex::new(None),
        }
    }

    pub async fn run<F, Fut, T>(&self, request: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let last_completed = self.last_completed.lock().await;

        if let Some(previous) = *last_completed {
            let next = previous + self.interval;
            let now = Instant::now();
            if next > now {
                debug!("Rate limit: waiting {:?}", next - now);
                sleep_until(next).await;
            }
        }

        let _stamp = CompletionStamp { last_completed };
        request().await
    }
}
