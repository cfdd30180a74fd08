//! Background page fetching.
//!
//! Requests are served one at a time, in the order they were made, by a
//! single thread that owns the provider. Results go back through a channel
//! supplied by the caller, so they can share the UI's event queue.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::{Page, PageProvider, ProviderError};

/// Result of one page request.
#[derive(Debug)]
pub struct FetchOutcome<R> {
    pub page: u32,
    pub result: Result<Page<R>, ProviderError>,
}

/// Handle to the fetch thread. Dropping it stops the thread after the
/// request in flight (if any) completes.
pub struct FetchWorker {
    requests: Sender<u32>,
    /// Kept so the thread is not reported as leaked; never joined.
    _handle: JoinHandle<()>,
}

impl FetchWorker {
    /// Spawns the worker thread.
    ///
    /// Every outcome is passed through `wrap` and sent on `results`. The
    /// thread exits once either side of the channel pair is gone.
    pub fn spawn<P, T, F>(mut provider: P, results: Sender<T>, wrap: F) -> Self
    where
        P: PageProvider + 'static,
        T: Send + 'static,
        F: Fn(FetchOutcome<P::Row>) -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<u32>();
        let handle = thread::spawn(move || {
            for page in rx {
                debug!(page, "fetching page");
                let result = provider.fetch_page(page);
                if let Err(ref e) = result {
                    warn!(page, error = %e, "page fetch failed");
                }
                if results.send(wrap(FetchOutcome { page, result })).is_err() {
                    break;
                }
            }
            debug!("fetch worker stopped");
        });
        Self {
            requests: tx,
            _handle: handle,
        }
    }

    /// Queues a page request.
    pub fn request(&self, page: u32) -> Result<(), ProviderError> {
        self.requests
            .send(page)
            .map_err(|_| ProviderError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::provider::MockProvider;
    use crate::species::Species;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn pages_come_back_in_request_order() {
        let (tx, rx) = mpsc::channel();
        let worker = FetchWorker::spawn(MockProvider::new(50, 10), tx, |o| o);

        worker.request(0).unwrap();
        worker.request(1).unwrap();
        worker.request(9).unwrap();

        let a: FetchOutcome<Species> = rx.recv_timeout(TIMEOUT).unwrap();
        let b = rx.recv_timeout(TIMEOUT).unwrap();
        let c = rx.recv_timeout(TIMEOUT).unwrap();
        assert_eq!((a.page, b.page, c.page), (0, 1, 9));
        assert_eq!(a.result.unwrap().rows.len(), 10);
        assert_eq!(b.result.unwrap().rows[0].id, 11);
        assert!(c.result.unwrap().rows.is_empty());
    }

    #[test]
    fn outcomes_are_wrapped() {
        let (tx, rx) = mpsc::channel();
        let worker = FetchWorker::spawn(MockProvider::new(5, 5), tx, |o| {
            (o.page, o.result.map(|p| p.rows.len()))
        });
        worker.request(0).unwrap();
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), (0, Ok(5)));
    }

    #[test]
    fn request_fails_once_results_are_dropped() {
        let (tx, rx) = mpsc::channel::<FetchOutcome<Species>>();
        let worker = FetchWorker::spawn(MockProvider::new(5, 5), tx, |o| o);
        drop(rx);

        // The first request is accepted; its send fails and the thread exits.
        worker.request(0).unwrap();
        let mut disconnected = false;
        for _ in 0..200 {
            if worker.request(0) == Err(ProviderError::Disconnected) {
                disconnected = true;
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(disconnected);
    }
}
