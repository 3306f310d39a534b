//! The poll algorithm shared by both schedulers.

use std::sync::Arc;
use std::time::Duration;

use ak_03_event_decoding::decode_log_for;
use arkiv_telemetry::{metric_inc, CALLBACK_FAILURES, EVENTS_DISPATCHED, POLL_ERRORS};
use shared_types::EventKind;
use tracing::{debug, error, warn};

use super::callback::EventHandler;
use crate::error::LogSourceError;
use crate::ports::{FilterId, LogSource};

/// One filter's poll → decode → dispatch → sleep cycle.
pub struct PollLoop {
    kind: EventKind,
    filter_id: FilterId,
    source: Arc<dyn LogSource>,
    handler: Arc<dyn EventHandler>,
    poll_interval: Duration,
}

impl PollLoop {
    pub fn new(
        kind: EventKind,
        filter_id: FilterId,
        source: Arc<dyn LogSource>,
        handler: Arc<dyn EventHandler>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            kind,
            filter_id,
            source,
            handler,
            poll_interval,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn filter_id(&self) -> &FilterId {
        &self.filter_id
    }

    /// Fetch new logs once and dispatch every matching event in server order.
    ///
    /// Returns the number of events handed to the callback. Undecodable logs
    /// and callback failures are logged and do not fail the poll.
    pub async fn poll_once(&self) -> Result<usize, LogSourceError> {
        let logs = self.source.get_new_entries(&self.filter_id).await?;
        let mut dispatched = 0;

        for log in &logs {
            let event = match decode_log_for(self.kind, log) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        filter_id = %self.filter_id,
                        kind = %self.kind,
                        error = %e,
                        "Skipping undecodable log"
                    );
                    continue;
                }
            };

            let tx_hash = log.transaction_hash.unwrap_or_default();
            let entity_key = event.entity_key();
            metric_inc!(EVENTS_DISPATCHED, &[self.kind.as_str()]);
            dispatched += 1;

            if let Err(e) = self.handler.handle(event, tx_hash).await {
                metric_inc!(CALLBACK_FAILURES, &[self.kind.as_str()]);
                error!(
                    filter_id = %self.filter_id,
                    kind = %self.kind,
                    entity_key = %entity_key,
                    error = %e,
                    "Event callback failed"
                );
            }
        }

        if dispatched > 0 {
            debug!(filter_id = %self.filter_id, kind = %self.kind, dispatched, "Dispatched events");
        }
        Ok(dispatched)
    }

    /// Poll until `keep_running` returns false at the top of an iteration.
    ///
    /// Transport errors are logged and retried after the normal interval.
    pub async fn run<F>(&self, keep_running: F)
    where
        F: Fn() -> bool + Send + Sync,
    {
        debug!(filter_id = %self.filter_id, kind = %self.kind, "Poll loop started");
        while keep_running() {
            if let Err(e) = self.poll_once().await {
                metric_inc!(POLL_ERRORS);
                error!(
                    filter_id = %self.filter_id,
                    kind = %self.kind,
                    error = %e,
                    "Failed to fetch filter changes"
                );
            }
            tokio::time::sleep(self.poll_interval).await;
        }
        debug!(filter_id = %self.filter_id, kind = %self.kind, "Poll loop exited");
    }
}
