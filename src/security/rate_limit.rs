//! Per-client sliding-window rate limiting.
//!
//! A client is admitted at most `limit` times within any trailing `window`.
//! Admission timestamps are kept per identity key and pruned on every check;
//! a background sweep drops keys that have gone idle so the map stays
//! bounded by the number of recently active clients.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::RateLimitConfig;
use crate::http::request::RequestContext;
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::security::client_ip::request_identity;

/// In-memory sliding-window rate limiter keyed by client identity.
///
/// All state lives behind one mutex, which the sweep shares with the
/// request path. The lock is never held across an await point.
#[derive(Debug)]
pub struct RateLimiter {
    entries: Mutex<HashMap<String, VecDeque<Instant>>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter admitting `limit` requests per `window` per key.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests, config.window())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check and record a request for `key` at the current time.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Check and record a request for `key` as of `now`.
    ///
    /// Rejected requests are not recorded, so a client hammering the
    /// service is readmitted as soon as its oldest admission leaves the
    /// window.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.lock();

        if let Some(timestamps) = entries.get_mut(key) {
            prune(timestamps, now, self.window);
            if timestamps.len() >= self.limit {
                return false;
            }
            timestamps.push_back(now);
            return true;
        }

        if self.limit == 0 {
            return false;
        }
        entries.insert(key.to_string(), VecDeque::from([now]));
        true
    }

    /// Prune every key and drop the ones left empty. Returns how many keys
    /// were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            !timestamps.is_empty()
        });
        before - entries.len()
    }

    /// Number of client keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    /// Spawn the periodic sweep.
    ///
    /// The task holds only a weak reference and exits when the limiter is
    /// dropped or when `shutdown` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(limiter) = limiter.upgrade() else {
                            break;
                        };
                        let removed = limiter.sweep();
                        tracing::debug!(
                            removed,
                            tracked = limiter.tracked_keys(),
                            "Rate limiter sweep complete"
                        );
                    }
                    _ = shutdown.recv() => break,
                }
            }

            tracing::debug!("Rate limiter sweeper stopped");
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        // The map stays consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop timestamps that fell out of the window ending at `now`.
fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = timestamps.front() {
        if now.duration_since(oldest) < window {
            break;
        }
        timestamps.pop_front();
    }
}

/// Middleware stage admitting or rejecting a request by client identity.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request_identity(&request);

    if limiter.allow(&client) {
        return next.run(request).await;
    }

    let request_id = RequestContext::request_id(request.extensions());
    tracing::warn!(ip = %client, request_id = %request_id, "Rate limit exceeded");
    metrics::record_rate_limited();

    ApiResponse::error(
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests. Please try again later.",
    )
}
