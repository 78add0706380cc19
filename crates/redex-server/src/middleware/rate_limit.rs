use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::state::AppState;

/// Fixed-window request limiter keyed by client IP.
pub struct RateLimiter {
    /// Map from IP to (window_start, request_count)
    requests: DashMap<IpAddr, (Instant, u32)>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            requests: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Limiter allowing `max_requests` per one-second window, the only
    /// budget the configuration exposes.
    pub fn per_second(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// Check if a request from this IP is allowed.
    /// Returns Ok(()) if allowed, Err(remaining_wait_time) if rate limited.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        let now = Instant::now();

        let mut entry = self.requests.entry(ip).or_insert((now, 0));
        let (window_start, count) = entry.value_mut();

        if now.duration_since(*window_start) >= self.window {
            *window_start = now;
            *count = 1;
            return Ok(());
        }

        if *count >= self.max_requests {
            return Err(self.window - now.duration_since(*window_start));
        }

        *count += 1;
        Ok(())
    }

    /// Forget clients whose window ended long ago.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.requests
            .retain(|_, (window_start, _)| now.duration_since(*window_start) < self.window * 2);
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

/// Apply the read limiter to GET/HEAD and the write limiter to everything else.
/// Requests without peer info (in-process calls) count as loopback.
pub async fn limit_by_client(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let method = request.method();
    let limiter = if method == Method::GET || method == Method::HEAD {
        &state.read_limiter
    } else {
        &state.write_limiter
    };

    if let Err(wait_time) = limiter.check(ip) {
        tracing::debug!("Rate limited {} for {:?}", ip, wait_time);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            format!("Rate limited. Try again in {:?}", wait_time),
        )
            .into_response();
    }

    next.run(request).await
}
