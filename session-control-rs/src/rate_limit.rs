// Rate Limiting Module using a simple in-memory sliding window.
// One global window shared by all clients; health and root endpoints
// are exempt.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

pub const REQUESTS_PER_WINDOW: u32 = 5;
pub const WINDOW_DURATION: Duration = Duration::from_secs(60);

// Global window tracking
#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

static GLOBAL_WINDOW: Lazy<RwLock<WindowState>> = Lazy::new(|| {
    RwLock::new(WindowState {
        count: 0,
        window_start: Instant::now(),
    })
});

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Rate limit exceeded: {limit} requests per {window_seconds} seconds, retry after {retry_after_seconds} seconds")]
pub struct RateLimitError {
    pub limit: u32,
    pub window_seconds: u64,
    pub retry_after_seconds: u64,
}

// Window arithmetic, separated from the middleware so it can be tested
// with a controlled clock.
fn check_and_update(state: &mut WindowState, now: Instant) -> Result<(), RateLimitError> {
    // Reset window if expired
    if now.duration_since(state.window_start) >= WINDOW_DURATION {
        state.count = 0;
        state.window_start = now;
    }

    if state.count >= REQUESTS_PER_WINDOW {
        let elapsed = now.duration_since(state.window_start);
        return Err(RateLimitError {
            limit: REQUESTS_PER_WINDOW,
            window_seconds: WINDOW_DURATION.as_secs(),
            retry_after_seconds: WINDOW_DURATION.saturating_sub(elapsed).as_secs(),
        });
    }

    state.count += 1;
    Ok(())
}

/// Global rate limiting middleware.
///
/// On limit: 429 with a plain-text body carrying the stringified cause.
pub async fn global_rate_limiter(
    req: Request<Body>,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let path = req.uri().path();

    // Skip rate limiting for health and root endpoints
    if path == "/" || path == "/health" {
        return Ok(next.run(req).await);
    }

    let limited = {
        let mut state = GLOBAL_WINDOW.write().await;
        check_and_update(&mut state, Instant::now())
    };

    if let Err(err) = limited {
        tracing::warn!("Rate limit hit on {}: {}", path, err);
        return Err((StatusCode::TOO_MANY_REQUESTS, err.to_string()));
    }

    Ok(next.run(req).await)
}
