use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header::RETRY_AFTER, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    start: Instant,
    used: u32,
}

/// Fixed one-second window shared by every route of a router.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    per_second: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn per_second(per_second: u32) -> Self {
        Self {
            per_second: per_second.max(1),
            window: Arc::new(Mutex::new(Window {
                start: Instant::now(),
                used: 0,
            })),
        }
    }

    /// On refusal returns how long until the window resets.
    pub fn try_acquire(&self) -> std::result::Result<(), Duration> {
        let mut window = self.window.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let elapsed = now.duration_since(window.start);
        if elapsed >= WINDOW {
            window.start = now;
            window.used = 0;
        }
        if window.used < self.per_second {
            window.used += 1;
            Ok(())
        } else {
            Err(WINDOW.saturating_sub(elapsed))
        }
    }
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match limiter.try_acquire() {
        Ok(()) => next.run(req).await,
        Err(retry_in) => {
            tracing::warn!(path = %req.uri().path(), "Rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "rate_limit_exceeded" })),
            )
                .into_response();
            let seconds = retry_in.as_secs().max(1);
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_once_the_window_is_spent() {
        let limiter = RateLimiter::per_second(2);
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_err());
    }

    #[test]
    fn zero_is_treated_as_one() {
        let limiter = RateLimiter::per_second(0);
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_err());
    }
}
