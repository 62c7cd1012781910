use crate::utils::ip_extraction::{extract_client_ip, trusted_proxy_count};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use intake_infra::ErrorResponse;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const WINDOW_SECONDS: u64 = 60;
const MAX_BUCKETS_PER_SHARD: usize = 10_000;

/// Fixed-window counter for one client.
#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new(window_seconds: u64) -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + Duration::from_secs(window_seconds),
        }
    }

    fn check_and_increment(&mut self, limit: u32, window_seconds: u64) -> (bool, u32) {
        let now = Instant::now();

        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + Duration::from_secs(window_seconds);
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// Per-IP rate limiter
///
/// Buckets live in several independently locked shards; a key's shard is
/// chosen by hash.
#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, RateLimitBucket>>>>,
    limit_per_minute: u32,
    window_seconds: u64,
}

impl HttpRateLimiter {
    pub fn new(limit_per_minute: u32) -> Self {
        Self::with_shards(limit_per_minute, 16)
    }

    pub fn with_shards(limit_per_minute: u32, shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            limit_per_minute,
            window_seconds: WINDOW_SECONDS,
        }
    }

    pub fn limit_per_minute(&self) -> u32 {
        self.limit_per_minute
    }

    fn shard_for(&self, key: &str) -> &Arc<Mutex<HashMap<String, RateLimitBucket>>> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Drop buckets whose window ended more than one window ago.
    pub async fn cleanup_expired_buckets(&self) {
        let now = Instant::now();
        let grace = Duration::from_secs(self.window_seconds);
        let mut cleaned = 0;

        for shard in &self.shards {
            let mut buckets = shard.lock().await;
            let before = buckets.len();
            buckets.retain(|_, bucket| bucket.reset_at > now || now - bucket.reset_at < grace);
            cleaned += before - buckets.len();
        }

        if cleaned > 0 {
            tracing::debug!(buckets_cleaned = cleaned, "Cleaned up expired rate limit buckets");
        }
    }

    /// Count one request for `key`. Returns the remaining allowance, or the
    /// time until the window resets when the limit is exhausted.
    pub async fn check_rate_limit(&self, key: &str) -> Result<u32, Duration> {
        let mut buckets = self.shard_for(key).lock().await;

        if buckets.len() >= MAX_BUCKETS_PER_SHARD && !buckets.contains_key(key) {
            let now = Instant::now();
            buckets.retain(|_, bucket| bucket.reset_at > now);

            if buckets.len() >= MAX_BUCKETS_PER_SHARD {
                let oldest = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    buckets.remove(&oldest);
                }
            }
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| RateLimitBucket::new(self.window_seconds));

        match bucket.check_and_increment(self.limit_per_minute, self.window_seconds) {
            (true, remaining) => Ok(remaining),
            (false, _) => Err(bucket.reset_in()),
        }
    }
}

/// Per-IP rate limiting middleware
///
/// Adds `X-RateLimit-Limit` and `X-RateLimit-Remaining` to every response and
/// answers 429 with `Retry-After` once a client's window is exhausted.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let socket_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = extract_client_ip(request.headers(), socket_addr.as_ref(), trusted_proxy_count());
    let key = format!("ip:{}", ip);
    let limit = rate_limiter.limit_per_minute();

    match rate_limiter.check_rate_limit(&key).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            set_limit_headers(&mut response, limit, remaining);
            response
        }
        Err(reset_in) => {
            let reset_seconds = reset_in.as_secs().max(1);
            tracing::warn!(
                client = %key,
                path = %request.uri().path(),
                limit = limit,
                "Rate limit exceeded"
            );

            let mut body = ErrorResponse::new("Too many requests. Please slow down.");
            body.code = Some("RATE_LIMITED".to_string());
            body.recoverable = Some(true);

            let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
            set_limit_headers(&mut response, limit, 0);
            if let Ok(value) = HeaderValue::from_str(&reset_seconds.to_string()) {
                response.headers_mut().insert("Retry-After", value);
            }
            response
        }
    }
}

fn set_limit_headers(response: &mut Response, limit: u32, remaining: u32) {
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_the_limit() {
        let limiter = HttpRateLimiter::new(2);
        assert_eq!(limiter.check_rate_limit("ip:1.2.3.4").await, Ok(1));
        assert_eq!(limiter.check_rate_limit("ip:1.2.3.4").await, Ok(0));
        assert!(limiter.check_rate_limit("ip:1.2.3.4").await.is_err());
    }

    #[tokio::test]
    async fn clients_are_counted_separately() {
        let limiter = HttpRateLimiter::with_shards(1, 4);
        assert!(limiter.check_rate_limit("ip:1.1.1.1").await.is_ok());
        assert!(limiter.check_rate_limit("ip:2.2.2.2").await.is_ok());
        assert!(limiter.check_rate_limit("ip:1.1.1.1").await.is_err());
    }

    #[tokio::test]
    async fn cleanup_keeps_live_buckets() {
        let limiter = HttpRateLimiter::new(1);
        limiter.check_rate_limit("ip:1.1.1.1").await.unwrap();
        limiter.cleanup_expired_buckets().await;
        assert!(limiter.check_rate_limit("ip:1.1.1.1").await.is_err());
    }
}
