//! Client IP extraction for rate limiting
//!
//! `X-Forwarded-For` is only trusted as far as the configured number of
//! proxies in front of the service.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const UNKNOWN: &str = "unknown";

/// `TRUSTED_PROXY_COUNT`, default 1 (a single load balancer).
pub fn trusted_proxy_count() -> usize {
    std::env::var("TRUSTED_PROXY_COUNT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1)
}

/// Client IP from `X-Forwarded-For`, then `X-Real-IP`, then the socket.
/// Returns `"unknown"` when none yields a valid address.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| from_forwarded_for(v, trusted_proxy_count))
    {
        return ip;
    }

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| is_valid_ip(v))
    {
        return ip.to_string();
    }

    socket_addr
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// With N trusted proxies the client is the entry just before the last N.
/// Chains no longer than N fall back to the last entry.
fn from_forwarded_for(header_value: &str, trusted_proxy_count: usize) -> Option<String> {
    let ips: Vec<&str> = header_value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let candidate = if trusted_proxy_count == 0 || ips.len() <= trusted_proxy_count {
        ips.last()?
    } else {
        ips.get(ips.len() - trusted_proxy_count - 1)?
    };

    is_valid_ip(candidate).then(|| candidate.to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn picks_client_before_trusted_proxies() {
        let h = headers("x-forwarded-for", "203.0.113.7, 10.0.0.1");
        assert_eq!(extract_client_ip(&h, None, 1), "203.0.113.7");
    }

    #[test]
    fn short_chain_uses_last_entry() {
        let h = headers("x-forwarded-for", "203.0.113.7");
        assert_eq!(extract_client_ip(&h, None, 2), "203.0.113.7");
    }

    #[test]
    fn invalid_forwarded_value_falls_back_to_real_ip() {
        let mut h = headers("x-forwarded-for", "not-an-ip");
        h.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(extract_client_ip(&h, None, 1), "198.51.100.2");
    }

    #[test]
    fn socket_address_is_the_last_resort() {
        let addr: SocketAddr = "192.0.2.10:5000".parse().unwrap();
        assert_eq!(extract_client_ip(&HeaderMap::new(), Some(&addr), 1), "192.0.2.10");
        assert_eq!(extract_client_ip(&HeaderMap::new(), None, 1), "unknown");
    }
}
