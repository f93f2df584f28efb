use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::QuantaClock, middleware::NoOpMiddleware, state::keyed::DashMapStateStore, Quota,
    RateLimiter,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::{Arc, Weak},
    time::Duration,
};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Per client IP limiter: `rate_limit_requests` per `rate_limit_window_secs`
pub struct IpRateLimiter {
    limiter: RateLimiter<IpAddr, DashMapStateStore<IpAddr>, QuantaClock, NoOpMiddleware>,
    trust_proxy: bool,
    window: Duration,
}

impl IpRateLimiter {
    pub fn new(config: &ApiConfig) -> Self {
        let requests = NonZeroU32::new(config.rate_limit_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(config.rate_limit_window_secs.max(1));
        // Replenish one request every window/requests, holding at most `requests`
        let period = (window / requests.get()).max(Duration::from_nanos(1));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(requests))
            .allow_burst(requests);

        Self {
            limiter: RateLimiter::keyed(quota),
            trust_proxy: config.trust_proxy,
            window,
        }
    }

    pub fn check_ip(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Number of client keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }

    /// Drop keys whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Prune once per window for as long as the limiter is alive. Does nothing
    /// outside a tokio runtime.
    pub fn spawn_pruning(self: &Arc<Self>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime, rate limiter keys will not be pruned");
            return;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let every = self.window;
        handle.spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(limiter) = weak.upgrade() else { break };
                limiter.prune();
                tracing::debug!("Rate limiter tracking {} client(s)", limiter.tracked_keys());
            }
        });
    }

    fn client_ip(&self, request: &Request) -> IpAddr {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let forwarded = if self.trust_proxy {
            extract_client_ip(request.headers())
        } else {
            None
        };

        forwarded
            .or(peer)
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

/// Extract client IP from proxy headers. Only meaningful behind a proxy that
/// overwrites them.
fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            // First entry is the originating client
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    None
}

pub async fn ip_rate_limit_middleware(
    State(ip_limiter): State<Arc<IpRateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = ip_limiter.client_ip(&request);

    if ip_limiter.check_ip(ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rate limit exceeded for IP: {}", ip);
        Err(ApiError::too_many_requests(
            "Too many requests, please try again later",
        ))
    }
}
