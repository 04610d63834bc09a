//! Floodgate - Fixed-Window Rate Limiting
//!
//! This crate implements a fixed-window rate limiter with per-policy key
//! namespacing over a shared, pluggable counter store. HTTP route handlers
//! call [`ratelimit::RateLimiter::check_limit`] before the protected action
//! and translate the returned [`ratelimit::Decision`] into a response status
//! and `X-RateLimit-*` headers via [`http::RateLimitHeaders`].

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod sweep;
