//! Client-identifier extraction from proxy headers.

/// Placeholder identifier when no usable address header is present.
///
/// All such requests share one bucket, which rate-limits unidentifiable
/// traffic collectively rather than letting it through unmetered.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Proxy-supplied address headers for one request.
///
/// The caller copies the relevant values out of its web framework's request
/// type; this keeps the limiter framework-agnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardHeaders<'a> {
    /// `X-Forwarded-For`, possibly a comma-separated proxy chain
    pub forwarded_for: Option<&'a str>,
    /// `X-Real-IP`
    pub real_ip: Option<&'a str>,
    /// CDN-specific header such as `CF-Connecting-IP`
    pub cdn_ip: Option<&'a str>,
}

/// Pick the client identifier out of proxy headers.
///
/// Priority order: the first entry of the forwarded-for chain (the original
/// client in a well-behaved proxy stack), then the real-ip header, then the
/// CDN header. Empty or whitespace-only values are skipped. Falls back to
/// [`UNKNOWN_CLIENT`]. Note that forwarded headers are client-controllable
/// unless a trusted proxy overwrites them; deciding which headers to trust
/// is the caller's deployment concern.
pub fn client_identifier(headers: &ForwardHeaders<'_>) -> String {
    if let Some(chain) = headers.forwarded_for {
        if let Some(first) = chain.split(',').map(str::trim).find(|e| !e.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(ip) = usable(headers.real_ip) {
        return ip.to_string();
    }
    if let Some(ip) = usable(headers.cdn_ip) {
        return ip.to_string();
    }

    UNKNOWN_CLIENT.to_string()
}

fn usable(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
