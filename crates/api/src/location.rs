//! Session provenance helpers: device detection, client IP, geolocation.
//!
//! All of this feeds the `sessions` audit table only; none of it affects
//! authentication decisions, so every lookup degrades to a sensible
//! fallback instead of failing the request.

use std::time::Duration;

use axum::http::HeaderMap;
use serde::Deserialize;

/// Deadline for the geolocation API call. Short so a slow upstream never
/// noticeably delays login.
const GEO_TIMEOUT: Duration = Duration::from_secs(3);

/// Derive a human-readable device descriptor from a User-Agent string.
pub fn device_info(user_agent: Option<&str>) -> String {
    let ua = match user_agent {
        Some(ua) if !ua.is_empty() => ua,
        _ => return "Unknown Device".to_string(),
    };

    let browser_os = |browser: &str| -> String {
        if contains(ua, "Windows") {
            format!("{browser} on Windows")
        } else if contains(ua, "Android") {
            // Android UAs also contain "Linux"; check Android first.
            format!("{browser} on Android")
        } else if contains(ua, "Mac") {
            format!("{browser} on macOS")
        } else if contains(ua, "Linux") {
            format!("{browser} on Linux")
        } else {
            browser.to_string()
        }
    };

    // Order matters: Chrome UAs contain "Safari", Edge UAs contain "Chrome".
    if contains(ua, "Edg") {
        "Edge".to_string()
    } else if contains(ua, "Chrome") {
        browser_os("Chrome")
    } else if contains(ua, "Firefox") {
        browser_os("Firefox")
    } else if contains(ua, "Safari") {
        if contains(ua, "iPhone") {
            "Safari on iPhone".to_string()
        } else if contains(ua, "iPad") {
            "Safari on iPad".to_string()
        } else if contains(ua, "Mac") {
            "Safari on macOS".to_string()
        } else {
            "Safari".to_string()
        }
    } else if contains(ua, "Opera") || contains(ua, "OPR") {
        "Opera".to_string()
    } else if contains(ua, "Windows") {
        "Windows Device".to_string()
    } else if contains(ua, "iPhone") {
        "iPhone".to_string()
    } else if contains(ua, "iPad") {
        "iPad".to_string()
    } else if contains(ua, "Android") {
        "Android Device".to_string()
    } else if contains(ua, "Mac") {
        "macOS Device".to_string()
    } else if contains(ua, "Linux") {
        "Linux Device".to_string()
    } else {
        "Unknown Device".to_string()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

/// Extract the client IP from proxy headers.
///
/// `X-Forwarded-For` (first hop) wins, then `X-Real-IP`. Deployments
/// without a reverse proxy record no IP rather than a wrong one.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// True for loopback and RFC 1918-style addresses that a public
/// geolocation API cannot resolve. The 172.* block is treated as private
/// wholesale, matching how sessions were historically recorded.
pub fn is_private_ip(ip: &str) -> bool {
    ip == "::1"
        || ip.starts_with("127.")
        || ip.starts_with("192.168.")
        || ip.starts_with("10.")
        || ip.starts_with("172.")
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Best-effort IP geolocation via ip-api.com.
#[derive(Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
}

impl GeoLocator {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(GEO_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Resolve an IP to a `"City, Region, Country"` string.
    ///
    /// Private addresses and every failure mode fall back to the IP
    /// itself; this never errors and never takes longer than the
    /// request deadline.
    pub async fn resolve(&self, ip: &str) -> String {
        if ip.is_empty() || is_private_ip(ip) {
            return ip.to_string();
        }

        let url = format!("http://ip-api.com/json/{ip}?fields=status,message,city,regionName,country");
        let geo: GeoResponse = match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json().await {
                Ok(geo) => geo,
                Err(e) => {
                    tracing::debug!(ip, error = %e, "geolocation response parse failed");
                    return ip.to_string();
                }
            },
            Ok(resp) => {
                tracing::debug!(ip, status = %resp.status(), "geolocation lookup rejected");
                return ip.to_string();
            }
            Err(e) => {
                tracing::debug!(ip, error = %e, "geolocation lookup failed");
                return ip.to_string();
            }
        };

        if geo.status != "success" {
            return ip.to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(city) = geo.city.filter(|c| !c.is_empty()) {
            parts.push(city);
        }
        if let Some(region) = geo.region.filter(|r| !r.is_empty()) {
            if parts.first().map(String::as_str) != Some(region.as_str()) {
                parts.push(region);
            }
        }
        if let Some(country) = geo.country.filter(|c| !c.is_empty()) {
            parts.push(country);
        }

        if parts.is_empty() {
            ip.to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl Default for GeoLocator {
    fn default() -> Self {
        Self::new()
    }
}
