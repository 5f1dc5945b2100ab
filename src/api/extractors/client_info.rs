//! Client origin extractor used for access and password reset logs.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header::USER_AGENT, request::Parts, HeaderMap},
};

use crate::config::{COUNTRY_HEADER, UNKNOWN_COUNTRY};
use crate::domain::ClientInfo;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Client IP: proxy headers first, then the peer address.
fn client_ip(parts: &Parts) -> String {
    // Take the first IP in the chain (original client)
    if let Some(ip) = header(&parts.headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    if let Some(real_ip) = header(&parts.headers, "x-real-ip") {
        return real_ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientInfo {
            ip: client_ip(parts),
            browser: header(&parts.headers, USER_AGENT.as_str())
                .unwrap_or("unknown")
                .to_string(),
            country: header(&parts.headers, COUNTRY_HEADER)
                .unwrap_or(UNKNOWN_COUNTRY)
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> ClientInfo {
        let (mut parts, _) = request.into_parts();
        ClientInfo::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_proxy_headers() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "10.0.0.2")
            .header("user-agent", "curl/8.0")
            .header("cf-ipcountry", "DE")
            .body(())
            .unwrap();

        let client = extract(request).await;
        assert_eq!(client.ip, "203.0.113.7");
        assert_eq!(client.browser, "curl/8.0");
        assert_eq!(client.country, "DE");
    }

    #[tokio::test]
    async fn test_connect_info_and_defaults() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));

        let client = extract(request).await;
        assert_eq!(client.ip, "192.0.2.1");
        assert_eq!(client.browser, "unknown");
        assert_eq!(client.country, UNKNOWN_COUNTRY);
    }

    #[tokio::test]
    async fn test_unknown_ip_without_any_source() {
        let client = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(client.ip, "unknown");
    }
}
