//! Client address resolution for rate limiting and abuse logging.
//!
//! `X-Forwarded-For` is honored only when the transport peer is inside a
//! configured trusted proxy network; otherwise the peer address is used.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use inkdesk_core::AppError;
use ipnet::IpNet;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolved address of the client that originated the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl FromRequestParts<AppState> for ClientAddress {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| address.ip())
            .ok_or_else(|| AppError::Internal("peer address is unavailable".to_owned()))?;

        let forwarded_for = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok());

        Ok(Self(resolve_client_address(
            peer,
            forwarded_for,
            &state.trusted_proxies,
        )))
    }
}

/// Picks the first forwarded entry from trusted peers, else the peer itself.
pub fn resolve_client_address(
    peer: IpAddr,
    forwarded_for: Option<&str>,
    trusted_proxies: &[IpNet],
) -> String {
    let peer = peer.to_canonical();
    let peer_is_trusted = trusted_proxies.iter().any(|network| network.contains(&peer));

    if peer_is_trusted
        && let Some(client) = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .and_then(|value| value.parse::<IpAddr>().ok())
    {
        return client.to_canonical().to_string();
    }

    peer.to_string()
}
