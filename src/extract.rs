//! Request extractors for the authenticated player and the peer address

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::identity::PlayerIdentity;
use crate::state::AppState;
use crate::validation::Nickname;

/// Caller identity; rejects with 401 when the proxy headers are absent
#[derive(Debug, Clone)]
pub struct Authenticated(pub PlayerIdentity);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = state.identity.identify(&parts.headers)?;
        Ok(Self(identity))
    }
}

/// Authenticated caller who already picked a nickname; 403 otherwise
#[derive(Debug, Clone)]
pub struct RegisteredPlayer {
    pub identity: PlayerIdentity,
    pub nickname: Nickname,
}

impl FromRequestParts<Arc<AppState>> for RegisteredPlayer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(identity) = Authenticated::from_request_parts(parts, state).await?;
        let nickname = state
            .players
            .nickname(&identity.user_id)
            .ok_or(AppError::NicknameRequired)?;
        Ok(Self { identity, nickname })
    }
}

/// Peer address when the server runs with connect info, unspecified otherwise
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub SocketAddr);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 0)));
        Ok(Self(addr))
    }
}
