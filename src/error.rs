// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service-boundary error taxonomy and its HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::ChainClientError;

/// Failures the gateway reports to callers.
///
/// Every variant has a stable reason code (see [`GatewayError::code`]);
/// messages are informational only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("chain RPC unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("signing failed: {0}")]
    SigningFailure(String),

    #[error("broadcast rejected: {0}")]
    BroadcastRejected(String),

    /// Ledger write failed. Logged only, never surfaced on the read path.
    #[error("ledger write failed: {0}")]
    SinkFailure(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("network not configured: {0}")]
    NetworkNotConfigured(String),

    #[error("invalid token id: {0}")]
    InvalidTokenId(String),

    #[error("token not found: {0}")]
    TokenNotFound(String),
}

impl GatewayError {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            GatewayError::InvalidAddress(_) => "InvalidAddress",
            GatewayError::NetworkUnreachable(_) => "NetworkUnreachable",
            GatewayError::SigningFailure(_) => "SigningFailure",
            GatewayError::BroadcastRejected(_) => "BroadcastRejected",
            GatewayError::SinkFailure(_) => "SinkFailure",
            GatewayError::UnknownNetwork(_) => "UnknownNetwork",
            GatewayError::NetworkNotConfigured(_) => "NetworkNotConfigured",
            GatewayError::InvalidTokenId(_) => "InvalidTokenId",
            GatewayError::TokenNotFound(_) => "TokenNotFound",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidAddress(_)
            | GatewayError::UnknownNetwork(_)
            | GatewayError::InvalidTokenId(_) => StatusCode::BAD_REQUEST,
            GatewayError::TokenNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::UpstreamUnavailable(_) | GatewayError::NetworkUnreachable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::BroadcastRejected(_) => StatusCode::BAD_GATEWAY,
            GatewayError::SigningFailure(_)
            | GatewayError::SinkFailure(_)
            | GatewayError::NetworkNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ChainClientError> for GatewayError {
    fn from(err: ChainClientError) -> Self {
        match err {
            ChainClientError::InvalidRpcUrl(msg) => GatewayError::NetworkUnreachable(msg),
            ChainClientError::InvalidPrivateKey(msg) | ChainClientError::Signing(msg) => {
                GatewayError::SigningFailure(msg)
            }
            ChainClientError::Rejected(msg) => GatewayError::BroadcastRejected(msg),
            e @ (ChainClientError::Unavailable(_)
            | ChainClientError::Timeout(_)
            | ChainClientError::Reverted(_)
            | ChainClientError::Decode(_)) => {
                GatewayError::UpstreamUnavailable(e.to_string())
            }
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<&'static str>,
}

/// JSON error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Stable reason code, when the failure has one
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
            code: Some(err.code()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}
