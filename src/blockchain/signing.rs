// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key handling.
//!
//! The gateway holds one secp256k1 key per network bundle. Key material is
//! kept in a [`KeyMaterial`] handle that zeroizes its buffer on drop and never
//! prints its contents. A [`PrivateKeySigner`] is only materialised for the
//! duration of a single mint and dropped right after signing.

use std::fmt;

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;
use zeroize::Zeroizing;

use super::client::ChainClientError;

/// Secret key material, as configured (hex or PEM).
#[derive(Clone)]
pub struct KeyMaterial(Zeroizing<String>);

impl KeyMaterial {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Build a short-lived signer from this key material.
    ///
    /// Accepts a 64-char hex key (with or without `0x`) or a PEM-encoded
    /// SEC1/PKCS#8 secp256k1 key.
    pub fn signer(&self) -> Result<PrivateKeySigner, ChainClientError> {
        let raw = self.0.trim();
        if raw.starts_with("-----BEGIN") {
            let hex_key = pem_to_hex(raw.as_bytes())?;
            signer_from_hex(&hex_key)
        } else {
            signer_from_hex(raw.strip_prefix("0x").unwrap_or(raw))
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***REDACTED***)")
    }
}

impl fmt::Display for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

/// Create a signer from a hex private key (no `0x` prefix).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainClientError> {
    let key_bytes = Zeroizing::new(
        alloy::hex::decode(private_key_hex)
            .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?,
    );

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
}

/// Parse a private key from PEM format to hex string.
///
/// Both SEC1 (`EC PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) containers are
/// accepted.
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<Zeroizing<String>, ChainClientError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| {
            use k256::pkcs8::DecodePrivateKey;
            SecretKey::from_pkcs8_der(pem.contents()).map_err(|e| e.to_string())
        })
        .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    Ok(Zeroizing::new(alloy::hex::encode(secret_key.to_bytes())))
}
