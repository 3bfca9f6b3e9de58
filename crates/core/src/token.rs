//! Signed ticket token codec.
//!
//! Wire format: `base64url(JSON payload) + "." + base64url(HMAC-SHA256)`,
//! both segments unpadded. The MAC covers exactly the serialized payload
//! bytes. Encoding is deterministic -- no nonce -- because ticket uniqueness
//! is enforced at the ticket row (`ticket_id` disambiguates), never by codec
//! randomness.
//!
//! Verification is pure: it answers "did we produce this bytestring and is
//! it unexpired", never "is this ticket still valid to use". The latter is
//! the check-in engine's job.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::types::DbId;

type HmacSha256 = Hmac<Sha256>;

/// Payload embedded in every ticket token.
///
/// Field names are short on the wire (`t`, `e`, `exp`) to keep the QR code
/// payload compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// The ticket's database id, bound at mint time.
    #[serde(rename = "t")]
    pub ticket_id: DbId,
    /// The event the ticket belongs to.
    #[serde(rename = "e")]
    pub event_id: DbId,
    /// Hard expiry, epoch milliseconds. Independent of check-in state.
    pub exp: i64,
}

/// Why a token failed verification.
///
/// The variants are distinguishable for internal logging only; the check-in
/// engine collapses all of them into one generic "invalid or expired QR
/// code" response so forgery attempts get no diagnostic feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not two dot-separated base64url segments")]
    InvalidFormat,

    #[error("MAC verification failed")]
    InvalidSignature,

    #[error("payload segment is not a valid token payload")]
    InvalidPayload,

    #[error("token expired")]
    Expired,
}

/// Encodes and verifies signed ticket tokens.
///
/// The signing secret is injected at construction -- there is no ambient
/// global lookup inside verification, so the codec is independently testable
/// with an arbitrary secret.
#[derive(Clone)]
pub struct TicketCodec {
    secret: Vec<u8>,
}

impl TicketCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Serialize and sign a payload.
    ///
    /// Deterministic for a given payload + secret.
    pub fn encode(&self, payload: &TokenPayload) -> String {
        let payload_bytes =
            serde_json::to_vec(payload).expect("TokenPayload serialization is infallible");
        let mac = self.compute_mac(&payload_bytes);

        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload_bytes),
            URL_SAFE_NO_PAD.encode(mac)
        )
    }

    /// Verify a token and return its payload.
    ///
    /// Checks, in order: structure, MAC (constant-time), payload shape,
    /// expiry. Pure and side-effect-free; never consults storage.
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.decode_at(token, chrono::Utc::now().timestamp_millis())
    }

    /// [`decode`](Self::decode) against an explicit clock, for expiry tests.
    pub fn decode_at(&self, token: &str, now_ms: i64) -> Result<TokenPayload, TokenError> {
        let mut parts = token.split('.');
        let (payload_seg, mac_seg) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(m), None) if !p.is_empty() && !m.is_empty() => (p, m),
            _ => return Err(TokenError::InvalidFormat),
        };

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_seg)
            .map_err(|_| TokenError::InvalidFormat)?;
        let mac_bytes = URL_SAFE_NO_PAD
            .decode(mac_seg)
            .map_err(|_| TokenError::InvalidFormat)?;

        // verify_slice is a constant-time comparison.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(&payload_bytes);
        mac.verify_slice(&mac_bytes)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload: TokenPayload =
            serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::InvalidPayload)?;

        if payload.exp <= now_ms {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }

    fn compute_mac(&self, payload_bytes: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(payload_bytes);
        mac.finalize().into_bytes().to_vec()
    }
}
