//! # Authentication Middleware
//!
//! Two guard layers, mirroring the original deployment:
//!
//! 1. **Token auth** - `Authorization: token <api_key>:<api_secret>`.
//!    The key locates the cashier; the secret is verified against its
//!    stored argon2 hash. The authenticated [`CurrentCashier`] is made
//!    available to handlers as a request extension.
//! 2. **Device guard** - `X-Device-Id: <device>` must name a registered,
//!    enabled cashier device. Applied to POS-operation routes only.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use bistro_core::Cashier;
use bistro_db::verify_secret;

/// Header naming the physical terminal.
pub const DEVICE_HEADER: &str = "X-Device-Id";

/// The cashier authenticated by the token middleware.
#[derive(Debug, Clone)]
pub struct CurrentCashier(pub Cashier);

/// Generates one half of an API credential (key or secret).
pub fn generate_credential() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Splits `token <api_key>:<api_secret>` into its parts.
pub fn parse_token_header(header: &str) -> Option<(&str, &str)> {
    header.strip_prefix("token ")?.split_once(':')
}

/// Token-auth middleware: resolves and verifies the cashier credential,
/// then stores [`CurrentCashier`] in request extensions.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::auth("Missing Authorization header"))?;

    let (api_key, api_secret) =
        parse_token_header(header).ok_or_else(|| ApiError::auth("Malformed Authorization header"))?;

    let cashier = state
        .db
        .cashiers()
        .find_by_api_key(api_key)
        .await?
        .ok_or_else(|| ApiError::auth("Invalid or expired token"))?;

    let secret_ok = cashier
        .api_secret_hash
        .as_deref()
        .map(|hash| verify_secret(api_secret, hash))
        .unwrap_or(false);

    if !secret_ok {
        tracing::warn!(api_key, "Token secret verification failed");
        return Err(ApiError::auth("Invalid or expired token"));
    }

    req.extensions_mut().insert(CurrentCashier(cashier));
    Ok(next.run(req).await)
}

/// Device-guard middleware: the request must carry the id of an enabled
/// cashier device.
pub async fn require_device(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let device_id = req
        .headers()
        .get(DEVICE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::device("Missing X-Device-Id header."))?;

    if !state.db.devices().exists_enabled(device_id).await? {
        tracing::warn!(device_id, "Rejected unknown or disabled device");
        return Err(ApiError::device("Unauthorized or disabled device."));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_header() {
        assert_eq!(
            parse_token_header("token abc:def"),
            Some(("abc", "def"))
        );
        // Secrets may themselves contain colons; only the first splits.
        assert_eq!(
            parse_token_header("token k:s:extra"),
            Some(("k", "s:extra"))
        );

        assert_eq!(parse_token_header("Bearer abc"), None);
        assert_eq!(parse_token_header("token abcdef"), None);
        assert_eq!(parse_token_header(""), None);
    }

    #[test]
    fn test_generate_credential_shape() {
        let a = generate_credential();
        let b = generate_credential();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
