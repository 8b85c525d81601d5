//! Bearer-token expiry checking.
//!
//! Tokens are opaque to this client except for one thing: the middle
//! (claims) segment carries a numeric `exp` claim, seconds since the Unix
//! epoch. Decoding is fail closed — anything that is not a well-formed
//! three-segment credential with a readable future `exp` reads as expired.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Returns `true` if the token is expired, malformed, or otherwise
/// untrustworthy.
///
/// Never panics and never errors: a token that cannot be decoded is
/// treated as expired.
///
/// # Examples
///
/// ```
/// # use stagepass_auth::token::is_token_expired;
/// assert!(is_token_expired("not-a-token"));
/// assert!(is_token_expired(""));
/// ```
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    match decode_expiry(token) {
        Some(exp) => exp <= chrono::Utc::now().timestamp(),
        None => true,
    }
}

/// Extract the `exp` claim from the token's claims segment.
///
/// Returns `None` on any structural or decode failure.
fn decode_expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&payload).ok()?;

    claims.get("exp").and_then(serde_json::Value::as_i64)
}
