//! Password hashing and bearer token signing
//!
//! # Passwords
//!
//! Stored as a random 16-byte salt (hex) plus an iterated SHA-256 digest of
//! `salt:password`. Plain-text passwords never reach the database.
//!
//! # Tokens
//!
//! Access and refresh tokens have the form `<payload-hex>.<signature-hex>`:
//! - payload: canonical JSON of [`TokenClaims`] (sorted keys, no whitespace)
//! - signature: SHA-256 of the canonical payload followed by the signing
//!   secret as a decimal i64 string
//!
//! The signing secret lives in the `settings` table under
//! `token_signing_secret` and is generated on first start.
//!
//! This module holds pure functions and database operations only. The HTTP
//! middleware that reads `Authorization` headers lives in the service crate.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::time::now_millis;

/// Settings key holding the token signing secret
pub const SECRET_SETTING_KEY: &str = "token_signing_secret";

/// SHA-256 iterations applied to each password
pub const PASSWORD_ROUNDS: u32 = 10_000;

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Token is not `<hex>.<hex>` or the payload is not valid claims JSON
    Malformed(String),

    /// Signature does not match the payload
    InvalidSignature,

    /// Token expired at the given epoch milliseconds
    Expired { expired_at: i64 },

    /// Refresh token presented where an access token is needed, or vice versa
    WrongKind { expected: TokenKind },

    /// Database error loading the signing secret
    DatabaseError(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Malformed(reason) => write!(f, "Malformed token: {}", reason),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::Expired { .. } => write!(f, "Token expired"),
            AuthError::WrongKind { expected } => {
                write!(f, "Expected {} token", expected.as_str())
            }
            AuthError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for AuthError {}

// ========================================
// Passwords
// ========================================

/// A salted password digest ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> PasswordHash {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = to_hex(&salt_bytes);
    let hash = digest_password(&salt, password);
    PasswordHash { hash, salt }
}

/// Check a password against a stored salt and digest
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let calculated = digest_password(salt, password);
    constant_time_eq(calculated.as_bytes(), expected_hash.as_bytes())
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut digest = Sha256::digest(format!("{}:{}", salt, password).as_bytes());
    for _ in 1..PASSWORD_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(digest);
        digest = hasher.finalize();
    }
    format!("{:x}", digest)
}

// ========================================
// Signing Secret Management
// ========================================

/// Load the token signing secret, generating one on first use
pub async fn load_signing_secret(db: &SqlitePool) -> Result<i64, AuthError> {
    let result: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(SECRET_SETTING_KEY)
        .fetch_optional(db)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| AuthError::DatabaseError(format!("Invalid i64: {}", e))),
        None => initialize_signing_secret(db).await,
    }
}

/// Generate and store a random non-zero signing secret
pub async fn initialize_signing_secret(db: &SqlitePool) -> Result<i64, AuthError> {
    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let val = rng.gen::<i64>();
            if val != 0 {
                break val;
            }
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(SECRET_SETTING_KEY)
        .bind(secret.to_string())
        .execute(db)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    Ok(secret)
}

// ========================================
// Tokens
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Signed token contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub kind: TokenKind,
    /// Expiry as Unix epoch milliseconds
    pub exp: i64,
}

/// Issue a token for `email` valid for `ttl_minutes`
pub fn issue_token(email: &str, kind: TokenKind, ttl_minutes: i64, secret: i64) -> String {
    let claims = TokenClaims {
        email: email.to_string(),
        kind,
        exp: now_millis() + ttl_minutes * 60_000,
    };
    sign_claims(&claims, secret)
}

/// Serialize and sign claims
pub fn sign_claims(claims: &TokenClaims, secret: i64) -> String {
    // TokenClaims holds only strings and integers; serialization cannot fail
    let value = serde_json::to_value(claims).unwrap_or(Value::Null);
    let payload = to_canonical_json(&value);
    let signature = calculate_signature(&payload, secret);
    format!("{}.{}", to_hex(payload.as_bytes()), signature)
}

/// Verify a token's signature, expiry and kind, returning its claims
pub fn verify_token(token: &str, expected: TokenKind, secret: i64) -> Result<TokenClaims, AuthError> {
    let (payload_hex, signature) = token
        .trim()
        .split_once('.')
        .ok_or_else(|| AuthError::Malformed("missing separator".to_string()))?;

    let payload_bytes =
        from_hex(payload_hex).ok_or_else(|| AuthError::Malformed("payload is not hex".to_string()))?;
    let payload = String::from_utf8(payload_bytes)
        .map_err(|_| AuthError::Malformed("payload is not UTF-8".to_string()))?;

    let calculated = calculate_signature(&payload, secret);
    if !constant_time_eq(calculated.as_bytes(), signature.as_bytes()) {
        return Err(AuthError::InvalidSignature);
    }

    let claims: TokenClaims =
        serde_json::from_str(&payload).map_err(|e| AuthError::Malformed(e.to_string()))?;

    if claims.exp <= now_millis() {
        return Err(AuthError::Expired { expired_at: claims.exp });
    }
    if claims.kind != expected {
        return Err(AuthError::WrongKind { expected });
    }

    Ok(claims)
}

/// SHA-256 of the payload followed by the secret, as 64 hex characters
pub fn calculate_signature(payload: &str, secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Convert JSON to canonical form (sorted keys, no whitespace)
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // serde_json's own string encoding handles escapes correctly
        other => other.to_string(),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: i64 = 123_456_789;

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("hunter2");
        assert_eq!(stored.hash.len(), 64);
        assert_eq!(stored.salt.len(), 32);
        assert!(verify_password("hunter2", &stored.salt, &stored.hash));
        assert!(!verify_password("hunter3", &stored.salt, &stored.hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_token_verifies_with_same_secret() {
        let token = issue_token("ada@museum.org", TokenKind::Access, 5, SECRET);
        let claims = verify_token(&token, TokenKind::Access, SECRET).unwrap();
        assert_eq!(claims.email, "ada@museum.org");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = issue_token("ada@museum.org", TokenKind::Access, 5, SECRET);
        assert_eq!(
            verify_token(&token, TokenKind::Access, 987_654_321),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue_token("ada@museum.org", TokenKind::Access, 5, SECRET);
        let (_, signature) = token.split_once('.').unwrap();

        let forged = TokenClaims {
            email: "mallory@museum.org".to_string(),
            kind: TokenKind::Access,
            exp: now_millis() + 60_000,
        };
        let forged_payload = to_canonical_json(&serde_json::to_value(&forged).unwrap());
        let forged_token = format!("{}.{}", to_hex(forged_payload.as_bytes()), signature);

        assert_eq!(
            verify_token(&forged_token, TokenKind::Access, SECRET),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = TokenClaims {
            email: "ada@museum.org".to_string(),
            kind: TokenKind::Access,
            exp: now_millis() - 1,
        };
        let token = sign_claims(&claims, SECRET);
        assert!(matches!(
            verify_token(&token, TokenKind::Access, SECRET),
            Err(AuthError::Expired { .. })
        ));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let token = issue_token("ada@museum.org", TokenKind::Refresh, 60, SECRET);
        assert_eq!(
            verify_token(&token, TokenKind::Access, SECRET),
            Err(AuthError::WrongKind { expected: TokenKind::Access })
        );
        assert!(verify_token(&token, TokenKind::Refresh, SECRET).is_ok());
    }

    #[test]
    fn test_garbage_tokens_are_malformed() {
        for bad in ["", "no-dot", "zz.abc", "abc.def"] {
            assert!(matches!(
                verify_token(bad, TokenKind::Access, SECRET),
                Err(AuthError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_canonical_json_sorts_keys_and_escapes() {
        let json = serde_json::json!({"z": 3, "a": "q\"uote"});
        assert_eq!(to_canonical_json(&json), r#"{"a":"q\"uote","z":3}"#);
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes = b"museum";
        assert_eq!(from_hex(&to_hex(bytes)).unwrap(), bytes.to_vec());
        assert!(from_hex("abc").is_none());
        assert!(from_hex("zz").is_none());
    }
}
