use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use movie_catalog::{
    AppError, TokenService,
    auth::Claims,
    config::ConfigError,
    models::User,
};

// --- Helper Functions ---

const TEST_SECRET: &str = "test-secret-value-1234567890";

fn user(id: i64, name: &str, admin: bool) -> User {
    User {
        id,
        name: name.to_string(),
        password_hash: "$2b$04$not-a-real-hash-but-never-serialized".to_string(),
        admin,
    }
}

fn service() -> TokenService {
    TokenService::new(TEST_SECRET).unwrap()
}

// --- Tests ---

#[test]
fn test_empty_secret_is_a_config_error() {
    let result = TokenService::new("");
    assert_eq!(result.err(), Some(ConfigError::Empty("SECRET_KEY")));
}

#[test]
fn test_issue_then_verify_returns_serialized_user() {
    let tokens = service();
    for u in [user(1, "alice", false), user(2, "root", true), user(42, "", false)] {
        let token = tokens.issue(&u).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user, u.serialized());
    }
}

#[test]
fn test_token_has_three_segments_and_hs256_header() {
    let token = service().issue(&user(1, "alice", false)).unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);

    let header: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
    assert_eq!(header["alg"], "HS256");
}

#[test]
fn test_payload_carries_user_without_password_hash_or_expiry() {
    let token = service().issue(&user(7, "bob", true)).unwrap();
    let payload_segment = token.split('.').nth(1).unwrap();
    let payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload_segment).unwrap()).unwrap();

    assert_eq!(
        payload,
        serde_json::json!({ "user": { "id": 7, "name": "bob", "admin": true } })
    );
    assert!(payload.get("exp").is_none());
}

#[test]
fn test_flipping_any_signature_bit_invalidates_token() {
    let tokens = service();
    let token = tokens.issue(&user(1, "alice", false)).unwrap();
    let (head, signature) = token.rsplit_once('.').unwrap();
    let raw = URL_SAFE_NO_PAD.decode(signature).unwrap();

    for byte in 0..raw.len() {
        for bit in 0..8 {
            let mut tampered = raw.clone();
            tampered[byte] ^= 1 << bit;
            let forged = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(&tampered));
            assert_eq!(
                tokens.verify(&forged),
                Err(AppError::InvalidToken),
                "flipped bit {} of byte {}",
                bit,
                byte
            );
        }
    }
}

#[test]
fn test_token_signed_with_other_secret_is_invalid() {
    let foreign = TokenService::new("some-other-secret").unwrap();
    let token = foreign.issue(&user(1, "alice", true)).unwrap();
    assert_eq!(service().verify(&token), Err(AppError::InvalidToken));
}

#[test]
fn test_other_algorithm_is_rejected_even_with_the_right_secret() {
    let claims = Claims {
        user: user(1, "alice", true).serialized(),
    };
    let token = encode(
        &Header::new(Algorithm::HS384),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service().verify(&token), Err(AppError::InvalidToken));
}

#[test]
fn test_malformed_tokens_are_invalid() {
    let tokens = service();
    for garbage in ["", "abc", "a.b", "a.b.c", "not.a.token.at.all"] {
        assert_eq!(tokens.verify(garbage), Err(AppError::InvalidToken), "{:?}", garbage);
    }
}

#[test]
fn test_payload_without_user_claim_is_invalid() {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({ "sub": "alice" }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service().verify(&token), Err(AppError::InvalidToken));
}
