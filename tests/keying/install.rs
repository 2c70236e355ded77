//! Install, verification and rekey against a scripted engine.

use crate::ScriptedEngine;
use rowmap::rowmap_security::{
    KeyError, KeyOptions, KeyState, KeyedConnection, VERIFICATION_SQL,
};

// =============================================================================
// Install
// =============================================================================

#[test]
fn test_correct_key_verified() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"s3cret"));
    assert_eq!(conn.state(), KeyState::Unkeyed);
    assert_eq!(conn.install("s3cret").unwrap(), KeyState::Verified);
    assert_eq!(
        conn.engine().calls,
        vec!["set_key main".to_owned(), VERIFICATION_SQL.to_owned()]
    );
}

#[test]
fn test_incorrect_key_is_invalid_key() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"s3cret"));
    let err = conn.install("guess").unwrap_err();
    assert!(err.is_invalid_key());
    assert_eq!(
        err.to_string(),
        "invalid key for database `main`: file is not a database"
    );
    assert_eq!(conn.state(), KeyState::Unkeyed);
}

#[test]
fn test_raw_key_matches_hex_literal_form() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"x'00ff10'"));
    assert_eq!(
        conn.install(&[0x00u8, 0xff, 0x10][..]).unwrap(),
        KeyState::Verified
    );
}

#[test]
fn test_retry_after_wrong_key() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"right"));
    assert!(conn.install("wrong").is_err());
    assert_eq!(conn.install("right").unwrap(), KeyState::Verified);
}

#[test]
fn test_custom_verification_statement() {
    let opts = KeyOptions::new().verification_sql("SELECT 1 FROM users LIMIT 1;");
    let mut conn = KeyedConnection::with_options(ScriptedEngine::encrypted_with(b"k"), opts);
    conn.install("k").unwrap();
    assert_eq!(conn.engine().calls[1], "SELECT 1 FROM users LIMIT 1;");
}

#[test]
fn test_verification_disabled() {
    let opts = KeyOptions::new().verify(false);
    let mut conn = KeyedConnection::with_options(ScriptedEngine::encrypted_with(b"k"), opts);
    assert_eq!(conn.install("not-k").unwrap(), KeyState::Keyed);
    assert_eq!(conn.engine().calls, vec!["set_key main".to_owned()]);
}

#[test]
fn test_configured_database_name() {
    let opts = KeyOptions::new().database("archive");
    let mut conn = KeyedConnection::with_options(ScriptedEngine::encrypted_with(b"k"), opts);
    conn.install("k").unwrap();
    assert_eq!(conn.state_of("archive"), KeyState::Verified);
    assert_eq!(conn.state_of("main"), KeyState::Unkeyed);
    assert_eq!(conn.engine().calls[0], "set_key archive");
}

#[test]
fn test_engine_without_cipher_is_refused() {
    let mut engine = ScriptedEngine::encrypted_with(b"k");
    engine.plaintext = true;
    let mut conn = KeyedConnection::new(engine);
    let err = conn.install("k").unwrap_err();
    assert_eq!(
        err,
        KeyError::CipherUnavailable {
            database: "main".into()
        }
    );
    assert_eq!(conn.state(), KeyState::Unkeyed);
    assert!(conn.engine().calls.is_empty());
}

// =============================================================================
// Rekey
// =============================================================================

#[test]
fn test_rekey_then_reopen_with_new_key() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"old"));
    conn.install("old").unwrap();
    conn.rekey("new").unwrap();

    let engine = conn.into_engine();
    assert_eq!(engine.calls.last().map(String::as_str), Some("rekey main"));

    let mut reopened = KeyedConnection::new(engine);
    assert!(reopened.install("old").unwrap_err().is_invalid_key());
    assert_eq!(reopened.install("new").unwrap(), KeyState::Verified);
}

#[test]
fn test_failed_rekey_keeps_old_key() {
    let mut conn = KeyedConnection::new(ScriptedEngine::encrypted_with(b"old"));
    conn.install("old").unwrap();
    conn.engine_mut().fail_rekey = true;

    let err = conn.rekey("new").unwrap_err();
    assert!(matches!(err, KeyError::Engine(ref e) if e.code == Some(5)));
    assert_eq!(conn.state(), KeyState::Verified);
    assert_eq!(conn.engine().accepted, b"old".to_vec());
}

#[test]
fn test_rekey_unkeyed_database() {
    let mut conn = KeyedConnection::new(ScriptedEngine::default());
    assert_eq!(
        conn.rekey("new").unwrap_err(),
        KeyError::NotKeyed {
            database: "main".into()
        }
    );
    assert!(conn.engine().calls.is_empty());
}
