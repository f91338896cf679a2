// Unit tests for RedactedToken
// Tokens must never leak through Debug, Display, or serde output

use crate::RedactedToken;

/// **VALUE**: Verifies a token value cannot end up in log lines.
///
/// **WHY THIS MATTERS**: Request and refresh paths log liberally at debug
/// level. A derived Debug would print bearer credentials into the log file.
///
/// **BUG THIS CATCHES**: Would catch replacing the manual Debug/Display impls
/// with `#[derive(Debug)]`.
#[test]
fn given_token_when_formatted_then_value_is_hidden() {
    // GIVEN: A token with a recognizable value
    let token = RedactedToken::new("eyJ-super-secret");

    // WHEN: Formatting through both traits
    let debug = format!("{:?}", token);
    let display = format!("{}", token);

    // THEN: Neither contains the secret
    assert!(!debug.contains("super-secret"));
    assert!(!display.contains("super-secret"));
    assert_eq!(token.len(), "eyJ-super-secret".len());
}

#[test]
fn given_token_when_serialized_then_refuses() {
    let token = RedactedToken::new("abc");

    let result = serde_json::to_string(&token);

    assert!(result.is_err(), "tokens must only leave via as_str()");
}

#[test]
fn given_json_string_when_deserialized_then_wraps_value() {
    let token: RedactedToken = serde_json::from_str("\"abc.def.ghi\"").unwrap();

    assert_eq!(token.as_str(), "abc.def.ghi");
    assert_eq!(token.bearer_header(), "Bearer abc.def.ghi");
}

#[test]
fn given_empty_json_string_when_deserialized_then_rejects() {
    let result: Result<RedactedToken, _> = serde_json::from_str("\"\"");

    assert!(result.is_err());
}
