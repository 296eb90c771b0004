//! Tests for API key masking in logs.

use llm_client::mask_token;

#[test]
fn short_tokens_are_fully_masked() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("short"), "***");
    assert_eq!(mask_token("12345678901"), "***");
}

#[test]
fn long_tokens_keep_head_and_tail() {
    assert_eq!(mask_token("sk-abcd1234efgh5678"), "sk-abcd***5678");
}

#[test]
fn masked_token_never_contains_middle() {
    let token = "sk-proj-verysecretmiddlepart-tail";
    let masked = mask_token(token);
    assert!(!masked.contains("verysecretmiddlepart"));
    assert!(masked.contains("***"));
}
