/*!
 * Tests for the injectable text transform
 */

use subspine::errors::ConfigError;
use subspine::text_transform::TextTransform;

/// Test the identity transform passes text through untouched
#[test]
fn test_identity_withAnyText_shouldPassThrough() {
    let transform = TextTransform::identity();

    assert!(transform.is_identity());
    assert_eq!(transform.name(), "identity");
    assert_eq!(transform.apply("你好，世界"), "你好，世界");
}

/// Test a custom transform is applied and reported as non-identity
#[test]
fn test_from_fn_withCustomFunction_shouldApply() {
    let transform = TextTransform::from_fn("shout", |text| format!("{}!", text.to_uppercase()));

    assert!(!transform.is_identity());
    assert_eq!(transform.name(), "shout");
    assert_eq!(transform.apply("hello"), "HELLO!");
}

/// Test unknown selector names fail with a descriptive config error
#[test]
fn test_by_name_withUnknownSelector_shouldFail() {
    let err = TextTransform::by_name("s2t").unwrap_err();

    match err {
        ConfigError::UnknownTransform(name) => assert_eq!(name, "s2t"),
        other => panic!("expected UnknownTransform, got {:?}", other),
    }
}

/// Test the default transform is the identity
#[test]
fn test_default_shouldBeIdentity() {
    assert!(TextTransform::default().is_identity());
}
