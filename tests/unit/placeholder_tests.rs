/*!
 * Tests for placeholder protection and restoration
 */

use rpytl::placeholder::{self, PlaceholderCodec, TokenMapping, make_key, parse_key};

/// Protect then restore must give back the input exactly
fn assert_round_trip(text: &str) {
    let mut codec = PlaceholderCodec::new();
    let (protected, _) = codec.protect(text);
    assert_eq!(codec.mapping().restore_all(&protected), text, "round trip failed for {:?}", text);
}

#[test]
fn test_protect_withGreetingLine_shouldProduceSingleKey() {
    let mut codec = PlaceholderCodec::new();
    let (protected, local) = codec.protect("Hello [player_name]!");

    assert_eq!(protected, "Hello @@1@@!");
    assert_eq!(local.len(), 1);
    assert_eq!(local.get("@@1@@"), Some("[player_name]"));
}

#[test]
fn test_roundTrip_withEveryTokenClass_shouldRestoreInput() {
    let samples = [
        "",
        "No placeholders at all.",
        "Hello [player_name]!",
        "{color=#f00}Red{/color} and {size=+10}big{/size}",
        r#"Quote \" and backslash \\ and percent \% and tick \'"#,
        r"Newline\nTab\t",
        "%(name)s has %d coins and %f%% luck, %i %s",
        r"Accent é here",
        "{font=DejaVuSans.ttf}x{/font}{a=https://x}link{/a}{img=icon.png}",
        "Wait{w=0.5} pause{p} {nw}{fast}{slow}{done}{clear}",
        "Literal {{braces}} and [lb]brackets[rb]",
        "Unicode: Xin chào [player_name], {i}bạn{/i}!",
        "Key-looking text @@ not a key @@",
        "@@5[a]",
        "Score @@12{b}@@3 and [x]@@",
    ];

    for sample in samples {
        assert_round_trip(sample);
    }
}

#[test]
fn test_protect_withSameTokenTwice_shouldShareOneKey() {
    let mut codec = PlaceholderCodec::new();
    let (protected, _) = codec.protect("[name] meets [name]");

    assert_eq!(protected, "@@1@@ meets @@1@@");
    assert_eq!(codec.mapping().len(), 1);
}

#[test]
fn test_protect_withDifferentCase_shouldMintSeparateKeys() {
    let mut codec = PlaceholderCodec::new();
    let (protected, _) = codec.protect("{b}x{/b} {B}");

    assert_eq!(protected, "@@1@@x@@2@@ @@3@@");
    assert_eq!(codec.mapping().get("@@3@@"), Some("{B}"));
}

#[test]
fn test_protect_onFreshCodecs_shouldBeDeterministic() {
    let text = "{i}[a]{/i} %s [b] [a]";

    let (first, _) = PlaceholderCodec::new().protect(text);
    let (second, _) = PlaceholderCodec::new().protect(text);

    assert_eq!(first, second);
    assert_eq!(first, "@@1@@@@2@@@@3@@ @@4@@ @@5@@ @@2@@");
}

#[test]
fn test_protect_withKeysInFirstNovelOrder_shouldIncreaseStrictly() {
    let mut codec = PlaceholderCodec::new();
    codec.protect("[c] [b]");
    codec.protect("[b] [a] [c]");

    let keys: Vec<&str> = codec.mapping().iter().map(|(k, _)| k).collect();
    let values: Vec<&str> = codec.mapping().iter().map(|(_, v)| v).collect();
    assert_eq!(keys, vec!["@@1@@", "@@2@@", "@@3@@"]);
    assert_eq!(values, vec!["[c]", "[b]", "[a]"]);
}

#[test]
fn test_protect_withUnterminatedBracket_shouldLeaveTextAlone() {
    let mut codec = PlaceholderCodec::new();
    let (protected, local) = codec.protect("Open [bracket and {brace");

    assert_eq!(protected, "Open [bracket and {brace");
    assert!(local.is_empty());
}

#[test]
fn test_restoreAll_freeFunction_shouldMatchMappingMethod() {
    let mut codec = PlaceholderCodec::new();
    let (protected, _) = codec.protect("[a] then @@7@@");

    let restored = placeholder::restore_all(&protected, codec.mapping());

    assert_eq!(restored, "[a] then @@7@@");
}

#[test]
fn test_restoreAll_withTranslatedText_shouldKeepTranslation() {
    let mut codec = PlaceholderCodec::new();
    codec.protect("Hello [player_name]!");

    let restored = codec.mapping().restore_all("Xin chào @@1@@!");

    assert_eq!(restored, "Xin chào [player_name]!");
}

#[test]
fn test_mappingJson_shouldUseKeysAsObjectFields() {
    let mut codec = PlaceholderCodec::new();
    codec.protect("Hello [player_name]!");

    let json = codec.mapping().to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["@@1@@"], "[player_name]");
}

#[test]
fn test_mappingFromJson_withMalformedJson_shouldFail() {
    assert!(TokenMapping::from_json("not json").is_err());
    assert!(TokenMapping::from_json(r#"["@@1@@"]"#).is_err());
}

#[test]
fn test_keyHelpers_shouldRoundTrip() {
    assert_eq!(make_key(42), "@@42@@");
    assert_eq!(parse_key("@@42@@"), Some(42));
    assert_eq!(parse_key("@@x@@"), None);
    assert_eq!(parse_key("@42@"), None);
}
