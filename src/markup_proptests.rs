use super::*;
use proptest::prelude::*;

proptest! {
    /// エスケープ後の文字列はタグや属性の区切りを含まない
    #[test]
    fn prop_escape_removes_markup_delimiters(input in ".*") {
        let escaped = escape(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    }

    /// テキストノードの内容はシリアライズを経ても text_content で元に戻る
    #[test]
    fn prop_text_content_is_unescaped(input in "[a-zA-Z0-9<>&\"' ]{0,40}") {
        let el = Element::new("span").text(input.clone());
        prop_assert_eq!(el.text_content(), input);
    }
}
