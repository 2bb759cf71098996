//! マークアップツリー
//!
//! DOMに依存しない純粋な描画結果。HTML文字列へのシリアライズと、
//! クリック処理で使う簡易クエリを提供する（テキスト連結などはテスト専用）。

use std::fmt::Write;

/// マークアップノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// テキストノードを作成
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    #[cfg(test)]
    /// HTML文字列にシリアライズ
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element(el) => el.write_html(out),
        }
    }

    #[cfg(test)]
    /// 子孫を含むテキスト内容を連結
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(el) => el.text_content(),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// 属性値を持たない要素
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// マークアップ要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 属性を設定（同名の属性は上書き）
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// class 属性を設定
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// 子ノードを追加
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// 子ノードをまとめて追加
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// テキストの子ノードを追加
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    /// 属性値を取得
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// 指定クラスを持つか
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// disabled 属性を持つか
    pub fn is_disabled(&self) -> bool {
        self.get_attr("disabled").is_some()
    }

    /// 自身を含む子孫要素のうち条件に一致するものを文書順で返す
    pub fn find_all<F>(&self, pred: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.collect(&pred, &mut found);
        found
    }

    fn collect<'a, F>(&'a self, pred: &F, found: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if pred(self) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                el.collect(pred, found);
            }
        }
    }

    /// 条件に一致する最初の要素
    pub fn find<F>(&self, pred: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.find_all(pred).into_iter().next()
    }

    #[cfg(test)]
    /// 指定クラスを持つ要素を文書順で返す
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(|el| el.has_class(class))
    }

    #[cfg(test)]
    /// 子孫を含むテキスト内容を連結
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// HTML文字列にシリアライズ
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// HTMLエスケープ（テキスト・属性値共通）
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "markup_test.rs"]
mod tests;

#[cfg(test)]
#[path = "markup_proptests.rs"]
mod proptests;
