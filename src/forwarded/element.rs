//! Forwardedヘッダーのパース結果の型

use std::ops::Index;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Forwardedヘッダーの1要素（1ホップ分）
///
/// 4つの既知フィールドは常に存在し、値がない場合は `None`。
/// 値はクオートのエスケープを解除した後の文字列で、大文字小文字はそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ForwardedElement {
    /// プロキシがリクエストを受け付けたインターフェース
    pub by: Option<String>,
    /// プロキシにリクエストを送ったノード
    #[serde(rename = "for")]
    pub for_: Option<String>,
    /// プロキシが受け取った `Host` ヘッダーの値
    pub host: Option<String>,
    /// リクエストに使われたプロトコル
    pub proto: Option<String>,
    /// 既知でないパラメータ（小文字化した名前, 値）。シリアライズ対象外
    #[serde(skip)]
    pub extensions: Vec<(String, String)>,
}

impl ForwardedElement {
    /// 全フィールドが空の要素を作成
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(&self) -> Option<&str> {
        self.by.as_deref()
    }

    pub fn for_node(&self) -> Option<&str> {
        self.for_.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn proto(&self) -> Option<&str> {
        self.proto.as_deref()
    }

    /// 拡張パラメータをヘッダー内の順序で取得
    pub fn extensions(&self) -> &[(String, String)] {
        &self.extensions
    }

    /// 拡張パラメータの値を名前で取得（名前は大文字小文字を区別しない）
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 小文字化済みの名前でフィールドを設定する。既に設定済みなら値を返して拒否する
    pub(crate) fn try_set(&mut self, name: String, value: String) -> Result<(), String> {
        let slot = match name.as_str() {
            "by" => Some(&mut self.by),
            "for" => Some(&mut self.for_),
            "host" => Some(&mut self.host),
            "proto" => Some(&mut self.proto),
            _ => None,
        };

        match slot {
            Some(slot) if slot.is_some() => Err(name),
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None if self.extensions.iter().any(|(key, _)| *key == name) => Err(name),
            None => {
                self.extensions.push((name, value));
                Ok(())
            }
        }
    }
}

/// パース済みのForwardedヘッダー（1要素以上、ヘッダー内の順序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Forwarded {
    elements: Vec<ForwardedElement>,
}

impl Forwarded {
    /// 空でない要素列から作成する
    pub(crate) fn from_elements(first: ForwardedElement, rest: Vec<ForwardedElement>) -> Self {
        let mut elements = Vec::with_capacity(rest.len() + 1);
        elements.push(first);
        elements.extend(rest);
        Self { elements }
    }

    pub fn elements(&self) -> &[ForwardedElement] {
        &self.elements
    }

    /// クライアントに最も近いホップ
    pub fn first(&self) -> &ForwardedElement {
        &self.elements[0]
    }

    /// オリジンサーバーに最も近いホップ
    pub fn last(&self) -> &ForwardedElement {
        &self.elements[self.elements.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// 常に `false`（空の要素列はパースに失敗する）
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForwardedElement> {
        self.elements.iter()
    }

    pub fn into_inner(self) -> Vec<ForwardedElement> {
        self.elements
    }

    /// 最後の要素を所有権ごと取り出す
    pub fn into_last(mut self) -> ForwardedElement {
        self.elements.pop().unwrap_or_default()
    }
}

impl Index<usize> for Forwarded {
    type Output = ForwardedElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl IntoIterator for Forwarded {
    type Item = ForwardedElement;
    type IntoIter = std::vec::IntoIter<ForwardedElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Forwarded {
    type Item = &'a ForwardedElement;
    type IntoIter = std::slice::Iter<'a, ForwardedElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromStr for Forwarded {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parser::parse_forwarded_header(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_set_rejects_duplicates() {
        let mut element = ForwardedElement::new();
        assert!(element.try_set("for".to_string(), "a".to_string()).is_ok());
        assert_eq!(
            element.try_set("for".to_string(), "a".to_string()),
            Err("for".to_string())
        );
        assert!(element.try_set("ext".to_string(), "1".to_string()).is_ok());
        assert!(element.try_set("ext".to_string(), "2".to_string()).is_err());
        assert_eq!(element.for_node(), Some("a"));
        assert_eq!(element.extension("EXT"), Some("1"));
    }

    #[test]
    fn test_serialize_has_exactly_four_keys() {
        let element = ForwardedElement {
            for_: Some("192.0.2.60".to_string()),
            proto: Some("http".to_string()),
            extensions: vec![("secret".to_string(), "x".to_string())],
            ..ForwardedElement::default()
        };
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "by": null,
                "for": "192.0.2.60",
                "host": null,
                "proto": "http",
            })
        );
    }

    #[test]
    fn test_first_and_last() {
        let a = ForwardedElement {
            for_: Some("a".to_string()),
            ..ForwardedElement::default()
        };
        let b = ForwardedElement {
            for_: Some("b".to_string()),
            ..ForwardedElement::default()
        };
        let forwarded = Forwarded::from_elements(a.clone(), vec![b.clone()]);
        assert_eq!(forwarded.len(), 2);
        assert!(!forwarded.is_empty());
        assert_eq!(forwarded.first(), &a);
        assert_eq!(forwarded.last(), &b);
        assert_eq!(forwarded[1], b);
        assert_eq!(forwarded.into_last(), b);
    }
}
