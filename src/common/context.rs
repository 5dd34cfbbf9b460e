//! リクエストコンテキストの実装

use std::any::Any;
use std::collections::HashMap;

/// リクエストコンテキスト（ミドルウェアがリクエストに付与した値の置き場）
#[derive(Debug, Default)]
pub struct RequestContext {
    metadata: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// 新しいRequestContextを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を設定（同じキーの値は置き換える）
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.metadata.insert(key.to_string(), Box::new(value));
    }

    /// 値を取得（型が違う場合は `None`）
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.metadata
            .get(key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// 値を削除して返却
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.metadata
            .remove(key)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarded::ForwardedElement;

    #[test]
    fn test_store_forwarded_element() {
        let mut context = RequestContext::new();
        let element = ForwardedElement {
            proto: Some("https".to_string()),
            ..ForwardedElement::default()
        };

        context.set("forwarded", element.clone());
        assert!(context.contains_key("forwarded"));
        assert_eq!(context.get::<ForwardedElement>("forwarded"), Some(&element));

        // 間違った型
        assert_eq!(context.get::<String>("forwarded"), None);

        let removed: Option<ForwardedElement> = context.remove("forwarded");
        assert_eq!(removed, Some(element));
        assert!(!context.contains_key("forwarded"));
    }

    #[test]
    fn test_set_replaces_value() {
        let mut context = RequestContext::new();
        context.set("forwarded", ForwardedElement::default());
        let replaced = ForwardedElement {
            for_: Some("unknown".to_string()),
            ..ForwardedElement::default()
        };
        context.set("forwarded", replaced.clone());
        assert_eq!(context.get::<ForwardedElement>("forwarded"), Some(&replaced));
    }
}
