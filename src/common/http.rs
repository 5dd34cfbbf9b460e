//! HTTPリクエストの基本型

use std::collections::HashMap;
use std::fmt;

use super::context::RequestContext;
use crate::forwarded::{ForwardedElement, FORWARDED_CONTEXT_KEY};

/// HTTPメソッド
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
        };
        f.write_str(name)
    }
}

/// HTTPリクエスト
#[derive(Debug)]
pub struct Request {
    /// HTTPメソッド
    pub method: Method,
    /// リクエストパス
    pub path: String,
    /// HTTPヘッダー（名前は受け取ったままの大文字小文字）
    pub headers: HashMap<String, String>,
    /// リクエストボディ
    pub body: Option<Vec<u8>>,
    /// リクエストコンテキスト
    context: RequestContext,
}

impl Request {
    /// 新しいリクエストを作成
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            context: RequestContext::new(),
        }
    }

    /// ヘッダーを追加
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// ヘッダーを名前で取得（大文字小文字を区別しない）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// リクエストコンテキストの不変参照を取得
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// リクエストコンテキストの可変参照を取得
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }

    /// `ForwardedMiddleware` が付与したホップ情報を取得
    ///
    /// [`crate::forwarded::ForwardedMiddleware`] を通っていなければ `None`。
    pub fn forwarded(&self) -> Option<&ForwardedElement> {
        self.context.get::<ForwardedElement>(FORWARDED_CONTEXT_KEY)
    }
}
