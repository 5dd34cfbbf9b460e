//! Forwardedヘッダーをパースしてリクエストに付与するミドルウェア

use async_trait::async_trait;
use log::{debug, warn};

use crate::common::{Middleware, Request};
use crate::error::Error;

use super::element::ForwardedElement;
use super::parser::parse_forwarded_header;

/// パース結果を保存するリクエストコンテキストのキー
pub const FORWARDED_CONTEXT_KEY: &str = "forwarded";

/// ヘッダー名
const FORWARDED_HEADER: &str = "forwarded";

/// `Forwarded` ヘッダーの最後の要素（オリジンサーバーに最も近いホップ）を
/// リクエストコンテキストに保存するミドルウェア
///
/// ヘッダーがない、または不正な場合は全フィールドが空の要素を保存する。
/// 最大長はデフォルトでは無制限で、[`Self::with_max_header_length`] を指定した場合のみ
/// それを超えるヘッダーも空の要素として扱う。
/// このミドルウェアがエラーを返すことはない。
#[derive(Debug, Clone, Default)]
pub struct ForwardedMiddleware {
    max_header_length: Option<usize>,
}

impl ForwardedMiddleware {
    /// 新しいForwardedMiddlewareを作成（最大長は無制限）
    pub fn new() -> Self {
        Self::default()
    }

    /// ヘッダーの最大長（バイト）を明示的に指定
    pub fn with_max_header_length(mut self, max: usize) -> Self {
        self.max_header_length = Some(max);
        self
    }

    /// ヘッダー値から保存すべき要素を決める
    pub fn resolve(&self, header: Option<&str>) -> ForwardedElement {
        let Some(header) = header else {
            debug!("No Forwarded header present");
            return ForwardedElement::default();
        };

        if let Some(max) = self.max_header_length {
            if header.len() > max {
                warn!(
                    "Forwarded header ignored: {} bytes exceeds limit of {} bytes",
                    header.len(),
                    max
                );
                return ForwardedElement::default();
            }
        }

        match parse_forwarded_header(header) {
            Ok(forwarded) => {
                debug!("Parsed Forwarded header with {} element(s)", forwarded.len());
                forwarded.into_last()
            }
            Err(e) => {
                warn!("Forwarded header ignored: {}", e);
                ForwardedElement::default()
            }
        }
    }
}

#[async_trait]
impl Middleware for ForwardedMiddleware {
    async fn pre_process(&self, mut req: Request) -> Result<Request, Error> {
        let element = self.resolve(req.header(FORWARDED_HEADER));
        req.context_mut().set(FORWARDED_CONTEXT_KEY, element);
        Ok(req)
    }
}
