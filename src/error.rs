//! エラー型の定義

use thiserror::Error;

/// アプリケーションのエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Forwardedヘッダーの構文・値が不正（理由はログ用の文字列のみ）
    #[error("Malformed Forwarded header: {0}")]
    MalformedHeader(String),
}

impl Error {
    /// エラーからHTTPステータスコードを取得
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MalformedHeader(_) => 400,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedHeader(reason.into())
    }
}
