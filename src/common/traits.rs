//! コアトレイト定義（Middleware）

use async_trait::async_trait;
use crate::error::Error;
use super::http::Request;

/// ミドルウェアの特性
#[async_trait]
pub trait Middleware: Send + Sync {
    /// ハンドラー実行前にリクエストを加工する
    async fn pre_process(&self, req: Request) -> Result<Request, Error>;
}
