//! 共通の抽象化レイヤーとトレイト定義

pub mod context;
pub mod http;
pub mod traits;
pub mod utils;

pub use context::RequestContext;
pub use http::{Method, Request};
pub use traits::Middleware;
