//! forwarded7239: HTTP `Forwarded` ヘッダー（RFC 7239）の厳密なパーサー
//!
//! ヘッダー値を文法どおりにパースしてホップごとの要素（`by`/`for`/`host`/`proto`）の
//! リストを返す。文法に合わない入力は全体を [`Error::MalformedHeader`] として拒否する。
//! リクエストにホップ情報を付与する [`ForwardedMiddleware`] も提供する。
//!
//! ```
//! use forwarded7239::parse_forwarded_header;
//!
//! let forwarded = parse_forwarded_header("for=192.0.2.60;proto=http;by=203.0.113.43").unwrap();
//! assert_eq!(forwarded.last().for_node(), Some("192.0.2.60"));
//! assert!(parse_forwarded_header("for=192.0.2.60; proto=http").is_err());
//! ```

pub mod common;
pub mod error;
pub mod forwarded;

pub use common::{Method, Middleware, Request, RequestContext};
pub use error::Error;
pub use forwarded::{
    is_host, is_node_identifier, is_scheme_name, parse_forwarded_header, Forwarded,
    ForwardedElement, ForwardedMiddleware, FORWARDED_CONTEXT_KEY,
};
