//! HTTP `Forwarded` ヘッダー（RFC 7239）のパースと検証

pub mod element;
pub mod middleware;
pub mod parser;
pub mod validate;

pub use element::{Forwarded, ForwardedElement};
pub use middleware::{ForwardedMiddleware, FORWARDED_CONTEXT_KEY};
pub use parser::{is_quoted_pair_char, is_quoted_text_char, parse_forwarded_header};
pub use validate::{is_host, is_node_identifier, is_scheme_name};
