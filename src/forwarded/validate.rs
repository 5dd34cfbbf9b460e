//! Forwardedヘッダーの各フィールド値のバリデーション
//!
//! `by`/`for` はノード識別子、`host` はURIのhost（+ポート）、`proto` はURIスキーム名。
//! `\d` や `\w` はUnicode版だと範囲が広がるため、すべてASCIIの文字クラスで書いている。

use std::borrow::Cow;
use std::sync::OnceLock;

use log::error;
use regex::Regex;

const DEC_OCTET: &str = "(?:[0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])";
const H16: &str = "[0-9A-Fa-f]{1,4}";
const WORD: &str = "0-9A-Za-z_";

/// 遅延コンパイルされる正規表現パターン
struct Pattern {
    source: fn() -> String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    const fn new(source: fn() -> String) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    fn regex(&self) -> Option<&Regex> {
        match self.compiled.get_or_init(|| Regex::new(&(self.source)())) {
            Ok(regex) => Some(regex),
            Err(e) => {
                error!(
                    "Invalid regex pattern: {} - {}. Value will be rejected.",
                    (self.source)(),
                    e
                );
                None
            }
        }
    }

    fn is_match(&self, value: &str) -> bool {
        self.regex().map_or(false, |regex| regex.is_match(value))
    }

    /// 末尾のポート部分を取り除く
    fn strip<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.regex() {
            Some(regex) => regex.replace(value, ""),
            None => Cow::Borrowed(value),
        }
    }
}

fn ipv4_source() -> String {
    format!(r"^(?:{d}\.){{3}}{d}$", d = DEC_OCTET)
}

fn ipv6_source() -> String {
    let h = H16;
    let ls32 = format!(r"(?:{h}:{h}|(?:{d}\.){{3}}{d})", h = h, d = DEC_OCTET);
    let prefixes = [
        format!("(?:{h}:){{6}}"),
        format!("::(?:{h}:){{5}}"),
        format!("(?:{h})?::(?:{h}:){{4}}"),
        format!("(?:(?:{h}:)?{h})?::(?:{h}:){{3}}"),
        format!("(?:(?:{h}:){{0,2}}{h})?::(?:{h}:){{2}}"),
        format!("(?:(?:{h}:){{0,3}}{h})?::{h}:"),
        format!("(?:(?:{h}:){{0,4}}{h})?::"),
    ];
    format!(
        r"^\[(?:(?:{prefixes}){ls32}|(?:(?:{h}:){{0,5}}{h})?::{h}|(?:(?:{h}:){{0,6}}{h})?::)\]$",
        prefixes = prefixes.join("|"),
        ls32 = ls32,
        h = h,
    )
}

fn ipvfuture_source() -> String {
    format!(r"^\[[vV][0-9A-Fa-f]+\.[{w}.~!$&'()*+,;=:-]+\]$", w = WORD)
}

fn reg_name_source() -> String {
    format!(r"^(?:[{w}.~!$&'()*+,;=-]|%[0-9A-Fa-f]{{2}})*$", w = WORD)
}

fn host_port_source() -> String {
    r":[0-9]*$".to_string()
}

fn node_port_source() -> String {
    format!(r":(?:[0-9]{{1,5}}|_[{w}.-]+)$", w = WORD)
}

fn obfuscated_node_source() -> String {
    format!(r"^_[{w}.-]+$", w = WORD)
}

fn scheme_name_source() -> String {
    r"^[A-Za-z][A-Za-z0-9+.-]*$".to_string()
}

static IPV4: Pattern = Pattern::new(ipv4_source);
static IPV6: Pattern = Pattern::new(ipv6_source);
static IPVFUTURE: Pattern = Pattern::new(ipvfuture_source);
static REG_NAME: Pattern = Pattern::new(reg_name_source);
static HOST_PORT: Pattern = Pattern::new(host_port_source);
static NODE_PORT: Pattern = Pattern::new(node_port_source);
static OBFUSCATED_NODE: Pattern = Pattern::new(obfuscated_node_source);
static SCHEME_NAME: Pattern = Pattern::new(scheme_name_source);

/// `by` / `for` の値がノード識別子として有効か判定
///
/// 末尾の `:ポート番号`（1〜5桁）または `:_難読化ポート` を除いた残りが
/// `unknown`、`_` で始まる難読化識別子、IPv4、角括弧付きIPv6のいずれかであれば有効。
pub fn is_node_identifier(value: &str) -> bool {
    let node = NODE_PORT.strip(value);
    let node = node.as_ref();

    node == "unknown"
        || OBFUSCATED_NODE.is_match(node)
        || IPV6.is_match(node)
        || IPV4.is_match(node)
}

/// `host` の値がURIのhost（+任意のポート）として有効か判定
///
/// 空のreg-nameも有効とみなす。
pub fn is_host(value: &str) -> bool {
    let host = HOST_PORT.strip(value);
    let host = host.as_ref();

    IPVFUTURE.is_match(host) || IPV6.is_match(host) || IPV4.is_match(host) || REG_NAME.is_match(host)
}

/// `proto` の値がURIスキーム名として有効か判定
pub fn is_scheme_name(value: &str) -> bool {
    SCHEME_NAME.is_match(value)
}
