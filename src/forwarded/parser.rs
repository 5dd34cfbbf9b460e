//! Forwardedヘッダー（RFC 7239）の再帰下降パーサー
//!
//! ```text
//! forwarded         = forwarded-element *( OWS "," OWS forwarded-element )
//! forwarded-element = forwarded-pair *( ";" forwarded-pair )
//! forwarded-pair    = token "=" ( quoted-string / token )
//! ```
//!
//! 入力全体が文法に一致した場合のみ成功し、部分的な結果は返さない。

use log::trace;

use crate::common::utils::is_token_char;
use crate::error::Error;

use super::element::{Forwarded, ForwardedElement};
use super::validate::{is_host, is_node_identifier, is_scheme_name};

/// quoted-string 内でエスケープなしに使える文字（qdtext）
pub fn is_quoted_text_char(c: char) -> bool {
    matches!(c as u32, 0x09 | 0x20 | 0x21 | 0x23..=0x5B | 0x5D..=0x7E | 0x80..=0xFF)
}

/// quoted-pair（`\` の直後）に使える文字
pub fn is_quoted_pair_char(c: char) -> bool {
    matches!(c as u32, 0x09 | 0x20..=0x7E | 0x80..=0xFF)
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// 入力文字列と現在位置（バイトオフセット）
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    /// 次の文字が `expected` なら読み進める
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_whitespace);
        self.pos += rest.len() - trimmed.len();
    }

    /// tokenを最長一致で読む。1文字もなければ位置は変えない
    fn read_token(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !is_token_char(c))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// quoted-stringを読み、エスケープを解除した値を返す
    ///
    /// 次の文字が `"` でなければ `Ok(None)`。読み始めた後の不正は `Err`。
    fn read_quoted_string(&mut self) -> Result<Option<String>, Error> {
        if self.peek() != Some('"') {
            return Ok(None);
        }

        let mut value = String::new();
        let mut chars = self.rest().char_indices().skip(1);

        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Ok(Some(value));
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) if is_quoted_pair_char(escaped) => value.push(escaped),
                    Some((_, escaped)) => {
                        return Err(Error::malformed(format!(
                            "invalid quoted-pair character {:?}",
                            escaped
                        )))
                    }
                    None => break,
                },
                c if is_quoted_text_char(c) => value.push(c),
                c => {
                    return Err(Error::malformed(format!(
                        "invalid character {:?} in quoted-string",
                        c
                    )))
                }
            }
        }

        Err(Error::malformed("unterminated quoted-string"))
    }

    /// `name=value` を読み、値をフィールドごとのバリデーションにかける
    fn read_pair(&mut self) -> Result<(String, String), Error> {
        let name = self
            .read_token()
            .ok_or_else(|| Error::malformed(format!("expected parameter name at offset {}", self.pos)))?
            .to_ascii_lowercase();

        if !self.eat('=') {
            return Err(Error::malformed(format!("expected '=' after {:?}", name)));
        }

        let value = match self.read_quoted_string()? {
            Some(value) => value,
            None => self
                .read_token()
                .map(str::to_string)
                .ok_or_else(|| Error::malformed(format!("missing value for {:?}", name)))?,
        };

        let valid = match name.as_str() {
            "by" | "for" => is_node_identifier(&value),
            "host" => is_host(&value),
            "proto" => is_scheme_name(&value),
            _ => true,
        };
        if !valid {
            return Err(Error::malformed(format!("invalid {} value {:?}", name, value)));
        }

        Ok((name, value))
    }

    /// `;` 区切りのペアを1要素分読む
    fn read_element(&mut self) -> Result<ForwardedElement, Error> {
        let mut element = ForwardedElement::new();

        loop {
            let (name, value) = self.read_pair()?;
            element
                .try_set(name, value)
                .map_err(|name| Error::malformed(format!("duplicate parameter {:?}", name)))?;

            if !self.eat(';') {
                return Ok(element);
            }
        }
    }

    /// 要素の後の区切りを読む。次の要素があれば `true`、入力の終端なら `false`
    fn read_separator(&mut self) -> Result<bool, Error> {
        if self.is_at_end() {
            return Ok(false);
        }

        self.skip_whitespace();
        if !self.eat(',') {
            return Err(Error::malformed(format!(
                "unexpected character at offset {}",
                self.pos
            )));
        }
        self.skip_whitespace();

        if self.is_at_end() {
            return Err(Error::malformed("trailing ',' without element"));
        }
        Ok(true)
    }

    /// 入力全体を要素のリストとして読む
    fn read_forwarded(&mut self) -> Result<Forwarded, Error> {
        let first = self.read_element()?;
        let mut rest = Vec::new();
        while self.read_separator()? {
            rest.push(self.read_element()?);
        }
        Ok(Forwarded::from_elements(first, rest))
    }
}

/// Forwardedヘッダーの値をパースする
///
/// 成功時は1つ以上の要素をヘッダー内の順序で返す。
/// 文法違反・フィールド値の不正・重複パラメータ・末尾のゴミは
/// すべて [`Error::MalformedHeader`] になる。
pub fn parse_forwarded_header(header: &str) -> Result<Forwarded, Error> {
    let result = Cursor::new(header).read_forwarded();

    if let Err(e) = &result {
        trace!("Rejected Forwarded header {:?}: {}", header, e);
    }
    result
}
