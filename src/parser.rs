//! Recursive-descent JSON decoder.
//!
//! Dispatches on the first significant byte: literal, number, string, array,
//! or object. The grammar is the permissive superset of strict JSON that the
//! tree printer emits a subset of: numbers tolerate a bare sign or an empty
//! exponent, invalid `\u` escapes are dropped from string payloads rather
//! than failing the document, and stray control bytes count as whitespace.
//!
//! Errors carry the byte offset where the parse stopped; any nodes allocated
//! for a failed subtree are removed from the arena before the error is
//! returned, so a failed parse leaves the tree as it found it.

use crate::error::{Error, Result};
use crate::node::{Member, Node, NodeId, Number};
use crate::scanner::Scanner;
use crate::tree::Tree;

impl Tree {
    /// Parse a complete JSON document, requiring full consumption.
    ///
    /// Trailing whitespace after the top-level value is skipped; any other
    /// trailing byte fails with [`Error::TrailingData`] and the parsed
    /// subtree is removed from the arena.
    pub fn parse(&mut self, text: &str) -> Result<NodeId> {
        let (root, end) = self.parse_prefix(text)?;
        let bytes = text.as_bytes();
        let mut i = end;
        while i < bytes.len() && bytes[i] <= 0x20 {
            i += 1;
        }
        if i < bytes.len() {
            self.remove(root);
            return Err(Error::TrailingData { offset: i });
        }
        Ok(root)
    }

    /// Parse one JSON value from the front of `text`, tolerating trailing
    /// bytes.
    ///
    /// Returns the root id and the byte offset just past the parsed value,
    /// for callers that embed JSON in a larger stream.
    pub fn parse_prefix(&mut self, text: &str) -> Result<(NodeId, usize)> {
        let mut parser = Parser {
            scan: Scanner::new(text.as_bytes()),
            tree: self,
        };
        let root = parser.parse_value()?;
        let end = parser.scan.pos();
        Ok((root, end))
    }
}

struct Parser<'a, 't> {
    scan: Scanner<'a>,
    tree: &'t mut Tree,
}

impl Parser<'_, '_> {
    fn parse_value(&mut self) -> Result<NodeId> {
        self.scan.skip_ws();
        let offset = self.scan.pos();
        match self.scan.peek() {
            Some(b'n') if self.scan.starts_with(b"null") => {
                self.scan.advance(4);
                Ok(self.tree.alloc(Node::Null))
            }
            Some(b'f') if self.scan.starts_with(b"false") => {
                self.scan.advance(5);
                Ok(self.tree.alloc(Node::Bool(false)))
            }
            Some(b't') if self.scan.starts_with(b"true") => {
                self.scan.advance(4);
                Ok(self.tree.alloc(Node::Bool(true)))
            }
            Some(b'"') => {
                let s = self.parse_string_raw()?;
                Ok(self.tree.alloc(Node::String(s)))
            }
            Some(b'-' | b'0'..=b'9') => Ok(self.parse_number()),
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            _ => Err(Error::Syntax { offset }),
        }
    }

    /// Scan a number by manual digit accumulation. Never fails: whatever the
    /// digits stop making sense at is left for the caller to reject.
    fn parse_number(&mut self) -> NodeId {
        let mut sign = 1.0f64;
        let mut value = 0.0f64;
        let mut scale = 0i32;
        let mut exponent = 0i32;
        let mut exp_sign = 1i32;

        if self.scan.peek() == Some(b'-') {
            sign = -1.0;
            self.scan.bump();
        }
        if self.scan.peek() == Some(b'0') {
            self.scan.bump();
        }
        if matches!(self.scan.peek(), Some(b'1'..=b'9')) {
            while let Some(d @ b'0'..=b'9') = self.scan.peek() {
                value = value * 10.0 + f64::from(d - b'0');
                self.scan.bump();
            }
        }
        if self.scan.peek() == Some(b'.') && matches!(self.scan.peek_at(1), Some(b'0'..=b'9')) {
            self.scan.bump();
            while let Some(d @ b'0'..=b'9') = self.scan.peek() {
                value = value * 10.0 + f64::from(d - b'0');
                scale = scale.saturating_sub(1);
                self.scan.bump();
            }
        }
        if matches!(self.scan.peek(), Some(b'e' | b'E')) {
            self.scan.bump();
            match self.scan.peek() {
                Some(b'+') => {
                    self.scan.bump();
                }
                Some(b'-') => {
                    exp_sign = -1;
                    self.scan.bump();
                }
                _ => {}
            }
            while let Some(d @ b'0'..=b'9') = self.scan.peek() {
                exponent = exponent.saturating_mul(10).saturating_add(i32::from(d - b'0'));
                self.scan.bump();
            }
        }

        let power = scale.saturating_add(exp_sign.saturating_mul(exponent));
        let value = sign * value * 10f64.powi(power);
        self.tree.alloc(Node::Number(Number::new(value)))
    }

    /// Decode a string literal into its unescaped payload. The cursor must
    /// be on the opening quote.
    fn parse_string_raw(&mut self) -> Result<String> {
        let open = self.scan.pos();
        self.scan.bump();
        let mut out: Vec<u8> = Vec::new();
        loop {
            match self.scan.bump() {
                None => return Err(Error::UnterminatedString { offset: open }),
                Some(b'"') => break,
                Some(b'\\') => match self.scan.bump() {
                    None => return Err(Error::UnterminatedString { offset: open }),
                    Some(b'b') => out.push(0x08),
                    Some(b'f') => out.push(0x0C),
                    Some(b'n') => out.push(b'\n'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'u') => self.unicode_escape(&mut out),
                    // Unknown escapes copy the escaped byte; this also covers
                    // \" \\ and \/.
                    Some(other) => out.push(other),
                },
                Some(byte) => out.push(byte),
            }
        }
        // The payload is verbatim input bytes plus freshly encoded code
        // points, so this conversion cannot fail on &str input.
        String::from_utf8(out).map_err(|_| Error::Syntax { offset: open })
    }

    /// Decode the hex quad(s) of a `\u` escape and append the code point as
    /// UTF-8. Invalid units drop the escape without failing the string.
    fn unicode_escape(&mut self, out: &mut Vec<u8>) {
        let mut uc = read_hex4(&mut self.scan);
        if uc == 0 || (0xDC00..=0xDFFF).contains(&uc) {
            return;
        }
        if (0xD800..=0xDBFF).contains(&uc) {
            if self.scan.peek() != Some(b'\\') || self.scan.peek_at(1) != Some(b'u') {
                return;
            }
            self.scan.advance(2);
            let uc2 = read_hex4(&mut self.scan);
            if !(0xDC00..=0xDFFF).contains(&uc2) {
                return;
            }
            uc = 0x10000 + (((uc & 0x3FF) << 10) | (uc2 & 0x3FF));
        }
        push_code_point(out, uc);
    }

    fn parse_array(&mut self) -> Result<NodeId> {
        self.scan.bump();
        self.scan.skip_ws();
        if self.scan.peek() == Some(b']') {
            self.scan.bump();
            return Ok(self.tree.alloc(Node::Array(Vec::new())));
        }
        let mut items = Vec::new();
        loop {
            match self.parse_value() {
                Ok(id) => items.push(id),
                Err(e) => return Err(self.unwind(items, e)),
            }
            self.scan.skip_ws();
            match self.scan.peek() {
                Some(b',') => {
                    self.scan.bump();
                }
                Some(b']') => {
                    self.scan.bump();
                    break;
                }
                _ => {
                    let offset = self.scan.pos();
                    return Err(self.unwind(items, Error::Syntax { offset }));
                }
            }
        }
        Ok(self.tree.alloc(Node::Array(items)))
    }

    fn parse_object(&mut self) -> Result<NodeId> {
        self.scan.bump();
        self.scan.skip_ws();
        if self.scan.peek() == Some(b'}') {
            self.scan.bump();
            return Ok(self.tree.alloc(Node::Object(Vec::new())));
        }
        let mut members: Vec<Member> = Vec::new();
        loop {
            self.scan.skip_ws();
            if self.scan.peek() != Some(b'"') {
                let offset = self.scan.pos();
                return Err(self.unwind_members(members, Error::Syntax { offset }));
            }
            let key = match self.parse_string_raw() {
                Ok(key) => key,
                Err(e) => return Err(self.unwind_members(members, e)),
            };
            self.scan.skip_ws();
            if self.scan.peek() != Some(b':') {
                let offset = self.scan.pos();
                return Err(self.unwind_members(members, Error::Syntax { offset }));
            }
            self.scan.bump();
            let value = match self.parse_value() {
                Ok(value) => value,
                Err(e) => return Err(self.unwind_members(members, e)),
            };
            members.push(Member::new(key, value));
            self.scan.skip_ws();
            match self.scan.peek() {
                Some(b',') => {
                    self.scan.bump();
                }
                Some(b'}') => {
                    self.scan.bump();
                    break;
                }
                _ => {
                    let offset = self.scan.pos();
                    return Err(self.unwind_members(members, Error::Syntax { offset }));
                }
            }
        }
        Ok(self.tree.alloc(Node::Object(members)))
    }

    /// Remove subtrees already parsed for a container that failed partway.
    fn unwind<I>(&mut self, ids: I, err: Error) -> Error
    where
        I: IntoIterator<Item = NodeId>,
    {
        for id in ids {
            self.tree.remove(id);
        }
        err
    }

    fn unwind_members(&mut self, members: Vec<Member>, err: Error) -> Error {
        self.unwind(members.into_iter().map(|m| m.value()), err)
    }
}

/// Read four hex digits as one value. Short or malformed quads read as zero;
/// the cursor always advances past the bytes looked at.
fn read_hex4(scan: &mut Scanner<'_>) -> u32 {
    let mut value = 0u32;
    let mut ok = true;
    for _ in 0..4 {
        let digit = match scan.bump() {
            Some(b @ b'0'..=b'9') => u32::from(b - b'0'),
            Some(b @ b'a'..=b'f') => u32::from(b - b'a') + 10,
            Some(b @ b'A'..=b'F') => u32::from(b - b'A') + 10,
            _ => {
                ok = false;
                0
            }
        };
        value = (value << 4) | digit;
    }
    if ok {
        value
    } else {
        0
    }
}

/// Append one code point to the byte buffer as UTF-8. Values outside the
/// Unicode scalar range append nothing.
fn push_code_point(out: &mut Vec<u8>, cp: u32) {
    if let Some(ch) = char::from_u32(cp) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
}
