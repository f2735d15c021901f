//! Support for PHP translation modules (`<?php return [ ... ];`).
//!
//! Reading is a small recursive-descent parser over the literal subset that
//! translation files are written in: nested arrays (`[...]` and `array(...)`),
//! string, number, boolean and `null` literals, and `.` concatenation of
//! literals. No PHP code is ever executed.
//!
//! Writing renders a [`Tree`] back as a double-quoted, tab-indented array that
//! loads to exactly the same strings.

use std::io::{BufRead, Read, Write};

use indoc::indoc;

use crate::{
    error::Error,
    traits::Parser,
    types::{Node, Tree},
};

const HEADER: &str = indoc! {r#"
    <?php

    // Generated by lang2csv. Edit the translations spreadsheet and import it
    // again instead of changing this file by hand.

    return [
"#};

const FOOTER: &str = "];\n";

const INDENT: char = '\t';

/// A single PHP translation module: the array it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub tree: Tree,
}

impl Format {
    pub fn new(tree: Tree) -> Self {
        Format { tree }
    }
}

impl From<Tree> for Format {
    fn from(tree: Tree) -> Self {
        Format { tree }
    }
}

impl From<Format> for Tree {
    fn from(format: Format) -> Self {
        format.tree
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        let tree = SourceReader::new(&source).parse_file()?;
        Ok(Format { tree })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(HEADER);
        write_tree(&mut content, &self.tree, 1);
        content.push_str(FOOTER);
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

fn write_tree(out: &mut String, tree: &Tree, depth: usize) {
    for (key, node) in tree.iter() {
        indent(out, depth);
        out.push('"');
        out.push_str(&escape(key));
        out.push_str("\" => ");
        match node {
            Node::Scalar(value) => {
                out.push('"');
                out.push_str(&escape(value));
                out.push_str("\",\n");
            }
            Node::Container(children) => {
                out.push_str("[\n");
                write_tree(out, children, depth + 1);
                indent(out, depth);
                out.push_str("],\n");
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n(INDENT, depth));
}

/// Escapes a string for use inside a double-quoted PHP literal.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A literal value while parsing; `null` entries are dropped from the tree.
#[derive(Debug)]
enum Value {
    Str(String),
    Null,
    Array(Tree),
}

impl Value {
    fn concat(self, rhs: Value) -> Result<Value, &'static str> {
        match (self, rhs) {
            (Value::Array(_), _) | (_, Value::Array(_)) => Err("cannot concatenate an array"),
            (lhs, rhs) => Ok(Value::Str(lhs.into_string() + &rhs.into_string())),
        }
    }

    fn into_string(self) -> String {
        match self {
            Value::Str(s) => s,
            _ => String::new(),
        }
    }
}

struct SourceReader {
    chars: Vec<char>,
    pos: usize,
}

impl SourceReader {
    fn new(source: &str) -> Self {
        SourceReader {
            chars: source.trim_start_matches('\u{feff}').chars().collect(),
            pos: 0,
        }
    }

    fn parse_file(mut self) -> Result<Tree, Error> {
        self.skip_whitespace();
        if self.starts_with("<?php") {
            self.pos += 5;
        }
        self.skip_trivia()?;

        if self.eat_keyword("declare") {
            self.expect("(")?;
            while self.peek().is_some_and(|c| c != ')') {
                self.pos += 1;
            }
            self.expect(")")?;
            self.expect(";")?;
            self.skip_trivia()?;
        }

        if !self.eat_keyword("return") {
            return Err(self.error("expected `return`"));
        }
        let start = self.pos;
        let value = self.parse_expression()?;
        self.expect(";")?;

        self.skip_trivia()?;
        if self.starts_with("?>") {
            self.pos += 2;
            self.skip_whitespace();
        }
        if self.peek().is_some() {
            return Err(self.error("unexpected content after the return statement"));
        }

        match value {
            Value::Array(tree) => Ok(tree),
            _ => Err(self.error_at(start, "a translation file must return an array")),
        }
    }

    fn parse_expression(&mut self) -> Result<Value, Error> {
        let mut value = self.parse_term()?;
        loop {
            self.skip_trivia()?;
            if self.peek() != Some('.') {
                return Ok(value);
            }
            let at = self.pos;
            self.pos += 1;
            let rhs = self.parse_term()?;
            value = value.concat(rhs).map_err(|m| self.error_at(at, m))?;
        }
    }

    fn parse_term(&mut self) -> Result<Value, Error> {
        self.skip_trivia()?;
        let start = self.pos;
        match self.peek() {
            Some('\'') => self.parse_single_quoted().map(Value::Str),
            Some('"') => self.parse_double_quoted().map(Value::Str),
            Some('[') => {
                self.pos += 1;
                self.parse_items(']').map(Value::Array)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.parse_number(),
            Some(c) if is_identifier_start(c) => {
                let word = self.read_identifier();
                match word.to_ascii_lowercase().as_str() {
                    "array" => {
                        self.expect("(")?;
                        self.parse_items(')').map(Value::Array)
                    }
                    "true" => Ok(Value::Str("1".to_string())),
                    "false" => Ok(Value::Str(String::new())),
                    "null" => Ok(Value::Null),
                    _ => Err(self.error_at(start, format!("unsupported expression `{word}`"))),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character `{c}`"))),
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn parse_items(&mut self, close: char) -> Result<Tree, Error> {
        let mut tree = Tree::new();
        let mut next_index: i64 = 0;
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(tree);
            }

            let item_start = self.pos;
            let first = self.parse_expression()?;
            self.skip_trivia()?;
            let (key, value) = if self.starts_with("=>") {
                self.pos += 2;
                let key = match first {
                    Value::Array(_) => {
                        return Err(self.error_at(item_start, "an array cannot be used as a key"));
                    }
                    key => key.into_string(),
                };
                (key, self.parse_expression()?)
            } else {
                (next_index.to_string(), first)
            };

            if let Some(index) = integer_key(&key) {
                next_index = next_index.max(index.saturating_add(1));
            }
            match value {
                Value::Str(s) => {
                    tree.insert(key, s);
                }
                Value::Array(children) => {
                    tree.insert(key, children);
                }
                Value::Null => {
                    tree.remove(&key);
                }
            }

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected `,` or `{close}`"))),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        let negative = self.peek() == Some('-');
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
            self.skip_trivia()?;
        }
        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            let exponent_sign =
                matches!(c, '-' | '+') && matches!(self.prev(), Some('e' | 'E')) && !self.is_hex_at(digits_start);
            if c.is_ascii_alphanumeric()
                || c == '_'
                || exponent_sign
                || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                self.pos += 1;
            } else {
                break;
            }
        }

        let literal: String = self.chars[digits_start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();
        let lower = literal.to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i64::from_str_radix(bin, 2).ok()
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i64::from_str_radix(oct, 8).ok()
        } else if lower.len() > 1 && lower.starts_with('0') && lower.bytes().all(|b| b.is_ascii_digit()) {
            i64::from_str_radix(&lower[1..], 8).ok()
        } else {
            lower.parse::<i64>().ok()
        };

        let text = match parsed {
            Some(n) if negative => (-n).to_string(),
            Some(n) => n.to_string(),
            None if !literal.is_empty() && lower.parse::<f64>().is_ok() => {
                if negative {
                    format!("-{literal}")
                } else {
                    literal
                }
            }
            None => return Err(self.error_at(start, "invalid number literal")),
        };
        Ok(Value::Str(text))
    }

    fn parse_single_quoted(&mut self) -> Result<String, Error> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') if matches!(self.peek(), Some('\'' | '\\')) => {
                    value.extend(self.bump());
                }
                Some('\'') => return Ok(value),
                Some(c) => value.push(c),
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
    }

    fn parse_double_quoted(&mut self) -> Result<String, Error> {
        let start = self.pos;
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            let c = match self.bump() {
                Some('"') => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
                Some('\\') => match self.bump() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('v') => '\u{0b}',
                    Some('e') => '\u{1b}',
                    Some('f') => '\u{0c}',
                    Some(c @ ('\\' | '$' | '"')) => c,
                    Some(c @ '0'..='7') => {
                        let mut code = c.to_digit(8).unwrap_or_default();
                        for _ in 0..2 {
                            match self.peek().and_then(|d| d.to_digit(8)) {
                                Some(d) => {
                                    code = code * 8 + d;
                                    self.pos += 1;
                                }
                                None => break,
                            }
                        }
                        bytes.push((code & 0xff) as u8);
                        continue;
                    }
                    Some('x') if self.peek().is_some_and(|d| d.is_ascii_hexdigit()) => {
                        let mut code = 0;
                        for _ in 0..2 {
                            match self.peek().and_then(|d| d.to_digit(16)) {
                                Some(d) => {
                                    code = code * 16 + d;
                                    self.pos += 1;
                                }
                                None => break,
                            }
                        }
                        bytes.push(code as u8);
                        continue;
                    }
                    Some('u') if self.peek() == Some('{') => {
                        let escape_start = self.pos - 2;
                        self.pos += 1;
                        let mut hex = String::new();
                        while let Some(d) = self.peek().filter(|d| d.is_ascii_hexdigit()) {
                            hex.push(d);
                            self.pos += 1;
                        }
                        if self.bump() != Some('}') {
                            return Err(self.error_at(escape_start, "unterminated unicode escape"));
                        }
                        u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| self.error_at(escape_start, "invalid unicode escape"))?
                    }
                    Some(other) => {
                        bytes.push(b'\\');
                        other
                    }
                    None => return Err(self.error_at(start, "unterminated string")),
                },
                Some(c) => c,
                None => return Err(self.error_at(start, "unterminated string")),
            };
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            self.skip_whitespace();
            if self.starts_with("//") || (self.peek() == Some('#') && self.peek_at(1) != Some('[')) {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
            } else if self.starts_with("/*") {
                let start = self.pos;
                self.pos += 2;
                while !self.starts_with("*/") {
                    if self.bump().is_none() {
                        return Err(self.error_at(start, "unterminated comment"));
                    }
                }
                self.pos += 2;
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), Error> {
        self.skip_trivia()?;
        if self.starts_with(token) {
            self.pos += token.chars().count();
            Ok(())
        } else {
            Err(self.error(format!("expected `{token}`")))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        let matches = keyword
            .chars()
            .enumerate()
            .all(|(i, k)| self.peek_at(i).is_some_and(|c| c.eq_ignore_ascii_case(&k)));
        if matches && !self.peek_at(len).is_some_and(is_identifier_char) {
            self.pos += len;
            true
        } else {
            false
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn starts_with(&self, token: &str) -> bool {
        token
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn is_hex_at(&self, at: usize) -> bool {
        self.chars.get(at) == Some(&'0') && matches!(self.chars.get(at + 1), Some('x' | 'X'))
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn prev(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, at: usize, message: impl Into<String>) -> Error {
        let before = &self.chars[..at.min(self.chars.len())];
        let line = before.iter().filter(|&&c| c == '\n').count() + 1;
        let column = before.iter().rev().take_while(|&&c| c != '\n').count() + 1;
        Error::SourceSyntax {
            line,
            column,
            message: message.into(),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The integer a PHP array key string is cast to, if any.
fn integer_key(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && key != "-0";
    if canonical { key.parse().ok() } else { None }
}
