//! Grammar engine: a hand-written recursive-descent scanner over the source text.
//!
//! The scanner recognizes the grammar and reports each production to the
//! [`Builder`](crate::builder::Builder); it never assembles tables itself. Values are
//! tried in a fixed order (datetime, float, integer, string, boolean, array, inline
//! table) because the first three share a leading-digit lexical class. Each numeric
//! attempt records the cursor and rewinds it when the production does not match, so
//! a failed attempt leaves no trace.
//!
//! All errors are fatal: the first one aborts the parse and carries the line of the
//! cursor at the point of failure.
//!
//! Comma discipline differs on purpose: arrays accept one trailing comma and free
//! whitespace, newlines and comments between elements, while inline tables reject a
//! trailing comma and any newline.

use crate::builder::{Builder, Key};
use crate::config::Config;
use crate::datetime::{Date, Datetime, Offset, Time};
use crate::document::{Document, Float, Integer, Span, Value, ValueKind};
use crate::error::{Error, Result};

/// Parse `source` with the default [`Config`].
pub fn parse(source: &str) -> Result<Document> {
    parse_with(source, &Config::default())
}

/// Parse `source` into a [`Document`], honoring `config.max_depth`.
pub fn parse_with(source: &str, config: &Config) -> Result<Document> {
    let mut scanner = Scanner::new(source, config.max_depth);
    scanner.document()?;
    log::debug!("parsed {} lines", scanner.line);
    Ok(scanner.builder.finish(source))
}

fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_control(c: char) -> bool {
    (c < '\u{20}' && c != '\t') || c == '\u{7f}'
}

fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    depth: usize,
    max_depth: usize,
    builder: Builder,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            depth: 0,
            max_depth,
            builder: Builder::new(max_depth),
        }
    }

    // -- cursor ---------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    // -- diagnostics ----------------------------------------------------------

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.line, message)
    }

    fn found(&self) -> String {
        match self.peek_char() {
            None => "end of input".to_string(),
            Some('\n') | Some('\r') => "newline".to_string(),
            Some(c) if is_control(c) => format!("control character U+{:04X}", c as u32),
            Some(c) => format!("`{c}`"),
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        self.error(format!("expected {expected}, found {}", self.found()))
    }

    fn control_error(&self, c: char) -> Error {
        self.error(format!("control character U+{:04X} is not allowed", c as u32))
    }

    fn enter_nesting(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::TooDeep {
                line: self.line,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave_nesting(&mut self) {
        self.depth -= 1;
    }

    // -- whitespace, comments, newlines -----------------------------------------

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consume one newline (`\n` or `\r\n`). A lone `\r` is an illegal control character.
    fn newline(&mut self) -> Result<bool> {
        match self.peek() {
            Some(b'\n') => {
                self.pos += 1;
                self.line += 1;
                Ok(true)
            }
            Some(b'\r') if self.peek_at(1) == Some(b'\n') => {
                self.pos += 2;
                self.line += 1;
                Ok(true)
            }
            Some(b'\r') => Err(self.control_error('\r')),
            _ => Ok(false),
        }
    }

    /// `#` to end of line. The newline itself is left for the caller.
    fn comment(&mut self) -> Result<()> {
        if !self.eat(b'#') {
            return Ok(());
        }
        while let Some(c) = self.peek_char() {
            match c {
                '\n' | '\r' => break,
                c if is_control(c) => return Err(self.control_error(c)),
                c => self.pos += c.len_utf8(),
            }
        }
        Ok(())
    }

    /// Whitespace, newlines and comments between array elements.
    fn array_gap(&mut self) -> Result<()> {
        loop {
            self.skip_ws();
            self.comment()?;
            if !self.newline()? {
                return Ok(());
            }
        }
    }

    // -- document structure -----------------------------------------------------

    fn document(&mut self) -> Result<()> {
        if self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Ok(()),
                Some(b'[') => self.header()?,
                Some(b'#' | b'\n' | b'\r') => {}
                Some(_) => self.keyval()?,
            }
            self.skip_ws();
            self.comment()?;
            if !self.newline()? {
                if self.at_end() {
                    return Ok(());
                }
                return Err(self.unexpected("newline"));
            }
        }
    }

    fn header(&mut self) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        self.pos += 1;
        let array = self.eat(b'[');

        self.skip_ws();
        let keys = self.table_key()?;
        self.skip_ws();

        if !self.eat(b']') {
            if self.at_end() {
                return Err(self.error("unterminated table header"));
            }
            return Err(self.unexpected("`]` to close the table header"));
        }
        if array && !self.eat(b']') {
            return Err(self.unexpected("`]]` to close the array table header"));
        }

        let span = Span::new(start, self.pos);
        if array {
            self.builder.array_table_header(&keys, line, span)
        } else {
            self.builder.table_header(&keys, line, span)
        }
    }

    /// One or more keys joined by `.`, whitespace allowed around each dot.
    fn table_key(&mut self) -> Result<Vec<Key>> {
        let mut keys = vec![self.key()?];
        loop {
            let save = self.pos;
            self.skip_ws();
            if !self.eat(b'.') {
                self.pos = save;
                return Ok(keys);
            }
            if keys.len() >= self.max_depth {
                return Err(Error::TooDeep {
                    line: self.line,
                    limit: self.max_depth,
                });
            }
            self.skip_ws();
            keys.push(self.key()?);
        }
    }

    fn key(&mut self) -> Result<Key> {
        let start = self.pos;
        let name = match self.peek() {
            Some(b'"') => {
                if self.rest().starts_with("\"\"\"") {
                    return Err(self.error("a multi-line string cannot be used as a key"));
                }
                self.basic_string()?
            }
            Some(b'\'') => {
                if self.rest().starts_with("'''") {
                    return Err(self.error("a multi-line string cannot be used as a key"));
                }
                self.literal_string()?
            }
            Some(b) if is_bare_key_byte(b) => {
                while let Some(b) = self.peek() {
                    if !is_bare_key_byte(b) {
                        break;
                    }
                    self.pos += 1;
                }
                self.src[start..self.pos].to_string()
            }
            _ => return Err(self.unexpected("a key")),
        };
        Ok(Key {
            name,
            span: Span::new(start, self.pos),
        })
    }

    fn keyval(&mut self) -> Result<()> {
        let key = self.key()?;
        self.skip_ws();
        if !self.eat(b'=') {
            return Err(self.unexpected("`=` after a key"));
        }
        self.skip_ws();
        if self.peek() == Some(b'{') {
            return self.bound_inline_table(key);
        }
        let value = self.val()?;
        self.builder.key_value(key, value)
    }

    // -- values -----------------------------------------------------------------

    fn val(&mut self) -> Result<Value> {
        let start = self.pos;
        let line = self.line;
        let spanned = |kind, end| Value::new(kind, Span::new(start, end), line);

        if let Some(dt) = self.datetime()? {
            return Ok(spanned(ValueKind::Datetime(dt), self.pos));
        }
        if let Some(float) = self.float() {
            return Ok(spanned(ValueKind::Float(float), self.pos));
        }
        if let Some(integer) = self.integer() {
            return Ok(spanned(ValueKind::Integer(integer), self.pos));
        }
        match self.peek() {
            Some(b'"') => {
                let s = if self.rest().starts_with("\"\"\"") {
                    self.multiline_basic_string()?
                } else {
                    self.basic_string()?
                };
                Ok(spanned(ValueKind::String(s), self.pos))
            }
            Some(b'\'') => {
                let s = if self.rest().starts_with("'''") {
                    self.multiline_literal_string()?
                } else {
                    self.literal_string()?
                };
                Ok(spanned(ValueKind::String(s), self.pos))
            }
            Some(b't') if self.eat_str("true") => Ok(spanned(ValueKind::Boolean(true), self.pos)),
            Some(b'f') if self.eat_str("false") => {
                Ok(spanned(ValueKind::Boolean(false), self.pos))
            }
            Some(b'[') => self.array(),
            Some(b'{') => self.inline_element(),
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Consume `digit (_? digit)*` for the given digit class. Returns false, consuming
    /// nothing, when no digit is present.
    fn digit_run(&mut self, is_digit: fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(b) if is_digit(b) => self.pos += 1,
            _ => return false,
        }
        loop {
            match self.peek() {
                Some(b) if is_digit(b) => self.pos += 1,
                Some(b'_') if self.peek_at(1).is_some_and(is_digit) => self.pos += 2,
                _ => return true,
            }
        }
    }

    /// Decimal integer body without leading zeros: `0` or `[1-9](_?digit)*`.
    fn decimal_run(&mut self) -> bool {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                true
            }
            Some(b'1'..=b'9') => self.digit_run(|b| b.is_ascii_digit()),
            _ => false,
        }
    }

    fn eat_sign(&mut self) -> Option<u8> {
        match self.peek() {
            Some(s @ (b'+' | b'-')) => {
                self.pos += 1;
                Some(s)
            }
            _ => None,
        }
    }

    fn float(&mut self) -> Option<Float> {
        let start = self.pos;
        self.eat_sign();
        if self.eat_str("inf") || self.eat_str("nan") {
            return Some(Float {
                text: self.src[start..self.pos].to_string(),
            });
        }
        if !self.decimal_run() {
            self.pos = start;
            return None;
        }

        let mut fractional = false;
        if self.peek() == Some(b'.') {
            let dot = self.pos;
            self.pos += 1;
            if self.digit_run(|b| b.is_ascii_digit()) {
                fractional = true;
            } else {
                self.pos = dot;
            }
        }

        let mut exponent = false;
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.pos;
            self.pos += 1;
            self.eat_sign();
            if self.digit_run(|b| b.is_ascii_digit()) {
                exponent = true;
            } else {
                self.pos = mark;
            }
        }

        if !fractional && !exponent {
            self.pos = start;
            return None;
        }
        Some(Float {
            text: strip_separators(&self.src[start..self.pos]),
        })
    }

    fn integer(&mut self) -> Option<Integer> {
        let start = self.pos;
        let negative = self.eat_sign() == Some(b'-');

        let prefixed: [(&str, u32, fn(u8) -> bool); 3] = [
            ("0x", 16, |b| b.is_ascii_hexdigit()),
            ("0o", 8, |b| (b'0'..=b'7').contains(&b)),
            ("0b", 2, |b| b == b'0' || b == b'1'),
        ];
        for (prefix, radix, is_digit) in prefixed {
            if self.rest().starts_with(prefix) {
                let mark = self.pos;
                self.pos += prefix.len();
                if self.digit_run(is_digit) {
                    return Some(Integer {
                        digits: strip_separators(&self.src[mark + prefix.len()..self.pos]),
                        negative,
                        radix,
                    });
                }
                self.pos = mark;
                break;
            }
        }

        let body = self.pos;
        if !self.decimal_run() {
            self.pos = start;
            return None;
        }
        Some(Integer {
            digits: strip_separators(&self.src[body..self.pos]),
            negative,
            radix: 10,
        })
    }

    /// Exactly `n` ASCII digits as a number, or `None` with the cursor untouched.
    fn fixed_digits(&mut self, n: usize) -> Option<u32> {
        let bytes = self.bytes;
        let digits = bytes.get(self.pos..self.pos + n)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos += n;
        Some(
            digits
                .iter()
                .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0')),
        )
    }

    fn datetime(&mut self) -> Result<Option<Datetime>> {
        let start = self.pos;

        if let Some(date) = self.full_date() {
            let date = self.checked_date(date, start)?;
            let separated = match self.peek() {
                Some(b'T' | b't') => true,
                Some(b' ') => {
                    self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
                        && self.peek_at(3) == Some(b':')
                }
                _ => false,
            };
            if !separated {
                return Ok(Some(Datetime {
                    date: Some(date),
                    time: None,
                    offset: None,
                }));
            }
            self.pos += 1;
            let Some(time) = self.partial_time() else {
                return Err(self.error(format!(
                    "malformed time in datetime `{}`",
                    &self.src[start..self.pos]
                )));
            };
            let time = self.checked_time(time, start)?;
            let offset = self.offset(start)?;
            return Ok(Some(Datetime {
                date: Some(date),
                time: Some(time),
                offset,
            }));
        }

        if let Some(time) = self.partial_time() {
            let time = self.checked_time(time, start)?;
            return Ok(Some(Datetime {
                date: None,
                time: Some(time),
                offset: None,
            }));
        }

        Ok(None)
    }

    fn full_date(&mut self) -> Option<Date> {
        let start = self.pos;
        let date = (|| {
            let year = self.fixed_digits(4)?;
            self.eat(b'-').then_some(())?;
            let month = self.fixed_digits(2)?;
            self.eat(b'-').then_some(())?;
            let day = self.fixed_digits(2)?;
            Some(Date {
                year: year as u16,
                month: month as u8,
                day: day as u8,
            })
        })();
        if date.is_none() {
            self.pos = start;
        }
        date
    }

    fn partial_time(&mut self) -> Option<Time> {
        let start = self.pos;
        let time = (|| {
            let hour = self.fixed_digits(2)?;
            self.eat(b':').then_some(())?;
            let minute = self.fixed_digits(2)?;
            self.eat(b':').then_some(())?;
            let second = self.fixed_digits(2)?;
            let mut nanosecond = 0;
            if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
                let frac_start = self.pos;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits = &self.bytes[frac_start..self.pos];
                for i in 0..9 {
                    let d = digits.get(i).map_or(0, |d| u32::from(d - b'0'));
                    nanosecond = nanosecond * 10 + d;
                }
            }
            Some(Time {
                hour: hour as u8,
                minute: minute as u8,
                second: second as u8,
                nanosecond,
            })
        })();
        if time.is_none() {
            self.pos = start;
        }
        time
    }

    fn offset(&mut self, start: usize) -> Result<Option<Offset>> {
        match self.peek() {
            Some(b'Z' | b'z') => {
                self.pos += 1;
                Ok(Some(Offset::Z))
            }
            Some(sign @ (b'+' | b'-')) => {
                self.pos += 1;
                let parsed = (|| {
                    let hours = self.fixed_digits(2)?;
                    self.eat(b':').then_some(())?;
                    let minutes = self.fixed_digits(2)?;
                    Some((hours, minutes))
                })();
                match parsed {
                    Some((hours, minutes)) if hours < 24 && minutes < 60 => {
                        let total = (hours * 60 + minutes) as i16;
                        let minutes = if sign == b'-' { -total } else { total };
                        Ok(Some(Offset::Custom { minutes }))
                    }
                    _ => Err(self.error(format!(
                        "malformed offset in datetime `{}`",
                        &self.src[start..self.pos]
                    ))),
                }
            }
            _ => Ok(None),
        }
    }

    fn checked_date(&self, date: Date, start: usize) -> Result<Date> {
        if date.to_naive().is_none() {
            return Err(self.error(format!(
                "invalid date `{}`",
                &self.src[start..self.pos]
            )));
        }
        Ok(date)
    }

    fn checked_time(&self, time: Time, start: usize) -> Result<Time> {
        if time.hour > 23 || time.minute > 59 || time.second > 60 {
            return Err(self.error(format!(
                "invalid time `{}`",
                &self.src[start..self.pos]
            )));
        }
        Ok(time)
    }

    // -- strings ------------------------------------------------------------------

    fn basic_string(&mut self) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.error("unterminated string")),
                Some('"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => self.escape(&mut out)?,
                Some('\n' | '\r') => return Err(self.error("newline in a single-line string")),
                Some(c) if is_control(c) => return Err(self.control_error(c)),
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn multiline_basic_string(&mut self) -> Result<String> {
        self.pos += 3;
        self.newline()?;
        let mut out = String::new();
        loop {
            if self.rest().starts_with("\"\"\"") {
                return self.close_multiline(b'"', out);
            }
            match self.peek_char() {
                None => return Err(self.error("unterminated multi-line string")),
                Some('\\') => {
                    if self.line_ending_backslash()? {
                        continue;
                    }
                    self.escape(&mut out)?;
                }
                Some('\n' | '\r') => {
                    self.newline()?;
                    out.push('\n');
                }
                Some(c) if is_control(c) => return Err(self.control_error(c)),
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    /// `\` followed by optional whitespace and a newline: trim through the next
    /// non-whitespace character. Leaves the cursor alone when this is a plain escape.
    fn line_ending_backslash(&mut self) -> Result<bool> {
        let mut look = self.pos + 1;
        while let Some(b' ' | b'\t') = self.bytes.get(look) {
            look += 1;
        }
        match self.bytes.get(look) {
            Some(b'\n') => {}
            Some(b'\r') if self.bytes.get(look + 1) == Some(&b'\n') => {}
            _ => return Ok(false),
        }
        self.pos = look;
        loop {
            self.skip_ws();
            if !self.newline()? {
                return Ok(true);
            }
        }
    }

    fn literal_string(&mut self) -> Result<String> {
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek_char() {
                None => return Err(self.error("unterminated string")),
                Some('\'') => {
                    let s = self.src[start..self.pos].to_string();
                    self.pos += 1;
                    return Ok(s);
                }
                Some('\n' | '\r') => return Err(self.error("newline in a single-line string")),
                Some(c) if is_control(c) => return Err(self.control_error(c)),
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }

    fn multiline_literal_string(&mut self) -> Result<String> {
        self.pos += 3;
        self.newline()?;
        let mut out = String::new();
        loop {
            if self.rest().starts_with("'''") {
                return self.close_multiline(b'\'', out);
            }
            match self.peek_char() {
                None => return Err(self.error("unterminated multi-line string")),
                Some('\n' | '\r') => {
                    self.newline()?;
                    out.push('\n');
                }
                Some(c) if is_control(c) => return Err(self.control_error(c)),
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    /// Closing delimiter of a multi-line string. Up to two quotes directly before
    /// the closing three belong to the content.
    fn close_multiline(&mut self, quote: u8, mut out: String) -> Result<String> {
        let mut run = 0;
        while self.peek_at(run) == Some(quote) {
            run += 1;
        }
        if run > 5 {
            return Err(self.error("too many quotes at the end of a multi-line string"));
        }
        for _ in 3..run {
            out.push(char::from(quote));
        }
        self.pos += run;
        Ok(out)
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        self.pos += 1;
        let c = match self.peek() {
            Some(b'b') => '\u{8}',
            Some(b't') => '\t',
            Some(b'n') => '\n',
            Some(b'f') => '\u{c}',
            Some(b'r') => '\r',
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'u') => return self.unicode_escape(4, out),
            Some(b'U') => return self.unicode_escape(8, out),
            _ => {
                return Err(self.error(format!(
                    "invalid escape sequence `\\{}`",
                    self.peek_char().map(String::from).unwrap_or_default()
                )))
            }
        };
        self.pos += 1;
        out.push(c);
        Ok(())
    }

    fn unicode_escape(&mut self, len: usize, out: &mut String) -> Result<()> {
        self.pos += 1;
        let hex = self
            .src
            .get(self.pos..self.pos + len)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error(format!("expected {len} hex digits in unicode escape")))?;
        let c = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid unicode scalar value `{hex}`")))?;
        self.pos += len;
        out.push(c);
        Ok(())
    }

    // -- arrays and inline tables ---------------------------------------------------

    fn array(&mut self) -> Result<Value> {
        let start = self.pos;
        let line = self.line;
        self.enter_nesting()?;
        self.pos += 1;
        self.builder.begin_array();
        loop {
            self.array_gap()?;
            if self.eat(b']') {
                break;
            }
            if self.at_end() {
                return Err(self.error("unterminated array"));
            }
            let value = self.val()?;
            self.builder.push_element(value);
            self.array_gap()?;
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                break;
            }
            if self.at_end() {
                return Err(self.error("unterminated array"));
            }
            return Err(self.unexpected("`,` or `]` in array"));
        }
        self.leave_nesting();
        Ok(self.builder.end_array(Span::new(start, self.pos), line))
    }

    fn bound_inline_table(&mut self, key: Key) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        self.enter_nesting()?;
        self.pos += 1;
        self.builder.begin_inline_table(key, line, start)?;
        self.inline_body()?;
        self.builder.end_inline_table(self.pos, self.line)?;
        self.leave_nesting();
        Ok(())
    }

    fn inline_element(&mut self) -> Result<Value> {
        let start = self.pos;
        let line = self.line;
        self.enter_nesting()?;
        self.pos += 1;
        self.builder.begin_inline_element(line, start);
        self.inline_body()?;
        let value = self.builder.end_inline_element(self.pos, line)?;
        self.leave_nesting();
        Ok(value)
    }

    /// `keyval (, keyval)* }` with no trailing comma and no newlines.
    fn inline_body(&mut self) -> Result<()> {
        self.skip_ws();
        if self.eat(b'}') {
            return Ok(());
        }
        loop {
            self.keyval()?;
            self.skip_ws();
            if self.eat(b',') {
                self.skip_ws();
                if self.peek() == Some(b'}') {
                    return Err(self.error("trailing comma in inline table"));
                }
                continue;
            }
            if self.eat(b'}') {
                return Ok(());
            }
            if self.at_end() {
                return Err(self.error("unterminated inline table"));
            }
            return Err(self.unexpected("`,` or `}` in inline table"));
        }
    }
}
