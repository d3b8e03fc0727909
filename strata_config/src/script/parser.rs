//! Tokenising and parsing of patch scripts.

use serde_json::Value;

use super::path::{PatchPath, Segment, is_ident_continue, is_ident_start};
use super::{ScriptError, Statement};

/// Parse `src` into statements tagged with their one-based starting line.
pub(super) fn parse(src: &str) -> Result<Vec<(usize, Statement)>, ScriptError> {
    let mut parser = Parser::new(src);
    let mut statements = Vec::new();
    while parser.skip_separators()? {
        let line = parser.line;
        let statement = parser.statement(line)?;
        statements.push((line, statement));
    }
    Ok(statements)
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
}

impl<'s> Parser<'s> {
    const fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'s str {
        self.src.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, line: usize) -> Result<(), ScriptError> {
        // Caller has already consumed the opening `/*`.
        while !self.rest().starts_with("*/") {
            if self.bump().is_none() {
                return Err(syntax(line, "unterminated block comment"));
            }
        }
        self.pos += 2;
        Ok(())
    }

    /// Skip whitespace, separators and comments. Returns `false` at the end
    /// of input.
    fn skip_separators(&mut self) -> Result<bool, ScriptError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") || rest.starts_with('#') {
                self.skip_line();
            } else if rest.starts_with("/*") {
                let line = self.line;
                self.pos += 2;
                self.skip_block_comment(line)?;
            } else {
                match self.peek() {
                    Some(c) if c.is_whitespace() || c == ';' => {
                        self.bump();
                    }
                    Some(_) => return Ok(true),
                    None => return Ok(false),
                }
            }
        }
    }

    fn statement(&mut self, line: usize) -> Result<Statement, ScriptError> {
        if self.eat_delete() {
            let path = self.path(line)?;
            self.end_of_statement(line, &path)?;
            return Ok(Statement::Delete { path });
        }
        let path = self.path(line)?;
        self.skip_inline_ws();
        if !self.eat('=') {
            return Err(syntax(line, format!("expected `=` after `{path}`")));
        }
        let text = self.value_text(line)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(syntax(line, format!("missing value for `{path}`")));
        }
        let value: Value = json5::from_str(trimmed)
            .map_err(|err| syntax(line, format!("invalid value for `{path}`: {err}")))?;
        Ok(Statement::Assign { path, value })
    }

    /// Consume a leading `delete` keyword when it is followed by a path.
    fn eat_delete(&mut self) -> bool {
        let rest = self.rest();
        let Some(after) = rest.strip_prefix("delete") else {
            return false;
        };
        let trimmed = after.trim_start_matches([' ', '\t']);
        if trimmed.len() == after.len() || !trimmed.starts_with(is_ident_start) {
            return false;
        }
        self.pos += rest.len() - trimmed.len();
        true
    }

    fn end_of_statement(&mut self, line: usize, path: &PatchPath) -> Result<(), ScriptError> {
        self.skip_inline_ws();
        let rest = self.rest();
        match self.peek() {
            None | Some('\n' | ';' | '#') => Ok(()),
            Some(_) if rest.starts_with("//") || rest.starts_with("/*") => Ok(()),
            Some(c) => Err(syntax(line, format!("unexpected `{c}` after `{path}`"))),
        }
    }

    fn ident(&mut self) -> Option<String> {
        let rest = self.rest();
        if !rest.starts_with(is_ident_start) {
            return None;
        }
        let len = rest
            .find(|c: char| !is_ident_continue(c))
            .unwrap_or(rest.len());
        self.pos += len;
        rest.get(..len).map(str::to_owned)
    }

    fn path(&mut self, line: usize) -> Result<PatchPath, ScriptError> {
        let root = self
            .ident()
            .ok_or_else(|| syntax(line, self.unexpected("a field name")))?;
        let mut segments = Vec::new();
        loop {
            if self.eat('.') {
                let key = self
                    .ident()
                    .ok_or_else(|| syntax(line, self.unexpected("a field name after `.`")))?;
                segments.push(Segment::Key(key));
            } else if self.eat('[') {
                self.skip_inline_ws();
                let segment = match self.peek() {
                    Some('"' | '\'') => Segment::Key(self.quoted_key(line)?),
                    Some(c) if c.is_ascii_digit() => Segment::Index(self.index(line)?),
                    _ => return Err(syntax(line, self.unexpected("a quoted key or an index"))),
                };
                self.skip_inline_ws();
                if !self.eat(']') {
                    return Err(syntax(line, self.unexpected("`]`")));
                }
                segments.push(segment);
            } else {
                break;
            }
        }
        Ok(PatchPath::new(root, segments))
    }

    fn quoted_key(&mut self, line: usize) -> Result<String, ScriptError> {
        let start = self.pos;
        self.skip_string(line)?;
        let literal = self.src.get(start..self.pos).unwrap_or_default();
        json5::from_str(literal).map_err(|err| syntax(line, format!("invalid quoted key: {err}")))
    }

    fn index(&mut self, line: usize) -> Result<usize, ScriptError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        self.pos += len;
        let digits = rest.get(..len).unwrap_or_default();
        digits
            .parse()
            .map_err(|err| syntax(line, format!("invalid index `{digits}`: {err}")))
    }

    /// Skip a quoted string starting at the current position, honouring
    /// backslash escapes.
    fn skip_string(&mut self, line: usize) -> Result<(), ScriptError> {
        let Some(quote) = self.bump() else {
            return Err(syntax(line, "expected a string"));
        };
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
                None => return Err(syntax(line, "unterminated string")),
            }
        }
    }

    /// Capture the text of a value up to the end of its statement.
    ///
    /// Newlines and `;` end the value only outside brackets and strings.
    fn value_text(&mut self, line: usize) -> Result<&'s str, ScriptError> {
        let start = self.pos;
        let mut depth = 0_usize;
        loop {
            let rest = self.rest();
            match self.peek() {
                None => break,
                Some('"' | '\'') => self.skip_string(line)?,
                Some('{' | '[') => {
                    depth += 1;
                    self.bump();
                }
                Some('}' | ']') => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                Some('/') if rest.starts_with("/*") => {
                    self.pos += 2;
                    self.skip_block_comment(line)?;
                }
                Some('/') if rest.starts_with("//") => {
                    if depth == 0 {
                        break;
                    }
                    self.skip_line();
                }
                Some('\n' | ';' | '#') if depth == 0 => break,
                Some(_) => {
                    self.bump();
                }
            }
        }
        Ok(self.src.get(start..self.pos).unwrap_or_default())
    }

    fn unexpected(&self, wanted: &str) -> String {
        match self.peek() {
            Some(c) => format!("expected {wanted}, found `{c}`"),
            None => format!("expected {wanted}, found end of script"),
        }
    }
}

fn syntax(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Syntax {
        line,
        message: message.into(),
    }
}
