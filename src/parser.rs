//! Parser for prefs.js files
//!
//! A small recursive descent parser over the lexer's tokens. The grammar is
//! a sequence of statements:
//!
//! ```text
//! user_pref("preference.name", value);
//! pref("preference.name", value);           // default
//! lock_pref("preference.name", value);      // locked
//! sticky_pref("preference.name", value);    // sticky
//! ```
//!
//! where `value` is a boolean, an integer or a double-quoted string.
//!
//! # Example
//!
//! ```rust
//! use skelprefs::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     ## Mozilla User Preferences
//!     user_pref("browser.startup.homepage", "http://www.math.kyoto-u.ac.jp/");
//!     user_pref("network.proxy.type", 2);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! let homepage = prefs.get("browser.startup.homepage").unwrap();
//! assert_eq!(homepage.value, PrefValue::String("http://www.math.kyoto-u.ac.jp/".to_string()));
//! assert_eq!(homepage.pref_type, PrefType::User);
//! # Ok::<(), skelprefs::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::types::{PrefEntry, PrefFile, PrefType, PrefValue};
use std::path::Path;

/// Parse prefs.js content into an ordered file of unique records
pub fn parse_prefs_js(content: &str) -> Result<PrefFile> {
    let mut parser = Parser::new(content)?;
    parser.parse()
}

/// Parse raw bytes, rejecting input that is not UTF-8
pub fn parse_prefs_bytes(bytes: &[u8]) -> Result<PrefFile> {
    let content = std::str::from_utf8(bytes)?;
    parse_prefs_js(content)
}

/// Parse a prefs.js file directly from a file path
pub fn parse_prefs_js_file(path: &Path) -> Result<PrefFile> {
    let bytes = std::fs::read(path)?;
    parse_prefs_bytes(&bytes)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current lookahead token
    current: Token,
    /// Start position of the lookahead token
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let (line, column) = lexer.token_position();
        Ok(Parser {
            lexer,
            current,
            line,
            column,
        })
    }

    fn parse(&mut self) -> Result<PrefFile> {
        let mut file = PrefFile::new();

        while self.current != Token::Eof {
            let line = self.line;
            let column = self.column;
            let entry = self.parse_statement()?;
            file.push(entry).map_err(|e| match e {
                Error::DuplicateKey(key) => Error::Parser {
                    line,
                    column,
                    message: format!("Duplicate preference key '{}'", key),
                },
                Error::InvalidPreference(message) => Error::Parser {
                    line,
                    column,
                    message,
                },
                other => other,
            })?;
        }

        Ok(file)
    }

    /// func "(" key "," value ")" ";"
    fn parse_statement(&mut self) -> Result<PrefEntry> {
        let pref_type = self.parse_pref_type()?;
        self.expect(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect(Token::Comma)?;
        let value = self.parse_value()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;

        Ok(PrefEntry {
            key,
            value,
            pref_type,
        })
    }

    fn parse_pref_type(&mut self) -> Result<PrefType> {
        let pref_type = match &self.current {
            Token::Identifier(ident) => PrefType::from_function_name(ident).ok_or_else(|| {
                self.error(format!(
                    "Unknown pref function '{}'. Expected user_pref, pref, lock_pref, or sticky_pref",
                    ident
                ))
            })?,
            token => {
                return Err(self.error(format!(
                    "Expected pref function name (user_pref, pref, lock_pref, sticky_pref), got {:?}",
                    token
                )))
            }
        };
        self.advance()?;
        Ok(pref_type)
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        match &self.current {
            Token::String(_) | Token::Integer(_) | Token::Boolean(_) => {}
            token => return Err(self.error(format!("Expected value, got {:?}", token))),
        }
        let value = match self.advance()? {
            Token::String(s) => PrefValue::String(s),
            Token::Integer(n) => PrefValue::Integer(n),
            Token::Boolean(b) => PrefValue::Bool(b),
            _ => unreachable!(),
        };
        Ok(value)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current != expected {
            return Err(self.error(format!("Expected {:?}, got {:?}", expected, self.current)));
        }
        self.advance()?;
        Ok(())
    }

    fn expect_string(&mut self) -> Result<String> {
        match &self.current {
            Token::String(_) => match self.advance()? {
                Token::String(s) => Ok(s),
                _ => unreachable!(),
            },
            token => Err(self.error(format!("Expected string, got {:?}", token))),
        }
    }

    /// Move to the next token, returning the one just consumed
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        let (line, column) = self.lexer.token_position();
        self.line = line;
        self.column = column;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error(&self, message: String) -> Error {
        Error::Parser {
            line: self.line,
            column: self.column,
            message,
        }
    }
}
