//! Lexer for tokenizing prefs.js files
//!
//! Converts a character stream into tokens for the parser. Handles the
//! JavaScript escape sequences that can appear inside preference strings and
//! tracks line/column numbers for error reporting.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (e.g., user_pref, pref, lock_pref, sticky_pref)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// End of input
    Eof,
}

/// Lexer for tokenizing preference files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Position where the most recent token started
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Line and column where the last returned token started
    pub fn token_position(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        self.token_line = self.line;
        self.token_column = self.column;

        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' => {
                self.bump();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.bump();
                Ok(Token::RightParen)
            }
            ',' => {
                self.bump();
                Ok(Token::Comma)
            }
            ';' => {
                self.bump();
                Ok(Token::Semicolon)
            }
            '"' => self.lex_string(),
            '-' | '0'..='9' => self.lex_integer(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier()),
            _ => Err(self.error(format!("Unexpected character: '{}'", c))),
        }
    }

    /// Consume one character, keeping line/column in sync
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: String) -> Error {
        Error::Lexer {
            line: self.line,
            column: self.column,
            message,
        }
    }

    /// Skip whitespace, `//` and `/* */` comments, and `#` line comments
    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while let Some(&c) = self.chars.peek() {
                if c.is_whitespace() {
                    self.bump();
                } else {
                    break;
                }
            }

            match self.chars.peek() {
                Some(&'#') => self.skip_line(),
                Some(&'/') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    match self.chars.peek() {
                        Some(&'/') => self.skip_line(),
                        Some(&'*') => {
                            self.bump();
                            self.skip_block_comment(line, column)?;
                        }
                        _ => {
                            return Err(Error::Lexer {
                                line,
                                column,
                                message: "Unexpected character: '/'".to_string(),
                            })
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, start_line: usize, start_column: usize) -> Result<()> {
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_column,
                        message: "Unterminated block comment".to_string(),
                    })
                }
            }
        }
    }

    /// Lex an identifier (e.g., user_pref, pref, true, false)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a double-quoted string literal
    fn lex_string(&mut self) -> Result<Token> {
        let (start_line, start_column) = (self.line, self.column);
        self.bump();

        let mut result = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => {
                    let c = self.lex_escape()?;
                    result.push(c);
                }
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_column,
                        message: "Unterminated string literal".to_string(),
                    })
                }
            }
        }
    }

    /// Decode the escape sequence following a backslash
    fn lex_escape(&mut self) -> Result<char> {
        match self.bump() {
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('\\') => Ok('\\'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('b') => Ok('\x08'),
            Some('f') => Ok('\x0c'),
            Some('0') => {
                if matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                    return Err(self.error(
                        "Octal escape sequences are not supported. Use \\x00 instead.".to_string(),
                    ));
                }
                Ok('\0')
            }
            Some('x') => {
                let code = self.lex_hex_digits(2)?;
                Ok(char::from(code as u8))
            }
            Some('u') => {
                let high = self.lex_hex_digits(4)?;
                if (0xD800..0xDC00).contains(&high) {
                    // Surrogate pair: expect a second \uXXXX for the low half
                    if self.bump() != Some('\\') || self.bump() != Some('u') {
                        return Err(self.error("Unpaired surrogate in unicode escape".to_string()));
                    }
                    let low = self.lex_hex_digits(4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error("Invalid low surrogate in unicode escape".to_string()));
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code)
                        .ok_or_else(|| self.error(format!("Invalid code point: {:#x}", code)));
                }
                if (0xDC00..0xE000).contains(&high) {
                    return Err(self.error("Unpaired surrogate in unicode escape".to_string()));
                }
                char::from_u32(high)
                    .ok_or_else(|| self.error(format!("Invalid code point: {:#x}", high)))
            }
            Some(c) => Err(self.error(format!("Invalid escape sequence: \\{}", c))),
            None => Err(self.error("Unexpected end of input in escape sequence".to_string())),
        }
    }

    fn lex_hex_digits(&mut self, count: usize) -> Result<u32> {
        let mut hex = String::with_capacity(count);
        for _ in 0..count {
            match self.chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if hex.len() != count {
            return Err(self.error(format!("Incomplete hex escape: {}", hex)));
        }
        u32::from_str_radix(&hex, 16).map_err(|_| self.error(format!("Invalid hex escape: {}", hex)))
    }

    /// Lex an integer with an optional leading minus sign
    fn lex_integer(&mut self) -> Result<Token> {
        let (start_line, start_column) = (self.line, self.column);
        let mut num_str = String::new();

        if let Some(&'-') = self.chars.peek() {
            num_str.push('-');
            self.bump();
        }

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if let Some(&c) = self.chars.peek() {
            if c == '.' || c == 'e' || c == 'E' {
                return Err(self.error(
                    "Only integer numbers are supported in preference values".to_string(),
                ));
            }
        }

        num_str.parse::<i64>().map(Token::Integer).map_err(|_| Error::Lexer {
            line: start_line,
            column: start_column,
            message: format!("Invalid integer: {}", num_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_lexer_basic_tokens() {
        assert_eq!(
            tokens("( ) , ;"),
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::Comma,
                Token::Semicolon
            ]
        );
    }

    #[test]
    fn test_lexer_comments() {
        let input = "# Mozilla User Preferences\n\n/* Do not edit\n * this file */\n( // trailing\n)";
        assert_eq!(tokens(input), vec![Token::LeftParen, Token::RightParen]);
    }

    #[test]
    fn test_lexer_hash_inside_string_is_not_comment() {
        assert_eq!(
            tokens(r#""http://example.com/#prefs""#),
            vec![Token::String("http://example.com/#prefs".to_string())]
        );
    }

    #[test]
    fn test_lexer_unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        assert!(matches!(
            lexer.next_token(),
            Err(Error::Lexer { line: 1, column: 1, .. })
        ));
    }

    #[test]
    fn test_lexer_identifier_and_booleans() {
        assert_eq!(
            tokens("user_pref sticky_pref true false"),
            vec![
                Token::Identifier("user_pref".to_string()),
                Token::Identifier("sticky_pref".to_string()),
                Token::Boolean(true),
                Token::Boolean(false),
            ]
        );
    }

    #[test]
    fn test_lexer_integers() {
        assert_eq!(
            tokens("1239591128 -1 0"),
            vec![
                Token::Integer(1239591128),
                Token::Integer(-1),
                Token::Integer(0)
            ]
        );
    }

    #[test]
    fn test_lexer_rejects_float() {
        let mut lexer = Lexer::new("2.5");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_rejects_overflow() {
        let mut lexer = Lexer::new("99999999999999999999");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b\\c\nd\te\x41B""#),
            vec![Token::String("a\"b\\c\nd\teAB".to_string())]
        );
    }

    #[test]
    fn test_lexer_surrogate_pair() {
        assert_eq!(
            tokens(r#""\uD83D\uDE00""#),
            vec![Token::String("\u{1F600}".to_string())]
        );
    }

    #[test]
    fn test_lexer_lone_surrogates_rejected() {
        for input in [r#""x\uDC00y""#, r#""x\uD800y""#, r#""\uDFFF""#] {
            let mut lexer = Lexer::new(input);
            match lexer.next_token() {
                Err(Error::Lexer { message, .. }) => {
                    assert!(message.contains("Unpaired surrogate"), "{input}: {message}")
                }
                other => panic!("{input}: expected lexer error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_lexer_octal_escape_rejected() {
        let mut lexer = Lexer::new(r#""test\00""#);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_lexer_unterminated_string() {
        let mut lexer = Lexer::new("\n  \"open");
        match lexer.next_token() {
            Err(Error::Lexer { line, column, .. }) => {
                assert_eq!((line, column), (2, 3));
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_lexer_token_position() {
        let mut lexer = Lexer::new("\n\n   user_pref");
        lexer.next_token().unwrap();
        assert_eq!(lexer.token_position(), (3, 4));
    }

    #[test]
    fn test_lexer_stray_slash() {
        let mut lexer = Lexer::new("/ x");
        assert!(lexer.next_token().is_err());
    }
}
