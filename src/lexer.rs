use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Character offset into the filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: Position },

    #[error("malformed operator at position {position}: {message}")]
    MalformedOperator {
        position: Position,
        message: &'static str,
    },
}

/// Characters allowed in selectors and bare arguments.
pub fn is_unreserved(ch: char) -> bool {
    !ch.is_whitespace()
        && !matches!(
            ch,
            '"' | '\'' | '(' | ')' | ';' | ',' | '=' | '!' | '~' | '<' | '>'
        )
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Where the most recently returned token started.
    pub fn token_start(&self) -> Position {
        Position(self.token_start)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_unreserved(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_unreserved(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let start = Position(self.position);
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some(escaped) => result.push(escaped),
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// `==` or the FIQL form `=name=`
    fn read_equals_operator(&mut self) -> Result<Token, LexError> {
        let start = Position(self.position);
        if self.peek_char(1) == Some('=') {
            self.advance();
            self.advance();
            return Ok(Token::Operator("==".to_string()));
        }

        self.advance(); // Consume leading '='
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphabetic() {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(LexError::MalformedOperator {
                position: start,
                message: "expected '==' or '=name='",
            });
        }
        if self.current_char() != Some('=') {
            return Err(LexError::MalformedOperator {
                position: start,
                message: "missing closing '=' after operator name",
            });
        }
        self.advance();

        Ok(Token::Operator(format!("={}=", name)))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some(';') => {
                self.advance();
                Token::Semicolon
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('=') => self.read_equals_operator()?,
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::Operator("!=".to_string())
                } else {
                    return Err(LexError::MalformedOperator {
                        position: Position(self.position),
                        message: "expected '!='",
                    });
                }
            }
            Some(ch @ ('<' | '>')) => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    Token::Operator(format!("{}=", ch))
                } else {
                    Token::Operator(ch.to_string())
                }
            }
            Some(quote @ ('"' | '\'')) => Token::Quoted(self.read_quoted(quote)?),
            Some(ch) if is_unreserved(ch) => Token::Unreserved(self.read_unreserved()),
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: Position(self.position),
                });
            }
        };

        Ok(token)
    }
}

#[test]
fn test_comparison_tokens() {
    let mut lexer = Lexer::new("age>=30");
    assert_eq!(lexer.next_token(), Ok(Token::Unreserved("age".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Operator(">=".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Unreserved("30".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_fiql_operator() {
    let mut lexer = Lexer::new("status=in=(a,b)");
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Unreserved("status".to_string()))
    );
    assert_eq!(lexer.next_token(), Ok(Token::Operator("=in=".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::Unreserved("a".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Comma));
    assert_eq!(lexer.next_token(), Ok(Token::Unreserved("b".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}
