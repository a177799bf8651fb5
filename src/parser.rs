use std::mem;

use thiserror::Error;

use crate::{
    ast::{Comparison, ComparisonOperator, Node, OperatorSet, Token},
    lexer::{LexError, Lexer, Position},
};

/// Errors produced while turning filter text into a [`Node`] tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("empty filter expression")]
    Empty,

    #[error("expected {expected}, found {found} at position {position}")]
    Unexpected {
        expected: &'static str,
        found: String,
        position: Position,
    },

    #[error("unknown operator '{symbol}' at position {position}")]
    UnknownOperator { symbol: String, position: Position },

    #[error("operator '{operator}' takes a single argument, got {count} at position {position}")]
    TooManyArguments {
        operator: ComparisonOperator,
        count: usize,
        position: Position,
    },
}

fn describe(token: &Token) -> String {
    match token {
        Token::Unreserved(s) => format!("'{}'", s),
        Token::Quoted(s) => format!("\"{}\"", s),
        Token::Operator(op) => format!("operator '{}'", op),
        Token::Semicolon => "';'".to_string(),
        Token::Comma => "','".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    operators: OperatorSet,
}

impl Parser {
    pub fn new(mut lexer: Lexer, operators: OperatorSet) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            operators,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: describe(&self.current_token),
            position: self.current_position,
        }
    }

    fn expect(&mut self, expected: Token, description: &'static str) -> Result<(), ParseError> {
        if self.current_token != expected {
            return Err(self.unexpected(description));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// The word operators `and` / `or`, only recognized between constraints
    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current_token, Token::Unreserved(word) if word == keyword)
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut children = vec![self.parse_and()?];

        while self.check(&Token::Comma) || self.check_keyword("or") {
            self.advance()?;
            children.push(self.parse_and()?);
        }

        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Node::Or(children)
        })
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut children = vec![self.parse_constraint()?];

        while self.check(&Token::Semicolon) || self.check_keyword("and") {
            self.advance()?;
            children.push(self.parse_constraint()?);
        }

        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Node::And(children)
        })
    }

    fn parse_constraint(&mut self) -> Result<Node, ParseError> {
        if self.check(&Token::LParen) {
            self.advance()?;
            let group = self.parse_or()?;
            self.expect(Token::RParen, "')'")?;
            return Ok(group);
        }
        self.parse_comparison().map(Node::Comparison)
    }

    fn parse_comparison(&mut self) -> Result<Comparison, ParseError> {
        let selector = match &self.current_token {
            Token::Unreserved(name) => name.clone(),
            _ => return Err(self.unexpected("selector")),
        };
        self.advance()?;

        let operator_position = self.current_position;
        let operator = match &self.current_token {
            Token::Operator(symbol) => {
                self.operators
                    .lookup(symbol)
                    .ok_or_else(|| ParseError::UnknownOperator {
                        symbol: symbol.clone(),
                        position: operator_position,
                    })?
            }
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance()?;

        let arguments = self.parse_arguments()?;
        if !operator.is_multi_value() && arguments.len() > 1 {
            return Err(ParseError::TooManyArguments {
                operator,
                count: arguments.len(),
                position: operator_position,
            });
        }

        Ok(Comparison {
            selector,
            operator,
            arguments,
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<String>, ParseError> {
        if !self.check(&Token::LParen) {
            return Ok(vec![self.parse_value()?]);
        }

        self.advance()?; // Consume '('
        let mut values = vec![self.parse_value()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            values.push(self.parse_value()?);
        }
        self.expect(Token::RParen, "')' or ','")?;

        Ok(values)
    }

    fn parse_value(&mut self) -> Result<String, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Unreserved(value) | Token::Quoted(value) => {
                self.advance()?;
                Ok(value)
            }
            other => {
                self.current_token = other;
                Err(self.unexpected("argument"))
            }
        }
    }

    /// Parse a complete filter expression
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        if self.check(&Token::Eof) {
            return Err(ParseError::Empty);
        }
        let node = self.parse_or()?;
        self.expect(Token::Eof, "';', ',' or end of input")?;
        Ok(node)
    }
}

/// Parse `input` accepting only the operators in `operators`.
pub fn parse(input: &str, operators: &OperatorSet) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(input), operators.clone())?.parse()
}
