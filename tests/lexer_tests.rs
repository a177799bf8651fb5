// tests/lexer_tests.rs

use rsql_filter::ast::Token;
use rsql_filter::lexer::{LexError, Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

fn unreserved(s: &str) -> Token {
    Token::Unreserved(s.to_string())
}

fn op(s: &str) -> Token {
    Token::Operator(s.to_string())
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        (";", Token::Semicolon),
        (",", Token::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_empty_and_whitespace_input() {
    assert!(tokens("").is_empty());
    assert!(tokens("   \t\n").is_empty());
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_symbolic_operators() {
    let test_cases = vec!["==", "!=", "<", "<=", ">", ">="];

    for symbol in test_cases {
        let input = format!("a{}1", symbol);
        assert_eq!(
            tokens(&input),
            vec![unreserved("a"), op(symbol), unreserved("1")],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_fiql_operators() {
    for symbol in ["=gt=", "=ge=", "=lt=", "=le=", "=in=", "=out=", "=isnull=", "=isempty="] {
        let input = format!("a{}1", symbol);
        assert_eq!(tokens(&input)[1], op(symbol), "Failed for input: {}", input);
    }
}

#[test]
fn test_unknown_fiql_names_still_lex() {
    // Rejecting unregistered operators is the parser's job
    assert_eq!(tokens("a=foo=1")[1], op("=foo="));
}

#[test]
fn test_malformed_operators() {
    let mut lexer = Lexer::new("a=1");
    lexer.next_token().unwrap();
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::MalformedOperator { position: Position(1), .. })
    ));

    let mut lexer = Lexer::new("a=gt 1");
    lexer.next_token().unwrap();
    assert!(matches!(lexer.next_token(), Err(LexError::MalformedOperator { .. })));

    let mut lexer = Lexer::new("a!1");
    lexer.next_token().unwrap();
    assert!(matches!(lexer.next_token(), Err(LexError::MalformedOperator { .. })));
}

// ============================================================================
// Selectors and Arguments
// ============================================================================

#[test]
fn test_dotted_selector_is_one_token() {
    assert_eq!(
        tokens("dept.manager.name==jo*"),
        vec![unreserved("dept.manager.name"), op("=="), unreserved("jo*")]
    );
}

#[test]
fn test_unreserved_allows_punctuation() {
    assert_eq!(
        tokens("created>=2024-03-01T10:00"),
        vec![
            unreserved("created"),
            op(">="),
            unreserved("2024-03-01T10:00")
        ]
    );
}

#[test]
fn test_quoted_strings() {
    assert_eq!(
        tokens(r#"title=="Head of sales""#)[2],
        Token::Quoted("Head of sales".to_string())
    );
    assert_eq!(
        tokens("title=='a;b,c'")[2],
        Token::Quoted("a;b,c".to_string())
    );
}

#[test]
fn test_quoted_escapes() {
    assert_eq!(
        tokens(r#"note=='it\'s'"#)[2],
        Token::Quoted("it's".to_string())
    );
    assert_eq!(
        tokens(r#"note=="a\"b\\c""#)[2],
        Token::Quoted(r#"a"b\c"#.to_string())
    );
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("name=='john");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString {
            position: Position(6)
        })
    );
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("~name");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar {
            ch: '~',
            position: Position(0)
        })
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_token_start_positions() {
    let mut lexer = Lexer::new("a == 1 ; b");
    let mut starts = Vec::new();
    while lexer.next_token().unwrap() != Token::Eof {
        starts.push(lexer.token_start());
    }
    assert_eq!(
        starts,
        vec![Position(0), Position(2), Position(5), Position(7), Position(9)]
    );
}
