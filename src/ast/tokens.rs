#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted run of unreserved characters
    ///
    /// Used for selectors, bare arguments and the `and`/`or` keywords.
    ///
    /// # Examples
    /// ```text
    /// name
    /// dept.manager.name
    /// jo*n
    /// 2024-03-01
    /// ```
    Unreserved(String),

    /// String enclosed in single or double quotes
    ///
    /// A backslash escapes the next character.
    ///
    /// # Examples
    /// ```text
    /// "John Smith"
    /// '2024-03-01 00:00:00.000'
    /// "say \"hi\""
    /// ```
    Quoted(String),

    /// Comparison operator symbol, not yet checked against an operator set
    ///
    /// # Examples
    /// ```text
    /// ==
    /// !=
    /// >=
    /// =in=
    /// =isnull=
    /// ```
    Operator(String),

    // Logical
    /// Logical AND (`;`)
    Semicolon,

    /// Logical OR (`,`), also separates arguments inside a group
    Comma,

    // Delimiters
    /// Left parenthesis for grouping or argument lists
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}
