use std::fmt;

/// "Words" produced by `Scanner`.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    EqualEqual,
    Bang,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Punctuation
    LeftParen,
    RightParen,
    Semicolon,
    Newline,

    // Keywords
    True,
    False,
    Print,
    And,
    Or,
    Not,

    Identifier(String),
    Integer(i64),
    Float(f64),
    Str(String),
}

/// Coarse classification of tokens.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    End,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Eof => TokenKind::End,
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Equal
            | Token::EqualEqual
            | Token::Bang
            | Token::BangEqual
            | Token::Less
            | Token::LessEqual
            | Token::Greater
            | Token::GreaterEqual => TokenKind::Operator,
            Token::LeftParen | Token::RightParen | Token::Semicolon | Token::Newline => {
                TokenKind::Punctuation
            }
            Token::True | Token::False | Token::Print | Token::And | Token::Or | Token::Not => {
                TokenKind::Keyword
            }
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Integer(_) | Token::Float(_) => TokenKind::Number,
            Token::Str(_) => TokenKind::String,
        }
    }
}

/// Return the token associated with `name` if it is a keyword.
pub fn keyword(name: &str) -> Option<Token> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == name)
        .map(|(_, token)| token.clone())
}

const KEYWORDS: [(&str, Token); 6] = [
    ("true", Token::True),
    ("false", Token::False),
    ("print", Token::Print),
    ("and", Token::And),
    ("or", Token::Or),
    ("not", Token::Not),
];

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Equal => write!(f, "="),
            Token::EqualEqual => write!(f, "=="),
            Token::Bang => write!(f, "!"),
            Token::BangEqual => write!(f, "!="),
            Token::Less => write!(f, "<"),
            Token::LessEqual => write!(f, "<="),
            Token::Greater => write!(f, ">"),
            Token::GreaterEqual => write!(f, ">="),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Semicolon => write!(f, ";"),
            Token::Newline => write!(f, "newline"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Print => write!(f, "print"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{:?}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}
