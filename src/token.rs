use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use strum_macros::EnumDiscriminants;

/// Text carried by the synthetic end-of-line token, so it can be named in
/// literal matchers next to `;`.
pub static EOL: &str = "\\n";

#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash, strum_macros::Display))]
#[strum_discriminants(name(TokenType))]
pub enum TokenKind {
    // Names, keywords and punctuation
    Identifier(String),

    // Literals
    Number(i64),
    String(String),

    // Markers
    EndOfLine,
    EndOfFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn eol(line: usize) -> Self {
        Self::new(TokenKind::EndOfLine, line)
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::EndOfFile, line)
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        TokenType::from(&self.kind) == token_type
    }

    pub fn is_identifier(&self) -> bool {
        self.is(TokenType::Identifier)
    }

    pub fn is_number(&self) -> bool {
        self.is(TokenType::Number)
    }

    pub fn is_string(&self) -> bool {
        self.is(TokenType::String)
    }

    pub fn is_eof(&self) -> bool {
        self.is(TokenType::EndOfFile)
    }

    /// True for identifier tokens shaped like a name (`[A-Za-z_]...`), as
    /// opposed to operators and punctuation.
    pub fn is_name(&self) -> bool {
        match &self.kind {
            TokenKind::Identifier(text) => text
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_alphabetic() || c == '_'),
            _ => false,
        }
    }

    pub fn number(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match &self.kind {
            TokenKind::Identifier(text) | TokenKind::String(text) => Cow::Borrowed(text),
            TokenKind::Number(n) => Cow::Owned(n.to_string()),
            TokenKind::EndOfLine => Cow::Borrowed(EOL),
            TokenKind::EndOfFile => Cow::Borrowed(""),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_token_text() {
        let cases = vec![
            (TokenKind::Identifier("while".to_owned()), "while"),
            (TokenKind::Identifier("==".to_owned()), "=="),
            (TokenKind::Number(42), "42"),
            (TokenKind::String("a \"b\"".to_owned()), "a \"b\""),
            (TokenKind::EndOfLine, "\\n"),
            (TokenKind::EndOfFile, ""),
        ];

        for (kind, text) in cases.into_iter() {
            assert_eq!(Token::new(kind, 1).text(), text);
        }
    }

    #[test]
    fn test_is_name() {
        let cases = vec![
            ("x", true),
            ("_tmp1", true),
            ("+", false),
            ("(", false),
            ("<=", false),
        ];

        for (text, expected) in cases.into_iter() {
            let token = Token::new(TokenKind::Identifier(text.to_owned()), 1);
            assert_eq!(token.is_name(), expected, "{}", text);
        }
        assert!(!Token::new(TokenKind::Number(1), 1).is_name());
    }

    #[test]
    fn test_token_type() {
        assert!(Token::eol(3).is(TokenType::EndOfLine));
        assert!(Token::eof(3).is_eof());
        assert!(Token::new(TokenKind::Number(7), 1).is_number());
        assert!(Token::new(TokenKind::String("s".to_owned()), 1).is_string());
        assert_eq!(TokenType::Identifier.to_string(), "Identifier");
    }
}
