//! SQL Tokenizer implementation.

use super::{Keyword, Quote, Span, Token, TokenKind};

/// A pull-based lexer: every call to [`Lexer::next_token`] scans exactly one
/// token. Once the input is exhausted it keeps returning EOF.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current byte without advancing.
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Advances by one byte and returns it.
    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes the current byte if it equals `expected`.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token whose literal is the scanned source text.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, &self.input[self.start..self.pos], self.make_span())
    }

    /// Creates an illegal token for the single byte just consumed.
    fn make_illegal(&self) -> Token {
        let bytes = &self.input.as_bytes()[self.start..self.pos];
        Token::new(
            TokenKind::Illegal,
            String::from_utf8_lossy(bytes).into_owned(),
            self.make_span(),
        )
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans a maximal run of digits.
    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.make_token(TokenKind::Integer)
    }

    /// Scans a string literal; the opening quote is already consumed.
    ///
    /// No escape processing. An unterminated string yields whatever was
    /// scanned up to the end of input.
    fn scan_string(&mut self, quote: Quote) -> Token {
        let quote_byte = quote.as_byte();
        let content_start = self.pos;
        while self.peek().is_some_and(|b| b != quote_byte) {
            self.pos += 1;
        }
        let content_end = self.pos;
        self.eat(quote_byte);

        Token::new(
            TokenKind::String(quote),
            &self.input[content_start..content_end],
            self.make_span(),
        )
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(b) = self.advance() else {
            return Token::eof(self.pos);
        };

        match b {
            // Potentially multi-character tokens
            b'=' => {
                if self.eat(b'=') {
                    self.make_token(TokenKind::Eq)
                } else {
                    self.make_token(TokenKind::Assign)
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            b'<' => {
                if self.eat(b'=') {
                    self.make_token(TokenKind::LtEq)
                } else if self.eat(b'>') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            b'>' => {
                if self.eat(b'=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }

            // Single-character tokens
            b'+' => self.make_token(TokenKind::Plus),
            b'-' => self.make_token(TokenKind::Minus),
            b'*' => self.make_token(TokenKind::Star),
            b'/' => self.make_token(TokenKind::Slash),
            b'\\' => self.make_token(TokenKind::Backslash),
            b'|' => self.make_token(TokenKind::BitOr),
            b'&' => self.make_token(TokenKind::BitAnd),
            b',' => self.make_token(TokenKind::Comma),
            b';' => self.make_token(TokenKind::Semicolon),
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b'[' => self.make_token(TokenKind::LeftBracket),
            b']' => self.make_token(TokenKind::RightBracket),
            b':' => self.make_token(TokenKind::Colon),
            b'.' => self.make_token(TokenKind::Dot),

            // String literals
            b'\'' => self.scan_string(Quote::Single),
            b'"' => self.scan_string(Quote::Double),
            b'`' => self.scan_string(Quote::Backtick),

            // Numbers
            b if b.is_ascii_digit() => self.scan_number(),

            // Identifiers and keywords
            b if b.is_ascii_alphabetic() || b == b'_' => self.scan_identifier(),

            _ => self.make_illegal(),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn kinds_and_literals(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .into_iter()
            .map(|t| (t.kind, t.literal))
            .collect()
    }

    fn pair(kind: TokenKind, literal: &str) -> (TokenKind, String) {
        (kind, String::from(literal))
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize("   \n\t \r ");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("id");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert!(token.is_eof());
            assert_eq!(token.literal, "");
        }
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(
            kinds_and_literals("SELECT id, name, date as dt, now() as dt2"),
            vec![
                pair(TokenKind::Keyword(Keyword::Select), "SELECT"),
                pair(TokenKind::Identifier, "id"),
                pair(TokenKind::Comma, ","),
                pair(TokenKind::Identifier, "name"),
                pair(TokenKind::Comma, ","),
                pair(TokenKind::Identifier, "date"),
                pair(TokenKind::Keyword(Keyword::As), "as"),
                pair(TokenKind::Identifier, "dt"),
                pair(TokenKind::Comma, ","),
                pair(TokenKind::Identifier, "now"),
                pair(TokenKind::LeftParen, "("),
                pair(TokenKind::RightParen, ")"),
                pair(TokenKind::Keyword(Keyword::As), "as"),
                pair(TokenKind::Identifier, "dt2"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_full_select_with_mixed_quotes() {
        let sql = "SELECT * \nfrom table1 \nwhere id=1 \n  AND (name LIKE '%ab\"c_' OR email LIKE \"xx'xx\")  \nGROUP BY id,name\nORDER BY name";
        assert_eq!(
            kinds_and_literals(sql),
            vec![
                pair(TokenKind::Keyword(Keyword::Select), "SELECT"),
                pair(TokenKind::Star, "*"),
                pair(TokenKind::Keyword(Keyword::From), "from"),
                pair(TokenKind::Identifier, "table1"),
                pair(TokenKind::Keyword(Keyword::Where), "where"),
                pair(TokenKind::Identifier, "id"),
                pair(TokenKind::Assign, "="),
                pair(TokenKind::Integer, "1"),
                pair(TokenKind::Keyword(Keyword::And), "AND"),
                pair(TokenKind::LeftParen, "("),
                pair(TokenKind::Identifier, "name"),
                pair(TokenKind::Keyword(Keyword::Like), "LIKE"),
                pair(TokenKind::String(Quote::Single), "%ab\"c_"),
                pair(TokenKind::Keyword(Keyword::Or), "OR"),
                pair(TokenKind::Identifier, "email"),
                pair(TokenKind::Keyword(Keyword::Like), "LIKE"),
                pair(TokenKind::String(Quote::Double), "xx'xx"),
                pair(TokenKind::RightParen, ")"),
                pair(TokenKind::Keyword(Keyword::Group), "GROUP"),
                pair(TokenKind::Keyword(Keyword::By), "BY"),
                pair(TokenKind::Identifier, "id"),
                pair(TokenKind::Comma, ","),
                pair(TokenKind::Identifier, "name"),
                pair(TokenKind::Keyword(Keyword::Order), "ORDER"),
                pair(TokenKind::Keyword(Keyword::By), "BY"),
                pair(TokenKind::Identifier, "name"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe JoIn"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Keyword(Keyword::Join),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds_and_literals("foo bar_baz _qux t1"),
            vec![
                pair(TokenKind::Identifier, "foo"),
                pair(TokenKind::Identifier, "bar_baz"),
                pair(TokenKind::Identifier, "_qux"),
                pair(TokenKind::Identifier, "t1"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_integers_have_no_sign_or_fraction() {
        assert_eq!(
            kinds_and_literals("-42 3.14"),
            vec![
                pair(TokenKind::Minus, "-"),
                pair(TokenKind::Integer, "42"),
                pair(TokenKind::Integer, "3"),
                pair(TokenKind::Dot, "."),
                pair(TokenKind::Integer, "14"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_strings_all_quote_styles() {
        assert_eq!(
            kinds_and_literals("'foobar' \"foo bar\" `date`"),
            vec![
                pair(TokenKind::String(Quote::Single), "foobar"),
                pair(TokenKind::String(Quote::Double), "foo bar"),
                pair(TokenKind::String(Quote::Backtick), "date"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_returns_rest() {
        let tokens = tokenize("name = 'abc");
        assert_eq!(tokens[2].kind, TokenKind::String(Quote::Single));
        assert_eq!(tokens[2].literal, "abc");
        assert!(tokens[3].is_eof());
    }

    #[test]
    fn test_string_keeps_non_ascii_body() {
        let tokens = tokenize("'héllo'");
        assert_eq!(tokens[0].literal, "héllo");
        assert_eq!(tokens[0].span, Span::new(0, 8));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("= == != <> < <= > >= + - * / \\ ! | &"),
            vec![
                TokenKind::Assign,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Backslash,
                TokenKind::Bang,
                TokenKind::BitOr,
                TokenKind::BitAnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bang_prefix_sequence() {
        assert_eq!(
            kinds_and_literals("!-/*5;"),
            vec![
                pair(TokenKind::Bang, "!"),
                pair(TokenKind::Minus, "-"),
                pair(TokenKind::Slash, "/"),
                pair(TokenKind::Star, "*"),
                pair(TokenKind::Integer, "5"),
                pair(TokenKind::Semicolon, ";"),
                pair(TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            token_kinds("( ) { } [ ] , ; . :"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_illegal_bytes_advance_one_at_a_time() {
        let tokens = tokenize("a # b");
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "#");
        assert_eq!(tokens[2].literal, "b");

        // A two-byte character produces two illegal tokens.
        let tokens = tokenize("é");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert!(tokens[2].is_eof());
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
        assert_eq!(tokens[2].span, Span::at(9));
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let kinds: Vec<TokenKind> = Lexer::new("a, b").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Comma, TokenKind::Identifier]
        );
    }
}
