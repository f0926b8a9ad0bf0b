use crate::token::{Pos, Spanned, Token, TokenKind, KEYWORDS, OPERATORS};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 1_024;

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes the provided string, producing the tokens into the provided buffer.
///
/// On success, the buffer ends with exactly one [`TokenKind::Eof`] token.
pub fn lex<'src>(src: &'src str, tokens: &mut Vec<Token<'src>>) -> Result<()> {
    Lexer::new(src, tokens).lex()?;
    tracing::debug!(tokens = tokens.len(), "lexed source");
    Ok(())
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unclosed string literal")]
    UnclosedString,
}

/// The Malang lexer
struct Lexer<'src, 'tok> {
    src: &'src str,
    /// Byte offset of the next character.
    cursor: usize,
    /// Byte offset where the current token starts.
    current_lo: usize,
    /// Position of the next character.
    pos: Pos,
    /// Position where the current token starts.
    current_pos: Pos,
    tokens: &'tok mut Vec<Token<'src>>,
}

impl<'src> Lexer<'src, '_> {
    /// Scans the source string until the input is exhausted.
    ///
    /// Tokens are written into the provided tokens buffer.
    fn lex(mut self) -> Result<()> {
        assert_eq!(self.tokens.len(), 0, "must pass clean tokens buffer");
        loop {
            self.skip_trivia();
            let token = self.scan_token()?;
            self.tokens.push(token);
            if token.is_eof() {
                break Ok(());
            }
        }
    }

    /// Skips whitespace, line breaks and `//` line comments.
    ///
    /// Comments are only recognized here, between tokens, so a `//` inside a
    /// string literal is never mistaken for one.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.rest().starts_with("//") => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Tries to scan the token that starts at the current character.
    fn scan_token(&mut self) -> Result<Token<'src>> {
        use TokenKind::*;
        self.mark();
        if self.is_at_end() {
            return Ok(self.produce(Eof));
        }
        let kind = match self.peek() {
            '"' => return self.string(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),
            c if c.is_ascii_digit() => self.number(),
            '(' => self.advance_with(LParen),
            ')' => self.advance_with(RParen),
            '{' => self.advance_with(LBrace),
            '}' => self.advance_with(RBrace),
            ',' => self.advance_with(Comma),
            c => self.operator().ok_or(self.current_pos.wrap(Error::UnexpectedChar(c)))?,
        };
        Ok(self.produce(kind))
    }

    /// Lexes a string literal. The closing quote is the first one not preceded
    /// by a backslash. Escape sequences are kept verbatim in the token text.
    fn string(&mut self) -> Result<Token<'src>> {
        assert_eq!(self.advance(), '"');
        loop {
            if self.is_at_end() {
                return Err(self.current_pos.wrap(Error::UnclosedString));
            }
            match self.advance() {
                '"' => break,
                '\\' if !self.is_at_end() => {
                    self.advance();
                }
                _ => (),
            }
        }
        let body = &self.src[self.current_lo + 1..self.cursor - 1];
        Ok(Token::new(TokenKind::String, body, self.current_pos))
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        let valid_identifier_suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';
        while valid_identifier_suffix(self.peek()) {
            self.advance();
        }
        KEYWORDS
            .get(self.substr())
            .copied()
            .unwrap_or(TokenKind::Identifier)
    }

    fn number(&mut self) -> TokenKind {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        TokenKind::Int
    }

    /// Greedily matches the longest operator at the current position.
    fn operator(&mut self) -> Option<TokenKind> {
        let &(op, kind) = OPERATORS
            .iter()
            .find(|(op, _)| self.rest().starts_with(op))?;
        for _ in op.chars() {
            self.advance();
        }
        Some(kind)
    }
}

impl<'src> Lexer<'src, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'tok>(src: &'src str, tokens: &'tok mut Vec<Token<'src>>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            cursor: 0,
            current_lo: 0,
            pos: Pos::START,
            current_pos: Pos::START,
            tokens,
        }
    }

    /// Starts a new token "mark".
    fn mark(&mut self) {
        self.current_lo = self.cursor;
        self.current_pos = self.pos;
    }

    /// Returns the next character and advances, keeping track of the line
    /// and column. Returns `'\0'` at the end of the input.
    fn advance(&mut self) -> char {
        let Some(c) = self.rest().chars().next() else {
            return '\0';
        };
        self.cursor += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        c
    }

    /// Advances and returns the provided value.
    fn advance_with<T>(&mut self, value: T) -> T {
        self.advance();
        value
    }

    /// Returns the next character without advancing.
    fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// Returns the unscanned part of the source.
    fn rest(&self) -> &'src str {
        &self.src[self.cursor..]
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &'src str {
        &self.src[self.current_lo..self.cursor]
    }

    /// Produces a token using the marked bounds.
    fn produce(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, self.substr(), self.current_pos)
    }
}
