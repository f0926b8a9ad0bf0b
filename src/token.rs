use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The source text of the token. For string literals, this is the body
    /// without the surrounding quotes.
    pub text: &'src str,
    pub pos: Pos,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, pos: Pos) -> Token<'src> {
        Token { kind, text, pos }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {:?}, {})", self.kind, self.text, self.pos)
    }
}

/// A 1-based source position.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub const START: Pos = Pos { line: 1, column: 1 };

    pub const fn new(line: u32, column: u32) -> Pos {
        Pos { line, column }
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { pos: self, inner }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({self})")
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Some value tagged with the position it originates from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub pos: Pos,
    pub inner: T,
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.inner)
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for Spanned<T> {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `parayu`
    Print,
    /// `kelk`
    Read,
    /// `ith_sheriyano`
    If,
    /// `enkil`
    Then,
    /// `alle`
    Else,
    /// `ellam_sheriyano`
    While,
    /// `oron_ayi`
    For,
    /// `edukk`
    In,
    /// `..`
    Range,

    Identifier,
    String,
    Int,

    /// `=`
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            Print => "`parayu`",
            Read => "`kelk`",
            If => "`ith_sheriyano`",
            Then => "`enkil`",
            Else => "`alle`",
            While => "`ellam_sheriyano`",
            For => "`oron_ayi`",
            In => "`edukk`",
            Range => "`..`",
            Identifier => "identifier",
            String => "string literal",
            Int => "integer literal",
            Assign => "`=`",
            Plus => "`+`",
            Minus => "`-`",
            Star => "`*`",
            Slash => "`/`",
            EqEq => "`==`",
            NotEq => "`!=`",
            Less => "`<`",
            LessEq => "`<=`",
            Greater => "`>`",
            GreaterEq => "`>=`",
            LParen => "`(`",
            RParen => "`)`",
            LBrace => "`{`",
            RBrace => "`}`",
            Comma => "`,`",
            Eof => "end of input",
        };
        f.write_str(s)
    }
}

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "parayu" => TokenKind::Print,
    "kelk" => TokenKind::Read,
    "ith_sheriyano" => TokenKind::If,
    "enkil" => TokenKind::Then,
    "alle" => TokenKind::Else,
    "ellam_sheriyano" => TokenKind::While,
    "oron_ayi" => TokenKind::For,
    "edukk" => TokenKind::In,
};

/// Operators, longest first, so that a greedy prefix match never splits a
/// two-character operator.
pub const OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::LessEq),
    (">=", TokenKind::GreaterEq),
    ("..", TokenKind::Range),
    ("=", TokenKind::Assign),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
];
