use crate::{
    ast::{BinaryOperator, Expr, ExprKind, Ident, Program, Stmt, StmtKind},
    token::{Pos, Spanned, Token, TokenKind},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Parses a whole program. The token sequence must be terminated by a
/// [`TokenKind::Eof`] token, as produced by the lexer.
pub fn parse_program(tokens: &[Token<'_>]) -> Result<Program> {
    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

/// Parses a single expression spanning the whole token sequence.
pub fn parse_expr(tokens: &[Token<'_>]) -> Result<Expr> {
    let mut p = Parser::new(tokens);
    let expr = p.parse_expr()?;
    p.consume(TokenKind::Eof)?;
    Ok(expr)
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected {expected}, but got {actual}")]
    Unexpected {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("unexpected {0} at start of statement")]
    NoStatement(TokenKind),
    #[error("unexpected {0} in expression")]
    UnexpectedInExpr(TokenKind),
    #[error("invalid integer literal '{0}'")]
    ParseInt(Box<str>),
}

struct Parser<'src, 'tok> {
    tokens: &'tok [Token<'src>],
    cursor: usize,
    /// Returned once the cursor runs past the end of `tokens`.
    eof: Token<'src>,
}

impl Parser<'_, '_> {
    fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::with_capacity(16);
        while !self.is(TokenKind::Eof) {
            statements.push(self.parse_stmt()?);
        }
        Ok(Program { statements })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Print => self.parse_print()?,
            TokenKind::Read => self.parse_read()?,
            TokenKind::Identifier if self.peek_nth(1).kind == TokenKind::Assign => {
                self.parse_assign()?
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Identifier | TokenKind::Int | TokenKind::String | TokenKind::LParen => {
                StmtKind::Expr(self.parse_expr()?)
            }
            other => return Err(token.pos.wrap(Error::NoStatement(other))),
        };
        Ok(Stmt {
            kind,
            pos: token.pos,
        })
    }

    // parayu '(' expr ')'
    fn parse_print(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::Print)?;
        self.consume(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.consume(TokenKind::RParen)?;
        Ok(StmtKind::Print(expr))
    }

    // kelk '(' ID ')'
    fn parse_read(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::Read)?;
        self.consume(TokenKind::LParen)?;
        let target = self.parse_ident()?;
        self.consume(TokenKind::RParen)?;
        Ok(StmtKind::Read(target))
    }

    // ID '=' expr
    fn parse_assign(&mut self) -> Result<StmtKind> {
        let target = self.parse_ident()?;
        self.consume(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(StmtKind::Assign { target, value })
    }

    // ith_sheriyano '(' expr ')' enkil block [alle block]
    fn parse_if(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::If)?;
        let condition = self.parse_condition()?;
        self.consume(TokenKind::Then)?;
        let then_block = self.parse_block()?;
        let else_block = if self.take(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(StmtKind::If {
            condition,
            then_block,
            else_block,
        })
    }

    // ellam_sheriyano '(' expr ')' enkil block
    fn parse_while(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::While)?;
        let condition = self.parse_condition()?;
        self.consume(TokenKind::Then)?;
        let body = self.parse_block()?;
        Ok(StmtKind::While { condition, body })
    }

    // oron_ayi ID edukk '(' expr '..' expr ')' block
    fn parse_for(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::For)?;
        let binder = self.parse_ident()?;
        self.consume(TokenKind::In)?;
        self.consume(TokenKind::LParen)?;
        let start = self.parse_expr()?;
        self.consume(TokenKind::Range)?;
        let end = self.parse_expr()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(StmtKind::For {
            binder,
            start,
            end,
            body,
        })
    }

    fn parse_condition(&mut self) -> Result<Expr> {
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RParen)?;
        Ok(condition)
    }

    /// Parses `'{' stmt* '}'`. Statements are parsed until the closing brace
    /// or the end of the input, which then fails on the missing brace.
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.consume(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.is(TokenKind::Eof) {
            body.push(self.parse_stmt()?);
        }
        self.consume(TokenKind::RBrace)?;
        Ok(body)
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(Ident {
            name: token.text.into(),
            pos: token.pos,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_prec(1)
    }

    /// Precedence climbing. Operators binding at least as tightly as
    /// `min_prec` are folded into the left-hand side in a loop; the right-hand
    /// side only takes operators binding strictly tighter, which makes every
    /// tier left-associative.
    fn parse_expr_prec(&mut self, min_prec: u8) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;

        loop {
            let op_token = self.peek();
            let Some(op) = BinaryOperator::from_token(op_token.kind) else {
                // Not an infix operator
                break;
            };
            if op.precedence() < min_prec {
                // Operator binds less tightly than the minimum required
                break;
            }
            self.advance(); // Operator

            let rhs = self.parse_expr_prec(op.precedence() + 1)?;
            let pos = lhs.pos;
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                pos,
            };
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Identifier => ExprKind::Id(token.text.into()),
            TokenKind::Int => {
                let Ok(parsed) = token.text.parse() else {
                    return Err(token.pos.wrap(Error::ParseInt(token.text.into())));
                };
                ExprKind::Int(parsed)
            }
            TokenKind::String => ExprKind::String(token.text.into()),

            // Grouping: ( expr )
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                return Ok(expr);
            }

            other => return Err(token.pos.wrap(Error::UnexpectedInExpr(other))),
        };
        Ok(Expr {
            kind,
            pos: token.pos,
        })
    }
}

impl<'src, 'tok> Parser<'src, 'tok> {
    fn new(tokens: &'tok [Token<'src>]) -> Parser<'src, 'tok> {
        let eof = match tokens.last() {
            Some(last) if last.is_eof() => *last,
            Some(last) => Token::new(TokenKind::Eof, "", last.pos),
            None => Token::new(TokenKind::Eof, "", Pos::START),
        };
        Parser {
            tokens,
            cursor: 0,
            eof,
        }
    }

    /// Returns the current token.
    fn peek(&self) -> Token<'src> {
        self.peek_nth(0)
    }

    /// Returns the token `n` positions ahead of the current one.
    fn peek_nth(&self, n: usize) -> Token<'src> {
        self.tokens
            .get(self.cursor + n)
            .copied()
            .unwrap_or(self.eof)
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Token<'src> {
        let c = self.peek();
        if !c.is_eof() {
            self.cursor += 1;
        }
        c
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    /// Advances if the current token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> bool {
        if self.is(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances if the current token matches the provided one, returning it.
    /// If not, fails with the unexpected token.
    fn consume(&mut self, expect: TokenKind) -> Result<Token<'src>> {
        let c = self.peek();
        if c.kind == expect {
            Ok(self.advance())
        } else {
            Err(c.pos.wrap(Error::Unexpected {
                actual: c.kind,
                expected: expect,
            }))
        }
    }
}
