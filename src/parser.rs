use crate::{
    ast::{BinaryOp, CompareOp, Expr, ExprKind, Literal, Stmt, StmtKind, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticKind},
    lexer::{Keyword, Lexer, Token, TokenKind, TokenLiteral},
};

/// Scans and parses `source` into a statement list. Parsing stops at the
/// first error; no partial program is ever returned.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, Diagnostic> {
    let tokens = Lexer::new(source).tokenize()?;
    parse_tokens(tokens)
}

pub fn parse_tokens(tokens: Vec<Token>) -> Result<Vec<Stmt>, Diagnostic> {
    Parser::new(tokens).parse()
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn parse(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        if let Some(token) = self.peek() {
            match &token.kind {
                TokenKind::Keyword(Keyword::Function) => return self.parse_function(),
                TokenKind::Keyword(Keyword::If) => return self.parse_if(),
                TokenKind::Keyword(Keyword::Import) => return self.parse_import(),
                TokenKind::LBrace => {
                    let line = token.line;
                    let body = self.parse_block()?;
                    return Ok(Stmt {
                        kind: StmtKind::Block(body),
                        line,
                    });
                }
                _ => {}
            }
        }
        self.parse_expression_statement()
    }

    fn parse_function(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::Function)?;
        let name_token = self.consume_identifier("expected function name")?;
        self.consume(TokenKind::LParen, "expected `(` after function name")?;
        let mut params: Vec<String> = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.consume_identifier("expected parameter name")?;
                if params.contains(&param.lexeme) {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Syntax,
                        format!("duplicate parameter `{}`", param.lexeme),
                    )
                    .with_line(param.line));
                }
                params.push(param.lexeme.clone());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "expected `)` after parameters")?;
        let body = self.parse_block()?;
        Ok(Stmt {
            kind: StmtKind::Function {
                name: name_token.lexeme.clone(),
                params,
                body,
            },
            line: start.line,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::If)?;
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.matches_keyword(Keyword::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt {
            kind: StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            line: start.line,
        })
    }

    fn parse_import(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.consume_keyword(Keyword::Import)?;
        let name_token = self.consume(TokenKind::String, "expected module name string")?;
        let module = match name_token.literal {
            Some(TokenLiteral::Str(name)) => name,
            _ => name_token.lexeme.clone(),
        };
        self.consume_optional_semicolon();
        Ok(Stmt {
            kind: StmtKind::Import { module },
            line: start.line,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        self.consume(TokenKind::LBrace, "expected `{` to start block")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.consume(TokenKind::RBrace, "expected `}` after block")?;
        Ok(statements)
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let expr = self.parse_expression()?;
        if self.matches(TokenKind::Assign) {
            let equals_line = self.previous().line;
            let value = self.parse_expression()?;
            self.consume(TokenKind::Semicolon, "expected `;` after assignment")?;
            return match expr.kind {
                ExprKind::Variable(name) => Ok(Stmt {
                    kind: StmtKind::Assign { name, value },
                    line: expr.line,
                }),
                _ => Err(Diagnostic::new(
                    DiagnosticKind::InvalidAssignmentTarget,
                    "assignment target must be a variable",
                )
                .with_line(equals_line)),
            };
        }
        self.consume(TokenKind::Semicolon, "expected `;` after expression")?;
        Ok(Stmt {
            line: expr.line,
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_comparison()?;
        while let Some(op) = if self.matches(TokenKind::EqualEqual) {
            Some(CompareOp::Equal)
        } else if self.matches(TokenKind::BangEqual) {
            Some(CompareOp::NotEqual)
        } else {
            None
        } {
            let right = self.parse_comparison()?;
            expr = Expr {
                line: expr.line,
                kind: ExprKind::Compare {
                    op,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            };
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_term()?;
        while let Some(op) = if self.matches(TokenKind::LessEqual) {
            Some(CompareOp::LessEqual)
        } else if self.matches(TokenKind::GreaterEqual) {
            Some(CompareOp::GreaterEqual)
        } else if self.matches(TokenKind::Less) {
            Some(CompareOp::Less)
        } else if self.matches(TokenKind::Greater) {
            Some(CompareOp::Greater)
        } else {
            None
        } {
            let right = self.parse_term()?;
            expr = Expr {
                line: expr.line,
                kind: ExprKind::Compare {
                    op,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            };
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_factor()?;
        while let Some(op) = if self.matches(TokenKind::Plus) {
            Some(BinaryOp::Add)
        } else if self.matches(TokenKind::Minus) {
            Some(BinaryOp::Sub)
        } else {
            None
        } {
            let right = self.parse_factor()?;
            expr = Expr {
                line: expr.line,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            };
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_unary()?;
        while let Some(op) = if self.matches(TokenKind::Star) {
            Some(BinaryOp::Mul)
        } else if self.matches(TokenKind::Slash) {
            Some(BinaryOp::Div)
        } else {
            None
        } {
            let right = self.parse_unary()?;
            expr = Expr {
                line: expr.line,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = if self.matches(TokenKind::Minus) {
            Some(UnaryOp::Negate)
        } else if self.matches(TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else {
            None
        };
        if let Some(op) = op {
            let line = self.previous().line;
            let right = self.parse_unary()?;
            return Ok(Expr {
                line,
                kind: ExprKind::Unary {
                    op,
                    expr: Box::new(right),
                },
            });
        }
        self.parse_call()
    }

    fn parse_call(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.matches(TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RParen, "expected `)` after arguments")?;
                expr = Expr {
                    line: expr.line,
                    kind: ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                };
            } else if self.matches(TokenKind::Dot) {
                let field = self.consume_identifier("expected field name after `.`")?;
                expr = Expr {
                    line: expr.line,
                    kind: ExprKind::Field {
                        target: Box::new(expr),
                        field: field.lexeme.clone(),
                    },
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        if let Some(token) = self.peek() {
            let line = token.line;
            match &token.kind {
                TokenKind::Keyword(Keyword::True) => {
                    self.advance();
                    Ok(Expr {
                        line,
                        kind: ExprKind::Literal(Literal::Bool(true)),
                    })
                }
                TokenKind::Keyword(Keyword::False) => {
                    self.advance();
                    Ok(Expr {
                        line,
                        kind: ExprKind::Literal(Literal::Bool(false)),
                    })
                }
                TokenKind::Keyword(Keyword::Nil) => {
                    self.advance();
                    Ok(Expr {
                        line,
                        kind: ExprKind::Literal(Literal::Nil),
                    })
                }
                // `print` is reserved but names the output primitive, so it
                // reads as a variable and resolves against the globals.
                TokenKind::Keyword(Keyword::Print) => {
                    self.advance();
                    Ok(Expr {
                        line,
                        kind: ExprKind::Variable("print".into()),
                    })
                }
                TokenKind::Number => {
                    let tok = self.advance();
                    let value = match tok.literal {
                        Some(TokenLiteral::Number(n)) => n,
                        _ => 0.0,
                    };
                    Ok(Expr {
                        line,
                        kind: ExprKind::Literal(Literal::Number(value)),
                    })
                }
                TokenKind::String => {
                    let tok = self.advance();
                    let value = match tok.literal {
                        Some(TokenLiteral::Str(s)) => s,
                        _ => tok.lexeme.clone(),
                    };
                    Ok(Expr {
                        line,
                        kind: ExprKind::Literal(Literal::String(value)),
                    })
                }
                TokenKind::Identifier => {
                    let tok = self.advance();
                    Ok(Expr {
                        line,
                        kind: ExprKind::Variable(tok.lexeme.clone()),
                    })
                }
                TokenKind::LParen => {
                    self.advance();
                    let inner = self.parse_expression()?;
                    self.consume(TokenKind::RParen, "expected `)` after expression")?;
                    Ok(Expr {
                        line,
                        kind: ExprKind::Group(Box::new(inner)),
                    })
                }
                _ => Err(self.error(token, "unexpected token in expression")),
            }
        } else {
            Err(self.error_eof("unexpected end of expression"))
        }
    }

    fn consume_optional_semicolon(&mut self) {
        let _ = self.matches(TokenKind::Semicolon);
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches_keyword(&mut self, keyword: Keyword) -> bool {
        if let Some(Token {
            kind: TokenKind::Keyword(k),
            ..
        }) = self.peek()
        {
            if *k == keyword {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self
                .peek()
                .map(|tok| self.error(tok, message))
                .unwrap_or_else(|| self.error_eof(message)))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token, Diagnostic> {
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Keyword(keyword) {
                Ok(self.advance())
            } else {
                Err(self.error(token, &format!("expected keyword `{keyword:?}`")))
            }
        } else {
            Err(self.error_eof("unexpected end of input"))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<Token, Diagnostic> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self
                .peek()
                .map(|tok| self.error(tok, message))
                .unwrap_or_else(|| self.error_eof(message)))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        if let Some(token) = self.peek() {
            token.kind == kind
        } else {
            false
        }
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Eof) | None)
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Syntax, message.to_string()).with_line(token.line)
    }

    fn error_eof(&self, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Syntax, message.to_string())
    }
}
