use crate::diagnostics::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Class,
    Else,
    False,
    Function,
    For,
    If,
    Import,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Keyword(Keyword),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    Bang,
    BangEqual,
    EqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Eof,
}

/// Literal payload of a `Number` or `String` token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenLiteral {
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<TokenLiteral>,
    pub line: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    line: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            current: 0,
            line: 1,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = if let Some((idx, ch)) = self.peeked.take() {
            Some((idx, ch))
        } else {
            self.chars.next()
        };
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
            }
            Some((idx, ch))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    // Look at the character after the peeked one without consuming anything.
    fn peek_second(&mut self) -> Option<char> {
        self.peek();
        self.chars.clone().next().map(|(_, ch)| ch)
    }

    fn match_next(&mut self, expected: char) -> bool {
        if let Some((idx, ch)) = self.peek() {
            if ch == expected {
                self.peeked = None;
                self.current = idx + ch.len_utf8();
                true
            } else {
                false
            }
        } else {
            false
        }
    }

    fn collect_while<F>(&mut self, mut predicate: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if predicate(ch) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let mut progressed = false;

            while let Some((_, ch)) = self.peek() {
                if ch.is_whitespace() {
                    self.bump();
                    progressed = true;
                } else {
                    break;
                }
            }

            if let Some((_, '/')) = self.peek() {
                if self.peek_second() == Some('/') {
                    self.bump();
                    self.bump();
                    while let Some((_, ch)) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    progressed = true;
                }
            }

            if !progressed {
                break;
            }
        }
    }

    fn identifier_or_keyword(&mut self, start: usize, line: usize) -> Token {
        self.collect_while(|ch| ch.is_alphanumeric() || ch == '_');
        let lexeme = self.source[start..self.current].to_string();
        let kind = keyword_for(&lexeme).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            lexeme,
            literal: None,
            line,
        }
    }

    fn number_literal(&mut self, start: usize, line: usize) -> Token {
        self.collect_while(|ch| ch.is_ascii_digit());
        // A trailing `.` is left unconsumed so it can act as member access.
        if matches!(self.peek(), Some((_, '.')))
            && self.peek_second().is_some_and(|ch| ch.is_ascii_digit())
        {
            self.bump();
            self.collect_while(|ch| ch.is_ascii_digit());
        }
        let lexeme = self.source[start..self.current].to_string();
        let value: f64 = lexeme.parse().unwrap_or(0.0);
        Token {
            kind: TokenKind::Number,
            lexeme,
            literal: Some(TokenLiteral::Number(value)),
            line,
        }
    }

    fn string_literal(&mut self, start: usize, line: usize) -> Result<Token, Diagnostic> {
        // No escape processing: the literal is the raw text between the
        // quotes, and embedded newlines are legal (and counted).
        while let Some((_, ch)) = self.bump() {
            if ch == '"' {
                let lexeme = self.source[start..self.current].to_string();
                let value = self.source[start + 1..self.current - 1].to_string();
                return Ok(Token {
                    kind: TokenKind::String,
                    lexeme,
                    literal: Some(TokenLiteral::Str(value)),
                    line,
                });
            }
        }
        Err(
            Diagnostic::new(DiagnosticKind::Lex, "unterminated string literal")
                .with_line(line),
        )
    }

    fn simple_token(&mut self, start: usize, line: usize, kind: TokenKind) -> Token {
        Token {
            kind,
            lexeme: self.source[start..self.current].to_string(),
            literal: None,
            line,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let line = self.line;
            let (start, ch) = match self.bump() {
                Some(pair) => pair,
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        lexeme: String::new(),
                        literal: None,
                        line,
                    });
                    break;
                }
            };

            let token = match ch {
                'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(start, line),
                '0'..='9' => self.number_literal(start, line),
                '"' => self.string_literal(start, line)?,
                '(' => self.simple_token(start, line, TokenKind::LParen),
                ')' => self.simple_token(start, line, TokenKind::RParen),
                '{' => self.simple_token(start, line, TokenKind::LBrace),
                '}' => self.simple_token(start, line, TokenKind::RBrace),
                ',' => self.simple_token(start, line, TokenKind::Comma),
                '.' => self.simple_token(start, line, TokenKind::Dot),
                ';' => self.simple_token(start, line, TokenKind::Semicolon),
                '+' => self.simple_token(start, line, TokenKind::Plus),
                '-' => self.simple_token(start, line, TokenKind::Minus),
                '*' => self.simple_token(start, line, TokenKind::Star),
                '/' => self.simple_token(start, line, TokenKind::Slash),
                '=' => {
                    if self.match_next('=') {
                        self.simple_token(start, line, TokenKind::EqualEqual)
                    } else {
                        self.simple_token(start, line, TokenKind::Assign)
                    }
                }
                '!' => {
                    if self.match_next('=') {
                        self.simple_token(start, line, TokenKind::BangEqual)
                    } else {
                        self.simple_token(start, line, TokenKind::Bang)
                    }
                }
                '<' => {
                    if self.match_next('=') {
                        self.simple_token(start, line, TokenKind::LessEqual)
                    } else {
                        self.simple_token(start, line, TokenKind::Less)
                    }
                }
                '>' => {
                    if self.match_next('=') {
                        self.simple_token(start, line, TokenKind::GreaterEqual)
                    } else {
                        self.simple_token(start, line, TokenKind::Greater)
                    }
                }
                other => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Lex,
                        format!("unexpected character `{other}`"),
                    )
                    .with_line(line));
                }
            };
            tokens.push(token);
        }
        Ok(tokens)
    }
}

fn keyword_for(ident: &str) -> Option<TokenKind> {
    use self::Keyword as Kw;
    let keyword = match ident {
        "and" => Kw::And,
        "class" => Kw::Class,
        "else" => Kw::Else,
        "false" => Kw::False,
        "function" => Kw::Function,
        "for" => Kw::For,
        "if" => Kw::If,
        "import" => Kw::Import,
        "nil" => Kw::Nil,
        "or" => Kw::Or,
        "print" => Kw::Print,
        "return" => Kw::Return,
        "super" => Kw::Super,
        "this" => Kw::This,
        "true" => Kw::True,
        "var" => Kw::Var,
        "while" => Kw::While,
        _ => return None,
    };
    Some(TokenKind::Keyword(keyword))
}
