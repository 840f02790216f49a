use lantana::diagnostics::DiagnosticKind;
use lantana::lexer::{Keyword, Lexer, Token, TokenKind, TokenLiteral};

fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .tokenize()
        .expect("scanning should succeed")
}

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn number_literal_round_trip() {
    let tokens = tokenize("123.5");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "123.5");
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Number(123.5)));
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn string_literal_round_trip() {
    let tokens = tokenize("\"hi\"");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Str("hi".into())));
}

#[test]
fn string_has_no_escape_processing() {
    let tokens = tokenize(r#""a\nb""#);
    assert_eq!(
        tokens[0].literal,
        Some(TokenLiteral::Str("a\\nb".into())),
        "backslashes pass through verbatim"
    );
}

#[test]
fn every_scan_ends_with_exactly_one_eof() {
    for source in ["", "   ", "// only a comment", "1 + 2;"] {
        let tokens = tokenize(source);
        let eof_count = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .count();
        assert_eq!(eof_count, 1, "source {source:?}");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn line_tags_follow_newlines() {
    let tokens = tokenize("a\n\nb c");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 3);
    assert_eq!(tokens[2].line, 3);
}

#[test]
fn two_char_operators_win_over_prefixes() {
    assert_eq!(
        kinds("<= >= == != < > = !"),
        vec![
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dot_without_following_digit_is_member_access() {
    let tokens = tokenize("1.abs");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "1");
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn line_comment_runs_to_end_of_line() {
    let tokens = tokenize("// comment\nx / y");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].kind, TokenKind::Slash);
}

#[test]
fn keywords_are_reserved() {
    assert_eq!(
        kinds("function if else import nil print while"),
        vec![
            TokenKind::Keyword(Keyword::Function),
            TokenKind::Keyword(Keyword::If),
            TokenKind::Keyword(Keyword::Else),
            TokenKind::Keyword(Keyword::Import),
            TokenKind::Keyword(Keyword::Nil),
            TokenKind::Keyword(Keyword::Print),
            TokenKind::Keyword(Keyword::While),
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("whileish _if"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn string_with_embedded_newlines_counts_lines() {
    let tokens = tokenize("\"one\ntwo\" x");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Str("one\ntwo".into())));
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn unterminated_string_reports_starting_line() {
    let err = Lexer::new("x = 5;\n\"oops")
        .tokenize()
        .expect_err("unterminated string should fail");
    assert_eq!(err.kind, DiagnosticKind::Lex);
    assert_eq!(err.line, Some(2));
}

#[test]
fn unknown_character_is_a_lex_error() {
    let err = Lexer::new("1 @ 2")
        .tokenize()
        .expect_err("unknown character should fail");
    assert_eq!(err.kind, DiagnosticKind::Lex);
    assert!(err.message.contains('@'), "{}", err.message);
    assert_eq!(err.line, Some(1));
}

#[test]
fn scanning_is_idempotent() {
    let source = "function f(a) { a + 1.5; }\nf(2);";
    let first = tokenize(source);
    let second = tokenize(source);
    assert_eq!(first, second);
}
