//! Raw tokens recognized by logos, before interning.

use logos::Logos;

/// Raw token from logos.
///
/// Whitespace is skipped here; the lexer recovers layout flags from the
/// gap between consecutive token spans.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    /// `--` to end of line. Only a comment at line start or after
    /// whitespace; the lexer re-splits it into minus signs otherwise.
    #[regex(r"--[^\n]*")]
    Comment,

    #[token("let")]
    Let,
    #[token("be")]
    Be,
    #[token("set")]
    Set,
    #[token("to")]
    To,
    #[token("show")]
    Show,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("end")]
    End,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("define")]
    Define,
    #[token("pipeline")]
    Pipeline,
    #[token("return")]
    Return,
    #[token("guard")]
    Guard,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("is")]
    Is,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("try")]
    Try,
    #[token("rescue")]
    Rescue,
    #[token("ensure")]
    Ensure,
    #[token("fn")]
    Fn,
    #[token("match")]
    Match,
    #[token("with")]
    With,
    #[token("when")]
    When,
    #[token("begin")]
    Begin,

    #[token("listen")]
    Listen,
    #[token("trigger")]
    Trigger,
    #[token("link")]
    Link,
    #[token("process")]
    Process,
    #[token("access")]
    Access,
    #[token("sync")]
    Sync,
    #[token("evolve")]
    Evolve,
    #[token("emit")]
    Emit,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("...")]
    DotDotDot,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("|>")]
    PipeArrow,
    #[token("|")]
    Bar,
    #[token("??")]
    DoubleQuestion,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    /// A string missing its closing quote before the end of the line.
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r#"f"([^"\\\n]|\\.)*""#)]
    FString,

    #[regex(r#"f"([^"\\\n]|\\.)*"#)]
    UnterminatedFString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
