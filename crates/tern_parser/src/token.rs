//! Token types for the Tern lexer.

use serde::{Deserialize, Serialize};
use tern_source::Span;

/// A Tern token kind.
///
/// Literal values are not stored in the token; they are read back from the
/// source bytes through the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TernToken {
    // === Keywords ===
    /// `break`
    Break,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `else`
    Else,
    /// `for`
    For,
    /// `func`
    Func,
    /// `if`
    If,
    /// `import`
    Import,
    /// `package`
    Package,
    /// `return`
    Return,
    /// `struct`
    Struct,
    /// `type`
    Type,
    /// `var`
    Var,

    // === Identifiers and literals ===
    /// An identifier.
    Identifier,
    /// Integer literal (`42`, `0x2a`).
    IntLiteral,
    /// Floating-point literal (`1.5`, `2e10`).
    FloatLiteral,
    /// Interpreted (`"..."`) or raw (`` `...` ``) string literal.
    StringLiteral,
    /// Character literal (`'a'`).
    CharLiteral,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `;`, written or inserted at a line break.
    Semicolon,
    /// `.`
    Dot,
    /// `:`
    Colon,

    // === Operators ===
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,
    /// `++`
    Inc,
    /// `--`
    Dec,

    // === Special ===
    /// A malformed token; a diagnostic has been emitted.
    Error,
    /// End of input.
    Eof,
}

impl TernToken {
    /// Returns `true` if a line break after this token terminates the
    /// statement, i.e. the lexer inserts a semicolon.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TernToken::Identifier
                | TernToken::IntLiteral
                | TernToken::FloatLiteral
                | TernToken::StringLiteral
                | TernToken::CharLiteral
                | TernToken::Break
                | TernToken::Continue
                | TernToken::Return
                | TernToken::RightParen
                | TernToken::RightBracket
                | TernToken::RightBrace
                | TernToken::Inc
                | TernToken::Dec
        )
    }

    /// Returns `true` for keywords that start a top-level declaration.
    pub fn starts_decl(self) -> bool {
        matches!(
            self,
            TernToken::Const | TernToken::Var | TernToken::Type | TernToken::Func | TernToken::Import
        )
    }

    /// Human-readable description used in "expected X, found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            TernToken::Break => "'break'",
            TernToken::Const => "'const'",
            TernToken::Continue => "'continue'",
            TernToken::Else => "'else'",
            TernToken::For => "'for'",
            TernToken::Func => "'func'",
            TernToken::If => "'if'",
            TernToken::Import => "'import'",
            TernToken::Package => "'package'",
            TernToken::Return => "'return'",
            TernToken::Struct => "'struct'",
            TernToken::Type => "'type'",
            TernToken::Var => "'var'",
            TernToken::Identifier => "identifier",
            TernToken::IntLiteral => "integer literal",
            TernToken::FloatLiteral => "float literal",
            TernToken::StringLiteral => "string literal",
            TernToken::CharLiteral => "character literal",
            TernToken::LeftParen => "'('",
            TernToken::RightParen => "')'",
            TernToken::LeftBrace => "'{'",
            TernToken::RightBrace => "'}'",
            TernToken::LeftBracket => "'['",
            TernToken::RightBracket => "']'",
            TernToken::Comma => "','",
            TernToken::Semicolon => "';' or newline",
            TernToken::Dot => "'.'",
            TernToken::Colon => "':'",
            TernToken::Plus => "'+'",
            TernToken::Minus => "'-'",
            TernToken::Star => "'*'",
            TernToken::Slash => "'/'",
            TernToken::Percent => "'%'",
            TernToken::Amp => "'&'",
            TernToken::Pipe => "'|'",
            TernToken::Caret => "'^'",
            TernToken::Shl => "'<<'",
            TernToken::Shr => "'>>'",
            TernToken::AmpAmp => "'&&'",
            TernToken::PipePipe => "'||'",
            TernToken::Bang => "'!'",
            TernToken::EqEq => "'=='",
            TernToken::BangEq => "'!='",
            TernToken::Lt => "'<'",
            TernToken::LtEq => "'<='",
            TernToken::Gt => "'>'",
            TernToken::GtEq => "'>='",
            TernToken::Assign => "'='",
            TernToken::Define => "':='",
            TernToken::PlusAssign => "'+='",
            TernToken::MinusAssign => "'-='",
            TernToken::StarAssign => "'*='",
            TernToken::SlashAssign => "'/='",
            TernToken::Inc => "'++'",
            TernToken::Dec => "'--'",
            TernToken::Error => "invalid token",
            TernToken::Eof => "end of file",
        }
    }
}

/// A token paired with its span in the position space.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: TernToken,
    /// Where the token sits in the position space.
    pub span: Span,
}

/// Looks up a keyword by its exact text.
pub fn lookup_keyword(text: &str) -> Option<TernToken> {
    let kw = match text {
        "break" => TernToken::Break,
        "const" => TernToken::Const,
        "continue" => TernToken::Continue,
        "else" => TernToken::Else,
        "for" => TernToken::For,
        "func" => TernToken::Func,
        "if" => TernToken::If,
        "import" => TernToken::Import,
        "package" => TernToken::Package,
        "return" => TernToken::Return,
        "struct" => TernToken::Struct,
        "type" => TernToken::Type,
        "var" => TernToken::Var,
        _ => return None,
    };
    Some(kw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(lookup_keyword("func"), Some(TernToken::Func));
        assert_eq!(lookup_keyword("Func"), None);
        assert_eq!(lookup_keyword("x"), None);
    }

    #[test]
    fn statement_enders() {
        assert!(TernToken::Identifier.ends_statement());
        assert!(TernToken::RightBrace.ends_statement());
        assert!(TernToken::Return.ends_statement());
        assert!(!TernToken::Dot.ends_statement());
        assert!(!TernToken::Plus.ends_statement());
        assert!(!TernToken::LeftBrace.ends_statement());
    }

    #[test]
    fn describe_quotes_punctuation() {
        assert_eq!(TernToken::RightBrace.describe(), "'}'");
        assert_eq!(TernToken::Eof.describe(), "end of file");
    }
}
