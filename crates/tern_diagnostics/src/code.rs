//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Errors, prefixed with `E`.
    Error,
    /// Warnings, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `E101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Malformed token (unterminated string, stray character).
    pub const LEXICAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);
    /// Unexpected or missing token.
    pub const SYNTAX: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// Construct completed by parser recovery (e.g. a dangling selector).
    pub const INCOMPLETE: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// Import after the first non-import declaration.
    pub const MISPLACED_IMPORT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::SYNTAX), "E101");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Warning, 3)), "W003");
        assert_eq!(format!("{}", DiagnosticCode::MISPLACED_IMPORT), "W201");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::INCOMPLETE;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
