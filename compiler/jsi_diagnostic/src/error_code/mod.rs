//! Error codes for the interop preparation pass.
//!
//! Each code is a unique identifier (e.g. `E7001`); the first digit names
//! the group it belongs to.

use std::fmt;

/// Error codes for all diagnostics of the pass.
///
/// Format: E#### / W####:
/// - E70xx: Interop declaration structure
/// - E701x: Reflective type tokens
/// - E702x: Exports
/// - W70xx: Interop warnings
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Declaration structure (E70xx)
    /// Parent does not extend js.Any
    E7001,
    /// Anonymous class extends js.Any
    E7002,
    /// Case class or object extends js.Any
    E7003,
    /// js.Any declaration nested in a class or trait
    E7004,
    /// Declaration other than the global scope object extends js.GlobalScope
    E7006,
    /// Inner declaration in a js.Any body
    E7007,

    // Reflective type tokens (E701x)
    /// classOf argument is not a class type
    E7010,
    /// classOf reached the pass unresolved
    E7011,

    // Exports (E702x)
    /// Local definition exported
    E7020,
    /// Private method, class or object exported
    E7021,
    /// Local class or object exported
    E7022,
    /// Nested class or object exported
    E7023,
    /// Exported name contains `__`
    E7024,
    /// Macro exported
    E7025,
    /// Abstract class exported
    E7026,
    /// Member of a js.Any subclass exported
    E7027,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,

    // Warnings (W70xx)
    /// Enumeration value name requires reflection
    W7001,
    /// Null enumeration value name requires reflection
    W7002,
}

impl ErrorCode {
    /// All variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E7001,
        ErrorCode::E7002,
        ErrorCode::E7003,
        ErrorCode::E7004,
        ErrorCode::E7006,
        ErrorCode::E7007,
        ErrorCode::E7010,
        ErrorCode::E7011,
        ErrorCode::E7020,
        ErrorCode::E7021,
        ErrorCode::E7022,
        ErrorCode::E7023,
        ErrorCode::E7024,
        ErrorCode::E7025,
        ErrorCode::E7026,
        ErrorCode::E7027,
        ErrorCode::E9001,
        ErrorCode::W7001,
        ErrorCode::W7002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E7001 => "E7001",
            ErrorCode::E7002 => "E7002",
            ErrorCode::E7003 => "E7003",
            ErrorCode::E7004 => "E7004",
            ErrorCode::E7006 => "E7006",
            ErrorCode::E7007 => "E7007",
            ErrorCode::E7010 => "E7010",
            ErrorCode::E7011 => "E7011",
            ErrorCode::E7020 => "E7020",
            ErrorCode::E7021 => "E7021",
            ErrorCode::E7022 => "E7022",
            ErrorCode::E7023 => "E7023",
            ErrorCode::E7024 => "E7024",
            ErrorCode::E7025 => "E7025",
            ErrorCode::E7026 => "E7026",
            ErrorCode::E7027 => "E7027",
            ErrorCode::E9001 => "E9001",
            ErrorCode::W7001 => "W7001",
            ErrorCode::W7002 => "W7002",
        }
    }

    /// Structural errors on declarations extending js.Any (E7001-E7007).
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E7001
                | ErrorCode::E7002
                | ErrorCode::E7003
                | ErrorCode::E7004
                | ErrorCode::E7006
                | ErrorCode::E7007
        )
    }

    pub fn is_class_of_error(&self) -> bool {
        matches!(self, ErrorCode::E7010 | ErrorCode::E7011)
    }

    pub fn is_export_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E7020
                | ErrorCode::E7021
                | ErrorCode::E7022
                | ErrorCode::E7023
                | ErrorCode::E7024
                | ErrorCode::E7025
                | ErrorCode::E7026
                | ErrorCode::E7027
        )
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W7001 | ErrorCode::W7002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E7001"` or `"w7002"` (case-insensitive).
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
