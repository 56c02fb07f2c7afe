//! Severity — ordered log levels with stable wire names.

use std::fmt;

/// Severity of a logging call site.
///
/// The ordering is total (`Debug < Info < Warn < Error`) and the wire names
/// are fixed; both are part of the table format contract, so identifiers
/// computed against them stay decodable across builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// All levels, in ascending order.
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Strict inverse of [`as_str`](Self::as_str): exact, case-sensitive
    /// match on the wire name. Anything else is `None`.
    pub fn parse(name: &str) -> Option<Severity> {
        match name {
            "DEBUG" => Some(Severity::Debug),
            "INFO" => Some(Severity::Info),
            "WARN" => Some(Severity::Warn),
            "ERROR" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
