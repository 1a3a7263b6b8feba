//! WebSocket close codes
//!
//! Only protocol violations close a connection. Failed operations are
//! acknowledged instead.

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Opcode is unknown or not allowed from a client
    UnknownOpcode = 4001,
    /// Frame is not valid JSON text
    DecodeError = 4002,
    /// No heartbeat within the timeout
    SessionTimeout = 4009,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::UnknownOpcode),
            4002 => Some(Self::DecodeError),
            4009 => Some(Self::SessionTimeout),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::UnknownOpcode => "Invalid opcode sent",
            Self::DecodeError => "Invalid payload encoding",
            Self::SessionTimeout => "Session timeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({}): {}", self, self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_values() {
        assert_eq!(CloseCode::DecodeError.as_u16(), 4002);
        assert_eq!(CloseCode::from_u16(4001), Some(CloseCode::UnknownOpcode));
        assert_eq!(CloseCode::from_u16(1000), None);
    }

    #[test]
    fn test_close_code_display() {
        let display = CloseCode::SessionTimeout.to_string();
        assert!(display.contains("4009"));
        assert!(display.contains("timeout"));
    }
}
