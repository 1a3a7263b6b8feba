//! Participant entity - a user's presence record inside one room

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserId};

/// Emoji used when a participant never picked one
pub const DEFAULT_EMOJI: &str = "😊";

/// Status used when a participant never picked one
pub const DEFAULT_STATUS: &str = "chill";

/// Participant entity (junction between a user and a room)
///
/// Keyed by `(user_id, room_id)`; the store guarantees one row per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub room_id: Snowflake,
    pub emoji: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new Participant, falling back to the defaults for blank fields
    pub fn new(
        user_id: UserId,
        room_id: Snowflake,
        emoji: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            room_id,
            emoji: non_blank(emoji).unwrap_or(DEFAULT_EMOJI).to_string(),
            status: non_blank(status).unwrap_or(DEFAULT_STATUS).to_string(),
            joined_at: now,
            updated_at: now,
        }
    }

    /// Apply a repeated join.
    ///
    /// Each field resolves to the supplied value, then the current value, then
    /// the default.
    pub fn rejoin(&mut self, emoji: Option<&str>, status: Option<&str>) {
        self.emoji = non_blank(emoji)
            .or_else(|| non_blank(Some(&self.emoji)))
            .unwrap_or(DEFAULT_EMOJI)
            .to_string();
        self.status = non_blank(status)
            .or_else(|| non_blank(Some(&self.status)))
            .unwrap_or(DEFAULT_STATUS)
            .to_string();
        self.updated_at = Utc::now();
    }

    /// Update only the supplied fields, returning whether anything changed
    pub fn update_presence(&mut self, emoji: Option<&str>, status: Option<&str>) -> bool {
        let mut changed = false;

        if let Some(emoji) = non_blank(emoji) {
            if self.emoji != emoji {
                self.emoji = emoji.to_string();
                changed = true;
            }
        }

        if let Some(status) = non_blank(status) {
            if self.status != status {
                self.status = status.to_string();
                changed = true;
            }
        }

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("u1")
    }

    #[test]
    fn test_new_participant_uses_supplied_values() {
        let p = Participant::new(user(), Snowflake::new(1), Some("🎵"), Some("focus"));
        assert_eq!(p.emoji, "🎵");
        assert_eq!(p.status, "focus");
    }

    #[test]
    fn test_new_participant_defaults() {
        let p = Participant::new(user(), Snowflake::new(1), None, Some("   "));
        assert_eq!(p.emoji, DEFAULT_EMOJI);
        assert_eq!(p.status, DEFAULT_STATUS);
    }

    #[test]
    fn test_rejoin_preserves_existing_values() {
        let mut p = Participant::new(user(), Snowflake::new(1), Some("🎵"), Some("focus"));
        p.rejoin(None, None);
        assert_eq!(p.emoji, "🎵");
        assert_eq!(p.status, "focus");

        p.rejoin(Some("🌙"), None);
        assert_eq!(p.emoji, "🌙");
        assert_eq!(p.status, "focus");
    }

    #[test]
    fn test_rejoin_falls_back_to_defaults_for_blank_rows() {
        let mut p = Participant::new(user(), Snowflake::new(1), None, None);
        p.emoji.clear();
        p.status = " ".to_string();

        p.rejoin(None, Some(""));
        assert_eq!(p.emoji, DEFAULT_EMOJI);
        assert_eq!(p.status, DEFAULT_STATUS);
    }

    #[test]
    fn test_update_presence_only_touches_supplied_fields() {
        let mut p = Participant::new(user(), Snowflake::new(1), Some("🎵"), Some("focus"));

        assert!(p.update_presence(None, Some("reading")));
        assert_eq!(p.emoji, "🎵");
        assert_eq!(p.status, "reading");

        assert!(!p.update_presence(None, None));
        assert!(!p.update_presence(Some("🎵"), Some("reading")));
    }
}
