//! Default room catalogue

/// Rooms created on first start: (name, category)
pub const DEFAULT_ROOMS: &[(&str, &str)] = &[
    ("Cozy Lo-Fi", "lo-fi"),
    ("Deep Focus", "focus"),
    ("Slow Quiet Room", "quiet"),
    ("Creative Doodle Zone", "creative"),
    ("Night Chill", "night"),
    ("Soft Social Room", "social"),
];
