//! Pipeline stage types.
//!
//! A stage is one column of the candidate pipeline board. Every job starts
//! with the built-in stages (Inbox, Reviewing, Interview, Offered, Hired and
//! the terminal Rejected bucket); recruiters can add their own custom stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Icon names a stage can carry, in the order the UI cycles through them.
pub const STAGE_ICONS: &[&str] = &[
    "inbox", "eye", "users", "gift", "check", "x", "star", "flag", "phone", "clipboard",
];

/// Colors offered to recruiters when recoloring a stage.
pub const STAGE_PALETTE: &[&str] = &[
    "#6B7280", "#2563EB", "#7C3AED", "#D97706", "#16A34A", "#DC2626", "#0891B2", "#DB2777",
];

/// Stable identifier of a stage.
///
/// The key is used both as the partition key of the board and as the
/// drop-target id of a column. Keys are lowercase ASCII made of letters,
/// digits, `-` and `_`.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::StageKey;
///
/// let key = StageKey::new("interview").unwrap();
/// assert_eq!(key.as_str(), "interview");
/// assert!(StageKey::new("Not A Key").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageKey(String);

impl StageKey {
    /// Creates a stage key, validating its characters.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidStageKey`] if the key is empty or
    /// contains characters outside `[a-z0-9_-]`.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if valid {
            Ok(Self(key))
        } else {
            Err(ProtocolError::InvalidStageKey(key))
        }
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the built-in stage this key names, if any.
    #[must_use]
    pub fn builtin(&self) -> Option<BuiltinStage> {
        BuiltinStage::from_key(&self.0)
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BuiltinStage> for StageKey {
    fn from(stage: BuiltinStage) -> Self {
        Self(stage.key_str().to_string())
    }
}

/// The stages every job has out of the box.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::BuiltinStage;
///
/// assert_eq!(BuiltinStage::Pending.label(), "Inbox");
/// assert_eq!(BuiltinStage::pipeline().len(), 5);
/// assert!(!BuiltinStage::pipeline().contains(&BuiltinStage::Rejected));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStage {
    /// New applications land here.
    Pending,
    /// Under review by the recruiter.
    Reviewing,
    /// Interviewing.
    Interview,
    /// An offer was extended.
    Offered,
    /// The candidate was hired.
    Hired,
    /// Terminal bucket, not a pipeline step.
    Rejected,
}

impl BuiltinStage {
    /// Returns the built-in pipeline steps in canonical order (without Rejected).
    #[must_use]
    pub const fn pipeline() -> [Self; 5] {
        [
            Self::Pending,
            Self::Reviewing,
            Self::Interview,
            Self::Offered,
            Self::Hired,
        ]
    }

    /// Returns every built-in stage, Rejected last.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Pending,
            Self::Reviewing,
            Self::Interview,
            Self::Offered,
            Self::Hired,
            Self::Rejected,
        ]
    }

    /// Returns the stable key of this stage.
    #[must_use]
    pub const fn key_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewing => "reviewing",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the default display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Inbox",
            Self::Reviewing => "Reviewing",
            Self::Interview => "Interview",
            Self::Offered => "Offered",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns the default color as `#RRGGBB`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "#6B7280",   // Gray - waiting
            Self::Reviewing => "#2563EB", // Blue - active
            Self::Interview => "#7C3AED", // Violet
            Self::Offered => "#D97706",   // Amber
            Self::Hired => "#16A34A",     // Green - success
            Self::Rejected => "#DC2626",  // Red
        }
    }

    /// Returns the default icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pending => "inbox",
            Self::Reviewing => "eye",
            Self::Interview => "users",
            Self::Offered => "gift",
            Self::Hired => "check",
            Self::Rejected => "x",
        }
    }

    /// Parses a built-in stage from its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.key_str() == key)
    }

    /// Builds the default [`Stage`] for this built-in.
    #[must_use]
    pub fn stage(self) -> Stage {
        Stage {
            key: self.into(),
            label: self.label().to_string(),
            color: self.color().to_string(),
            icon: self.icon().to_string(),
            is_custom: false,
        }
    }
}

/// A column of the pipeline board.
///
/// The position of a stage is implicit: it is its index in the job's
/// ordered stage list.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::{Stage, StageKey};
///
/// let key = StageKey::new("custom-take-home").unwrap();
/// let stage = Stage::custom(key, "Take-home", "#0891B2", "clipboard").unwrap();
/// assert!(stage.is_custom);
/// assert!(!stage.is_rejected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Stable key, never reused after deletion.
    pub key: StageKey,
    /// Display label.
    pub label: String,
    /// Hex color (`#RRGGBB`).
    pub color: String,
    /// Icon name, one of [`STAGE_ICONS`] for stages created in the UI.
    pub icon: String,
    /// `false` for built-in stages, which cannot be deleted.
    #[serde(default)]
    pub is_custom: bool,
}

impl Stage {
    /// Creates a validated custom stage.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EmptyLabel`] for a blank label and
    /// [`ProtocolError::InvalidColor`] for a malformed color.
    pub fn custom(
        key: StageKey,
        label: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<Self> {
        let label = validate_label(label)?;
        let color = validate_color(color)?;
        Ok(Self {
            key,
            label,
            color,
            icon: icon.into(),
            is_custom: true,
        })
    }

    /// Returns `true` if this is the terminal Rejected bucket.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.key.builtin() == Some(BuiltinStage::Rejected)
    }
}

/// Returns the default stage list for a new job: the pipeline built-ins
/// followed by Rejected.
#[must_use]
pub fn default_stages() -> Vec<Stage> {
    BuiltinStage::all().into_iter().map(BuiltinStage::stage).collect()
}

/// Trims and validates a stage label.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyLabel`] if the trimmed label is empty.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::validate_label;
///
/// assert_eq!(validate_label("  Phone screen ").unwrap(), "Phone screen");
/// assert!(validate_label("   ").is_err());
/// ```
pub fn validate_label(label: impl Into<String>) -> Result<String> {
    let label = label.into();
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

/// Validates a `#RRGGBB` color, normalizing it to uppercase.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidColor`] if the string is not a 6-digit
/// hex color with a leading `#`.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::validate_color;
///
/// assert_eq!(validate_color("#16a34a").unwrap(), "#16A34A");
/// assert!(validate_color("16A34A").is_err());
/// ```
pub fn validate_color(color: impl Into<String>) -> Result<String> {
    let color = color.into();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(color.to_ascii_uppercase())
    } else {
        Err(ProtocolError::InvalidColor(color))
    }
}

/// Parses a validated `#RRGGBB` color into its components.
#[must_use]
pub fn color_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_roundtrip() {
        for stage in BuiltinStage::all() {
            assert_eq!(BuiltinStage::from_key(stage.key_str()), Some(stage));
            let key: StageKey = stage.into();
            assert_eq!(key.builtin(), Some(stage));
        }
    }

    #[test]
    fn default_stages_end_with_rejected() {
        let stages = default_stages();
        assert_eq!(stages.len(), 6);
        assert_eq!(stages[0].label, "Inbox");
        assert!(stages[5].is_rejected());
        assert!(stages.iter().all(|s| !s.is_custom));
    }

    #[test]
    fn stage_key_rejects_bad_characters() {
        assert!(StageKey::new("").is_err());
        assert!(StageKey::new("Upper").is_err());
        assert!(StageKey::new("with space").is_err());
        assert!(StageKey::new("custom-1a_b").is_ok());
    }

    #[test]
    fn stage_key_serializes_as_plain_string() {
        let key = StageKey::new("interview").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""interview""#);
    }

    #[test]
    fn custom_stage_validates_label_and_color() {
        let key = StageKey::new("custom-x").unwrap();
        assert_eq!(
            Stage::custom(key.clone(), " ", "#FFFFFF", "star"),
            Err(ProtocolError::EmptyLabel)
        );
        assert!(matches!(
            Stage::custom(key, "Trial", "red", "star"),
            Err(ProtocolError::InvalidColor(_))
        ));
    }

    #[test]
    fn color_rgb_parses_components() {
        assert_eq!(color_rgb("#16A34A"), Some((0x16, 0xA3, 0x4A)));
        assert_eq!(color_rgb("#123"), None);
        assert_eq!(color_rgb("123456"), None);
    }

    #[test]
    fn palette_colors_are_valid() {
        for color in STAGE_PALETTE {
            assert!(validate_color(*color).is_ok(), "{color}");
        }
        for stage in BuiltinStage::all() {
            assert!(validate_color(stage.color()).is_ok());
            assert!(STAGE_ICONS.contains(&stage.icon()));
        }
    }
}
