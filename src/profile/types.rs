//! Profile data types
//!
//! A profile is one player's persistent front-end state, serialized to JSON
//! with Serde (one file per profile).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::SystemTime;

/// Longest accepted profile name, in characters
pub const MAX_NAME_LEN: usize = 20;

/// Current profile file version
pub const CURRENT_PROFILE_VERSION: u32 = 1;

/// One player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    pub name: String,
    pub created: SystemTime,
    pub last_played: SystemTime,
    #[serde(default)]
    pub play_count: u32,
    /// Movie ids this player has seen; unlocks them in the video library
    #[serde(default)]
    pub watched_movies: BTreeSet<String>,
    /// Outcome id of the last completed psych test
    #[serde(default)]
    pub psych_result: Option<String>,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        let now = SystemTime::now();
        Profile {
            version: CURRENT_PROFILE_VERSION,
            name: name.to_string(),
            created: now,
            last_played: now,
            play_count: 0,
            watched_movies: BTreeSet::new(),
            psych_result: None,
        }
    }

    /// Records that the profile was picked to play
    pub fn touch(&mut self) {
        self.last_played = SystemTime::now();
        self.play_count += 1;
    }

    /// Marks a movie as seen, returns `true` if it was new
    pub fn mark_watched(&mut self, movie_id: &str) -> bool {
        self.watched_movies.insert(movie_id.to_string())
    }

    pub fn has_watched(&self, movie_id: &str) -> bool {
        self.watched_movies.contains(movie_id)
    }
}

/// Listing entry for the profile selector
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub last_played: SystemTime,
    pub play_count: u32,
}

/// Errors for profile operations
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("invalid profile name: {0}")]
    InvalidName(String),
    #[error("a profile named '{0}' already exists")]
    AlreadyExists(String),
    #[error("profile '{0}' not found")]
    NotFound(String),
    #[error("unsupported profile version {0}")]
    InvalidVersion(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Checks a proposed profile name and returns it trimmed
pub fn validate_name(name: &str) -> Result<String, ProfileError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ProfileError::InvalidName("name is empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ProfileError::InvalidName(format!(
            "name is longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_')))
    {
        return Err(ProfileError::InvalidName(format!("'{}' is not allowed", bad)));
    }

    Ok(trimmed.to_string())
}

/// File name a profile is stored under
pub fn file_name(name: &str) -> String {
    format!("{}.json", name.trim().to_ascii_lowercase().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Cmdr Vega ").unwrap(), "Cmdr Vega");
        assert_eq!(validate_name("pilot_2-b").unwrap(), "pilot_2-b");
        assert!(matches!(validate_name("   "), Err(ProfileError::InvalidName(_))));
        assert!(matches!(validate_name("a/b"), Err(ProfileError::InvalidName(_))));
        assert!(matches!(
            validate_name("abcdefghijklmnopqrstu"),
            Err(ProfileError::InvalidName(_))
        ));
        assert!(validate_name("abcdefghijklmnopqrst").is_ok());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Cmdr Vega"), "cmdr_vega.json");
    }

    #[test]
    fn test_mark_watched() {
        let mut profile = Profile::new("Vega");
        assert!(profile.mark_watched("intro"));
        assert!(!profile.mark_watched("intro"));
        assert!(profile.has_watched("intro"));
        assert!(!profile.has_watched("outro"));
    }

    #[test]
    fn test_touch_counts_plays() {
        let mut profile = Profile::new("Vega");
        profile.touch();
        profile.touch();
        assert_eq!(profile.play_count, 2);
        assert!(profile.last_played >= profile.created);
    }
}
