//! Profile store for listing, creating and persisting profiles
//!
//! Profiles are kept as one JSON file each in a single directory.

use super::types::*;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub struct ProfileStore {
    directory: PathBuf,
}

impl ProfileStore {
    /// Creates a store over `directory`, creating it if it doesn't exist
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }

        Ok(ProfileStore { directory })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(file_name(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Creates and saves a new profile after validating its name
    pub fn create(&self, name: &str) -> Result<Profile, ProfileError> {
        let name = validate_name(name)?;

        if self.exists(&name) {
            return Err(ProfileError::AlreadyExists(name));
        }

        let profile = Profile::new(&name);
        self.save(&profile)?;
        info!("created profile '{}'", profile.name);
        Ok(profile)
    }

    pub fn save(&self, profile: &Profile) -> Result<PathBuf, ProfileError> {
        let path = self.path_for(&profile.name);
        fs::write(&path, serde_json::to_string_pretty(profile)?)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Profile, ProfileError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        Self::read(&path)
    }

    fn read(path: &Path) -> Result<Profile, ProfileError> {
        let json = fs::read_to_string(path)?;
        let profile: Profile = serde_json::from_str(&json)?;

        if profile.version > CURRENT_PROFILE_VERSION {
            return Err(ProfileError::InvalidVersion(profile.version));
        }

        Ok(profile)
    }

    pub fn delete(&self, name: &str) -> Result<(), ProfileError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        info!("deleted profile '{}'", name);
        Ok(())
    }

    /// Lists all readable profiles, most recently played first
    pub fn list(&self) -> Result<Vec<ProfileSummary>, ProfileError> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match Self::read(&path) {
                Ok(profile) => profiles.push(ProfileSummary {
                    name: profile.name,
                    last_played: profile.last_played,
                    play_count: profile.play_count,
                }),
                Err(err) => warn!("skipping profile {}: {}", path.display(), err),
            }
        }

        profiles.sort_by(|a, b| {
            b.last_played
                .cmp(&a.last_played)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_create_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles")).unwrap();

        let created = store.create(" Vega ").unwrap();
        assert_eq!(created.name, "Vega");
        assert!(store.exists("Vega"));
        assert_eq!(store.load("Vega").unwrap(), created);
    }

    #[test]
    fn test_duplicate_names_ignore_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        store.create("Vega").unwrap();
        assert!(matches!(store.create("VEGA"), Err(ProfileError::AlreadyExists(_))));
    }

    #[test]
    fn test_list_newest_first_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let mut old = store.create("Old").unwrap();
        old.last_played = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        store.save(&old).unwrap();

        let mut new = store.create("New").unwrap();
        new.last_played = SystemTime::UNIX_EPOCH + Duration::from_secs(2_000);
        store.save(&new).unwrap();

        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        store.create("Vega").unwrap();
        store.delete("Vega").unwrap();
        assert!(!store.exists("Vega"));
        assert!(matches!(store.delete("Vega"), Err(ProfileError::NotFound(_))));
        assert!(matches!(store.load("Vega"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let mut profile = Profile::new("Vega");
        profile.version = CURRENT_PROFILE_VERSION + 1;
        store.save(&profile).unwrap();

        assert!(matches!(store.load("Vega"), Err(ProfileError::InvalidVersion(_))));
    }
}
