//! Read-only reference data for a session.
//!
//! The catalog is parsed once (from the embedded JSON or a user-supplied file) and
//! then handed to the controller, which only ever borrows it.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Badge, Challenge, Idea, Post, ProfileSeed, ProgressMetric, SeedComment};

const BUILTIN_JSON: &str = include_str!("builtin.json");

static BUILTIN: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_json(BUILTIN_JSON).expect("embedded catalog must parse"));

/// Every static table the front end displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Community challenges, in carousel order.
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    /// Progress metrics for the stats tab.
    #[serde(default)]
    pub progress: Vec<ProgressMetric>,
    /// Achievement badges.
    #[serde(default)]
    pub badges: Vec<Badge>,
    /// Saved ideas used by the roulette.
    #[serde(default)]
    pub ideas: Vec<Idea>,
    /// Community feed posts.
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Comments seeded into the shared comment thread.
    #[serde(default)]
    pub comments: Vec<SeedComment>,
    /// Initial profile.
    pub profile: ProfileSeed,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Catalog {
        BUILTIN.clone()
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json(raw: &str) -> Result<Catalog> {
        serde_json::from_str(raw).context("failed to parse catalog JSON")
    }

    /// Load a catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = Self::from_json(&contents)
            .with_context(|| format!("failed to load catalog {}", path.display()))?;
        info!(
            path = %path.display(),
            challenges = catalog.challenges.len(),
            ideas = catalog.ideas.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Use `path` when given, otherwise the embedded catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Catalog> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Look up a challenge by key.
    pub fn challenge(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|challenge| challenge.id == id)
    }

    /// Look up a progress metric by key.
    pub fn progress_metric(&self, id: &str) -> Option<&ProgressMetric> {
        self.progress.iter().find(|metric| metric.id == id)
    }

    /// Look up a badge by key.
    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|badge| badge.id == id)
    }

    /// Ideas are addressed by position.
    pub fn idea(&self, index: usize) -> Option<&Idea> {
        self.ideas.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BadgeStatus, ChallengeStatus};
    use tempfile::tempdir;

    #[test]
    fn builtin_catalog_has_all_tables() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.challenges.len(), 3);
        assert_eq!(catalog.progress.len(), 4);
        assert_eq!(catalog.badges.len(), 3);
        assert_eq!(catalog.ideas.len(), 8);
        assert!(catalog.progress.iter().all(|metric| metric.chart.len() == 7));
    }

    #[test]
    fn lookups_by_key() {
        let catalog = Catalog::builtin();
        let drift = catalog.challenge("analog-drift").expect("analog-drift");
        assert_eq!(drift.status, ChallengeStatus::Active);
        assert_eq!(drift.participants, 342);
        assert_eq!(
            catalog.challenge("vinyl-archaeology").map(|c| c.status),
            Some(ChallengeStatus::Upcoming)
        );
        assert_eq!(
            catalog.badge("collaborator").map(|b| b.status),
            Some(BadgeStatus::Locked)
        );
        assert_eq!(
            catalog.progress_metric("time").map(|m| m.value.as_str()),
            Some("2h 30m")
        );
        assert!(catalog.challenge("missing").is_none());
        assert!(catalog.idea(99).is_none());
    }

    #[test]
    fn loads_catalog_override_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{
                "ideas": [
                    { "title": "ONLY", "description": "one idea", "duration": 3, "saved_date": "today" }
                ],
                "profile": { "username": "tester", "bio": "", "avatar": "YOU" }
            }"#,
        )?;

        let catalog = Catalog::load_or_builtin(Some(&path))?;
        assert_eq!(catalog.ideas.len(), 1);
        assert!(catalog.challenges.is_empty());
        assert_eq!(catalog.profile.username, "tester");
        Ok(())
    }

    #[test]
    fn malformed_catalog_reports_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json")?;

        let err = Catalog::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
        Ok(())
    }
}
