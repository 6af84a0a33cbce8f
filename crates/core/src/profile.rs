//! Displayed profile and the edit-form draft.

use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::{error::ParseIdError, models::ProfileSeed};

/// Avatar glyphs the picker cycles through.
pub const AVATARS: [&str; 8] = ["YOU", "🎵", "🎧", "🎤", "🎹", "🎸", "🥁", "🎺"];

/// Name given to a jam saved without one.
pub const UNTITLED_JAM: &str = "Untitled Jam";

/// Avatar after `current`; unknown glyphs restart at the first entry.
pub fn next_avatar(current: &str) -> &'static str {
    match AVATARS.iter().position(|avatar| *avatar == current) {
        Some(idx) => AVATARS[(idx + 1) % AVATARS.len()],
        None => AVATARS[0],
    }
}

/// Privacy switches on the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privacy {
    /// Profile visible to everyone.
    pub public_profile: bool,
    /// Activity shown in the feed.
    pub show_activity: bool,
    /// Others may remix this user's loops.
    pub allow_remixes: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Self {
            public_profile: true,
            show_activity: true,
            allow_remixes: true,
        }
    }
}

/// One privacy switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyFlag {
    /// [`Privacy::public_profile`].
    PublicProfile,
    /// [`Privacy::show_activity`].
    ShowActivity,
    /// [`Privacy::allow_remixes`].
    AllowRemixes,
}

impl FromStr for PrivacyFlag {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public-profile" => Ok(PrivacyFlag::PublicProfile),
            "show-activity" => Ok(PrivacyFlag::ShowActivity),
            "allow-remixes" => Ok(PrivacyFlag::AllowRemixes),
            other => Err(ParseIdError::new("privacy flag", other)),
        }
    }
}

/// Free-text fields on the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// Display name.
    Username,
    /// Bio line.
    Bio,
    /// Location.
    Location,
}

impl FromStr for ProfileField {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "username" => Ok(ProfileField::Username),
            "bio" => Ok(ProfileField::Bio),
            "location" => Ok(ProfileField::Location),
            other => Err(ParseIdError::new("profile field", other)),
        }
    }
}

/// A selectable genre chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreTag {
    /// Genre name.
    pub name: String,
    /// Whether the chip is active.
    pub selected: bool,
}

/// A jam recorded during this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedJam {
    /// User-given or default name.
    pub name: String,
    /// When it was saved.
    pub saved_at: DateTime<Local>,
}

/// Editable copy of the profile while the edit modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Display name.
    pub username: String,
    /// Bio line.
    pub bio: String,
    /// Location.
    pub location: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Genre chips.
    pub genres: Vec<GenreTag>,
    /// Privacy switches.
    pub privacy: Privacy,
}

impl ProfileDraft {
    /// Advance the avatar picker.
    pub fn cycle_avatar(&mut self) {
        self.avatar = next_avatar(&self.avatar).to_string();
    }

    /// Flip the genre chip named `name`; unknown genres do nothing.
    pub fn toggle_genre(&mut self, name: &str) -> bool {
        match self
            .genres
            .iter_mut()
            .find(|genre| genre.name.eq_ignore_ascii_case(name.trim()))
        {
            Some(genre) => {
                genre.selected = !genre.selected;
                true
            }
            None => {
                debug!(name, "Ignoring unknown genre");
                false
            }
        }
    }

    /// Flip one privacy switch.
    pub fn toggle_privacy(&mut self, flag: PrivacyFlag) {
        let value = match flag {
            PrivacyFlag::PublicProfile => &mut self.privacy.public_profile,
            PrivacyFlag::ShowActivity => &mut self.privacy.show_activity,
            PrivacyFlag::AllowRemixes => &mut self.privacy.allow_remixes,
        };
        *value = !*value;
    }

    /// Overwrite a free-text field.
    pub fn set_field(&mut self, field: ProfileField, value: &str) {
        let target = match field {
            ProfileField::Username => &mut self.username,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Location => &mut self.location,
        };
        *target = value.to_string();
    }

    /// Names of the active genre chips.
    pub fn selected_genres(&self) -> Vec<&str> {
        self.genres
            .iter()
            .filter(|genre| genre.selected)
            .map(|genre| genre.name.as_str())
            .collect()
    }
}

/// The profile as currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Display name.
    pub username: String,
    /// Bio line.
    pub bio: String,
    /// Location.
    pub location: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Genre chips.
    pub genres: Vec<GenreTag>,
    /// Privacy switches.
    pub privacy: Privacy,
    /// "Loops created" stat.
    pub loops_created: u32,
    /// Jams saved this session, newest first.
    pub saved_jams: Vec<SavedJam>,
}

impl Profile {
    /// Build the displayed profile from catalog data.
    pub fn from_seed(seed: &ProfileSeed) -> Self {
        Self {
            username: seed.username.clone(),
            bio: seed.bio.clone(),
            location: seed.location.clone(),
            avatar: seed.avatar.clone(),
            genres: seed
                .genres
                .iter()
                .map(|name| GenreTag {
                    name: name.clone(),
                    selected: seed.selected_genres.contains(name),
                })
                .collect(),
            privacy: Privacy::default(),
            loops_created: seed.loops_created,
            saved_jams: Vec::new(),
        }
    }

    /// Editable copy of the current values.
    pub fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            username: self.username.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            avatar: self.avatar.clone(),
            genres: self.genres.clone(),
            privacy: self.privacy,
        }
    }

    /// Copy a draft into the displayed profile.
    pub fn apply(&mut self, draft: ProfileDraft) {
        info!(
            username = %draft.username,
            avatar = %draft.avatar,
            genres = ?draft.selected_genres(),
            privacy = ?draft.privacy,
            "Profile updated"
        );
        self.username = draft.username;
        self.bio = draft.bio;
        self.location = draft.location;
        self.avatar = draft.avatar;
        self.genres = draft.genres;
        self.privacy = draft.privacy;
    }

    /// Record a finished jam and bump the loop counter. Returns the stored name.
    pub fn record_jam(&mut self, name: Option<&str>) -> String {
        let name = name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNTITLED_JAM)
            .to_string();
        self.saved_jams.insert(
            0,
            SavedJam {
                name: name.clone(),
                saved_at: Local::now(),
            },
        );
        self.loops_created += 1;
        info!(name = %name, "Jam saved");
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn profile() -> Profile {
        Profile::from_seed(&Catalog::builtin().profile)
    }

    #[test]
    fn avatar_cycle_wraps() {
        assert_eq!(next_avatar("YOU"), "🎵");
        assert_eq!(next_avatar("🎺"), "YOU");
        assert_eq!(next_avatar("??"), "YOU");

        let mut draft = profile().draft();
        for _ in 0..AVATARS.len() {
            draft.cycle_avatar();
        }
        assert_eq!(draft.avatar, "YOU");
    }

    #[test]
    fn draft_changes_apply_only_on_save() {
        let mut profile = profile();
        let mut draft = profile.draft();
        draft.set_field(ProfileField::Username, "loop_witch");
        draft.set_field(ProfileField::Location, "Lisbon");
        draft.cycle_avatar();
        assert!(draft.toggle_genre("funk"));
        assert!(!draft.toggle_genre("polka"));
        draft.toggle_privacy(PrivacyFlag::AllowRemixes);
        assert_eq!(profile.username, "YOUR NAME");

        profile.apply(draft);
        assert_eq!(profile.username, "loop_witch");
        assert_eq!(profile.location, "Lisbon");
        assert_eq!(profile.avatar, "🎵");
        assert!(!profile.privacy.allow_remixes);
        assert_eq!(profile.draft().selected_genres(), vec!["LO-FI", "AMBIENT", "FUNK"]);
    }

    #[test]
    fn blank_jam_name_defaults() {
        let mut profile = profile();
        let loops = profile.loops_created;
        assert_eq!(profile.record_jam(Some("   ")), UNTITLED_JAM);
        assert_eq!(profile.record_jam(None), UNTITLED_JAM);
        assert_eq!(profile.record_jam(Some(" Morning Vibe ")), "Morning Vibe");
        assert_eq!(profile.loops_created, loops + 3);
        assert_eq!(profile.saved_jams[0].name, "Morning Vibe");
    }

    #[test]
    fn flags_and_fields_parse() {
        assert_eq!("show-activity".parse::<PrivacyFlag>(), Ok(PrivacyFlag::ShowActivity));
        assert!("share-location".parse::<PrivacyFlag>().is_err());
        assert_eq!("bio".parse::<ProfileField>(), Ok(ProfileField::Bio));
    }
}
