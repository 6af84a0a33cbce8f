//! Shared domain models.
//!
//! Every record here is reference data loaded once from the catalog and never
//! mutated afterwards. Presentation-side counters (likes, comment counts) live in
//! [`crate::community`] as copies.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a community challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChallengeStatus {
    /// Currently accepting submissions.
    Active,
    /// Announced but not yet open.
    Upcoming,
}

/// Example submission shown inside a challenge detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeExample {
    /// Handle of the submitting user, including the leading `@`.
    pub username: String,
    /// Title of the submitted loop.
    pub title: String,
    /// Like count at the time the catalog was written.
    pub likes: u32,
    /// Number of remixes of the submission.
    pub remixes: u32,
}

/// A timed community challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Catalog key (e.g. `analog-drift`).
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Category label such as `TIMED EXPERIMENT`.
    pub kind: String,
    /// Whether the challenge is running or upcoming.
    pub status: ChallengeStatus,
    /// Long-form brief.
    pub description: String,
    /// Pre-formatted time remaining (`2 DAYS LEFT`).
    pub time_left: String,
    /// Number of participants.
    pub participants: u32,
    /// Number of submissions so far.
    pub submissions: u32,
    /// Rules a submission must follow.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Highlighted submissions.
    #[serde(default)]
    pub examples: Vec<ChallengeExample>,
}

/// One bar of a weekly progress chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    /// Short weekday label.
    pub day: String,
    /// Raw metric value for the day.
    pub value: u32,
    /// Precomputed bar height in percent (0-100).
    pub height: u8,
}

/// A single line of commentary under a progress chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Emoji shown before the text.
    pub icon: String,
    /// Insight body.
    pub text: String,
}

/// A progress metric shown on the profile stats tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMetric {
    /// Catalog key (`streak`, `loops`, `time`, `shared`).
    pub id: String,
    /// Modal heading.
    pub title: String,
    /// Headline value, already formatted (`3 days`).
    pub value: String,
    /// Short explanation of the metric.
    pub description: String,
    /// Seven bars, Monday first.
    #[serde(default)]
    pub chart: Vec<ChartBar>,
    /// Commentary lines.
    #[serde(default)]
    pub insights: Vec<Insight>,
}

/// Whether a badge has been earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    /// Unlocked by the user.
    Earned,
    /// Not yet unlocked.
    Locked,
}

impl BadgeStatus {
    /// Lowercase class name used by front ends for styling.
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeStatus::Earned => "earned",
            BadgeStatus::Locked => "locked",
        }
    }
}

/// A requirement line for a badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequirement {
    /// Requirement text.
    pub text: String,
    /// Whether the requirement is satisfied.
    pub completed: bool,
    /// Optional progress fraction such as `0/3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

/// An achievement badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Catalog key (`quick-start`).
    pub id: String,
    /// Badge name.
    pub title: String,
    /// Emoji icon.
    pub icon: String,
    /// Earned or locked.
    pub status: BadgeStatus,
    /// What the badge rewards.
    pub description: String,
    /// Conditions for unlocking.
    #[serde(default)]
    pub requirements: Vec<BadgeRequirement>,
    /// When it was earned, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_date: Option<String>,
    /// Rarity tier (`Common`, `Rare`).
    pub rarity: String,
}

/// A saved jam idea used by the roulette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Idea name.
    pub title: String,
    /// Free-form notes.
    pub description: String,
    /// Short genre/technique tags, without `#`.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Suggested jam length in minutes.
    pub duration: u32,
    /// Relative save date (`2 days ago`).
    pub saved_date: String,
}

/// A community feed post as shipped in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post key.
    pub id: String,
    /// Author handle.
    pub author: String,
    /// Loop title.
    pub title: String,
    /// Initial like count.
    pub likes: u32,
    /// Initial comment count.
    pub comments: u32,
}

/// A seeded comment in the shared comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedComment {
    /// Author handle.
    pub author: String,
    /// Comment body.
    pub text: String,
    /// Relative time label (`2h`).
    pub time: String,
    /// Initial like count.
    pub likes: u32,
}

/// The user's profile as initially displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSeed {
    /// Display name.
    pub username: String,
    /// Short bio.
    pub bio: String,
    /// Free-form location.
    #[serde(default)]
    pub location: String,
    /// Avatar glyph.
    pub avatar: String,
    /// All selectable genre tags.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Genres selected initially.
    #[serde(default)]
    pub selected_genres: Vec<String>,
    /// Initial "loops created" stat.
    #[serde(default)]
    pub loops_created: u32,
}
