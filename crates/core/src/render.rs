//! Projection of catalog records into the fields a modal displays.
//!
//! Everything here is a pure function of its input. Lookups that miss return
//! `None` and callers treat that as "nothing to show".

use std::{fmt, str::FromStr};

use crate::{
    catalog::Catalog,
    error::ParseIdError,
    models::{Badge, BadgeStatus, Challenge, ChallengeStatus, Idea, ProgressMetric},
    navigation::{ModalContent, ModalId},
};

/// Weekday labels under every progress chart.
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Kinds of record that have a detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A community challenge.
    Challenge,
    /// A progress metric.
    Progress,
    /// An achievement badge.
    Badge,
}

impl RecordKind {
    /// Modal the record is rendered into.
    pub fn modal(self) -> ModalId {
        match self {
            RecordKind::Challenge => ModalId::ChallengeDetail,
            RecordKind::Progress => ModalId::ProgressDetail,
            RecordKind::Badge => ModalId::BadgeDetail,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RecordKind::Challenge => "challenge",
            RecordKind::Progress => "progress",
            RecordKind::Badge => "badge",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "challenge" => Ok(RecordKind::Challenge),
            "progress" => Ok(RecordKind::Progress),
            "badge" => Ok(RecordKind::Badge),
            other => Err(ParseIdError::new("record kind", other)),
        }
    }
}

/// Primary button of a challenge detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeAction {
    /// Active challenges can be joined.
    Join,
    /// Upcoming challenges offer a reminder.
    NotifyWhenLive,
}

impl ChallengeAction {
    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            ChallengeAction::Join => "JOIN CHALLENGE",
            ChallengeAction::NotifyWhenLive => "NOTIFY WHEN LIVE",
        }
    }
}

/// One example submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleView {
    /// Single upper-case letter taken from the handle.
    pub avatar: String,
    /// Handle including `@`.
    pub username: String,
    /// Loop title.
    pub title: String,
    /// `❤️ likes • 🔄 remixes`.
    pub stats: String,
}

/// Display fields for the challenge detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeView {
    /// Catalog key, needed by the join/notify actions.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Category label.
    pub kind: String,
    /// Brief.
    pub description: String,
    /// Time remaining label.
    pub time_left: String,
    /// Participant count.
    pub participants: u32,
    /// Submission count.
    pub submissions: u32,
    /// `●` or `○`.
    pub status_indicator: &'static str,
    /// `ACTIVE` or `UPCOMING`.
    pub status_text: &'static str,
    /// Rules list.
    pub requirements: Vec<String>,
    /// Example submissions.
    pub examples: Vec<ExampleView>,
    /// Primary button.
    pub action: ChallengeAction,
}

/// One bar of the progress chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarView {
    /// Weekday.
    pub day: String,
    /// Raw value shown as a tooltip.
    pub value: u32,
    /// Height in percent, clamped to 100.
    pub height: u8,
}

/// Display fields for the progress detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// Catalog key.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Summary headline.
    pub value: String,
    /// Summary text.
    pub description: String,
    /// Weekly bars.
    pub bars: Vec<BarView>,
    /// `(icon, text)` pairs.
    pub insights: Vec<(String, String)>,
}

/// Buttons under a badge detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeAction {
    /// Share an earned badge.
    Share,
    /// Jump to progress for a locked badge.
    ViewProgress,
    /// Dismiss.
    Close,
}

impl BadgeAction {
    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            BadgeAction::Share => "SHARE BADGE",
            BadgeAction::ViewProgress => "VIEW PROGRESS",
            BadgeAction::Close => "CLOSE",
        }
    }
}

/// One requirement line of a badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementView {
    /// `✓` when complete, `○` otherwise.
    pub mark: &'static str,
    /// Requirement text.
    pub text: String,
    /// Optional progress fraction.
    pub progress: Option<String>,
}

/// Display fields for the badge detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    /// Catalog key.
    pub id: String,
    /// Always `BADGE DETAILS`.
    pub heading: &'static str,
    /// Emoji icon.
    pub icon: String,
    /// Badge name.
    pub title: String,
    /// Earned or locked, used for styling.
    pub status: BadgeStatus,
    /// `Earned <date>` or `Locked`.
    pub status_line: String,
    /// `<rarity> Badge`.
    pub rarity_line: String,
    /// Description paragraph.
    pub description: String,
    /// Requirement lines.
    pub requirements: Vec<RequirementView>,
    /// Buttons.
    pub actions: Vec<BadgeAction>,
}

/// Display fields for a roulette result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaView {
    /// Position in the idea list.
    pub index: usize,
    /// Idea name.
    pub title: String,
    /// Notes.
    pub description: String,
    /// Tags rendered as `#TAG`.
    pub tags: Vec<String>,
    /// `Saved <date>`.
    pub saved_line: String,
    /// Suggested length in minutes.
    pub duration: u32,
    /// `START <n> MIN JAM`.
    pub start_label: String,
}

/// Render the record `key` of `kind` into the content for its modal.
pub fn render(catalog: &Catalog, kind: RecordKind, key: &str) -> Option<ModalContent> {
    match kind {
        RecordKind::Challenge => catalog
            .challenge(key)
            .map(|record| ModalContent::Challenge(render_challenge(record))),
        RecordKind::Progress => catalog
            .progress_metric(key)
            .map(|record| ModalContent::Progress(render_progress(record))),
        RecordKind::Badge => catalog
            .badge(key)
            .map(|record| ModalContent::Badge(render_badge(record))),
    }
}

/// Challenge detail fields.
pub fn render_challenge(challenge: &Challenge) -> ChallengeView {
    let (status_indicator, status_text, action) = match challenge.status {
        ChallengeStatus::Active => ("●", "ACTIVE", ChallengeAction::Join),
        ChallengeStatus::Upcoming => ("○", "UPCOMING", ChallengeAction::NotifyWhenLive),
    };
    ChallengeView {
        id: challenge.id.clone(),
        title: challenge.title.clone(),
        kind: challenge.kind.clone(),
        description: challenge.description.clone(),
        time_left: challenge.time_left.clone(),
        participants: challenge.participants,
        submissions: challenge.submissions,
        status_indicator,
        status_text,
        requirements: challenge.requirements.clone(),
        examples: challenge
            .examples
            .iter()
            .map(|example| ExampleView {
                avatar: avatar_initial(&example.username),
                username: example.username.clone(),
                title: example.title.clone(),
                stats: format!("❤️ {} • 🔄 {}", example.likes, example.remixes),
            })
            .collect(),
        action,
    }
}

/// Progress detail fields.
pub fn render_progress(metric: &ProgressMetric) -> ProgressView {
    ProgressView {
        id: metric.id.clone(),
        title: metric.title.clone(),
        value: metric.value.clone(),
        description: metric.description.clone(),
        bars: metric
            .chart
            .iter()
            .enumerate()
            .map(|(index, bar)| BarView {
                day: DAY_LABELS
                    .get(index)
                    .map_or_else(|| bar.day.clone(), |label| label.to_string()),
                value: bar.value,
                height: bar.height.min(100),
            })
            .collect(),
        insights: metric
            .insights
            .iter()
            .map(|insight| (insight.icon.clone(), insight.text.clone()))
            .collect(),
    }
}

/// Badge detail fields.
pub fn render_badge(badge: &Badge) -> BadgeView {
    let (status_line, actions) = match badge.status {
        BadgeStatus::Earned => (
            format!("Earned {}", badge.earned_date.as_deref().unwrap_or("")),
            vec![BadgeAction::Share, BadgeAction::Close],
        ),
        BadgeStatus::Locked => (
            "Locked".to_string(),
            vec![BadgeAction::ViewProgress, BadgeAction::Close],
        ),
    };
    BadgeView {
        id: badge.id.clone(),
        heading: "BADGE DETAILS",
        icon: badge.icon.clone(),
        title: badge.title.clone(),
        status: badge.status,
        status_line: status_line.trim_end().to_string(),
        rarity_line: format!("{} Badge", badge.rarity),
        description: badge.description.clone(),
        requirements: badge
            .requirements
            .iter()
            .map(|req| RequirementView {
                mark: if req.completed { "✓" } else { "○" },
                text: req.text.clone(),
                progress: req.progress.clone(),
            })
            .collect(),
        actions,
    }
}

/// Roulette result fields for the idea at `index`.
pub fn render_idea(index: usize, idea: &Idea) -> IdeaView {
    IdeaView {
        index,
        title: idea.title.clone(),
        description: idea.description.clone(),
        tags: idea.tags.iter().map(|tag| format!("#{tag}")).collect(),
        saved_line: format!("Saved {}", idea.saved_date),
        duration: idea.duration,
        start_label: format!("START {} MIN JAM", idea.duration),
    }
}

fn avatar_initial(username: &str) -> String {
    username
        .chars()
        .nth(1)
        .map(|ch| ch.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_challenge_offers_join() {
        let catalog = Catalog::builtin();
        let Some(ModalContent::Challenge(view)) =
            render(&catalog, RecordKind::Challenge, "analog-drift")
        else {
            panic!("expected challenge content");
        };
        assert_eq!(view.title, "Analog Drift Vol.3");
        assert_eq!(view.status_indicator, "●");
        assert_eq!(view.status_text, "ACTIVE");
        assert_eq!(view.action.label(), "JOIN CHALLENGE");
        assert_eq!(view.requirements.len(), 4);
        assert_eq!(view.examples[0].avatar, "K");
        assert_eq!(view.examples[0].stats, "❤️ 247 • 🔄 18");
    }

    #[test]
    fn upcoming_challenge_offers_notification() {
        let catalog = Catalog::builtin();
        let view = render_challenge(catalog.challenge("vinyl-archaeology").expect("record"));
        assert_eq!(view.status_indicator, "○");
        assert_eq!(view.status_text, "UPCOMING");
        assert_eq!(view.action, ChallengeAction::NotifyWhenLive);
        assert_eq!(view.examples[1].avatar, "V");
    }

    #[test]
    fn badge_actions_follow_status() {
        let catalog = Catalog::builtin();
        let earned = render_badge(catalog.badge("quick-start").expect("record"));
        assert_eq!(earned.heading, "BADGE DETAILS");
        assert_eq!(earned.status_line, "Earned 3 days ago");
        assert_eq!(earned.rarity_line, "Common Badge");
        assert_eq!(earned.actions, vec![BadgeAction::Share, BadgeAction::Close]);
        assert!(earned.requirements.iter().all(|req| req.mark == "✓"));

        let locked = render_badge(catalog.badge("collaborator").expect("record"));
        assert_eq!(locked.status_line, "Locked");
        assert_eq!(
            locked.actions,
            vec![BadgeAction::ViewProgress, BadgeAction::Close]
        );
        assert_eq!(locked.requirements[1].mark, "○");
        assert_eq!(locked.requirements[1].progress.as_deref(), Some("0/3"));
    }

    #[test]
    fn progress_bars_keep_precomputed_heights() {
        let catalog = Catalog::builtin();
        let view = render_progress(catalog.progress_metric("shared").expect("record"));
        let heights: Vec<u8> = view.bars.iter().map(|bar| bar.height).collect();
        assert_eq!(heights, vec![50, 10, 100, 10, 10, 10, 10]);
        assert_eq!(view.insights[0].1, "Total likes received: 89");
        let days: Vec<&str> = view.bars.iter().map(|bar| bar.day.as_str()).collect();
        assert_eq!(days, DAY_LABELS);
    }

    #[test]
    fn progress_bars_use_fixed_week_labels() {
        let catalog = Catalog::builtin();
        let mut metric = catalog.progress_metric("shared").expect("record").clone();
        for bar in &mut metric.chart {
            bar.day = "?".to_string();
        }
        let view = render_progress(&metric);
        let days: Vec<&str> = view.bars.iter().map(|bar| bar.day.as_str()).collect();
        assert_eq!(days, DAY_LABELS);
    }

    #[test]
    fn idea_view_labels() {
        let catalog = Catalog::builtin();
        let view = render_idea(3, catalog.idea(3).expect("idea"));
        assert_eq!(view.title, "SPACE EXPLORATION");
        assert_eq!(view.tags, vec!["#AMBIENT", "#SPACE", "#PADS"]);
        assert_eq!(view.saved_line, "Saved 5 days ago");
        assert_eq!(view.start_label, "START 10 MIN JAM");
    }

    #[test]
    fn unknown_keys_render_nothing() {
        let catalog = Catalog::builtin();
        assert!(render(&catalog, RecordKind::Challenge, "nope").is_none());
        assert!(render(&catalog, RecordKind::Badge, "").is_none());
        assert!(render(&catalog, RecordKind::Progress, "streaks").is_none());
    }
}
