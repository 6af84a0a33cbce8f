use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    error::ParseIdError,
    render::{BadgeView, ChallengeView, IdeaView, ProgressView},
};

/// Overlay dialogs. Only one can be visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalId {
    JamSession,
    ChallengeDetail,
    ProgressDetail,
    BadgeDetail,
    ProfileEdit,
    Comments,
    IdeaRoulette,
}

impl ModalId {
    pub const ALL: [ModalId; 7] = [
        ModalId::JamSession,
        ModalId::ChallengeDetail,
        ModalId::ProgressDetail,
        ModalId::BadgeDetail,
        ModalId::ProfileEdit,
        ModalId::Comments,
        ModalId::IdeaRoulette,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModalId::JamSession => "jam-session",
            ModalId::ChallengeDetail => "challenge-detail",
            ModalId::ProgressDetail => "progress-detail",
            ModalId::BadgeDetail => "badge-detail",
            ModalId::ProfileEdit => "profile-edit",
            ModalId::Comments => "comments",
            ModalId::IdeaRoulette => "idea-roulette",
        }
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModalId::ALL
            .into_iter()
            .find(|modal| modal.as_str() == s.trim())
            .ok_or_else(|| ParseIdError::new("modal", s))
    }
}

/// What a visible modal is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    /// The modal's default layout (jam countdown, empty roulette, edit form, ...).
    Template,
    /// Jam finished; waiting for a name.
    JamComplete,
    Challenge(ChallengeView),
    Progress(ProgressView),
    Badge(BadgeView),
    /// Roulette landed on an idea.
    Idea(IdeaView),
}

/// The currently visible modal and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleModal {
    pub id: ModalId,
    pub body: ModalContent,
}

/// Single-slot modal state.
///
/// Holds no resources itself: `open` and `close` report which modal left the
/// screen so the owner can release whatever that modal was holding.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    visible: Option<VisibleModal>,
}

impl ModalStack {
    pub fn visible(&self) -> Option<&VisibleModal> {
        self.visible.as_ref()
    }

    pub fn active(&self) -> Option<ModalId> {
        self.visible.as_ref().map(|modal| modal.id)
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.active() == Some(id)
    }

    pub fn body(&self) -> Option<&ModalContent> {
        self.visible.as_ref().map(|modal| &modal.body)
    }

    /// Show `id` with `body`, replacing whatever was visible.
    ///
    /// Returns the modal that was displaced, if any.
    pub fn open(&mut self, id: ModalId, body: ModalContent) -> Option<ModalId> {
        let displaced = self.visible.take().map(|modal| modal.id);
        debug!(modal = %id, displaced = ?displaced, "Modal opened");
        self.visible = Some(VisibleModal { id, body });
        displaced
    }

    /// Replace the body of `id` if it is the visible modal.
    pub fn set_body(&mut self, id: ModalId, body: ModalContent) -> bool {
        match self.visible.as_mut() {
            Some(modal) if modal.id == id => {
                modal.body = body;
                true
            }
            _ => false,
        }
    }

    /// Hide the visible modal. Its body is dropped so the next `open` starts
    /// from a clean template. Safe to call with nothing open.
    pub fn close(&mut self) -> Option<ModalId> {
        let closed = self.visible.take().map(|modal| modal.id);
        if let Some(id) = closed {
            debug!(modal = %id, "Modal closed");
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_replaces_previous_modal() {
        let mut modals = ModalStack::default();
        assert_eq!(modals.open(ModalId::Comments, ModalContent::Template), None);
        assert_eq!(
            modals.open(ModalId::JamSession, ModalContent::Template),
            Some(ModalId::Comments)
        );
        assert_eq!(modals.active(), Some(ModalId::JamSession));
        assert!(!modals.is_open(ModalId::Comments));
    }

    #[test]
    fn close_is_idempotent() {
        let mut modals = ModalStack::default();
        modals.open(ModalId::ProfileEdit, ModalContent::Template);

        assert_eq!(modals.close(), Some(ModalId::ProfileEdit));
        let after_one = modals.visible().cloned();
        assert_eq!(modals.close(), None);
        assert_eq!(modals.visible().cloned(), after_one);
        assert!(modals.visible().is_none());
    }

    #[test]
    fn set_body_only_touches_visible_modal() {
        let mut modals = ModalStack::default();
        assert!(!modals.set_body(ModalId::JamSession, ModalContent::JamComplete));

        modals.open(ModalId::JamSession, ModalContent::Template);
        assert!(!modals.set_body(ModalId::Comments, ModalContent::JamComplete));
        assert!(modals.set_body(ModalId::JamSession, ModalContent::JamComplete));
        assert_eq!(modals.body(), Some(&ModalContent::JamComplete));

        modals.close();
        modals.open(ModalId::JamSession, ModalContent::Template);
        assert_eq!(modals.body(), Some(&ModalContent::Template));
    }

    #[test]
    fn modal_ids_parse_from_strings() {
        assert_eq!("idea-roulette".parse::<ModalId>(), Ok(ModalId::IdeaRoulette));
        assert!("settings".parse::<ModalId>().is_err());
    }
}
