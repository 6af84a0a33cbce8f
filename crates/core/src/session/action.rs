use crate::{
    error::ActionError,
    navigation::{ProfileTab, ScreenId},
    profile::{PrivacyFlag, ProfileField},
};

/// Every user-triggered operation, with its argument already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SwitchScreen(ScreenId),
    SwitchTab(ProfileTab),
    StartJam(u32),
    EndJam,
    SaveJam(Option<String>),
    SaveJamAndContinue,
    CloseModal,
    Escape,
    OpenChallenge(String),
    JoinChallenge,
    NotifyWhenLive,
    ViewSubmissions,
    PlaySample,
    OpenProgress(String),
    SetGoal,
    ShareProgress,
    OpenBadge(String),
    ShareBadge,
    ViewProgress,
    OpenProfileEdit,
    CycleAvatar,
    ToggleGenre(String),
    TogglePrivacy(PrivacyFlag),
    EditProfileField(ProfileField, String),
    SaveProfile,
    ToggleLike(String),
    OpenComments(String),
    LikeComment(usize),
    ReplyToComment(usize),
    PostComment(String),
    StartRemix(String),
    SpinRoulette,
    StartRouletteJam,
    CarouselNext,
    CarouselPrev,
    CarouselGo(usize),
}

/// Names accepted by [`Action::parse`].
pub const ACTION_NAMES: &[&str] = &[
    "switch-screen",
    "switch-tab",
    "start-jam",
    "end-jam",
    "save-jam",
    "save-jam-continue",
    "close-modal",
    "escape",
    "open-challenge",
    "join-challenge",
    "notify-when-live",
    "view-submissions",
    "play-sample",
    "open-progress",
    "set-goal",
    "share-progress",
    "open-badge",
    "share-badge",
    "view-progress",
    "open-profile-edit",
    "cycle-avatar",
    "toggle-genre",
    "toggle-privacy",
    "edit-profile-field",
    "save-profile",
    "toggle-like",
    "open-comments",
    "like-comment",
    "reply-comment",
    "post-comment",
    "start-remix",
    "spin-roulette",
    "start-roulette-jam",
    "carousel-next",
    "carousel-prev",
    "carousel-go",
];

impl Action {
    /// Build an action from its name and optional argument.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Action, ActionError> {
        let action = match name.trim() {
            "switch-screen" => Action::SwitchScreen(required("switch-screen", arg)?.parse()?),
            "switch-tab" => Action::SwitchTab(required("switch-tab", arg)?.parse()?),
            "start-jam" => Action::StartJam(number("start-jam", arg)?),
            "end-jam" => Action::EndJam,
            "save-jam" => Action::SaveJam(arg.map(str::to_string)),
            "save-jam-continue" => Action::SaveJamAndContinue,
            "close-modal" => Action::CloseModal,
            "escape" => Action::Escape,
            "open-challenge" => Action::OpenChallenge(owned("open-challenge", arg)?),
            "join-challenge" => Action::JoinChallenge,
            "notify-when-live" => Action::NotifyWhenLive,
            "view-submissions" => Action::ViewSubmissions,
            "play-sample" => Action::PlaySample,
            "open-progress" => Action::OpenProgress(owned("open-progress", arg)?),
            "set-goal" => Action::SetGoal,
            "share-progress" => Action::ShareProgress,
            "open-badge" => Action::OpenBadge(owned("open-badge", arg)?),
            "share-badge" => Action::ShareBadge,
            "view-progress" => Action::ViewProgress,
            "open-profile-edit" => Action::OpenProfileEdit,
            "cycle-avatar" => Action::CycleAvatar,
            "toggle-genre" => Action::ToggleGenre(owned("toggle-genre", arg)?),
            "toggle-privacy" => Action::TogglePrivacy(required("toggle-privacy", arg)?.parse()?),
            "edit-profile-field" => {
                let raw = required("edit-profile-field", arg)?;
                let (field, value) =
                    raw.split_once('=')
                        .ok_or_else(|| ActionError::InvalidArgument {
                            action: "edit-profile-field",
                            value: raw.to_string(),
                        })?;
                Action::EditProfileField(field.parse()?, value.to_string())
            }
            "save-profile" => Action::SaveProfile,
            "toggle-like" => Action::ToggleLike(owned("toggle-like", arg)?),
            "open-comments" => Action::OpenComments(owned("open-comments", arg)?),
            "like-comment" => Action::LikeComment(number("like-comment", arg)?),
            "reply-comment" => Action::ReplyToComment(number("reply-comment", arg)?),
            "post-comment" => Action::PostComment(arg.unwrap_or_default().to_string()),
            "start-remix" => Action::StartRemix(owned("start-remix", arg)?),
            "spin-roulette" => Action::SpinRoulette,
            "start-roulette-jam" => Action::StartRouletteJam,
            "carousel-next" => Action::CarouselNext,
            "carousel-prev" => Action::CarouselPrev,
            "carousel-go" => Action::CarouselGo(number("carousel-go", arg)?),
            other => return Err(ActionError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

fn required<'a>(action: &'static str, arg: Option<&'a str>) -> Result<&'a str, ActionError> {
    arg.map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ActionError::MissingArgument(action))
}

fn owned(action: &'static str, arg: Option<&str>) -> Result<String, ActionError> {
    required(action, arg).map(str::to_string)
}

fn number<T: std::str::FromStr>(action: &'static str, arg: Option<&str>) -> Result<T, ActionError> {
    let raw = required(action, arg)?;
    raw.parse().map_err(|_| ActionError::InvalidArgument {
        action,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseIdError;

    #[test]
    fn every_listed_name_is_recognised() {
        for name in ACTION_NAMES {
            let result = Action::parse(name, Some("1"));
            assert!(
                !matches!(result, Err(ActionError::UnknownAction(_))),
                "{name} not handled"
            );
        }
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            Action::parse("switch-screen", Some("profile")),
            Ok(Action::SwitchScreen(ScreenId::Profile))
        );
        assert_eq!(Action::parse("start-jam", Some(" 8 ")), Ok(Action::StartJam(8)));
        assert_eq!(
            Action::parse("edit-profile-field", Some("bio=late night loops")),
            Ok(Action::EditProfileField(
                ProfileField::Bio,
                "late night loops".to_string()
            ))
        );
        assert_eq!(Action::parse("save-jam", None), Ok(Action::SaveJam(None)));
        assert_eq!(
            Action::parse("post-comment", None),
            Ok(Action::PostComment(String::new()))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Action::parse("launch-rocket", None),
            Err(ActionError::UnknownAction("launch-rocket".to_string()))
        );
        assert_eq!(
            Action::parse("start-jam", None),
            Err(ActionError::MissingArgument("start-jam"))
        );
        assert!(matches!(
            Action::parse("start-jam", Some("five")),
            Err(ActionError::InvalidArgument { .. })
        ));
        assert_eq!(
            Action::parse("switch-screen", Some("settings")),
            Err(ActionError::UnknownId(ParseIdError {
                kind: "screen",
                value: "settings".to_string()
            }))
        );
    }
}
