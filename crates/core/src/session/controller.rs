use std::{collections::VecDeque, fmt, time::Duration};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::{
    catalog::Catalog,
    community::CommunityFeed,
    config::AppConfig,
    navigation::{
        Carousel, ModalContent, ModalId, ModalStack, ProfileTab, ScreenId, ScreenRouter,
        TabSwitcher, VisibleModal,
    },
    profile::{PrivacyFlag, Profile, ProfileDraft, ProfileField},
    render::{self, BadgeAction, ChallengeAction, RecordKind},
    roulette::IdeaRoulette,
    session::action::Action,
    timer::{JamTimer, ManualScheduler, TickHandle, TickOutcome, TickScheduler},
};

/// Chance per activity tick that another loop shows up on the profile.
pub const ACTIVITY_CHANCE: f64 = 0.05;

/// A confirmation message waiting to be shown by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(String);

impl Notice {
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owns every piece of session state and applies actions to it.
///
/// The front end feeds it actions and the handles its scheduler delivers; it
/// never touches state directly.
pub struct SessionController<S: TickScheduler> {
    catalog: Catalog,
    scheduler: S,
    rng: SmallRng,
    router: ScreenRouter,
    tabs: TabSwitcher,
    carousel: Carousel,
    modals: ModalStack,
    timer: JamTimer,
    roulette: IdeaRoulette,
    feed: CommunityFeed,
    profile: Profile,
    draft: Option<ProfileDraft>,
    comments_post: Option<String>,
    activity: Option<TickHandle>,
    notices: VecDeque<Notice>,
    default_jam_minutes: u32,
}

impl<S: TickScheduler> SessionController<S> {
    /// Build a session over `catalog`, scheduling ticks on `scheduler`.
    pub fn new(config: &AppConfig, catalog: Catalog, mut scheduler: S) -> Self {
        let initial: ScreenId = config.initial_screen.parse().unwrap_or_else(|err| {
            warn!(%err, "Falling back to the home screen");
            ScreenId::Home
        });
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let activity = config
            .simulate_activity
            .then(|| scheduler.every(config.activity_interval()));

        info!(
            screen = %initial,
            challenges = catalog.challenges.len(),
            ideas = catalog.ideas.len(),
            "Session started"
        );

        Self {
            router: ScreenRouter::new(initial),
            tabs: TabSwitcher::default(),
            carousel: Carousel::new(catalog.challenges.len()),
            modals: ModalStack::default(),
            timer: JamTimer::new(config.tick_interval()),
            roulette: IdeaRoulette::new(config.roulette_delay()),
            feed: CommunityFeed::from_catalog(&catalog),
            profile: Profile::from_seed(&catalog.profile),
            draft: None,
            comments_post: None,
            activity,
            notices: VecDeque::new(),
            default_jam_minutes: config.default_jam_minutes,
            catalog,
            scheduler,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn screen(&self) -> ScreenId {
        self.router.active()
    }

    pub fn router(&self) -> &ScreenRouter {
        &self.router
    }

    pub fn tab(&self) -> ProfileTab {
        self.tabs.active()
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn modal(&self) -> Option<&VisibleModal> {
        self.modals.visible()
    }

    pub fn timer(&self) -> &JamTimer {
        &self.timer
    }

    pub fn roulette(&self) -> &IdeaRoulette {
        &self.roulette
    }

    pub fn feed(&self) -> &CommunityFeed {
        &self.feed
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Edit form contents while the profile editor is open.
    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    /// Post whose comment thread is open.
    pub fn comments_post(&self) -> Option<&str> {
        self.comments_post.as_deref()
    }

    /// Minutes used when the front end starts a jam without picking a length.
    pub fn default_jam_minutes(&self) -> u32 {
        self.default_jam_minutes
    }

    /// Remove and return every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Remove the oldest queued notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    fn notify(&mut self, text: impl Into<String>) {
        let notice = Notice(text.into());
        info!(notice = %notice, "Notice queued");
        self.notices.push_back(notice);
    }

    /// Parse and apply a named action. Unknown names and bad arguments do nothing.
    pub fn dispatch_named(&mut self, name: &str, arg: Option<&str>) {
        match Action::parse(name, arg) {
            Ok(action) => self.dispatch(action),
            Err(err) => debug!(name, ?arg, %err, "Ignoring action"),
        }
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) {
        trace!(?action, "Dispatch");
        match action {
            Action::SwitchScreen(screen) => self.switch_screen(screen),
            Action::SwitchTab(tab) => self.tabs.switch(tab),
            Action::StartJam(minutes) => self.start_jam(minutes),
            Action::EndJam => self.end_jam(),
            Action::SaveJam(name) => self.save_jam(name.as_deref()),
            Action::SaveJamAndContinue => self.save_jam_and_continue(),
            Action::CloseModal | Action::Escape => self.close_modal(),
            Action::OpenChallenge(id) => self.open_record(RecordKind::Challenge, &id),
            Action::JoinChallenge => self.challenge_action(ChallengeAction::Join),
            Action::NotifyWhenLive => self.challenge_action(ChallengeAction::NotifyWhenLive),
            Action::ViewSubmissions => self.view_submissions(),
            Action::PlaySample => self.play_sample(),
            Action::OpenProgress(id) => self.open_record(RecordKind::Progress, &id),
            Action::SetGoal => {
                self.progress_action("🎯 Opening goal setting interface...")
            }
            Action::ShareProgress => {
                self.progress_action("📤 Sharing your progress to the community...")
            }
            Action::OpenBadge(id) => self.open_record(RecordKind::Badge, &id),
            Action::ShareBadge => self.badge_action(BadgeAction::Share),
            Action::ViewProgress => self.badge_action(BadgeAction::ViewProgress),
            Action::OpenProfileEdit => self.open_profile_edit(),
            Action::CycleAvatar => self.edit_draft(ProfileDraft::cycle_avatar),
            Action::ToggleGenre(name) => self.edit_draft(|draft| {
                draft.toggle_genre(&name);
            }),
            Action::TogglePrivacy(flag) => self.toggle_privacy(flag),
            Action::EditProfileField(field, value) => self.edit_profile_field(field, &value),
            Action::SaveProfile => self.save_profile(),
            Action::ToggleLike(post) => {
                self.feed.toggle_like(&post);
            }
            Action::OpenComments(post) => self.open_comments(&post),
            Action::LikeComment(index) => {
                self.feed.like_comment(index);
            }
            Action::ReplyToComment(index) => self.feed.reply_to(index),
            Action::PostComment(text) => self.post_comment(&text),
            Action::StartRemix(post) => self.start_remix(&post),
            Action::SpinRoulette => self.spin_roulette(),
            Action::StartRouletteJam => self.start_roulette_jam(),
            Action::CarouselNext => self.carousel.next(),
            Action::CarouselPrev => self.carousel.previous(),
            Action::CarouselGo(index) => self.carousel.go_to(index),
        }
    }

    pub fn switch_screen(&mut self, screen: ScreenId) {
        self.router.activate(screen);
    }

    /// Show `id`, releasing whatever the displaced modal held.
    pub fn open_modal(&mut self, id: ModalId, body: ModalContent) {
        let displaced = self.modals.open(id, body);
        self.release(displaced);
    }

    /// Hide the visible modal and release its resources. No-op when nothing is open.
    pub fn close_modal(&mut self) {
        let closed = self.modals.close();
        self.release(closed);
    }

    fn close_and_navigate(&mut self, screen: ScreenId) {
        self.close_modal();
        self.switch_screen(screen);
    }

    fn release(&mut self, modal: Option<ModalId>) {
        match modal {
            Some(ModalId::JamSession) => self.timer.cancel(&mut self.scheduler),
            Some(ModalId::IdeaRoulette) => self.roulette.reset(&mut self.scheduler),
            Some(ModalId::ProfileEdit) => self.draft = None,
            Some(ModalId::Comments) => self.comments_post = None,
            Some(_) | None => {}
        }
    }

    /// Open the jam modal and count down from `minutes`. Zero minutes is ignored.
    pub fn start_jam(&mut self, minutes: u32) {
        if minutes == 0 {
            debug!("Ignoring zero-length jam");
            return;
        }
        self.open_modal(ModalId::JamSession, ModalContent::Template);
        self.timer.start(minutes, &mut self.scheduler);
    }

    /// Stop the countdown early and show the completion view.
    pub fn end_jam(&mut self) {
        if !self.modals.is_open(ModalId::JamSession) {
            return;
        }
        self.timer.cancel(&mut self.scheduler);
        self.modals
            .set_body(ModalId::JamSession, ModalContent::JamComplete);
        info!("Jam ended early");
    }

    fn jam_completed(&self) -> bool {
        self.modals.is_open(ModalId::JamSession)
            && self.modals.body() == Some(&ModalContent::JamComplete)
    }

    /// Save the finished jam under `name` and show it on the profile.
    pub fn save_jam(&mut self, name: Option<&str>) {
        if !self.jam_completed() {
            debug!("No finished jam to save");
            return;
        }
        let name = self.profile.record_jam(name);
        self.close_and_navigate(ScreenId::Profile);
        self.notify(format!("✓ Saved as \"{name}\""));
    }

    /// Save the finished jam without a name and go to the profile.
    pub fn save_jam_and_continue(&mut self) {
        if !self.jam_completed() {
            debug!("No finished jam to save");
            return;
        }
        self.profile.record_jam(None);
        self.close_and_navigate(ScreenId::Profile);
    }

    /// Render the record `key` into its detail modal. Unknown keys change nothing.
    pub fn open_record(&mut self, kind: RecordKind, key: &str) {
        match render::render(&self.catalog, kind, key) {
            Some(body) => self.open_modal(kind.modal(), body),
            None => debug!(%kind, key, "Ignoring unknown record"),
        }
    }

    fn challenge_action(&mut self, wanted: ChallengeAction) {
        let Some(ModalContent::Challenge(view)) = self.modals.body() else {
            return;
        };
        if view.action != wanted {
            debug!(challenge = %view.id, "Challenge does not offer this action");
            return;
        }
        let text = match wanted {
            ChallengeAction::Join => format!("🎵 Joining {} challenge!", view.title),
            ChallengeAction::NotifyWhenLive => {
                format!("🔔 We'll notify you when {} goes live!", view.title)
            }
        };
        self.close_modal();
        self.notify(text);
    }

    fn view_submissions(&mut self) {
        if !self.modals.is_open(ModalId::ChallengeDetail) {
            return;
        }
        self.close_modal();
        self.notify("📋 Opening all submissions...");
    }

    fn play_sample(&mut self) {
        if self.modals.is_open(ModalId::ChallengeDetail) {
            self.notify("🔊 Playing challenge sample...");
        }
    }

    fn progress_action(&mut self, text: &str) {
        if !self.modals.is_open(ModalId::ProgressDetail) {
            return;
        }
        self.close_modal();
        self.notify(text);
    }

    fn badge_action(&mut self, wanted: BadgeAction) {
        let Some(ModalContent::Badge(view)) = self.modals.body() else {
            return;
        };
        if !view.actions.contains(&wanted) {
            debug!(badge = %view.id, "Badge does not offer this action");
            return;
        }
        let text = match wanted {
            BadgeAction::Share => format!("🏆 Sharing your {} badge!", view.title),
            BadgeAction::ViewProgress => "📊 Opening progress tracker...".to_string(),
            BadgeAction::Close => String::new(),
        };
        self.close_modal();
        if !text.is_empty() {
            self.notify(text);
        }
    }

    /// Open the profile editor on a copy of the current profile.
    pub fn open_profile_edit(&mut self) {
        self.open_modal(ModalId::ProfileEdit, ModalContent::Template);
        self.draft = Some(self.profile.draft());
    }

    fn edit_draft(&mut self, edit: impl FnOnce(&mut ProfileDraft)) {
        match self.draft.as_mut() {
            Some(draft) => edit(draft),
            None => debug!("Profile editor is closed"),
        }
    }

    fn toggle_privacy(&mut self, flag: PrivacyFlag) {
        self.edit_draft(|draft| draft.toggle_privacy(flag));
    }

    fn edit_profile_field(&mut self, field: ProfileField, value: &str) {
        self.edit_draft(|draft| draft.set_field(field, value));
    }

    /// Apply the draft to the displayed profile and close the editor.
    pub fn save_profile(&mut self) {
        let Some(draft) = self.draft.take() else {
            debug!("Profile editor is closed");
            return;
        };
        self.profile.apply(draft);
        self.close_modal();
        self.notify("✅ Profile updated successfully!");
    }

    fn open_comments(&mut self, post: &str) {
        if self.feed.post(post).is_none() {
            debug!(post, "Ignoring comments for unknown post");
            return;
        }
        self.open_modal(ModalId::Comments, ModalContent::Template);
        self.comments_post = Some(post.to_string());
    }

    /// Post a comment; blank text changes nothing.
    pub fn post_comment(&mut self, text: &str) {
        if self.feed.post_comment(text) {
            self.notify("✅ Comment posted!");
        }
    }

    fn start_remix(&mut self, post: &str) {
        if self.feed.post(post).is_none() {
            debug!(post, "Ignoring remix of unknown post");
            return;
        }
        self.notify(format!(
            "🔄 Starting remix of post {post}! Opening remix interface..."
        ));
    }

    /// Open the roulette modal and start rolling.
    pub fn spin_roulette(&mut self) {
        self.open_modal(ModalId::IdeaRoulette, ModalContent::Template);
        self.roulette.spin(&mut self.scheduler);
    }

    /// Start a jam from the idea the roulette landed on. Does nothing mid-roll.
    pub fn start_roulette_jam(&mut self) {
        if !self.modals.is_open(ModalId::IdeaRoulette) {
            return;
        }
        let Some(idea) = self
            .roulette
            .selection()
            .and_then(|index| self.catalog.idea(index))
            .cloned()
        else {
            debug!("Roulette has not landed yet");
            return;
        };
        if idea.duration == 0 {
            warn!(title = %idea.title, "Idea has no jam length");
            return;
        }
        self.roulette.take_selection();
        self.close_modal();
        self.notify(format!(
            "🎵 Starting jam session with your idea: \"{}\"!\n\n{}\n\nDuration: {} minutes",
            idea.title, idea.description, idea.duration
        ));
        self.start_jam(idea.duration);
    }

    /// Route a handle delivered by the scheduler to whoever owns it.
    pub fn handle_tick(&mut self, handle: TickHandle) {
        if self.timer.owns(handle) {
            if self.timer.tick(handle, &mut self.scheduler) == TickOutcome::Expired {
                self.modals
                    .set_body(ModalId::JamSession, ModalContent::JamComplete);
            }
        } else if self.roulette.owns(handle) {
            let landed = self.roulette.land(
                handle,
                self.catalog.ideas.len(),
                &mut self.rng,
                &mut self.scheduler,
            );
            let body = landed.and_then(|index| {
                self.catalog
                    .idea(index)
                    .map(|idea| ModalContent::Idea(render::render_idea(index, idea)))
            });
            if let Some(body) = body {
                self.modals.set_body(ModalId::IdeaRoulette, body);
            }
        } else if self.activity == Some(handle) {
            if self.rng.gen_bool(ACTIVITY_CHANCE) {
                self.profile.loops_created += 1;
                debug!(loops = self.profile.loops_created, "Simulated activity");
            }
        } else {
            trace!(handle = handle.id(), "Ignoring stale tick");
        }
    }
}

impl SessionController<ManualScheduler> {
    /// Move the simulated clock forward, delivering every tick due on the way.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        while let Some(handle) = self.scheduler.fire_next(deadline) {
            self.handle_tick(handle);
        }
        self.scheduler.settle(deadline);
    }
}
