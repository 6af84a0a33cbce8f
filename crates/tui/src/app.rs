use std::{cmp, collections::VecDeque, io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use musejam_core::{
    catalog::Catalog,
    config::{AppConfig, ThemeConfig},
    models::{BadgeStatus, ChallengeStatus},
    navigation::{ModalContent, ModalId, ProfileTab, ScreenId, VisibleModal},
    profile::{PrivacyFlag, ProfileField, UNTITLED_JAM},
    render::{BadgeAction, BadgeView, ChallengeAction, ChallengeView, IdeaView, ProgressView},
    session::{Action, SessionController},
    timer::{TickHandle, TokioScheduler},
};

use crate::big_digits;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_PROMPT_LEN: usize = 140;
const NOTICE_TICKS: u16 = 16;
const MIN_JAM_MINUTES: u32 = 1;
const MAX_JAM_MINUTES: u32 = 60;
const SPINNER: [&str; 4] = ["🎲", "🎰", "🎲", "🎯"];

#[derive(Debug, Clone)]
struct Theme {
    primary_bg: Color,
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
    on_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_bg: Color::Black,
            primary_fg: Color::White,
            accent: Color::Magenta,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            on_accent: Color::Black,
        }
    }
}

impl Theme {
    fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Theme::default();
        if let Some(color) = config.accent.as_deref().and_then(parse_hex_color) {
            theme.accent = color;
            theme.on_accent = contrast_color(&color, theme.on_accent);
        }
        if let Some(color) = config.background.as_deref().and_then(parse_hex_color) {
            theme.primary_bg = color;
        }
        if let Some(color) = config.foreground.as_deref().and_then(parse_hex_color) {
            theme.primary_fg = color;
        }
        theme
    }

    fn heading(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance =
                0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => fallback,
    }
}

/// What a submitted prompt turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptPurpose {
    JamName,
    Comment,
    Field(ProfileField),
}

/// Single-line text input shown over the current modal.
#[derive(Debug, Clone)]
struct TextPrompt {
    title: String,
    input: String,
    /// Cursor position in characters.
    cursor: usize,
    default: String,
    purpose: PromptPurpose,
}

impl TextPrompt {
    fn new(title: impl Into<String>, default: impl Into<String>, purpose: PromptPurpose) -> Self {
        let default = default.into();
        Self {
            title: title.into(),
            cursor: default.chars().count(),
            input: default.clone(),
            default,
            purpose,
        }
    }

    fn empty(title: impl Into<String>, purpose: PromptPurpose) -> Self {
        Self::new(title, String::new(), purpose)
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.input
            .char_indices()
            .nth(cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.len() as isize) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn insert(&mut self, ch: char) {
        if self.len() >= MAX_PROMPT_LEN || ch.is_control() {
            return;
        }
        let offset = self.byte_offset(self.cursor);
        self.input.insert(offset, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.input.remove(offset);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let offset = self.byte_offset(self.cursor);
            self.input.remove(offset);
        }
    }

    /// Trimmed input, or the default when blank.
    fn value(&self) -> String {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            self.default.clone()
        } else {
            trimmed.to_string()
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Cursors and transient display state that live only in the front end.
struct UiState {
    should_quit: bool,
    jam_minutes: u32,
    progress_cursor: usize,
    post_cursor: usize,
    badge_cursor: usize,
    comment_cursor: usize,
    genre_cursor: usize,
    notices: VecDeque<String>,
    notice_ticks: u16,
    frame: usize,
}

impl UiState {
    fn new(jam_minutes: u32) -> Self {
        Self {
            should_quit: false,
            jam_minutes: jam_minutes.clamp(MIN_JAM_MINUTES, MAX_JAM_MINUTES),
            progress_cursor: 0,
            post_cursor: 0,
            badge_cursor: 0,
            comment_cursor: 0,
            genre_cursor: 0,
            notices: VecDeque::new(),
            notice_ticks: 0,
            frame: 0,
        }
    }

    fn push_notice(&mut self, text: String) {
        if self.notices.is_empty() {
            self.notice_ticks = NOTICE_TICKS;
        }
        self.notices.push_back(text);
    }

    fn current_notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    fn dismiss_notice(&mut self) {
        self.notices.pop_front();
        self.notice_ticks = NOTICE_TICKS;
    }

    fn on_tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.notices.is_empty() {
            return;
        }
        self.notice_ticks = self.notice_ticks.saturating_sub(1);
        if self.notice_ticks == 0 {
            self.dismiss_notice();
        }
    }

    fn adjust_minutes(&mut self, delta: i64) {
        let next = i64::from(self.jam_minutes) + delta;
        self.jam_minutes =
            next.clamp(i64::from(MIN_JAM_MINUTES), i64::from(MAX_JAM_MINUTES)) as u32;
    }
}

/// Step `cursor` by `delta` within `0..len`.
fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).clamp(0, len as isize - 1) as usize
}

/// Terminal front end over a [`SessionController`].
pub struct MusejamApp {
    session: SessionController<TokioScheduler>,
    tick_rx: mpsc::Receiver<TickHandle>,
    theme: Theme,
    ui: UiState,
    prompt: Option<TextPrompt>,
}

impl MusejamApp {
    /// Must be called inside a tokio runtime: the scheduler spawns tasks.
    pub fn new(config: AppConfig, catalog: Catalog) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(64);
        let scheduler = TokioScheduler::new(tick_tx);
        let theme = Theme::from_config(&config.theme);
        let session = SessionController::new(&config, catalog, scheduler);
        let ui = UiState::new(session.default_jam_minutes());
        Self {
            session,
            tick_rx,
            theme,
            ui,
            prompt: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let outcome = self.event_loop(&mut terminal, &mut event_rx).await;
        restore_terminal(&mut terminal)?;
        info!("Session closed");
        outcome
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        event_rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.ui.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    match maybe_event {
                        Some(AppEvent::Input(event)) => self.handle_input(event),
                        Some(AppEvent::Tick) => self.ui.on_tick(),
                        None => break,
                    }
                }
                Some(handle) = self.tick_rx.recv() => {
                    self.session.handle_tick(handle);
                }
            }

            for notice in self.session.drain_notices() {
                self.ui.push_notice(notice.to_string());
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        self.session.dispatch(action);
    }

    fn handle_input(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.ui.should_quit = true;
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if key.code == KeyCode::Esc {
            if self.session.modal().is_some() {
                self.dispatch(Action::Escape);
            } else if self.ui.current_notice().is_some() {
                self.ui.dismiss_notice();
            }
            return;
        }
        if let Some(modal) = self.session.modal().map(|modal| modal.id) {
            self.handle_modal_key(modal, key);
            return;
        }
        if self.handle_global_key(key) {
            return;
        }
        match self.session.screen() {
            ScreenId::Home => self.handle_home_key(key),
            ScreenId::Create => self.handle_create_key(key),
            ScreenId::Community => self.handle_community_key(key),
            ScreenId::Profile => self.handle_profile_key(key),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.ui.should_quit = true,
            KeyCode::Char(ch @ '1'..='4') => {
                let index = ch as usize - '1' as usize;
                self.dispatch(Action::SwitchScreen(ScreenId::ALL[index]));
            }
            KeyCode::Char('n') if self.ui.current_notice().is_some() => {
                self.ui.dismiss_notice()
            }
            _ => return false,
        }
        true
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        let metrics = self.session.catalog().progress.len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.dispatch(Action::CarouselPrev),
            KeyCode::Right | KeyCode::Char('l') => self.dispatch(Action::CarouselNext),
            KeyCode::Enter | KeyCode::Char('o') => {
                let index = self.session.carousel().index();
                if let Some(challenge) = self.session.catalog().challenges.get(index) {
                    let id = challenge.id.clone();
                    self.dispatch(Action::OpenChallenge(id));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.progress_cursor = step(self.ui.progress_cursor, -1, metrics)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.progress_cursor = step(self.ui.progress_cursor, 1, metrics)
            }
            KeyCode::Char('p') => {
                if let Some(metric) = self.session.catalog().progress.get(self.ui.progress_cursor)
                {
                    let id = metric.id.clone();
                    self.dispatch(Action::OpenProgress(id));
                }
            }
            _ => {}
        }
    }

    fn handle_create_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => {
                self.dispatch(Action::StartJam(self.ui.jam_minutes))
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.ui.adjust_minutes(1),
            KeyCode::Char('-') | KeyCode::Down => self.ui.adjust_minutes(-1),
            KeyCode::Char('r') => self.dispatch(Action::SpinRoulette),
            _ => {}
        }
    }

    fn handle_community_key(&mut self, key: KeyEvent) {
        let posts = self.session.feed().posts().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.post_cursor = step(self.ui.post_cursor, -1, posts)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.post_cursor = step(self.ui.post_cursor, 1, posts)
            }
            KeyCode::Char('l') => {
                if let Some(id) = self.selected_post() {
                    self.dispatch(Action::ToggleLike(id));
                }
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                if let Some(id) = self.selected_post() {
                    self.ui.comment_cursor = 0;
                    self.dispatch(Action::OpenComments(id));
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.selected_post() {
                    self.dispatch(Action::StartRemix(id));
                }
            }
            _ => {}
        }
    }

    fn selected_post(&self) -> Option<String> {
        self.session
            .feed()
            .posts()
            .get(self.ui.post_cursor)
            .map(|post| post.id.clone())
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        let badges = self.session.catalog().badges.len();
        match key.code {
            KeyCode::Tab | KeyCode::Char('t') => {
                self.dispatch(Action::SwitchTab(self.session.tab().next()))
            }
            KeyCode::Char('e') => {
                self.ui.genre_cursor = 0;
                self.dispatch(Action::OpenProfileEdit);
            }
            KeyCode::Up | KeyCode::Char('k') if self.session.tab() == ProfileTab::Badges => {
                self.ui.badge_cursor = step(self.ui.badge_cursor, -1, badges)
            }
            KeyCode::Down | KeyCode::Char('j') if self.session.tab() == ProfileTab::Badges => {
                self.ui.badge_cursor = step(self.ui.badge_cursor, 1, badges)
            }
            KeyCode::Enter if self.session.tab() == ProfileTab::Badges => {
                if let Some(badge) = self.session.catalog().badges.get(self.ui.badge_cursor) {
                    let id = badge.id.clone();
                    self.dispatch(Action::OpenBadge(id));
                }
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, modal: ModalId, key: KeyEvent) {
        match modal {
            ModalId::JamSession => self.handle_jam_key(key),
            ModalId::ChallengeDetail => match key.code {
                KeyCode::Char('j') => self.dispatch(Action::JoinChallenge),
                KeyCode::Char('n') => self.dispatch(Action::NotifyWhenLive),
                KeyCode::Char('v') => self.dispatch(Action::ViewSubmissions),
                KeyCode::Char('p') => self.dispatch(Action::PlaySample),
                _ => {}
            },
            ModalId::ProgressDetail => match key.code {
                KeyCode::Char('g') => self.dispatch(Action::SetGoal),
                KeyCode::Char('s') => self.dispatch(Action::ShareProgress),
                _ => {}
            },
            ModalId::BadgeDetail => match key.code {
                KeyCode::Char('s') => self.dispatch(Action::ShareBadge),
                KeyCode::Char('v') => self.dispatch(Action::ViewProgress),
                KeyCode::Enter => self.dispatch(Action::CloseModal),
                _ => {}
            },
            ModalId::ProfileEdit => self.handle_profile_edit_key(key),
            ModalId::Comments => self.handle_comments_key(key),
            ModalId::IdeaRoulette => match key.code {
                KeyCode::Char('r') => self.dispatch(Action::SpinRoulette),
                KeyCode::Enter => self.dispatch(Action::StartRouletteJam),
                _ => {}
            },
        }
    }

    fn handle_jam_key(&mut self, key: KeyEvent) {
        let complete = self
            .session
            .modal()
            .is_some_and(|modal| modal.body == ModalContent::JamComplete);
        match key.code {
            KeyCode::Char('e') if !complete => self.dispatch(Action::EndJam),
            KeyCode::Char('s') | KeyCode::Enter if complete => {
                self.prompt = Some(TextPrompt::empty("Name your jam", PromptPurpose::JamName));
            }
            KeyCode::Char('c') if complete => self.dispatch(Action::SaveJamAndContinue),
            _ => {}
        }
    }

    fn handle_profile_edit_key(&mut self, key: KeyEvent) {
        let Some(draft) = self.session.draft() else {
            return;
        };
        let genres = draft.genres.len();
        let field_prompt = |title: &str, value: &str, field: ProfileField| {
            TextPrompt::new(title, value, PromptPurpose::Field(field))
        };
        match key.code {
            KeyCode::Char('u') => {
                self.prompt = Some(field_prompt("Username", &draft.username, ProfileField::Username))
            }
            KeyCode::Char('b') => {
                self.prompt = Some(field_prompt("Bio", &draft.bio, ProfileField::Bio))
            }
            KeyCode::Char('l') => {
                self.prompt = Some(field_prompt("Location", &draft.location, ProfileField::Location))
            }
            KeyCode::Char('a') => self.dispatch(Action::CycleAvatar),
            KeyCode::Left | KeyCode::Char('h') => {
                self.ui.genre_cursor = step(self.ui.genre_cursor, -1, genres)
            }
            KeyCode::Right => self.ui.genre_cursor = step(self.ui.genre_cursor, 1, genres),
            KeyCode::Char(' ') => {
                if let Some(genre) = draft.genres.get(self.ui.genre_cursor) {
                    let name = genre.name.clone();
                    self.dispatch(Action::ToggleGenre(name));
                }
            }
            KeyCode::Char('P') => self.dispatch(Action::TogglePrivacy(PrivacyFlag::PublicProfile)),
            KeyCode::Char('A') => self.dispatch(Action::TogglePrivacy(PrivacyFlag::ShowActivity)),
            KeyCode::Char('R') => self.dispatch(Action::TogglePrivacy(PrivacyFlag::AllowRemixes)),
            KeyCode::Enter => self.dispatch(Action::SaveProfile),
            _ => {}
        }
    }

    fn handle_comments_key(&mut self, key: KeyEvent) {
        let comments = self.session.feed().comments().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.comment_cursor = step(self.ui.comment_cursor, -1, comments)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.comment_cursor = step(self.ui.comment_cursor, 1, comments)
            }
            KeyCode::Char('l') => self.dispatch(Action::LikeComment(self.ui.comment_cursor)),
            KeyCode::Char('r') => {
                self.dispatch(Action::ReplyToComment(self.ui.comment_cursor));
                self.open_comment_prompt();
            }
            KeyCode::Char('w') | KeyCode::Enter => self.open_comment_prompt(),
            _ => {}
        }
    }

    fn open_comment_prompt(&mut self) {
        let title = self.session.feed().placeholder();
        self.prompt = Some(TextPrompt::empty(title, PromptPurpose::Comment));
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                debug!(purpose = ?prompt.purpose, "Prompt cancelled");
                self.prompt = None;
                self.dispatch(Action::Escape);
            }
            KeyCode::Enter => {
                let value = prompt.value();
                let purpose = prompt.purpose;
                self.prompt = None;
                let action = match purpose {
                    PromptPurpose::JamName => Action::SaveJam(Some(value)),
                    PromptPurpose::Comment => Action::PostComment(value),
                    PromptPurpose::Field(field) => Action::EditProfileField(field, value),
                };
                self.dispatch(action);
                if purpose == PromptPurpose::Comment {
                    self.ui.comment_cursor = 0;
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(
            Block::default().style(
                Style::default()
                    .bg(self.theme.primary_bg)
                    .fg(self.theme.primary_fg),
            ),
            area,
        );

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_nav(frame, layout[0]);
        match self.session.screen() {
            ScreenId::Home => self.draw_home(frame, layout[1]),
            ScreenId::Create => self.draw_create(frame, layout[1]),
            ScreenId::Community => self.draw_community(frame, layout[1]),
            ScreenId::Profile => self.draw_profile(frame, layout[1]),
        }
        self.render_status(frame, layout[2]);

        if let Some(modal) = self.session.modal() {
            self.render_modal(frame, modal);
        }
        if let Some(prompt) = &self.prompt {
            self.render_prompt(frame, prompt);
        }
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let indicators = self.session.router().indicators();
        let titles: Vec<Line> = indicators
            .iter()
            .enumerate()
            .map(|(idx, nav)| Line::from(format!("{} {}", idx + 1, nav.screen.label())))
            .collect();
        let selected = indicators
            .iter()
            .position(|nav| nav.selected)
            .unwrap_or_default();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("musejam"))
            .select(selected)
            .style(Style::default().fg(self.theme.primary_fg))
            .highlight_style(
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(4)])
            .split(area);

        let catalog = self.session.catalog();
        let carousel = self.session.carousel();
        let mut lines = Vec::new();
        if let Some(challenge) = catalog.challenges.get(carousel.index()) {
            lines.push(Line::from(Span::styled(
                challenge.title.clone(),
                self.theme.heading(),
            )));
            let status = match challenge.status {
                ChallengeStatus::Active => "● ACTIVE",
                ChallengeStatus::Upcoming => "○ UPCOMING",
            };
            lines.push(Line::from(format!(
                "{} • {status} • {}",
                challenge.kind, challenge.time_left
            )));
            lines.push(Line::from(format!(
                "👥 {} participants • 🎧 {} submissions",
                challenge.participants, challenge.submissions
            )));
            lines.push(Line::from(challenge.description.clone()));
        } else {
            lines.push(Line::from(Span::styled(
                "No challenges right now",
                self.theme.muted(),
            )));
        }
        lines.push(Line::from(""));
        let dots: Vec<Span> = carousel
            .dots()
            .into_iter()
            .map(|active| {
                if active {
                    Span::styled("● ", Style::default().fg(self.theme.accent))
                } else {
                    Span::styled("○ ", self.theme.muted())
                }
            })
            .collect();
        lines.push(Line::from(dots));

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Challenges"))
            .wrap(Wrap { trim: true });
        frame.render_widget(card, layout[0]);

        let items: Vec<ListItem> = catalog
            .progress
            .iter()
            .map(|metric| ListItem::new(format!("{}  {}", metric.title, metric.value)))
            .collect();
        self.render_list(frame, layout[1], "Your Progress", items, self.ui.progress_cursor);
    }

    fn draw_create(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled("START A JAM", self.theme.heading())),
            Line::from(""),
        ];
        lines.extend(
            big_digits::render(&format!("{}:00", self.ui.jam_minutes))
                .into_iter()
                .map(|row| Line::from(Span::styled(row, Style::default().fg(self.theme.accent)))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "{} ideas saved • press r to let the roulette pick one",
            self.session.catalog().ideas.len()
        )));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Create"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_community(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .session
            .feed()
            .posts()
            .iter()
            .map(|post| {
                let heart = if post.liked { "♥" } else { "♡" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<14}", post.author), self.theme.muted()),
                    Span::raw(format!("{:<22}", post.title)),
                    Span::styled(
                        format!("{heart} {:>4}", post.likes),
                        Style::default().fg(self.theme.danger),
                    ),
                    Span::raw(format!("   💬 {}", post.comments)),
                ]))
            })
            .collect();
        self.render_list(frame, area, "Community", items, self.ui.post_cursor);
    }

    fn draw_profile(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        let profile = self.session.profile();
        let genres: Vec<&str> = profile
            .genres
            .iter()
            .filter(|genre| genre.selected)
            .map(|genre| genre.name.as_str())
            .collect();
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(format!("[{}] ", profile.avatar), self.theme.heading()),
                Span::styled(
                    profile.username.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(profile.bio.clone()),
            Line::from(Span::styled(
                format!("📍 {}", profile.location),
                self.theme.muted(),
            )),
            Line::from(genres.join(" • ")),
            Line::from(format!("🎵 {} loops created", profile.loops_created)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Profile"));
        frame.render_widget(header, layout[0]);

        let tab = self.session.tab();
        let tabs = Tabs::new(
            ProfileTab::ALL
                .iter()
                .map(|tab| Line::from(tab.label()))
                .collect::<Vec<_>>(),
        )
        .block(Block::default().borders(Borders::ALL))
        .select(ProfileTab::ALL.iter().position(|t| *t == tab).unwrap_or_default())
        .highlight_style(self.theme.heading());
        frame.render_widget(tabs, layout[1]);

        match tab {
            ProfileTab::Loops => {
                let items: Vec<ListItem> = profile
                    .saved_jams
                    .iter()
                    .map(|jam| {
                        ListItem::new(format!("{}  {}", jam.saved_at.format("%H:%M"), jam.name))
                    })
                    .collect();
                if items.is_empty() {
                    let empty = Paragraph::new(Span::styled(
                        "No loops saved this session. Start a jam from Create.",
                        self.theme.muted(),
                    ))
                    .block(Block::default().borders(Borders::ALL).title("Loops"));
                    frame.render_widget(empty, layout[2]);
                } else {
                    self.render_list(frame, layout[2], "Loops", items, 0);
                }
            }
            ProfileTab::Badges => {
                let items: Vec<ListItem> = self
                    .session
                    .catalog()
                    .badges
                    .iter()
                    .map(|badge| {
                        let style = match badge.status {
                            BadgeStatus::Earned => Style::default().fg(self.theme.success),
                            BadgeStatus::Locked => self.theme.muted(),
                        };
                        ListItem::new(Line::from(vec![
                            Span::raw(format!("{} ", badge.icon)),
                            Span::styled(badge.title.clone(), style),
                            Span::styled(format!("  {}", badge.status.as_str()), self.theme.muted()),
                        ]))
                    })
                    .collect();
                self.render_list(frame, layout[2], "Badges", items, self.ui.badge_cursor);
            }
            ProfileTab::Stats => {
                let lines: Vec<Line> = self
                    .session
                    .catalog()
                    .progress
                    .iter()
                    .map(|metric| {
                        Line::from(vec![
                            Span::styled(format!("{:<20}", metric.title), self.theme.heading()),
                            Span::raw(metric.value.clone()),
                        ])
                    })
                    .collect();
                let stats = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Stats"));
                frame.render_widget(stats, layout[2]);
            }
        }
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem>,
        cursor: usize,
    ) {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(cursor));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.ui.current_notice() {
            Some(notice) => Line::from(vec![
                Span::styled(
                    notice.replace('\n', " "),
                    Style::default().fg(self.theme.warning),
                ),
                Span::styled(
                    format!("  ({} queued, n to dismiss)", self.ui.notices.len()),
                    self.theme.muted(),
                ),
            ]),
            None => Line::from(Span::styled(self.help_text(), self.theme.muted())),
        };
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn help_text(&self) -> &'static str {
        if self.session.modal().is_some() {
            return "Esc close";
        }
        match self.session.screen() {
            ScreenId::Home => "1-4 screens • ←/→ challenges • Enter open • ↑/↓ p progress • q quit",
            ScreenId::Create => "1-4 screens • Enter start jam • +/- length • r roulette • q quit",
            ScreenId::Community => "1-4 screens • ↑/↓ select • l like • c comments • x remix • q quit",
            ScreenId::Profile => "1-4 screens • t tab • e edit • ↑/↓ Enter badge • q quit",
        }
    }

    fn render_modal(&self, frame: &mut Frame, modal: &VisibleModal) {
        let frame_area = frame.size();
        let width = cmp::min(72_u16, frame_area.width.saturating_sub(4));
        let height = cmp::min(24_u16, frame_area.height.saturating_sub(2));
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .title(modal_title(modal.id));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match (&modal.id, &modal.body) {
            (ModalId::JamSession, ModalContent::JamComplete) => self.render_jam_complete(frame, inner),
            (ModalId::JamSession, _) => self.render_jam(frame, inner),
            (_, ModalContent::Challenge(view)) => self.render_challenge(frame, inner, view),
            (_, ModalContent::Progress(view)) => self.render_progress(frame, inner, view),
            (_, ModalContent::Badge(view)) => self.render_badge(frame, inner, view),
            (_, ModalContent::Idea(view)) => self.render_idea(frame, inner, view),
            (ModalId::IdeaRoulette, _) => self.render_rolling(frame, inner),
            (ModalId::ProfileEdit, _) => self.render_profile_edit(frame, inner),
            (ModalId::Comments, _) => self.render_comments(frame, inner),
            _ => {}
        }
    }

    fn render_jam(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from("")];
        lines.extend(
            big_digits::render(&self.session.timer().display())
                .into_iter()
                .map(|row| Line::from(Span::styled(row, self.theme.heading()))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from("Keep the loop going..."));
        lines.push(Line::from(""));
        lines.push(help_line(&[("e", "end jam"), ("Esc", "close")]));
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_jam_complete(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("🎉 JAM COMPLETE!", self.theme.heading())),
            Line::from(""),
            Line::from("Your loop has been saved!"),
            Line::from(Span::styled(
                format!("Leave the name blank to save as \"{UNTITLED_JAM}\"."),
                self.theme.muted(),
            )),
            Line::from(""),
            help_line(&[("s", "save & view"), ("c", "save & continue"), ("Esc", "close")]),
        ];
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_challenge(&self, frame: &mut Frame, area: Rect, view: &ChallengeView) {
        let status_style = match view.action {
            ChallengeAction::Join => Style::default().fg(self.theme.success),
            ChallengeAction::NotifyWhenLive => Style::default().fg(self.theme.warning),
        };
        let mut lines = vec![
            Line::from(Span::styled(view.title.clone(), self.theme.heading())),
            Line::from(vec![
                Span::raw(format!("{} • ", view.kind)),
                Span::styled(
                    format!("{} {}", view.status_indicator, view.status_text),
                    status_style,
                ),
                Span::raw(format!(" • {}", view.time_left)),
            ]),
            Line::from(format!(
                "👥 {} participants • 🎧 {} submissions",
                view.participants, view.submissions
            )),
            Line::from(""),
            Line::from(view.description.clone()),
            Line::from(""),
            Line::from(Span::styled("REQUIREMENTS", self.theme.heading())),
        ];
        lines.extend(
            view.requirements
                .iter()
                .map(|req| Line::from(format!("• {req}"))),
        );
        if !view.examples.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("EXAMPLES", self.theme.heading())));
            lines.extend(view.examples.iter().map(|example| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", example.avatar), self.theme.heading()),
                    Span::raw(format!("{} – {} ", example.username, example.title)),
                    Span::styled(example.stats.clone(), self.theme.muted()),
                ])
            }));
        }
        lines.push(Line::from(""));
        let primary = match view.action {
            ChallengeAction::Join => ("j", view.action.label()),
            ChallengeAction::NotifyWhenLive => ("n", view.action.label()),
        };
        lines.push(help_line(&[
            primary,
            ("v", "view submissions"),
            ("p", "play sample"),
            ("Esc", "close"),
        ]));
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, view: &ProgressView) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(view.insights.len() as u16 + 2),
            ])
            .split(area);

        let summary = Paragraph::new(vec![
            Line::from(Span::styled(view.title.clone(), self.theme.heading())),
            Line::from(Span::styled(
                view.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(view.description.clone()),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(summary, layout[0]);

        let bars: Vec<(&str, u64)> = view
            .bars
            .iter()
            .map(|bar| (bar.day.as_str(), u64::from(bar.height)))
            .collect();
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title("This week (%)"))
            .data(&bars)
            .max(100)
            .bar_width(5)
            .bar_gap(2)
            .bar_style(Style::default().fg(self.theme.accent))
            .value_style(
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent),
            );
        frame.render_widget(chart, layout[1]);

        let mut lines: Vec<Line> = view
            .insights
            .iter()
            .map(|(icon, text)| Line::from(format!("{icon} {text}")))
            .collect();
        lines.push(help_line(&[("g", "set goal"), ("s", "share"), ("Esc", "close")]));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), layout[2]);
    }

    fn render_badge(&self, frame: &mut Frame, area: Rect, view: &BadgeView) {
        let status_style = match view.status {
            BadgeStatus::Earned => Style::default().fg(self.theme.success),
            BadgeStatus::Locked => self.theme.muted(),
        };
        let mut lines = vec![
            Line::from(Span::styled(view.heading, self.theme.muted())),
            Line::from(""),
            Line::from(Span::styled(
                format!("{}  {}", view.icon, view.title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(view.status_line.clone(), status_style)),
            Line::from(Span::styled(view.rarity_line.clone(), self.theme.heading())),
            Line::from(""),
            Line::from(view.description.clone()),
            Line::from(""),
        ];
        lines.extend(view.requirements.iter().map(|req| {
            let mut spans = vec![Span::raw(format!("{} {}", req.mark, req.text))];
            if let Some(progress) = &req.progress {
                spans.push(Span::styled(format!("  {progress}"), self.theme.muted()));
            }
            Line::from(spans)
        }));
        lines.push(Line::from(""));
        let keys: Vec<(&str, &str)> = view
            .actions
            .iter()
            .map(|action| match action {
                BadgeAction::Share => ("s", action.label()),
                BadgeAction::ViewProgress => ("v", action.label()),
                BadgeAction::Close => ("Enter", action.label()),
            })
            .collect();
        lines.push(help_line(&keys));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_rolling(&self, frame: &mut Frame, area: Rect) {
        let text = if self.session.roulette().is_rolling() {
            format!("{} Rolling...", SPINNER[self.ui.frame % SPINNER.len()])
        } else {
            "Press r to spin".to_string()
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(text, self.theme.heading())),
            Line::from(""),
            help_line(&[("r", "spin again"), ("Esc", "close")]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_idea(&self, frame: &mut Frame, area: Rect, view: &IdeaView) {
        let lines = vec![
            Line::from(Span::styled(view.title.clone(), self.theme.heading())),
            Line::from(Span::styled(view.saved_line.clone(), self.theme.muted())),
            Line::from(""),
            Line::from(view.description.clone()),
            Line::from(""),
            Line::from(view.tags.join(" ")),
            Line::from(format!("⏱ {} minutes", view.duration)),
            Line::from(""),
            help_line(&[
                ("Enter", view.start_label.as_str()),
                ("r", "spin again"),
                ("Esc", "close"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_profile_edit(&self, frame: &mut Frame, area: Rect) {
        let Some(draft) = self.session.draft() else {
            return;
        };
        let toggle = |on: bool| if on { "[x]" } else { "[ ]" };
        let genres: Vec<Span> = draft
            .genres
            .iter()
            .enumerate()
            .flat_map(|(idx, genre)| {
                let mut style = if genre.selected {
                    Style::default()
                        .fg(self.theme.on_accent)
                        .bg(self.theme.accent)
                } else {
                    self.theme.muted()
                };
                if idx == self.ui.genre_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                [Span::styled(genre.name.clone(), style), Span::raw(" ")]
            })
            .collect();
        let lines = vec![
            Line::from(vec![
                Span::styled("Avatar    ", self.theme.muted()),
                Span::styled(draft.avatar.clone(), self.theme.heading()),
            ]),
            Line::from(vec![
                Span::styled("Username  ", self.theme.muted()),
                Span::raw(draft.username.clone()),
            ]),
            Line::from(vec![
                Span::styled("Bio       ", self.theme.muted()),
                Span::raw(draft.bio.clone()),
            ]),
            Line::from(vec![
                Span::styled("Location  ", self.theme.muted()),
                Span::raw(draft.location.clone()),
            ]),
            Line::from(""),
            Line::from(genres),
            Line::from(""),
            Line::from(format!(
                "{} Public profile   {} Show activity   {} Allow remixes",
                toggle(draft.privacy.public_profile),
                toggle(draft.privacy.show_activity),
                toggle(draft.privacy.allow_remixes),
            )),
            Line::from(""),
            help_line(&[
                ("a", "avatar"),
                ("u/b/l", "edit field"),
                ("←/→ space", "genre"),
            ]),
            help_line(&[
                ("P/A/R", "privacy"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_comments(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(area);

        let feed = self.session.feed();
        let heading = self
            .session
            .comments_post()
            .and_then(|id| feed.post(id))
            .map(|post| format!("{} by {}", post.title, post.author))
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Span::styled(heading, self.theme.heading())),
            layout[0],
        );

        let items: Vec<ListItem> = feed
            .comments()
            .iter()
            .map(|comment| {
                let heart = if comment.liked { "♥" } else { "♡" };
                let time = comment
                    .posted_at
                    .map(|at| at.format("%H:%M").to_string())
                    .unwrap_or_else(|| comment.time.clone());
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(comment.author.clone(), self.theme.heading()),
                        Span::styled(format!("  {time}"), self.theme.muted()),
                    ]),
                    Line::from(format!("{}  {heart} {}", comment.text, comment.likes)),
                ])
            })
            .collect();
        self.render_list(frame, layout[1], "Comments", items, self.ui.comment_cursor);

        let footer = vec![
            Line::from(Span::styled(feed.placeholder(), self.theme.muted())),
            help_line(&[
                ("w", "write"),
                ("r", "reply"),
                ("l", "like"),
                ("Esc", "close"),
            ]),
        ];
        frame.render_widget(Paragraph::new(footer), layout[2]);
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &TextPrompt) {
        let frame_area = frame.size();
        let mut width = cmp::min(60_u16, frame_area.width.saturating_sub(4));
        width = cmp::max(width, 24_u16);
        let height = 6_u16.min(frame_area.height.saturating_sub(2)).max(5_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let mut lines = vec![input_line, Line::from("")];
        lines.push(help_line(&[("Enter", "submit"), ("Esc", "close")]));
        if !prompt.default.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Current: {}", prompt.default),
                self.theme.muted(),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.title.clone()),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1);
    }
}

fn modal_title(id: ModalId) -> &'static str {
    match id {
        ModalId::JamSession => "Jam Session",
        ModalId::ChallengeDetail => "Challenge",
        ModalId::ProgressDetail => "Progress",
        ModalId::BadgeDetail => "Badge",
        ModalId::ProfileEdit => "Edit Profile",
        ModalId::Comments => "Comments",
        ModalId::IdeaRoulette => "Idea Roulette",
    }
}

fn help_line<'a>(keys: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, label) in keys {
        spans.push(Span::styled(
            *key,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    Line::from(spans)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("0af"), Some(Color::Rgb(0, 170, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(
            contrast_color(&Color::Rgb(250, 250, 250), Color::Red),
            Color::Black
        );
        assert_eq!(contrast_color(&Color::Rgb(10, 10, 40), Color::Red), Color::White);
        assert_eq!(contrast_color(&Color::Magenta, Color::Red), Color::Red);
    }

    #[test]
    fn theme_applies_overrides() {
        let theme = Theme::from_config(&ThemeConfig {
            accent: Some("#ffffff".to_string()),
            background: Some("bogus".to_string()),
            foreground: None,
        });
        assert_eq!(theme.accent, Color::Rgb(255, 255, 255));
        assert_eq!(theme.on_accent, Color::Black);
        assert_eq!(theme.primary_bg, Color::Black);
    }

    #[test]
    fn prompt_edits_at_cursor() {
        let mut prompt = TextPrompt::new("Bio", "lofi", PromptPurpose::Field(ProfileField::Bio));
        assert_eq!(prompt.cursor, 4);
        prompt.move_home();
        prompt.insert('🎧');
        prompt.insert(' ');
        assert_eq!(prompt.input, "🎧 lofi");
        prompt.move_end();
        prompt.backspace();
        prompt.move_cursor(-10);
        prompt.delete();
        assert_eq!(prompt.input, " lof");
        assert_eq!(prompt.value(), "lof");
    }

    #[test]
    fn blank_prompt_falls_back_to_default() {
        let mut prompt = TextPrompt::new("Username", "YOUR NAME", PromptPurpose::Comment);
        for _ in 0..20 {
            prompt.backspace();
        }
        prompt.insert(' ');
        assert_eq!(prompt.value(), "YOUR NAME");
        assert_eq!(TextPrompt::empty("Jam", PromptPurpose::JamName).value(), "");
    }

    #[test]
    fn notices_expire_after_ticks() {
        let mut ui = UiState::new(5);
        ui.push_notice("first".to_string());
        ui.push_notice("second".to_string());
        for _ in 0..NOTICE_TICKS {
            ui.on_tick();
        }
        assert_eq!(ui.current_notice(), Some("second"));
        ui.dismiss_notice();
        assert_eq!(ui.current_notice(), None);
    }

    #[test]
    fn jam_length_is_clamped() {
        let mut ui = UiState::new(0);
        assert_eq!(ui.jam_minutes, MIN_JAM_MINUTES);
        ui.adjust_minutes(-3);
        assert_eq!(ui.jam_minutes, MIN_JAM_MINUTES);
        ui.adjust_minutes(500);
        assert_eq!(ui.jam_minutes, MAX_JAM_MINUTES);
    }

    fn app() -> MusejamApp {
        let config = AppConfig {
            simulate_activity: false,
            rng_seed: Some(3),
            ..AppConfig::default()
        };
        MusejamApp::new(config, Catalog::builtin())
    }

    fn press(app: &mut MusejamApp, code: KeyCode) {
        app.handle_input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn escape_in_comment_prompt_closes_modal() {
        let mut app = app();
        let post = app.session.feed().posts()[0].id.clone();
        app.dispatch(Action::OpenComments(post));
        press(&mut app, KeyCode::Char('w'));
        assert!(app.prompt.is_some());

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert!(app.session.modal().is_none());
        assert!(app.session.comments_post().is_none());
    }

    #[tokio::test]
    async fn escape_in_jam_name_prompt_closes_modal() {
        let mut app = app();
        app.dispatch(Action::StartJam(5));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(
            app.prompt.as_ref().map(|prompt| prompt.purpose),
            Some(PromptPurpose::JamName)
        );

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert!(app.session.modal().is_none());
    }

    #[test]
    fn cursor_steps_stay_in_bounds() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 1, 3), 2);
        assert_eq!(step(4, 1, 0), 0);
    }
}
