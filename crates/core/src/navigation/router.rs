use std::{fmt, str::FromStr};

use tracing::debug;

use crate::error::ParseIdError;

/// Top-level screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Home,
    Create,
    Community,
    Profile,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [
        ScreenId::Home,
        ScreenId::Create,
        ScreenId::Community,
        ScreenId::Profile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenId::Home => "home",
            ScreenId::Create => "create",
            ScreenId::Community => "community",
            ScreenId::Profile => "profile",
        }
    }

    /// Label shown on the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            ScreenId::Home => "HOME",
            ScreenId::Create => "CREATE",
            ScreenId::Community => "COMMUNITY",
            ScreenId::Profile => "PROFILE",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenId::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s.trim())
            .ok_or_else(|| ParseIdError::new("screen", s))
    }
}

/// A navigation control bound to one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIndicator {
    pub screen: ScreenId,
    pub selected: bool,
}

/// Tracks the single active screen and keeps the nav bar in sync.
#[derive(Debug, Clone)]
pub struct ScreenRouter {
    active: ScreenId,
    indicators: Vec<NavIndicator>,
}

impl ScreenRouter {
    /// Router with one indicator per screen.
    pub fn new(initial: ScreenId) -> Self {
        Self::with_indicators(initial, ScreenId::ALL)
    }

    /// Router where only `bound` screens have a nav indicator.
    pub fn with_indicators(initial: ScreenId, bound: impl IntoIterator<Item = ScreenId>) -> Self {
        let mut router = Self {
            active: initial,
            indicators: bound
                .into_iter()
                .map(|screen| NavIndicator {
                    screen,
                    selected: false,
                })
                .collect(),
        };
        router.activate(initial);
        router
    }

    pub fn active(&self) -> ScreenId {
        self.active
    }

    pub fn is_active(&self, screen: ScreenId) -> bool {
        self.active == screen
    }

    pub fn indicators(&self) -> &[NavIndicator] {
        &self.indicators
    }

    /// Make `screen` the only active screen.
    ///
    /// The indicator bound to `screen` becomes the only selected one. When no
    /// indicator is bound to it the nav bar is left as it was.
    pub fn activate(&mut self, screen: ScreenId) {
        self.active = screen;
        if self.indicators.iter().any(|nav| nav.screen == screen) {
            for nav in &mut self.indicators {
                nav.selected = nav.screen == screen;
            }
        }
        debug!(screen = %screen, "Screen activated");
    }
}

/// Tabs on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileTab {
    Loops,
    Badges,
    Stats,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 3] = [ProfileTab::Loops, ProfileTab::Badges, ProfileTab::Stats];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileTab::Loops => "loops",
            ProfileTab::Badges => "badges",
            ProfileTab::Stats => "stats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileTab::Loops => "LOOPS",
            ProfileTab::Badges => "BADGES",
            ProfileTab::Stats => "STATS",
        }
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> ProfileTab {
        match self {
            ProfileTab::Loops => ProfileTab::Badges,
            ProfileTab::Badges => ProfileTab::Stats,
            ProfileTab::Stats => ProfileTab::Loops,
        }
    }
}

impl FromStr for ProfileTab {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileTab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s.trim())
            .ok_or_else(|| ParseIdError::new("tab", s))
    }
}

/// Single-selection tab strip for the profile screen.
#[derive(Debug, Clone)]
pub struct TabSwitcher {
    active: ProfileTab,
}

impl Default for TabSwitcher {
    fn default() -> Self {
        Self {
            active: ProfileTab::Loops,
        }
    }
}

impl TabSwitcher {
    pub fn active(&self) -> ProfileTab {
        self.active
    }

    pub fn switch(&mut self, tab: ProfileTab) {
        self.active = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(router: &ScreenRouter) -> Vec<ScreenId> {
        router
            .indicators()
            .iter()
            .filter(|nav| nav.selected)
            .map(|nav| nav.screen)
            .collect()
    }

    #[test]
    fn exactly_one_screen_active_after_any_sequence() {
        let mut router = ScreenRouter::new(ScreenId::Home);
        assert_eq!(selected(&router), vec![ScreenId::Home]);

        let sequence = [
            ScreenId::Profile,
            ScreenId::Profile,
            ScreenId::Community,
            ScreenId::Create,
            ScreenId::Home,
            ScreenId::Community,
        ];
        for screen in sequence {
            router.activate(screen);
            assert_eq!(router.active(), screen);
            let active: Vec<_> = ScreenId::ALL
                .into_iter()
                .filter(|candidate| router.is_active(*candidate))
                .collect();
            assert_eq!(active, vec![screen]);
            assert_eq!(selected(&router), vec![screen]);
        }
    }

    #[test]
    fn screen_names_round_trip_and_reject_unknown() {
        for screen in ScreenId::ALL {
            assert_eq!(screen.to_string().parse::<ScreenId>(), Ok(screen));
        }
        assert!("settings".parse::<ScreenId>().is_err());
        assert!("".parse::<ScreenId>().is_err());
    }

    #[test]
    fn unbound_screen_leaves_indicators_untouched() {
        let mut router =
            ScreenRouter::with_indicators(ScreenId::Home, [ScreenId::Home, ScreenId::Community]);
        router.activate(ScreenId::Profile);
        assert_eq!(router.active(), ScreenId::Profile);
        assert_eq!(selected(&router), vec![ScreenId::Home]);

        router.activate(ScreenId::Community);
        assert_eq!(selected(&router), vec![ScreenId::Community]);
    }

    #[test]
    fn tabs_switch_and_cycle() {
        let mut tabs = TabSwitcher::default();
        tabs.switch("stats".parse().expect("tab"));
        assert_eq!(tabs.active(), ProfileTab::Stats);
        assert!("playlists".parse::<ProfileTab>().is_err());
        assert_eq!(tabs.active().next(), ProfileTab::Loops);
    }
}
