//! Mutually exclusive toggle groups and the theme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::search::SearchMode;

use super::{
    PreferenceError, PreferenceStore, MATCH_ON, MULTIPLE_TICKETS_ON, PHONE_ON, SEMANTIC_ON,
    SINGLE_TICKET_ON, THEME, TICKET_ON,
};

/// Icon file for a toggle: `<base>_<on|off>_<light|dark>.svg`.
pub fn icon_name(base: &str, on: bool, theme: Theme) -> String {
    format!(
        "{}_{}_{}.svg",
        base,
        if on { "on" } else { "off" },
        theme.as_str()
    )
}

fn search_key(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Phone => PHONE_ON,
        SearchMode::Match => MATCH_ON,
        SearchMode::Semantic => SEMANTIC_ON,
        SearchMode::Ticket => TICKET_ON,
    }
}

fn search_icon(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Phone => "phone_icon",
        SearchMode::Match => "sentence_match_icon",
        SearchMode::Semantic => "abc_icon",
        SearchMode::Ticket => "ticket_icon",
    }
}

// ============================================================================
// Search toggles
// ============================================================================

/// The four search-mode toggles. Phone is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToggles {
    enabled: [bool; 4],
}

impl Default for SearchToggles {
    fn default() -> Self {
        Self {
            enabled: [true, false, false, false],
        }
    }
}

impl SearchToggles {
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        let mut toggles = Self::default();
        for (slot, mode) in SearchMode::ALL.into_iter().enumerate() {
            toggles.enabled[slot] = store.get_bool(search_key(mode), toggles.enabled[slot])?;
        }
        Ok(toggles)
    }

    pub fn is_on(&self, mode: SearchMode) -> bool {
        self.enabled[slot(mode)]
    }

    /// First enabled mode in toggle order, phone when none is on.
    pub fn active_mode(&self) -> SearchMode {
        SearchMode::ALL
            .into_iter()
            .find(|mode| self.is_on(*mode))
            .unwrap_or_default()
    }

    /// Turn `mode` on and every other toggle off, persisting all four.
    pub fn set_mode(
        &mut self,
        store: &mut dyn PreferenceStore,
        mode: SearchMode,
    ) -> Result<(), PreferenceError> {
        for other in SearchMode::ALL {
            let on = other == mode;
            self.enabled[slot(other)] = on;
            store.set_bool(search_key(other), on)?;
        }
        tracing::debug!(mode = %mode, "Search mode set");
        Ok(())
    }

    pub fn icon(&self, mode: SearchMode, theme: Theme) -> String {
        icon_name(search_icon(mode), self.is_on(mode), theme)
    }
}

fn slot(mode: SearchMode) -> usize {
    SearchMode::ALL
        .iter()
        .position(|m| *m == mode)
        .unwrap_or_default()
}

// ============================================================================
// Assignment toggles
// ============================================================================

/// Whether advice is requested for one ticket or for the validation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    #[default]
    Single,
    Multiple,
}

impl AssignmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMode::Single => "single",
            AssignmentMode::Multiple => "multiple",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            AssignmentMode::Single => "Get advice on ticket assignment. Enter a ticket number.",
            AssignmentMode::Multiple => {
                "Batch ticket assignment will be available in a future update."
            }
        }
    }

    fn key(&self) -> &'static str {
        match self {
            AssignmentMode::Single => SINGLE_TICKET_ON,
            AssignmentMode::Multiple => MULTIPLE_TICKETS_ON,
        }
    }

    fn icon_base(&self) -> &'static str {
        match self {
            AssignmentMode::Single => "single_ticket_icon",
            AssignmentMode::Multiple => "multiple_tickets_icon",
        }
    }
}

impl fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentMode {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(AssignmentMode::Single),
            "multiple" => Ok(AssignmentMode::Multiple),
            _ => Err(PreferenceError::UnknownValue {
                kind: "assignment mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Single/multiple assignment toggles. Single is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentToggles {
    single: bool,
    multiple: bool,
}

impl Default for AssignmentToggles {
    fn default() -> Self {
        Self {
            single: true,
            multiple: false,
        }
    }
}

impl AssignmentToggles {
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        let defaults = Self::default();
        Ok(Self {
            single: store.get_bool(SINGLE_TICKET_ON, defaults.single)?,
            multiple: store.get_bool(MULTIPLE_TICKETS_ON, defaults.multiple)?,
        })
    }

    /// Single when its toggle is on, multiple otherwise.
    pub fn mode(&self) -> AssignmentMode {
        if self.single {
            AssignmentMode::Single
        } else {
            AssignmentMode::Multiple
        }
    }

    pub fn is_on(&self, mode: AssignmentMode) -> bool {
        match mode {
            AssignmentMode::Single => self.single,
            AssignmentMode::Multiple => self.multiple,
        }
    }

    /// Switch to `mode`. Returns `false` without writing when it is already
    /// the active mode.
    pub fn set_mode(
        &mut self,
        store: &mut dyn PreferenceStore,
        mode: AssignmentMode,
    ) -> Result<bool, PreferenceError> {
        if self.mode() == mode {
            return Ok(false);
        }
        self.single = mode == AssignmentMode::Single;
        self.multiple = mode == AssignmentMode::Multiple;
        for m in [AssignmentMode::Single, AssignmentMode::Multiple] {
            store.set_bool(m.key(), self.is_on(m))?;
        }
        tracing::debug!(mode = %mode, "Assignment mode set");
        Ok(true)
    }

    pub fn icon(&self, mode: AssignmentMode, theme: Theme) -> String {
        icon_name(mode.icon_base(), self.is_on(mode), theme)
    }
}

// ============================================================================
// Theme
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than a stored `"dark"` reads as light.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        Ok(match store.get(THEME)?.as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        })
    }

    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<(), PreferenceError> {
        store.set(THEME, self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(PreferenceError::UnknownValue {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferenceStore;

    #[test]
    fn test_search_defaults_to_phone() {
        let store = MemoryPreferenceStore::new();
        let toggles = SearchToggles::load(&store).unwrap();
        assert!(toggles.is_on(SearchMode::Phone));
        assert_eq!(toggles.active_mode(), SearchMode::Phone);
    }

    #[test]
    fn test_search_active_mode_follows_toggle_order() {
        let mut store = MemoryPreferenceStore::new();
        store.set("phoneOn", "false").unwrap();
        store.set("semanticOn", "true").unwrap();
        store.set("ticketOn", "true").unwrap();

        let toggles = SearchToggles::load(&store).unwrap();
        assert_eq!(toggles.active_mode(), SearchMode::Semantic);
    }

    #[test]
    fn test_search_none_enabled_falls_back_to_phone() {
        let mut store = MemoryPreferenceStore::new();
        store.set("phoneOn", "false").unwrap();
        let toggles = SearchToggles::load(&store).unwrap();
        assert_eq!(toggles.active_mode(), SearchMode::Phone);
    }

    #[test]
    fn test_search_set_mode_is_exclusive_and_persisted() {
        let mut store = MemoryPreferenceStore::new();
        let mut toggles = SearchToggles::load(&store).unwrap();

        toggles.set_mode(&mut store, SearchMode::Ticket).unwrap();

        assert_eq!(toggles.active_mode(), SearchMode::Ticket);
        assert_eq!(store.get("phoneOn").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("matchOn").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("semanticOn").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("ticketOn").unwrap().as_deref(), Some("true"));
        assert_eq!(SearchToggles::load(&store).unwrap(), toggles);
    }

    #[test]
    fn test_assignment_mode_switch() {
        let mut store = MemoryPreferenceStore::new();
        let mut toggles = AssignmentToggles::load(&store).unwrap();
        assert_eq!(toggles.mode(), AssignmentMode::Single);

        assert!(!toggles.set_mode(&mut store, AssignmentMode::Single).unwrap());
        assert_eq!(store.get("singleTicketOn").unwrap(), None);

        assert!(toggles.set_mode(&mut store, AssignmentMode::Multiple).unwrap());
        assert_eq!(store.get("singleTicketOn").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("multipleTicketsOn").unwrap().as_deref(), Some("true"));
        assert_eq!(
            AssignmentToggles::load(&store).unwrap().mode(),
            AssignmentMode::Multiple
        );
    }

    #[test]
    fn test_theme_load_and_save() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Light);

        Theme::Dark.save(&mut store).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);

        store.set("theme", "solarized").unwrap();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn test_icon_names() {
        assert_eq!(
            icon_name("phone_icon", true, Theme::Dark),
            "phone_icon_on_dark.svg"
        );
        let toggles = SearchToggles::default();
        assert_eq!(
            toggles.icon(SearchMode::Semantic, Theme::Light),
            "abc_icon_off_light.svg"
        );
        assert_eq!(
            AssignmentToggles::default().icon(AssignmentMode::Single, Theme::Light),
            "single_ticket_icon_on_light.svg"
        );
    }

    #[test]
    fn test_parse_values() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(
            "multiple".parse::<AssignmentMode>().unwrap(),
            AssignmentMode::Multiple
        );
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
