//! Palette colors, theme context and color resolution.
//!
//! Hotspot colors are stored either as a palette key (`"green"`) or a
//! literal CSS value (`"#22c55e"`). Palette keys resolve to a different hex
//! value per theme, so resolved colors are re-derived whenever the theme
//! changes.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Effective display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User theme preference; `Auto` follows the system theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemePreference {
    /// Next preference in the toggle cycle `auto -> light -> dark -> auto`.
    pub fn next(self) -> Self {
        match self {
            Self::Auto => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::Auto,
        }
    }

    /// Parse a stored preference, ignoring unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// A light/dark hex pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemedColor {
    pub light: &'static str,
    pub dark: &'static str,
}

impl ThemedColor {
    pub fn for_theme(&self, theme: Theme) -> &'static str {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}

/// Named palette entries, tuned to read well on both themes.
pub const PALETTE: &[(&str, ThemedColor)] = &[
    ("red", ThemedColor { light: "#ef4444", dark: "#f87171" }),
    ("orange", ThemedColor { light: "#f97316", dark: "#fb923c" }),
    ("yellow", ThemedColor { light: "#eab308", dark: "#facc15" }),
    ("green", ThemedColor { light: "#22c55e", dark: "#4ade80" }),
    ("cyan", ThemedColor { light: "#06b6d4", dark: "#22d3ee" }),
    ("purple", ThemedColor { light: "#a855f7", dark: "#c084fc" }),
    ("pink", ThemedColor { light: "#ec4899", dark: "#f472b6" }),
];

/// Look up a palette entry by key.
pub fn palette(name: &str) -> Option<ThemedColor> {
    PALETTE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, color)| *color)
}

/// A hotspot color as authored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorSpec {
    /// Known palette key
    Named(String),
    /// Hex or any other CSS value, used verbatim
    Literal(String),
}

impl ColorSpec {
    pub fn parse(value: &str) -> Self {
        if !value.starts_with('#') && palette(value).is_some() {
            Self::Named(value.to_string())
        } else {
            Self::Literal(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(s) | Self::Literal(s) => s,
        }
    }

    /// Resolve to a concrete CSS color for the given theme.
    pub fn resolve(&self, theme: Theme) -> String {
        match self {
            Self::Named(name) => palette(name)
                .map(|c| c.for_theme(theme).to_string())
                .unwrap_or_else(|| name.clone()),
            Self::Literal(value) => value.clone(),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Named(crate::defaults::HOTSPOT_COLOR.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ColorSpec> for String {
    fn from(value: ColorSpec) -> Self {
        match value {
            ColorSpec::Named(s) | ColorSpec::Literal(s) => s,
        }
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb` or `rrggbb`. Short and named forms are not supported.
    pub fn from_hex(hex: &str) -> Option<Self> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        let re = HEX.get_or_init(|| {
            Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("valid hex regex")
        });

        let caps = re.captures(hex)?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Identifier returned by [`ThemeContext::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn FnMut(Theme) + Send>;

/// Explicit theme state handed to renderers.
///
/// Interactive hosts subscribe to redraw on change; listeners are called
/// only when the effective theme actually changes. Batch renderers read
/// [`Self::effective`] once.
pub struct ThemeContext {
    preference: ThemePreference,
    system: Theme,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: usize,
}

impl ThemeContext {
    pub fn new(preference: ThemePreference, system: Theme) -> Self {
        Self {
            preference,
            system,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Theme renderers should resolve colors against.
    pub fn effective(&self) -> Theme {
        match self.preference {
            ThemePreference::Auto => self.system,
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Theme) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }

    pub fn set_preference(&mut self, preference: ThemePreference) {
        self.update(|ctx| ctx.preference = preference);
    }

    /// Cycle the preference, as the theme indicator click does.
    pub fn toggle(&mut self) -> ThemePreference {
        let next = self.preference.next();
        self.set_preference(next);
        next
    }

    /// Record a system theme change. Only observable in `Auto`.
    pub fn set_system(&mut self, system: Theme) {
        self.update(|ctx| ctx.system = system);
    }

    fn update(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.effective();
        change(self);
        let after = self.effective();
        if before != after {
            tracing::debug!("Theme changed to {:?}", after);
            for (_, listener) in &mut self.listeners {
                listener(after);
            }
        }
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(ThemePreference::Auto, Theme::Light)
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("preference", &self.preference)
            .field("system", &self.system)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
