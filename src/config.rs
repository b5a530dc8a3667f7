use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::mail::types::{Domain, Identities, Participant};
use crate::prefs::Theme;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub accounts: AccountsConfig,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub summary: SummaryConfig,
    /// JSON thread data to load instead of the bundled demo mailbox
    pub seed_file: Option<String>,
    pub theme: ThemesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    pub hogwarts: AccountConfig,
    pub liverpool: AccountConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Display name used on outgoing mail
    pub name: String,
    /// Your address; the last message being from it makes a thread "sent"
    pub email: String,
    /// Appended to reply drafts
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How often snoozed threads are re-evaluated
    pub clock_tick_secs: u64,
    /// How long an archive or delete can be undone
    pub undo_window_secs: u64,
    /// Quiet time after the last resize before the layout is recomputed
    pub resize_debounce_ms: u64,
}

/// Longest accepted timing value; larger settings are clamped to it
const MAX_TIMING_SECS: u64 = 24 * 60 * 60;

impl TimingConfig {
    pub fn clock_tick(&self) -> chrono::Duration {
        clamped_seconds(self.clock_tick_secs)
    }

    pub fn undo_window(&self) -> chrono::Duration {
        clamped_seconds(self.undo_window_secs)
    }

    pub fn resize_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resize_debounce_ms.min(MAX_TIMING_SECS * 1000))
    }
}

fn clamped_seconds(secs: u64) -> chrono::Duration {
    // MAX_TIMING_SECS always fits, so the fallback is never taken
    chrono::Duration::try_seconds(secs.min(MAX_TIMING_SECS) as i64).unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Initial sidebar width in columns
    pub sidebar_width: u16,
    pub sidebar_min: u16,
    pub sidebar_max: u16,
    /// Terminal width below which the sidebar is hidden
    pub compact_below: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Shell command that reads a prompt on stdin and prints a summary.
    /// Unset means the offline digest is used.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    pub dark: ThemeConfig,
    /// Keys missing from a `[theme.light]` table come from [`ThemeConfig::light`]
    #[serde(deserialize_with = "light_palette")]
    pub light: ThemeConfig,
}

/// Overlay a partial `[theme.light]` table on the light palette
fn light_palette<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ThemeConfig, D::Error> {
    use serde::de::Error;

    let overrides = toml::Table::deserialize(deserializer)?;
    let mut merged = match toml::Value::try_from(ThemeConfig::light()).map_err(D::Error::custom)? {
        toml::Value::Table(table) => table,
        _ => toml::Table::new(),
    };
    merged.extend(overrides);
    toml::Value::Table(merged).try_into().map_err(D::Error::custom)
}

/// Semantic palette, hex strings or color names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    // Base colors
    pub bg: String,
    pub bg_panel: String,
    pub bg_element: String,
    pub fg: String,
    pub fg_muted: String,
    pub fg_subtle: String,

    // Border colors
    pub border: String,
    pub border_active: String,

    // Accent colors
    pub primary: String,
    pub secondary: String,

    // Semantic colors
    pub success: String,
    pub warning: String,
    pub error: String,

    // UI-specific mappings
    pub selected_bg: String,
    pub unread: String,
    pub starred: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        let me = Identities::default();
        Self {
            hogwarts: AccountConfig::from(me.hogwarts),
            liverpool: AccountConfig::from(me.liverpool),
        }
    }
}

impl From<Participant> for AccountConfig {
    fn from(p: Participant) -> Self {
        Self {
            name: p.name,
            email: p.email,
            signature: None,
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            signature: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_tick_secs: 30,
            undo_window_secs: 5,
            resize_debounce_ms: 150,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 32,
            sidebar_min: 22,
            sidebar_max: 40,
            compact_below: 100,
        }
    }
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            dark: ThemeConfig::default(),
            light: ThemeConfig::light(),
        }
    }
}

/// Dark parchment: warm browns with gold accents
impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bg: "#1a1917".to_string(),
            bg_panel: "#262422".to_string(),
            bg_element: "#393634".to_string(),
            fg: "#f7f7f5".to_string(),
            fg_muted: "#8c8985".to_string(),
            fg_subtle: "#b8b5b0".to_string(),

            border: "#524f4c".to_string(),
            border_active: "#d4a366".to_string(),

            primary: "#d4a366".to_string(),
            secondary: "#8fa5ae".to_string(),

            success: "#52c41a".to_string(),
            warning: "#faad14".to_string(),
            error: "#ff4d4f".to_string(),

            selected_bg: "#393634".to_string(),
            unread: "#d4a366".to_string(),
            starred: "#faad14".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Light parchment counterpart of the default palette
    pub fn light() -> Self {
        Self {
            bg: "#faf7f0".to_string(),
            bg_panel: "#f0ebe0".to_string(),
            bg_element: "#e2dccd".to_string(),
            fg: "#2b2824".to_string(),
            fg_muted: "#7a756d".to_string(),
            fg_subtle: "#57524b".to_string(),

            border: "#c9c1b1".to_string(),
            border_active: "#9a6b2f".to_string(),

            primary: "#9a6b2f".to_string(),
            secondary: "#3f6b7d".to_string(),

            success: "#2f7d0f".to_string(),
            warning: "#b8770a".to_string(),
            error: "#c8281f".to_string(),

            selected_bg: "#e2dccd".to_string(),
            unread: "#9a6b2f".to_string(),
            starred: "#b8770a".to_string(),
        }
    }

    pub fn bg(&self) -> Color {
        parse_color(&self.bg)
    }
    pub fn bg_panel(&self) -> Color {
        parse_color(&self.bg_panel)
    }
    pub fn bg_element(&self) -> Color {
        parse_color(&self.bg_element)
    }
    pub fn fg(&self) -> Color {
        parse_color(&self.fg)
    }
    pub fn fg_muted(&self) -> Color {
        parse_color(&self.fg_muted)
    }
    pub fn fg_subtle(&self) -> Color {
        parse_color(&self.fg_subtle)
    }
    pub fn border(&self) -> Color {
        parse_color(&self.border)
    }
    pub fn border_active(&self) -> Color {
        parse_color(&self.border_active)
    }
    pub fn primary(&self) -> Color {
        parse_color(&self.primary)
    }
    pub fn secondary(&self) -> Color {
        parse_color(&self.secondary)
    }
    pub fn success(&self) -> Color {
        parse_color(&self.success)
    }
    pub fn warning(&self) -> Color {
        parse_color(&self.warning)
    }
    pub fn error(&self) -> Color {
        parse_color(&self.error)
    }
    pub fn selected_bg(&self) -> Color {
        parse_color(&self.selected_bg)
    }
    pub fn unread(&self) -> Color {
        parse_color(&self.unread)
    }
    pub fn starred(&self) -> Color {
        parse_color(&self.starred)
    }
}

impl Config {
    fn path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("owlpost/config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/owlpost/config.toml"))
    }

    /// Read the config file, falling back to defaults on any problem
    pub fn load() -> Self {
        let config_path = Self::path();

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return config,
                    Err(e) => warn!(path = %config_path.display(), error = %e, "config parse error"),
                },
                Err(e) => warn!(path = %config_path.display(), error = %e, "config read error"),
            }
        }

        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Local sending identity per domain; blank fields keep the defaults
    pub fn identities(&self) -> Identities {
        let defaults = Identities::default();
        let pick = |account: &AccountConfig, fallback: Participant| {
            Participant::new(
                if account.name.is_empty() { fallback.name } else { account.name.clone() },
                if account.email.is_empty() { fallback.email } else { account.email.clone() },
            )
        };
        Identities {
            hogwarts: pick(&self.accounts.hogwarts, defaults.hogwarts),
            liverpool: pick(&self.accounts.liverpool, defaults.liverpool),
        }
    }

    pub fn account(&self, domain: Domain) -> &AccountConfig {
        match domain {
            Domain::Hogwarts => &self.accounts.hogwarts,
            Domain::Liverpool => &self.accounts.liverpool,
        }
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_file
            .as_deref()
            .map(|f| PathBuf::from(shellexpand::tilde(f).into_owned()))
    }

    /// Palette for an already resolved theme
    pub fn palette(&self, theme: Theme) -> &ThemeConfig {
        match theme {
            Theme::Light => &self.theme.light,
            Theme::Dark | Theme::System => &self.theme.dark,
        }
    }
}

/// Parse color string to ratatui Color
pub fn parse_color(s: &str) -> Color {
    // Try hex first (#RRGGBB)
    if s.starts_with('#') && s.len() == 7 && s.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&s[1..3], 16),
            u8::from_str_radix(&s[3..5], 16),
            u8::from_str_radix(&s[5..7], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }

    match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "white" => Color::White,
        _ => Color::Reset,
    }
}
