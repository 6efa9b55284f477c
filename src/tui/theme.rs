use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::model::Settings;

/// The 16 classic terminal colors, plus "leave as is" and "reset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnsiColor {
    #[default]
    None,
    Reset,
    Black,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Gray,
    DarkGray,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    /// SGR code when used as a foreground. `None` emits nothing.
    pub fn fg_code(self) -> Option<u8> {
        use AnsiColor::*;
        let code = match self {
            None => return Option::None,
            Reset => 0,
            Black => 30,
            DarkRed => 31,
            DarkGreen => 32,
            DarkYellow => 33,
            DarkBlue => 34,
            DarkMagenta => 35,
            DarkCyan => 36,
            Gray => 37,
            DarkGray => 90,
            Red => 91,
            Green => 92,
            Yellow => 93,
            Blue => 94,
            Magenta => 95,
            Cyan => 96,
            White => 97,
        };
        Some(code)
    }

    /// SGR code when used as a background.
    pub fn bg_code(self) -> Option<u8> {
        match self {
            AnsiColor::Reset => Some(0),
            other => other.fg_code().map(|code| code + 10),
        }
    }

    /// Parse a color name such as `darkred` or `Cyan` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        use AnsiColor::*;
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "none" => None,
            "reset" => Reset,
            "black" => Black,
            "darkred" => DarkRed,
            "darkgreen" => DarkGreen,
            "darkyellow" => DarkYellow,
            "darkblue" => DarkBlue,
            "darkmagenta" => DarkMagenta,
            "darkcyan" => DarkCyan,
            "gray" | "grey" => Gray,
            "darkgray" | "darkgrey" => DarkGray,
            "red" => Red,
            "green" => Green,
            "yellow" => Yellow,
            "blue" => Blue,
            "magenta" => Magenta,
            "cyan" => Cyan,
            "white" => White,
            _ => return Option::None,
        };
        Some(color)
    }
}

/// Wrap `text` in a single SGR effect.
fn sgr(code: Option<u8>, text: &str) -> String {
    match code {
        Some(code) => format!("\x1b[1;{}m{}\x1b[0m", code, text),
        None => text.to_string(),
    }
}

/// Apply a background, then a foreground, to `text`.
pub fn style(fg: AnsiColor, bg: AnsiColor, text: &str) -> String {
    sgr(fg.fg_code(), &sgr(bg.bg_code(), text))
}

/// A foreground/background pair for one theme role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: AnsiColor,
    pub bg: AnsiColor,
}

impl Style {
    pub const fn new(fg: AnsiColor, bg: AnsiColor) -> Self {
        Style { fg, bg }
    }

    pub const fn fg(fg: AnsiColor) -> Self {
        Style {
            fg,
            bg: AnsiColor::None,
        }
    }

    pub fn paint(&self, text: &str) -> String {
        style(self.fg, self.bg, text)
    }
}

/// A color override from the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// `Color(fg, bg)`
    Both(AnsiColor, AnsiColor),
    /// `Fg(color)`
    Fg(AnsiColor),
    /// `Bg(color)`
    Bg(AnsiColor),
}

const COLOR_SPEC_PATTERN: &str =
    r"(?i)^\s*(color|fg|bg)\s*\(\s*([a-z]{1,20})\s*(?:,\s*([a-z]{1,20})\s*)?\)\s*$";

/// Parse `Color(Red, Yellow)`, `Fg(Blue)` or `Bg(DarkGray)`.
pub fn parse_color_spec(value: &str) -> Option<ColorSpec> {
    let re = Regex::new(COLOR_SPEC_PATTERN).ok()?;
    let caps = re.captures(value)?;
    let first = AnsiColor::from_name(&caps[2])?;
    let second = caps.get(3).map(|m| AnsiColor::from_name(m.as_str()));
    match (caps[1].to_ascii_lowercase().as_str(), second) {
        ("color", Some(Some(bg))) => Some(ColorSpec::Both(first, bg)),
        ("fg", None) => Some(ColorSpec::Fg(first)),
        ("bg", None) => Some(ColorSpec::Bg(first)),
        _ => None,
    }
}

impl ColorSpec {
    fn apply(self, style: &mut Style) {
        match self {
            ColorSpec::Both(fg, bg) => *style = Style::new(fg, bg),
            ColorSpec::Fg(fg) => style.fg = fg,
            ColorSpec::Bg(bg) => style.bg = bg,
        }
    }
}

/// Theme display name. Custom themes are presets with color overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeName {
    pub base: String,
    pub custom: bool,
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.custom {
            write!(f, "Custom({})", self.base)
        } else {
            f.write_str(&self.base)
        }
    }
}

/// Resolved colors for every UI role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    pub help_mode_header: Style,
    pub help_mode_text: Style,
    pub help_mode_key: Style,
    pub help_line: Style,
    pub todo_item_header: Style,
    pub todo_item: Style,
    pub todo_item_selected: Style,
    pub todo_item_urgent: Style,
    pub todo_item_urgent_selected: Style,
    pub step: Style,
    pub step_selected: Style,
    pub step_completed: Style,
    pub step_completed_selected: Style,
    pub step_active: Style,
    pub step_active_selected: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        use AnsiColor::*;
        Theme {
            name: ThemeName {
                base: "Light".into(),
                custom: false,
            },
            help_mode_header: Style::fg(DarkBlue),
            help_mode_text: Style::fg(Black),
            help_mode_key: Style::fg(Green),
            help_line: Style::fg(Green),
            todo_item_header: Style::fg(Magenta),
            todo_item: Style::default(),
            todo_item_selected: Style::fg(Cyan),
            todo_item_urgent: Style::default(),
            todo_item_urgent_selected: Style::fg(Cyan),
            step: Style::default(),
            step_selected: Style::fg(Cyan),
            step_completed: Style::fg(DarkGray),
            step_completed_selected: Style::fg(Cyan),
            step_active: Style::new(Black, Yellow),
            step_active_selected: Style::new(White, Blue),
        }
    }

    pub fn dark() -> Self {
        use AnsiColor::*;
        Theme {
            name: ThemeName {
                base: "Dark".into(),
                custom: false,
            },
            help_mode_header: Style::fg(DarkCyan),
            help_mode_text: Style::fg(White),
            step_active: Style::new(Blue, DarkGray),
            ..Theme::light()
        }
    }

    /// Look up a preset by name (`dark` / `light`, case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::dark()),
            "light" => Some(Theme::light()),
            _ => None,
        }
    }

    /// Resolve the theme described by `settings`: the named preset (dark
    /// when unset, light when unknown) with color overrides applied.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut theme = match settings.theme.as_deref() {
            None => Theme::dark(),
            Some(name) => Theme::preset(name).unwrap_or_else(|| {
                warn!(theme = name, "unknown theme, using light");
                Theme::light()
            }),
        };

        for (key, value) in &settings.colors {
            let Some(spec) = parse_color_spec(value) else {
                warn!(key = key.as_str(), value = value.as_str(), "unparsable color setting");
                continue;
            };
            match theme.role_mut(key) {
                Some(style) => spec.apply(style),
                None => {
                    warn!(key = key.as_str(), "unknown color setting");
                    continue;
                }
            }
            theme.name.custom = true;
        }

        theme
    }

    /// Mutable access to a role by its settings key. Keys are matched
    /// case-insensitively and underscores are ignored.
    pub fn role_mut(&mut self, key: &str) -> Option<&mut Style> {
        let key: String = key
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let role = match key.as_str() {
            "helpmodeheader" => &mut self.help_mode_header,
            "helpmodetext" => &mut self.help_mode_text,
            "helpmodekey" => &mut self.help_mode_key,
            "helpline" => &mut self.help_line,
            "todoitemheader" => &mut self.todo_item_header,
            "todoitem" => &mut self.todo_item,
            "todoitemselected" => &mut self.todo_item_selected,
            "todoitemurgent" => &mut self.todo_item_urgent,
            "todoitemurgentselected" => &mut self.todo_item_urgent_selected,
            "step" => &mut self.step,
            "stepselected" => &mut self.step_selected,
            "stepcompleted" => &mut self.step_completed,
            "stepcompletedselected" => &mut self.step_completed_selected,
            "stepactive" => &mut self.step_active,
            "stepactiveselected" => &mut self.step_active_selected,
            _ => return None,
        };
        Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn foreground_codes() {
        assert_eq!(AnsiColor::None.fg_code(), None);
        assert_eq!(AnsiColor::Reset.fg_code(), Some(0));
        assert_eq!(AnsiColor::Black.fg_code(), Some(30));
        assert_eq!(AnsiColor::Gray.fg_code(), Some(37));
        assert_eq!(AnsiColor::DarkGray.fg_code(), Some(90));
        assert_eq!(AnsiColor::White.fg_code(), Some(97));
    }

    #[test]
    fn background_codes() {
        assert_eq!(AnsiColor::None.bg_code(), None);
        assert_eq!(AnsiColor::Reset.bg_code(), Some(0));
        assert_eq!(AnsiColor::DarkRed.bg_code(), Some(41));
        assert_eq!(AnsiColor::Blue.bg_code(), Some(104));
    }

    #[test]
    fn style_applies_background_inside_foreground() {
        assert_eq!(
            style(AnsiColor::White, AnsiColor::Blue, "hi"),
            "\x1b[1;97m\x1b[1;104mhi\x1b[0m\x1b[0m"
        );
        assert_eq!(
            style(AnsiColor::Green, AnsiColor::None, "ok"),
            "\x1b[1;92mok\x1b[0m"
        );
        assert_eq!(style(AnsiColor::None, AnsiColor::None, "plain"), "plain");
    }

    #[test]
    fn color_names_are_case_insensitive() {
        assert_eq!(AnsiColor::from_name("DarkRed"), Some(AnsiColor::DarkRed));
        assert_eq!(AnsiColor::from_name(" cyan "), Some(AnsiColor::Cyan));
        assert_eq!(AnsiColor::from_name("purple"), None);
    }

    #[test]
    fn presets_differ_where_expected() {
        let light = Theme::light();
        let dark = Theme::dark();
        assert_eq!(dark.name.to_string(), "Dark");
        assert_eq!(light.name.to_string(), "Light");
        assert_eq!(dark.help_mode_text, Style::fg(AnsiColor::White));
        assert_eq!(light.help_mode_text, Style::fg(AnsiColor::Black));
        assert_eq!(dark.step_selected, light.step_selected);
    }

    #[test]
    fn role_lookup_ignores_case_and_underscores() {
        let mut theme = Theme::dark();
        assert!(theme.role_mut("help_mode_key").is_some());
        assert!(theme.role_mut("HelpModeKey").is_some());
        assert!(theme.role_mut("stepactiveselected").is_some());
        assert!(theme.role_mut("nope").is_none());
    }

    #[test]
    fn color_spec_forms() {
        assert_eq!(
            parse_color_spec("Color(Red, Yellow)"),
            Some(ColorSpec::Both(AnsiColor::Red, AnsiColor::Yellow))
        );
        assert_eq!(
            parse_color_spec("color( darkgray ,blue )"),
            Some(ColorSpec::Both(AnsiColor::DarkGray, AnsiColor::Blue))
        );
        assert_eq!(parse_color_spec("FG(cyan)"), Some(ColorSpec::Fg(AnsiColor::Cyan)));
        assert_eq!(parse_color_spec("Bg(White)"), Some(ColorSpec::Bg(AnsiColor::White)));
    }

    #[test]
    fn color_spec_rejects_garbage() {
        assert_eq!(parse_color_spec("Color(Red)"), None);
        assert_eq!(parse_color_spec("Fg(Red, Blue)"), None);
        assert_eq!(parse_color_spec("Fg(Purple)"), None);
        assert_eq!(parse_color_spec("red"), None);
    }

    #[test]
    fn theme_from_default_settings_is_dark() {
        let theme = Theme::from_settings(&Settings::default());
        assert_eq!(theme, Theme::dark());
    }

    #[test]
    fn theme_from_settings_applies_overrides() {
        let mut settings = Settings {
            theme: Some("light".into()),
            ..Default::default()
        };
        settings
            .colors
            .insert("help_mode_key".into(), "Color(Red, Yellow)".into());
        settings.colors.insert("StepActive".into(), "Fg(Cyan)".into());
        settings.colors.insert("bogus".into(), "Fg(Cyan)".into());

        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.name.to_string(), "Custom(Light)");
        assert_eq!(theme.help_mode_key, Style::new(AnsiColor::Red, AnsiColor::Yellow));
        assert_eq!(theme.step_active, Style::new(AnsiColor::Cyan, AnsiColor::Yellow));
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let settings = Settings {
            theme: Some("solarized".into()),
            ..Default::default()
        };
        assert_eq!(Theme::from_settings(&settings).name.to_string(), "Light");
    }

    #[test]
    fn custom_name_display() {
        let name = ThemeName {
            base: "Dark".into(),
            custom: true,
        };
        assert_eq!(name.to_string(), "Custom(Dark)");
    }
}
