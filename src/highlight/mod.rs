//! Syntax highlighting for code fences.
//!
//! Uses syntect with the bundled Sublime Text syntax definitions and emits
//! HTML with inline styles.

use std::sync::{Mutex, OnceLock};

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Highlight `code` as HTML.
///
/// `language` is the fence's language tag. It is looked up by file token
/// (`rs`, `py`) and then by syntax name (`Rust`); when it is missing or not
/// recognized the first line of the code is used to detect the language
/// (shebangs, modelines, `<?xml`), and plain text is the last resort.
///
/// # Errors
/// Returns an error if syntect fails while highlighting.
pub fn highlight_html(language: Option<&str>, code: &str) -> Result<String, syntect::Error> {
    let syntax_set = syntax_set();
    let syntax = resolve_syntax(syntax_set, language, code);
    highlighted_html_for_string(code, syntax_set, syntax, theme())
}

/// Name of the syntax that [`highlight_html`] would use.
pub fn detected_language(language: Option<&str>, code: &str) -> String {
    resolve_syntax(syntax_set(), language, code).name.clone()
}

fn resolve_syntax<'a>(
    syntax_set: &'a SyntaxSet,
    language: Option<&str>,
    code: &str,
) -> &'a SyntaxReference {
    language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .or_else(|| language.and_then(|lang| syntax_set.find_syntax_by_name(lang)))
        .or_else(|| {
            code.lines()
                .next()
                .and_then(|line| syntax_set.find_syntax_by_first_line(line))
        })
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn theme() -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();
    match background_mode() {
        BackgroundMode::Dark => DARK.get_or_init(|| {
            pick_theme(&["base16-ocean.dark", "Solarized (dark)", "base16-eighties.dark"])
        }),
        BackgroundMode::Light => LIGHT.get_or_init(|| {
            pick_theme(&["InspiredGitHub", "Solarized (light)", "base16-ocean.light"])
        }),
    }
}

fn pick_theme(preferred: &[&str]) -> Theme {
    let theme_set = theme_set();
    for name in preferred {
        if let Some(theme) = theme_set.themes.get(*name) {
            return theme.clone();
        }
    }

    theme_set
        .themes
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Force the highlight theme to a light or dark palette, or `None` to detect
/// it from `COLORFGBG`.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock() {
        if let Some(mode) = *guard {
            return match mode {
                HighlightBackground::Light => BackgroundMode::Light,
                HighlightBackground::Dark => BackgroundMode::Dark,
            };
        }
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Light;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Light;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}
