//! Every setting the greeter reads, with its group, key and default

use serde::Serialize;
use std::fmt::Display;

use crate::constants::groups::{GREETER, HOTKEYS, THEME};
use crate::constants::sentinels::{EMPTY_BACKGROUND_IMAGE, UNCHANGED_USER};
use crate::keyfile::{KeyFileError, KeyFileSource};

/// A single `group`/`key` with a typed default literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setting<T: 'static> {
    pub group: &'static str,
    pub key: &'static str,
    pub default: T,
}

/// Literal types a setting default can have
pub trait SettingValue: Copy + Display {
    type Owned;

    fn read<S: KeyFileSource + ?Sized>(
        source: &S,
        group: &str,
        key: &str,
    ) -> Result<Self::Owned, KeyFileError>;

    fn into_owned(self) -> Self::Owned;
}

impl SettingValue for &'static str {
    type Owned = String;

    fn read<S: KeyFileSource + ?Sized>(source: &S, group: &str, key: &str) -> Result<String, KeyFileError> {
        source.get_string(group, key)
    }

    fn into_owned(self) -> String {
        self.to_string()
    }
}

impl SettingValue for bool {
    type Owned = bool;

    fn read<S: KeyFileSource + ?Sized>(source: &S, group: &str, key: &str) -> Result<bool, KeyFileError> {
        source.get_boolean(group, key)
    }

    fn into_owned(self) -> bool {
        self
    }
}

impl SettingValue for i32 {
    type Owned = i32;

    fn read<S: KeyFileSource + ?Sized>(source: &S, group: &str, key: &str) -> Result<i32, KeyFileError> {
        source.get_integer(group, key)
    }

    fn into_owned(self) -> i32 {
        self
    }
}

impl<T: SettingValue> Setting<T> {
    /// The stored value, or `None` when missing or not coercible
    pub fn read<S: KeyFileSource + ?Sized>(&self, source: &S) -> Option<T::Owned> {
        T::read(source, self.group, self.key).ok()
    }

    /// The stored value, falling back to the default
    pub fn resolve<S: KeyFileSource + ?Sized>(&self, source: &S) -> T::Owned {
        self.read(source).unwrap_or_else(|| self.default.into_owned())
    }

    pub fn describe(&self) -> SettingDescription {
        SettingDescription {
            group: self.group,
            key: self.key,
            default: self.default.to_string(),
        }
    }
}

/// Printable summary of a setting, used by `--dump-defaults`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingDescription {
    pub group: &'static str,
    pub key: &'static str,
    pub default: String,
}

const fn setting<T: 'static>(group: &'static str, key: &'static str, default: T) -> Setting<T> {
    Setting { group, key, default }
}

// [greeter]
pub const USER: Setting<&str> = setting(GREETER, "user", UNCHANGED_USER);
pub const SHOW_PASSWORD_LABEL: Setting<bool> = setting(GREETER, "show-password-label", true);
pub const PASSWORD_LABEL_TEXT: Setting<&str> = setting(GREETER, "password-label-text", "Password:");
pub const SHOW_INPUT_CURSOR: Setting<bool> = setting(GREETER, "show-input-cursor", true);

// [greeter-hotkeys]
pub const SUSPEND_KEY: Setting<&str> = setting(HOTKEYS, "suspend-key", "u");
pub const HIBERNATE_KEY: Setting<&str> = setting(HOTKEYS, "hibernate-key", "h");
pub const RESTART_KEY: Setting<&str> = setting(HOTKEYS, "restart-key", "r");
pub const SHUTDOWN_KEY: Setting<&str> = setting(HOTKEYS, "shutdown-key", "s");
pub const MOD_KEY: Setting<&str> = setting(HOTKEYS, "mod-key", "meta");

// [greeter-theme]
pub const FONT: Setting<&str> = setting(THEME, "font", "Sans");
pub const FONT_SIZE: Setting<&str> = setting(THEME, "font-size", "1em");
pub const TEXT_COLOR: Setting<&str> = setting(THEME, "text-color", "#080800");
pub const ERROR_COLOR: Setting<&str> = setting(THEME, "error-color", "#F8F8F0");
pub const BACKGROUND_IMAGE: Setting<&str> = setting(THEME, "background-image", EMPTY_BACKGROUND_IMAGE);
pub const BACKGROUND_COLOR: Setting<&str> = setting(THEME, "background-color", "#1B1D1E");
pub const WINDOW_COLOR: Setting<&str> = setting(THEME, "window-color", "#F92672");
pub const BORDER_COLOR: Setting<&str> = setting(THEME, "border-color", "#080800");
pub const PASSWORD_COLOR: Setting<&str> = setting(THEME, "password-color", "#F8F8F0");
pub const PASSWORD_BACKGROUND_COLOR: Setting<&str> =
    setting(THEME, "password-background-color", "#1B1D1E");
pub const BORDER_WIDTH: Setting<&str> = setting(THEME, "border-width", "2px");
pub const LAYOUT_SPACE: Setting<i32> = setting(THEME, "layout-space", 15);

/// Every known setting, in file order
pub fn all() -> Vec<SettingDescription> {
    vec![
        USER.describe(),
        SHOW_PASSWORD_LABEL.describe(),
        PASSWORD_LABEL_TEXT.describe(),
        SHOW_INPUT_CURSOR.describe(),
        SUSPEND_KEY.describe(),
        HIBERNATE_KEY.describe(),
        RESTART_KEY.describe(),
        SHUTDOWN_KEY.describe(),
        MOD_KEY.describe(),
        FONT.describe(),
        FONT_SIZE.describe(),
        TEXT_COLOR.describe(),
        ERROR_COLOR.describe(),
        BACKGROUND_IMAGE.describe(),
        BACKGROUND_COLOR.describe(),
        WINDOW_COLOR.describe(),
        BORDER_COLOR.describe(),
        PASSWORD_COLOR.describe(),
        PASSWORD_BACKGROUND_COLOR.describe(),
        BORDER_WIDTH.describe(),
        LAYOUT_SPACE.describe(),
    ]
}
