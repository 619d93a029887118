//! Greeter configuration loaded once at startup
//!
//! Every field resolves to its stored value or a fixed default. Only an
//! unreadable file, an empty hotkey and an unknown `mod-key` fail the load.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use x11rb::protocol::xproto::{Keysym, ModMask};

use super::error::ConfigLoadError;
use super::schema::{self, Setting};
use crate::color::Rgba;
use crate::constants::{groups, mod_keys, paths, sentinels};
use crate::keyfile::{KeyFile, KeyFileSource};
use crate::keysym::{KeycodeResolver, X11Keysyms};

/// Modifier that must be held for the power hotkeys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModKey {
    Control,
    Alt,
    #[serde(rename = "meta")]
    Super,
}

impl ModKey {
    /// Exact, case-sensitive match on the `mod-key` value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            mod_keys::CONTROL => Some(Self::Control),
            mod_keys::ALT => Some(Self::Alt),
            mod_keys::META => Some(Self::Super),
            _ => None,
        }
    }

    pub fn mask(self) -> ModMask {
        match self {
            Self::Control => ModMask::CONTROL,
            Self::Alt => ModMask::M1,
            Self::Super => ModMask::M4,
        }
    }
}

/// Immutable greeter settings (loaded once at startup)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub login_user: String,
    pub show_password_label: bool,
    pub password_label_text: String,
    pub show_input_cursor: bool,

    // Hotkeys
    pub suspend_key: Keysym,
    pub hibernate_key: Keysym,
    pub restart_key: Keysym,
    pub shutdown_key: Keysym,
    pub mod_bit: ModKey,

    // Theme
    pub font: String,
    /// CSS size, passed through untouched
    pub font_size: String,
    pub text_color: Rgba,
    pub error_color: Rgba,
    pub background_image: String,
    pub background_color: Rgba,
    pub window_color: Rgba,
    pub border_color: Rgba,
    pub password_color: Rgba,
    pub password_background_color: Rgba,
    /// CSS size, passed through untouched
    pub border_width: String,
    pub layout_spacing: u32,
}

impl Config {
    /// Load from the compiled-in config file path
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(Path::new(paths::CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = fs::read(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let keyfile = KeyFile::parse_bytes(&contents).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for group in [groups::GREETER, groups::HOTKEYS, groups::THEME] {
            if !keyfile.has_group(group) {
                debug!(group, "Group missing from config file, its settings use defaults");
            }
        }

        let config = Self::from_source(&keyfile, &X11Keysyms)?;
        info!(path = %path.display(), "Loaded greeter configuration");
        debug!(config = ?config, "Resolved greeter configuration");
        Ok(config)
    }

    /// Resolve every setting against an already-parsed source
    pub fn from_source<S, R>(source: &S, resolver: &R) -> Result<Self, ConfigLoadError>
    where
        S: KeyFileSource + ?Sized,
        R: KeycodeResolver + ?Sized,
    {
        let login_user = schema::USER.resolve(source);
        if login_user == sentinels::UNCHANGED_USER {
            info!(key = schema::USER.key, "User configuration value is unchanged.");
        }

        // Hotkeys are checked before the modifier
        let suspend_key = parse_hotkey(source, resolver, &schema::SUSPEND_KEY)?;
        let hibernate_key = parse_hotkey(source, resolver, &schema::HIBERNATE_KEY)?;
        let restart_key = parse_hotkey(source, resolver, &schema::RESTART_KEY)?;
        let shutdown_key = parse_hotkey(source, resolver, &schema::SHUTDOWN_KEY)?;
        let mod_key = schema::MOD_KEY.resolve(source);
        let mod_bit = ModKey::parse(&mod_key)
            .ok_or(ConfigLoadError::InvalidModKey { value: mod_key })?;

        // Empty is indistinguishable from absent for the path, so both get the sentinel
        let background_image = schema::BACKGROUND_IMAGE
            .read(source)
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| sentinels::EMPTY_BACKGROUND_IMAGE.to_string());

        Ok(Self {
            login_user,
            show_password_label: schema::SHOW_PASSWORD_LABEL.resolve(source),
            password_label_text: schema::PASSWORD_LABEL_TEXT.resolve(source),
            show_input_cursor: schema::SHOW_INPUT_CURSOR.resolve(source),

            suspend_key,
            hibernate_key,
            restart_key,
            shutdown_key,
            mod_bit,

            font: schema::FONT.resolve(source),
            font_size: schema::FONT_SIZE.resolve(source),
            text_color: parse_color(source, &schema::TEXT_COLOR),
            error_color: parse_color(source, &schema::ERROR_COLOR),
            background_image,
            background_color: parse_color(source, &schema::BACKGROUND_COLOR),
            window_color: parse_color(source, &schema::WINDOW_COLOR),
            border_color: parse_color(source, &schema::BORDER_COLOR),
            password_color: parse_color(source, &schema::PASSWORD_COLOR),
            password_background_color: parse_color(source, &schema::PASSWORD_BACKGROUND_COLOR),
            border_width: schema::BORDER_WIDTH.resolve(source),
            layout_spacing: schema::LAYOUT_SPACE.resolve(source).unsigned_abs(),
        })
    }
}

/// Hex colors may be written quoted; strip the quotes before parsing
fn normalize_color(raw: String) -> String {
    if raw.contains('#') {
        raw.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
    } else {
        raw
    }
}

/// Parse a theme color, using the setting's own default when unparseable
fn parse_color<S>(source: &S, setting: &Setting<&'static str>) -> Rgba
where
    S: KeyFileSource + ?Sized,
{
    let color_string = normalize_color(setting.resolve(source));
    Rgba::parse(&color_string).unwrap_or_else(|_| {
        warn!(
            key = setting.key,
            value = %color_string,
            default = setting.default,
            "Could not parse color setting, using default"
        );
        Rgba::parse(setting.default).unwrap_or_default()
    })
}

/// Keysym of the first character of a hotkey setting
fn parse_hotkey<S, R>(
    source: &S,
    resolver: &R,
    setting: &Setting<&'static str>,
) -> Result<Keysym, ConfigLoadError>
where
    S: KeyFileSource + ?Sized,
    R: KeycodeResolver + ?Sized,
{
    let key = setting.resolve(source);
    let first = key
        .chars()
        .next()
        .ok_or(ConfigLoadError::EmptyHotkey { key: setting.key })?;
    Ok(resolver.keysym_for(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // Run `f` with a subscriber that records formatted log lines
    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (result, logs)
    }

    fn config_from(contents: &str) -> Result<Config, ConfigLoadError> {
        let keyfile = KeyFile::parse(contents).unwrap();
        Config::from_source(&keyfile, &X11Keysyms)
    }

    fn hex(value: &str) -> Rgba {
        Rgba::parse(value).unwrap()
    }

    const FULL: &str = "\
[greeter]
user=alice
show-password-label=false
password-label-text=Secret:
show-input-cursor=false

[greeter-hotkeys]
mod-key=control
suspend-key=a
hibernate-key=b
restart-key=c
shutdown-key=d

[greeter-theme]
font=Mono
font-size=1.5em
text-color=#112233
error-color=red
background-image=/path/x.png
background-color=#000000
window-color=#ffffff
border-color=#010203
password-color=#040506
password-background-color=#070809
border-width=5px
layout-space=7
";

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = config_from("").unwrap();
        assert_eq!(config.login_user, "CHANGE_ME");
        assert_eq!(config.show_password_label, true);
        assert_eq!(config.password_label_text, "Password:");
        assert_eq!(config.show_input_cursor, true);
        assert_eq!(config.suspend_key, u32::from('u'));
        assert_eq!(config.hibernate_key, u32::from('h'));
        assert_eq!(config.restart_key, u32::from('r'));
        assert_eq!(config.shutdown_key, u32::from('s'));
        assert_eq!(config.mod_bit, ModKey::Super);
        assert_eq!(config.font, "Sans");
        assert_eq!(config.font_size, "1em");
        assert_eq!(config.text_color, hex("#080800"));
        assert_eq!(config.error_color, hex("#F8F8F0"));
        assert_eq!(config.background_image, "\"\"");
        assert_eq!(config.background_color, hex("#1B1D1E"));
        assert_eq!(config.window_color, hex("#F92672"));
        assert_eq!(config.border_color, hex("#080800"));
        assert_eq!(config.password_color, hex("#F8F8F0"));
        assert_eq!(config.password_background_color, hex("#1B1D1E"));
        assert_eq!(config.border_width, "2px");
        assert_eq!(config.layout_spacing, 15);
    }

    #[test]
    fn test_well_formed_values_override_defaults() {
        let config = config_from(FULL).unwrap();
        assert_eq!(config.login_user, "alice");
        assert_eq!(config.show_password_label, false);
        assert_eq!(config.password_label_text, "Secret:");
        assert_eq!(config.show_input_cursor, false);
        assert_eq!(config.suspend_key, u32::from('a'));
        assert_eq!(config.hibernate_key, u32::from('b'));
        assert_eq!(config.restart_key, u32::from('c'));
        assert_eq!(config.shutdown_key, u32::from('d'));
        assert_eq!(config.mod_bit, ModKey::Control);
        assert_eq!(config.font, "Mono");
        assert_eq!(config.font_size, "1.5em");
        assert_eq!(config.text_color, hex("#112233"));
        assert_eq!(config.error_color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(config.background_image, "/path/x.png");
        assert_eq!(config.background_color, hex("#000000"));
        assert_eq!(config.window_color, hex("#ffffff"));
        assert_eq!(config.border_color, hex("#010203"));
        assert_eq!(config.password_color, hex("#040506"));
        assert_eq!(config.password_background_color, hex("#070809"));
        assert_eq!(config.border_width, "5px");
        assert_eq!(config.layout_spacing, 7);
    }

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let config = config_from(
            "[greeter]\nshow-password-label=sometimes\n[greeter-theme]\nlayout-space=wide\n",
        )
        .unwrap();
        assert_eq!(config.show_password_label, true);
        assert_eq!(config.layout_spacing, 15);
    }

    #[test]
    fn test_layout_spacing_is_absolute() {
        let spacing = |raw: &str| {
            config_from(&format!("[greeter-theme]\nlayout-space={raw}\n"))
                .unwrap()
                .layout_spacing
        };
        assert_eq!(spacing("-7"), 7);
        assert_eq!(spacing("7"), 7);
        assert_eq!(spacing("0"), 0);
        assert_eq!(spacing("-2147483648"), 2_147_483_648);
    }

    #[test]
    fn test_background_image_empty_uses_sentinel() {
        let config = config_from("[greeter-theme]\nbackground-image=\n").unwrap();
        assert_eq!(config.background_image, "\"\"");

        let config = config_from("[greeter-theme]\nbackground-image=\"\"\n").unwrap();
        assert_eq!(config.background_image, "\"\"");
    }

    #[test]
    fn test_quoted_hex_color_is_stripped() {
        let quoted = config_from("[greeter-theme]\ntext-color=\"#112233\"\n").unwrap();
        let single = config_from("[greeter-theme]\ntext-color='#112233'\n").unwrap();
        let bare = config_from("[greeter-theme]\ntext-color=#112233\n").unwrap();
        assert_eq!(quoted.text_color, bare.text_color);
        assert_eq!(single.text_color, bare.text_color);
    }

    #[test]
    fn test_quoted_named_color_is_not_stripped() {
        let (config, logs) =
            capture_logs(|| config_from("[greeter-theme]\nwindow-color=\"red\"\n").unwrap());
        assert_eq!(config.window_color, hex("#F92672"));
        assert!(logs.contains("window-color"));
    }

    #[test]
    fn test_unparseable_color_warns_and_uses_field_default() {
        let (config, logs) =
            capture_logs(|| config_from("[greeter-theme]\nborder-color=#zzzzzz\n").unwrap());
        assert_eq!(config.border_color, hex("#080800"));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("border-color"));
        assert!(logs.contains("#zzzzzz"));
    }

    #[test]
    fn test_empty_hotkey_is_fatal() {
        let result = config_from("[greeter-hotkeys]\nrestart-key=\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::EmptyHotkey { key: "restart-key" })
        ));
    }

    #[test]
    fn test_empty_hotkey_reported_before_invalid_mod_key() {
        let result = config_from("[greeter-hotkeys]\nsuspend-key=\nmod-key=bogus\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::EmptyHotkey { key: "suspend-key" })
        ));
    }

    #[test]
    fn test_hotkey_uses_first_character() {
        let config = config_from("[greeter-hotkeys]\nsuspend-key=zap\nshutdown-key=\u{e9}t\n").unwrap();
        assert_eq!(config.suspend_key, u32::from('z'));
        assert_eq!(config.shutdown_key, 0xe9);
    }

    #[test]
    fn test_hotkey_uses_resolver() {
        struct Fixed;
        impl KeycodeResolver for Fixed {
            fn keysym_for(&self, _ch: char) -> Keysym {
                42
            }
        }
        let keyfile = KeyFile::parse("").unwrap();
        let config = Config::from_source(&keyfile, &Fixed).unwrap();
        assert_eq!(config.suspend_key, 42);
        assert_eq!(config.shutdown_key, 42);
    }

    #[test]
    fn test_mod_key_values() {
        let mod_bit = |raw: &str| config_from(&format!("[greeter-hotkeys]\nmod-key={raw}\n"));
        assert_eq!(mod_bit("control").unwrap().mod_bit, ModKey::Control);
        assert_eq!(mod_bit("alt").unwrap().mod_bit, ModKey::Alt);
        assert_eq!(mod_bit("meta").unwrap().mod_bit, ModKey::Super);
        assert!(matches!(
            mod_bit("bogus"),
            Err(ConfigLoadError::InvalidModKey { value }) if value == "bogus"
        ));
        assert!(matches!(mod_bit("Control"), Err(ConfigLoadError::InvalidModKey { .. })));
    }

    #[test]
    fn test_mod_key_masks() {
        assert_eq!(u16::from(ModKey::Control.mask()), 1 << 2);
        assert_eq!(u16::from(ModKey::Alt.mask()), 1 << 3);
        assert_eq!(u16::from(ModKey::Super.mask()), 1 << 6);
    }

    #[test]
    fn test_unchanged_user_is_reported() {
        let (_, absent) = capture_logs(|| config_from("").unwrap());
        assert!(absent.contains("User configuration value is unchanged."));

        let (_, explicit) = capture_logs(|| config_from("[greeter]\nuser=CHANGE_ME\n").unwrap());
        assert!(explicit.contains("User configuration value is unchanged."));

        let (_, changed) = capture_logs(|| config_from("[greeter]\nuser=alice\n").unwrap());
        assert!(!changed.contains("unchanged"));
    }

    #[test]
    fn test_load_from_file_is_idempotent() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let first = Config::load_from(file.path()).unwrap();
        let second = Config::load_from(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.login_user, "alice");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.conf");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigLoadError::Read { .. })
        ));
    }

    #[test]
    fn test_non_utf8_value_falls_back_to_default() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[greeter]\nuser=alice\n[greeter-theme]\nfont=Caf\xe9\nborder-width=4px\n")
            .unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.font, "Sans");
        assert_eq!(config.login_user, "alice");
        assert_eq!(config.border_width, "4px");
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"user=alice\n").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
        assert!(err.to_string().contains("Could not parse configuration file"));
    }

    #[test]
    fn test_serializes_for_dump() {
        let config = config_from("").unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["mod_bit"], "meta");
        assert_eq!(json["window_color"], "#f92672ff");
        assert_eq!(json["layout_spacing"], 15);
    }
}
