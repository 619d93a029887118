//! Fixed names and values shared by the loader
//!
//! Group names, placeholder values and keysym ranges live here so the schema,
//! the loader and the tests agree on them.

/// Config file location
pub mod paths {
    /// Greeter config file, overridable at build time via `MINI_GREETER_CONFIG`
    pub const CONFIG_FILE: &str = match option_env!("MINI_GREETER_CONFIG") {
        Some(path) => path,
        None => "/etc/lightdm/lightdm-mini-greeter.conf",
    };
}

/// Key-file group names
pub mod groups {
    pub const GREETER: &str = "greeter";
    pub const HOTKEYS: &str = "greeter-hotkeys";
    pub const THEME: &str = "greeter-theme";
}

/// Placeholder values with special handling
pub mod sentinels {
    /// Default login user; logged when left unchanged
    pub const UNCHANGED_USER: &str = "CHANGE_ME";

    /// Stored for `background-image` when absent or empty (two quote characters)
    pub const EMPTY_BACKGROUND_IMAGE: &str = "\"\"";
}

/// Accepted `mod-key` values
pub mod mod_keys {
    pub const CONTROL: &str = "control";
    pub const ALT: &str = "alt";
    pub const META: &str = "meta";
}

/// X11 keysym ranges
pub mod keysym {
    /// Code points in these ranges share their value with the keysym
    pub const LATIN1_PRINTABLE: std::ops::RangeInclusive<u32> = 0x20..=0x7e;
    pub const LATIN1_SUPPLEMENT: std::ops::RangeInclusive<u32> = 0xa0..=0xff;

    /// Flag marking a keysym as a direct Unicode code point
    pub const UNICODE_FLAG: u32 = 0x0100_0000;
}

/// Logging
pub mod logging {
    /// Environment variable selecting the tracing max level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";
}
