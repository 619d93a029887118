//! Character to X11 keysym translation

use x11rb::protocol::xproto::Keysym;

use crate::constants::keysym::{LATIN1_PRINTABLE, LATIN1_SUPPLEMENT, UNICODE_FLAG};

/// Maps a single character to the platform key-code bound for it
pub trait KeycodeResolver {
    fn keysym_for(&self, ch: char) -> Keysym;
}

/// Keysyms as defined by the X11 protocol
///
/// Only Latin-1 keeps its legacy keysym. Every other character maps into the
/// Unicode keysym range, so e.g. `ą` gives `0x0100_0105` rather than the
/// legacy Latin-2 keysym `0x1b1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct X11Keysyms;

impl KeycodeResolver for X11Keysyms {
    fn keysym_for(&self, ch: char) -> Keysym {
        let code = u32::from(ch);
        if LATIN1_PRINTABLE.contains(&code) || LATIN1_SUPPLEMENT.contains(&code) {
            code
        } else {
            code | UNICODE_FLAG
        }
    }
}
