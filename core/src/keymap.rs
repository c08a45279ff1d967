//! Host virtual-key-code to key symbol mapping.
//!
//! The engine receives raw key codes from the host's input pipeline, not
//! characters. This module decodes the macOS ANSI virtual key code space
//! (`kVK_ANSI_A` = 0, `kVK_ANSI_S` = 1, ...) into [`KeySym`] values the rule
//! tables understand. Codes outside the recognized range map to `None` and
//! the engine treats them as pass-through.

use ahash::AHashMap;
use once_cell::sync::Lazy;

/// A decoded key symbol.
///
/// `Char` carries the unshifted base character of the key; the caps state
/// travels separately on the key event so the engine can restore letter case
/// at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySym {
    /// Printable key (letter, digit, punctuation), unshifted.
    Char(char),
    /// Space bar
    Space,
    /// Return/Enter
    Enter,
    /// Tab
    Tab,
    /// Escape
    Escape,
    /// Backspace (macOS "delete")
    Backspace,
    /// Forward delete
    Delete,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
}

/// Printable keys of the ANSI layout, in virtual-key-code order.
const PRINTABLE: &[(u16, char)] = &[
    (0, 'a'),
    (1, 's'),
    (2, 'd'),
    (3, 'f'),
    (4, 'h'),
    (5, 'g'),
    (6, 'z'),
    (7, 'x'),
    (8, 'c'),
    (9, 'v'),
    (11, 'b'),
    (12, 'q'),
    (13, 'w'),
    (14, 'e'),
    (15, 'r'),
    (16, 'y'),
    (17, 't'),
    (18, '1'),
    (19, '2'),
    (20, '3'),
    (21, '4'),
    (22, '6'),
    (23, '5'),
    (24, '='),
    (25, '9'),
    (26, '7'),
    (27, '-'),
    (28, '8'),
    (29, '0'),
    (30, ']'),
    (31, 'o'),
    (32, 'u'),
    (33, '['),
    (34, 'i'),
    (35, 'p'),
    (37, 'l'),
    (38, 'j'),
    (39, '\''),
    (40, 'k'),
    (41, ';'),
    (42, '\\'),
    (43, ','),
    (44, '/'),
    (45, 'n'),
    (46, 'm'),
    (47, '.'),
    (50, '`'),
];

static CHAR_TO_CODE: Lazy<AHashMap<char, u16>> =
    Lazy::new(|| PRINTABLE.iter().map(|&(code, ch)| (ch, code)).collect());

/// Decode a host virtual key code into a [`KeySym`].
///
/// Returns `None` for codes the engine does not recognize (function keys,
/// media keys, keypad); the caller passes those through to the host.
pub fn lookup(code: u16) -> Option<KeySym> {
    match code {
        36 => Some(KeySym::Enter),
        48 => Some(KeySym::Tab),
        49 => Some(KeySym::Space),
        51 => Some(KeySym::Backspace),
        53 => Some(KeySym::Escape),
        117 => Some(KeySym::Delete),
        123 => Some(KeySym::Left),
        124 => Some(KeySym::Right),
        125 => Some(KeySym::Down),
        126 => Some(KeySym::Up),
        _ => PRINTABLE
            .iter()
            .find(|&&(c, _)| c == code)
            .map(|&(_, ch)| KeySym::Char(ch)),
    }
}

/// Reverse lookup: the virtual key code producing a base character.
///
/// Used by tests and demos to drive the engine from plain text.
pub fn key_code_for_char(ch: char) -> Option<u16> {
    if ch == ' ' {
        return Some(49);
    }
    CHAR_TO_CODE.get(&ch.to_ascii_lowercase()).copied()
}
