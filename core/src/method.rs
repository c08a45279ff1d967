//! Input methods and their key classification tables.
//!
//! Each supported method (Telex, VNI) is a pure data table mapping a key
//! symbol to a semantic [`KeyAction`]. The tables are stateless: dual-role
//! keys (Telex `a`/`e`/`o`/`d`, which double into circumflex/đ) classify as
//! plain letters here and the engine escalates the doubling against the
//! buffer. Adding a method means adding a table, not a type.

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::keymap::KeySym;

/// Selected input convention. Process-wide, changeable at any time;
/// changing it resets the syllable buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Letter-keyed convention: `s f r x j` are tones, doubling and `w`
    /// produce the shaped vowels.
    Telex,
    /// Digit-keyed convention: `1..5` are tones, `6 7 8 9` shape letters.
    Vni,
}

impl Method {
    /// Decode the numeric method id used across the foreign boundary.
    pub fn from_id(id: u8) -> Option<Method> {
        match id {
            0 => Some(Method::Telex),
            1 => Some(Method::Vni),
            _ => None,
        }
    }

    /// The numeric id of this method on the foreign boundary.
    pub fn id(self) -> u8 {
        match self {
            Method::Telex => 0,
            Method::Vni => 1,
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Telex
    }
}

/// The five non-level tone marks. A syllable with no tone is level (ngang).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    /// sắc
    Acute,
    /// huyền
    Grave,
    /// hỏi
    Hook,
    /// ngã
    Tilde,
    /// nặng
    Dot,
}

/// Vowel shape modifiers, distinct from tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiacriticKind {
    /// â ê ô
    Circumflex,
    /// ơ ư
    Horn,
    /// ă
    Breve,
}

/// Semantic classification of one keystroke under a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Extend the syllable with a base letter.
    AppendLetter(char),
    /// Apply (or, doubled, cancel) a tone mark.
    ApplyTone(Tone),
    /// Apply (or, doubled, cancel) a vowel shape mark.
    ApplyDiacritic(DiacriticKind),
    /// Toggle the stroked letter đ on the syllable's `d`.
    ToggleDoubleLetter,
    /// Strip the current tone mark.
    Undo,
    /// Not meaningful to the engine; the host handles the key natively.
    PassThrough,
    /// Terminates the word in progress; the key itself is not consumed.
    WordBreak,
}

static TELEX_TONES: phf::Map<char, Tone> = phf_map! {
    's' => Tone::Acute,
    'f' => Tone::Grave,
    'r' => Tone::Hook,
    'x' => Tone::Tilde,
    'j' => Tone::Dot,
};

static VNI_TONES: phf::Map<char, Tone> = phf_map! {
    '1' => Tone::Acute,
    '2' => Tone::Grave,
    '3' => Tone::Hook,
    '4' => Tone::Tilde,
    '5' => Tone::Dot,
};

static VNI_DIACRITICS: phf::Map<char, DiacriticKind> = phf_map! {
    '6' => DiacriticKind::Circumflex,
    '7' => DiacriticKind::Horn,
    '8' => DiacriticKind::Breve,
};

/// Classify one key symbol under a method.
///
/// Pure and stateless: the result depends only on `(method, sym, ctrl)`.
/// A held ctrl modifier always breaks the word (the chord belongs to the
/// host). Backspace never reaches this table; the engine edits the buffer
/// directly.
pub fn key_action(method: Method, sym: KeySym, ctrl: bool) -> KeyAction {
    if ctrl {
        return KeyAction::WordBreak;
    }
    let ch = match sym {
        KeySym::Char(ch) => ch,
        // Handled by the engine before classification
        KeySym::Backspace => return KeyAction::PassThrough,
        _ => return KeyAction::WordBreak,
    };
    match method {
        Method::Telex => {
            if let Some(&tone) = TELEX_TONES.get(&ch) {
                KeyAction::ApplyTone(tone)
            } else if ch == 'w' {
                KeyAction::ApplyDiacritic(DiacriticKind::Horn)
            } else if ch == 'z' {
                KeyAction::Undo
            } else if ch.is_ascii_alphabetic() {
                KeyAction::AppendLetter(ch)
            } else {
                KeyAction::WordBreak
            }
        }
        Method::Vni => {
            if let Some(&tone) = VNI_TONES.get(&ch) {
                KeyAction::ApplyTone(tone)
            } else if let Some(&kind) = VNI_DIACRITICS.get(&ch) {
                KeyAction::ApplyDiacritic(kind)
            } else if ch == '9' {
                KeyAction::ToggleDoubleLetter
            } else if ch == '0' {
                KeyAction::Undo
            } else if ch.is_ascii_alphabetic() {
                KeyAction::AppendLetter(ch)
            } else {
                KeyAction::WordBreak
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telex_tone_keys() {
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('s'), false),
            KeyAction::ApplyTone(Tone::Acute)
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('f'), false),
            KeyAction::ApplyTone(Tone::Grave)
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('j'), false),
            KeyAction::ApplyTone(Tone::Dot)
        );
    }

    #[test]
    fn test_telex_marks_and_undo() {
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('w'), false),
            KeyAction::ApplyDiacritic(DiacriticKind::Horn)
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('z'), false),
            KeyAction::Undo
        );
        // Dual-role keys classify as letters; the engine escalates doubling
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('a'), false),
            KeyAction::AppendLetter('a')
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('d'), false),
            KeyAction::AppendLetter('d')
        );
    }

    #[test]
    fn test_telex_digits_break() {
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('1'), false),
            KeyAction::WordBreak
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('.'), false),
            KeyAction::WordBreak
        );
    }

    #[test]
    fn test_vni_digit_marks() {
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('1'), false),
            KeyAction::ApplyTone(Tone::Acute)
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('6'), false),
            KeyAction::ApplyDiacritic(DiacriticKind::Circumflex)
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('9'), false),
            KeyAction::ToggleDoubleLetter
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('0'), false),
            KeyAction::Undo
        );
        // Telex mark letters are plain letters under VNI
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('s'), false),
            KeyAction::AppendLetter('s')
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Char('w'), false),
            KeyAction::AppendLetter('w')
        );
    }

    #[test]
    fn test_modifiers_and_breaks() {
        assert_eq!(
            key_action(Method::Telex, KeySym::Char('a'), true),
            KeyAction::WordBreak
        );
        assert_eq!(
            key_action(Method::Telex, KeySym::Space, false),
            KeyAction::WordBreak
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Escape, false),
            KeyAction::WordBreak
        );
        assert_eq!(
            key_action(Method::Vni, KeySym::Left, false),
            KeyAction::WordBreak
        );
    }

    #[test]
    fn test_method_ids() {
        assert_eq!(Method::from_id(0), Some(Method::Telex));
        assert_eq!(Method::from_id(1), Some(Method::Vni));
        assert_eq!(Method::from_id(7), None);
        assert_eq!(Method::Vni.id(), 1);
    }
}
