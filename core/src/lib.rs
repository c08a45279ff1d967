//! libviet-core
//!
//! Vietnamese input-method transformation engine shared by host embeddings
//! (the C boundary crate, demos, tests). The engine consumes raw keyboard
//! events and answers with bounded edit instructions that turn the text a
//! host displays into correctly marked Vietnamese.
//!
//! Public API:
//! - `VietEngine` - Per-keystroke state machine over the word in progress
//! - `EditInstruction` - Bounded "delete n, insert these" answer
//! - `Method` / `KeyAction` - Input conventions and their rule tables
//! - `SyllableBuffer` - The word in progress as marked cells
//! - `Config` - Configuration and feature flags

use serde::{Deserialize, Serialize};

// Core modules
pub mod keymap;
pub use keymap::{key_code_for_char, KeySym};

pub mod method;
pub use method::{key_action, DiacriticKind, KeyAction, Method, Tone};

pub mod syllable;
pub use syllable::{Cell, DiacriticSet, SyllableBuffer, MAX_CELLS};

pub mod resolver;
pub use resolver::Resolution;

pub mod engine;
pub use engine::{EditAction, EditInstruction, EngineState, KeyEvent, VietEngine};

/// Engine configuration.
///
/// Nothing here persists by itself; hosts that want durable settings load
/// and save through the TOML helpers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Method active after engine construction (a host may switch at any
    /// time through `set_method`).
    pub default_method: Method,

    /// Place the tone on the second vowel of the open pairs `oa oe uy`
    /// (modern style: `hoà`, `thuỷ`). Off, the traditional placement is
    /// used (`hòa`, `thủy`).
    pub modern_tone: bool,

    /// Telex only: a `w` that cannot horn anything becomes `ư`, so `tw`
    /// types `tư` and a doubled `ww` falls back to the raw letter.
    pub w_shortcut: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_method: Method::Telex,
            // Traditional placement matches the reference fixtures (hóa)
            modern_tone: false,
            // The w shortcut is standard Telex behavior
            w_shortcut: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize a string to the canonical precomposed form (NFC) and trim
    /// whitespace. The engine always emits NFC; this is for comparing text
    /// that arrives from hosts or fixtures in decomposed form.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
