//! The transformation engine: one keystroke in, one edit instruction out.
//!
//! `VietEngine` owns the syllable buffer and runs the `Idle`/`Composing`
//! state machine. Each key event is decoded by the keymap, classified by the
//! method's rule table, resolved against the buffer, and answered with an
//! [`EditInstruction`] telling the host how to rewrite the displayed
//! syllable. The engine is an explicit owned object: hosts may construct any
//! number of independent instances.
//!
//! Failure semantics: unrecognized key codes, rejected marks on an empty
//! buffer, and capacity overflows all degrade to a no-op instruction; the
//! engine never panics on the key path.

use tracing::{debug, trace};

use crate::keymap::{self, KeySym};
use crate::method::{key_action, KeyAction, Method};
use crate::resolver::{self, Resolution};
use crate::syllable::{SyllableBuffer, MAX_CELLS};
use crate::Config;

/// One keystroke as delivered by the host: a virtual key code plus modifier
/// state. Ephemeral; consumed synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host virtual key code (not a character).
    pub code: u16,
    /// Shift or caps-lock is effective for this keystroke.
    pub caps: bool,
    /// A ctrl-style chord modifier is held.
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            caps: false,
            ctrl: false,
        }
    }

    pub fn with_caps(code: u16) -> Self {
        Self {
            code,
            caps: true,
            ctrl: false,
        }
    }

    pub fn with_ctrl(code: u16) -> Self {
        Self {
            code,
            caps: false,
            ctrl: true,
        }
    }
}

/// What kind of edit the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Nothing to do; the host handles the key natively.
    None,
    /// Delete `backspace` trailing characters, then insert `chars`.
    Replace,
}

/// The engine's answer to one keystroke.
///
/// Fixed-capacity and allocation-free so it can be mapped directly onto the
/// foreign transport buffer. Invariants: `count <= 32`; `backspace` never
/// exceeds the characters currently displayed for the active syllable;
/// `None` implies `count == 0` and `backspace == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditInstruction {
    action: EditAction,
    backspace: u8,
    chars: [char; MAX_CELLS],
    count: u8,
}

impl EditInstruction {
    /// The no-op instruction.
    pub fn none() -> Self {
        Self {
            action: EditAction::None,
            backspace: 0,
            chars: ['\0'; MAX_CELLS],
            count: 0,
        }
    }

    fn replace(backspace: usize, text: &str) -> Self {
        let mut chars = ['\0'; MAX_CELLS];
        let mut count = 0;
        for (slot, ch) in chars.iter_mut().zip(text.chars()) {
            *slot = ch;
            count += 1;
        }
        Self {
            action: EditAction::Replace,
            backspace: backspace.min(MAX_CELLS) as u8,
            chars,
            count,
        }
    }

    pub fn action(&self) -> EditAction {
        self.action
    }

    pub fn is_none(&self) -> bool {
        self.action == EditAction::None
    }

    /// Trailing displayed characters to remove before inserting.
    pub fn backspace(&self) -> u8 {
        self.backspace
    }

    /// The characters to insert.
    pub fn chars(&self) -> &[char] {
        &self.chars[..self.count as usize]
    }

    /// The insertion as an owned string, for hosts that take text, and tests.
    pub fn text(&self) -> String {
        self.chars().iter().collect()
    }
}

/// Engine lifecycle state. `Idle` is re-entered on every word break; there
/// is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No word in progress.
    Idle,
    /// A syllable is being composed and tracked.
    Composing,
}

/// Per-keystroke Vietnamese transformation engine.
#[derive(Debug, Clone)]
pub struct VietEngine {
    method: Method,
    state: EngineState,
    buffer: SyllableBuffer,
    config: Config,
}

impl VietEngine {
    /// Create an engine with the given configuration, starting idle under
    /// the configured default method.
    pub fn new(config: Config) -> Self {
        Self {
            method: config.default_method,
            state: EngineState::Idle,
            buffer: SyllableBuffer::new(),
            config,
        }
    }

    /// Create an engine under a specific method with default configuration.
    pub fn with_method(method: Method) -> Self {
        let mut engine = Self::new(Config::default());
        engine.method = method;
        engine
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The word in progress as currently displayed.
    pub fn display(&self) -> String {
        resolver::display(&self.buffer, self.config.modern_tone)
    }

    /// Switch the input method. Always resets: a word in progress under the
    /// old method is not portable to the new one.
    pub fn set_method(&mut self, method: Method) {
        debug!(?method, "method selected");
        self.method = method;
        self.reset();
    }

    /// Drop the word in progress and return to idle.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = EngineState::Idle;
    }

    /// Process one keystroke and return the edit the host should apply.
    pub fn process_key(&mut self, event: KeyEvent) -> EditInstruction {
        let Some(sym) = keymap::lookup(event.code) else {
            trace!(code = event.code, "unrecognized key code, pass-through");
            return EditInstruction::none();
        };
        if sym == KeySym::Backspace && !event.ctrl {
            return self.backspace();
        }
        let action = key_action(self.method, sym, event.ctrl);
        trace!(?sym, ?action, "classified");
        match action {
            KeyAction::WordBreak => {
                // The break key itself is not consumed
                self.reset();
                EditInstruction::none()
            }
            KeyAction::PassThrough => EditInstruction::none(),
            _ => self.compose(action, sym, event.caps),
        }
    }

    fn compose(&mut self, action: KeyAction, sym: KeySym, caps: bool) -> EditInstruction {
        let KeySym::Char(key) = sym else {
            return EditInstruction::none();
        };
        if self.buffer.len() >= MAX_CELLS {
            // The keystrokes left the bounds of any Vietnamese syllable
            // long ago; abandon tracking until the next word break.
            debug!("buffer at capacity, tracking abandoned");
            self.reset();
            return EditInstruction::none();
        }

        let action = match action {
            KeyAction::AppendLetter(ch) if self.method == Method::Telex => {
                resolver::escalate_doubling(&self.buffer, ch).unwrap_or(action)
            }
            other => other,
        };

        let prev = self.buffer.len();
        match resolver::resolve(&self.buffer, action, key, caps) {
            Resolution::Updated(next) => self.buffer = next,
            Resolution::Reject => {
                // Never drop a keystroke: the key lands literally in the
                // buffer, which also keeps word-initial consonants (s, f,
                // r, ...) in view of later orthography checks.
                let w_fallback =
                    self.method == Method::Telex && key == 'w' && self.config.w_shortcut;
                trace!(%key, "rejected, appending literally");
                match resolver::append_literal(&self.buffer, key, caps, w_fallback) {
                    Some(next) => self.buffer = next,
                    None => {
                        self.reset();
                        return EditInstruction::none();
                    }
                }
            }
        }

        self.state = EngineState::Composing;
        let text = self.display();
        debug!(%text, backspace = prev, "composed");
        EditInstruction::replace(prev, &text)
    }

    /// Backspace while composing pops one cell and rewrites the syllable,
    /// which keeps the display consistent when the deletion moves the tone
    /// (`hoán` becomes `hóa`). Idle backspace is the host's business.
    fn backspace(&mut self) -> EditInstruction {
        if self.buffer.is_empty() {
            return EditInstruction::none();
        }
        let prev = self.buffer.len();
        self.buffer.pop();
        if self.buffer.is_empty() {
            self.reset();
            return EditInstruction::replace(prev, "");
        }
        let text = self.display();
        EditInstruction::replace(prev, &text)
    }
}
