//! C boundary for the Vietnamese transformation engine.
//!
//! Exposes four operations with a stable binary layout:
//!
//! ```c
//! void       ime_init(void);
//! void       ime_method(uint8_t method);          // 0 = Telex, 1 = VNI
//! ImeResult *ime_key(uint16_t key, bool caps, bool ctrl);  // NULL = no edit
//! void       ime_free(ImeResult *result);
//! ```
//!
//! Ownership: every non-null pointer returned by `ime_key` is owned by the
//! caller until passed to `ime_free`, exactly once. The engine never holds
//! on to returned memory.
//!
//! Threading: the host delivers all calls for the process-wide engine from
//! a single thread (its input pipeline). The slot performs no locking; this
//! is the documented single-writer contract, not an oversight. Hosts with
//! multiple concurrent input streams embed `libviet-core` directly and give
//! each stream its own engine.
//!
//! No panic crosses the boundary: every entry point unwinds into a no-op.

use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};

use libviet_core::{Config, KeyEvent, Method, VietEngine};
use tracing::debug;

/// Result of one key event, laid out for the host.
///
/// Field order and sizes must match the host's declaration: 32 UTF-32 code
/// units, then action (0 none, 1 replace), backspace count, valid character
/// count, one reserved byte.
#[repr(C)]
pub struct ImeResult {
    pub chars: [u32; 32],
    pub action: u8,
    pub backspace: u8,
    pub count: u8,
    pub _pad: u8,
}

const ACTION_REPLACE: u8 = 1;

struct EngineSlot(UnsafeCell<Option<VietEngine>>);

// SAFETY: all access goes through the host's single input thread per the
// documented contract above; there is no concurrent access to guard.
unsafe impl Sync for EngineSlot {}

static ENGINE: EngineSlot = EngineSlot(UnsafeCell::new(None));

/// Run `f` over the engine slot, swallowing panics into `None`.
fn with_engine<R>(f: impl FnOnce(&mut Option<VietEngine>) -> R) -> Option<R> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: single-writer contract, see EngineSlot
        let slot = unsafe { &mut *ENGINE.0.get() };
        f(slot)
    }))
    .ok()
}

/// Allocate the process-wide engine. Idempotent: a second call leaves an
/// already-initialized engine (and its method) untouched.
#[no_mangle]
pub extern "C" fn ime_init() {
    with_engine(|slot| {
        if slot.is_none() {
            debug!("engine initialized");
            *slot = Some(VietEngine::new(Config::default()));
        }
    });
}

/// Select the input method by id. Unknown ids leave the previous method
/// active; the word in progress is discarded either way.
#[no_mangle]
pub extern "C" fn ime_method(method: u8) {
    with_engine(|slot| {
        if let Some(engine) = slot.as_mut() {
            match Method::from_id(method) {
                Some(m) => engine.set_method(m),
                None => {
                    debug!(method, "unknown method id, keeping current");
                    engine.reset();
                }
            }
        }
    });
}

/// Process one key event. Returns null when no edit is required (pure
/// pass-through or word break); otherwise an owned result the caller must
/// release through [`ime_free`].
#[no_mangle]
pub extern "C" fn ime_key(key: u16, caps: bool, ctrl: bool) -> *mut ImeResult {
    with_engine(|slot| {
        let Some(engine) = slot.as_mut() else {
            return std::ptr::null_mut();
        };
        let out = engine.process_key(KeyEvent {
            code: key,
            caps,
            ctrl,
        });
        if out.is_none() {
            return std::ptr::null_mut();
        }
        let mut chars = [0u32; 32];
        for (slot, &ch) in chars.iter_mut().zip(out.chars()) {
            *slot = ch as u32;
        }
        Box::into_raw(Box::new(ImeResult {
            chars,
            action: ACTION_REPLACE,
            backspace: out.backspace(),
            count: out.chars().len() as u8,
            _pad: 0,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Release a result returned by [`ime_key`].
///
/// # Safety contract
///
/// `result` must be a pointer previously returned by `ime_key` and not yet
/// freed; null is accepted and ignored.
#[no_mangle]
pub extern "C" fn ime_free(result: *mut ImeResult) {
    if result.is_null() {
        return;
    }
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: per the contract, `result` came from ime_key's
        // Box::into_raw and this is its single free.
        drop(unsafe { Box::from_raw(result) });
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // The engine slot is process-wide; serialize tests onto one writer.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn setup(method: u8) -> MutexGuard<'static, ()> {
        let guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        ime_init();
        ime_method(method);
        guard
    }

    #[test]
    fn test_result_layout() {
        // 32 x 4 bytes of characters plus four single-byte fields
        assert_eq!(std::mem::size_of::<ImeResult>(), 132);
        assert_eq!(std::mem::align_of::<ImeResult>(), 4);
    }

    #[test]
    fn test_reference_sequence() {
        let _guard = setup(0);

        // 'a' (key 0)
        let first = ime_key(0, false, false);
        assert!(!first.is_null());
        // SAFETY: non-null result owned by this test
        let r = unsafe { &*first };
        assert_eq!(r.action, ACTION_REPLACE);
        assert_eq!(r.backspace, 0);
        assert_eq!(r.count, 1);
        assert_eq!(r.chars[0], 'a' as u32);
        ime_free(first);

        // 's' (key 1) replaces the bare a with á
        let second = ime_key(1, false, false);
        assert!(!second.is_null());
        let r = unsafe { &*second };
        assert_eq!(r.action, ACTION_REPLACE);
        assert_eq!(r.backspace, 1);
        assert_eq!(r.count, 1);
        assert_eq!(r.chars[0], 0x00E1);
        ime_free(second);
    }

    #[test]
    fn test_word_break_returns_null() {
        let _guard = setup(0);
        ime_free(ime_key(0, false, false));
        let brk = ime_key(49, false, false); // space
        assert!(brk.is_null());
    }

    #[test]
    fn test_unknown_key_returns_null() {
        let _guard = setup(0);
        assert!(ime_key(96, false, false).is_null()); // F5
        assert!(ime_key(0xFFFF, false, false).is_null());
    }

    #[test]
    fn test_unknown_method_keeps_previous() {
        let _guard = setup(0);
        ime_method(0xEE);
        // still Telex: a then s composes á
        ime_free(ime_key(0, false, false));
        let out = ime_key(1, false, false);
        assert!(!out.is_null());
        let r = unsafe { &*out };
        assert_eq!(r.chars[0], 0x00E1);
        ime_free(out);
        ime_method(49); // leave the buffer clean for other tests
    }

    #[test]
    fn test_method_switch_resets_composition() {
        let _guard = setup(0);
        ime_free(ime_key(0, false, false)); // 'a' under Telex
        ime_method(1); // VNI
        // VNI tone digit lands literally instead of toning the dropped a
        let out = ime_key(18, false, false); // '1'
        assert!(!out.is_null());
        let r = unsafe { &*out };
        assert_eq!(r.backspace, 0);
        assert_eq!(r.count, 1);
        assert_eq!(r.chars[0], '1' as u32);
        ime_free(out);
        ime_key(49, false, false);
    }

    #[test]
    fn test_ctrl_passthrough() {
        let _guard = setup(0);
        ime_free(ime_key(0, false, false));
        assert!(ime_key(0, false, true).is_null());
    }
}
