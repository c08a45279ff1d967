//! Tone and diacritic resolution.
//!
//! Pure functions from a syllable buffer and a proposed action to either an
//! updated buffer or a rejection. No hidden state: the same inputs always
//! resolve the same way, which keeps the rules table-testable.
//!
//! Placement follows the traditional convention: a shape-marked vowel takes
//! the tone (rightmost when two are marked, so `ươ` marks `ơ`); otherwise a
//! lone vowel takes it, a pair puts it on the second vowel when a coda
//! follows and on the first otherwise, and a triple puts it on the middle.
//! The modern style moves the open pairs `oa oe uy` to the second vowel
//! (`hoà`, `thuỷ`); [`tone_target`] takes that as a flag.

use ahash::AHashSet;
use once_cell::sync::Lazy;

use crate::method::{DiacriticKind, KeyAction, Tone};
use crate::syllable::{Cell, DiacriticSet, SyllableBuffer};

/// Outcome of proposing an action against a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The action is valid; here is the updated buffer.
    Updated(SyllableBuffer),
    /// Not valid Vietnamese orthography for the buffer's current content.
    /// Non-fatal: the engine appends the triggering key literally instead.
    Reject,
}

/// Onset consonant clusters of Vietnamese syllables.
static ONSETS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "", "b", "c", "ch", "d", "đ", "g", "gh", "gi", "h", "k", "kh", "l", "m", "n", "ng", "ngh",
        "nh", "p", "ph", "q", "qu", "r", "s", "t", "th", "tr", "v", "x",
    ]
    .into_iter()
    .collect()
});

/// Coda consonant clusters.
static CODAS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    ["", "c", "ch", "m", "n", "ng", "nh", "p", "t"]
        .into_iter()
        .collect()
});

/// Vowel clusters, keyed by plain base letters (shape marks are cell state,
/// so `iê` and `ie` are the same entry here).
static NUCLEI: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "e", "i", "o", "u", "y", // single
        "ai", "ao", "au", "ay", "eo", "eu", "ia", "ie", "iu", "oa", "oe", "oi", "ua", "ue", "ui",
        "uo", "uu", "uy", "ye", // pairs
        "ieu", "oai", "oao", "oay", "oeo", "uay", "uoi", "uou", "uya", "uye", "uyu", "yeu",
    ]
    .into_iter()
    .collect()
});

/// Indices of the cells forming the vowel nucleus.
///
/// The glide `u` of a `qu` onset and the `i` of a word-initial `gi` onset
/// (when further vowels follow) are spelling, not nucleus, and are skipped.
pub fn nucleus_indices(cells: &[Cell]) -> Vec<usize> {
    let mut nucleus = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        if !cell.is_vowel() {
            continue;
        }
        if cell.base == 'u' && i > 0 && cells[i - 1].base == 'q' {
            continue;
        }
        nucleus.push(i);
    }
    if cells.len() >= 2
        && cells[0].base == 'g'
        && cells[1].base == 'i'
        && nucleus.first() == Some(&1)
        && nucleus.len() > 1
    {
        nucleus.remove(0);
    }
    nucleus
}

/// Whether the buffer is within the bounds of a Vietnamese syllable:
/// a recognized onset, a contiguous known vowel cluster, a recognized coda.
/// Mark applications are gated on this; plain letters are not, so the user
/// can type through foreign words until a word break.
pub fn validate(buffer: &SyllableBuffer) -> bool {
    let cells = buffer.cells();
    let nucleus = nucleus_indices(cells);
    let Some((&first, &last)) = nucleus.first().zip(nucleus.last()) else {
        return false;
    };
    if nucleus.windows(2).any(|w| w[1] != w[0] + 1) {
        return false;
    }
    let onset: String = cells[..first].iter().map(|c| c.base).collect();
    let coda: String = cells[last + 1..].iter().map(|c| c.base).collect();
    let cluster: String = nucleus.iter().map(|&i| cells[i].base).collect();
    ONSETS.contains(onset.as_str())
        && CODAS.contains(coda.as_str())
        && NUCLEI.contains(cluster.as_str())
}

/// The cell index that carries the tone mark, per the placement rule.
/// Total and deterministic for every buffer; `None` only when there is no
/// nucleus at all.
pub fn tone_target(buffer: &SyllableBuffer, modern_tone: bool) -> Option<usize> {
    let cells = buffer.cells();
    let nucleus = nucleus_indices(cells);
    if nucleus.is_empty() {
        return None;
    }
    if let Some(&marked) = nucleus
        .iter()
        .rev()
        .find(|&&i| cells[i].marks.kind().is_some())
    {
        return Some(marked);
    }
    match nucleus.len() {
        1 => Some(nucleus[0]),
        2 => {
            let has_coda = nucleus[1] + 1 < cells.len();
            if has_coda {
                Some(nucleus[1])
            } else {
                let pair = (cells[nucleus[0]].base, cells[nucleus[1]].base);
                let open = matches!(pair, ('o', 'a') | ('o', 'e') | ('u', 'y'));
                if open && modern_tone {
                    Some(nucleus[1])
                } else {
                    Some(nucleus[0])
                }
            }
        }
        _ => Some(nucleus[1]),
    }
}

/// Render the buffer's display string with the tone placed by rule.
pub fn display(buffer: &SyllableBuffer, modern_tone: bool) -> String {
    buffer.render(tone_target(buffer, modern_tone))
}

/// Escalate a Telex letter keystroke into the double-letter action it
/// implies against the current buffer, if any: `aa`/`ee`/`oo` toggle the
/// circumflex, `dd` toggles the stroke. Literal cells and already
/// breve/horn-marked vowels do not participate.
pub fn escalate_doubling(buffer: &SyllableBuffer, ch: char) -> Option<KeyAction> {
    let cell = buffer.last_cell()?;
    if cell.literal {
        return None;
    }
    match ch {
        'a' | 'e' | 'o'
            if cell.base == ch
                && (cell.marks.is_empty() || cell.marks.contains(DiacriticKind::Circumflex)) =>
        {
            Some(KeyAction::ApplyDiacritic(DiacriticKind::Circumflex))
        }
        'd' if cell.base == 'd' || cell.base == 'đ' => Some(KeyAction::ToggleDoubleLetter),
        _ => None,
    }
}

/// Resolve a proposed action against the buffer.
///
/// `key` is the raw character of the triggering keystroke; the double-key
/// undo rule compares it against the buffer's last recorded key. The caller
/// guarantees one free cell of capacity.
pub fn resolve(buffer: &SyllableBuffer, action: KeyAction, key: char, caps: bool) -> Resolution {
    match action {
        KeyAction::AppendLetter(ch) => {
            let mut next = buffer.clone();
            if !next.push(Cell::letter(ch, caps)) {
                return Resolution::Reject;
            }
            repair_horn_pair(&mut next);
            next.record_key(key);
            Resolution::Updated(next)
        }
        KeyAction::ApplyTone(tone) => apply_tone(buffer, tone, key, caps),
        KeyAction::ApplyDiacritic(kind) => apply_diacritic(buffer, kind, key, caps),
        KeyAction::ToggleDoubleLetter => toggle_stroke(buffer, key, caps),
        KeyAction::Undo => strip_tone(buffer, key),
        // Never proposed to the resolver
        KeyAction::PassThrough | KeyAction::WordBreak => Resolution::Reject,
    }
}

fn apply_tone(buffer: &SyllableBuffer, tone: Tone, key: char, caps: bool) -> Resolution {
    if !validate(buffer) {
        return Resolution::Reject;
    }
    let mut next = buffer.clone();
    if next.tone() == Some(tone) && next.last_key() == Some(key) {
        // Doubled tone key cancels the mark and falls back to the letter
        next.set_tone(None);
        if !next.push(Cell::literal(key, caps)) {
            return Resolution::Reject;
        }
    } else {
        next.set_tone(Some(tone));
    }
    next.record_key(key);
    Resolution::Updated(next)
}

fn apply_diacritic(
    buffer: &SyllableBuffer,
    kind: DiacriticKind,
    key: char,
    caps: bool,
) -> Resolution {
    if !validate(buffer) {
        return Resolution::Reject;
    }
    let (kind, targets) = match diacritic_targets(buffer.cells(), kind) {
        Some(found) => found,
        None => return Resolution::Reject,
    };

    let mut next = buffer.clone();
    let applied_everywhere = targets
        .iter()
        .all(|&i| next.cells()[i].marks.contains(kind));
    if applied_everywhere && next.last_key() == Some(key) {
        // Doubled mark key cancels. A synthesized vowel (Telex lone `w`)
        // reverts to the raw key; real vowels shed the mark and the key
        // lands literally after them.
        if targets.len() == 1 && next.cells()[targets[0]].synthetic {
            let upper = next.cells()[targets[0]].upper;
            if let Some(cell) = next.cell_mut(targets[0]) {
                *cell = Cell::literal(key, upper);
            }
        } else {
            for &i in &targets {
                if let Some(cell) = next.cell_mut(i) {
                    cell.marks.remove(kind);
                }
            }
            if !next.push(Cell::literal(key, caps)) {
                return Resolution::Reject;
            }
        }
    } else {
        for &i in &targets {
            if let Some(cell) = next.cell_mut(i) {
                cell.marks.replace(kind);
            }
        }
    }
    next.record_key(key);
    Resolution::Updated(next)
}

/// Pick the cells a shape mark lands on, possibly reinterpreting the kind:
/// a horn with no `o`/`u` in reach realizes as a breve on `a`, the
/// convention the Telex `w` key follows. Only nucleus vowels are eligible,
/// so the glide `u` of `qu` never takes a horn (`quowr` gives `quở`).
fn diacritic_targets(cells: &[Cell], kind: DiacriticKind) -> Option<(DiacriticKind, Vec<usize>)> {
    let nucleus = nucleus_indices(cells);
    let rightmost = |bases: &[char]| {
        nucleus
            .iter()
            .rev()
            .find(|&&i| bases.contains(&cells[i].base))
            .copied()
    };
    match kind {
        DiacriticKind::Circumflex => rightmost(&['a', 'e', 'o']).map(|i| (kind, vec![i])),
        DiacriticKind::Breve => rightmost(&['a']).map(|i| (kind, vec![i])),
        DiacriticKind::Horn => {
            for w in nucleus.windows(2).rev() {
                if w[1] == w[0] + 1 && cells[w[0]].base == 'u' && cells[w[1]].base == 'o' {
                    // A closed uo horns as a pair (nước, thương); a bare
                    // trailing uo horns only the o (thuở, huơ) and the u
                    // catches up if the word grows, see repair_horn_pair.
                    if w[1] + 1 < cells.len() {
                        return Some((kind, vec![w[0], w[1]]));
                    }
                    return Some((kind, vec![w[1]]));
                }
            }
            // Otherwise the rightmost hornable vowel wins, `a` taking the
            // mark as a breve: hoaw gives hoă (hoặc), thuw gives thư.
            let i = rightmost(&['a', 'o', 'u'])?;
            if cells[i].base == 'a' {
                Some((DiacriticKind::Breve, vec![i]))
            } else {
                Some((kind, vec![i]))
            }
        }
    }
}

/// Typing past a trailing `uơ` completes the horn pair: `nuow` shows `nuơ`,
/// then the `c` of nước arrives and the `u` horns to match. The glide `u`
/// of `qu` is left alone.
fn repair_horn_pair(next: &mut SyllableBuffer) {
    let cells = next.cells();
    if cells.len() < 3 {
        return;
    }
    let o = cells.len() - 2;
    let u = o - 1;
    let trailing_pair = cells[o].base == 'o'
        && cells[o].marks.contains(DiacriticKind::Horn)
        && cells[u].base == 'u'
        && cells[u].marks.is_empty()
        && !(u > 0 && cells[u - 1].base == 'q');
    if trailing_pair {
        if let Some(cell) = next.cell_mut(u) {
            cell.marks.replace(DiacriticKind::Horn);
        }
    }
}

fn toggle_stroke(buffer: &SyllableBuffer, key: char, caps: bool) -> Resolution {
    let cells = buffer.cells();
    let target = match cells.last() {
        Some(cell) if matches!(cell.base, 'd' | 'đ') => Some(cells.len() - 1),
        _ => cells.iter().position(|c| matches!(c.base, 'd' | 'đ')),
    };
    let Some(target) = target else {
        return Resolution::Reject;
    };

    let mut next = buffer.clone();
    if next.cells()[target].base == 'đ' {
        if next.last_key() != Some(key) {
            return Resolution::Reject;
        }
        if let Some(cell) = next.cell_mut(target) {
            cell.base = 'd';
        }
        if !next.push(Cell::literal(key, caps)) {
            return Resolution::Reject;
        }
    } else if let Some(cell) = next.cell_mut(target) {
        cell.base = 'đ';
    }
    next.record_key(key);
    Resolution::Updated(next)
}

fn strip_tone(buffer: &SyllableBuffer, key: char) -> Resolution {
    if buffer.tone().is_none() {
        return Resolution::Reject;
    }
    let mut next = buffer.clone();
    next.set_tone(None);
    next.record_key(key);
    Resolution::Updated(next)
}

/// Append the triggering key as literal text after a rejection. With
/// `w_to_horn_u` (Telex `w` shortcut) the synthesized cell renders `ư` and
/// remembers how to undo back to the raw `w`.
pub fn append_literal(
    buffer: &SyllableBuffer,
    key: char,
    caps: bool,
    w_to_horn_u: bool,
) -> Option<SyllableBuffer> {
    let mut next = buffer.clone();
    let cell = if w_to_horn_u && key == 'w' {
        let mut marks = DiacriticSet::empty();
        marks.insert(DiacriticKind::Horn);
        Cell {
            base: 'u',
            marks,
            upper: caps,
            literal: false,
            synthetic: true,
        }
    } else {
        Cell::literal(key, caps)
    };
    if !next.push(cell) {
        return None;
    }
    next.record_key(key);
    Some(next)
}
