//! Telex fixtures: whole key sequences through the engine, checked against
//! the canonical precomposed spelling.

use libviet_core::{key_code_for_char, KeyEvent, Method, VietEngine};

/// Feed printable keys and maintain the host's view of the text.
fn type_seq(engine: &mut VietEngine, keys: &str) -> String {
    let mut host = String::new();
    for ch in keys.chars() {
        let code = key_code_for_char(ch).expect("unmapped fixture key");
        let event = if ch.is_ascii_uppercase() {
            KeyEvent::with_caps(code)
        } else {
            KeyEvent::new(code)
        };
        let out = engine.process_key(event);
        if out.is_none() {
            host.push(ch);
            continue;
        }
        for _ in 0..out.backspace() {
            host.pop();
        }
        host.push_str(&out.text());
    }
    host
}

fn telex(keys: &str) -> String {
    let mut engine = VietEngine::with_method(Method::Telex);
    type_seq(&mut engine, keys)
}

#[test]
fn test_basic_words() {
    assert_eq!(telex("nam"), "nam");
    assert_eq!(telex("vieetj"), "việt");
    assert_eq!(telex("ddaays"), "đấy");
    assert_eq!(telex("ddoongj"), "động");
    assert_eq!(telex("tieengs"), "tiếng");
    assert_eq!(telex("chuyeenj"), "chuyện");
    assert_eq!(telex("nguyeenx"), "nguyễn");
}

#[test]
fn test_horn_words() {
    assert_eq!(telex("nuowcs"), "nước");
    assert_eq!(telex("nguwowif"), "người");
    assert_eq!(telex("muwowtj"), "mượt");
    assert_eq!(telex("thuw"), "thư");
    // w before any vowel synthesizes ư and the pair still horns
    assert_eq!(telex("hwowng"), "hương");
}

#[test]
fn test_uo_cluster_words() {
    // a bare trailing uo keeps the plain u
    assert_eq!(telex("thuowr"), "thuở");
    assert_eq!(telex("huow"), "huơ");
    assert_eq!(telex("quowr"), "quở");
    // and the u horns to match once the word grows
    assert_eq!(telex("cuowif"), "cười");
    assert_eq!(telex("huowu"), "hươu");
}

#[test]
fn test_breve_words() {
    assert_eq!(telex("awn"), "ăn");
    assert_eq!(telex("hoawcj"), "hoặc");
    assert_eq!(telex("nawm"), "năm");
}

#[test]
fn test_tone_placement_pairs_and_triples() {
    assert_eq!(telex("hoas"), "hóa");
    assert_eq!(telex("hoaf"), "hòa");
    assert_eq!(telex("hoans"), "hoán");
    assert_eq!(telex("thuyr"), "thủy");
    assert_eq!(telex("cuar"), "của");
    assert_eq!(telex("khuyur"), "khuỷu");
    assert_eq!(telex("mais"), "mái");
}

#[test]
fn test_glide_onsets() {
    assert_eq!(telex("quar"), "quả");
    assert_eq!(telex("quys"), "quý");
    assert_eq!(telex("gias"), "giá");
    assert_eq!(telex("gif"), "gì");
}

#[test]
fn test_w_shortcut() {
    assert_eq!(telex("tw"), "tư");
    assert_eq!(telex("uw"), "ư");
    assert_eq!(telex("w"), "ư");
}

#[test]
fn test_double_key_undo_enumerated() {
    // circumflex toggle
    assert_eq!(telex("aa"), "â");
    assert_eq!(telex("aaa"), "aa");
    assert_eq!(telex("aaaa"), "aaa");
    // tone cancel, and re-application gated by the invalid coda s
    assert_eq!(telex("as"), "á");
    assert_eq!(telex("ass"), "as");
    assert_eq!(telex("asss"), "ass");
    // horn / breve cancel
    assert_eq!(telex("aww"), "aw");
    assert_eq!(telex("uww"), "uw");
    assert_eq!(telex("ww"), "w");
    // stroke toggle
    assert_eq!(telex("dd"), "đ");
    assert_eq!(telex("ddd"), "dd");
}

#[test]
fn test_tone_strip_key() {
    assert_eq!(telex("asz"), "a");
    assert_eq!(telex("aszz"), "az");
    // nothing to strip on an empty buffer: plain pass-through
    assert_eq!(telex("z"), "z");
}

#[test]
fn test_last_tone_wins() {
    assert_eq!(telex("asf"), "à");
    assert_eq!(telex("asfj"), "ạ");
}

#[test]
fn test_foreign_words_left_alone() {
    // invalid onsets and codas reject mark keys into literals
    assert_eq!(telex("clear"), "clear");
    assert_eq!(telex("start"), "start");
    assert_eq!(telex("gras"), "gras");
}

#[test]
fn test_uppercase() {
    assert_eq!(telex("Vieetj"), "Việt");
    assert_eq!(telex("VIEETJ"), "VIỆT");
    assert_eq!(telex("DDaf"), "Đà");
}
