//! Interactive terminal demo: type key sequences, see the composed text.
//!
//! Each input line is fed to the engine key by key (letters map to their
//! virtual key codes, space breaks the word). Commands:
//!   :telex   switch to Telex
//!   :vni     switch to VNI
//!   :modern  toggle modern tone placement
//!   :quit    exit

use std::io::{self, BufRead, Write};

use libviet_core::{key_code_for_char, KeyEvent, Method, VietEngine};

fn feed_line(engine: &mut VietEngine, line: &str) -> String {
    let mut host = String::new();
    for ch in line.chars() {
        let Some(code) = key_code_for_char(ch) else {
            host.push(ch);
            continue;
        };
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
    // end of line terminates the last word
    engine.reset();
    host
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = VietEngine::with_method(Method::Telex);
    println!("libviet interactive demo — method: Telex");
    println!("type key sequences (e.g. 'vieetj nam'), :telex :vni :modern :quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        match line {
            ":quit" => break,
            ":telex" => {
                engine.set_method(Method::Telex);
                println!("✓ method: Telex");
            }
            ":vni" => {
                engine.set_method(Method::Vni);
                println!("✓ method: VNI");
            }
            ":modern" => {
                let flipped = !engine.config().modern_tone;
                engine.config_mut().modern_tone = flipped;
                println!("✓ modern tone placement: {}", flipped);
            }
            _ => {
                let text = feed_line(&mut engine, line);
                println!("{}", text);
            }
        }
    }
    Ok(())
}
