#![no_main]

use libfuzzer_sys::fuzz_target;
use surfswitch_harness::script::Script;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Parsing must never panic.
    let Ok(script) = Script::parse(text) else {
        return;
    };

    // Every parsed step prints back to an equivalent step.
    let printed: Vec<String> = script.steps().iter().map(ToString::to_string).collect();
    let reparsed = Script::parse(&printed.join("\n")).expect("printed script must parse");
    assert_eq!(script, reparsed, "display/parse mismatch");
});
