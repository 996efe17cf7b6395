#![no_main]

use libfuzzer_sys::fuzz_target;
use surfswitch_render::color::Rgba;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 {
        return;
    }

    let Ok(color) = text.parse::<Rgba>() else {
        return;
    };

    // Canonical form parses back to the same color.
    let canonical = color.to_string();
    assert_eq!(canonical.parse::<Rgba>(), Ok(color), "{text:?} -> {canonical:?}");
    assert!(canonical.len() == 7 || canonical.len() == 9);
});
