#![no_main]

use libfuzzer_sys::fuzz_target;
use keyreg::key::KeyTemplate;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        if let Ok(template) = KeyTemplate::from_json(json) {
            // Parsed templates serialize back to an equal template
            let encoded = template.to_json().unwrap();
            assert_eq!(KeyTemplate::from_json(&encoded).unwrap(), template);
        }
    }
});
