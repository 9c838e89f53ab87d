#![no_main]

use germinate::tagfile::Reader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let mut reader = Reader::new(data.as_bytes());
    while let Ok(Some(_)) = reader.next_paragraph() {}
});
