#![no_main]

use germinate::dependency::Dependency;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = data.parse::<Dependency>();
});
