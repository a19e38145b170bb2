#![no_main]

use flowscope::expression::{evaluate, parse, Bindings, Element};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(elements) = serde_json::from_slice::<Vec<Element>>(data) else {
        return;
    };
    if let Ok(ast) = parse(&elements) {
        let _ = evaluate(&ast, &Bindings::new());
    }
});
