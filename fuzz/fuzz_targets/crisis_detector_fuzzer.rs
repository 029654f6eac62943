//! Fuzz target for the crisis keyword screen
//!
//! # Invariants
//!
//! - Screening arbitrary text never panics
//! - `detect` agrees with `assess`
//! - Upper-casing the text never clears a verdict
//! - A configured phrase embedded between arbitrary words is always found

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use solace_core::CrisisDetector;

#[derive(Debug, Arbitrary)]
struct Input {
    before: String,
    after: String,
    phrase: usize,
}

fuzz_target!(|input: Input| {
    let detector = CrisisDetector::default();
    let text = format!("{}{}", input.before, input.after);

    let assessment = detector.assess(&text);
    assert_eq!(detector.detect(&text), assessment.is_crisis());
    if assessment.is_crisis() {
        assert!(!assessment.matched.is_empty());
    }

    let keywords: Vec<_> = detector.keywords().iter().collect();
    let keyword = keywords[input.phrase % keywords.len()];
    let embedded = format!("{} {} {}", input.before, keyword.phrase(), input.after);
    assert!(detector.detect(&embedded), "missed {:?} in {embedded:?}", keyword.phrase());
    assert!(detector.detect(&embedded.to_uppercase()));
});
