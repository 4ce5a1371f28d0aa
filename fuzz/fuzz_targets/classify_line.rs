#![no_main]

use launchtime::anchor::TimestampSource;
use launchtime::classifier::Classifier;
use launchtime::recognizer::RecognizerRegistry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Same permissive decoding as the live driver
    let text = String::from_utf8_lossy(data);
    let Ok(registry) = RecognizerRegistry::builtin() else {
        return;
    };
    let mut classifier = Classifier::new(registry);
    for line in text.lines() {
        // Must not panic, including on malformed journal timestamps
        let _ = classifier.classify(line, TimestampSource::PreferJournal(0.0));
    }
});
