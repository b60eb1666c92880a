#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dnswire;

use dnswire::Message;

fuzz_target!(|data: &[u8]| {
    if let Ok(m) = Message::from_slice(data) {
        // Anything that decodes must encode, and decode back to the same message.
        let wire = m.pack(false).expect("failed to pack a decoded message");
        let again = Message::from_slice(&wire).expect("failed to decode a packed message");
        assert_eq!(again, m);
    }
});
