#![no_main]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use libfuzzer_sys::fuzz_target;
use relayer_chain_sdk::services::blockchain::decode_epoch_height;

fuzz_target!(|data: &[u8]| {
    // Raw text as returned by a node
    let text = String::from_utf8_lossy(data);
    let _ = decode_epoch_height(Some(&text));

    // Well-formed base64 of arbitrary bytes
    let encoded = STANDARD.encode(data);
    match decode_epoch_height(Some(&encoded)) {
        Ok(height) => assert!(data.len() <= 8 && (data.is_empty() || height >= 1)),
        Err(_) => assert!(data.len() > 8 || data.iter().all(|b| *b == 0xff)),
    }
});
