#![no_main]

use libfuzzer_sys::fuzz_target;

use airdrop_types::amount::VESTS;
use airdrop_types::parse_asset_amount;

fuzz_target!(|data: &str| {
    if let Ok(value) = parse_asset_amount(data, VESTS) {
        assert!(value.is_finite() && value >= 0.0);
    }
});
