#![no_main]

use std::collections::BTreeMap;

use codec_caps::codec::h265::level::supported_max_framerate;
use codec_caps::sdp::parse_h265_ptl;
use codec_caps::sdp::H265_FMTP_LEVEL_ID;
use codec_caps::sdp::H265_FMTP_PROFILE_ID;
use codec_caps::sdp::H265_FMTP_TIER_FLAG;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|values: (Option<&str>, Option<&str>, Option<&str>, u32)| {
    let (profile_id, tier_flag, level_id, pixel_count) = values;

    let mut parameters = BTreeMap::new();
    for (key, value) in [
        (H265_FMTP_PROFILE_ID, profile_id),
        (H265_FMTP_TIER_FLAG, tier_flag),
        (H265_FMTP_LEVEL_ID, level_id),
    ] {
        if let Some(value) = value {
            parameters.insert(key.to_string(), value.to_string());
        }
    }

    if let Ok(ptl) = parse_h265_ptl(&parameters) {
        assert!(ptl.is_valid());
        let _ = supported_max_framerate(ptl.level, pixel_count);
    }
});
