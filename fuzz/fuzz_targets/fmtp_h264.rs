#![no_main]

use codec_caps::codec::h264::ptl::ProfileLevelId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(id) = data.parse::<ProfileLevelId>() {
        // Anything accepted must be written back in a form that parses the same.
        assert_eq!(id.to_string().parse::<ProfileLevelId>(), Ok(id));
    }
});
