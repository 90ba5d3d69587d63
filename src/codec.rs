// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod h264;
pub mod h265;
pub mod limits;

use std::fmt;
use std::str::FromStr;

/// Video codecs whose profile, tier and level can be negotiated.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
pub enum Codec {
    #[default]
    H264,
    H265,
}

impl Codec {
    /// Codec name as used in SDP `rtpmap` lines.
    pub fn sdp_name(&self) -> &'static str {
        match self {
            Codec::H264 => "H264",
            Codec::H265 => "H265",
        }
    }
}

impl FromStr for Codec {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h264" | "H264" => Ok(Self::H264),
            "h265" | "H265" | "hevc" | "HEVC" => Ok(Self::H265),
            _ => Err("unrecognized codec. Valid values: h264, h265"),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sdp_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codec() {
        assert_eq!("h264".parse(), Ok(Codec::H264));
        assert_eq!("HEVC".parse(), Ok(Codec::H265));
        assert!("vp8".parse::<Codec>().is_err());
    }
}
