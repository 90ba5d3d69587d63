// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::codec::h264::level::Level;
use crate::codec::h264::ptl::Profile;
use crate::codec::Codec;
use crate::encoder::CodecProfile;
use crate::encoder::ConfigError;
use crate::encoder::Tunings;
use crate::encoder::VideoCodecSettings;
use crate::negotiator::negotiate_level;
use crate::negotiator::ProfileIdMap;
use crate::nvenc;
use crate::nvenc::NvEncH264Profiles;
use crate::sdp::Format;
use crate::Resolution;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    pub resolution: Resolution,
    pub profile: Profile,
    pub level: Level,
    /// Initial tunings values
    pub initial_tunings: Tunings,
}

impl EncoderConfig {
    /// Configures `profile` at the level `settings` require, provided the
    /// hardware declaring `formats` supports it.
    pub fn negotiate(
        settings: &VideoCodecSettings,
        profile: Profile,
        formats: &[Format],
    ) -> Result<Self, ConfigError> {
        let map = NvEncH264Profiles;
        if map.to_id(profile).is_none() {
            return Err(ConfigError::UnsupportedProfile(CodecProfile::H264(profile)));
        }

        let advertised = nvenc::h264_capabilities(formats);
        let level = negotiate_level(&map, &settings.requirement(), &advertised, profile)
            .ok_or(ConfigError::NoSupportedLevel {
                codec: Codec::H264,
                resolution: settings.resolution,
                framerate: settings.max_framerate,
            })?;

        Ok(Self {
            resolution: settings.resolution,
            profile,
            level,
            initial_tunings: settings.initial_tunings(),
        })
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        // Artificially encoder configuration with intent to be widely supported.
        Self {
            resolution: Resolution {
                width: 320,
                height: 240,
            },
            profile: Profile::Baseline,
            level: Level::L4,
            initial_tunings: Default::default(),
        }
    }
}
