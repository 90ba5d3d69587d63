// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::codec::h265::level::Level;
use crate::codec::h265::ptl::Profile;
use crate::codec::h265::ptl::Tier;
use crate::codec::Codec;
use crate::encoder::CodecProfile;
use crate::encoder::ConfigError;
use crate::encoder::Tunings;
use crate::encoder::VideoCodecSettings;
use crate::negotiator::negotiate_level;
use crate::negotiator::ProfileIdMap;
use crate::nvenc;
use crate::nvenc::NvEncHevcProfiles;
use crate::sdp::Format;
use crate::Resolution;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    pub resolution: Resolution,
    pub profile: Profile,
    pub tier: Tier,
    pub level: Level,
    /// Initial tunings values
    pub initial_tunings: Tunings,
}

impl EncoderConfig {
    /// Configures `profile` at the level `settings` require, provided the
    /// hardware declaring `formats` supports it. Levels are negotiated in the
    /// Main tier.
    pub fn negotiate(
        settings: &VideoCodecSettings,
        profile: Profile,
        formats: &[Format],
    ) -> Result<Self, ConfigError> {
        let map = NvEncHevcProfiles;
        if map.to_id(profile).is_none() {
            return Err(ConfigError::UnsupportedProfile(CodecProfile::H265(profile)));
        }

        let advertised = nvenc::hevc_capabilities(formats);
        let level = negotiate_level(&map, &settings.requirement(), &advertised, profile)
            .ok_or(ConfigError::NoSupportedLevel {
                codec: Codec::H265,
                resolution: settings.resolution,
                framerate: settings.max_framerate,
            })?;

        Ok(Self {
            resolution: settings.resolution,
            profile,
            tier: Tier::Main,
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
            profile: Profile::Main,
            tier: Tier::Main,
            level: Level::L4,
            initial_tunings: Default::default(),
        }
    }
}
