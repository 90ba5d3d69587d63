// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Encoder configuration.
//!
//! [`EncoderConfig::configure`] negotiates the level of a hardware encoding
//! session from the settings handed over by the session and the formats the
//! hardware declares. Encoding itself is done by the hardware backend.

pub mod h264;
pub mod h265;

use thiserror::Error;

use crate::codec::h264::ptl::Profile as H264Profile;
use crate::codec::h265::ptl::Profile as H265Profile;
use crate::codec::Codec;
use crate::negotiator::StreamRequirement;
use crate::nvenc::NvEncLevel;
use crate::sdp::Format;
use crate::Resolution;

/// Specifies the encoder operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateControl {
    /// The encoder shall maintain the constant bitrate, in bits per second
    ConstantBitrate(u64),

    /// The encoder shall maintain codec specific quality parameter constant (eg. QP for H.264)
    /// disregarding bitrate.
    ConstantQuality(u32),
}

impl RateControl {
    pub fn bitrate_target(&self) -> Option<u64> {
        match self {
            RateControl::ConstantBitrate(target) => Some(*target),
            RateControl::ConstantQuality(_) => None,
        }
    }
}

/// Dynamic parameters of the encoded stream that client may choose to change during the encoding
/// session without recreating the entire encoder instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunings {
    /// The stream's [`RateControl`]
    pub rate_control: RateControl,
    /// Stream framerate in frames per second
    pub framerate: u32,
    /// Minimum value of codec specific quality parameter constant (eg. QP for H.264)
    pub min_quality: u32,
    /// Maximum value of codec specific quality parameter constant (eg. QP for H.264)
    pub max_quality: u32,
}

impl Default for Tunings {
    fn default() -> Self {
        Self {
            rate_control: RateControl::ConstantBitrate(200_000),
            framerate: 30,
            min_quality: 0,
            max_quality: u32::MAX,
        }
    }
}

/// Profile requested for an encoding session, which also selects the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecProfile {
    H264(H264Profile),
    H265(H265Profile),
}

impl CodecProfile {
    pub fn codec(&self) -> Codec {
        match self {
            CodecProfile::H264(_) => Codec::H264,
            CodecProfile::H265(_) => Codec::H265,
        }
    }
}

/// Settings of an encoding session, as handed over by the session layer.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoCodecSettings {
    pub resolution: Resolution,
    pub profile: CodecProfile,
    /// Frames per second.
    pub max_framerate: f32,
    /// Bitrate ceiling in kbps, if the session sets one.
    pub max_bitrate_kbps: Option<u32>,
}

impl VideoCodecSettings {
    pub fn new(resolution: Resolution, profile: CodecProfile, max_framerate: f32) -> Self {
        Self {
            resolution,
            profile,
            max_framerate,
            max_bitrate_kbps: None,
        }
    }

    pub fn codec(&self) -> Codec {
        self.profile.codec()
    }

    pub fn requirement(&self) -> StreamRequirement {
        StreamRequirement {
            resolution: self.resolution,
            framerate: self.max_framerate,
            bitrate_kbps: self.max_bitrate_kbps,
        }
    }

    /// Tunings the session starts with.
    pub fn initial_tunings(&self) -> Tunings {
        let defaults = Tunings::default();

        Tunings {
            rate_control: self
                .max_bitrate_kbps
                .map(|kbps| RateControl::ConstantBitrate(u64::from(kbps) * 1000))
                .unwrap_or(defaults.rate_control),
            framerate: if self.max_framerate.is_finite() && self.max_framerate > 0.0 {
                self.max_framerate.ceil() as u32
            } else {
                defaults.framerate
            },
            ..defaults
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("the encoder does not support profile {0:?}")]
    UnsupportedProfile(CodecProfile),
    #[error(
        "no supported {codec} level for {}x{} at {framerate} fps",
        .resolution.width,
        .resolution.height
    )]
    NoSupportedLevel {
        codec: Codec,
        resolution: Resolution,
        framerate: f32,
    },
}

/// Static information about a configured encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderInfo {
    pub implementation_name: &'static str,
    pub codec: Codec,
    pub level: NvEncLevel,
    pub resolution: Resolution,
    pub is_hardware_accelerated: bool,
    pub supports_native_handle: bool,
}

pub const IMPLEMENTATION_NAME: &str = "NvCodec";

/// Configuration of a hardware encoding session, per codec.
#[derive(Clone, Debug, PartialEq)]
pub enum EncoderConfig {
    H264(h264::EncoderConfig),
    H265(h265::EncoderConfig),
}

impl EncoderConfig {
    /// Negotiates the configuration of a session encoding with `settings` on
    /// hardware declaring `formats`.
    pub fn configure(
        settings: &VideoCodecSettings,
        formats: &[Format],
    ) -> Result<Self, ConfigError> {
        let config = match settings.profile {
            CodecProfile::H264(profile) => {
                h264::EncoderConfig::negotiate(settings, profile, formats).map(EncoderConfig::H264)
            }
            CodecProfile::H265(profile) => {
                h265::EncoderConfig::negotiate(settings, profile, formats).map(EncoderConfig::H265)
            }
        };

        match &config {
            Ok(config) => log::debug!("configured encoder: {:?}", config),
            Err(e) => log::error!("failed to configure encoder: {}", e),
        }

        config
    }

    pub fn codec(&self) -> Codec {
        match self {
            EncoderConfig::H264(_) => Codec::H264,
            EncoderConfig::H265(_) => Codec::H265,
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            EncoderConfig::H264(config) => config.resolution,
            EncoderConfig::H265(config) => config.resolution,
        }
    }

    pub fn initial_tunings(&self) -> &Tunings {
        match self {
            EncoderConfig::H264(config) => &config.initial_tunings,
            EncoderConfig::H265(config) => &config.initial_tunings,
        }
    }

    pub fn info(&self) -> EncoderInfo {
        let level = match self {
            EncoderConfig::H264(config) => NvEncLevel::from(config.level),
            EncoderConfig::H265(config) => NvEncLevel::from(config.level),
        };

        EncoderInfo {
            implementation_name: IMPLEMENTATION_NAME,
            codec: self.codec(),
            level,
            resolution: self.resolution(),
            is_hardware_accelerated: true,
            supports_native_handle: true,
        }
    }
}
