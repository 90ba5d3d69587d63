// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! ccaps, a small program showing the level negotiated for a stream on an NVENC-like encoder.
//!
//! The encoder is simulated: it declares every profile it has a GUID for, up to `--max-level`.

use anyhow::anyhow;
use anyhow::Context;
use argh::FromArgs;

use codec_caps::caps::CapabilityCache;
use codec_caps::codec::h264::level::Level as H264Level;
use codec_caps::codec::h264::ptl::Profile as H264Profile;
use codec_caps::codec::h265::level::Level as H265Level;
use codec_caps::codec::h265::ptl::Profile as H265Profile;
use codec_caps::codec::limits;
use codec_caps::codec::Codec;
use codec_caps::encoder::CodecProfile;
use codec_caps::encoder::EncoderConfig;
use codec_caps::encoder::VideoCodecSettings;
use codec_caps::nvenc;
use codec_caps::sdp::Format;
use codec_caps::Resolution;

/// Level negotiation
#[derive(Debug, FromArgs)]
struct Args {
    /// codec
    #[argh(option, default = "Codec::H265")]
    codec: Codec,

    /// stream width
    #[argh(option, default = "1920")]
    width: u32,

    /// stream height
    #[argh(option, default = "1080")]
    height: u32,

    /// framerate
    #[argh(option, default = "30.0")]
    framerate: f32,

    /// max bitrate in kbps
    #[argh(option)]
    bitrate: Option<u32>,

    /// profile (h264: cb, baseline, main, high, ch; h265: main, main10, rext)
    #[argh(option)]
    profile: Option<String>,

    /// highest level declared by the encoder, e.g. "5.1"
    #[argh(option, default = "String::from(\"6.2\")")]
    max_level: String,
}

fn parse_profile(codec: Codec, profile: Option<&str>) -> anyhow::Result<CodecProfile> {
    let profile = match (codec, profile) {
        (Codec::H264, None | Some("cb")) => CodecProfile::H264(H264Profile::ConstrainedBaseline),
        (Codec::H264, Some("baseline")) => CodecProfile::H264(H264Profile::Baseline),
        (Codec::H264, Some("main")) => CodecProfile::H264(H264Profile::Main),
        (Codec::H264, Some("high")) => CodecProfile::H264(H264Profile::High),
        (Codec::H264, Some("ch")) => CodecProfile::H264(H264Profile::ConstrainedHigh),
        (Codec::H265, None | Some("main")) => CodecProfile::H265(H265Profile::Main),
        (Codec::H265, Some("main10")) => CodecProfile::H265(H265Profile::Main10),
        (Codec::H265, Some("rext")) => CodecProfile::H265(H265Profile::RangeExtensions),
        (codec, Some(profile)) => return Err(anyhow!("unknown {codec} profile {profile:?}")),
    };

    Ok(profile)
}

/// Splits a "major.minor" level name into its two numbers.
fn parse_level_numbers(level: &str) -> anyhow::Result<(u32, u32)> {
    let (major, minor) = level.split_once('.').unwrap_or((level, "0"));
    let major: u8 = major.parse().with_context(|| format!("invalid level {level:?}"))?;
    let minor: u8 = minor.parse().with_context(|| format!("invalid level {level:?}"))?;

    Ok((u32::from(major), u32::from(minor)))
}

fn hardware_formats(codec: Codec, max_level: &str) -> anyhow::Result<Vec<Format>> {
    let formats = match codec {
        Codec::H264 => {
            let level = if max_level == "1b" {
                H264Level::L1B
            } else {
                let (major, minor) = parse_level_numbers(max_level)?;
                u8::try_from(major * 10 + minor)
                    .ok()
                    .and_then(|idc| H264Level::from_level_idc(idc, false))
                    .ok_or_else(|| anyhow!("unknown H.264 level {max_level}"))?
            };
            nvenc::h264_encoder_formats(
                &[
                    nvenc::NV_ENC_H264_PROFILE_BASELINE_GUID,
                    nvenc::NV_ENC_H264_PROFILE_MAIN_GUID,
                    nvenc::NV_ENC_H264_PROFILE_HIGH_GUID,
                    nvenc::NV_ENC_H264_PROFILE_CONSTRAINED_HIGH_GUID,
                ],
                level,
            )
        }
        Codec::H265 => {
            let (major, minor) = parse_level_numbers(max_level)?;
            let level = u8::try_from(major * 30 + minor * 3)
                .ok()
                .and_then(H265Level::from_level_idc)
                .ok_or_else(|| anyhow!("unknown H.265 level {max_level}"))?;
            nvenc::h265_encoder_formats(
                &[
                    nvenc::NV_ENC_HEVC_PROFILE_MAIN_GUID,
                    nvenc::NV_ENC_HEVC_PROFILE_MAIN10_GUID,
                    nvenc::NV_ENC_HEVC_PROFILE_FREXT_GUID,
                ],
                level,
            )
        }
    };

    Ok(formats)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();

    let resolution = Resolution::new(args.width, args.height);
    let profile = parse_profile(args.codec, args.profile.as_deref())?;
    let settings = VideoCodecSettings {
        max_bitrate_kbps: args.bitrate,
        ..VideoCodecSettings::new(resolution, profile, args.framerate)
    };

    let cache = CapabilityCache::new();
    let formats = cache.formats_or_query(|| hardware_formats(args.codec, &args.max_level))?;

    match args.codec {
        Codec::H264 => println!("max declared level: {:?}", cache.max_h264_level()),
        Codec::H265 => println!("max declared level: {:?}", cache.max_h265_level()),
    }

    let config = EncoderConfig::configure(&settings, formats)?;
    let info = config.info();
    println!("{info:?}");

    let pixel_count = u32::try_from(resolution.pixel_count())?;
    let max_framerate = match &config {
        EncoderConfig::H264(config) => limits::max_framerate(config.level, pixel_count),
        EncoderConfig::H265(config) => limits::max_framerate(config.level, pixel_count),
    };
    println!(
        "{}x{} at up to {} fps within the negotiated level",
        resolution.width, resolution.height, max_framerate
    );

    Ok(())
}
