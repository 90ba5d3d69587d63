// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Profile, tier and level fields of already-parsed SDP video formats.
//!
//! Only the `fmtp` parameters carrying profile, tier and level are handled
//! here. Parsing and serializing the SDP text itself is left to the session
//! layer.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::codec::h264::level::Level as H264Level;
use crate::codec::h264::ptl::Profile as H264Profile;
use crate::codec::h264::ptl::ProfileLevelId;
use crate::codec::h265::level::Level as H265Level;
use crate::codec::h265::ptl::Profile as H265Profile;
use crate::codec::h265::ptl::ProfileTierLevel;
use crate::codec::h265::ptl::Tier;
use crate::codec::Codec;
use crate::negotiator::Capability;

pub const H264_FMTP_PROFILE_LEVEL_ID: &str = "profile-level-id";
pub const H264_FMTP_PACKETIZATION_MODE: &str = "packetization-mode";
pub const H264_FMTP_LEVEL_ASYMMETRY_ALLOWED: &str = "level-asymmetry-allowed";

pub const H265_FMTP_PROFILE_ID: &str = "profile-id";
pub const H265_FMTP_TIER_FLAG: &str = "tier-flag";
pub const H265_FMTP_LEVEL_ID: &str = "level-id";
pub const H265_FMTP_TX_MODE: &str = "tx-mode";

/// Single RTP stream, single transport. The only transmission mode in use for
/// point to point sessions.
pub const H265_TX_MODE_SRST: &str = "SRST";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FmtpError {
    #[error("invalid value {value:?} for fmtp parameter {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown profile idc {0}")]
    UnknownProfile(u8),
    #[error("unknown level idc {0}")]
    UnknownLevel(u8),
    #[error("high tier is not defined for level {0}")]
    HighTierBelowLevel4(H265Level),
}

/// A video format as declared in a session description: the codec name of
/// the `rtpmap` line and the `fmtp` parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Format {
    pub name: String,
    pub parameters: BTreeMap<String, String>,
}

impl Format {
    pub fn new<I, K, V>(name: &str, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Whether this format is for `codec`. Codec names are case-insensitive.
    pub fn is_codec(&self, codec: Codec) -> bool {
        self.name.eq_ignore_ascii_case(codec.sdp_name())
    }
}

fn parse_u8(
    parameters: &BTreeMap<String, String>,
    key: &'static str,
    default: u8,
) -> Result<u8, FmtpError> {
    match parameters.get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| FmtpError::InvalidValue {
            key,
            value: value.clone(),
        }),
    }
}

/// Parses the `profile-id`, `tier-flag` and `level-id` parameters, applying
/// the RFC 7798 defaults (Main profile, Main tier, level 3.1) to absent ones.
pub fn parse_h265_ptl(
    parameters: &BTreeMap<String, String>,
) -> Result<ProfileTierLevel, FmtpError> {
    let profile_idc = parse_u8(parameters, H265_FMTP_PROFILE_ID, H265Profile::Main.profile_idc())?;
    let tier_flag = parse_u8(parameters, H265_FMTP_TIER_FLAG, Tier::Main as u8)?;
    let level_idc = parse_u8(parameters, H265_FMTP_LEVEL_ID, H265Level::L3_1.level_idc())?;

    let profile =
        H265Profile::from_profile_idc(profile_idc).ok_or(FmtpError::UnknownProfile(profile_idc))?;
    let tier = Tier::n(tier_flag).ok_or_else(|| FmtpError::InvalidValue {
        key: H265_FMTP_TIER_FLAG,
        value: tier_flag.to_string(),
    })?;
    let level = H265Level::from_level_idc(level_idc).ok_or(FmtpError::UnknownLevel(level_idc))?;

    let ptl = ProfileTierLevel::new(profile, tier, level);
    if !ptl.is_valid() {
        return Err(FmtpError::HighTierBelowLevel4(level));
    }

    Ok(ptl)
}

/// Parses the `profile-level-id` parameter, defaulting to Constrained
/// Baseline level 3.1 when absent.
pub fn parse_h264_profile_level_id(
    parameters: &BTreeMap<String, String>,
) -> Result<ProfileLevelId, FmtpError> {
    match parameters.get(H264_FMTP_PROFILE_LEVEL_ID) {
        None => Ok(ProfileLevelId::default()),
        Some(value) => value.parse(),
    }
}

/// Builds an H.265 format declaring `profile`, `level` and `tier`.
pub fn h265_format(profile: H265Profile, level: H265Level, tier: Tier, tx_mode: &str) -> Format {
    Format::new(
        Codec::H265.sdp_name(),
        [
            (H265_FMTP_PROFILE_ID, profile.profile_idc().to_string()),
            (H265_FMTP_LEVEL_ID, level.level_idc().to_string()),
            (H265_FMTP_TIER_FLAG, (tier as u8).to_string()),
            (H265_FMTP_TX_MODE, tx_mode.to_string()),
        ],
    )
}

/// Builds an H.264 format declaring `profile` and `level`.
pub fn h264_format(profile: H264Profile, level: H264Level, packetization_mode: &str) -> Format {
    Format::new(
        Codec::H264.sdp_name(),
        [
            (H264_FMTP_LEVEL_ASYMMETRY_ALLOWED, "1".to_string()),
            (H264_FMTP_PACKETIZATION_MODE, packetization_mode.to_string()),
            (
                H264_FMTP_PROFILE_LEVEL_ID,
                ProfileLevelId::new(profile, level).to_string(),
            ),
        ],
    )
}

/// Collects the H.265 profile, tier and level advertised by `formats`.
/// Formats of other codecs and formats with malformed fields are skipped.
pub fn h265_capabilities(formats: &[Format]) -> Vec<Capability<H265Profile, H265Level>> {
    formats
        .iter()
        .filter(|format| format.is_codec(Codec::H265))
        .filter_map(|format| match parse_h265_ptl(&format.parameters) {
            Ok(ptl) => Some(Capability::new(ptl.profile, ptl.level, ptl.tier)),
            Err(e) => {
                log::debug!("skipping H.265 format {:?}: {}", format.parameters, e);
                None
            }
        })
        .collect()
}

/// Collects the H.264 profile and level advertised by `formats`. Formats of
/// other codecs and formats with malformed fields are skipped.
pub fn h264_capabilities(formats: &[Format]) -> Vec<Capability<H264Profile, H264Level>> {
    formats
        .iter()
        .filter(|format| format.is_codec(Codec::H264))
        .filter_map(|format| match parse_h264_profile_level_id(&format.parameters) {
            Ok(id) => Some(Capability::new(id.profile, id.level, Tier::Main)),
            Err(e) => {
                log::debug!("skipping H.264 format {:?}: {}", format.parameters, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn h265_defaults() {
        assert_eq!(
            parse_h265_ptl(&BTreeMap::new()),
            Ok(ProfileTierLevel::new(H265Profile::Main, Tier::Main, H265Level::L3_1))
        );
    }

    #[test]
    fn h265_explicit_values() {
        let parameters = params(&[("profile-id", "2"), ("tier-flag", "1"), ("level-id", "153")]);
        assert_eq!(
            parse_h265_ptl(&parameters),
            Ok(ProfileTierLevel::new(H265Profile::Main10, Tier::High, H265Level::L5_1))
        );
    }

    #[test]
    fn h265_invalid_values() {
        assert_eq!(
            parse_h265_ptl(&params(&[("profile-id", "main")])),
            Err(FmtpError::InvalidValue {
                key: H265_FMTP_PROFILE_ID,
                value: "main".to_string()
            })
        );
        assert_eq!(
            parse_h265_ptl(&params(&[("profile-id", "12")])),
            Err(FmtpError::UnknownProfile(12))
        );
        assert_eq!(
            parse_h265_ptl(&params(&[("level-id", "94")])),
            Err(FmtpError::UnknownLevel(94))
        );
        assert_eq!(
            parse_h265_ptl(&params(&[("level-id", "256")])),
            Err(FmtpError::InvalidValue {
                key: H265_FMTP_LEVEL_ID,
                value: "256".to_string()
            })
        );
        assert!(matches!(
            parse_h265_ptl(&params(&[("tier-flag", "2")])),
            Err(FmtpError::InvalidValue { key: H265_FMTP_TIER_FLAG, .. })
        ));
        assert_eq!(
            parse_h265_ptl(&params(&[("tier-flag", "1"), ("level-id", "93")])),
            Err(FmtpError::HighTierBelowLevel4(H265Level::L3_1))
        );
    }

    #[test]
    fn h264_defaults() {
        assert_eq!(
            parse_h264_profile_level_id(&BTreeMap::new()),
            Ok(ProfileLevelId::new(H264Profile::ConstrainedBaseline, H264Level::L3_1))
        );
    }

    #[test]
    fn h265_format_round_trip() {
        let format =
            h265_format(H265Profile::Main10, H265Level::L5_2, Tier::High, H265_TX_MODE_SRST);
        assert_eq!(format.name, "H265");
        assert_eq!(format.parameters["profile-id"], "2");
        assert_eq!(format.parameters["level-id"], "156");
        assert_eq!(format.parameters["tier-flag"], "1");
        assert_eq!(format.parameters["tx-mode"], "SRST");
        assert_eq!(
            parse_h265_ptl(&format.parameters),
            Ok(ProfileTierLevel::new(H265Profile::Main10, Tier::High, H265Level::L5_2))
        );
    }

    #[test]
    fn h264_format_parameters() {
        let format = h264_format(H264Profile::High, H264Level::L5_1, "1");
        assert_eq!(format.name, "H264");
        assert_eq!(format.parameters["profile-level-id"], "640033");
        assert_eq!(format.parameters["packetization-mode"], "1");
        assert_eq!(format.parameters["level-asymmetry-allowed"], "1");
    }

    #[test]
    fn capabilities_skip_other_codecs_and_garbage() {
        let formats = vec![
            Format::new("VP8", Vec::<(String, String)>::new()),
            Format::new("h265", [("profile-id", "1"), ("level-id", "120")]),
            Format::new("H265", [("level-id", "garbage")]),
            Format::new("H265", [("profile-id", "2"), ("level-id", "153")]),
            h264_format(H264Profile::Main, H264Level::L4_1, "1"),
            Format::new("H264", [("profile-level-id", "zzzzzz")]),
        ];

        assert_eq!(
            h265_capabilities(&formats),
            vec![
                Capability::new(H265Profile::Main, H265Level::L4, Tier::Main),
                Capability::new(H265Profile::Main10, H265Level::L5_1, Tier::Main),
            ]
        );
        assert_eq!(
            h264_capabilities(&formats),
            vec![Capability::new(H264Profile::Main, H264Level::L4_1, Tier::Main)]
        );
    }
}
