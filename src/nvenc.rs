// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! NVENC profile identifiers and level codes.
//!
//! NVENC names profiles by GUID. The GUIDs are kept as constants so that this
//! crate does not need to link against the NVENC runtime.

use std::fmt;

use crate::codec::h264::level::Level as H264Level;
use crate::codec::h264::ptl::Profile as H264Profile;
use crate::codec::h265::level::Level as H265Level;
use crate::codec::h265::ptl::Profile as H265Profile;
use crate::codec::limits::Tier;
use crate::negotiator::Capability;
use crate::negotiator::ProfileIdMap;
use crate::sdp;
use crate::sdp::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

// {0727BCAA-78C4-4c83-8C2F-EF3DFF267C6A}
pub const NV_ENC_H264_PROFILE_BASELINE_GUID: Guid = Guid::new(
    0x0727bcaa,
    0x78c4,
    0x4c83,
    [0x8c, 0x2f, 0xef, 0x3d, 0xff, 0x26, 0x7c, 0x6a],
);

// {60B5C1D4-67FE-4790-94D5-C4726D7B6E6D}
pub const NV_ENC_H264_PROFILE_MAIN_GUID: Guid = Guid::new(
    0x60b5c1d4,
    0x67fe,
    0x4790,
    [0x94, 0xd5, 0xc4, 0x72, 0x6d, 0x7b, 0x6e, 0x6d],
);

// {E7CBC309-4F7A-4b89-AF2A-D537C92BE310}
pub const NV_ENC_H264_PROFILE_HIGH_GUID: Guid = Guid::new(
    0xe7cbc309,
    0x4f7a,
    0x4b89,
    [0xaf, 0x2a, 0xd5, 0x37, 0xc9, 0x2b, 0xe3, 0x10],
);

// {B405AFAC-F32B-417B-89C4-9ABEED3E5978}
pub const NV_ENC_H264_PROFILE_CONSTRAINED_HIGH_GUID: Guid = Guid::new(
    0xb405afac,
    0xf32b,
    0x417b,
    [0x89, 0xc4, 0x9a, 0xbe, 0xed, 0x3e, 0x59, 0x78],
);

// {B514C39A-B55B-40fa-878F-F1253B4DFDEC}
pub const NV_ENC_HEVC_PROFILE_MAIN_GUID: Guid = Guid::new(
    0xb514c39a,
    0xb55b,
    0x40fa,
    [0x87, 0x8f, 0xf1, 0x25, 0x3b, 0x4d, 0xfd, 0xec],
);

// {fa4d2b6c-3a5b-411a-8018-0a3f5e3c9be5}
pub const NV_ENC_HEVC_PROFILE_MAIN10_GUID: Guid = Guid::new(
    0xfa4d2b6c,
    0x3a5b,
    0x411a,
    [0x80, 0x18, 0x0a, 0x3f, 0x5e, 0x3c, 0x9b, 0xe5],
);

// {51ec32b5-1b4c-453c-9cbd-b616bd621341}
pub const NV_ENC_HEVC_PROFILE_FREXT_GUID: Guid = Guid::new(
    0x51ec32b5,
    0x1b4c,
    0x453c,
    [0x9c, 0xbd, 0xb6, 0x16, 0xbd, 0x62, 0x13, 0x41],
);

/// H.264 profiles by NVENC profile GUID.
#[derive(Clone, Copy, Debug, Default)]
pub struct NvEncH264Profiles;

impl ProfileIdMap for NvEncH264Profiles {
    type Profile = H264Profile;
    type Id = Guid;

    fn to_id(&self, profile: H264Profile) -> Option<Guid> {
        match profile {
            // NVENC has no Constrained Baseline GUID, and Baseline is a
            // superset of it.
            H264Profile::Baseline | H264Profile::ConstrainedBaseline => {
                Some(NV_ENC_H264_PROFILE_BASELINE_GUID)
            }
            H264Profile::Main => Some(NV_ENC_H264_PROFILE_MAIN_GUID),
            H264Profile::High => Some(NV_ENC_H264_PROFILE_HIGH_GUID),
            H264Profile::ConstrainedHigh => Some(NV_ENC_H264_PROFILE_CONSTRAINED_HIGH_GUID),
            _ => None,
        }
    }

    fn to_profile(&self, id: &Guid) -> Option<H264Profile> {
        match *id {
            NV_ENC_H264_PROFILE_BASELINE_GUID => Some(H264Profile::Baseline),
            NV_ENC_H264_PROFILE_MAIN_GUID => Some(H264Profile::Main),
            NV_ENC_H264_PROFILE_HIGH_GUID => Some(H264Profile::High),
            NV_ENC_H264_PROFILE_CONSTRAINED_HIGH_GUID => Some(H264Profile::ConstrainedHigh),
            _ => None,
        }
    }
}

/// H.265 profiles by NVENC profile GUID.
#[derive(Clone, Copy, Debug, Default)]
pub struct NvEncHevcProfiles;

impl ProfileIdMap for NvEncHevcProfiles {
    type Profile = H265Profile;
    type Id = Guid;

    fn to_id(&self, profile: H265Profile) -> Option<Guid> {
        match profile {
            H265Profile::Main => Some(NV_ENC_HEVC_PROFILE_MAIN_GUID),
            H265Profile::Main10 => Some(NV_ENC_HEVC_PROFILE_MAIN10_GUID),
            H265Profile::RangeExtensions => Some(NV_ENC_HEVC_PROFILE_FREXT_GUID),
            _ => None,
        }
    }

    fn to_profile(&self, id: &Guid) -> Option<H265Profile> {
        match *id {
            NV_ENC_HEVC_PROFILE_MAIN_GUID => Some(H265Profile::Main),
            NV_ENC_HEVC_PROFILE_MAIN10_GUID => Some(H265Profile::Main10),
            NV_ENC_HEVC_PROFILE_FREXT_GUID => Some(H265Profile::RangeExtensions),
            _ => None,
        }
    }
}

/// An `NV_ENC_LEVEL` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NvEncLevel(pub u32);

impl From<H264Level> for NvEncLevel {
    fn from(level: H264Level) -> Self {
        // NV_ENC_LEVEL_H264_1b is 9, which is also the level_idc of 1b.
        NvEncLevel(u32::from(level.level_idc()))
    }
}

impl From<H265Level> for NvEncLevel {
    fn from(level: H265Level) -> Self {
        NvEncLevel(u32::from(level.level_idc()))
    }
}

/// Builds the H.264 formats an encoder supporting `profiles` up to `max_level`
/// declares. A Baseline GUID is declared as both Constrained Baseline and
/// Baseline; unknown GUIDs are left out.
pub fn h264_encoder_formats(profiles: &[Guid], max_level: H264Level) -> Vec<Format> {
    let map = NvEncH264Profiles;
    let mut formats = Vec::new();

    for guid in profiles {
        match map.to_profile(guid) {
            Some(H264Profile::Baseline) => {
                for profile in [H264Profile::ConstrainedBaseline, H264Profile::Baseline] {
                    formats.push(sdp::h264_format(profile, max_level, "1"));
                }
            }
            Some(profile) => formats.push(sdp::h264_format(profile, max_level, "1")),
            None => log::debug!("ignoring unknown H.264 profile GUID {}", guid),
        }
    }

    formats
}

/// Builds the H.265 formats an encoder supporting `profiles` up to `max_level`
/// declares, all in the Main tier. Unknown GUIDs are left out.
pub fn h265_encoder_formats(profiles: &[Guid], max_level: H265Level) -> Vec<Format> {
    let map = NvEncHevcProfiles;

    profiles
        .iter()
        .filter_map(|guid| match map.to_profile(guid) {
            Some(profile) => Some(sdp::h265_format(
                profile,
                max_level,
                Tier::Main,
                sdp::H265_TX_MODE_SRST,
            )),
            None => {
                log::debug!("ignoring unknown HEVC profile GUID {}", guid);
                None
            }
        })
        .collect()
}

/// Translates the H.264 capabilities declared by `formats` into NVENC profile
/// GUIDs. Profiles NVENC has no GUID for are left out.
pub fn h264_capabilities(formats: &[Format]) -> Vec<Capability<Guid, H264Level>> {
    let map = NvEncH264Profiles;

    sdp::h264_capabilities(formats)
        .into_iter()
        .filter_map(|c| Some(Capability::new(map.to_id(c.id)?, c.level, c.tier)))
        .collect()
}

/// Translates the H.265 capabilities declared by `formats` into NVENC profile
/// GUIDs. Profiles NVENC has no GUID for are left out.
pub fn hevc_capabilities(formats: &[Format]) -> Vec<Capability<Guid, H265Level>> {
    let map = NvEncHevcProfiles;

    sdp::h265_capabilities(formats)
        .into_iter()
        .filter_map(|c| Some(Capability::new(map.to_id(c.id)?, c.level, c.tier)))
        .collect()
}
