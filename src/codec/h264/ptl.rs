// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! H.264 profiles and the `profile-level-id` format parameter (RFC 6184,
//! section 8.1).

use std::fmt;
use std::str::FromStr;

use crate::codec::h264::level::Level;
use crate::sdp::FmtpError;
use crate::sdp::H264_FMTP_PROFILE_LEVEL_ID;

const CONSTRAINT_SET0_FLAG: u8 = 0x80;
const CONSTRAINT_SET1_FLAG: u8 = 0x40;
const CONSTRAINT_SET3_FLAG: u8 = 0x10;
const CONSTRAINT_SET4_FLAG: u8 = 0x08;
const CONSTRAINT_SET5_FLAG: u8 = 0x04;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    #[default]
    ConstrainedBaseline,
    Baseline,
    Main,
    Extended,
    ConstrainedHigh,
    High,
    High10,
    High422P,
    High444P,
}

impl Profile {
    /// The `profile_idc` and `profile-iop` constraint bits signalling this
    /// profile.
    pub fn profile_idc_iop(self) -> (u8, u8) {
        match self {
            Profile::ConstrainedBaseline => (66, 0xe0),
            Profile::Baseline => (66, 0x00),
            Profile::Main => (77, 0x00),
            Profile::Extended => (88, 0x00),
            Profile::ConstrainedHigh => (100, CONSTRAINT_SET4_FLAG | CONSTRAINT_SET5_FLAG),
            Profile::High => (100, 0x00),
            Profile::High10 => (110, 0x00),
            Profile::High422P => (122, 0x00),
            Profile::High444P => (244, 0x00),
        }
    }

    pub fn profile_idc(self) -> u8 {
        self.profile_idc_iop().0
    }

    /// Returns the profile signalled by `profile_idc` and the `profile_iop`
    /// constraint bits.
    pub fn from_profile_idc_iop(profile_idc: u8, profile_iop: u8) -> Option<Self> {
        let profile = match profile_idc {
            66 if profile_iop & CONSTRAINT_SET1_FLAG != 0 => Profile::ConstrainedBaseline,
            66 => Profile::Baseline,
            77 if profile_iop & CONSTRAINT_SET0_FLAG != 0 => Profile::ConstrainedBaseline,
            77 => Profile::Main,
            88 => match profile_iop & (CONSTRAINT_SET0_FLAG | CONSTRAINT_SET1_FLAG) {
                0xc0 => Profile::ConstrainedBaseline,
                CONSTRAINT_SET0_FLAG => Profile::Baseline,
                _ => Profile::Extended,
            },
            100 if profile_iop & (CONSTRAINT_SET4_FLAG | CONSTRAINT_SET5_FLAG)
                == CONSTRAINT_SET4_FLAG | CONSTRAINT_SET5_FLAG =>
            {
                Profile::ConstrainedHigh
            }
            100 => Profile::High,
            110 => Profile::High10,
            122 => Profile::High422P,
            244 => Profile::High444P,
            _ => return None,
        };

        Some(profile)
    }

    /// Whether level 1b is signalled as level 1.1 with `constraint_set3_flag`.
    fn signals_level_1b_with_set3(profile_idc: u8) -> bool {
        matches!(profile_idc, 66 | 77 | 88)
    }
}

/// The decoded `profile-level-id` format parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProfileLevelId {
    pub profile: Profile,
    pub level: Level,
}

impl ProfileLevelId {
    pub fn new(profile: Profile, level: Level) -> Self {
        Self { profile, level }
    }
}

impl Default for ProfileLevelId {
    /// Constrained Baseline level 3.1 ("42e01f"), the RFC 6184 default.
    fn default() -> Self {
        Self::new(Profile::ConstrainedBaseline, Level::L3_1)
    }
}

impl FromStr for ProfileLevelId {
    type Err = FmtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FmtpError::InvalidValue {
            key: H264_FMTP_PROFILE_LEVEL_ID,
            value: s.to_string(),
        };

        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(s, 16).map_err(|_| invalid())?;

        let profile_idc = (value >> 16) as u8;
        let profile_iop = (value >> 8) as u8;
        let level_idc = value as u8;

        let profile = Profile::from_profile_idc_iop(profile_idc, profile_iop)
            .ok_or(FmtpError::UnknownProfile(profile_idc))?;
        let constraint_set3_flag = Profile::signals_level_1b_with_set3(profile_idc)
            && profile_iop & CONSTRAINT_SET3_FLAG != 0;
        let level = Level::from_level_idc(level_idc, constraint_set3_flag)
            .ok_or(FmtpError::UnknownLevel(level_idc))?;

        Ok(Self { profile, level })
    }
}

impl fmt::Display for ProfileLevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (profile_idc, mut profile_iop) = self.profile.profile_idc_iop();
        let mut level_idc = self.level.level_idc();

        if self.level == Level::L1B && Profile::signals_level_1b_with_set3(profile_idc) {
            profile_iop |= CONSTRAINT_SET3_FLAG;
            level_idc = Level::L1_1.level_idc();
        }

        write!(f, "{profile_idc:02x}{profile_iop:02x}{level_idc:02x}")
    }
}
