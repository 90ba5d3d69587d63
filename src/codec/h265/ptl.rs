// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use enumn::N;

use crate::codec::h265::level::Level;
pub use crate::codec::limits::Tier;

/// H.265 profiles, by `general_profile_idc` as specified in Annex A.
#[derive(N, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Profile {
    #[default]
    Main = 1,
    Main10 = 2,
    MainStill = 3,
    RangeExtensions = 4,
    HighThroughput = 5,
    MultiviewMain = 6,
    ScalableMain = 7,
    ThreeDimensionalMain = 8,
    ScreenContentCoding = 9,
    ScalableRangeExtensions = 10,
    HighThroughputScreenContentCoding = 11,
}

impl Profile {
    pub fn profile_idc(self) -> u8 {
        self as u8
    }

    pub fn from_profile_idc(profile_idc: u8) -> Option<Self> {
        Self::n(profile_idc)
    }
}

/// A profile, tier and level triple, as signalled in the `profile-id`,
/// `tier-flag` and `level-id` format parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProfileTierLevel {
    pub profile: Profile,
    pub tier: Tier,
    pub level: Level,
}

impl ProfileTierLevel {
    pub fn new(profile: Profile, tier: Tier, level: Level) -> Self {
        Self {
            profile,
            tier,
            level,
        }
    }

    /// Whether `tier` is defined for `level`. The High tier only exists from
    /// level 4 on.
    pub fn is_valid(&self) -> bool {
        self.tier == Tier::Main || self.level >= Level::L4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_idc() {
        assert_eq!(Profile::Main10.profile_idc(), 2);
        assert_eq!(Profile::from_profile_idc(4), Some(Profile::RangeExtensions));
        assert_eq!(Profile::from_profile_idc(0), None);
        assert_eq!(Profile::from_profile_idc(12), None);
    }

    #[test]
    fn high_tier_needs_level_4() {
        assert!(ProfileTierLevel::new(Profile::Main, Tier::Main, Level::L1).is_valid());
        assert!(!ProfileTierLevel::new(Profile::Main, Tier::High, Level::L3_1).is_valid());
        assert!(ProfileTierLevel::new(Profile::Main, Tier::High, Level::L4).is_valid());
    }

    #[test]
    fn default_is_main_tier_level_1() {
        let ptl = ProfileTierLevel::default();
        assert_eq!(ptl.profile, Profile::Main);
        assert_eq!(ptl.tier, Tier::Main);
        assert_eq!(ptl.level, Level::L1);
    }
}
