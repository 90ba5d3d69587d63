// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! H.265 levels and their ceilings (Annex A, tables A.6 to A.8).

use std::fmt;

use enumn::N;

use crate::codec::limits;
use crate::codec::limits::LevelLimits;
use crate::codec::limits::LevelTable;

/// H265 levels as defined by table A.8.
/// general_level_idc and sub_layer_level_idc[ OpTid ] shall be set equal to a
/// value of 30 times the level number specified in Table A.8
#[derive(N, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    #[default]
    L1 = 30,
    L2 = 60,
    L2_1 = 63,
    L3 = 90,
    L3_1 = 93,
    L4 = 120,
    L4_1 = 123,
    L5 = 150,
    L5_1 = 153,
    L5_2 = 156,
    L6 = 180,
    L6_1 = 183,
    L6_2 = 186,
}

impl Level {
    /// The `general_level_idc` of this level.
    pub fn level_idc(self) -> u8 {
        self as u8
    }

    pub fn from_level_idc(level_idc: u8) -> Option<Self> {
        Self::n(level_idc)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idc = self.level_idc();
        write!(f, "{}.{}", idc / 30, (idc % 30) / 3)
    }
}

const fn row(
    max_luma_sr: u64,
    max_luma_ps: u32,
    max_br_main: u32,
    max_br_high: u32,
) -> LevelLimits {
    LevelLimits {
        max_luma_sr,
        max_luma_ps,
        max_br_main,
        max_br_high,
    }
}

impl LevelTable for Level {
    // max_luma_sr, max_luma_ps, max_br_main (kbps), max_br_high (kbps)
    const LIMITS: &'static [(Self, LevelLimits)] = &[
        (Level::L1, row(552_960, 36_864, 128, 64)),
        (Level::L2, row(3_686_400, 122_880, 1_500, 750)),
        (Level::L2_1, row(7_372_800, 245_760, 3_000, 1_500)),
        (Level::L3, row(16_588_800, 552_960, 6_000, 3_000)),
        (Level::L3_1, row(33_177_600, 1_228_800, 10_000, 5_000)),
        (Level::L4, row(62_914_560, 2_097_152, 12_000, 6_000)),
        (Level::L4_1, row(62_914_560, 2_097_152, 20_000, 10_000)),
        (Level::L5, row(116_640_000, 4_194_304, 25_000, 12_500)),
        (Level::L5_1, row(233_280_000, 8_388_608, 40_000, 20_000)),
        (Level::L5_2, row(466_560_000, 16_777_216, 60_000, 30_000)),
        (Level::L6, row(833_972_800, 33_554_432, 60_000, 30_000)),
        (Level::L6_1, row(1_667_942_400, 67_108_864, 120_000, 60_000)),
        (Level::L6_2, row(3_349_708_800, 134_217_728, 240_000, 120_000)),
    ];
}

/// Returns the minimum level which can support `pixel_count` luma samples per
/// picture at `framerate` and `bitrate_kbps`, using the Main tier bitrate
/// ceilings.
pub fn supported_level(pixel_count: u32, framerate: u32, bitrate_kbps: u32) -> Option<Level> {
    limits::min_level(pixel_count, framerate, bitrate_kbps)
}

/// Returns the max framerate `level` allows at `pixel_count` luma samples per
/// picture.
pub fn supported_max_framerate(level: Level, pixel_count: u32) -> u32 {
    limits::max_framerate(level, pixel_count)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::codec::limits::Tier;

    const FHD: u32 = 1920 * 1080;
    const UHD: u32 = 3840 * 2160;

    fn levels() -> Vec<Level> {
        Level::LIMITS.iter().map(|(level, _)| *level).collect()
    }

    #[test]
    fn one_row_per_level() {
        for idc in 0..=u8::MAX {
            if let Some(level) = Level::from_level_idc(idc) {
                let rows = Level::LIMITS.iter().filter(|(l, _)| *l == level).count();
                assert_eq!(rows, 1, "{level:?}");
            }
        }
        assert_eq!(Level::LIMITS.len(), 13);
    }

    #[test]
    fn rows_are_sorted_and_non_decreasing() {
        for pair in Level::LIMITS.windows(2) {
            let ((lo, a), (hi, b)) = (pair[0], pair[1]);
            assert!(lo < hi);
            assert!(a.max_luma_sr <= b.max_luma_sr, "{hi:?}");
            assert!(a.max_luma_ps <= b.max_luma_ps, "{hi:?}");
            assert!(a.max_br_main <= b.max_br_main, "{hi:?}");
            assert!(a.max_br_high <= b.max_br_high, "{hi:?}");
        }
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::L1.to_string(), "1.0");
        assert_eq!(Level::L3_1.to_string(), "3.1");
        assert_eq!(Level::L6_2.to_string(), "6.2");
    }

    #[test]
    fn level_idc() {
        assert_eq!(Level::L3_1.level_idc(), 93);
        assert_eq!(Level::from_level_idc(153), Some(Level::L5_1));
        assert_eq!(Level::from_level_idc(154), None);
    }

    #[test]
    fn supported_max_framerate_for_fhd_and_uhd() {
        let max_fps = supported_max_framerate(Level::L4, FHD);
        assert_eq!(max_fps, 30);

        let max_fps_5_1 = supported_max_framerate(Level::L5_1, FHD);
        assert!(max_fps_5_1 > max_fps);

        let max_fps_uhd = supported_max_framerate(Level::L5_1, UHD);
        assert!((25..=35).contains(&max_fps_uhd));

        let max_fps_uhd_6_2 = supported_max_framerate(Level::L6_2, UHD);
        assert!(max_fps_uhd_6_2 > max_fps_uhd);

        assert_eq!(supported_max_framerate(Level::L4, 0), 0);
    }

    #[test]
    fn supported_level_for_common_streams() {
        assert_eq!(supported_level(FHD, 30, 10_000), Some(Level::L4));
        assert_eq!(supported_level(FHD, 30, 15_000), Some(Level::L4_1));
        assert_eq!(supported_level(UHD, 30, 20_000), Some(Level::L5_2));
        // 497.7M samples/s first fits the 6.0 row, which allows 60 Mbps.
        assert_eq!(supported_level(UHD, 60, 50_000), Some(Level::L6));
        assert_eq!(supported_level(640 * 360, 30, 500), Some(Level::L2_1));
    }

    #[test]
    fn supported_level_rejects_zero() {
        assert_eq!(supported_level(0, 30, 10_000), None);
        assert_eq!(supported_level(FHD, 0, 10_000), None);
        assert_eq!(supported_level(FHD, 30, 0), None);
    }

    #[test]
    fn supported_level_beyond_6_2() {
        assert_eq!(supported_level(FHD, 30, 240_001), None);
        assert_eq!(supported_level(134_217_729, 1, 1), None);
        assert_eq!(supported_level(7680 * 4320, 120, 100_000), None);
    }

    #[test]
    fn high_tier_is_stricter_in_this_table() {
        assert_eq!(
            limits::min_level_for_tier(Tier::High, FHD, 30, 10_000),
            Some(Level::L4_1)
        );
        assert_eq!(
            limits::min_level_for_tier(Tier::High, UHD, 60, 50_000),
            Some(Level::L6_1)
        );
    }

    proptest! {
        #[test]
        fn max_framerate_is_monotonic(pixel_count in 1..=134_217_728u32) {
            for pair in levels().windows(2) {
                prop_assert!(
                    supported_max_framerate(pair[1], pixel_count)
                        >= supported_max_framerate(pair[0], pixel_count)
                );
            }
        }

        #[test]
        fn supported_level_is_pure(
            pixel_count in 0..=140_000_000u32,
            framerate in 0..=480u32,
            bitrate in 0..=300_000u32,
        ) {
            prop_assert_eq!(
                supported_level(pixel_count, framerate, bitrate),
                supported_level(pixel_count, framerate, bitrate)
            );
        }

        #[test]
        fn zero_is_never_supported(
            pixel_count in 0..=140_000_000u32,
            framerate in 0..=480u32,
            bitrate in 0..=300_000u32,
        ) {
            prop_assert_eq!(supported_level(0, framerate, bitrate), None);
            prop_assert_eq!(supported_level(pixel_count, 0, bitrate), None);
            prop_assert_eq!(supported_level(pixel_count, framerate, 0), None);
        }

        #[test]
        fn supported_level_is_minimal(
            pixel_count in 1..=140_000_000u32,
            framerate in 1..=480u32,
            bitrate in 1..=300_000u32,
        ) {
            if let Some(level) = supported_level(pixel_count, framerate, bitrate) {
                let luma_sr = u64::from(pixel_count) * u64::from(framerate);
                for (lower, limits) in Level::LIMITS.iter().filter(|(l, _)| *l < level) {
                    prop_assert!(
                        limits.max_luma_ps < pixel_count
                            || limits.max_luma_sr < luma_sr
                            || limits.max_br_main < bitrate,
                        "{:?} also fits", lower
                    );
                }
            }
        }

        #[test]
        fn supported_level_sustains_framerate(
            pixel_count in 1..=140_000_000u32,
            framerate in 1..=480u32,
            bitrate in 1..=300_000u32,
        ) {
            if let Some(level) = supported_level(pixel_count, framerate, bitrate) {
                prop_assert!(framerate <= supported_max_framerate(level, pixel_count));
            }
        }
    }
}
