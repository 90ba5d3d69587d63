// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! H.264 levels and their ceilings (Annex A, table A-1).
//!
//! Table A-1 counts macroblocks. The ceilings are kept in luma samples
//! (256 per macroblock) so that the same resolver serves both H.264 and H.265.

use std::fmt;

use crate::codec::limits;
use crate::codec::limits::LevelLimits;
use crate::codec::limits::LevelTable;

const SAMPLES_PER_MACROBLOCK: u32 = 256;

/// H.264 levels, in order of capability. Level 1b sits between 1 and 1.1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    L1,
    L1B,
    L1_1,
    L1_2,
    L1_3,
    L2_0,
    L2_1,
    L2_2,
    L3,
    L3_1,
    L3_2,
    L4,
    L4_1,
    L4_2,
    L5,
    L5_1,
    L5_2,
    L6,
    L6_1,
    L6_2,
}

impl Level {
    /// The `level_idc` of this level. Level 1b is signalled as 9 here; in
    /// the Baseline, Main and Extended profiles it is signalled as 11 with
    /// `constraint_set3_flag` set instead, see [`Level::from_level_idc`].
    pub fn level_idc(self) -> u8 {
        match self {
            Level::L1 => 10,
            Level::L1B => 9,
            Level::L1_1 => 11,
            Level::L1_2 => 12,
            Level::L1_3 => 13,
            Level::L2_0 => 20,
            Level::L2_1 => 21,
            Level::L2_2 => 22,
            Level::L3 => 30,
            Level::L3_1 => 31,
            Level::L3_2 => 32,
            Level::L4 => 40,
            Level::L4_1 => 41,
            Level::L4_2 => 42,
            Level::L5 => 50,
            Level::L5_1 => 51,
            Level::L5_2 => 52,
            Level::L6 => 60,
            Level::L6_1 => 61,
            Level::L6_2 => 62,
        }
    }

    /// Returns the level signalled by `level_idc`. `constraint_set3_flag`
    /// turns level 1.1 into level 1b.
    pub fn from_level_idc(level_idc: u8, constraint_set3_flag: bool) -> Option<Self> {
        let level = match level_idc {
            9 => Level::L1B,
            10 => Level::L1,
            11 if constraint_set3_flag => Level::L1B,
            11 => Level::L1_1,
            12 => Level::L1_2,
            13 => Level::L1_3,
            20 => Level::L2_0,
            21 => Level::L2_1,
            22 => Level::L2_2,
            30 => Level::L3,
            31 => Level::L3_1,
            32 => Level::L3_2,
            40 => Level::L4,
            41 => Level::L4_1,
            42 => Level::L4_2,
            50 => Level::L5,
            51 => Level::L5_1,
            52 => Level::L5_2,
            60 => Level::L6,
            61 => Level::L6_1,
            62 => Level::L6_2,
            _ => return None,
        };

        Some(level)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::L1B => f.write_str("1b"),
            level => {
                let idc = level.level_idc();
                write!(f, "{}.{}", idc / 10, idc % 10)
            }
        }
    }
}

/// Builds a row from the macroblock based values of table A-1. The High tier
/// column holds the High profile ceiling (cpbBrVclFactor of 1250).
const fn row(max_mbps: u32, max_fs: u32, max_br: u32) -> LevelLimits {
    LevelLimits {
        max_luma_sr: max_mbps as u64 * SAMPLES_PER_MACROBLOCK as u64,
        max_luma_ps: max_fs * SAMPLES_PER_MACROBLOCK,
        max_br_main: max_br,
        max_br_high: max_br / 4 * 5,
    }
}

impl LevelTable for Level {
    // MaxMBPS (MB/s), MaxFS (MBs), MaxBR (kbps)
    const LIMITS: &'static [(Self, LevelLimits)] = &[
        (Level::L1, row(1_485, 99, 64)),
        (Level::L1B, row(1_485, 99, 128)),
        (Level::L1_1, row(3_000, 396, 192)),
        (Level::L1_2, row(6_000, 396, 384)),
        (Level::L1_3, row(11_880, 396, 768)),
        (Level::L2_0, row(11_880, 396, 2_000)),
        (Level::L2_1, row(19_800, 792, 4_000)),
        (Level::L2_2, row(20_250, 1_620, 4_000)),
        (Level::L3, row(40_500, 1_620, 10_000)),
        (Level::L3_1, row(108_000, 3_600, 14_000)),
        (Level::L3_2, row(216_000, 5_120, 20_000)),
        (Level::L4, row(245_760, 8_192, 20_000)),
        (Level::L4_1, row(245_760, 8_192, 50_000)),
        (Level::L4_2, row(522_240, 8_704, 50_000)),
        (Level::L5, row(589_824, 22_080, 135_000)),
        (Level::L5_1, row(983_040, 36_864, 240_000)),
        (Level::L5_2, row(2_073_600, 36_864, 240_000)),
        (Level::L6, row(4_177_920, 139_264, 240_000)),
        (Level::L6_1, row(8_355_840, 139_264, 480_000)),
        (Level::L6_2, row(16_711_680, 139_264, 800_000)),
    ];
}

/// Returns the minimum level which can support `pixel_count` luma samples per
/// picture at `framerate` and `bitrate_kbps`, using the Baseline/Main
/// bitrate ceilings.
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

    const VGA: u32 = 640 * 480;
    const FHD: u32 = 1920 * 1080;

    #[test]
    fn rows_are_sorted_and_non_decreasing() {
        assert_eq!(Level::LIMITS.len(), 20);
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
    fn high_profile_factor() {
        let l4 = limits::limits(Level::L4).unwrap();
        assert_eq!(l4.max_br(Tier::Main), 20_000);
        assert_eq!(l4.max_br(Tier::High), 25_000);
        assert_eq!(l4.max_luma_ps, 2_097_152);
    }

    #[test]
    fn level_idc_round_trip() {
        for (level, _) in Level::LIMITS {
            assert_eq!(Level::from_level_idc(level.level_idc(), false), Some(*level));
        }
        assert_eq!(Level::from_level_idc(11, true), Some(Level::L1B));
        assert_eq!(Level::from_level_idc(40, true), Some(Level::L4));
        assert_eq!(Level::from_level_idc(14, false), None);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::L1B.to_string(), "1b");
        assert_eq!(Level::L3_1.to_string(), "3.1");
        assert_eq!(Level::L4.to_string(), "4.0");
    }

    #[test]
    fn supported_level_for_common_streams() {
        assert_eq!(supported_level(FHD, 30, 10_000), Some(Level::L4));
        assert_eq!(supported_level(FHD, 60, 10_000), Some(Level::L4_2));
        assert_eq!(supported_level(1280 * 720, 30, 2_500), Some(Level::L3_1));
        assert_eq!(supported_level(VGA, 30, 1_000), Some(Level::L3));
        assert_eq!(supported_level(176 * 144, 15, 100), Some(Level::L1B));
        assert_eq!(supported_level(0, 30, 1_000), None);
        assert_eq!(supported_level(VGA, 30, 800_001), None);
    }

    #[test]
    fn max_framerate() {
        assert_eq!(supported_max_framerate(Level::L3_1, 1280 * 720), 30);
        assert_eq!(supported_max_framerate(Level::L4, FHD), 30);
        assert_eq!(supported_max_framerate(Level::L4_2, FHD), 64);
        assert_eq!(supported_max_framerate(Level::L4, 0), 0);
    }

    proptest! {
        #[test]
        fn supported_level_is_minimal_and_sustains_framerate(
            pixel_count in 1..=40_000_000u32,
            framerate in 1..=240u32,
            bitrate in 1..=1_000_000u32,
        ) {
            if let Some(level) = supported_level(pixel_count, framerate, bitrate) {
                prop_assert!(framerate <= supported_max_framerate(level, pixel_count));

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
    }
}
