// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Level ceilings shared by the H.264 and H.265 level tables, and the resolver
//! picking a level out of them.
//!
//! Each codec's `Level` type implements [`LevelTable`] and provides one
//! [`LevelLimits`] row per level, in ascending level order. Because every
//! ceiling is non-decreasing from one row to the next, the first row that
//! accommodates an operating point is also the lowest level that does.

use std::fmt::Debug;

use enumn::N;

/// Tier of a level. Selects which bitrate ceiling of a [`LevelLimits`] row
/// applies.
#[derive(N, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tier {
    #[default]
    Main = 0,
    High = 1,
}

/// Ceilings of a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelLimits {
    /// Max luma samples per second.
    pub max_luma_sr: u64,
    /// Max luma samples per picture.
    pub max_luma_ps: u32,
    /// Max bitrate for the Main tier, in kbps.
    pub max_br_main: u32,
    /// Max bitrate for the High tier, in kbps.
    pub max_br_high: u32,
}

impl LevelLimits {
    /// Max bitrate of `tier`, in kbps.
    pub fn max_br(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Main => self.max_br_main,
            Tier::High => self.max_br_high,
        }
    }

    fn accommodates(&self, pixel_count: u32, luma_sr: u64, bitrate: Option<(Tier, u32)>) -> bool {
        self.max_luma_ps >= pixel_count
            && self.max_luma_sr >= luma_sr
            && bitrate.map_or(true, |(tier, kbps)| self.max_br(tier) >= kbps)
    }
}

/// A closed set of levels backed by a constant table of ceilings.
pub trait LevelTable: Copy + Ord + Debug + 'static {
    /// One row per level, sorted by ascending level.
    const LIMITS: &'static [(Self, LevelLimits)];
}

/// Returns the ceilings of `level`, or `None` if its table has no row for it.
pub fn limits<L: LevelTable>(level: L) -> Option<&'static LevelLimits> {
    L::LIMITS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, limits)| limits)
}

fn first_fit<L: LevelTable>(
    pixel_count: u32,
    framerate: u32,
    bitrate: Option<(Tier, u32)>,
) -> Option<L> {
    if pixel_count == 0 || framerate == 0 {
        return None;
    }

    // Up to 8K at several hundred frames per second overflows 32 bits.
    let luma_sr = u64::from(pixel_count) * u64::from(framerate);

    L::LIMITS
        .iter()
        .find(|(_, limits)| limits.accommodates(pixel_count, luma_sr, bitrate))
        .map(|(level, _)| *level)
}

/// Returns the lowest level supporting `pixel_count` luma samples per
/// picture at `framerate` frames per second and `bitrate_kbps`, checked
/// against the Main tier bitrate ceilings.
///
/// Returns `None` if any input is zero or if no level is large enough.
pub fn min_level<L: LevelTable>(pixel_count: u32, framerate: u32, bitrate_kbps: u32) -> Option<L> {
    min_level_for_tier(Tier::Main, pixel_count, framerate, bitrate_kbps)
}

/// Same as [`min_level`], but checks `bitrate_kbps` against the ceilings of
/// `tier`.
pub fn min_level_for_tier<L: LevelTable>(
    tier: Tier,
    pixel_count: u32,
    framerate: u32,
    bitrate_kbps: u32,
) -> Option<L> {
    if bitrate_kbps == 0 {
        return None;
    }

    first_fit(pixel_count, framerate, Some((tier, bitrate_kbps)))
}

/// Returns the lowest level supporting `pixel_count` luma samples per
/// picture at `framerate` frames per second, regardless of bitrate.
pub fn min_level_for_geometry<L: LevelTable>(pixel_count: u32, framerate: u32) -> Option<L> {
    first_fit(pixel_count, framerate, None)
}

/// Returns the number of whole frames per second `level` sustains at
/// `pixel_count` luma samples per picture.
///
/// Returns 0 if `pixel_count` is zero.
pub fn max_framerate<L: LevelTable>(level: L, pixel_count: u32) -> u32 {
    if pixel_count == 0 {
        return 0;
    }

    match limits(level) {
        Some(limits) => {
            u32::try_from(limits.max_luma_sr / u64::from(pixel_count)).unwrap_or(u32::MAX)
        }
        None => {
            debug_assert!(false, "{level:?} has no row in its limits table");
            0
        }
    }
}
