// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Negotiation of the level an encoder is configured with.
//!
//! The level a stream requires follows from its resolution and framerate (see
//! [`crate::codec::limits`]). The level the hardware supports comes from the
//! capabilities it advertises for the requested profile. Negotiation succeeds
//! when the latter is at least the former, and yields the required level: a
//! stream is configured at the level it needs, not at the highest level the
//! hardware could provide.

use std::marker::PhantomData;

use crate::codec::limits;
use crate::codec::limits::LevelTable;
use crate::codec::limits::Tier;
use crate::Resolution;

/// Maps standard profiles to the identifiers a hardware or vendor API uses
/// for them, and back.
///
/// Either direction may be partial. A lookup failure means the profile is
/// simply not matched.
pub trait ProfileIdMap {
    type Profile: Copy + PartialEq;
    type Id: PartialEq;

    fn to_id(&self, profile: Self::Profile) -> Option<Self::Id>;
    fn to_profile(&self, id: &Self::Id) -> Option<Self::Profile>;
}

/// Identity mapping, for capabilities advertised with standard profiles such
/// as the ones parsed from SDP formats.
pub struct SdpProfileMap<P>(PhantomData<P>);

impl<P> SdpProfileMap<P> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P> Default for SdpProfileMap<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy + PartialEq> ProfileIdMap for SdpProfileMap<P> {
    type Profile = P;
    type Id = P;

    fn to_id(&self, profile: P) -> Option<P> {
        Some(profile)
    }

    fn to_profile(&self, id: &P) -> Option<P> {
        Some(*id)
    }
}

/// One advertised (identifier, level, tier) triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capability<Id, L> {
    pub id: Id,
    pub level: L,
    pub tier: Tier,
}

impl<Id, L> Capability<Id, L> {
    pub fn new(id: Id, level: L, tier: Tier) -> Self {
        Self { id, level, tier }
    }
}

/// Operating point of one video stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamRequirement {
    pub resolution: Resolution,
    /// Frames per second. Fractional rates are rounded up.
    pub framerate: f32,
    /// Bitrate in kbps, or `None` to leave the bitrate unconstrained.
    pub bitrate_kbps: Option<u32>,
}

impl StreamRequirement {
    pub fn new(resolution: Resolution, framerate: f32) -> Self {
        Self {
            resolution,
            framerate,
            bitrate_kbps: None,
        }
    }

    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = Some(bitrate_kbps);
        self
    }

    /// Returns the lowest level of `L` able to carry this stream, checking the
    /// bitrate against Main tier ceilings if one is set.
    pub fn required_level<L: LevelTable>(&self) -> Option<L> {
        let pixel_count = u32::try_from(self.resolution.pixel_count()).ok()?;
        if !self.framerate.is_finite() || self.framerate <= 0.0 {
            return None;
        }
        // Saturates for absurd rates, which no level sustains anyway.
        let framerate = self.framerate.ceil() as u32;

        match self.bitrate_kbps {
            Some(bitrate_kbps) => limits::min_level(pixel_count, framerate, bitrate_kbps),
            None => limits::min_level_for_geometry(pixel_count, framerate),
        }
    }
}

/// Returns the level advertised for `profile`: the level of the first entry
/// of `advertised` whose identifier maps to `profile`, or is the identifier
/// `profile` maps to.
pub fn supported_level<M, L>(
    map: &M,
    advertised: &[Capability<M::Id, L>],
    profile: M::Profile,
) -> Option<L>
where
    M: ProfileIdMap,
    L: Copy,
{
    let target_id = map.to_id(profile);

    advertised
        .iter()
        .find(|capability| {
            target_id.as_ref() == Some(&capability.id)
                || map.to_profile(&capability.id) == Some(profile)
        })
        .map(|capability| capability.level)
}

/// Returns the level to configure for `requirement` when encoding `profile`
/// on hardware advertising `advertised`, or `None` if the stream exceeds every
/// level, the profile is not advertised, or the advertised level is too low.
pub fn negotiate_level<M, L>(
    map: &M,
    requirement: &StreamRequirement,
    advertised: &[Capability<M::Id, L>],
    profile: M::Profile,
) -> Option<L>
where
    M: ProfileIdMap,
    L: LevelTable,
{
    let required = requirement.required_level::<L>()?;
    let supported = supported_level(map, advertised, profile)?;

    (supported >= required).then_some(required)
}
