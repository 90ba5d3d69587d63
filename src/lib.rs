// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Profile, tier and level negotiation for hardware video encoders.
//!
//! A stream's resolution and framerate determine the lowest H.264 or H.265
//! level able to carry it ([`codec::limits`]). The hardware advertises the
//! profiles and levels it supports, either directly or through SDP formats
//! ([`sdp`], [`nvenc`]). The [`negotiator`] reconciles both into the level the
//! encoder is configured with, and [`encoder`] turns that into a per-codec
//! encoder configuration. [`caps::CapabilityCache`] keeps the result of the
//! costly hardware capability query around.

pub mod caps;
pub mod codec;
pub mod encoder;
pub mod negotiator;
pub mod nvenc;
pub mod sdp;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of luma samples in a picture of this resolution.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from(value: (u32, u32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_count_does_not_overflow() {
        assert_eq!(Resolution::new(1920, 1080).pixel_count(), 2_073_600);
        assert_eq!(
            Resolution::new(u32::MAX, u32::MAX).pixel_count(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
        assert_eq!(Resolution::from((0, 1080)).pixel_count(), 0);
    }
}
