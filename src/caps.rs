// Copyright 2025 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Caching of hardware capability queries.
//!
//! Querying the formats an encoder supports means opening the device, so the
//! answer is computed once per [`CapabilityCache`] and kept for its lifetime.
//! The cache is owned by whoever creates encoders and can be shared between
//! threads.

use std::sync::OnceLock;

use crate::codec::h264::level::Level as H264Level;
use crate::codec::h265::level::Level as H265Level;
use crate::sdp;
use crate::sdp::Format;

#[derive(Debug, Default)]
pub struct CapabilityCache {
    formats: OnceLock<Vec<Format>>,
    max_h264_level: OnceLock<Option<H264Level>>,
    max_h265_level: OnceLock<Option<H265Level>>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the cached formats, if the hardware was queried already.
    pub fn formats(&self) -> Option<&[Format]> {
        self.formats.get().map(Vec::as_slice)
    }

    /// Returns the cached formats, running `query` to fill the cache if it is
    /// empty.
    ///
    /// A failed query leaves the cache empty so that a later call retries it.
    /// Threads racing on an empty cache may each run their query, but all of
    /// them get the list stored first.
    pub fn formats_or_query<F>(&self, query: F) -> anyhow::Result<&[Format]>
    where
        F: FnOnce() -> anyhow::Result<Vec<Format>>,
    {
        if let Some(formats) = self.formats.get() {
            return Ok(formats);
        }

        let queried = query()?;
        log::debug!("caching {} supported formats", queried.len());

        Ok(self.formats.get_or_init(|| queried))
    }

    /// Highest H.264 level declared by the cached formats.
    ///
    /// Returns `None` if no format declares an H.264 level or the cache is
    /// not filled yet. The value is only memoized once the formats are.
    pub fn max_h264_level(&self) -> Option<H264Level> {
        let formats = self.formats.get()?;

        *self.max_h264_level.get_or_init(|| {
            sdp::h264_capabilities(formats)
                .into_iter()
                .map(|c| c.level)
                .max()
        })
    }

    /// Highest H.265 level declared by the cached formats.
    ///
    /// Same as [`Self::max_h264_level`], for H.265.
    pub fn max_h265_level(&self) -> Option<H265Level> {
        let formats = self.formats.get()?;

        *self.max_h265_level.get_or_init(|| {
            sdp::h265_capabilities(formats)
                .into_iter()
                .map(|c| c.level)
                .max()
        })
    }
}
