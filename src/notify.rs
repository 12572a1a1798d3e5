// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transient success/error banners. A banner is visible for
//! [`BANNER_VISIBLE`], then fades for [`BANNER_FADE`], then is gone.

use std::time::{Duration, Instant};

pub const BANNER_VISIBLE: Duration = Duration::from_millis(2000);
pub const BANNER_FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
    Gone,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub level: Level,
    pub message: String,
    pub raised_at: Instant,
}

impl Banner {
    pub fn phase_at(&self, now: Instant) -> Phase {
        let elapsed = now.saturating_duration_since(self.raised_at);
        if elapsed < BANNER_VISIBLE {
            Phase::Visible
        } else if elapsed < BANNER_VISIBLE + BANNER_FADE {
            Phase::Fading
        } else {
            Phase::Gone
        }
    }
}

/// Banners raised by a controller, oldest first.
#[derive(Debug, Default)]
pub struct Notices {
    banners: Vec<Banner>,
}

impl Notices {
    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        self.banners.push(Banner {
            level,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Drop expired banners and return the ones still on screen.
    pub fn visible(&mut self, now: Instant) -> &[Banner] {
        self.banners.retain(|b| b.phase_at(now) != Phase::Gone);
        &self.banners
    }

    /// Hand over the banners still on screen at `now` and forget the rest.
    pub fn take_visible(&mut self, now: Instant) -> Vec<Banner> {
        self.visible(now);
        self.drain()
    }

    /// Hand every pending banner to the caller, expired or not.
    pub fn drain(&mut self) -> Vec<Banner> {
        std::mem::take(&mut self.banners)
    }

    pub fn last(&self) -> Option<&Banner> {
        self.banners.last()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
