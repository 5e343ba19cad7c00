// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning constants for the interaction engine.

/// Configuration for a [`RootDispatcher`](crate::RootDispatcher).
///
/// The defaults were picked empirically for mouse input on desktop surfaces.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuConfig {
    /// How long a submenu stays open after its trigger is left toward it, in
    /// milliseconds. Each sample inside the safe polygon restarts the delay.
    pub grace_close_delay_ms: u64,
    /// Inactivity after which the typeahead buffer clears, in milliseconds.
    pub typeahead_timeout_ms: u64,
    /// Distance the polygon apex is pushed away from the submenu, in surface units.
    ///
    /// A small bleed keeps the exit sample itself inside the polygon.
    pub polygon_bleed: f64,
    /// Number of trailing pointer samples used to judge horizontal trend.
    ///
    /// Values below 2 are treated as 2.
    pub trend_samples: usize,
    /// Whether arrow-key traversal wraps around at the ends of a menu.
    pub loop_focus: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            grace_close_delay_ms: 300,
            typeahead_timeout_ms: 1000,
            polygon_bleed: 5.0,
            trend_samples: 2,
            loop_focus: false,
        }
    }
}

impl MenuConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the grace and typeahead delays.
    pub fn with_delays(mut self, grace_close_delay_ms: u64, typeahead_timeout_ms: u64) -> Self {
        self.grace_close_delay_ms = grace_close_delay_ms;
        self.typeahead_timeout_ms = typeahead_timeout_ms;
        self
    }

    /// Override the polygon bleed.
    pub fn with_polygon_bleed(mut self, bleed: f64) -> Self {
        self.polygon_bleed = bleed;
        self
    }

    /// Override the trend window.
    pub fn with_trend_samples(mut self, samples: usize) -> Self {
        self.trend_samples = samples;
        self
    }

    /// Enable or disable wrap-around traversal.
    pub fn with_loop_focus(mut self, loop_focus: bool) -> Self {
        self.loop_focus = loop_focus;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let c = MenuConfig::new()
            .with_delays(150, 500)
            .with_polygon_bleed(2.0)
            .with_trend_samples(4)
            .with_loop_focus(true);
        assert_eq!(c.grace_close_delay_ms, 150);
        assert_eq!(c.typeahead_timeout_ms, 500);
        assert_eq!(c.polygon_bleed, 2.0);
        assert_eq!(c.trend_samples, 4);
        assert!(c.loop_focus);
        assert_ne!(c, MenuConfig::default());
    }
}
