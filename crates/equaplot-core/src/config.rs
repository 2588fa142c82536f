//! Global render configuration shared by every plotted definition

use crate::curve::CurveParams;
use crate::surface::SurfaceParams;
use serde::{Deserialize, Serialize};

/// Smallest accepted sampling resolution
pub const MIN_RESOLUTION: u32 = 10;
/// Largest accepted sampling resolution with 32-bit indices
pub const MAX_RESOLUTION: u32 = 1024;
/// Largest resolution whose `(res + 1)^2` vertices fit a 16-bit index
pub const NARROW_INDEX_MAX_RESOLUTION: u32 = 254;

/// Smallest accepted domain half-extent
pub const MIN_RANGE: f32 = 1.0;
/// Largest accepted domain half-extent
pub const MAX_RANGE: f32 = 50.0;

/// Index formats a presentation backend can consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexWidth {
    /// 16-bit indices, limits a surface to 65536 vertices
    U16,
    #[default]
    U32,
}

impl IndexWidth {
    /// Highest surface resolution this index width can address
    pub fn max_resolution(self) -> u32 {
        match self {
            Self::U16 => NARROW_INDEX_MAX_RESOLUTION,
            Self::U32 => MAX_RESOLUTION,
        }
    }
}

/// A value that may have been reduced to fit a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped<T> {
    pub requested: T,
    pub effective: T,
}

impl<T: PartialEq> Clamped<T> {
    /// Whether the effective value differs from the request
    pub fn was_clamped(&self) -> bool {
        self.requested != self.effective
    }
}

/// Knobs read once per tick by every generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Grid cells per side for surfaces; curves take ten samples per unit
    pub resolution: u32,
    /// Half-extent of the sampling domain along each axis
    pub range: f32,
    /// Advance the animation clock each tick
    pub animate: bool,
    /// Multiplier applied to tick deltas while animating
    pub animation_speed: f32,
    /// Width of rendered curves
    pub line_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: 100,
            range: 10.0,
            animate: false,
            animation_speed: 1.0,
            line_width: 0.1,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_animation(mut self, animate: bool, speed: f32) -> Self {
        self.animate = animate;
        self.animation_speed = speed;
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// Copy with every field forced into its accepted interval
    ///
    /// Non-finite floats fall back to the defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        Self {
            resolution: self.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION),
            range: finite_or(self.range, defaults.range).clamp(MIN_RANGE, MAX_RANGE),
            animate: self.animate,
            animation_speed: finite_or(self.animation_speed, defaults.animation_speed).max(0.0),
            line_width: finite_or(self.line_width, defaults.line_width).max(0.0),
        }
    }

    /// Surface resolution after the index-width ceiling is applied
    pub fn effective_resolution(&self, index_width: IndexWidth) -> Clamped<u32> {
        let requested = self.resolution.max(MIN_RESOLUTION);
        let effective = requested.min(index_width.max_resolution());
        if effective != requested {
            tracing::debug!(
                "Resolution {} exceeds {:?} index ceiling, using {}",
                requested,
                index_width,
                effective
            );
        }
        Clamped {
            requested,
            effective,
        }
    }

    /// Parameters for one surface generation pass
    pub fn surface_params(&self, index_width: IndexWidth) -> SurfaceParams {
        SurfaceParams {
            resolution: self.effective_resolution(index_width).effective,
            range: self.range,
        }
    }

    /// Parameters for one curve generation pass at the given clock reading
    ///
    /// The elapsed time only shifts the evaluated parameter while animating.
    pub fn curve_params(&self, clock: &AnimationClock) -> CurveParams {
        CurveParams {
            resolution: self.resolution.max(1),
            range: self.range,
            time_offset: if self.animate { clock.elapsed() } else { 0.0 },
            line_width: self.line_width,
        }
    }
}

/// Monotonic animation time accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of animated time accumulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt * speed` while animation is enabled
    ///
    /// Pausing freezes the clock without resetting it. Negative or
    /// non-finite steps are ignored so the clock never runs backwards.
    pub fn advance(&mut self, dt: f32, config: &RenderConfig) {
        if !config.animate {
            return;
        }
        let step = dt * config.animation_speed;
        if step.is_finite() && step > 0.0 {
            self.elapsed += step;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_index_clamps_resolution() {
        let config = RenderConfig::default().with_resolution(1000);
        let res = config.effective_resolution(IndexWidth::U16);
        assert_eq!(res.effective, 254);
        assert!(res.was_clamped());
        assert_eq!(config.surface_params(IndexWidth::U16).resolution, 254);
    }

    #[test]
    fn test_wide_index_keeps_resolution() {
        let config = RenderConfig::default().with_resolution(1000);
        let res = config.effective_resolution(IndexWidth::U32);
        assert_eq!(res.effective, 1000);
        assert!(!res.was_clamped());
    }

    #[test]
    fn test_narrow_index_vertex_count_fits() {
        let res = NARROW_INDEX_MAX_RESOLUTION as usize;
        assert!((res + 1) * (res + 1) < 65536);
    }

    #[test]
    fn test_sanitized() {
        let config = RenderConfig {
            resolution: 2,
            range: 500.0,
            animate: true,
            animation_speed: f32::NAN,
            line_width: -1.0,
        }
        .sanitized();
        assert_eq!(config.resolution, MIN_RESOLUTION);
        assert_eq!(config.range, MAX_RANGE);
        assert_eq!(config.animation_speed, 1.0);
        assert_eq!(config.line_width, 0.0);
    }

    #[test]
    fn test_clock_only_advances_while_animating() {
        let mut clock = AnimationClock::new();
        let mut config = RenderConfig::default().with_animation(true, 2.0);

        clock.advance(0.5, &config);
        assert_eq!(clock.elapsed(), 1.0);

        config.animate = false;
        clock.advance(0.5, &config);
        assert_eq!(clock.elapsed(), 1.0, "paused clock must freeze");

        config.animate = true;
        clock.advance(-3.0, &config);
        assert_eq!(clock.elapsed(), 1.0, "clock must never run backwards");

        clock.advance(0.25, &config);
        assert_eq!(clock.elapsed(), 1.5);
    }

    #[test]
    fn test_curve_time_offset_requires_animation() {
        let mut clock = AnimationClock::new();
        let animated = RenderConfig::default().with_animation(true, 1.0);
        clock.advance(2.0, &animated);

        assert_eq!(animated.curve_params(&clock).time_offset, 2.0);
        let paused = RenderConfig::default();
        assert_eq!(paused.curve_params(&clock).time_offset, 0.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "resolution": 40, "animate": true }"#).unwrap();
        assert_eq!(config.resolution, 40);
        assert!(config.animate);
        assert_eq!(config.range, 10.0);
    }
}
