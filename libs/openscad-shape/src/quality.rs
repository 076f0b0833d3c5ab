//! Quality parameter resolution (`$fn`/`$fa`/`$fs` → segment count), per §4.4.
//!
//! The Shape DSL's constructors take an already-resolved segment count
//! (mirroring the evaluated `GeometryNode` fields), so callers building a
//! shape tree by hand use [`Quality`] to get the same segment count the
//! OpenSCAD evaluator would have computed for a given radius.

/// The three OpenSCAD tessellation quality knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality {
    /// `$fn` — fixed segment count. `0` means "unset", deferring to `$fa`/`$fs`.
    pub fn_: u32,
    /// `$fa` — minimum angle per segment, in degrees.
    pub fa: f64,
    /// `$fs` — minimum segment length.
    pub fs: f64,
}

impl Quality {
    /// OpenSCAD's built-in defaults: `$fn=0, $fa=12, $fs=2`.
    pub const DEFAULT: Quality = Quality { fn_: 0, fa: 12.0, fs: 2.0 };

    /// Resolve the segment count for a circle/arc of the given `radius`,
    /// following OpenSCAD's rule: if `$fn > 0` use it; otherwise
    /// `max(5, min(360/$fa, r*2*pi/$fs))`.
    pub fn segments(&self, radius: f64) -> u32 {
        if self.fn_ > 0 {
            return self.fn_;
        }
        let by_angle = 360.0 / self.fa;
        let by_length = radius * std::f64::consts::TAU / self.fs;
        let segments = by_angle.min(by_length).max(5.0);
        segments.ceil() as u32
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_fn_overrides_fa_fs() {
        let q = Quality { fn_: 8, fa: 12.0, fs: 2.0 };
        assert_eq!(q.segments(100.0), 8);
    }

    #[test]
    fn small_radius_floors_at_five_segments() {
        let q = Quality::DEFAULT;
        assert_eq!(q.segments(0.01), 5);
    }

    #[test]
    fn large_radius_is_bounded_by_angle_limit() {
        let q = Quality::DEFAULT;
        // 360/12 = 30 segments from the angle limit, regardless of how big
        // the length-based estimate gets.
        assert_eq!(q.segments(10_000.0), 30);
    }
}
