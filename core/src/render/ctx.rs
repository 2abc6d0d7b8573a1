//! Rendering context and parameters.

use crate::math::mat::Transform;

use super::{Blender, Stats};

/// Context and parameters used by the renderer.
#[derive(Clone, Debug)]
pub struct Context {
    /// How drawn pixels are combined with the existing target contents.
    ///
    /// If set to [`Blender::IDENTITY`], the rasterizers write pixels
    /// directly without reading the target.
    pub blender: Blender,

    /// The transform applied to every vertex before rasterization.
    pub transform: Transform,

    /// Multiplier for the number of segments used to approximate curves.
    ///
    /// The number of segments of a circle of radius `r` is roughly
    /// `curve_quality * sqrt(r * s)`, where `s` is the scale factor
    /// of `transform`.
    pub curve_quality: f32,

    /// The maximum length of a miter join as a multiple of half the
    /// stroke thickness.
    ///
    /// Miters longer than this are cut off by a bevel.
    pub miter_limit: f32,

    /// Collecting rendering statistics.
    pub stats: Stats,
}

impl Context {
    /// Returns the scale factor of `self.transform`.
    ///
    /// Used to adapt the number of curve segments to the size of the curve
    /// on the target.
    #[cfg(feature = "fp")]
    pub fn scale(&self) -> f32 {
        self.transform.scale_factor()
    }

    /// Returns whether pixels can be written without blending.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.blender.is_identity()
    }
}

impl Default for Context {
    /// Creates a rendering context with default settings.
    ///
    /// The default values are:
    /// * Blender:       Premultiplied alpha
    /// * Transform:     Identity
    /// * Curve quality: 10.0
    /// * Miter limit:   1.0
    fn default() -> Self {
        Self {
            blender: Blender::default(),
            transform: Transform::identity(),
            curve_quality: 10.0,
            miter_limit: 1.0,
            stats: Stats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let ctx = Context::default();
        assert_eq!(ctx.blender, Blender::PREMULTIPLIED);
        assert!(ctx.transform.is_identity());
        assert_eq!(ctx.curve_quality, 10.0);
        assert_eq!(ctx.miter_limit, 1.0);
        assert!(!ctx.is_opaque());
    }
}
