/// Viewport size in logical pixels.
///
/// The camera projection spans exactly this many world units at zoom 1.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Physical size divided by the window scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new((width as f64 / scale) as f32, (height as f64 / scale) as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or 1 for degenerate viewports.
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_physical_divides_by_scale() {
        let vp = Viewport::from_physical(1600, 1200, 2.0);
        assert_eq!(vp, Viewport::new(800.0, 600.0));
    }

    #[test]
    fn bad_scale_factor_is_treated_as_one() {
        assert_eq!(Viewport::from_physical(800, 600, 0.0), Viewport::new(800.0, 600.0));
        assert_eq!(Viewport::from_physical(800, 600, f64::NAN), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn validity_and_aspect() {
        assert!(Viewport::new(800.0, 600.0).is_valid());
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 600.0).is_valid());
        assert_eq!(Viewport::new(800.0, 400.0).aspect(), 2.0);
        assert_eq!(Viewport::default().aspect(), 1.0);
    }
}
