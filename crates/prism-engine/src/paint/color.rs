/// Straight-alpha RGBA color with components in `[0, 1]`.
///
/// Components are written to the framebuffer as given. On a non-sRGB surface
/// that reproduces the usual `glClearColor` result.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// The dark teal background used throughout the tutorials.
    pub const TEAL: Self = Self::rgb(0.2, 0.3, 0.3);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as a `vec4<f32>` uniform value.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.2, 0.3, 0.3).a, 1.0);
        assert_eq!(Color::TEAL, Color::rgba(0.2, 0.3, 0.3, 1.0));
    }

    #[test]
    fn uniform_array_order() {
        assert_eq!(Color::rgba(0.0, 1.0, 0.25, 0.5).to_array(), [0.0, 1.0, 0.25, 0.5]);
    }

    #[test]
    fn wgpu_conversion_keeps_straight_alpha() {
        let c = Color::rgba(0.2, 0.3, 0.3, 0.5).to_wgpu();
        assert!((c.r - 0.2).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);
    }
}
