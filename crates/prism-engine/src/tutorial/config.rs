use crate::device::GpuInit;
use crate::paint::Color;
use crate::render::{Mesh, PolygonMode};
use crate::shader::ShaderSource;
use crate::window::RuntimeConfig;

/// Shaders and geometry drawn every frame.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    pub mesh: Mesh,
}

impl SceneConfig {
    pub fn new(vertex: ShaderSource, fragment: ShaderSource, mesh: Mesh) -> Self {
        Self {
            vertex,
            fragment,
            mesh,
        }
    }
}

/// Everything that distinguishes one tutorial from another.
#[derive(Debug, Clone)]
pub struct TutorialConfig {
    pub window: RuntimeConfig,
    pub gpu: GpuInit,
    pub clear_color: Color,
    pub polygon_mode: PolygonMode,
    /// `None` only clears the window.
    pub scene: Option<SceneConfig>,
}

impl TutorialConfig {
    /// An 800x600 window titled `title`, cleared to teal.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: RuntimeConfig::new(title, 800.0, 600.0),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.window.initial_size = winit::dpi::LogicalSize::new(width, height);
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_polygon_mode(mut self, mode: PolygonMode) -> Self {
        self.polygon_mode = mode;
        self
    }

    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Device options with the features the polygon mode wants.
    pub fn gpu_init(&self) -> GpuInit {
        let mut gpu = self.gpu.clone();
        if self.polygon_mode == PolygonMode::Line {
            gpu.optional_features |= wgpu::Features::POLYGON_MODE_LINE;
        }
        gpu
    }
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            window: RuntimeConfig::default(),
            gpu: GpuInit {
                // Clear colors land in the framebuffer unconverted.
                prefer_srgb: false,
                ..GpuInit::default()
            },
            clear_color: Color::TEAL,
            polygon_mode: PolygonMode::Fill,
            scene: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TutorialConfig::new("hello");
        assert_eq!(config.window.title, "hello");
        assert_eq!(config.window.initial_size.width, 800.0);
        assert_eq!(config.window.initial_size.height, 600.0);
        assert_eq!(config.clear_color, Color::rgb(0.2, 0.3, 0.3));
        assert!(!config.gpu.prefer_srgb);
        assert!(config.scene.is_none());
    }

    #[test]
    fn wireframe_requests_line_mode_optionally() {
        let config = TutorialConfig::new("wire").with_polygon_mode(PolygonMode::Line);
        let gpu = config.gpu_init();
        assert!(gpu.optional_features.contains(wgpu::Features::POLYGON_MODE_LINE));
        assert!(!gpu.required_features.contains(wgpu::Features::POLYGON_MODE_LINE));

        let fill = TutorialConfig::new("fill").gpu_init();
        assert!(fill.optional_features.is_empty());
    }
}
