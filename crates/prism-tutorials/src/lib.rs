//! The getting-started tutorials, each a [`TutorialConfig`] for the shared
//! harness.
//!
//! The binaries under `src/bin` only pick one of these and launch it.

use anyhow::Result;

use prism_engine::logging::{LoggingConfig, init_logging};
use prism_engine::paint::Color;
use prism_engine::render::{Mesh, PolygonMode, VertexLayout};
use prism_engine::shader::ShaderSource;
use prism_engine::tutorial::{EXIT_FAILURE, SceneConfig, Tutorial, TutorialConfig};

fn position_vs() -> ShaderSource {
    ShaderSource::wgsl("shaders/position.wgsl", include_str!("../shaders/position.wgsl"))
}

fn orange_fs() -> ShaderSource {
    ShaderSource::wgsl("shaders/orange.wgsl", include_str!("../shaders/orange.wgsl"))
}

fn uniform_color_fs() -> ShaderSource {
    ShaderSource::wgsl(
        "shaders/uniform_color.wgsl",
        include_str!("../shaders/uniform_color.wgsl"),
    )
}

fn color_vs() -> ShaderSource {
    ShaderSource::wgsl("shaders/color.vert.wgsl", include_str!("../shaders/color.vert.wgsl"))
}

fn color_fs() -> ShaderSource {
    ShaderSource::wgsl("shaders/color.frag.wgsl", include_str!("../shaders/color.frag.wgsl"))
}

/// Uniform name written by [`shaders_uniform`]'s frame hook.
pub const COLOR_UNIFORM: &str = "our_color";

/// An empty window cleared every frame.
pub fn hello_window() -> Result<TutorialConfig> {
    Ok(TutorialConfig::new("Hello Window"))
}

/// Two triangles side by side, drawn as wireframe.
pub fn hello_triangle() -> Result<TutorialConfig> {
    #[rustfmt::skip]
    let vertices = vec![
        // first triangle
        -0.9, -0.5, 0.0,
        -0.0, -0.5, 0.0,
        -0.45, 0.5, 0.0,
        // second triangle
         0.0, -0.5, 0.0,
         0.9, -0.5, 0.0,
         0.45, 0.5, 0.0,
    ];
    let mesh = Mesh::new(vertices, None, VertexLayout::new().with(0, 3))?;

    Ok(TutorialConfig::new("Hello Triangle")
        .with_polygon_mode(PolygonMode::Line)
        .with_scene(SceneConfig::new(position_vs(), orange_fs(), mesh)))
}

/// A rectangle from four shared vertices and six indices.
pub fn hello_rectangle() -> Result<TutorialConfig> {
    #[rustfmt::skip]
    let vertices = vec![
         0.5,  0.5, 0.0, // top right
         0.5, -0.5, 0.0, // bottom right
        -0.5, -0.5, 0.0, // bottom left
        -0.5,  0.5, 0.0, // top left
    ];
    let indices = vec![0, 1, 3, 1, 2, 3];
    let mesh = Mesh::new(vertices, Some(indices), VertexLayout::new().with(0, 3))?;

    Ok(TutorialConfig::new("Hello Rectangle")
        .with_scene(SceneConfig::new(position_vs(), orange_fs(), mesh)))
}

/// A triangle whose color pulses through a uniform set every frame.
///
/// Pair with [`pulse_color`] in a frame hook writing [`COLOR_UNIFORM`].
pub fn shaders_uniform() -> Result<TutorialConfig> {
    let mesh = Mesh::new(
        vec![0.5, -0.5, 0.0, -0.5, -0.5, 0.0, 0.0, 0.5, 0.0],
        None,
        VertexLayout::new().with(0, 3),
    )?;

    Ok(TutorialConfig::new("Shaders: Uniform")
        .with_scene(SceneConfig::new(position_vs(), uniform_color_fs(), mesh)))
}

/// Green channel in `[0.5, 1.0]` for `elapsed` seconds.
pub fn pulse_green(elapsed: f64) -> f32 {
    (elapsed.sin().abs() / 2.0 + 0.5) as f32
}

pub fn pulse_color(elapsed: f64) -> Color {
    Color::rgb(0.0, pulse_green(elapsed), 0.0)
}

/// A triangle with a color per vertex, blended across its face.
pub fn shaders_interpolation() -> Result<TutorialConfig> {
    #[rustfmt::skip]
    let vertices = vec![
        // position        // color
         0.5, -0.5, 0.0,   1.0, 0.0, 0.0,
        -0.5, -0.5, 0.0,   0.0, 1.0, 0.0,
         0.0,  0.5, 0.0,   0.0, 0.0, 1.0,
    ];
    let mesh = Mesh::new(vertices, None, VertexLayout::new().with(0, 3).with(1, 3))?;

    Ok(TutorialConfig::new("Shaders: Interpolation")
        .with_scene(SceneConfig::new(color_vs(), color_fs(), mesh)))
}

/// Initializes logging, builds and runs a tutorial.
///
/// Returns normally when the window closes; exits the process with
/// [`EXIT_FAILURE`] on any error.
pub fn launch<F>(build: F)
where
    F: FnOnce() -> Result<Tutorial>,
{
    init_logging(LoggingConfig::default());

    if let Err(err) = build().and_then(Tutorial::run) {
        log::error!("tutorial failed: {err:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use prism_engine::render::check_vertex_inputs;
    use prism_engine::shader::{self, ShaderProgram, StageKind};

    fn link_scene(config: &TutorialConfig) -> ShaderProgram {
        let scene = config.scene.as_ref().expect("tutorial has a scene");
        let vs = shader::compile(&scene.vertex, StageKind::Vertex).unwrap();
        let fs = shader::compile(&scene.fragment, StageKind::Fragment).unwrap();
        let program = shader::link([vs, fs]).unwrap();
        check_vertex_inputs(program.vertex_inputs(), scene.mesh.layout()).unwrap();
        program
    }

    #[test]
    fn hello_window_only_clears() {
        let config = hello_window().unwrap();
        assert!(config.scene.is_none());
        assert_eq!(config.window.initial_size.width, 800.0);
    }

    #[test]
    fn hello_triangle_is_two_wireframe_triangles() {
        let config = hello_triangle().unwrap();
        assert_eq!(config.polygon_mode, PolygonMode::Line);
        let mesh = &config.scene.as_ref().unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.index_count(), None);
        link_scene(&config);
    }

    #[test]
    fn hello_rectangle_is_indexed() {
        let config = hello_rectangle().unwrap();
        let mesh = &config.scene.as_ref().unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), Some(6));
        link_scene(&config);
    }

    #[test]
    fn shaders_uniform_exposes_color() {
        let program = link_scene(&shaders_uniform().unwrap());
        let slot = program
            .uniforms()
            .iter()
            .find(|u| u.name == COLOR_UNIFORM)
            .expect("color uniform reflected");
        assert_eq!(slot.size, std::mem::size_of::<[f32; 4]>() as u64);
    }

    #[test]
    fn shaders_interpolation_feeds_color_attribute() {
        let program = link_scene(&shaders_interpolation().unwrap());
        assert_eq!(program.vertex_inputs().len(), 2);
    }

    #[test]
    fn green_pulses_between_half_and_full() {
        assert!((pulse_green(0.0) - 0.5).abs() < 1e-6);
        assert!((pulse_green(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-6);
        assert!((pulse_green(std::f64::consts::PI) - 0.5).abs() < 1e-6);
        for i in 0..100 {
            let g = pulse_green(i as f64 * 0.37);
            assert!((0.5..=1.0).contains(&g));
        }
        assert_eq!(pulse_color(0.0).a, 1.0);
    }
}
