use anyhow::{Context, Result};

use crate::core::{App, AppControl, FrameCtx};
use crate::paint::Color;
use crate::render::{
    GpuMesh, Pipeline, PolygonMode, RenderCtx, UniformError, UniformSet, UniformWriter,
};
use crate::shader::{self, StageKind};
use crate::time::FrameTime;
use crate::window::Runtime;

use super::config::{SceneConfig, TutorialConfig};

/// Process exit status for any initialization or runtime failure.
pub const EXIT_FAILURE: i32 = -1;

/// Per-frame uniform update, called before the scene is drawn.
pub type FrameHook = Box<dyn FnMut(&mut UniformWriter<'_>, &FrameTime) -> Result<(), UniformError>>;

/// GPU objects of a built [`SceneConfig`].
pub struct Scene {
    pipeline: Pipeline,
    mesh: GpuMesh,
    uniforms: UniformSet,
}

impl Scene {
    /// Compiles, links and uploads everything the scene draws.
    ///
    /// Any failure here is fatal; nothing is drawn with a partial program.
    pub fn build(
        ctx: &RenderCtx<'_>,
        config: &SceneConfig,
        polygon_mode: PolygonMode,
    ) -> Result<Self> {
        let vertex = shader::compile(&config.vertex, StageKind::Vertex)
            .context("vertex shader compilation failed")?;
        let fragment = shader::compile(&config.fragment, StageKind::Fragment)
            .context("fragment shader compilation failed")?;

        let program = shader::link([vertex, fragment]).context("program link failed")?;

        let pipeline = Pipeline::new(
            ctx.device,
            &program,
            config.mesh.layout(),
            ctx.surface_format,
            polygon_mode,
        )
        .context("pipeline creation failed")?;

        let mesh = config.mesh.upload(ctx.device);
        let uniforms = UniformSet::new(ctx.device, &pipeline, program.uniforms());

        Ok(Self {
            pipeline,
            mesh,
            uniforms,
        })
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// Records the scene's single draw call.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(self.pipeline.raw());
        self.uniforms.bind(pass);
        self.mesh.draw(pass);
    }
}

/// A runnable tutorial.
pub struct Tutorial {
    config: TutorialConfig,
    hook: Option<FrameHook>,
}

impl Tutorial {
    pub fn new(config: TutorialConfig) -> Self {
        Self { config, hook: None }
    }

    /// Installs a uniform update run every frame. Ignored without a scene.
    pub fn with_frame_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut UniformWriter<'_>, &FrameTime) -> Result<(), UniformError> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Runs until the window closes or Escape is pressed.
    ///
    /// Returns the first fatal error; the caller maps it to [`EXIT_FAILURE`].
    pub fn run(self) -> Result<()> {
        let gpu_init = self.config.gpu_init();
        let TutorialConfig {
            window,
            clear_color,
            polygon_mode,
            scene,
            ..
        } = self.config;

        log::info!("starting \"{}\"", window.title);

        let app = TutorialApp {
            clear_color,
            polygon_mode,
            scene_config: scene,
            scene: None,
            hook: self.hook,
        };

        Runtime::run(window, gpu_init, app)
    }
}

struct TutorialApp {
    clear_color: Color,
    polygon_mode: PolygonMode,
    scene_config: Option<SceneConfig>,
    scene: Option<Scene>,
    hook: Option<FrameHook>,
}

impl App for TutorialApp {
    fn on_setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if let Some(config) = self.scene_config.take() {
            self.scene = Some(Scene::build(ctx, &config, self.polygon_mode)?);
        }
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if let (Some(scene), Some(hook)) = (&self.scene, &mut self.hook) {
            let mut writer = UniformWriter::new(scene.uniforms(), ctx.gpu.queue());
            hook(&mut writer, &ctx.time).context("uniform update failed")?;
        }

        let scene = self.scene.as_ref();
        let control = ctx.render(self.clear_color, |pass| {
            if let Some(scene) = scene {
                scene.draw(pass);
            }
        });

        anyhow::ensure!(control == AppControl::Continue, "surface lost; cannot present");
        Ok(AppControl::Continue)
    }

    fn on_exit(&mut self) {
        if self.scene.take().is_some() {
            log::debug!("released pipeline, buffers and uniforms");
        }
    }
}
