use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, FrameLoop};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::InputState;
use crate::render::RenderCtx;
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            initial_size: LogicalSize::new(width, height),
            ..Self::default()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, drives `app` until the loop terminates and releases
    /// everything.
    ///
    /// Window, surface or device creation failures, and errors returned by app
    /// callbacks, end the loop and are returned here.
    pub fn run<A: App>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,
    frame_loop: FrameLoop,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    error: Option<anyhow::Error>,
    exited: bool,
}

impl<A: App> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            error: None,
            exited: false,
        }
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            frame_loop: FrameLoop::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry.with_gpu(|gpu| {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            app.on_setup(&ctx)
        })?;

        // Timing starts with the first frame, not with resource creation.
        let mut entry = entry;
        entry.with_clock_mut(|clock| clock.reset());

        Ok(entry)
    }

    /// Records the first fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.shutdown(event_loop);
    }

    /// Releases the app's and the window's resources, then exits the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.exited {
            return;
        }
        self.exited = true;

        self.app.on_exit();

        if let Some(entry) = self.entry.take() {
            let frames = entry.borrow_frame_loop().frames_presented();
            // The surface and device drop before the window they borrow.
            drop(entry);
            log::info!("window closed after {frames} frames");
        }

        event_loop.exit();
    }

    fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Runs one iteration of the frame sequence: input, update and draw, present.
fn redraw<A: App>(app: &mut A, entry: &mut WindowEntry) -> Result<()> {
    entry.with_mut(|fields| {
        if !fields.frame_loop.begin_frame() {
            return Ok(());
        }

        app.on_input(fields.input_state, fields.frame_loop);

        let mut ctx = FrameCtx {
            window: fields.window,
            gpu: fields.gpu,
            time: fields.clock.tick(),
            skipped: false,
        };
        let control = app.on_frame(&mut ctx);

        if ctx.skipped {
            fields.frame_loop.abandon_frame();
        } else {
            fields.frame_loop.end_frame();
        }

        if control? == AppControl::Exit {
            fields.frame_loop.request_close();
        }
        Ok(())
    })
}

impl<A: App> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exited {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exited {
            return;
        }

        // Render continuously, like a swap-interval driven loop.
        event_loop.set_control_flow(ControlFlow::Poll);

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(ev);
            }
            control = app.on_window_event(&event);
        });

        if control == AppControl::Exit {
            entry.with_frame_loop_mut(|fl| fl.request_close());
        }

        let outcome = match &event {
            WindowEvent::CloseRequested => {
                entry.with_frame_loop_mut(|fl| fl.request_close());
                Ok(())
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                Ok(())
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                Ok(())
            }

            WindowEvent::RedrawRequested => redraw(app, entry),

            _ => Ok(()),
        };

        let terminated = entry.borrow_frame_loop().is_terminated();

        match outcome {
            Err(err) => self.fail(event_loop, err),
            Ok(()) if terminated => self.shutdown(event_loop),
            Ok(()) => {}
        }
    }
}
