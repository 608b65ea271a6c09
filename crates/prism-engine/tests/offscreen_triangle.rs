//! Builds scenes against a real device and draws them into an offscreen target.
//!
//! Uses the first hardware adapter, or wgpu's noop backend when there is none.
//! Validation errors outside `Scene::build` reach wgpu's default handler,
//! which panics.

use prism_engine::render::{Mesh, PolygonMode, RenderCtx, UniformWriter, VertexLayout};
use prism_engine::shader::ShaderSource;
use prism_engine::tutorial::{Scene, SceneConfig};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const VS: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;

const FS: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.5, 0.2, 1.0);
}
"#;

fn device() -> (wgpu::Device, wgpu::Queue) {
    let descriptor = wgpu::DeviceDescriptor {
        label: Some("offscreen test device"),
        required_limits: wgpu::Limits::downlevel_defaults(),
        ..Default::default()
    };

    let hardware = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    if let Ok(adapter) =
        pollster::block_on(hardware.request_adapter(&wgpu::RequestAdapterOptions::default()))
        && let Ok(pair) = pollster::block_on(adapter.request_device(&descriptor))
    {
        return pair;
    }

    let noop = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = pollster::block_on(noop.request_adapter(&wgpu::RequestAdapterOptions::default()))
        .expect("noop adapter");
    pollster::block_on(adapter.request_device(&descriptor)).expect("noop device")
}

fn build(config: &SceneConfig) -> anyhow::Result<Scene> {
    let (device, queue) = device();
    let ctx = RenderCtx::new(&device, &queue, FORMAT);
    Scene::build(&ctx, config, PolygonMode::Fill)
}

fn build_err(config: &SceneConfig) -> String {
    match build(config) {
        Ok(_) => panic!("build must fail"),
        Err(err) => format!("{err:#}"),
    }
}

fn triangle_scene() -> SceneConfig {
    let mesh = Mesh::new(
        vec![0.5, -0.5, 0.0, -0.5, -0.5, 0.0, 0.0, 0.5, 0.0],
        None,
        VertexLayout::new().with(0, 3),
    )
    .unwrap();
    SceneConfig::new(ShaderSource::wgsl("vs", VS), ShaderSource::wgsl("fs", FS), mesh)
}

#[test]
fn triangle_draws_offscreen() {
    let (device, queue) = device();
    let ctx = RenderCtx::new(&device, &queue, FORMAT);
    let scene = Scene::build(&ctx, &triangle_scene(), PolygonMode::Fill).unwrap();
    assert!(scene.uniforms().is_empty());
    draw(&device, &queue, &scene);
}

fn draw(device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen target"),
        size: wgpu::Extent3d {
            width: 64,
            height: 64,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("offscreen encoder"),
    });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("offscreen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.2,
                        g: 0.3,
                        b: 0.3,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        scene.draw(&mut pass);
    }
    queue.submit(std::iter::once(encoder.finish()));
}

const GROUP_ONE_FS: &str = r#"
@group(1) @binding(0) var<uniform> our_color: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return our_color;
}
"#;

#[test]
fn uniform_in_later_group_draws() {
    let (device, queue) = device();
    let mut config = triangle_scene();
    config.fragment = ShaderSource::wgsl("fs", GROUP_ONE_FS);

    let ctx = RenderCtx::new(&device, &queue, FORMAT);
    let scene = Scene::build(&ctx, &config, PolygonMode::Fill).unwrap();

    let mut writer = UniformWriter::new(scene.uniforms(), &queue);
    writer.set_vec4("our_color", [0.0, 1.0, 0.0, 1.0]).unwrap();
    draw(&device, &queue, &scene);
}

#[test]
fn group_past_device_limit_is_an_error() {
    let mut config = triangle_scene();
    config.fragment = ShaderSource::wgsl("fs", GROUP_ONE_FS.replace("@group(1)", "@group(5)"));
    assert!(build_err(&config).starts_with("pipeline creation failed"));
}

const FLAT_VS: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) @interpolate(flat) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 1.0);
    out.color = vec4<f32>(1.0, 0.5, 0.2, 1.0);
    return out;
}
"#;

#[test]
fn interpolation_mismatch_fails_to_link() {
    let mut config = triangle_scene();
    config.vertex = ShaderSource::wgsl("vs", FLAT_VS);
    config.fragment = ShaderSource::wgsl(
        "fs",
        "@fragment fn fs_main(@location(0) c: vec4<f32>) \
         -> @location(0) vec4<f32> { return c; }",
    );
    assert!(build_err(&config).starts_with("program link failed"));
}

#[test]
fn storage_buffer_fails_to_link() {
    let mut config = triangle_scene();
    config.fragment = ShaderSource::wgsl(
        "fs",
        GROUP_ONE_FS.replace("var<uniform>", "var<storage, read>"),
    );
    assert!(build_err(&config).starts_with("program link failed"));
}

#[test]
fn integer_color_output_is_rejected() {
    let mut config = triangle_scene();
    config.fragment = ShaderSource::wgsl(
        "fs",
        "@fragment fn fs_main() -> @location(0) vec4<u32> { return vec4<u32>(1u); }",
    );
    let err = build_err(&config);
    assert!(err.starts_with("pipeline creation failed"), "{err}");
    assert!(err.contains("location 0"), "{err}");
}

#[test]
fn broken_fragment_fails_before_gpu_objects() {
    let mut config = triangle_scene();
    config.fragment =
        ShaderSource::wgsl("fs", "@fragment fn fs_main( -> @location(0) vec4<f32> {}");
    assert!(build_err(&config).starts_with("fragment shader compilation failed"));
}
