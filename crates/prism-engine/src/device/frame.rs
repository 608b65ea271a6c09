/// The swapchain image being drawn this frame.
///
/// Hand it back to `Gpu::submit` before acquiring another one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
