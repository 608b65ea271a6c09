//! GPU device + surface management.
//!
//! `Gpu` owns the device and queue behind the window's surface and hands out
//! one frame at a time.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
