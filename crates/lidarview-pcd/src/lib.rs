#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Color types and HSL conversions used for intensity shading.
pub mod color;

/// I/O utilities for reading point cloud data.
pub mod io;

/// Point cloud container types.
pub mod pointcloud;
