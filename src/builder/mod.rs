//! CMake invocation and child environment.

pub mod cmake;
pub mod env;
pub mod toolchain;

pub use cmake::CMake;
pub use env::{compose_environment, EnvOptions, Environment};
pub use toolchain::{default_cuda_root, CudaToolchain};
