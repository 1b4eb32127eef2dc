pub mod consts;
pub mod model;

pub use model::{BuildConfig, Config, ReleaseConfig, TailwindConfig};
