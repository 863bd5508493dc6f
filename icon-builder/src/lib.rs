pub mod builder;
pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod variant;

pub use builder::{build_icon, BuildOutcome, BuildReport, Dimensions};
pub use error::IconBuildError;
