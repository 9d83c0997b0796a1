//! POM documents: the minimal model, resolution precedence and generation.

pub mod model;
pub mod resolver;

pub use model::{PomModel, read_model};
pub use resolver::{PomSource, resolve_pom};
