//! Small helpers shared by the workspace binaries and providers.

pub mod env;
pub mod logging;
