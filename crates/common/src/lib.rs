//! Cross-cutting pieces shared by the server crate and the binary:
//! response types, logging initialisation and HTTP metrics.

pub mod types;
pub mod utils;
pub mod metrics;
