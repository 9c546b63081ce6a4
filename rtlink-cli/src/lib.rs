pub mod error;
pub mod freq;
pub mod metrics;
pub mod pipeline;

pub use error::*;
pub use freq::*;
pub use metrics::*;
pub use pipeline::*;
