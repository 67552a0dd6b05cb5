//! Digital input lines and the debounced sampler

pub mod line;
pub mod sampler;

pub use line::{Line, LineLevels, LINE_COUNT};
pub use sampler::{EdgeKind, InputEdge, InputSampler};
