//! Page range normalization, page classification and progress plumbing.

mod classifier;
mod progress;
mod range;

pub use classifier::{analyze, PageExtraction, Scanner};
pub use progress::{CancelToken, NoProgress, ProgressSink};
pub use range::PageRange;
