pub mod output;
pub mod walker;

pub use output::{render_report, write_report_to, OutputFormat, OutputWriter};
pub use walker::SourceWalker;
