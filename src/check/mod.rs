//! Post-import database verification.
pub mod catalog;
pub mod hint;
pub mod mode;
pub mod pipeline;
pub mod prober;
pub mod report;

pub use mode::InstallationMode;
pub use pipeline::{CheckOptions, Pipeline, Verdict};
pub use prober::{PgProber, SchemaProber};
pub use report::{ConsoleReporter, Reporter};
