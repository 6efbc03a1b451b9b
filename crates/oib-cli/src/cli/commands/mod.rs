//! CLI command handlers. Each command is in its own file.

mod classify;
mod completions;
mod content_type;
mod decide;
mod disposition;
mod filename;
mod prefs;
mod viewers;

pub use classify::run_classify;
pub use completions::{run_completions, run_manpage};
pub use content_type::run_content_type;
pub use decide::{run_decide, DecideArgs};
pub use disposition::run_disposition;
pub use filename::run_filename;
pub use prefs::run_prefs;
pub use viewers::run_viewers;
