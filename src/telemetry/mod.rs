mod poll;
mod types;

pub use poll::{OverlapPolicy, PollLoop, TelemetrySource, TelemetryView};
pub(crate) use types::RecentTelemetry;
pub use types::{PollStatus, Publication, TelemetrySet, TelemetrySnapshot};
