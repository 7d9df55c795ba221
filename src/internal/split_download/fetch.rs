mod coordinator;
mod fetch_one_segment;
mod range_request;
mod spawn_tasks;

pub use coordinator::{FetchPhaseParams, run_fetch_phase};
pub use fetch_one_segment::{FetchSegmentParams, fetch_one_segment};
pub use range_request::{parse_content_range, range_header};
