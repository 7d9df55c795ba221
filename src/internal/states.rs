pub mod progress_state;
