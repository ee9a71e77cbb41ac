mod panic;
mod timing;

pub use panic::{catch_panic_layer, HandlerPanicked};
pub use timing::track_request_duration;
