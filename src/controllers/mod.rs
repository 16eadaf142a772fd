pub mod realtime_controller;
pub mod status_controller;
pub mod watch_controller;
