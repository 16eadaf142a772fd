pub mod backend;
pub mod realtime;
pub mod ticker_feed;
pub mod watch_manager;
