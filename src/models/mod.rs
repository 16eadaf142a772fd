pub mod change_event;
pub mod open_order;
pub mod scheduled_order;
pub mod ticker;

pub(crate) mod num;

pub use change_event::{ChangeEvent, RowRef};
pub use open_order::OpenOrder;
pub use scheduled_order::ScheduledOrder;
pub use ticker::{Quote, TickerMessage};
