pub mod calendar;
pub mod filter;
pub mod print;
pub mod render;

pub use calendar::{CalendarState, ClickTarget, Nav, ViewMode};
pub use print::print_document;
pub use render::render;
