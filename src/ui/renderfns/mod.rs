pub mod command;
pub mod header;
pub mod utils;

pub use command::draw_command_overlay;
pub use header::draw_header;
pub use utils::{format_age, status_color, truncate};
