pub mod console;
pub mod list;
pub mod setup;
pub mod terminal;
pub mod ui;
pub mod watch;
