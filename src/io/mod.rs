pub mod editor;
pub mod logging;
pub mod settings_io;
pub mod todo_io;
