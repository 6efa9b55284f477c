pub mod accumulator;
pub mod app;
pub mod help_line;
pub mod keys;
pub mod list_box;
pub mod modes;
pub mod pager;
pub mod prompt;
pub mod screen;
pub mod session;
pub mod text_block;
pub mod theme;
pub mod ui;
pub mod wrap;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::run;
