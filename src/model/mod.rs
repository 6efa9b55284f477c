pub mod settings;
pub mod todo;

pub use settings::*;
pub use todo::*;
