pub mod options;
pub mod terminal;
pub mod unicode;
