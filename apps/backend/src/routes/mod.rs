pub mod collection;
pub mod files;
pub mod generate;
pub mod speech;
