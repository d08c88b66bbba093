pub mod coordinate;
pub mod entry;
pub mod project;
pub mod verdict;
