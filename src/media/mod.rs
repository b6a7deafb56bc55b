pub mod library;
pub mod scanner;
pub mod size;
