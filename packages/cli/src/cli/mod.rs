pub mod args;
pub mod root;
