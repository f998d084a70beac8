pub mod format;
pub mod rewrite;
