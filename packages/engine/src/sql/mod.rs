pub(crate) mod ast;
pub(crate) mod finish;
pub(crate) mod format;
pub(crate) mod params;
pub(crate) mod preview;
pub(crate) mod rewrite;
