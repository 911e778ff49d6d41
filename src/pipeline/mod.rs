// Pipeline — the page session and the page-request sequence that drives it.

pub mod pages;
pub mod session;
