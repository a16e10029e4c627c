pub mod base;
pub mod github;
