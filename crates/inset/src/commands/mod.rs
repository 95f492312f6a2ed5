pub mod build;
pub mod export;
pub mod path;
pub mod serve;
pub mod validate;
