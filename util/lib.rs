pub mod error;
pub mod format;
pub mod log;
pub mod serve;
pub mod table;
