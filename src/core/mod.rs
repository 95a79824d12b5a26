pub mod calculator;
pub mod dedication;
pub mod economics;
pub mod ingest;
pub mod locks;
pub mod log;
pub mod notify;
pub mod overview;
pub mod resolver;
pub mod source;
pub mod totals;
pub mod validation;
