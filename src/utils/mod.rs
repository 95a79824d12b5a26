pub mod date;
pub mod formatting;
