pub mod balance;
pub mod buckets;
pub mod intervals;
pub mod mix;
