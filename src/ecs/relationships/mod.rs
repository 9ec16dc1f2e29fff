pub mod occupancy;

pub use occupancy::{InhabitedBy, Inhabits};
