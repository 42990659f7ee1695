//! Domain types for DeltaLab

pub mod bar;
pub mod profile;

pub use bar::{non_negative, Bar, BarEvent};
pub use profile::{VolumeProfile, VolumeProfileLevel};
