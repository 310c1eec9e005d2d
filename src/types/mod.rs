pub mod sample;
pub mod field;

pub use sample::{Acceleration, Orientation, Sample};
pub use field::SampleField;
