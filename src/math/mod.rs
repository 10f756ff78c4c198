pub mod numeric;

pub use numeric::{approach, argmax, round_to_int};
