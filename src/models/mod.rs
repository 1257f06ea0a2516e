pub mod agenda;
pub mod paragraph;
pub mod speech;

pub use agenda::*;
pub use paragraph::*;
pub use speech::*;
