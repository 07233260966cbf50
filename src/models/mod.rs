pub mod cycle;
pub mod forecast;
pub mod recommendation;
pub mod suitability;

pub use cycle::*;
pub use forecast::*;
pub use recommendation::*;
pub use suitability::*;
