pub mod lookup;
pub mod resolve;
pub mod shape;

pub use lookup::*;
pub use resolve::*;
