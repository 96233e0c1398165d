pub mod common;
pub mod descriptor;
pub mod resource;

pub use common::*;
pub use descriptor::*;
pub use resource::*;
