pub mod keypoint;
pub mod robust;
pub mod runtime;

pub use keypoint::*;
pub use robust::*;
pub use runtime::*;
