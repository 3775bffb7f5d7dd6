pub mod common;
pub mod period;
pub mod subscription;
pub mod summary;

pub use common::*;
pub use period::*;
pub use subscription::*;
pub use summary::*;
