pub mod order;
pub mod position;
pub mod report;
pub mod target;

pub use order::*;
pub use position::*;
pub use report::*;
pub use target::*;
