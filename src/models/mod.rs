pub mod contributor;
pub mod repo;
pub mod task;
pub mod window;

pub use contributor::*;
pub use repo::*;
pub use task::*;
pub use window::*;
