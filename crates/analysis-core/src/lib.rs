pub mod error;
pub mod indicator_set;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use indicator_set::*;
pub use traits::*;
pub use types::*;
