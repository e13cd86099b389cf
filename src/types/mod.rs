pub mod advice;
pub mod analysis;
pub mod market;
pub mod pattern;

pub use advice::*;
pub use analysis::*;
pub use market::*;
pub use pattern::*;
