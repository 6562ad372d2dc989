//! Injected per-visit context (referral tokens).

mod fixed;
mod traits;
mod types;

pub use fixed::*;
pub use traits::*;
pub use types::*;
