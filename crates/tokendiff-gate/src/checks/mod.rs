//! Built-in failure checks.

pub mod breaking;
pub mod changes;

pub use breaking::BreakingChangesCheck;
pub use changes::TokenChangesCheck;
