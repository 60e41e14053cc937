pub mod setup;
pub mod updates;
