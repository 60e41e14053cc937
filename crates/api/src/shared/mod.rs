pub mod keyboards;
pub mod texts;
pub mod usecase;
