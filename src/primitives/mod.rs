pub mod binding;
pub mod property;
