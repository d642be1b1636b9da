pub mod constants;
pub mod listener;
pub mod observable;
