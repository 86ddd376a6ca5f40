pub mod check;
pub mod config;
pub mod inspect;
pub mod openpose;
pub mod process;
