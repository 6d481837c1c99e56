//! 编排层

pub mod controller;

pub use controller::JobController;
