pub mod feedback;
pub mod flow;
pub mod practice;
pub mod questions;
pub mod setup;
