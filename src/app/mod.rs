pub mod collectors;
pub mod dashboard;
