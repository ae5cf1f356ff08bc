pub mod angle_generator;
pub mod critic;
pub mod drafter;
pub mod formatter;
