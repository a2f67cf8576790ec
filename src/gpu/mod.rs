pub mod balls;
pub mod framework;
pub mod points;
pub mod viewport;
