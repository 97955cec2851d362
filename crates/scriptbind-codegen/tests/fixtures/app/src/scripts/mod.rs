pub mod calculator;
pub mod greeter;
pub mod model;
pub mod processor;
