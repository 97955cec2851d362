use scriptbind_runtime::script_interface;

#[script_interface(location = "calculator.js")]
pub trait Calculator {
    fn add(&self, a: i32, b: i32) -> i32;
    fn multiply(&self, a: i32, b: i32) -> i32;
    fn divide(&self, a: f64, b: f64) -> f64;
}
