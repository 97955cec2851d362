pub struct Circle {
    radius: f64,
}

impl Circle {
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

pub trait Area {
    fn area(&self, circle: &Circle) -> f64;
    fn describe(&self) -> String;
}
