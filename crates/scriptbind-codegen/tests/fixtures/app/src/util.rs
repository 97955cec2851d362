pub struct Clock {
    millis: u64,
}

impl Clock {
    pub fn get_millis(&self) -> u64 {
        self.millis
    }
}
