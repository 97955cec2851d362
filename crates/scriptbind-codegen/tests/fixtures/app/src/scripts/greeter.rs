pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
    fn shout(&mut self, words: Vec<String>) -> String;
}

pub struct GreeterContext {
    locale: String,
}

impl GreeterContext {
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into() }
    }

    pub fn locale(&self) -> String {
        self.locale.clone()
    }
}
