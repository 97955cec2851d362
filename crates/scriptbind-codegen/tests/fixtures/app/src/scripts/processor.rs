use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::model::{Address, Person};
use crate::util::Clock;
use scriptbind_runtime::script_interface;

#[script_interface(
    context = ProcessorContext,
    location = "processor.js",
    excluded = ["debug_dump"]
)]
pub trait Processor {
    fn process(&self, people: Vec<Person>) -> HashMap<String, Person>;

    fn score(&mut self, person: &Person, weights: &[f64]) -> Result<f64, ProcessError>;

    fn summary(&self) -> String;

    fn debug_dump(&self) -> String {
        String::new()
    }
}

#[derive(Debug)]
pub struct ProcessError {
    pub message: String,
}

pub struct ProcessorContext {
    calls: AtomicU64,
    clock: Clock,
}

impl ProcessorContext {
    pub fn new(clock: Clock) -> Self {
        Self {
            calls: AtomicU64::new(0),
            clock,
        }
    }

    pub fn validate_person(&self, person: &Person) -> bool {
        self.record_call();
        !person.get_name().is_empty()
    }

    pub fn format_address(&self, person: &Person) -> String {
        self.record_call();
        let address = person.get_address();
        format!("{}, {}", address.get_street(), address.get_city())
    }

    pub fn lookup(&self, street: &str) -> Option<Address> {
        self.record_call();
        let _ = street;
        None
    }

    pub fn now(&self) -> &Clock {
        &self.clock
    }

    pub fn debug_dump(&self) -> String {
        format!("{} calls", self.calls.load(Ordering::Relaxed))
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Display for ProcessorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessorContext")
    }
}
