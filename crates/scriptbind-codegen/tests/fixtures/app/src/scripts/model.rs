use std::collections::HashMap;

pub struct Address {
    street: String,
    city: String,
    postal_code: Option<String>,
}

impl Address {
    pub fn get_street(&self) -> &str {
        &self.street
    }

    pub fn get_city(&self) -> &str {
        &self.city
    }

    pub fn get_postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }
}

pub struct Person {
    name: String,
    age: u32,
    address: Address,
    tags: Vec<String>,
    friends: Vec<Person>,
    attributes: HashMap<String, String>,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32, address: Address) -> Self {
        Self {
            name: name.into(),
            age,
            address,
            tags: Vec::new(),
            friends: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_age(&self) -> u32 {
        self.age
    }

    pub fn get_address(&self) -> &Address {
        &self.address
    }

    pub fn get_tags(&self) -> &[String] {
        &self.tags
    }

    pub fn get_friends(&self) -> &[Person] {
        &self.friends
    }

    pub fn get_attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn is_adult(&self) -> bool {
        self.age >= 18
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
