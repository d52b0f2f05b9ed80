//! Fixture types shared by the integration tests.

#![allow(dead_code)]

use reflector::{reflect_methods, Reflect};

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Address {
    #[reflect(tag = r#"tag:"be" tag2:"1,2,3""#)]
    pub street: String,
    #[reflect(tag = r#"tag:"bi""#)]
    pub number: i64,
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(methods)]
pub struct Person {
    pub name: String,
    #[reflect(embed)]
    pub address: Address,
}

#[reflect_methods]
impl Person {
    pub fn add(&self, a: i32, b: i32, c: i32) -> i32 {
        a + b + c
    }

    pub fn substract(&mut self, a: i32, b: i32) -> i32 {
        a - b
    }

    pub fn returns_error(&self, fail: bool) -> Result<(String, Option<i64>), String> {
        if fail {
            Err(String::from("Error here"))
        } else {
            Ok((self.name.clone(), Some(self.address.number)))
        }
    }

    pub fn hi(&self, name: String) -> String {
        format!("Hi {}!", name)
    }

    /// Associated functions and private methods stay out of the method set.
    pub fn new(name: &str) -> Self {
        Person {
            name: String::from(name),
            address: Address::default(),
        }
    }

    fn secret(&self) -> i32 {
        42
    }
}

/// A named integer type.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(methods)]
pub struct CustomType(pub i64);

#[reflect_methods]
impl CustomType {
    pub fn method1(&self) -> String {
        String::from("yep")
    }

    pub fn method2(&mut self) -> i32 {
        self.0 += 1;
        7
    }
}

/// Declares `number` both directly and through the embedded address.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Company {
    #[reflect(embed)]
    pub address: Address,
    pub number: i64,
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(methods)]
pub struct Engine {
    pub power: i32,
}

#[reflect_methods]
impl Engine {
    pub fn start(&self) -> String {
        String::from("engine starts")
    }

    pub fn describe(&self) -> String {
        format!("power {}", self.power)
    }

    pub fn tune(&mut self, delta: i32) -> i32 {
        self.power += delta;
        self.power
    }
}

/// Embeds `Engine`, whose methods join the car's method set.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(methods)]
pub struct Car {
    pub name: String,
    #[reflect(embed)]
    pub engine: Engine,
}

#[reflect_methods]
impl Car {
    pub fn start(&self) -> String {
        format!("{} starts", self.name)
    }
}

pub fn car() -> Car {
    Car {
        name: String::from("Yugo"),
        engine: Engine { power: 120 },
    }
}

#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct Tagged {
    #[reflect(rename = "Id", tags(json = "id,omitempty", db = "pk"))]
    pub id: u32,
    pub labels: Vec<String>,
    pub parent: Option<u32>,
}

pub fn person() -> Person {
    Person {
        name: String::from("Ana"),
        address: Address {
            street: String::from("Trg"),
            number: 7,
        },
    }
}

pub fn names(fields: &[reflector::Field<'_, '_>]) -> Vec<String> {
    fields.iter().map(|f| f.name().to_owned()).collect()
}
