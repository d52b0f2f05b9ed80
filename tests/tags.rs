//! Integration tests for field tags.

mod common;

use std::collections::HashMap;

use common::{person, Tagged};
use pretty_assertions::assert_eq;
use reflector::{Object, ReflectError};

#[test]
fn test_tag_lookup() {
    let obj = Object::new(person());
    assert_eq!(obj.field("street").tag("tag").expect("street tag"), "be");
    assert_eq!(obj.field("street").tag("tag2").expect("street tag2"), "1,2,3");
    assert_eq!(obj.field("number").tag("tag").expect("number tag"), "bi");
}

#[test]
fn test_missing_tag_key_is_empty() {
    let obj = Object::new(person());
    assert_eq!(obj.field("street").tag("nokey").expect("existing field"), "");
    assert_eq!(obj.field("name").tag("tag").expect("untagged field"), "");
    assert!(obj.field("name").tag_expanded("tag").expect("untagged field").is_empty());
    assert!(obj.field("name").tags().expect("untagged field").is_empty());
}

#[test]
fn test_tag_on_invalid_field() {
    let obj = Object::new(person());
    let err = obj.field("HahaStreet").tag("tag").unwrap_err();
    assert_eq!(err, ReflectError::InvalidField(String::from("HahaStreet")));
    assert_eq!(err.to_string(), "Invalid field HahaStreet");

    assert!(obj.field("HahaStreet").tags().is_err());
    assert!(obj.field("HahaStreet").tag_expanded("tag").is_err());
    assert!(obj.field("HahaStreet").raw_tag().is_err());
}

#[test]
fn test_tag_expanded() {
    let obj = Object::new(person());
    assert_eq!(
        obj.field("street").tag_expanded("tag2").expect("street tag2"),
        ["1", "2", "3"]
    );
    assert_eq!(obj.field("street").tag_expanded("tag").expect("street tag"), ["be"]);
}

#[test]
fn test_tags_map() {
    let obj = Object::new(person());
    let expected: HashMap<String, String> = [("tag", "be"), ("tag2", "1,2,3")]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    assert_eq!(obj.field("street").tags().expect("street tags"), expected);
    assert_eq!(obj.field("street").raw_tag().expect("street raw tag"), r#"tag:"be" tag2:"1,2,3""#);
}

#[test]
fn test_tags_attribute_sugar() {
    let obj = Object::new(Tagged::default());
    let id = obj.field("Id");
    assert_eq!(id.raw_tag().expect("id raw tag"), r#"json:"id,omitempty" db:"pk""#);
    assert_eq!(id.tag("db").expect("db tag"), "pk");
    assert_eq!(id.tag_expanded("json").expect("json tag"), ["id", "omitempty"]);
}

#[test]
fn test_tags_available_without_value() {
    let obj = Object::from_type::<common::Person>();
    assert_eq!(obj.field("street").tag("tag").expect("street tag"), "be");
}
