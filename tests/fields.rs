//! Integration tests for field enumeration and field access.

mod common;

use common::{names, person, Address, Company, CustomType, Person, Tagged};
use pretty_assertions::assert_eq;
use reflector::{Kind, Object, ReflectError, Typed, Value};

// ============================================================================
// Enumeration
// ============================================================================

#[test]
fn test_flattened_fields() {
    let obj = Object::new(person());
    assert_eq!(names(&obj.fields_flattened()), ["name", "street", "number"]);
}

#[test]
fn test_top_level_fields() {
    let obj = Object::new(person());
    let fields = obj.fields();
    assert_eq!(names(&fields), ["name", "address"]);
    assert!(!fields[0].is_anonymous());
    assert!(fields[1].is_anonymous());
    assert_eq!(fields[1].kind(), Kind::Struct);
}

#[test]
fn test_all_fields_list_embedded_struct_before_children() {
    let obj = Object::new(person());
    let fields = obj.fields_all();
    assert_eq!(names(&fields), ["name", "address", "street", "number"]);
    assert_eq!(fields[2].path(), Some(&[1, 0][..]));
    assert_eq!(fields[3].path(), Some(&[1, 1][..]));
}

#[test]
fn test_enumeration_does_not_depend_on_construction() {
    let mut p = person();
    let by_value = names(&Object::new(p.clone()).fields_flattened());
    let by_type = names(&Object::from_type::<Person>().fields_flattened());
    let by_ref = names(&Object::from_mut(&mut p).fields_flattened());
    assert_eq!(by_value, by_ref);
    assert_eq!(by_type, by_ref);
}

#[test]
fn test_duplicate_fields() {
    let obj = Object::new(Company::default());
    assert_eq!(names(&obj.fields_all()), ["address", "street", "number", "number"]);
    assert_eq!(names(&obj.fields_flattened()), ["street", "number", "number"]);
    assert_eq!(obj.duplicate_fields(), ["number"]);

    assert!(Object::new(person()).duplicate_fields().is_empty());
}

#[test]
fn test_shallow_field_shadows_embedded_one() {
    let mut company = Company::default();
    {
        let obj = Object::from_mut(&mut company);
        let number = obj.field("number");
        assert_eq!(number.path(), Some(&[1][..]));
        assert!(!number.is_anonymous());
        number.set(5i64).expect("set number");
    }
    assert_eq!(company.number, 5);
    assert_eq!(company.address.number, 0);
}

#[test]
fn test_custom_type_has_no_fields() {
    let obj = Object::new(CustomType(3));
    assert!(obj.fields().is_empty());
    assert!(obj.fields_flattened().is_empty());
    assert!(obj.fields_all().is_empty());
    assert!(!obj.is_struct_or_ptr_to_struct());
    assert_eq!(obj.kind(), Kind::I64);
    assert_eq!(obj.type_name(), "CustomType");
    assert_eq!(obj.to_value(), Some(Value::I64(3)));
}

// ============================================================================
// Object metadata
// ============================================================================

#[test]
fn test_pointer_and_value_objects() {
    let mut p = person();

    let value = Object::new(p.clone());
    assert!(!value.is_ptr());
    assert!(value.is_struct_or_ptr_to_struct());
    assert_eq!(value.kind(), Kind::Struct);
    assert_eq!(value.type_name(), "Person");

    let pointer = Object::from_mut(&mut p);
    assert!(pointer.is_ptr());
    assert!(pointer.is_struct_or_ptr_to_struct());
    assert_eq!(pointer.kind(), Kind::Pointer);
    assert_eq!(pointer.type_name(), "&mut Person");
    assert_eq!(pointer.underlying_type(), Person::type_info());
}

#[test]
fn test_object_snapshot() {
    let obj = Object::new(person());
    let snapshot = obj.to_value().expect("value-backed object");
    assert_eq!(snapshot.get("name"), Some(&Value::from("Ana")));
    let address = snapshot.get("address").expect("address record");
    assert_eq!(address.get("number"), Some(&Value::I64(7)));
}

#[test]
fn test_from_type_has_no_value() {
    let obj = Object::from_type::<Person>();
    assert!(obj.is_ptr());
    assert!(!obj.has_value());
    assert_eq!(obj.to_value(), None);

    let field = obj.field("street");
    assert!(field.is_valid());
    assert_eq!(field.kind(), Kind::String);
    assert_eq!(field.get(), None);
    assert_eq!(
        field.set("ulica"),
        Err(ReflectError::Unaddressable(String::from("street")))
    );
}

// ============================================================================
// Field accessor
// ============================================================================

#[test]
fn test_field_metadata() {
    let obj = Object::new(person());

    let number = obj.field("number");
    assert!(number.is_valid());
    assert_eq!(number.kind(), Kind::I64);
    assert_eq!(number.ty(), Some(i64::type_info()));
    assert_eq!(number.path(), Some(&[1, 1][..]));

    let address = obj.field("address");
    assert!(address.is_valid());
    assert!(address.is_anonymous());
    assert_eq!(address.ty(), Some(Address::type_info()));
}

#[test]
fn test_invalid_field_sentinels() {
    let obj = Object::new(person());
    let field = obj.field("HahaStreet");
    assert!(!field.is_valid());
    assert_eq!(field.name(), "HahaStreet");
    assert_eq!(field.kind(), Kind::Invalid);
    assert_eq!(field.ty(), None);
    assert_eq!(field.path(), None);
    assert_eq!(field.get(), None);
    assert!(!field.is_anonymous());
}

#[test]
fn test_get_reads_promoted_fields() {
    let obj = Object::new(person());
    assert_eq!(obj.field("name").get(), Some(Value::from("Ana")));
    assert_eq!(obj.field("street").get(), Some(Value::from("Trg")));
    assert_eq!(obj.field("number").get(), Some(Value::I64(7)));
}

#[test]
fn test_set_then_get_on_pointer() {
    let mut p = person();
    {
        let obj = Object::from_mut(&mut p);
        obj.field("street").set("ulica").expect("set street");
        obj.field("name").set(String::from("Marko")).expect("set name");
        assert_eq!(obj.field("street").get(), Some(Value::from("ulica")));
        assert_eq!(obj.field("name").get(), Some(Value::from("Marko")));
    }
    assert_eq!(p.address.street, "ulica");
    assert_eq!(p.name, "Marko");
}

#[test]
fn test_set_widens_integers() {
    let mut p = person();
    {
        let obj = Object::from_mut(&mut p);
        obj.field("number").set(12i32).expect("i32 fits i64");
        obj.field("number").set(Value::U8(13)).expect("u8 fits i64");
    }
    assert_eq!(p.address.number, 13);
}

#[test]
fn test_set_on_value_object_is_refused() {
    let p = person();
    let obj = Object::new(p.clone());
    assert_eq!(
        obj.field("street").set("ulica"),
        Err(ReflectError::Unaddressable(String::from("street")))
    );
    assert_eq!(obj.field("street").get(), Some(Value::from("Trg")));
    assert_eq!(p.address.street, "Trg");
}

#[test]
fn test_set_type_mismatch() {
    let mut p = person();
    let obj = Object::from_mut(&mut p);
    let err = obj.field("number").set("seven").unwrap_err();
    assert!(matches!(err, ReflectError::TypeMismatch { ref field, .. } if field == "number"));
    assert_eq!(obj.field("number").get(), Some(Value::I64(7)));
}

#[test]
fn test_set_invalid_field() {
    let mut p = person();
    let obj = Object::from_mut(&mut p);
    let err = obj.field("HahaStreet").set("x").unwrap_err();
    assert_eq!(err, ReflectError::InvalidField(String::from("HahaStreet")));
    assert_eq!(err.to_string(), "Invalid field HahaStreet");
}

#[test]
fn test_set_whole_embedded_struct() {
    let mut p = person();
    {
        let obj = Object::from_mut(&mut p);
        let replacement = Address {
            street: String::from("Obala"),
            number: 1,
        };
        obj.field("address").set(replacement).expect("set address");
        assert_eq!(obj.field("street").get(), Some(Value::from("Obala")));
    }
    assert_eq!(p.address.number, 1);
}

#[test]
fn test_containers_and_renames() {
    let mut t = Tagged::default();
    {
        let obj = Object::from_mut(&mut t);
        assert_eq!(names(&obj.fields()), ["Id", "labels", "parent"]);
        assert!(!obj.field("id").is_valid());

        obj.field("Id").set(9u8).expect("set id");
        obj.field("labels").set(vec!["a", "b"]).expect("set labels");
        obj.field("parent").set(Some(4u32)).expect("set parent");
        assert_eq!(obj.field("labels").kind(), Kind::List);
        assert_eq!(obj.field("parent").kind(), Kind::Option);
        assert_eq!(
            obj.field("parent").ty().map(|ty| ty.to_string()),
            Some(String::from("Option<u32>"))
        );
    }
    assert_eq!(
        t,
        Tagged {
            id: 9,
            labels: vec![String::from("a"), String::from("b")],
            parent: Some(4),
        }
    );

    let obj = Object::from_mut(&mut t);
    obj.field("parent").set(Value::Nil).expect("clear parent");
    assert_eq!(obj.field("parent").get(), Some(Value::Option(None)));
}
