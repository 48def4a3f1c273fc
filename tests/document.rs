use binml::{AttributeError, DateTime, Document, Element, LookupError, Value};

#[test]
fn create_and_lookup_root_elements() {
    let mut document = Document::new();
    document.create_element("Settings");
    document.create_element("Profiles");

    assert_eq!(document.get_elements().len(), 2);
    assert_eq!(document.element("Settings").unwrap().get_name(), "Settings");
    assert_eq!(document.element("Profiles").unwrap().get_name(), "Profiles");

    let missing = document.element("Missing").unwrap_err();
    assert!(matches!(missing, LookupError::ElementNotFound(name) if name == "Missing"));
}

#[test]
fn create_and_lookup_children() {
    let mut document = Document::new();
    let root = document.create_element("Root");
    root.create_child("First");
    root.create_child("Second").create_child("Grandchild");

    let root = document.element("Root").unwrap();
    assert_eq!(root.get_children().len(), 2);
    assert_eq!(root.child("Second").unwrap().child("Grandchild").unwrap().get_name(), "Grandchild");

    let missing = root.child("Third").unwrap_err();
    assert!(matches!(missing, LookupError::ChildNotFound(name) if name == "Third"));
}

#[test]
fn attributes_keep_insertion_order_and_duplicates() {
    let mut element = Element::named("E");
    element.add_attribute("first", 1i32);
    element.add_attribute("dup", "one");
    element.add_attribute("dup", "two");

    let names: Vec<&str> = element.get_attributes().iter().map(|attribute| attribute.get_name()).collect();
    assert_eq!(names, ["first", "dup", "dup"]);

    // Lookups return the first match.
    let value: &String = element.attribute("dup").unwrap().get().unwrap();
    assert_eq!(value, "one");
}

#[test]
fn attribute_lookup_miss() {
    let element = Element::named("E");
    let missing = element.attribute("x").unwrap_err();
    assert!(matches!(missing, LookupError::AttributeNotFound(name) if name == "x"));
}

#[test]
fn typed_value_access() {
    let mut element = Element::named("E");
    element.add_attribute("count", 7u32);
    element.add_attribute("label", "hello");

    assert_eq!(element.get_value::<u32>("count"), Some(&7));
    assert_eq!(element.get_value::<String>("label").map(String::as_str), Some("hello"));

    // Wrong type is a mismatch, not a panic.
    let mismatch = element.attribute("count").unwrap().get::<String>().unwrap_err();
    assert!(matches!(mismatch, AttributeError::TypeMismatch { .. }));
    assert_eq!(element.get_value::<i64>("count"), None);
}

#[test]
fn date_time_naive_conversions() {
    let timestamp = DateTime {
        year: 2024,
        month: 2,
        day: 29,
        hour: 6,
        minute: 30,
        second: 0,
    };

    let naive = timestamp.to_naive().unwrap();
    assert_eq!(DateTime::from_naive(naive), timestamp);
    assert_eq!(timestamp.to_string(), "2024-02-29T06:30:00Z");

    // February 30th is not a real date.
    let invalid = DateTime {
        year: 2024,
        month: 2,
        day: 30,
        ..timestamp
    };
    assert_eq!(invalid.to_naive(), None);
}

#[test]
fn mutation_through_lookups() {
    let mut document = Document::new();
    document.create_element("Root").create_child("Kid");

    document
        .element_mut("Root")
        .unwrap()
        .child_mut("Kid")
        .unwrap()
        .add_attribute("seen", Value::Byte(1));

    let kid = document.element("Root").unwrap().child("Kid").unwrap();
    assert_eq!(kid.get_value::<u8>("seen"), Some(&1));
}
