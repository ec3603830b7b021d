use promisify::{
    helpers::{
        filter_mapping,
        is_array_of,
        is_plain_object,
        map_mapping,
        try_map_mapping,
    },
    value::{Function, Mapping, Value},
};
use regex::Regex;
use std::cell::Cell;

fn ponies() -> Vec<Value> {
    ["earth pony", "unicorn", "pegasus", "alicorn"]
        .into_iter()
        .map(Value::from)
        .collect()
}

fn numbers() -> Mapping {
    [("one", 1), ("two", 2), ("three", 3)].into_iter().collect()
}

#[test]
fn is_array_of_accepts_matching_elements() {
    assert!(is_array_of(&ponies(), |pony, _, _| pony.is_string()));
}

#[test]
fn is_array_of_rejects_mismatching_element() {
    let elements = vec![Value::from("one"), Value::from(2), Value::from("three")];
    assert!(!is_array_of(&elements, |element, _, _| element.is_string()));
}

#[test]
fn is_array_of_is_vacuously_true() {
    let empty: Vec<Value> = Vec::new();
    assert!(is_array_of(&empty, |_, _, _| false));
}

#[test]
fn is_array_of_stops_at_first_false() {
    let visited = Cell::new(0);
    let elements = [1, 2, 3, 4];
    let passed = is_array_of(&elements, |element, _, _| {
        visited.set(visited.get() + 1);
        *element < 2
    });
    assert!(!passed);
    assert_eq!(visited.get(), 2);
}

#[test]
fn is_array_of_only_stops_on_literal_false() {
    let elements = ponies();
    assert!(is_array_of(&elements, |_, _, _| ()));
    assert!(is_array_of(&elements, |_, _, _| 0));
    assert!(is_array_of(&elements, |_, _, _| ""));
    assert!(is_array_of(&elements, |_, _, _| Value::Null));
    assert!(!is_array_of(&elements, |_, _, _| Value::Bool(false)));
}

#[test]
fn is_array_of_passes_index_and_sequence() {
    let elements = ponies();
    assert!(is_array_of(&elements, |element, index, sequence| {
        sequence.len() == 4 && &sequence[index] == element
    }));
}

#[test]
fn is_plain_object_accepts_mappings() {
    assert!(is_plain_object(&Mapping::new().into()));
    assert!(is_plain_object(&numbers().into()));
}

#[test]
fn is_plain_object_rejects_primitives() {
    assert!(!is_plain_object(&Value::Null));
    assert!(!is_plain_object(&Value::Undefined));
    assert!(!is_plain_object(&Value::from(0)));
    assert!(!is_plain_object(&Value::from(42)));
    assert!(!is_plain_object(&Value::boxed(2319)));
    assert!(!is_plain_object(&Value::from(true)));
    assert!(!is_plain_object(&Value::from("Some whatever string")));
    assert!(!is_plain_object(&Value::boxed("Some whatever string")));
}

#[test]
fn is_plain_object_rejects_arrays_and_regexps() {
    assert!(!is_plain_object(&Value::from(Vec::<Value>::new())));
    assert!(!is_plain_object(&Value::from(vec![1, 2, 3])));
    assert!(!is_plain_object(&Value::from(Regex::new(".*").unwrap())));
}

#[test]
fn is_plain_object_rejects_functions() {
    let function = Function::anonymous(|_, _| Value::Undefined);
    assert!(!is_plain_object(&function.into()));
}

#[test]
fn map_mapping_keeps_keys() {
    let input = numbers();
    let output = map_mapping(&input, |value, key, mapping| {
        assert!(mapping.contains_key(key));
        Value::from(format!("{}={}", key, value))
    });
    assert_eq!(output.keys().collect::<Vec<_>>(), ["one", "two", "three"]);
    assert_eq!(output["two"], Value::from("two=2"));
    assert_eq!(input, numbers());
}

#[test]
fn try_map_mapping_stops_at_first_error() {
    let visited = Cell::new(0);
    let result = try_map_mapping(&numbers(), |value, key, _| {
        visited.set(visited.get() + 1);
        if key == "two" {
            Err(format!("bad {}", key))
        } else {
            Ok(value.clone())
        }
    });
    assert_eq!(result, Err(String::from("bad two")));
    assert_eq!(visited.get(), 2);
}

#[test]
fn filter_mapping_keeps_truthy_entries_in_order() {
    let input: Mapping = [
        ("a", Value::from(1)),
        ("b", Value::from(0)),
        ("c", Value::from("")),
        ("d", Value::from("d")),
        ("e", Value::Null),
    ]
    .into_iter()
    .collect();

    let output = filter_mapping(&input, |value, _, _| value.clone());
    assert_eq!(output.keys().collect::<Vec<_>>(), ["a", "d"]);
    assert_eq!(input.len(), 5);

    let output = filter_mapping(&input, |_, key, _| key != "a");
    assert_eq!(output.keys().collect::<Vec<_>>(), ["b", "c", "d", "e"]);
}
