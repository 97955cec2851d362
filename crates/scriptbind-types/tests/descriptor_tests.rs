use scriptbind_types::{
    is_identity_method, BeanDescriptor, ContextTypeDescriptor, InterfaceDescriptor,
    MethodDescriptor, ParamDescriptor, PrimitiveKind, QualifiedName, TypeDescriptor,
};
use std::collections::BTreeSet;

fn int_param(name: &str) -> ParamDescriptor {
    ParamDescriptor::new(name, TypeDescriptor::Primitive(PrimitiveKind::I32), "i32")
}

fn calculator() -> InterfaceDescriptor {
    let int = TypeDescriptor::Primitive(PrimitiveKind::I32);
    InterfaceDescriptor {
        name: QualifiedName::parse("app::scripts::Calculator").unwrap(),
        methods: vec![
            MethodDescriptor::new("add", vec![int_param("a"), int_param("b")], int.clone()),
            MethodDescriptor::new("helper", vec![], int.clone()),
            MethodDescriptor::new("to_string", vec![], TypeDescriptor::Text),
            MethodDescriptor::new("eq", vec![int_param("other")], int),
        ],
        context: Some(ContextTypeDescriptor {
            name: QualifiedName::parse("app::scripts::CalculatorContext").unwrap(),
            methods: vec![
                MethodDescriptor::new("log", vec![], TypeDescriptor::Void),
                MethodDescriptor::new("helper", vec![], TypeDescriptor::Void),
                MethodDescriptor::new("hash", vec![], TypeDescriptor::Void),
            ],
        }),
        script_location: None,
        excluded: BTreeSet::from(["helper".to_string()]),
        proxy: "CalculatorProxy".to_string(),
    }
}

#[test]
fn test_identity_methods() {
    for name in ["eq", "ne", "hash", "fmt", "to_string", "type_id"] {
        assert!(is_identity_method(name), "{name} should be an identity method");
    }
    assert!(!is_identity_method("add"));
    assert!(!is_identity_method("equals"));
}

#[test]
fn test_exposed_methods_skip_excluded_and_identity() {
    let iface = calculator();
    let exposed: Vec<_> = iface.exposed_methods().map(|m| m.name.as_str()).collect();
    assert_eq!(exposed, vec!["add"]);

    let excluded: Vec<_> = iface.excluded_methods().map(|m| m.name.as_str()).collect();
    assert_eq!(excluded, vec!["helper"]);
}

#[test]
fn test_builtins_apply_the_same_policy() {
    let iface = calculator();
    let builtins: Vec<_> = iface.builtins().map(|m| m.name.as_str()).collect();
    assert_eq!(builtins, vec!["log"]);
}

#[test]
fn test_bean_first_property_wins() {
    let mut bean = BeanDescriptor::new(QualifiedName::parse("app::model::Person").unwrap());
    assert!(bean.push_property("name", TypeDescriptor::Text));
    assert!(!bean.push_property("name", TypeDescriptor::Unknown));
    assert_eq!(bean.properties.len(), 1);
    assert_eq!(bean.properties[0].ty, TypeDescriptor::Text);
}

#[test]
fn test_descriptor_json_shape() {
    let iface = calculator();
    let json = serde_json::to_value(&iface).unwrap();
    assert_eq!(json["name"], "app::scripts::Calculator");
    assert_eq!(json["methods"][0]["params"][0]["ty"]["kind"], "primitive");
    assert_eq!(json["methods"][0]["params"][0]["ty"]["of"], "i32");
    assert_eq!(json["methods"][0]["receiver"], "ref");

    let back: InterfaceDescriptor = serde_json::from_value(json).unwrap();
    assert_eq!(back, iface);
}
