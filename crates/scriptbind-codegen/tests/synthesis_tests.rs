//! End-to-end scenarios on in-memory sources: extraction, factory/adapter
//! synthesis and declaration emission.

use std::sync::Arc;

use scriptbind_codegen::{
    emit_declaration, generate_interface, synthesize_adapter, synthesize_factory, ArtifactKind,
    BeanPolicy, BuiltinsOrder, GenerateError, GeneratedArtifact, GeneratorOptions, InterfaceConfig,
    InterfacePlan, SourceIndex, TypeMapper,
};
use scriptbind_codegen::extract::bean_catalog;
use scriptbind_types::{IDENTITY_METHODS, InterfaceDescriptor};

const CALCULATOR: &str = r#"
pub trait Calculator {
    fn add(&self, a: i32, b: i32) -> i32;
    fn multiply(&self, a: i32, b: i32) -> i32;
    fn divide(&self, a: f64, b: f64) -> f64;
}
"#;

const PEOPLE: &str = r#"
use std::fmt;

pub struct Address {
    street: String,
}

impl Address {
    pub fn get_street(&self) -> &str { &self.street }
}

pub struct Person {
    name: String,
    address: Address,
}

impl Person {
    pub fn get_name(&self) -> &str { &self.name }
    pub fn get_address(&self) -> &Address { &self.address }
    pub fn is_verified(&self) -> bool { true }
}

pub trait PersonService {
    fn describe(&self, person: &Person) -> String;
    fn rank(&self, people: Vec<Person>) -> Vec<String>;
    fn internal_hook(&self) -> u32 { 0 }
    fn to_string(&self) -> String { String::new() }
}

pub struct PersonContext;

impl PersonContext {
    pub fn new() -> Self { PersonContext }
    pub fn validate_person(&self, person: &Person) -> bool { true }
    pub fn format_address(&self, person: &Person) -> String { String::new() }
    pub fn internal_hook(&self) -> u32 { 0 }
    fn private_helper(&self) {}
}

impl PartialEq for PersonContext {
    fn eq(&self, _other: &Self) -> bool { true }
}

impl fmt::Debug for PersonContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Ok(()) }
}
"#;

fn plan(index: &SourceIndex, config: InterfaceConfig) -> InterfacePlan {
    InterfacePlan {
        crate_name: index.crate_name().to_string(),
        interface: index.extract_interface(&config).unwrap(),
        catalog: Arc::new(bean_catalog(index)),
    }
}

fn calculator_index() -> SourceIndex {
    SourceIndex::from_sources("app", [("app", "pub mod scripts;"), ("app::scripts", CALCULATOR)])
        .unwrap()
}

fn people_index() -> SourceIndex {
    SourceIndex::from_sources("app", [("app", "pub mod service;"), ("app::service", PEOPLE)])
        .unwrap()
}

fn people_config() -> InterfaceConfig {
    InterfaceConfig {
        context: Some("app::service::PersonContext".to_string()),
        location: Some("people.js".to_string()),
        excluded: vec!["internal_hook".to_string()],
        ..InterfaceConfig::new("app::service::PersonService")
    }
}

fn find(artifacts: &[GeneratedArtifact], kind: ArtifactKind) -> Option<&GeneratedArtifact> {
    artifacts.iter().find(|a| a.kind == kind)
}

/// Generated source re-spelled as tokens, independent of formatting
fn tokens(source: &str) -> String {
    let file = syn::parse_file(source).unwrap();
    quote::quote!(#file).to_string()
}

fn assert_valid_rust(source: &str) {
    if let Err(e) = syn::parse_file(source) {
        panic!("generated source does not parse: {e}\n{source}");
    }
}

#[test]
fn test_scenario_a_factory_only() {
    let index = calculator_index();
    let plan = plan(&index, InterfaceConfig::new("app::scripts::Calculator"));
    let artifacts = generate_interface(&plan, &GeneratorOptions::default()).unwrap();

    assert_eq!(artifacts.len(), 1);
    let factory = &artifacts[0];
    assert_eq!(factory.kind, ArtifactKind::FactorySource);
    assert_eq!(factory.target, "calculator_factory.rs");
    assert_valid_rust(&factory.contents);

    assert!(factory
        .contents
        .starts_with("// @generated by scriptbind from app::scripts::Calculator. Do not edit.\n"));
    let file = syn::parse_file(&factory.contents).unwrap();
    let impl_block = file
        .items
        .iter()
        .find_map(|item| match item {
            syn::Item::Impl(block) => Some(block),
            _ => None,
        })
        .unwrap();
    let functions: Vec<String> = impl_block
        .items
        .iter()
        .filter_map(|item| match item {
            syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(functions, vec!["create"]);
    let factory = tokens(&factory.contents);
    assert!(factory.contains("CalculatorProxy :: new (script_library)"));
    assert!(factory.contains("type Context = ()"));
}

#[test]
fn test_scenario_b_adapter_forwards_each_method() {
    let index = calculator_index();
    let config = InterfaceConfig {
        location: Some("calculator.js".to_string()),
        ..InterfaceConfig::new("app::scripts::Calculator")
    };
    let plan = plan(&index, config);
    let artifacts = generate_interface(&plan, &GeneratorOptions::default()).unwrap();

    let targets: Vec<&str> = artifacts.iter().map(|a| a.target.as_str()).collect();
    assert_eq!(targets, vec!["calculator_factory.rs", "calculator_adapter.rs"]);

    let adapter = find(&artifacts, ArtifactKind::AdapterSource).unwrap();
    assert_valid_rust(&adapter.contents);
    assert!(adapter.contents.contains("\"calculator.js\""));

    let file = syn::parse_file(&adapter.contents).unwrap();
    let forwarded: Vec<syn::ImplItemFn> = file
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Impl(block) if block.trait_.is_some() => Some(block),
            _ => None,
        })
        .flat_map(|block| block.items.iter())
        .filter_map(|item| match item {
            syn::ImplItem::Fn(f) => Some(f.clone()),
            _ => None,
        })
        .collect();

    let names: Vec<String> = forwarded.iter().map(|f| f.sig.ident.to_string()).collect();
    assert_eq!(names, vec!["add", "multiply", "divide"]);

    for method in &forwarded {
        let body = quote::quote!(#method).to_string();
        assert_eq!(body.matches("create_delegate").count(), 1, "{body}");
        assert_eq!(body.matches("drop (__scriptbind_delegate)").count(), 1, "{body}");
        let call = format!("__scriptbind_delegate . {} (a , b)", method.sig.ident);
        assert!(body.contains(&call), "{body}");
    }
}

#[test]
fn test_scenario_c_declaration_with_beans() {
    let index = people_index();
    let plan = plan(&index, people_config());
    let artifacts = generate_interface(&plan, &GeneratorOptions::default()).unwrap();

    let declaration = find(&artifacts, ArtifactKind::DeclarationFile).unwrap();
    assert_eq!(declaration.target, "PersonService_Builtins.d.ts");
    let text = &declaration.contents;

    assert!(text.contains("export function validate_person(person: Person): boolean;\n"));
    assert!(text.contains("export function format_address(person: Person): string;\n"));
    assert!(text.contains(
        "export interface PersonService {\n    describe(person: Person): string;\n    rank(people: Person[]): string[];\n}\n"
    ));
    assert!(text.contains(
        "export interface Person {\n    name: string;\n    address: any;\n    verified: boolean;\n}\n"
    ));
    // Address is only reachable through Person, so it is never declared
    assert!(!text.contains("export interface Address"));

    let module = find(&artifacts, ArtifactKind::BuiltinsModule).unwrap();
    assert_eq!(module.target, "PersonService_Builtins.mjs");
    assert!(module.contents.contains(
        "export function validate_person(person) {\n    return PersonService_Builtins.validate_person(person);\n}\n"
    ));
}

#[test]
fn test_lexicographic_builtins_order() {
    let index = people_index();
    let plan = plan(&index, people_config());

    let emit = |order| {
        let mut mapper = TypeMapper::new(&plan.interface.name, BeanPolicy::default());
        emit_declaration(&plan.interface, &plan.catalog, &mut mapper, order)
            .unwrap()
            .unwrap()
    };

    let names = |file: &scriptbind_codegen::DeclarationFile| -> Vec<String> {
        file.builtins.iter().map(|f| f.name.clone()).collect()
    };
    let declared = emit(BuiltinsOrder::Declaration);
    assert_eq!(names(&declared), vec!["validate_person", "format_address"]);

    let sorted = emit(BuiltinsOrder::Lexicographic);
    assert_eq!(names(&sorted), vec!["format_address", "validate_person"]);
    let text = sorted.to_string();
    let format_at = text.find("export function format_address(").unwrap();
    let validate_at = text.find("export function validate_person(").unwrap();
    assert!(format_at < validate_at, "{text}");
    // the contract keeps trait order
    assert!(text.contains("    describe(person: Person): string;\n    rank(people: Person[]): string[];\n"));
}

#[test]
fn test_excluded_and_identity_methods_never_generated() {
    let index = people_index();
    let plan = plan(&index, people_config());
    let artifacts = generate_interface(&plan, &GeneratorOptions::default()).unwrap();
    assert_eq!(artifacts.len(), 4);

    for artifact in &artifacts {
        assert!(
            !artifact.contents.contains("internal_hook"),
            "{} leaks an excluded method",
            artifact.target
        );
        for identity in IDENTITY_METHODS {
            let as_call = format!("{identity}(");
            let as_tokens = format!("fn {identity} (");
            assert!(
                !artifact.contents.contains(&as_call) && !artifact.contents.contains(&as_tokens),
                "{} leaks identity method {identity}",
                artifact.target
            );
        }
    }
    assert!(!artifacts.iter().any(|a| a.contents.contains("private_helper")));
}

#[test]
fn test_no_declaration_without_context() {
    let index = people_index();
    let config = InterfaceConfig {
        context: None,
        ..people_config()
    };
    let artifacts = generate_interface(&plan(&index, config), &GeneratorOptions::default()).unwrap();
    assert!(find(&artifacts, ArtifactKind::DeclarationFile).is_none());
    assert!(find(&artifacts, ArtifactKind::BuiltinsModule).is_none());
    assert!(find(&artifacts, ArtifactKind::AdapterSource).is_some());
}

#[test]
fn test_context_factory_and_adapter_share_context() {
    let index = people_index();
    let plan = plan(&index, people_config());

    let factory = synthesize_factory(&plan.interface, "app").unwrap();
    assert_valid_rust(&factory);
    let factory = tokens(&factory);
    assert!(factory.contains("type Context = :: std :: sync :: Arc < crate :: service :: PersonContext >"));
    assert!(factory.contains("PersonServiceProxy :: new (script_library , context)"));

    let adapter = synthesize_adapter(&plan.interface, "app").unwrap().unwrap();
    assert_valid_rust(&adapter);
    let adapter = tokens(&adapter);
    assert!(adapter.contains("context : :: std :: sync :: Arc < crate :: service :: PersonContext >"));
    assert!(adapter.contains(":: std :: sync :: Arc :: clone (& self . context)"));
}

#[test]
fn test_signatures_copied_verbatim() {
    let index = SourceIndex::from_sources(
        "app",
        [(
            "app",
            r#"
            pub struct LoadError;
            pub trait Loader {
                async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
                fn reset(&mut self);
                fn convert<T: Into<String>>(&self, value: T) -> String where T: Clone;
                fn finish(self) -> u32;
                fn pair(&self, (left, right): (u8, u8)) -> u16;
            }
            "#,
        )],
    )
    .unwrap();
    let config = InterfaceConfig {
        location: Some("loader.js".to_string()),
        ..InterfaceConfig::new("app::Loader")
    };
    let interface: InterfaceDescriptor = index.extract_interface(&config).unwrap();
    let adapter = synthesize_adapter(&interface, "app").unwrap().unwrap();
    assert_valid_rust(&adapter);
    let adapter = tokens(&adapter);

    assert!(adapter.contains("async fn fetch (& self , url : & str) -> Result < Vec < u8 > , LoadError >"));
    assert!(adapter.contains("__scriptbind_delegate . fetch (url) . await"));
    assert!(adapter.contains("fn reset (& mut self)"));
    assert!(adapter.contains("let mut __scriptbind_delegate = self . create_delegate ()"));
    assert!(adapter.contains("fn convert < T : Into < String > > (& self , value : T) -> String where T : Clone"));
    assert!(adapter.contains("fn pair (& self , arg0 : (u8 , u8)) -> u16"));

    // a by-value call consumes the delegate
    let finish = adapter.split("fn finish").nth(1).unwrap();
    let finish = finish.split("fn ").next().unwrap();
    assert!(!finish.contains("drop (__scriptbind_delegate)"));
}

#[test]
fn test_parameters_named_like_locals_are_forwarded() {
    let index = SourceIndex::from_sources(
        "app",
        [(
            "app",
            "pub trait Router { fn route(&self, delegate: String, result: u8) -> String; }",
        )],
    )
    .unwrap();
    let config = InterfaceConfig {
        location: Some("router.js".to_string()),
        ..InterfaceConfig::new("app::Router")
    };
    let interface = index.extract_interface(&config).unwrap();
    let adapter = synthesize_adapter(&interface, "app").unwrap().unwrap();
    assert_valid_rust(&adapter);

    let adapter = tokens(&adapter);
    assert!(adapter.contains("fn route (& self , delegate : String , result : u8) -> String"));
    assert!(adapter.contains("__scriptbind_delegate . route (delegate , result)"));
    assert!(!adapter.contains("let delegate"));
    assert!(!adapter.contains("let result"));
}

#[test]
fn test_generated_sources_are_formatted() {
    let index = calculator_index();
    let config = InterfaceConfig {
        location: Some("calculator.js".to_string()),
        ..InterfaceConfig::new("app::scripts::Calculator")
    };
    let interface = index.extract_interface(&config).unwrap();
    let adapter = synthesize_adapter(&interface, "app").unwrap().unwrap();

    assert!(adapter.lines().count() > 20, "{adapter}");
    assert!(adapter.contains("\n    fn add(&self, a: i32, b: i32) -> i32 {\n"), "{adapter}");
    assert!(adapter.contains("pub struct CalculatorAdapter;\n"));
}

#[test]
fn test_associated_function_cannot_be_forwarded() {
    let index = SourceIndex::from_sources(
        "app",
        [("app", "pub trait Maker { fn make() -> u32; }")],
    )
    .unwrap();
    let config = InterfaceConfig {
        location: Some("maker.js".to_string()),
        ..InterfaceConfig::new("app::Maker")
    };
    let interface = index.extract_interface(&config).unwrap();
    assert!(matches!(
        synthesize_adapter(&interface, "app"),
        Err(GenerateError::MissingReceiver { ref method, .. }) if method == "make"
    ));
}

#[test]
fn test_bean_name_collision_fails_the_interface() {
    let index = SourceIndex::from_sources(
        "app",
        [
            ("app", "pub mod svc;"),
            (
                "app::svc",
                r#"
                pub mod a { pub struct Item; }
                pub mod b { pub struct Item; }
                pub trait Merge { fn merge(&self, left: a::Item) -> b::Item; }
                pub struct MergeContext;
                impl MergeContext { pub fn log(&self, line: &str) {} }
                "#,
            ),
        ],
    )
    .unwrap();
    let config = InterfaceConfig {
        context: Some("app::svc::MergeContext".to_string()),
        ..InterfaceConfig::new("app::svc::Merge")
    };
    let err = generate_interface(&plan(&index, config), &GeneratorOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GenerateError::BeanNameCollision {
            interface: "app::svc::Merge".to_string(),
            name: "Item".to_string(),
            first: "app::svc::a::Item".to_string(),
            second: "app::svc::b::Item".to_string(),
        }
    );
}
