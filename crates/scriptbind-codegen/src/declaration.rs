//! Declaration file emission
//!
//! Declarations are assembled as values ([`DeclarationFile`],
//! [`InterfaceBlock`], [`FunctionSignature`]) and only turned into text by
//! their `Display` impls, so the section order and the signature syntax live
//! in exactly one place.

use std::fmt;

use scriptbind_types::{InterfaceDescriptor, MethodDescriptor, TsType};

use crate::beans::{synthesize_beans, BeanCatalog};
use crate::config::BuiltinsOrder;
use crate::error::GenerateError;
use crate::mapper::TypeMapper;

const GENERATOR: &str = "scriptbind";
const RULE: &str =
    "// =============================================================================";

/// `name(param: Type, ...): ReturnType`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function name
    pub name: String,
    /// Parameters in declared order
    pub params: Vec<(String, TsType)>,
    /// Return type
    pub returns: TsType,
}

/// A member of an interface block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// `name(params): R;`
    Method(FunctionSignature),
    /// `name: T;`
    Property {
        /// Property name
        name: String,
        /// Property type
        ty: TsType,
    },
}

/// `export interface Name { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceBlock {
    /// Interface name
    pub name: String,
    /// Members in order
    pub members: Vec<Member>,
}

/// The full declaration artifact of one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationFile {
    /// Interface simple name
    pub interface: String,
    /// Host functions callable from the script
    pub builtins: Vec<FunctionSignature>,
    /// Functions the script must export
    pub contract: InterfaceBlock,
    /// Bean interfaces, first-encountered order
    pub beans: Vec<InterfaceBlock>,
}

impl FunctionSignature {
    /// Map a method's parameters and return type
    pub fn from_method(method: &MethodDescriptor, mapper: &mut TypeMapper) -> Self {
        let params = method
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let name = if param.name.is_empty() {
                    format!("arg{}", index)
                } else {
                    param.name.clone()
                };
                (name, mapper.map(&param.ty))
            })
            .collect();
        let returns = mapper.map(&method.returns);

        Self {
            name: method.name.clone(),
            params,
            returns,
        }
    }

    fn param_names(&self) -> String {
        self.params
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        write!(f, "): {}", self.returns)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(signature) => write!(f, "{};", signature),
            Member::Property { name, ty } => write!(f, "{}: {};", name, ty),
        }
    }
}

impl fmt::Display for InterfaceBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "export interface {} {{", self.name)?;
        for member in &self.members {
            writeln!(f, "    {}", member)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for DeclarationFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// Generated by {}", GENERATOR)?;
        writeln!(f, "// TypeScript definitions for {}", self.interface)?;
        writeln!(f)?;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "// Context Builtins - Rust methods callable from JavaScript")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        for builtin in &self.builtins {
            writeln!(f, "export function {};", builtin)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "// Script Interface - Functions that must be implemented and exported")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        write!(f, "{}", self.contract)?;

        if !self.beans.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", RULE)?;
            writeln!(f, "// Type Definitions - TypeScript interfaces for Rust beans")?;
            writeln!(f, "{}", RULE)?;
            writeln!(f)?;
            for bean in &self.beans {
                write!(f, "{}", bean)?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl DeclarationFile {
    /// Name of the global object the script runtime exposes builtins under
    pub fn builtins_global(&self) -> String {
        format!("{}_Builtins", self.interface)
    }

    /// ES module re-exporting every builtin from the global builtins object
    pub fn render_builtins_module(&self) -> String {
        let global = self.builtins_global();
        let mut out = String::new();
        out.push_str(&format!("// Generated by {}\n", GENERATOR));
        out.push_str(&format!("// Builtins module for {}\n", self.interface));
        for builtin in &self.builtins {
            let args = builtin.param_names();
            out.push('\n');
            out.push_str(&format!("export function {}({}) {{\n", builtin.name, args));
            out.push_str(&format!("    return {}.{}({});\n", global, builtin.name, args));
            out.push_str("}\n");
        }
        out
    }
}

/// Assemble the declaration file of an interface.
///
/// Returns `Ok(None)` when the interface has no context type. The mapper
/// records beans while the builtins and the contract are mapped; the bean
/// section is rendered from what it recorded.
pub fn emit_declaration(
    interface: &InterfaceDescriptor,
    catalog: &BeanCatalog,
    mapper: &mut TypeMapper,
    order: BuiltinsOrder,
) -> Result<Option<DeclarationFile>, GenerateError> {
    if interface.context.is_none() {
        return Ok(None);
    }

    let mut builtin_methods: Vec<&MethodDescriptor> = interface.builtins().collect();
    if order == BuiltinsOrder::Lexicographic {
        builtin_methods.sort_by(|a, b| a.name.cmp(&b.name));
    }
    let builtins = builtin_methods
        .into_iter()
        .map(|method| FunctionSignature::from_method(method, mapper))
        .collect();

    let contract = InterfaceBlock {
        name: interface.simple_name().to_string(),
        members: interface
            .exposed_methods()
            .map(|method| Member::Method(FunctionSignature::from_method(method, mapper)))
            .collect(),
    };

    let beans = synthesize_beans(&interface.name, catalog, mapper)?;

    Ok(Some(DeclarationFile {
        interface: interface.simple_name().to_string(),
        builtins,
        contract,
        beans,
    }))
}
