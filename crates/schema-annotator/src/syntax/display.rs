//! Source printer.
//!
//! Mapping and list constructors print without insignificant whitespace so a
//! canonical schema literal parsed into the tree prints back unchanged.

use std::fmt::{self, Display, Formatter, Write};

use super::*;

const INDENT: &str = "    ";

impl Display for ModulePart {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "{import}")?;
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 || !self.imports.is_empty() {
                f.write_char('\n')?;
            }
            writeln!(f, "{member}")?;
        }
        Ok(())
    }
}

impl Display for ImportDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        if let Some(org) = &self.org {
            write!(f, "{org}/")?;
        }
        f.write_str(&self.module())?;
        if let Some(prefix) = &self.prefix {
            write!(f, " as {prefix}")?;
        }
        f.write_char(';')
    }
}

impl Display for ModuleMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(def) => def.fmt(f),
            Self::Function(func) => func.fmt(f),
            Self::Variable(var) => var.fmt(f),
            Self::Other(text) => f.write_str(text),
        }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for line in &self.documentation {
            if line.is_empty() {
                writeln!(f, "#")?;
            } else {
                writeln!(f, "# {line}")?;
            }
        }
        for annotation in &self.annotations {
            writeln!(f, "{annotation}")?;
        }
        Ok(())
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.reference)?;
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

impl Display for NameReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name),
            Self::Qualified { prefix, identifier } => write!(f, "{prefix}:{identifier}"),
        }
    }
}

fn write_qualifiers(f: &mut Formatter<'_>, metadata: &Option<Metadata>, public: bool) -> fmt::Result {
    if let Some(metadata) = metadata {
        metadata.fmt(f)?;
    }
    if public {
        f.write_str("public ")?;
    }
    Ok(())
}

impl Display for TypeDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_qualifiers(f, &self.metadata, self.public)?;
        write!(f, "type {} {};", self.name, self.descriptor)
    }
}

impl Display for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_qualifiers(f, &self.metadata, self.public)?;
        write!(f, "function {}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", param.type_desc, param.name)?;
        }
        f.write_char(')')?;
        if let Some(ret) = &self.return_type {
            write!(f, " returns {ret}")?;
        }
        f.write_str(" {\n")?;
        for stmt in &self.body {
            writeln!(f, "{INDENT}{stmt}")?;
        }
        f.write_char('}')
    }
}

impl Display for ModuleVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_qualifiers(f, &self.metadata, self.public)?;
        if self.is_final {
            f.write_str("final ")?;
        }
        write!(f, "{} {}", self.type_desc, self.name)?;
        if let Some(init) = &self.initializer {
            write!(f, " = {init}")?;
        }
        f.write_char(';')
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local {
                type_desc,
                name,
                initializer,
            } => {
                write!(f, "{type_desc} {name}")?;
                if let Some(init) = initializer {
                    write!(f, " = {init}")?;
                }
                f.write_char(';')
            }
            Self::Expression(expr) => write!(f, "{expr};"),
            Self::Return(None) => f.write_str("return;"),
            Self::Return(Some(expr)) => write!(f, "return {expr};"),
            Self::Other(text) => f.write_str(text),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write_string_literal(f, s),
            Self::Number(n) => f.write_str(n),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Nil => f.write_str("()"),
            Self::Null => f.write_str("null"),
        }
    }
}

fn write_string_literal(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{{{:04X}}}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

impl Display for MappingField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_string_literal(f, &self.key)?;
        write!(f, ":{}", self.value)
    }
}

impl Display for RemoteMethodCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}(", self.expression, self.method_name)?;
        write_separated(f, &self.arguments, ", ")?;
        f.write_char(')')
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => name.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
            Self::Mapping(fields) => {
                f.write_char('{')?;
                write_separated(f, fields, ",")?;
                f.write_char('}')
            }
            Self::List(items) => {
                f.write_char('[')?;
                write_separated(f, items, ",")?;
                f.write_char(']')
            }
            Self::RemoteMethodCall(call) => call.fmt(f),
            Self::FunctionCall { name, arguments } => {
                write!(f, "{name}(")?;
                write_separated(f, arguments, ", ")?;
                f.write_char(')')
            }
            Self::Check(inner) => write!(f, "check {inner}"),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}
