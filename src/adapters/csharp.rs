use super::grammar::Grammar;
use crate::core::descriptor::{
    Accessibility, ExceptionKind, ExpressionDescriptor, MemberDescriptor, Modifier, SpecialType,
    StatementDescriptor, TypeRef,
};
use crate::core::error::FixError;
use crate::model::{Language, SyntaxNode};

pub struct CSharp;

/// Keyword and runtime name of a special type.
fn special_names(ty: SpecialType) -> (&'static str, &'static str) {
    match ty {
        SpecialType::Object => ("object", "Object"),
        SpecialType::Boolean => ("bool", "Boolean"),
        SpecialType::Int32 => ("int", "Int32"),
        SpecialType::String => ("string", "String"),
        SpecialType::Void => ("void", "Void"),
    }
}

fn new_exception(kind: &ExceptionKind) -> String {
    match kind {
        ExceptionKind::NotImplemented => "new System.NotImplementedException()".to_string(),
        ExceptionKind::ArgumentNull { parameter } => {
            format!("new System.ArgumentNullException(nameof({}))", parameter)
        }
    }
}

impl Grammar for CSharp {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        a == b
    }

    fn type_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Special(special) => special_names(*special).0.to_string(),
            TypeRef::Named(name) => name.clone(),
        }
    }

    fn type_matches(&self, written: &str, ty: &TypeRef) -> bool {
        let written = written.trim();
        match ty {
            TypeRef::Special(special) => {
                let (keyword, runtime) = special_names(*special);
                written == keyword
                    || written == runtime
                    || written.strip_prefix("System.") == Some(runtime)
            }
            TypeRef::Named(name) => written == name,
        }
    }

    fn member_lines(&self, member: &MemberDescriptor, unit: &str) -> Vec<String> {
        let mut header = vec![match member.accessibility {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::Private => "private",
        }
        .to_string()];
        if member.has_modifier(Modifier::Static) {
            header.push("static".to_string());
        }
        if member.has_modifier(Modifier::Override) {
            header.push("override".to_string());
        }
        header.push(match &member.return_type {
            Some(ty) => self.type_name(ty),
            None => "void".to_string(),
        });
        let parameters: Vec<String> = member
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.type_name(&p.ty), p.name))
            .collect();
        header.push(format!("{}({})", member.name, parameters.join(", ")));

        let mut lines = vec![header.join(" "), "{".to_string()];
        for statement in &member.body {
            for line in self.statement_lines(statement, unit) {
                lines.push(format!("{}{}", unit, line));
            }
        }
        lines.push("}".to_string());
        lines
    }

    fn statement_lines(&self, statement: &StatementDescriptor, unit: &str) -> Vec<String> {
        match statement {
            StatementDescriptor::Throw(kind) => vec![format!("throw {};", new_exception(kind))],
            StatementDescriptor::ThrowIfNull { parameter } => vec![
                format!("if ({} == null)", parameter),
                "{".to_string(),
                format!(
                    "{}throw {};",
                    unit,
                    new_exception(&ExceptionKind::ArgumentNull {
                        parameter: parameter.clone()
                    })
                ),
                "}".to_string(),
            ],
        }
    }

    fn expression_text(&self, expression: &ExpressionDescriptor) -> Result<String, FixError> {
        Ok(match expression {
            ExpressionDescriptor::IsNullOrEmpty { operand } => {
                format!("string.IsNullOrEmpty({})", operand)
            }
            ExpressionDescriptor::Throw(kind) => format!("throw {}", new_exception(kind)),
        })
    }

    fn members_closer(&self, text: &str, declaration: &SyntaxNode) -> Option<usize> {
        let start = declaration.span.start;
        text.get(start..declaration.span.end)?
            .rfind('}')
            .map(|i| start + i)
    }

    fn body_opener_end(&self, text: &str, owner: &SyntaxNode) -> Option<usize> {
        let start = owner.span.start;
        let source = text.get(start..owner.span.end)?;
        let signature_end = source.find(')')?;
        let rest = &source[signature_end..];
        let brace = rest.find('{')?;
        // expression-bodied members have no block to insert into
        if rest.find("=>").is_some_and(|arrow| arrow < brace) {
            return None;
        }
        Some(start + signature_end + brace + 1)
    }
}
