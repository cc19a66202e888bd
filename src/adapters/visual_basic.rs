use regex::Regex;
use std::sync::LazyLock;

use super::grammar::Grammar;
use super::layout;
use crate::core::descriptor::{
    Accessibility, ExceptionKind, ExpressionDescriptor, MemberDescriptor, Modifier, SpecialType,
    StatementDescriptor, TypeRef,
};
use crate::core::error::FixError;
use crate::model::{Language, SyntaxNode};

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*(End[ \t]+(?:Class|Structure|Module|Interface))\b")
        .expect("block end pattern is valid")
});

pub struct VisualBasic;

/// Offset just past the parenthesized groups starting at `at`, such as
/// `(Of T)(x As T)`. Parentheses inside string literals are ignored.
fn close_parameter_lists(source: &str, mut at: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    while bytes.get(at) == Some(&b'(') {
        let mut depth = 0usize;
        let mut quoted = false;
        let mut close = None;
        for (i, &b) in bytes.iter().enumerate().skip(at) {
            match b {
                b'"' => quoted = !quoted,
                b'(' if !quoted => depth += 1,
                b')' if !quoted => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        at = close?;
        while matches!(bytes.get(at), Some(b' ' | b'\t')) {
            at += 1;
        }
    }
    Some(at)
}

/// True when the line ending at `end` continues with ` _`.
fn continues(source: &str, end: usize) -> bool {
    source
        .get(..end)
        .and_then(|line| line.trim_end().strip_suffix('_'))
        .is_some_and(|rest| rest.ends_with([' ', '\t']))
}

fn new_exception(kind: &ExceptionKind) -> String {
    match kind {
        ExceptionKind::NotImplemented => "New System.NotImplementedException()".to_string(),
        ExceptionKind::ArgumentNull { parameter } => {
            format!("New System.ArgumentNullException(NameOf({}))", parameter)
        }
    }
}

/// Keyword and runtime name of a special type. VB has no void type.
fn special_names(ty: SpecialType) -> (&'static str, &'static str) {
    match ty {
        SpecialType::Object | SpecialType::Void => ("Object", "Object"),
        SpecialType::Boolean => ("Boolean", "Boolean"),
        SpecialType::Int32 => ("Integer", "Int32"),
        SpecialType::String => ("String", "String"),
    }
}

fn is_sub(member: &MemberDescriptor) -> bool {
    matches!(
        member.return_type,
        None | Some(TypeRef::Special(SpecialType::Void))
    )
}

impl Grammar for VisualBasic {
    fn language(&self) -> Language {
        Language::VisualBasic
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
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
                let bare = match written.get(..7) {
                    Some(prefix) if prefix.eq_ignore_ascii_case("System.") => &written[7..],
                    _ => written,
                };
                bare.eq_ignore_ascii_case(keyword) || bare.eq_ignore_ascii_case(runtime)
            }
            TypeRef::Named(name) => written.eq_ignore_ascii_case(name),
        }
    }

    fn member_lines(&self, member: &MemberDescriptor, unit: &str) -> Vec<String> {
        let mut header = vec![match member.accessibility {
            Accessibility::Public => "Public",
            Accessibility::Protected => "Protected",
            Accessibility::Internal => "Friend",
            Accessibility::Private => "Private",
        }
        .to_string()];
        if member.has_modifier(Modifier::Static) {
            header.push("Shared".to_string());
        }
        if member.has_modifier(Modifier::Override) {
            header.push("Overrides".to_string());
        }
        let keyword = if is_sub(member) { "Sub" } else { "Function" };
        header.push(keyword.to_string());
        let parameters: Vec<String> = member
            .parameters
            .iter()
            .map(|p| format!("{} As {}", p.name, self.type_name(&p.ty)))
            .collect();
        header.push(format!("{}({})", member.name, parameters.join(", ")));
        if let (false, Some(ty)) = (is_sub(member), &member.return_type) {
            header.push(format!("As {}", self.type_name(ty)));
        }

        let mut lines = vec![header.join(" ")];
        for statement in &member.body {
            for line in self.statement_lines(statement, unit) {
                lines.push(format!("{}{}", unit, line));
            }
        }
        lines.push(format!("End {}", keyword));
        lines
    }

    fn statement_lines(&self, statement: &StatementDescriptor, unit: &str) -> Vec<String> {
        match statement {
            StatementDescriptor::Throw(kind) => vec![format!("Throw {}", new_exception(kind))],
            StatementDescriptor::ThrowIfNull { parameter } => vec![
                format!("If {} Is Nothing Then", parameter),
                format!(
                    "{}Throw {}",
                    unit,
                    new_exception(&ExceptionKind::ArgumentNull {
                        parameter: parameter.clone()
                    })
                ),
                "End If".to_string(),
            ],
        }
    }

    fn expression_text(&self, expression: &ExpressionDescriptor) -> Result<String, FixError> {
        match expression {
            ExpressionDescriptor::IsNullOrEmpty { operand } => {
                Ok(format!("String.IsNullOrEmpty({})", operand))
            }
            ExpressionDescriptor::Throw(_) => Err(FixError::SynthesisUnsupported {
                language: Language::VisualBasic,
                descriptor: "throw-expression",
            }),
        }
    }

    fn members_closer(&self, text: &str, declaration: &SyntaxNode) -> Option<usize> {
        let start = declaration.span.start;
        let source = text.get(start..declaration.span.end)?;
        BLOCK_END
            .captures_iter(source)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| start + m.start())
    }

    fn body_opener_end(&self, text: &str, owner: &SyntaxNode) -> Option<usize> {
        // the body begins on the line after the signature, whose parameter list
        // may wrap over several lines
        let start = owner.span.start;
        let source = text.get(start..owner.span.end)?;
        let first_line = layout::line_end(source, 0);
        let mut end = match source.get(..first_line)?.find('(') {
            Some(open) => layout::line_end(source, close_parameter_lists(source, open)?),
            None => first_line,
        };
        while continues(source, end) && end < source.len() {
            end = layout::line_end(source, end + 1);
        }
        if end >= source.len() {
            return None;
        }
        Some(start + end)
    }
}
