use async_trait::async_trait;

use super::traits::{declaration_at, DescriptorBuilder};
use crate::adapters::ProgramModelAdapter;
use crate::core::descriptor::{EditDescriptor, StatementDescriptor};
use crate::core::violation::Violation;
use crate::model::{Document, NodeKind, NodeRef};

/// CA1062: guards a reference parameter against null at the top of the body.
pub struct ValidateArgumentsFixer;

#[async_trait]
impl DescriptorBuilder for ValidateArgumentsFixer {
    fn handles(&self) -> &[&str] {
        &["CA1062"]
    }

    fn title(&self) -> &str {
        "Validate arguments of public methods"
    }

    async fn build(
        &self,
        violation: &Violation,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> Option<EditDescriptor> {
        let parameter = violation.property("parameter")?;
        let owner = declaration_at(violation, document, adapter).await?;
        if !owner.kind.has_body() {
            return None;
        }
        let declared = owner
            .parameters
            .iter()
            .find(|p| adapter.names_equal(&p.name, parameter))?;

        let guarded = owner.children.iter().any(|child| {
            child.kind == NodeKind::Statement
                && child
                    .name()
                    .is_some_and(|name| adapter.names_equal(name, &declared.name))
        });
        if guarded {
            return None;
        }

        Some(EditDescriptor::InsertStatement {
            body_owner: NodeRef::of(&owner),
            statement: StatementDescriptor::ThrowIfNull {
                parameter: declared.name.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{csharp_adapter, csharp_document, span_of};
    use crate::model::DocumentId;

    fn violation(document: &Document, parameter: &str) -> Violation {
        Violation::new(
            "CA1062",
            DocumentId::from("docA"),
            span_of(document, "object value"),
        )
        .with_property("parameter", parameter)
    }

    #[tokio::test]
    async fn test_guards_declared_parameter() {
        let document = csharp_document();
        let descriptor = ValidateArgumentsFixer
            .build(&violation(&document, "value"), &document, csharp_adapter().as_ref())
            .await;
        match descriptor {
            Some(EditDescriptor::InsertStatement { body_owner, statement }) => {
                assert_eq!(body_owner.kind, NodeKind::Method);
                assert_eq!(
                    statement,
                    StatementDescriptor::ThrowIfNull {
                        parameter: "value".to_string()
                    }
                );
            }
            other => panic!("unexpected descriptor {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_parameter_is_not_offered() {
        let document = csharp_document();
        let descriptor = ValidateArgumentsFixer
            .build(&violation(&document, "missing"), &document, csharp_adapter().as_ref())
            .await;
        assert!(descriptor.is_none());
    }

    #[tokio::test]
    async fn test_already_guarded_is_not_offered() {
        let document = csharp_document();
        let adapter = csharp_adapter();
        let violation = violation(&document, "value");
        let descriptor = ValidateArgumentsFixer
            .build(&violation, &document, adapter.as_ref())
            .await
            .unwrap();

        let guarded = match &descriptor {
            EditDescriptor::InsertStatement { body_owner, statement } => {
                let owner = document.root().find(*body_owner).unwrap();
                let syntax = adapter.synthesize_statement(statement).await.unwrap();
                adapter.insert_statement(&document, owner, syntax).await.unwrap()
            }
            other => panic!("unexpected descriptor {:?}", other),
        };
        let again = ValidateArgumentsFixer
            .build(&violation, &guarded, adapter.as_ref())
            .await;
        assert!(again.is_none());
    }
}
