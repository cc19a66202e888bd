use std::fmt;
use std::sync::Arc;

use super::cancel::CancellationToken;
use super::descriptor::EditDescriptor;
use super::error::FixError;
use super::violation::Violation;
use crate::adapters::ProgramModelAdapter;
use crate::fixers::DescriptorBuilder;
use crate::model::{Document, TextSpan};

/// Position of an action in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixId(pub usize);

impl fmt::Display for FixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target overlaps a span already claimed by an earlier fix.
    Overlap { claimed: TextSpan },
    /// The violation no longer holds once earlier fixes were applied.
    Invalidated,
    Canceled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Overlap { claimed } => write!(f, "overlaps the fix at {}", claimed),
            SkipReason::Invalidated => write!(f, "no longer applies"),
            SkipReason::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixState {
    Registered,
    Realized,
    Skipped(SkipReason),
    Failed(String),
}

impl fmt::Display for FixState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixState::Registered => write!(f, "registered"),
            FixState::Realized => write!(f, "realized"),
            FixState::Skipped(reason) => write!(f, "skipped ({})", reason),
            FixState::Failed(error) => write!(f, "failed ({})", error),
        }
    }
}

/// One offered fix: the descriptor that resolves a violation, and the builder
/// that produced it so the descriptor can be rebuilt against a later snapshot.
pub struct FixAction {
    id: FixId,
    title: String,
    violation: Violation,
    descriptor: EditDescriptor,
    builder: Arc<dyn DescriptorBuilder>,
    state: FixState,
}

impl fmt::Debug for FixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("violation", &self.violation)
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .finish()
    }
}

impl FixAction {
    pub fn new(
        id: FixId,
        title: impl Into<String>,
        violation: Violation,
        descriptor: EditDescriptor,
        builder: Arc<dyn DescriptorBuilder>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            violation,
            descriptor,
            builder,
            state: FixState::Registered,
        }
    }

    pub fn id(&self) -> FixId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn violation(&self) -> &Violation {
        &self.violation
    }

    pub fn descriptor(&self) -> &EditDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> &FixState {
        &self.state
    }

    /// Produces the snapshot with this fix applied. Runs at most once: a
    /// successful call moves the action to `Realized`, an error other than
    /// cancellation to `Failed`.
    pub async fn realize(
        &mut self,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
        token: &CancellationToken,
    ) -> Result<Document, FixError> {
        if self.state != FixState::Registered {
            return Err(FixError::InvalidState(self.state.to_string()));
        }
        match self.materialize(document, adapter, token).await {
            Ok(fixed) => {
                self.state = FixState::Realized;
                Ok(fixed)
            }
            Err(FixError::Canceled) => Err(FixError::Canceled),
            Err(e) => {
                self.state = FixState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn materialize(
        &self,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
        token: &CancellationToken,
    ) -> Result<Document, FixError> {
        token.check()?;
        let target_ref = self.descriptor.target();
        let target = document
            .root()
            .find(target_ref)
            .ok_or_else(|| FixError::Location {
                document: document.id().clone(),
                span: target_ref.span,
            })?;

        match &self.descriptor {
            EditDescriptor::AddMember { member, .. } => {
                let syntax = adapter.synthesize_member(member).await?;
                token.check()?;
                adapter.add_member(document, target, syntax).await
            }
            EditDescriptor::ReplaceNode { replacement, .. } => {
                let syntax = adapter.synthesize_expression(replacement).await?;
                token.check()?;
                adapter.replace_node(document, target, syntax).await
            }
            EditDescriptor::InsertStatement { statement, .. } => {
                let syntax = adapter.synthesize_statement(statement).await?;
                token.check()?;
                adapter.insert_statement(document, target, syntax).await
            }
            EditDescriptor::RemoveNode { .. } => adapter.remove_node(document, target).await,
        }
    }

    /// Rebuilds the descriptor for the violation observed at `span` of
    /// `document`. Returns false when the rule no longer applies there.
    pub(crate) async fn rebase(
        &mut self,
        span: TextSpan,
        document: &Document,
        adapter: &dyn ProgramModelAdapter,
    ) -> bool {
        let violation = self.violation.at(span);
        match self.builder.build(&violation, document, adapter).await {
            Some(descriptor) if adapter.supports(&descriptor) => {
                self.descriptor = descriptor;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn skip(&mut self, reason: SkipReason) {
        self.state = FixState::Skipped(reason);
    }
}
