use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use super::action::{FixAction, FixId};
use super::aggregator::{AggregateResult, BatchAggregator};
use super::cancel::CancellationToken;
use super::error::FixError;
use super::violation::Violation;
use crate::adapters::{AdapterRegistry, ProgramModelAdapter};
use crate::fixers::{DescriptorBuilder, FixerRegistry};
use crate::model::{Document, DocumentId};

/// Host-facing entry point: holds the committed snapshots and the fixes
/// registered against them.
pub struct FixEngine {
    adapters: Arc<AdapterRegistry>,
    fixers: Arc<FixerRegistry>,
    documents: BTreeMap<DocumentId, Document>,
    pending: BTreeMap<DocumentId, Vec<FixAction>>,
    next_id: usize,
}

impl FixEngine {
    pub fn new(adapters: AdapterRegistry, fixers: FixerRegistry) -> Self {
        Self {
            adapters: Arc::new(adapters),
            fixers: Arc::new(fixers),
            documents: BTreeMap::new(),
            pending: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Commits `document` as the current snapshot for its id. Fixes registered
    /// against a replaced snapshot are dropped.
    pub fn open(&mut self, document: Document) -> Option<Document> {
        let id = document.id().clone();
        if let Some(stale) = self.pending.remove(&id) {
            if !stale.is_empty() {
                log::warn!("dropping {} pending fix(es) for reopened {}", stale.len(), id);
            }
        }
        self.documents.insert(id, document)
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn pending(&self, id: &DocumentId) -> &[FixAction] {
        self.pending.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn snapshot(
        &self,
        id: &DocumentId,
    ) -> Result<(&Document, Arc<dyn ProgramModelAdapter>), FixError> {
        let document = self
            .documents
            .get(id)
            .ok_or_else(|| FixError::UnknownDocument(id.clone()))?;
        let adapter = self.adapters.find_adapter(document.language())?;
        Ok((document, adapter))
    }

    /// Registers a fix built by `builder`. Returns `None` when the builder
    /// offers nothing here or the document's syntax cannot express the edit.
    pub async fn register_fix(
        &mut self,
        violation: Violation,
        title: impl Into<String>,
        builder: Arc<dyn DescriptorBuilder>,
    ) -> Result<Option<FixId>, FixError> {
        let (document, adapter) = self.snapshot(&violation.document)?;
        let descriptor = match builder.build(&violation, document, adapter.as_ref()).await {
            Some(descriptor) => descriptor,
            None => {
                log::debug!("{} at {}: no fix offered", violation.rule, violation.span);
                return Ok(None);
            }
        };
        if !adapter.supports(&descriptor) {
            log::debug!(
                "{} at {}: {} cannot express a {} edit",
                violation.rule,
                violation.span,
                adapter.language(),
                descriptor.kind_name()
            );
            return Ok(None);
        }

        let id = FixId(self.next_id);
        self.next_id += 1;
        log::info!(
            "registered fix {} for {} at {} in {}",
            id,
            violation.rule,
            violation.span,
            violation.document
        );
        self.pending
            .entry(violation.document.clone())
            .or_default()
            .push(FixAction::new(id, title, violation, descriptor, builder));
        Ok(Some(id))
    }

    /// Registers the fix of whichever builder handles the violation's rule.
    pub async fn register(&mut self, violation: Violation) -> Result<Option<FixId>, FixError> {
        let builder = match self.fixers.find_fixer(&violation.rule) {
            Some(builder) => builder,
            None => {
                log::debug!("no fixer handles {}", violation.rule);
                return Ok(None);
            }
        };
        let title = builder.title().to_string();
        self.register_fix(violation, title, builder).await
    }

    /// Folds every pending fix of one document. The committed snapshot is left
    /// as is; the host commits the result with [`FixEngine::open`].
    pub async fn apply_batch(
        &mut self,
        id: &DocumentId,
        token: &CancellationToken,
    ) -> Result<AggregateResult, FixError> {
        let (document, adapter) = self.snapshot(id)?;
        let document = document.clone();
        let actions = self.pending.remove(id).unwrap_or_default();
        Ok(BatchAggregator::new(adapter)
            .aggregate(document, actions, token)
            .await)
    }

    pub async fn apply_all(
        &mut self,
        token: &CancellationToken,
    ) -> Result<Vec<AggregateResult>, FixError> {
        self.apply_all_with_progress(token, |_| {}).await
    }

    /// Folds every document with pending fixes, one task per document.
    /// Results are ordered by document id.
    pub async fn apply_all_with_progress<F>(
        &mut self,
        token: &CancellationToken,
        on_realized: F,
    ) -> Result<Vec<AggregateResult>, FixError>
    where
        F: Fn(&FixAction) + Send + Sync + 'static,
    {
        let mut batches = Vec::new();
        for id in self.pending.keys() {
            let (document, adapter) = self.snapshot(id)?;
            batches.push((id.clone(), document.clone(), adapter));
        }

        let on_realized = Arc::new(on_realized);
        let mut tasks = JoinSet::new();
        for (id, document, adapter) in batches {
            let actions = self.pending.remove(&id).unwrap_or_default();
            let token = token.clone();
            let on_realized = Arc::clone(&on_realized);
            tasks.spawn(async move {
                BatchAggregator::new(adapter)
                    .aggregate_with_progress(document, actions, &token, |action| {
                        on_realized(action)
                    })
                    .await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                // one document's batch dying must not drop the others
                Err(e) => log::error!("batch task failed: {}", e),
            }
        }
        results.sort_by(|a, b| a.document.id().cmp(b.document.id()));
        Ok(results)
    }

    /// The snapshot a single fix would produce, leaving engine state untouched.
    pub async fn preview_fix(
        &self,
        violation: &Violation,
        token: &CancellationToken,
    ) -> Result<Option<Document>, FixError> {
        let builder = match self.fixers.find_fixer(&violation.rule) {
            Some(builder) => builder,
            None => return Ok(None),
        };
        self.preview_with(violation, builder, token).await
    }

    pub async fn preview_with(
        &self,
        violation: &Violation,
        builder: Arc<dyn DescriptorBuilder>,
        token: &CancellationToken,
    ) -> Result<Option<Document>, FixError> {
        let (document, adapter) = self.snapshot(&violation.document)?;
        let descriptor = match builder.build(violation, document, adapter.as_ref()).await {
            Some(descriptor) if adapter.supports(&descriptor) => descriptor,
            _ => return Ok(None),
        };
        let title = builder.title().to_string();
        let mut action = FixAction::new(
            FixId(self.next_id),
            title,
            violation.clone(),
            descriptor,
            builder,
        );
        action
            .realize(document, adapter.as_ref(), token)
            .await
            .map(Some)
    }
}
