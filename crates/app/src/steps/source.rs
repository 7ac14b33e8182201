//! `source` steps: dump the UI hierarchy.

use cadence_domain::hierarchy::XML_EXPOSABLE_ATTRIBUTES;
use cadence_domain::step::{StepFault, StepKind, StepOutput};

use super::{StepVariant, unsupported_subtype};
use crate::ports::{CacheRefresher, HierarchyDumper};

const SUBTYPES: &[&str] = &["xml"];

pub struct SourceStep<R, D> {
    refresher: R,
    dumper: D,
}

impl<R: CacheRefresher, D: HierarchyDumper> SourceStep<R, D> {
    pub fn new(refresher: R, dumper: D) -> Self {
        Self { refresher, dumper }
    }
}

impl<R: CacheRefresher, D: HierarchyDumper> StepVariant for SourceStep<R, D> {
    fn supported_subtypes(&self) -> &'static [&'static str] {
        SUBTYPES
    }

    async fn run(
        &self,
        subtype: &str,
        _payload: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<StepOutput, StepFault> {
        match subtype {
            "xml" => {
                // The cached view tree may be stale after a gesture.
                self.refresher.refresh().await?;
                let xml = self.dumper.dump(XML_EXPOSABLE_ATTRIBUTES).await?;
                Ok(StepOutput::Text(xml))
            }
            other => Err(unsupported_subtype(StepKind::Source, other)),
        }
    }
}
