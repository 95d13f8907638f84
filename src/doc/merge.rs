//! Incremental merge of observed calls into the `Spec`.
//!
//! # Responsibilities
//! - Group calls under an Api by (verb, path)
//! - Assign globally increasing ids
//! - Drop calls equivalent to one already stored for the same Api
//!
//! # Design Decisions
//! - Linear scans: documentation samples are few, updates are rare
//! - The id is consumed before the duplicate check, so dropped duplicates
//!   leave gaps and ids are never reused
//! - After a reload the counter resumes past the highest persisted id

use crate::doc::extract::is_common_header;
use crate::doc::model::{Api, Call, Spec};

/// What a merge did with the incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First call for a new (verb, path); an Api was created.
    NewApi { id: u64 },
    /// Novel call appended to an existing Api.
    Appended { id: u64 },
    /// Equivalent to a stored call; not stored.
    Duplicate { id: u64 },
}

impl MergeOutcome {
    pub fn id(&self) -> u64 {
        match *self {
            MergeOutcome::NewApi { id }
            | MergeOutcome::Appended { id }
            | MergeOutcome::Duplicate { id } => id,
        }
    }

    /// Whether the `Spec` changed and needs persisting.
    pub fn is_stored(&self) -> bool {
        !matches!(self, MergeOutcome::Duplicate { .. })
    }
}

/// The `Spec` plus the global id counter. Owned by a single writer.
#[derive(Debug, Default)]
pub struct DocState {
    spec: Spec,
    next_id: u64,
}

impl DocState {
    /// Wrap a (possibly reloaded) spec, resuming ids past the highest stored one.
    pub fn new(spec: Spec) -> Self {
        let next_id = spec.max_call_id().map_or(0, |id| id + 1);
        Self { spec, next_id }
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Merge one call into the `Spec`.
    pub fn merge(&mut self, mut call: Call) -> MergeOutcome {
        let id = self.take_id();
        call.id = id;
        strip_common_headers(&mut call);

        let existing = self
            .spec
            .api_specs
            .iter_mut()
            .find(|api| api.matches(&call.method_type, &call.current_path));

        match existing {
            Some(api) => {
                if api.calls.iter().any(|stored| stored.is_equivalent(&call)) {
                    MergeOutcome::Duplicate { id }
                } else {
                    api.calls.push(call);
                    MergeOutcome::Appended { id }
                }
            }
            None => {
                let mut api = Api::new(call.method_type.clone(), call.current_path.clone());
                api.calls.push(call);
                self.spec.api_specs.push(api);
                MergeOutcome::NewApi { id }
            }
        }
    }
}

/// Remove client-specific headers from a recorded request.
pub fn strip_common_headers(call: &mut Call) {
    call.request_header.retain(|name, _| !is_common_header(name));
}
