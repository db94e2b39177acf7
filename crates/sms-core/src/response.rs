//! Response Composer: callback descriptors for the next request.

use serde::Serialize;
use sms_model::{DataRecord, Identity, PipelineOptions};
use tracing::info;

use crate::merge::MergeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
}

/// A request the caller issues next, carrying the record as its body.
///
/// `GET` callbacks continue the staged pipeline; `POST` and `PUT` are the
/// final storage writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callback {
    pub path: String,
    pub method: Method,
    pub body: DataRecord,
}

impl Callback {
    pub fn new(path: impl Into<String>, method: Method, body: DataRecord) -> Self {
        Self {
            path: path.into(),
            method,
            body,
        }
    }
}

/// Percent-encode one path segment. Spaces become `%20`, never `+`.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

pub(crate) fn join_path(base: &str, segments: &[&str]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Storage request for a record whose merge state is settled.
///
/// A match takes over the stored identity and, when this pass resolved no
/// clinic, the stored clinic. Anything else is a create.
pub fn compose(mut record: DataRecord, state: &MergeState, options: &PipelineOptions) -> Callback {
    match state {
        MergeState::Matched(stored) => {
            record.assign_identity(&Identity {
                id: stored.id.clone(),
                rev: stored.rev.clone(),
            });
            if record.clinic().is_none()
                && let Some(clinic) = stored
                    .related_entities
                    .as_ref()
                    .and_then(|related| related.clinic.clone())
            {
                record.related_entities.clinic = Some(clinic);
            }
            let path = join_path(&options.collection_root, &[&encode_segment(&stored.id)]);
            info!(errors = record.errors.len(), "replacing stored record");
            Callback::new(path, Method::Put, record)
        }
        MergeState::Candidate | MergeState::NoMatch => {
            info!(errors = record.errors.len(), "creating record");
            let path = join_path(&options.collection_root, &[]);
            Callback::new(path, Method::Post, record)
        }
    }
}
