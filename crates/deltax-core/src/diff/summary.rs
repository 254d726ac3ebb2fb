//! Human-readable summary renderer for computed diffs.

use std::fmt::{Debug, Write};

use crate::diff::adapter::DiffAdapter;
use crate::diff::engine::DiffEngine;
use crate::diff::model::PropertyChange;

fn push_change<P: Debug, ID: Debug>(out: &mut String, id: &ID, change: &PropertyChange<P>) {
    let rendered = match (&change.old, &change.new) {
        (None, Some(new)) => format!("(absent) -> {:?}", new),
        (Some(old), None) => format!("{:?} -> (absent)", old),
        (Some(old), Some(new)) => format!("{:?} -> {:?}", old, new),
        (None, None) => "(absent) -> (absent)".to_string(),
    };
    let _ = writeln!(out, "  - `{:?}`: {}", id, rendered);
}

impl<T, P, ID, A> DiffEngine<T, P, ID, A>
where
    T: Clone,
    P: Clone + PartialEq + Debug,
    ID: Ord + Clone + Debug,
    A: DiffAdapter<T, P, ID>,
{
    /// Render a human-readable Markdown/text summary of the computed diff.
    ///
    /// The summary is intended for review workflows and change displays. It
    /// is informational only and does not affect the structured result.
    /// Computes the diff first if needed.
    pub fn render_summary(&mut self) -> String {
        let added: Vec<T> = self.added().to_vec();
        let removed: Vec<T> = self.removed().to_vec();
        let updated: Vec<T> = self.updated().to_vec();
        let changes = self.property_changes().clone();

        let adapter = self.adapter();
        let added_ids: Vec<ID> = added.iter().map(|e| adapter.entity_id(e)).collect();
        let removed_ids: Vec<ID> = removed.iter().map(|e| adapter.entity_id(e)).collect();
        let updated_ids: Vec<ID> = updated.iter().map(|e| adapter.entity_id(e)).collect();

        let mut out = String::new();
        out.push_str("## Entity Diff\n\n");
        let _ = writeln!(
            out,
            "**Added**: {}  \n**Removed**: {}  \n**Updated**: {}\n",
            added_ids.len(),
            removed_ids.len(),
            updated_ids.len()
        );

        let unchanged = changes.values().all(|m| m.is_empty());
        if unchanged && added_ids.is_empty() && removed_ids.is_empty() {
            out.push_str("_No changes detected._\n");
            return out;
        }

        if !added_ids.is_empty() {
            out.push_str("### Added Entities\n\n");
            for id in &added_ids {
                let _ = writeln!(out, "- `{:?}`", id);
            }
            out.push('\n');
        }

        if !removed_ids.is_empty() {
            out.push_str("### Removed Entities\n\n");
            for id in &removed_ids {
                let _ = writeln!(out, "- `{:?}`", id);
            }
            out.push('\n');
        }

        if !unchanged {
            out.push_str("### Property Changes\n\n");
            for (entity_id, entity_changes) in &changes {
                if entity_changes.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "- `{:?}`:", entity_id);
                for (property_id, change) in entity_changes {
                    push_change(&mut out, property_id, change);
                }
            }
        }

        out
    }
}
