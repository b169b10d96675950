//! Field ordering after a drag gesture
//!
//! [`compute_reorder`] is pure: it reads a [`FormConfig`] and returns the
//! page lists to write, or `None` when the gesture should do nothing. The
//! interactive side lives in [`drag`].

pub mod drag;

pub use drag::{DragSession, DragState, classify_edge};

use crate::model::FormConfig;
use serde::{Deserialize, Serialize};

/// Half of the hovered field the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[default]
    Top,
    Bottom,
}

/// Drag metadata captured at drop time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub field_id: String,
    pub source_page: String,
    pub target_page: String,
    pub source_index: usize,
    /// Index of the hovered field in the target page; `None` when the drop
    /// landed on the page container itself
    pub target_index: Option<usize>,
    /// Id of the hovered field, checked against `target_index`
    pub target_field: Option<String>,
    pub edge: Edge,
}

impl MoveRequest {
    /// Move `field_id` next to `target_field` on `target_page`
    pub fn onto_field(
        form: &FormConfig,
        field_id: &str,
        target_page: &str,
        target_field: &str,
        edge: Edge,
    ) -> Option<Self> {
        let source_page = form.page_of(field_id)?.to_string();
        let source_index = form.page(&source_page)?.position(field_id)?;
        let target_index = form.page(target_page)?.position(target_field)?;
        Some(Self {
            field_id: field_id.to_string(),
            source_page,
            target_page: target_page.to_string(),
            source_index,
            target_index: Some(target_index),
            target_field: Some(target_field.to_string()),
            edge,
        })
    }

    /// Move `field_id` onto the container of `target_page`
    pub fn onto_page(form: &FormConfig, field_id: &str, target_page: &str) -> Option<Self> {
        let source_page = form.page_of(field_id)?.to_string();
        let source_index = form.page(&source_page)?.position(field_id)?;
        form.page(target_page)?;
        Some(Self {
            field_id: field_id.to_string(),
            source_page,
            target_page: target_page.to_string(),
            source_index,
            target_index: None,
            target_field: None,
            edge: Edge::Bottom,
        })
    }
}

/// New ordering produced by a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    Within {
        page: String,
        fields: Vec<String>,
    },
    Across {
        source_page: String,
        source_fields: Vec<String>,
        target_page: String,
        target_fields: Vec<String>,
    },
}

impl Reorder {
    pub fn affected_pages(&self) -> Vec<&str> {
        match self {
            Reorder::Within { page, .. } => vec![page.as_str()],
            Reorder::Across {
                source_page,
                target_page,
                ..
            } => vec![source_page.as_str(), target_page.as_str()],
        }
    }

    /// Write the new lists into `form`
    ///
    /// Both pages are checked before anything is written.
    pub fn apply(self, form: &mut FormConfig) -> anyhow::Result<()> {
        for page in self.affected_pages() {
            if form.page(page).is_none() {
                anyhow::bail!("Page '{}' not found", page);
            }
        }
        match self {
            Reorder::Within { page, fields } => {
                if let Some(page) = form.page_mut(&page) {
                    page.fields = fields;
                }
            }
            Reorder::Across {
                source_page,
                source_fields,
                target_page,
                target_fields,
            } => {
                if let Some(page) = form.page_mut(&source_page) {
                    page.fields = source_fields;
                }
                if let Some(page) = form.page_mut(&target_page) {
                    page.fields = target_fields;
                }
            }
        }
        Ok(())
    }
}

/// Compute the page lists after a drop
///
/// Returns `None` for gestures that must not change anything: stale or
/// inconsistent metadata, dropping a field on itself, or a move that leaves
/// the order as it was.
pub fn compute_reorder(form: &FormConfig, request: &MoveRequest) -> Option<Reorder> {
    let source = form.page(&request.source_page)?;
    let target = form.page(&request.target_page)?;

    if source.fields.get(request.source_index) != Some(&request.field_id) {
        log::debug!(
            "Drag source {} is not at index {} of page {}",
            request.field_id,
            request.source_index,
            request.source_page
        );
        return None;
    }
    if request.target_field.as_deref() == Some(request.field_id.as_str()) {
        return None;
    }
    if let Some(index) = request.target_index {
        let hovered = target.fields.get(index)?;
        if let Some(expected) = &request.target_field {
            if hovered != expected {
                return None;
            }
        }
    }

    if request.source_page == request.target_page {
        let last = source.fields.len() - 1;
        let to = match request.target_index {
            Some(index) => adjust_within(request.source_index, index, request.edge),
            None => last,
        };
        if to == request.source_index {
            return None;
        }
        let mut fields = source.fields.clone();
        array_move(&mut fields, request.source_index, to);
        return Some(Reorder::Within {
            page: request.source_page.clone(),
            fields,
        });
    }

    let mut source_fields = source.fields.clone();
    source_fields.remove(request.source_index);

    let target_fields = if target.fields.is_empty() {
        vec![request.field_id.clone()]
    } else {
        let mut fields = target.fields.clone();
        let at = match (request.target_index, request.edge) {
            (Some(index), Edge::Top) => index,
            (Some(index), Edge::Bottom) => index + 1,
            (None, _) => fields.len(),
        };
        fields.insert(at, request.field_id.clone());
        fields
    };

    Some(Reorder::Across {
        source_page: request.source_page.clone(),
        source_fields,
        target_page: request.target_page.clone(),
        target_fields,
    })
}

/// Final index within one page, accounting for the removed source slot
fn adjust_within(from: usize, to: usize, edge: Edge) -> usize {
    match edge {
        Edge::Top if to > from => to - 1,
        Edge::Bottom if to < from => to + 1,
        _ => to,
    }
}

fn array_move(items: &mut Vec<String>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}
