//! Drag gesture lifecycle
//!
//! ```text
//! Idle -> Dragging -> Idle (drop or cancel)
//! ```

use super::{Edge, MoveRequest, Reorder, compute_reorder};
use crate::model::FormConfig;

/// What the pointer is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hover {
    Field { field_id: String, edge: Edge },
    /// An empty page, or the free area of a page below its fields
    Page { page_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        field_id: String,
        source_page: String,
        hover: Option<Hover>,
    },
}

/// Which half of a field's rectangle the pointer is in
///
/// A pointer exactly on the midpoint counts as the bottom half.
pub fn classify_edge(pointer_y: f64, rect_top: f64, rect_height: f64) -> Edge {
    let midpoint = rect_top + rect_height / 2.0;
    if pointer_y < midpoint {
        Edge::Top
    } else {
        Edge::Bottom
    }
}

/// One drag gesture at a time, from pick-up to drop
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pick up a field; any gesture already in progress is abandoned
    pub fn start(&mut self, field_id: &str, page_id: &str) {
        if self.is_dragging() {
            log::debug!("Drag restarted before drop; previous gesture discarded");
        }
        self.state = DragState::Dragging {
            field_id: field_id.to_string(),
            source_page: page_id.to_string(),
            hover: None,
        };
    }

    /// Pointer moved over a field; returns the classified edge
    pub fn hover(
        &mut self,
        target_field_id: &str,
        pointer_y: f64,
        rect_top: f64,
        rect_height: f64,
    ) -> Option<Edge> {
        let DragState::Dragging { hover, .. } = &mut self.state else {
            return None;
        };
        let edge = classify_edge(pointer_y, rect_top, rect_height);
        *hover = Some(Hover::Field {
            field_id: target_field_id.to_string(),
            edge,
        });
        Some(edge)
    }

    /// Pointer moved over a page container
    pub fn hover_page(&mut self, page_id: &str) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = Some(Hover::Page {
                page_id: page_id.to_string(),
            });
        }
    }

    /// Pointer left every drop target
    pub fn leave(&mut self) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = None;
        }
    }

    /// Finish the gesture and compute the resulting order
    ///
    /// The session is idle afterwards whatever the outcome.
    pub fn drop(&mut self, form: &FormConfig) -> Option<Reorder> {
        let DragState::Dragging {
            field_id,
            source_page,
            hover,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        let request = match hover? {
            Hover::Field {
                field_id: target,
                edge,
            } => {
                let target_page = form.page_of(&target)?.to_string();
                let target_index = form.page(&target_page)?.position(&target)?;
                MoveRequest {
                    source_index: form.page(&source_page)?.position(&field_id)?,
                    field_id,
                    source_page,
                    target_page,
                    target_index: Some(target_index),
                    target_field: Some(target),
                    edge,
                }
            }
            Hover::Page { page_id } => MoveRequest {
                source_index: form.page(&source_page)?.position(&field_id)?,
                field_id,
                source_page,
                target_page: page_id,
                target_index: None,
                target_field: None,
                edge: Edge::Bottom,
            },
        };
        compute_reorder(form, &request)
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldEntity, FieldType, PageEntity};

    fn form() -> FormConfig {
        let mut form = FormConfig::new("form", "Test");
        form.add_page(PageEntity::new("p1", "One")).unwrap();
        form.add_page(PageEntity::new("p2", "Two")).unwrap();
        for id in ["F1", "F2", "F3"] {
            form.insert_field("p1", FieldEntity::new(id, FieldType::Text, id, id), None)
                .unwrap();
        }
        form
    }

    #[test]
    fn test_classify_edge() {
        assert_eq!(classify_edge(10.0, 0.0, 40.0), Edge::Top);
        assert_eq!(classify_edge(20.0, 0.0, 40.0), Edge::Bottom);
        assert_eq!(classify_edge(39.0, 0.0, 40.0), Edge::Bottom);
    }

    #[test]
    fn test_drag_within_page() {
        let form = form();
        let mut session = DragSession::new();
        session.start("F2", "p1");
        assert_eq!(session.hover("F1", 105.0, 100.0, 40.0), Some(Edge::Top));

        let reorder = session.drop(&form).unwrap();
        assert_eq!(
            reorder,
            Reorder::Within {
                page: "p1".into(),
                fields: vec!["F2".into(), "F1".into(), "F3".into()],
            }
        );
        assert_eq!(session.state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_to_empty_page() {
        let mut form = form();
        let mut session = DragSession::new();
        session.start("F1", "p1");
        session.hover_page("p2");
        session.drop(&form).unwrap().apply(&mut form).unwrap();

        assert_eq!(form.page("p1").unwrap().fields, vec!["F2", "F3"]);
        assert_eq!(form.page("p2").unwrap().fields, vec!["F1"]);
    }

    #[test]
    fn test_cancel_and_idle_drop_are_noops() {
        let form = form();
        let mut session = DragSession::new();
        assert!(session.drop(&form).is_none());
        assert_eq!(session.hover("F1", 0.0, 0.0, 10.0), None);

        session.start("F3", "p1");
        session.hover("F1", 0.0, 0.0, 10.0);
        session.cancel();
        assert!(!session.is_dragging());
        assert!(session.drop(&form).is_none());
    }

    #[test]
    fn test_drop_without_hover_or_on_self() {
        let form = form();
        let mut session = DragSession::new();
        session.start("F1", "p1");
        session.hover("F3", 0.0, 0.0, 10.0);
        session.leave();
        assert!(session.drop(&form).is_none());
        assert!(!session.is_dragging());

        session.start("F1", "p1");
        session.hover("F1", 9.0, 0.0, 10.0);
        assert!(session.drop(&form).is_none());
    }

    #[test]
    fn test_stale_source_is_noop() {
        let form = form();
        let mut session = DragSession::new();
        session.start("F1", "p2");
        session.hover("F3", 9.0, 0.0, 10.0);
        assert!(session.drop(&form).is_none());
    }
}
