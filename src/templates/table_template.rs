use crate::compare::SortDirection;

pub const DRAG_HANDLE_CLASS: &str = "drag-handle";

pub fn render_drag_handle() -> String {
    format!(
        "<span class=\"{DRAG_HANDLE_CLASS}\" draggable=\"true\" tabindex=\"0\" style=\"cursor: move; margin-right: 10px;\" aria-label=\"Drag to reorder, or press Alt+Up/Down\">\u{2195}</span>"
    )
}

/// Values for the header's `data-sort` and `aria-sort` attributes.
pub fn sort_attributes(direction: SortDirection) -> (&'static str, &'static str) {
    match direction {
        SortDirection::Ascending => ("asc", "ascending"),
        SortDirection::Descending => ("desc", "descending"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_handle_is_draggable() {
        let html = render_drag_handle();
        assert!(html.contains("draggable=\"true\""));
        assert!(html.contains('\u{2195}'));
    }

    #[test]
    fn sort_attribute_values() {
        assert_eq!(sort_attributes(SortDirection::Ascending), ("asc", "ascending"));
        assert_eq!(sort_attributes(SortDirection::Descending), ("desc", "descending"));
    }
}
