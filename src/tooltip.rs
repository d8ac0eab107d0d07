pub const OFFSET_Y: i32 = -40;
pub const OFFSET_X: i32 = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TooltipPosition {
    pub top: i32,
    pub left: i32,
}

impl TooltipPosition {
    pub fn css_top(&self) -> String {
        format!("{}px", self.top)
    }

    pub fn css_left(&self) -> String {
        format!("{}px", self.left)
    }
}

/// Tooltip box position for a pointer at viewport coordinates.
pub fn tooltip_position(client_x: i32, client_y: i32) -> TooltipPosition {
    TooltipPosition {
        top: client_y + OFFSET_Y,
        left: client_x + OFFSET_X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sits_above_and_right_of_pointer() {
        let position = tooltip_position(100, 200);
        assert_eq!(position, TooltipPosition { top: 160, left: 110 });
        assert_eq!(position.css_top(), "160px");
        assert_eq!(tooltip_position(0, 10).css_top(), "-30px");
    }
}
