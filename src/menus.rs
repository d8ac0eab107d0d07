/// Open/closed state of a dropdown or the mobile menu.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MenuState {
    open: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChange {
    Opened,
    Closed,
    Unchanged,
}

impl MenuState {
    /// State read back from the page: a menu is open when it is visible.
    pub fn from_visible(visible: bool) -> Self {
        Self { open: visible }
    }

    pub fn toggle(&mut self) -> MenuChange {
        self.open = !self.open;
        if self.open {
            MenuChange::Opened
        } else {
            MenuChange::Closed
        }
    }

    /// A click anywhere on the page; `inside` is true when it landed in the
    /// menu or on its toggle.
    pub fn document_click(&mut self, inside: bool) -> MenuChange {
        if inside || !self.open {
            return MenuChange::Unchanged;
        }
        self.open = false;
        MenuChange::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_state() {
        let mut menu = MenuState::default();
        assert_eq!(menu.toggle(), MenuChange::Opened);
        assert_eq!(menu, MenuState::from_visible(true));
        assert_eq!(menu.toggle(), MenuChange::Closed);
    }

    #[test]
    fn outside_click_closes_only_open_menus() {
        let mut menu = MenuState::default();
        assert_eq!(menu.document_click(false), MenuChange::Unchanged);
        menu.toggle();
        assert_eq!(menu.document_click(true), MenuChange::Unchanged);
        assert_eq!(menu, MenuState::from_visible(true));
        assert_eq!(menu.document_click(false), MenuChange::Closed);
        assert_eq!(menu, MenuState::from_visible(false));
    }

    #[test]
    fn menus_visible_in_markup_start_open() {
        let mut menu = MenuState::from_visible(true);
        assert_eq!(menu.toggle(), MenuChange::Closed);
        assert_eq!(MenuState::from_visible(true).document_click(false), MenuChange::Closed);
        assert_eq!(MenuState::from_visible(false).document_click(false), MenuChange::Unchanged);
    }
}
