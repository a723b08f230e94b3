//! FocusRing: keyboard focus cycling between the header bars and the grid.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
        self.current()
    }

    /// Focus `id`; ignored if it is not part of the ring (e.g. overlays).
    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> FocusRing {
        FocusRing::new(vec![
            ComponentId::PlaylistBar,
            ComponentId::SearchBar,
            ComponentId::CategoryBar,
            ComponentId::ChannelGrid,
        ])
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let mut focus = ring();
        assert_eq!(focus.prev(), Some(ComponentId::ChannelGrid));
        assert_eq!(focus.next(), Some(ComponentId::PlaylistBar));
        assert_eq!(focus.next(), Some(ComponentId::SearchBar));
    }

    #[test]
    fn test_set_ignores_ids_outside_ring() {
        let mut focus = ring();
        focus.set(ComponentId::ChannelGrid);
        focus.set(ComponentId::PlayerOverlay);
        assert!(focus.is_focused(ComponentId::ChannelGrid));
    }

    #[test]
    fn test_empty_ring() {
        let mut focus = FocusRing::default();
        assert_eq!(focus.next(), None);
        assert_eq!(focus.prev(), None);
        assert_eq!(focus.current(), None);
    }
}
