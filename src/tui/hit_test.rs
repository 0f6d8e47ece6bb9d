//! Hit testing for clickable TUI elements
//!
//! Tracks rendered widget bounds and maps mouse coordinates to actions

use ratatui::layout::Rect;

/// Identifies a clickable element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    /// Send button next to the input
    SendButton,
    /// The input field itself
    Input,
}

/// Tracks clickable regions for hit testing
#[derive(Debug, Default)]
pub struct HitTestRegistry {
    /// Searched in reverse so later registrations sit on top
    regions: Vec<(Rect, ClickTarget)>,
}

impl HitTestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, rect: Rect, target: ClickTarget) {
        self.regions.push((rect, target));
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<&ClickTarget> {
        for (rect, target) in self.regions.iter().rev() {
            if x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height {
                return Some(target);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_inside_and_outside() {
        let mut registry = HitTestRegistry::new();
        registry.register(Rect::new(10, 5, 4, 3), ClickTarget::SendButton);

        assert_eq!(registry.hit_test(10, 5), Some(&ClickTarget::SendButton));
        assert_eq!(registry.hit_test(13, 7), Some(&ClickTarget::SendButton));
        assert_eq!(registry.hit_test(14, 7), None);
        assert_eq!(registry.hit_test(9, 5), None);
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = HitTestRegistry::new();
        registry.register(Rect::new(0, 0, 20, 3), ClickTarget::Input);
        registry.register(Rect::new(15, 0, 5, 3), ClickTarget::SendButton);

        assert_eq!(registry.hit_test(16, 1), Some(&ClickTarget::SendButton));
        assert_eq!(registry.hit_test(2, 1), Some(&ClickTarget::Input));

        registry.clear();
        assert_eq!(registry.hit_test(16, 1), None);
    }
}
