#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasLifecycle {
    /// No window or buffers yet; the size may still change.
    Uncreated,
    /// Window and buffers exist; drawing goes to the off-screen buffer.
    Idle,
    /// Inside `show`, waiting and polling events.
    Showing,
}

impl CanvasLifecycle {
    pub fn is_created(self) -> bool {
        !matches!(self, Self::Uncreated)
    }
}

pub fn can_transition(from: CanvasLifecycle, to: CanvasLifecycle) -> bool {
    matches!(
        (from, to),
        (CanvasLifecycle::Uncreated, CanvasLifecycle::Idle)
            | (CanvasLifecycle::Idle, CanvasLifecycle::Showing)
            | (CanvasLifecycle::Showing, CanvasLifecycle::Idle)
    ) || from == to
}

#[cfg(test)]
mod tests {
    use super::{can_transition, CanvasLifecycle};

    #[test]
    fn window_can_never_return_to_uncreated() {
        assert!(!can_transition(CanvasLifecycle::Idle, CanvasLifecycle::Uncreated));
        assert!(!can_transition(CanvasLifecycle::Showing, CanvasLifecycle::Uncreated));
        assert!(!can_transition(CanvasLifecycle::Uncreated, CanvasLifecycle::Showing));
    }

    #[test]
    fn show_cycles_between_idle_and_showing() {
        assert!(can_transition(CanvasLifecycle::Uncreated, CanvasLifecycle::Idle));
        assert!(can_transition(CanvasLifecycle::Idle, CanvasLifecycle::Showing));
        assert!(can_transition(CanvasLifecycle::Showing, CanvasLifecycle::Idle));
        assert!(CanvasLifecycle::Showing.is_created());
        assert!(!CanvasLifecycle::Uncreated.is_created());
    }
}
