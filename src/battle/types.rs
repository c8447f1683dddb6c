use crate::core::tick::TickEvent;

/// What one agent's transition produced this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub reward: f64,
    /// The agent's episode is over (final boss defeated).
    pub terminated: bool,
    pub events: Vec<TickEvent>,
}

impl Transition {
    pub fn with_event(event: TickEvent) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }
}
