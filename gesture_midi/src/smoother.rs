//! Single-pole exponential smoothing for continuous controllers.

pub const DEFAULT_ALPHA: f32 = 0.3;

/// `prev + alpha × (new − prev)`.
pub fn smooth(prev: f32, new: f32, alpha: f32) -> f32 {
    prev + alpha * (new - prev)
}

/// One smoothed channel.  The value only moves when [`update`](Self::update)
/// is called; frames that skip a channel leave it where it was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoother {
    value: f32,
    alpha: f32,
}

impl Smoother {
    /// Starts at 0, which is also pitch-bend centre.
    pub fn new(alpha: f32) -> Self {
        Smoother { value: 0.0, alpha }
    }

    pub fn with_value(value: f32, alpha: f32) -> Self {
        Smoother { value, alpha }
    }

    /// Move toward `target` and return the new value.
    pub fn update(&mut self, target: f32) -> f32 {
        self.value = smooth(self.value, target, self.alpha);
        self.value
    }

    pub fn value(&self) -> f32 { self.value }
}

impl Default for Smoother {
    fn default() -> Self { Smoother::new(DEFAULT_ALPHA) }
}
