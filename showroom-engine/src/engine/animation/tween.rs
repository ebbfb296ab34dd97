use bevy::prelude::*;

/// Property a tween writes to. At most one tween per field is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenField {
    CameraPosition,
    OrbitTarget,
    PanelOpacity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Vector(Vec3),
}

impl TweenValue {
    fn lerp(self, to: Self, t: f32) -> Self {
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Vector(a), Self::Vector(b)) => Self::Vector(a.lerp(b, t)),
            (_, to) => to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out.
    #[default]
    Power1Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionHandle(u64);

#[derive(Debug)]
struct Tween<C> {
    handle: TransitionHandle,
    field: TweenField,
    from: TweenValue,
    to: TweenValue,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    completion: Option<C>,
}

/// In-flight tweens in start order. Each carries an optional completion
/// value handed back from [`Tweener::tick`] exactly once.
#[derive(Debug)]
pub struct Tweener<C> {
    active: Vec<Tween<C>>,
    next_handle: u64,
}

impl<C> Default for Tweener<C> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<C> Tweener<C> {
    /// Start interpolating `field` from `from` to `to`. Any tween already
    /// running on the same field is dropped without its completion.
    pub fn start(
        &mut self,
        field: TweenField,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
        ease: Ease,
        completion: Option<C>,
    ) -> TransitionHandle {
        self.active.retain(|tween| tween.field != field);

        let handle = TransitionHandle(self.next_handle);
        self.next_handle += 1;
        self.active.push(Tween {
            handle,
            field,
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
            completion,
        });
        handle
    }

    pub fn is_complete(&self, handle: TransitionHandle) -> bool {
        !self.active.iter().any(|tween| tween.handle == handle)
    }

    /// Drop a tween without firing its completion.
    pub fn cancel(&mut self, handle: TransitionHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|tween| tween.handle != handle);
        self.active.len() != before
    }

    /// Advance every tween by `delta_seconds`, calling `apply` with each new
    /// value. Finished tweens write their exact target and yield their
    /// completions in start order.
    pub fn tick(
        &mut self,
        delta_seconds: f32,
        mut apply: impl FnMut(TweenField, TweenValue),
    ) -> Vec<C> {
        let mut completions = Vec::new();

        self.active.retain_mut(|tween| {
            tween.elapsed += delta_seconds.max(0.0);
            if tween.duration <= 0.0 || tween.elapsed >= tween.duration {
                apply(tween.field, tween.to);
                if let Some(completion) = tween.completion.take() {
                    completions.push(completion);
                }
                return false;
            }

            let t = tween.ease.apply(tween.elapsed / tween.duration);
            apply(tween.field, tween.from.lerp(tween.to, t));
            true
        });

        completions
    }
}
