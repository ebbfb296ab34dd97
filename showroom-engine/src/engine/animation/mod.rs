//! Time-based interpolation of camera and panel properties.

/// Field-keyed tween engine with explicit transition handles.
pub mod tween;

pub use tween::{Ease, TransitionHandle, TweenField, TweenValue, Tweener};
