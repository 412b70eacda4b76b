use crate::platform::{AnimationTiming, Dom, Keyframe};
use std::{fmt, rc::Rc, time::Duration};

pub const FADE_OUT_DURATION: Duration = Duration::from_millis(220);
pub const FADE_OUT_EASING: &str = "cubic-bezier(0.4, 0, 1, 1)";
pub const FADE_IN_DURATION: Duration = Duration::from_millis(360);
pub const FADE_IN_EASING: &str = "cubic-bezier(0, 0, 0.2, 1)";
/// Longest fade allowed while the user prefers reduced motion.
pub const REDUCED_MOTION_DURATION: Duration = Duration::from_millis(120);

/// Inline styles a fade may touch besides `opacity`. They are put back the
/// way they were once the fade settles.
const RESTORED_STYLES: [&str; 3] = ["transform", "filter", "will-change"];

/// Which way a fade goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeKind {
    Out,
    In,
}

impl FadeKind {
    fn opacity(self) -> (f64, f64) {
        match self {
            Self::Out => (1.0, 0.0),
            Self::In => (0.0, 1.0),
        }
    }

    fn default_motion(self) -> MotionSpec {
        match self {
            Self::Out => MotionSpec {
                duration: FADE_OUT_DURATION,
                easing: FADE_OUT_EASING.to_string(),
            },
            Self::In => MotionSpec {
                duration: FADE_IN_DURATION,
                easing: FADE_IN_EASING.to_string(),
            },
        }
    }
}

/// Duration and easing for one fade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionSpec {
    pub duration: Duration,
    pub easing: String,
}

/// Per-call adjustments to a fade. `transform` and `filter` are
/// `(from, to)` pairs added to the opacity keyframes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FadeOptions {
    pub duration: Option<Duration>,
    /// A CSS easing function, or a token the [`Animator`] can resolve.
    pub easing: Option<String>,
    pub transform: Option<(String, String)>,
    pub filter: Option<(String, String)>,
}

/// Optional motion-design capabilities supplied by the host page.
///
/// Every method has a default that defers to the router's built-in behavior.
pub trait Animator {
    /// Maps an easing token (e.g. `"emphasized-decelerate"`) to a CSS easing
    /// function.
    fn resolve_easing(&self, _token: &str) -> Option<String> {
        None
    }

    /// Replaces the default duration and easing for a kind of fade.
    fn motion_spec(&self, _kind: FadeKind) -> Option<MotionSpec> {
        None
    }

    /// Overrides the platform's reduced-motion preference.
    fn should_reduce_motion(&self) -> Option<bool> {
        None
    }
}

/// Fades page content out before a swap and back in afterwards.
///
/// A fade always settles, and always leaves the element at its final opacity,
/// whether or not the platform can animate and whether or not the animation
/// fails.
#[derive(Clone, Default)]
pub struct TransitionAnimator {
    animator: Option<Rc<dyn Animator>>,
}

impl fmt::Debug for TransitionAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionAnimator")
            .field("animator", &self.animator.is_some())
            .finish()
    }
}

impl TransitionAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_animator(animator: Rc<dyn Animator>) -> Self {
        Self {
            animator: Some(animator),
        }
    }

    pub async fn fade_out<D: Dom + ?Sized>(
        &self,
        dom: &D,
        el: Option<&D::Element>,
        overrides: Option<&FadeOptions>,
    ) {
        self.fade(dom, el, FadeKind::Out, overrides).await
    }

    pub async fn fade_in<D: Dom + ?Sized>(
        &self,
        dom: &D,
        el: Option<&D::Element>,
        overrides: Option<&FadeOptions>,
    ) {
        self.fade(dom, el, FadeKind::In, overrides).await
    }

    fn reduce_motion<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        self.animator
            .as_ref()
            .and_then(|animator| animator.should_reduce_motion())
            .unwrap_or_else(|| dom.prefers_reduced_motion())
    }

    /// Resolves the duration and easing for a fade: per-call overrides, then
    /// the animator's spec, then the built-in defaults.
    pub fn motion(
        &self,
        kind: FadeKind,
        overrides: Option<&FadeOptions>,
        reduce_motion: bool,
    ) -> MotionSpec {
        let base = self
            .animator
            .as_ref()
            .and_then(|animator| animator.motion_spec(kind))
            .unwrap_or_else(|| kind.default_motion());
        let mut duration = overrides
            .and_then(|o| o.duration)
            .unwrap_or(base.duration);
        let easing = overrides
            .and_then(|o| o.easing.as_deref())
            .unwrap_or(&base.easing);
        let easing = self
            .animator
            .as_ref()
            .and_then(|animator| animator.resolve_easing(easing))
            .unwrap_or_else(|| easing.to_string());
        if reduce_motion {
            duration = duration.min(REDUCED_MOTION_DURATION);
        }
        MotionSpec { duration, easing }
    }

    async fn fade<D: Dom + ?Sized>(
        &self,
        dom: &D,
        el: Option<&D::Element>,
        kind: FadeKind,
        overrides: Option<&FadeOptions>,
    ) {
        let Some(el) = el else {
            return;
        };
        let (from, to) = kind.opacity();
        let final_opacity = to.to_string();

        if !dom.supports_animation(el) {
            dom.set_style_property(el, "opacity", Some(&final_opacity));
            return;
        }

        let reduce_motion = self.reduce_motion(dom);
        let motion = self.motion(kind, overrides, reduce_motion);
        let saved = RESTORED_STYLES.map(|name| (name, dom.style_property(el, name)));

        let mut from_frame = Keyframe {
            opacity: from,
            transform: None,
            filter: None,
        };
        let mut to_frame = Keyframe {
            opacity: to,
            transform: None,
            filter: None,
        };
        let mut will_change = vec!["opacity"];
        if let (Some(o), false) = (overrides, reduce_motion) {
            if let Some((start, end)) = &o.transform {
                from_frame.transform = Some(start.clone());
                to_frame.transform = Some(end.clone());
                will_change.push("transform");
            }
            if let Some((start, end)) = &o.filter {
                from_frame.filter = Some(start.clone());
                to_frame.filter = Some(end.clone());
                will_change.push("filter");
            }
        }
        dom.set_style_property(el, "will-change", Some(&will_change.join(", ")));

        let timing = AnimationTiming {
            duration: motion.duration,
            easing: motion.easing,
        };
        match dom.animate(el, &[from_frame, to_frame], &timing) {
            Ok(finished) => {
                if let Err(e) = finished.await {
                    crate::warn!("Fade {kind:?} animation failed: {e}");
                }
            }
            Err(e) => {
                crate::warn!("Could not start fade {kind:?} animation: {e}");
            }
        }

        dom.set_style_property(el, "opacity", Some(&final_opacity));
        for (name, value) in saved {
            dom.set_style_property(el, name, value.as_deref());
        }
    }
}
