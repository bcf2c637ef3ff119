use crate::{ObserverId, ObserverList};
use log::{debug, trace};
use std::fmt;
use std::time::Duration;

/// Override point for the owner of a [`HoldActivation`].
///
/// All methods default to no-ops; `()` is the empty hook.
pub trait ActivationHook: Send + Sync {
    /// A new engagement began (after state reset, before down observers).
    fn engagement_started(&mut self) {}
    /// The engagement ended, by pointer-up or by being disabled mid-hold.
    fn engagement_ended(&mut self) {}
    /// Sustained engagement crossed the threshold. Fires at most once per engagement.
    fn activated(&mut self) {}
}

impl ActivationHook for () {}

/// Per-object pointer-hold state machine.
///
/// Driven by an external input pass (`on_pointer_down` / `on_pointer_up`) and
/// an external frame loop (`tick`). Activation requires the accumulated hold
/// time to strictly exceed the threshold, so a zero-length tick never
/// activates, not even with a zero threshold.
pub struct HoldActivation<H: ActivationHook = ()> {
    activation_threshold: Duration,
    engaged: bool,
    engaged_elapsed: Duration,
    activated: bool,
    enabled: bool,
    down_observers: ObserverList,
    up_observers: ObserverList,
    hook: H,
}

impl HoldActivation<()> {
    pub fn new(activation_threshold: Duration) -> Self {
        Self::with_hook(activation_threshold, ())
    }
}

impl<H: ActivationHook> HoldActivation<H> {
    pub fn with_hook(activation_threshold: Duration, hook: H) -> Self {
        Self {
            activation_threshold,
            engaged: false,
            engaged_elapsed: Duration::ZERO,
            activated: false,
            enabled: true,
            down_observers: ObserverList::new(),
            up_observers: ObserverList::new(),
            hook,
        }
    }

    pub fn activation_threshold(&self) -> Duration { self.activation_threshold }
    pub fn is_pointer_engaged(&self) -> bool { self.engaged }
    pub fn engaged_elapsed(&self) -> Duration { self.engaged_elapsed }
    pub fn is_activated(&self) -> bool { self.activated }
    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn hook(&self) -> &H { &self.hook }
    pub fn hook_mut(&mut self) -> &mut H { &mut self.hook }

    /// Starts an engagement. Returns false (and does nothing) when disabled or
    /// already engaged, so duplicate down signals never double-fire.
    pub fn on_pointer_down(&mut self) -> bool {
        if !self.enabled {
            trace!("pointer down ignored: disabled");
            return false;
        }
        if self.engaged {
            trace!("pointer down ignored: already engaged");
            return false;
        }
        self.engaged = true;
        self.engaged_elapsed = Duration::ZERO;
        self.activated = false;
        self.hook.engagement_started();
        let notified = self.down_observers.notify();
        debug!("engagement started ({notified} down observers)");
        true
    }

    /// Ends the engagement. Activation is cleared unconditionally so nothing
    /// accrued earlier in the frame survives a same-frame release.
    pub fn on_pointer_up(&mut self) -> bool {
        if !self.enabled || !self.engaged {
            trace!("pointer up ignored: enabled={} engaged={}", self.enabled, self.engaged);
            return false;
        }
        self.reset_engagement();
        self.hook.engagement_ended();
        let notified = self.up_observers.notify();
        debug!("engagement ended ({notified} up observers)");
        true
    }

    /// Accumulates hold time. Returns true on the tick that activates.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.enabled || !self.engaged || self.activated {
            return false;
        }
        self.engaged_elapsed = self.engaged_elapsed.saturating_add(elapsed);
        if self.engaged_elapsed > self.activation_threshold {
            self.activated = true;
            self.hook.activated();
            debug!(
                "activated after {:?} (threshold {:?})",
                self.engaged_elapsed, self.activation_threshold
            );
            return true;
        }
        false
    }

    /// Float-seconds variant of [`tick`](Self::tick) for frame loops that
    /// measure `f32` deltas. Negative and NaN inputs clamp to zero; infinity
    /// saturates.
    pub fn tick_secs(&mut self, elapsed_secs: f32) -> bool {
        let clamped = if elapsed_secs > 0.0 { elapsed_secs } else { 0.0 };
        if clamped != elapsed_secs && !elapsed_secs.is_nan() {
            trace!("negative tick {elapsed_secs}s clamped to zero");
        }
        let elapsed = Duration::try_from_secs_f32(clamped).unwrap_or(Duration::MAX);
        self.tick(elapsed)
    }

    /// Gates interaction without touching subscriptions. Disabling while
    /// engaged cancels the engagement quietly: no up observers fire. Returns
    /// true when an engagement was cancelled.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.enabled = enabled;
        if enabled || !self.engaged {
            return false;
        }
        self.reset_engagement();
        self.hook.engagement_ended();
        debug!("engagement cancelled by disable");
        true
    }

    fn reset_engagement(&mut self) {
        self.engaged = false;
        self.engaged_elapsed = Duration::ZERO;
        self.activated = false;
    }

    pub fn subscribe_down(&self, observer: impl Fn() + Send + Sync + 'static) -> ObserverId {
        self.down_observers.subscribe(observer)
    }

    pub fn unsubscribe_down(&self, id: ObserverId) -> bool {
        self.down_observers.unsubscribe(id)
    }

    pub fn subscribe_up(&self, observer: impl Fn() + Send + Sync + 'static) -> ObserverId {
        self.up_observers.subscribe(observer)
    }

    pub fn unsubscribe_up(&self, id: ObserverId) -> bool {
        self.up_observers.unsubscribe(id)
    }

    /// Shared handle to the down list, for callbacks that need to unsubscribe.
    pub fn down_observers(&self) -> &ObserverList { &self.down_observers }
    pub fn up_observers(&self) -> &ObserverList { &self.up_observers }
}

impl<H: ActivationHook> fmt::Debug for HoldActivation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldActivation")
            .field("activation_threshold", &self.activation_threshold)
            .field("engaged", &self.engaged)
            .field("engaged_elapsed", &self.engaged_elapsed)
            .field("activated", &self.activated)
            .field("enabled", &self.enabled)
            .field("down_observers", &self.down_observers)
            .field("up_observers", &self.up_observers)
            .finish()
    }
}
