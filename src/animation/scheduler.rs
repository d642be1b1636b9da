// ============================================================================
// jux-reactive - Frame Schedulers
// The pluggable source of "next frame" callbacks driving timelines
// ============================================================================
//
// A request schedules exactly one future invocation carrying a timestamp in
// milliseconds. Requests made while frames are being delivered wait for the
// next delivery, so a timeline that re-requests from inside its frame
// callback advances once per tick.
//
// Two implementations share one queue:
// - HostFrameScheduler: the host pumps it from its own frame callback
// - VirtualFrameScheduler: a deterministic clock for tests
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use crate::core::constants::DEFAULT_FRAME_INTERVAL_MS;
use crate::error::{JuxError, Result};

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A source of frame callbacks.
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending request. Safe to call when it already ran or was
    /// cancelled; returns whether something was cancelled.
    fn cancel_frame(&self, handle: FrameHandle) -> bool;

    /// Whether any request is waiting.
    fn has_pending(&self) -> bool;
}

// =============================================================================
// FRAME QUEUE
// =============================================================================

#[derive(Default)]
struct FrameQueue {
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    next_id: Cell<u64>,
}

impl FrameQueue {
    fn request(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|(h, _)| *h != handle);
        pending.len() < before
    }

    fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Run everything that was pending when delivery began.
    fn deliver(&self, timestamp: f64) -> usize {
        let due: Vec<FrameHandle> = self.pending.borrow().iter().map(|(h, _)| *h).collect();
        let mut delivered = 0;
        for handle in due {
            // Taken one at a time: an earlier callback may cancel a later one
            let callback = {
                let mut pending = self.pending.borrow_mut();
                pending
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|index| pending.remove(index).1)
            };
            if let Some(callback) = callback {
                callback(timestamp);
                delivered += 1;
            }
        }
        delivered
    }
}

// =============================================================================
// HOST FRAME SCHEDULER
// =============================================================================

/// Scheduler driven by the host's own frame callback.
///
/// The host calls [`pump`](Self::pump) from its vsync-aligned callback with
/// the frame timestamp, or [`pump_now`](Self::pump_now) to use the time
/// elapsed since this scheduler was created.
pub struct HostFrameScheduler {
    queue: FrameQueue,
    origin: Instant,
}

impl HostFrameScheduler {
    pub fn new() -> Self {
        Self {
            queue: FrameQueue::default(),
            origin: Instant::now(),
        }
    }

    /// Deliver pending frames with `timestamp_ms`. Returns how many ran.
    pub fn pump(&self, timestamp_ms: f64) -> usize {
        self.queue.deliver(timestamp_ms)
    }

    /// Deliver pending frames stamped with the monotonic clock.
    pub fn pump_now(&self) -> usize {
        self.pump(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

impl Default for HostFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for HostFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.queue.request(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }
}

// =============================================================================
// VIRTUAL FRAME SCHEDULER
// =============================================================================

/// Deterministic scheduler with a virtual clock.
///
/// # Example
///
/// ```
/// use jux_reactive::animation::{FrameScheduler, VirtualFrameScheduler};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let scheduler = VirtualFrameScheduler::new();
/// let seen = Rc::new(Cell::new(0.0));
/// scheduler.request_frame(Box::new({
///     let seen = seen.clone();
///     move |ts| seen.set(ts)
/// }));
///
/// scheduler.tick_by(40.0);
/// assert_eq!(seen.get(), 40.0);
/// assert!(!scheduler.has_pending());
/// ```
pub struct VirtualFrameScheduler {
    queue: FrameQueue,
    now: Cell<f64>,
    frame_interval: f64,
}

impl VirtualFrameScheduler {
    /// A clock at zero advancing 1000/60 ms per `tick`.
    pub fn new() -> Self {
        Self {
            queue: FrameQueue::default(),
            now: Cell::new(0.0),
            frame_interval: DEFAULT_FRAME_INTERVAL_MS,
        }
    }

    /// A clock advancing `frame_interval_ms` per `tick`. The interval must
    /// be finite and positive, otherwise virtual time could never move.
    pub fn with_frame_interval(frame_interval_ms: f64) -> Result<Self> {
        if !(frame_interval_ms.is_finite() && frame_interval_ms > 0.0) {
            return Err(JuxError::illegal(format!(
                "frame interval {frame_interval_ms}ms must be finite and positive"
            )));
        }
        Ok(Self {
            frame_interval: frame_interval_ms,
            ..Self::new()
        })
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    /// Advance by one frame interval and deliver.
    pub fn tick(&self) -> usize {
        self.tick_by(self.frame_interval)
    }

    /// Advance by `delta_ms` and deliver pending frames once.
    pub fn tick_by(&self, delta_ms: f64) -> usize {
        let now = self.now.get() + delta_ms;
        self.now.set(now);
        self.queue.deliver(now)
    }

    /// Tick until nothing re-requests a frame or `max_virtual_ms` has
    /// passed. Returns true when the queue drained.
    pub fn run_until_idle(&self, max_virtual_ms: f64) -> bool {
        let deadline = self.now.get() + max_virtual_ms;
        while self.queue.has_pending() {
            if deadline.is_nan() || self.now.get() + self.frame_interval > deadline {
                return false;
            }
            self.tick();
        }
        true
    }
}

impl Default for VirtualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for VirtualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.queue.request(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }
}

// =============================================================================
// DEFAULT SCHEDULER
// =============================================================================

thread_local! {
    // The graph is Rc based and confined to one thread, so the default lives
    // per thread. Install once at startup, before the first timeline.
    static DEFAULT_SCHEDULER: RefCell<Option<Rc<dyn FrameScheduler>>> = const { RefCell::new(None) };
    static HANDED_OUT: Cell<bool> = const { Cell::new(false) };
}

/// Install the scheduler used by timelines created without one.
pub fn set_default_scheduler(scheduler: Rc<dyn FrameScheduler>) {
    if HANDED_OUT.with(Cell::get) {
        tracing::warn!("default frame scheduler replaced after timelines already captured it");
    }
    DEFAULT_SCHEDULER.with(|slot| *slot.borrow_mut() = Some(scheduler));
}

/// The installed default scheduler, creating a [`HostFrameScheduler`] on
/// first use if none was installed.
pub fn default_scheduler() -> Rc<dyn FrameScheduler> {
    HANDED_OUT.with(|flag| flag.set(true));
    DEFAULT_SCHEDULER.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(|| Rc::new(HostFrameScheduler::new()))
            .clone()
    })
}
