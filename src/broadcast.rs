//! # Broadcast Module
//!
//! Periodic fanout of the encoded IBUS frame to registered listeners.
//!
//! The [`Broadcaster`] is the public handle of this crate: it owns the
//! channel store, the frame encoder, the listener list, and the timer task.
//! Listeners receive the raw frame bytes on every tick and are expected to
//! push them at a physical link (serial port, radio module); this module makes
//! no assumption about that link.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::config::Config;
use crate::error::{IbusError, Result};
use crate::ibus::channels::ChannelStore;
use crate::ibus::encoder::FrameEncoder;
use crate::ibus::protocol::{FrameBuffer, IBUS_MIN_INTERVAL_MS, IBUS_NUM_CHANNELS};

/// A registered frame recipient
///
/// Invoked synchronously with a borrow of the shared frame buffer. The bytes
/// are only valid for the duration of the call; copy them out for a stable
/// snapshot across ticks.
pub type Listener = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// State shared between the public handle and the timer task
///
/// One logical writer: all mutation happens under this lock, and the lock is
/// never held across an await, so listener delivery within a tick is
/// sequential and never interleaves with encode/update calls.
struct Shared {
    store: ChannelStore,
    encoder: FrameEncoder,
    listeners: Vec<Listener>,
}

/// IBUS frame broadcaster
///
/// Idle after construction; [`start`](Broadcaster::start) spawns a periodic
/// timer task that delivers the current frame to every listener in
/// registration order, and [`stop`](Broadcaster::stop) tears it down again.
/// Update calls are valid in either state.
///
/// # Examples
///
/// ```no_run
/// use ibus_tx::broadcast::Broadcaster;
/// use ibus_tx::config::Config;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut ibus = Broadcaster::new(Config::default());
///     ibus.listen(|frame| println!("frame: {:02x?}", frame))?;
///     ibus.start(Some(&[1000, 2000, 1500]), None)?;
///     tokio::time::sleep(std::time::Duration::from_millis(100)).await;
///     ibus.stop();
///     Ok(())
/// }
/// ```
pub struct Broadcaster {
    shared: Arc<Mutex<Shared>>,
    /// Broadcast period, floored to [`IBUS_MIN_INTERVAL_MS`]
    period: Duration,
    max_listeners: usize,
    /// Timer task handle while running
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("period", &self.period)
            .field("max_listeners", &self.max_listeners)
            .field("running", &self.task.is_some())
            .finish_non_exhaustive()
    }
}

impl Broadcaster {
    /// Create an idle broadcaster from the given configuration
    ///
    /// All 14 channels start at `default_value` and the frame buffer holds a
    /// full initial encode, so listeners registered before any update still
    /// receive a valid frame. Broadcast periods below 7ms are floored to 7ms.
    pub fn new(config: Config) -> Self {
        let mut encoder = FrameEncoder::new();
        let store = ChannelStore::new(
            config.channels.min_value,
            config.channels.max_value,
            config.channels.default_value,
        );
        encoder.encode(&store, IBUS_NUM_CHANNELS);

        Self {
            shared: Arc::new(Mutex::new(Shared {
                store,
                encoder,
                listeners: Vec::new(),
            })),
            period: Duration::from_millis(config.broadcast.interval_ms.max(IBUS_MIN_INTERVAL_MS)),
            max_listeners: config.broadcast.max_listeners,
            task: None,
        }
    }

    /// Lock the shared state, recovering from a poisoned lock
    ///
    /// A panicking listener must not wedge the transmitter; the state itself
    /// stays consistent because every mutation completes before delivery.
    fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
        shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Update the leading channels and re-encode the frame
    ///
    /// Values are clamped into the configured range, never rejected. Only the
    /// channels actually provided are re-encoded; the rest of the frame keeps
    /// its previous bytes.
    ///
    /// # Arguments
    ///
    /// * `values` - Up to 14 channel values in microseconds; extra values are ignored
    ///
    /// # Returns
    ///
    /// * `FrameBuffer` - Copy of the frame after the update
    pub fn update(&self, values: &[u16]) -> FrameBuffer {
        let mut guard = Self::lock(&self.shared);
        let shared = &mut *guard;
        let written = shared.store.set_all(values);
        *shared.encoder.encode(&shared.store, written)
    }

    /// Update a single channel by index and re-encode up to it
    ///
    /// # Errors
    ///
    /// Returns [`IbusError::ChannelOutOfBounds`] for `index >= 14`; the frame
    /// is left untouched and a running broadcast is unaffected.
    pub fn update_channel(&self, index: usize, value: u16) -> Result<FrameBuffer> {
        let mut guard = Self::lock(&self.shared);
        let shared = &mut *guard;
        shared.store.set_one(index, value)?;
        Ok(*shared.encoder.encode(&shared.store, index + 1))
    }

    /// Register a listener to receive the frame on every broadcast tick
    ///
    /// Listeners are invoked in registration order. Valid whether or not the
    /// broadcaster is running, but note that [`start`](Broadcaster::start)
    /// while running clears the listener list first.
    ///
    /// # Errors
    ///
    /// Returns [`IbusError::MaxListenersExceeded`] when the list is already
    /// at the configured capacity; no registration occurs.
    pub fn listen<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        let mut guard = Self::lock(&self.shared);
        if guard.listeners.len() >= self.max_listeners {
            return Err(IbusError::MaxListenersExceeded {
                max: self.max_listeners,
            });
        }

        guard.listeners.push(Box::new(listener));
        Ok(())
    }

    /// Begin periodic broadcasting
    ///
    /// If already running this performs a full [`stop`](Broadcaster::stop)
    /// first, which cancels the timer *and clears all listeners* before the
    /// new session begins. Callers mixing persistent listeners with repeated
    /// `start` calls must re-register after every restart.
    ///
    /// # Arguments
    ///
    /// * `values` - Optional channel values stored and fully re-encoded before the first tick
    /// * `listener` - Optional listener registered for this session
    ///
    /// # Errors
    ///
    /// Returns [`IbusError::MaxListenersExceeded`] if `listener` is given and
    /// the list is already full.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the timer task is
    /// spawned onto the current runtime.
    pub fn start(&mut self, values: Option<&[u16]>, listener: Option<Listener>) -> Result<()> {
        if self.task.is_some() {
            debug!("broadcaster already running, restarting");
            self.stop();
        }

        if let Some(listener) = listener {
            self.listen(listener)?;
        }

        if let Some(values) = values {
            let mut guard = Self::lock(&self.shared);
            let shared = &mut *guard;
            shared.store.set_all(values);
            shared.encoder.encode(&shared.store, IBUS_NUM_CHANNELS);
        }

        debug!(period_ms = self.period.as_millis() as u64, "starting IBUS broadcast");

        let shared = Arc::clone(&self.shared);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let mut guard = Self::lock(&shared);
                let shared = &mut *guard;
                // No implicit re-encode: the frame reflects the last explicit
                // encode at the time of the tick
                let frame = shared.encoder.frame();
                for listener in shared.listeners.iter_mut() {
                    listener(frame);
                }
            }
        }));

        Ok(())
    }

    /// Cancel the broadcast timer and clear all listeners
    ///
    /// Idempotent; calling while idle is a no-op. Acquiring the state lock
    /// after aborting the timer task means an in-flight tick finishes its
    /// deliveries before `stop` returns, and no listener is invoked
    /// afterwards.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("IBUS broadcast stopped");
        }

        Self::lock(&self.shared).listeners.clear();
    }

    /// Whether the broadcast timer is currently active
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        Self::lock(&self.shared).listeners.len()
    }

    /// Copy of the current frame buffer
    pub fn frame(&self) -> FrameBuffer {
        *Self::lock(&self.shared).encoder.frame()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Broadcaster {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
