//! Crowd observer trait for progress reporting and data collection.

use steer_agent::AgentBuffer;
use steer_core::Tick;

/// Callbacks invoked by [`Crowd::step`][crate::Crowd::step] and
/// [`Crowd::run`][crate::Crowd::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl CrowdObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, updated: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: steered {updated} agents");
///         }
///     }
/// }
/// ```
pub trait CrowdObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, after the buffer swap.
    ///
    /// `updated` is the number of agents whose behavior ran this tick.
    fn on_tick_end(&mut self, _tick: Tick, _updated: usize) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks) with the state just published for the next tick.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentBuffer) {}

    /// Called once after the final tick of [`Crowd::run`][crate::Crowd::run].
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`CrowdObserver`] that does nothing.
pub struct NoopObserver;

impl CrowdObserver for NoopObserver {}
