use std::time::{Duration, Instant};

use crossterm::event;

use super::event::TuiEvent;

/// Produces tick, render and terminal events in time order.
///
/// Tick and render events fire at their configured intervals; terminal
/// events interleave whenever crossterm has input ready. An unset
/// interval disables that event type, leaving only terminal events.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_interval: Option<Duration>,
    last_tick: Instant,
    last_render: Instant,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_interval: None,
            last_tick: now,
            last_render: now,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_interval(&mut self, interval: Option<Duration>) {
        self.render_interval = interval;
    }

    /// Blocks until the next due event and returns it.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                return Ok(TuiEvent::Tick);
            }

            if let Some(interval) = self.render_interval
                && now.duration_since(self.last_render) >= interval
            {
                self.last_render = now;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self
            .render_interval
            .map(|interval| self.last_render + interval);
        let next_due_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_due_at.saturating_duration_since(now))
    }
}
