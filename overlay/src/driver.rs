//! Animation driver
//!
//! `HudController` owns the HUD state, the badge renderer, the surface and
//! the periodic tick source. Every tick advances the state machine by one
//! frame and redraws; the tick source is stopped exactly once when the
//! animation completes.
//!
//! Two ways to drive it: a message loop feeding `on_tick` from an
//! event-driven source (the Win32 `WindowTimer`), or `run_until_idle` with an
//! `IntervalTicker` on hosts without a window message queue, such as the
//! headless surface.

use std::thread;
use std::time::{Duration, Instant};

use battery_hud_core::{AppSettings, HudState, TICK_INTERVAL, TickOutcome};

use crate::badge::HudRenderer;
use crate::platform::OverlayPlatform;

/// A periodic tick source
pub trait TickSource {
    /// Begin ticking (no-op when already running)
    fn start(&mut self);

    /// Stop ticking (no-op when already stopped)
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Block until the next tick is due.
    ///
    /// Returns false once the source is stopped. Event-driven sources whose
    /// ticks arrive through a message queue do not block.
    fn wait(&mut self) -> bool {
        self.is_running()
    }
}

/// Cooperative fixed-interval ticker that sleeps until the next tick.
///
/// The portable tick source for `HudController::run_until_idle`, used where
/// no window timer exists.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) {
        if self.next.is_none() {
            self.next = Some(Instant::now() + self.interval);
        }
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn is_running(&self) -> bool {
        self.next.is_some()
    }

    fn wait(&mut self) -> bool {
        let Some(due) = self.next else {
            return false;
        };
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        // Schedule from the due time so sleeps don't accumulate drift,
        // but never try to catch up on missed ticks.
        self.next = Some((due + self.interval).max(Instant::now()));
        true
    }
}

/// Owns everything needed to run one HUD animation at a time
pub struct HudController<P: OverlayPlatform, T: TickSource> {
    state: HudState,
    renderer: HudRenderer,
    surface: P,
    ticker: T,
}

impl<P: OverlayPlatform, T: TickSource> HudController<P, T> {
    pub fn new(surface: P, ticker: T) -> Self {
        Self {
            state: HudState::new(),
            renderer: HudRenderer::new(),
            surface,
            ticker,
        }
    }

    /// Start or restart the animation and make sure the ticker runs
    pub fn start(&mut self, percent: u8, charging: bool, settings: &AppSettings) {
        self.state.start_animation(percent, charging, settings);
        if !self.ticker.is_running() {
            self.ticker.start();
        }
    }

    /// Advance one frame and redraw
    pub fn on_tick(&mut self) -> TickOutcome {
        let outcome = self.state.tick();
        match outcome {
            TickOutcome::Continue => self.render(),
            TickOutcome::Finished => {
                // Final transparent frame clears the surface
                self.render();
                self.ticker.stop();
                tracing::debug!("animation tick stopped");
            }
            TickOutcome::Inactive => {
                if self.ticker.is_running() {
                    self.ticker.stop();
                }
            }
        }
        outcome
    }

    /// Drive the animation on the calling thread until it returns to Idle.
    ///
    /// Blocks in `TickSource::wait` between frames, so it pairs with a
    /// sleeping source like `IntervalTicker`. Returns the number of ticks
    /// processed.
    pub fn run_until_idle(&mut self) -> u32 {
        let mut ticks = 0;
        while self.state.is_visible() && self.ticker.wait() {
            ticks += 1;
            if self.on_tick() != TickOutcome::Continue {
                break;
            }
        }
        ticks
    }

    fn render(&mut self) {
        if let Err(e) = self.renderer.render(&self.state, &mut self.surface) {
            tracing::debug!(error = %e, "frame skipped");
        }
    }

    pub fn state(&self) -> &HudState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OverlayConfig;
    use crate::platform::headless::HeadlessSurface;
    use battery_hud_core::{ANIM_FRAMES, FADEOUT_FRAMES, HOLD_FRAMES, Phase};

    #[derive(Default)]
    struct RecordingTicker {
        running: bool,
        starts: u32,
        stops: u32,
    }

    impl TickSource for RecordingTicker {
        fn start(&mut self) {
            if !self.running {
                self.running = true;
                self.starts += 1;
            }
        }

        fn stop(&mut self) {
            if self.running {
                self.running = false;
                self.stops += 1;
            }
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    const TOTAL_TICKS: u32 = ANIM_FRAMES + HOLD_FRAMES + 1 + FADEOUT_FRAMES;

    fn controller() -> HudController<HeadlessSurface, RecordingTicker> {
        let surface = HeadlessSurface::new(&OverlayConfig::default());
        HudController::new(surface, RecordingTicker::default())
    }

    #[test]
    fn full_run_stops_ticker_once() {
        let mut hud = controller();
        hud.start(80, true, &AppSettings::default());
        assert!(hud.ticker().is_running());

        let ticks = hud.run_until_idle();
        assert_eq!(ticks, TOTAL_TICKS);
        assert_eq!(hud.state().phase(), Phase::Idle);
        assert!(!hud.is_visible());
        assert_eq!(hud.ticker().stops, 1);

        // Stray ticks after completion change nothing
        assert_eq!(hud.on_tick(), TickOutcome::Inactive);
        assert_eq!(hud.ticker().stops, 1);
    }

    #[test]
    fn every_tick_presents_a_frame() {
        let mut hud = controller();
        hud.start(50, false, &AppSettings::default());
        hud.run_until_idle();
        assert_eq!(hud.surface().present_count(), TOTAL_TICKS as usize);
        // Last frame clears the surface
        assert_eq!(hud.surface().last_alpha(), Some(0));
        assert!(hud.surface().presented().iter().all(|&b| b == 0));
    }

    #[test]
    fn restart_keeps_single_ticker() {
        let mut hud = controller();
        hud.start(50, true, &AppSettings::default());
        for _ in 0..ANIM_FRAMES + HOLD_FRAMES + 5 {
            hud.on_tick();
        }
        assert_eq!(hud.state().phase(), Phase::FadingOut);

        hud.start(60, true, &AppSettings::default());
        assert_eq!(hud.state().phase(), Phase::Entering);
        assert_eq!(hud.ticker().starts, 1);

        assert_eq!(hud.run_until_idle(), TOTAL_TICKS);
        assert_eq!(hud.ticker().stops, 1);
    }

    #[test]
    fn stray_tick_stops_running_ticker() {
        let mut hud = controller();
        hud.ticker.start();
        assert_eq!(hud.on_tick(), TickOutcome::Inactive);
        assert!(!hud.ticker().is_running());
        assert_eq!(hud.surface().present_count(), 0);
    }

    #[test]
    fn present_failures_do_not_stop_animation() {
        let mut hud = controller();
        hud.surface_mut().set_fail_presents(true);
        hud.start(50, true, &AppSettings::default());
        assert_eq!(hud.run_until_idle(), TOTAL_TICKS);
        assert_eq!(hud.surface().present_count(), 0);
        assert_eq!(hud.ticker().stops, 1);
    }

    #[test]
    fn interval_ticker_drives_full_run() {
        let surface = HeadlessSurface::new(&OverlayConfig::default());
        let mut hud = HudController::new(surface, IntervalTicker::new(Duration::from_millis(1)));
        hud.start(40, false, &AppSettings::default());

        assert_eq!(hud.run_until_idle(), TOTAL_TICKS);
        assert!(!hud.ticker().is_running());
        assert_eq!(hud.surface().last_alpha(), Some(0));
    }

    #[test]
    fn interval_ticker_paces_ticks() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(2));
        assert!(!ticker.wait());

        let started = Instant::now();
        ticker.start();
        for _ in 0..3 {
            assert!(ticker.wait());
        }
        assert!(started.elapsed() >= Duration::from_millis(6));

        ticker.stop();
        assert!(!ticker.is_running());
        assert!(!ticker.wait());
    }
}
