//! Application event routing
//!
//! `App` owns every piece of runtime state and handles one `AppEvent` at a
//! time on the UI thread. OS-facing side effects (menus, dialogs, sounds,
//! quitting) go through the `Shell` trait so the routing can run headless.

use battery_hud_core::{BatteryReader, Color, SettingsStore, StartRequest, TriggerDispatch};
use battery_hud_overlay::{HudController, OverlayPlatform, TickSource};

/// Everything the application reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    ManualTest,
    PowerStatusChanged,
    Tick,
    TrayMenuRequested,
    PickChargeColor,
    PickDischargeColor,
    ResetColors,
    ToggleShowOnUnplug,
    TogglePlaySound,
    Exit,
}

/// Check marks shown in the tray menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuChecks {
    pub show_on_unplug: bool,
    pub play_sound: bool,
}

/// OS-facing side effects
pub trait Shell {
    /// Show the tray menu and return the chosen entry, if any
    fn show_menu(&mut self, checks: MenuChecks) -> Option<AppEvent>;

    /// Let the user pick a color, starting from `initial`
    fn choose_color(&mut self, initial: Color) -> Option<Color>;

    /// Plug-in or unplug notification sound
    fn play_notification(&mut self, charging: bool);

    /// End the message loop
    fn quit(&mut self);
}

/// Collapse one drained batch of events.
///
/// Other events keep their order and at most one `Tick` follows them.
/// Ticks that piled up while a modal loop blocked the thread would
/// otherwise replay a whole animation at once, and a tick queued before a
/// restart belongs to the animation it replaced.
pub fn coalesce_events<I>(events: I) -> Vec<AppEvent>
where
    I: IntoIterator<Item = AppEvent>,
{
    let mut ticked = false;
    let mut batch: Vec<AppEvent> = events
        .into_iter()
        .filter(|event| {
            let tick = *event == AppEvent::Tick;
            ticked |= tick;
            !tick
        })
        .collect();
    if ticked {
        batch.push(AppEvent::Tick);
    }
    batch
}

pub struct App<P, T, B, S>
where
    P: OverlayPlatform,
    T: TickSource,
    B: BatteryReader,
    S: Shell,
{
    hud: HudController<P, T>,
    dispatch: TriggerDispatch,
    battery: B,
    settings: SettingsStore,
    shell: S,
}

impl<P, T, B, S> App<P, T, B, S>
where
    P: OverlayPlatform,
    T: TickSource,
    B: BatteryReader,
    S: Shell,
{
    /// Build the app, recording the current charging state as the baseline
    /// for edge detection
    pub fn new(hud: HudController<P, T>, battery: B, settings: SettingsStore, shell: S) -> Self {
        let initial = match battery.query() {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "initial battery query failed");
                None
            }
        };
        Self {
            hud,
            dispatch: TriggerDispatch::new(initial),
            battery,
            settings,
            shell,
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        if event != AppEvent::Tick {
            tracing::debug!(?event, "handling event");
        }

        match event {
            AppEvent::ManualTest => {
                if let Some(request) = self.dispatch.manual(&self.battery) {
                    self.start(request);
                }
            }
            AppEvent::PowerStatusChanged => {
                let visible = self.hud.is_visible();
                if let Some(request) = self.dispatch.power_status_changed(
                    visible,
                    &self.battery,
                    self.settings.settings(),
                ) {
                    self.start(request);
                }
            }
            AppEvent::Tick => {
                self.hud.on_tick();
            }
            AppEvent::TrayMenuRequested => {
                let current = self.settings.settings();
                let checks = MenuChecks {
                    show_on_unplug: current.show_on_unplug,
                    play_sound: current.play_sound,
                };
                match self.shell.show_menu(checks) {
                    Some(AppEvent::TrayMenuRequested) | None => {}
                    Some(choice) => self.handle(choice),
                }
            }
            AppEvent::PickChargeColor => {
                let initial = self.settings.settings().charge_color;
                if let Some(color) = self.shell.choose_color(initial) {
                    self.settings.set_charge_color(color);
                }
            }
            AppEvent::PickDischargeColor => {
                let initial = self.settings.settings().discharge_color;
                if let Some(color) = self.shell.choose_color(initial) {
                    self.settings.set_discharge_color(color);
                }
            }
            AppEvent::ResetColors => self.settings.reset_colors(),
            AppEvent::ToggleShowOnUnplug => {
                let enabled = self.settings.toggle_show_on_unplug();
                tracing::info!(enabled, "show on unplug toggled");
            }
            AppEvent::TogglePlaySound => {
                let enabled = self.settings.toggle_play_sound();
                tracing::info!(enabled, "play sound toggled");
            }
            AppEvent::Exit => {
                tracing::info!("exit requested");
                self.shell.quit();
            }
        }
    }

    fn start(&mut self, request: StartRequest) {
        if request.play_sound {
            self.shell.play_notification(request.charging);
        }
        self.hud
            .start(request.percent, request.charging, self.settings.settings());
    }

    pub fn hud(&self) -> &HudController<P, T> {
        &self.hud
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }
}
