//! Scenario tests for the HUD state machine
//!
//! Drive the state tick by tick and check counters and phases at the
//! boundaries between entrance, hold and fade-out.

use battery_hud_types::{AppSettings, hud_colors};

use crate::state::{ANIM_FRAMES, FADEOUT_FRAMES, HOLD_FRAMES, HudState, Phase, TickOutcome};

/// Ticks from start until the fade-out begins
const TICKS_TO_FADE: u32 = ANIM_FRAMES + HOLD_FRAMES + 1;

fn started(percent: u8, charging: bool) -> HudState {
    let mut state = HudState::new();
    state.start_animation(percent, charging, &AppSettings::default());
    state
}

fn advance(state: &mut HudState, ticks: u32) -> Vec<TickOutcome> {
    (0..ticks).map(|_| state.tick()).collect()
}

#[test]
fn new_state_is_idle() {
    let state = HudState::new();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.is_visible());
}

#[test]
fn percent_is_clamped_on_start() {
    for percent in 0..=150u8 {
        let state = started(percent, true);
        assert_eq!(state.battery_percent(), percent.min(100));
    }
    assert_eq!(started(255, false).battery_percent(), 100);
}

#[test]
fn start_resets_counters_and_shows() {
    let state = started(42, false);
    assert!(state.is_visible());
    assert!(!state.is_fading_out());
    assert!(!state.is_charging());
    assert_eq!(state.anim_frame(), 0);
    assert_eq!(state.hold_frame(), 0);
    assert_eq!(state.phase(), Phase::Entering);
}

#[test]
fn entering_counts_ticks() {
    for n in 0..ANIM_FRAMES {
        let mut state = started(50, true);
        advance(&mut state, n);
        assert_eq!(state.anim_frame(), n);
        assert_eq!(state.phase(), Phase::Entering);
    }
}

#[test]
fn entrance_completes_into_holding() {
    let mut state = started(50, true);
    advance(&mut state, ANIM_FRAMES);
    assert_eq!(state.anim_frame(), ANIM_FRAMES);
    assert_eq!(state.hold_frame(), 0);
    assert_eq!(state.phase(), Phase::Holding);

    state.tick();
    assert_eq!(state.anim_frame(), ANIM_FRAMES);
    assert_eq!(state.hold_frame(), 1);
}

#[test]
fn holding_lasts_until_counter_exceeds_limit() {
    let mut state = started(50, true);
    advance(&mut state, TICKS_TO_FADE - 1);
    assert_eq!(state.phase(), Phase::Holding);
    assert_eq!(state.hold_frame(), HOLD_FRAMES);

    assert_eq!(state.tick(), TickOutcome::Continue);
    assert_eq!(state.phase(), Phase::FadingOut);
    assert_eq!(state.hold_frame(), FADEOUT_FRAMES);
}

#[test]
fn fade_out_returns_to_idle() {
    let mut state = started(50, true);
    let outcomes = advance(&mut state, TICKS_TO_FADE + FADEOUT_FRAMES);

    let (last, rest) = outcomes.split_last().unwrap();
    assert_eq!(*last, TickOutcome::Finished);
    assert!(rest.iter().all(|o| *o == TickOutcome::Continue));

    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.is_visible());
    assert_eq!(state.anim_frame(), 0);
    assert_eq!(state.hold_frame(), 0);
}

#[test]
fn ticks_after_finish_are_inactive() {
    let mut state = started(50, true);
    advance(&mut state, TICKS_TO_FADE + FADEOUT_FRAMES);

    for _ in 0..5 {
        assert_eq!(state.tick(), TickOutcome::Inactive);
    }
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.anim_frame(), 0);
}

#[test]
fn fade_counter_counts_down() {
    let mut state = started(50, true);
    advance(&mut state, TICKS_TO_FADE);
    for remaining in (1..FADEOUT_FRAMES).rev() {
        state.tick();
        assert_eq!(state.hold_frame(), remaining);
        assert_eq!(state.phase(), Phase::FadingOut);
    }
}

#[test]
fn restart_mid_fade_starts_over() {
    let mut state = started(10, true);
    advance(&mut state, TICKS_TO_FADE + 5);
    assert_eq!(state.phase(), Phase::FadingOut);

    state.start_animation(90, false, &AppSettings::default());
    assert_eq!(state.phase(), Phase::Entering);
    assert_eq!(state.anim_frame(), 0);
    assert_eq!(state.hold_frame(), 0);
    assert!(!state.is_fading_out());
    assert_eq!(state.battery_percent(), 90);
    assert_eq!(state.theme_color(), hud_colors::DISCHARGE_AMBER);
}

#[test]
fn restart_mid_hold_starts_over() {
    let mut state = started(50, true);
    advance(&mut state, ANIM_FRAMES + 40);
    state.start_animation(50, true, &AppSettings::default());
    assert_eq!(state.anim_frame(), 0);
    assert_eq!(state.hold_frame(), 0);

    // A full run is needed again after the restart
    let outcomes = advance(&mut state, TICKS_TO_FADE + FADEOUT_FRAMES);
    assert_eq!(outcomes.last(), Some(&TickOutcome::Finished));
}

#[test]
fn theme_color_is_fixed_for_the_run() {
    let mut state = started(50, true);
    let color = state.theme_color();
    assert_eq!(color, hud_colors::CHARGE_GREEN);

    advance(&mut state, ANIM_FRAMES + 10);
    assert_eq!(state.theme_color(), color);
}

#[test]
fn theme_color_follows_policy() {
    assert_eq!(started(15, true).theme_color(), hud_colors::ALERT_RED);
    assert_eq!(started(50, true).theme_color(), hud_colors::CHARGE_GREEN);

    let settings = AppSettings {
        discharge_color: [9, 8, 7, 255],
        use_custom_discharge_color: true,
        ..Default::default()
    };
    let mut state = HudState::new();
    state.start_animation(50, false, &settings);
    assert_eq!(state.theme_color(), [9, 8, 7, 255]);
}
