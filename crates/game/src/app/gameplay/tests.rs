use explorer_engine::{
    parse_scene_description, ArtifactDef, ArtifactMarker, FramePump, FrameView, KeyId,
    ManualScheduler, RenderSink, Scene, SceneDescription, TickScheduler,
};
use std::path::Path;

use super::interaction::{
    InteractionEvent, ALL_FOUND_MESSAGE, GREAT_DISCOVERY_MESSAGE, MISSION_COMPLETE_MESSAGE,
};
use super::proximity::EXPLORE_PROMPT;
use super::scene_impl::ExplorationScene;
use super::state::GameState;
use super::world::{ArtifactId, WorldConfig, WorldModel};

fn description_at(xs: &[f32]) -> SceneDescription {
    SceneDescription {
        defs: vec![
            ArtifactDef {
                id: "wheel".to_string(),
                name: "Wheel".to_string(),
                description: "The wheel first appeared in Mesopotamia.".to_string(),
            },
            ArtifactDef {
                id: "plow".to_string(),
                name: "Seed Plow".to_string(),
                description: "Farmers planted in straight rows.".to_string(),
            },
        ],
        markers: xs
            .iter()
            .enumerate()
            .map(|(index, x)| ArtifactMarker {
                type_id: if index % 2 == 0 { "wheel" } else { "plow" }.to_string(),
                x: *x,
            })
            .collect(),
    }
}

fn state_at(xs: &[f32]) -> GameState {
    let world = WorldModel::build(WorldConfig::default(), &description_at(xs)).expect("world");
    GameState::new(world)
}

fn tick_n(state: &mut GameState, ticks: usize) {
    for _ in 0..ticks {
        state.tick();
    }
}

/// Walks onto the artifact, ticks once so it becomes active, then presses E.
fn inspect(state: &mut GameState, x: f32) -> Option<InteractionEvent> {
    state.place_player(x);
    state.tick();
    let event = state.key_down(KeyId::KeyE, false);
    state.key_up(KeyId::KeyE);
    event
}

#[test]
fn initial_state_matches_startup_expectations() {
    let state = state_at(&[300.0, 700.0]);
    let view = state.view();

    assert_eq!(state.player_x(), 100.0);
    assert_eq!(view.message, EXPLORE_PROMPT);
    assert_eq!(view.found_counter, "Artifacts found: 0 / 2");
    assert!(!view.popup_visible());
    assert_eq!(view.markers.len(), 2);
}

#[test]
fn position_stays_in_world_bounds_under_sustained_input() {
    let mut state = state_at(&[]);
    let max_x = state.world().config().max_player_x();

    state.key_down(KeyId::ArrowLeft, false);
    for _ in 0..100 {
        state.tick();
        assert!((0.0..=max_x).contains(&state.player_x()));
    }
    assert_eq!(state.player_x(), 0.0);
    state.key_up(KeyId::ArrowLeft);

    state.key_down(KeyId::KeyD, false);
    for _ in 0..1000 {
        state.tick();
        assert!((0.0..=max_x).contains(&state.player_x()));
    }
    assert_eq!(state.player_x(), max_x);
}

#[test]
fn camera_tracks_clamp_formula_across_the_world() {
    let mut state = state_at(&[]);
    let config = *state.world().config();
    state.place_player(0.0);
    state.key_down(KeyId::ArrowRight, false);

    for _ in 0..700 {
        state.tick();
        let expected = (state.player_x() - config.viewport_width / 2.0)
            .clamp(0.0, config.world_width - config.viewport_width);
        assert_eq!(state.camera_x(), expected);
        let view = state.view();
        assert_eq!(view.world_offset_x, -expected);
        assert_eq!(view.player_screen_x, state.player_x() - expected);
    }
}

#[test]
fn opposite_keys_cancel_for_a_tick() {
    let mut state = state_at(&[]);
    state.place_player(500.0);
    state.key_down(KeyId::KeyA, false);
    state.key_down(KeyId::ArrowRight, false);

    state.tick();

    assert_eq!(state.player_x(), 500.0);
}

#[test]
fn proximity_selects_within_threshold_only() {
    let mut state = state_at(&[100.0, 500.0, 900.0]);

    state.place_player(150.0);
    state.tick();
    assert_eq!(state.active_artifact(), Some(ArtifactId(0)));
    assert_eq!(state.message(), "You see a Wheel. Press E to inspect it.");

    state.place_player(170.0);
    state.tick();
    assert_eq!(state.active_artifact(), None);
    assert_eq!(state.message(), EXPLORE_PROMPT);
}

#[test]
fn inspecting_collects_once_and_collected_never_reactivates() {
    let mut state = state_at(&[100.0, 500.0, 900.0]);

    let event = inspect(&mut state, 500.0).expect("opened");
    assert!(matches!(
        event,
        InteractionEvent::Opened {
            artifact: ArtifactId(1),
            found: 1,
            total: 3
        }
    ));
    assert_eq!(state.found_count(), 1);
    assert!(state.world().artifact(ArtifactId(1)).expect("artifact").collected);
    assert_eq!(state.message(), GREAT_DISCOVERY_MESSAGE);

    let view = state.view();
    let popup = view.popup.as_ref().expect("popup");
    assert_eq!(popup.title, "Seed Plow");
    assert_eq!(view.found_counter, "Artifacts found: 1 / 3");
    assert!(view.markers[1].collected);
    assert!(view.markers[1].active);

    state.key_down(KeyId::Escape, false);
    tick_n(&mut state, 3);
    assert_eq!(state.active_artifact(), None);
    assert_eq!(state.key_down(KeyId::KeyE, false), None);
    assert_eq!(state.found_count(), 1);
}

#[test]
fn auto_repeat_interact_does_not_open() {
    let mut state = state_at(&[100.0]);
    state.tick();

    assert_eq!(state.key_down(KeyId::KeyE, true), None);
    assert!(!state.is_popup_open());
}

#[test]
fn closing_reports_exploration_prompt_until_all_found() {
    let mut state = state_at(&[100.0, 500.0]);

    inspect(&mut state, 100.0).expect("first");
    let closed = state.key_down(KeyId::Space, false).expect("closed");
    assert_eq!(closed.message(), EXPLORE_PROMPT);
    assert_eq!(state.message(), EXPLORE_PROMPT);

    inspect(&mut state, 500.0).expect("second");
    assert_eq!(state.message(), ALL_FOUND_MESSAGE);
    state.key_down(KeyId::Enter, false).expect("closed");
    assert_eq!(state.message(), MISSION_COMPLETE_MESSAGE);

    tick_n(&mut state, 5);
    assert_eq!(state.message(), EXPLORE_PROMPT);
}

#[test]
fn mission_complete_lasts_only_until_the_next_idle_tick() {
    let mut state = state_at(&[100.0]);
    inspect(&mut state, 100.0).expect("opened");
    state.key_down(KeyId::Escape, false).expect("closed");
    assert_eq!(state.message(), MISSION_COMPLETE_MESSAGE);

    state.tick();

    assert_eq!(state.active_artifact(), None);
    assert_eq!(state.message(), EXPLORE_PROMPT);
}

#[test]
fn movement_is_frozen_while_popup_open_and_not_replayed() {
    let mut state = state_at(&[300.0]);
    inspect(&mut state, 300.0).expect("opened");

    state.key_down(KeyId::ArrowRight, false);
    tick_n(&mut state, 30);
    assert_eq!(state.player_x(), 300.0);
    state.key_up(KeyId::ArrowRight);

    state.key_down(KeyId::Escape, false);
    state.tick();
    assert_eq!(state.player_x(), 300.0);
}

#[test]
fn movement_held_through_close_resumes_from_frozen_position() {
    let mut state = state_at(&[300.0]);
    let speed = state.world().config().player_speed;
    inspect(&mut state, 300.0).expect("opened");

    state.key_down(KeyId::KeyD, false);
    tick_n(&mut state, 20);
    assert_eq!(state.player_x(), 300.0);

    state.key_down(KeyId::Enter, false).expect("closed");
    assert_eq!(state.player_x(), 300.0);
    state.tick();

    assert_eq!(state.player_x(), 300.0 + speed);
}

#[test]
fn keys_other_than_close_keep_popup_open() {
    let mut state = state_at(&[300.0]);
    inspect(&mut state, 300.0).expect("opened");

    for key in [KeyId::KeyE, KeyId::KeyA, KeyId::ArrowLeft, KeyId::KeyD] {
        assert_eq!(state.key_down(key, false), None);
        state.key_up(key);
    }
    assert!(state.is_popup_open());
}

#[test]
fn interact_pressed_during_popup_is_not_deferred_past_close() {
    let mut state = state_at(&[300.0, 320.0]);
    inspect(&mut state, 300.0).expect("opened");

    assert_eq!(state.key_down(KeyId::KeyE, false), None);
    state.key_down(KeyId::Escape, false).expect("closed");
    state.tick();

    assert_eq!(state.active_artifact(), Some(ArtifactId(1)));
    assert!(!state.is_popup_open());
    assert_eq!(state.found_count(), 1);
}

#[test]
fn proximity_changes_are_not_committed_while_open() {
    let mut state = state_at(&[300.0, 330.0]);
    inspect(&mut state, 300.0).expect("opened");
    let message = state.message().to_string();

    state.place_player(330.0);
    state.tick();

    assert_eq!(state.active_artifact(), Some(ArtifactId(0)));
    assert_eq!(state.message(), message);
}

#[test]
fn close_while_exploring_is_noop() {
    let mut state = state_at(&[100.0]);
    state.tick();
    let message = state.message().to_string();

    assert_eq!(state.close_popup(), None);
    assert_eq!(state.key_down(KeyId::Escape, false), None);
    assert!(!state.is_popup_open());
    assert_eq!(state.message(), message);
}

#[test]
fn interact_out_of_range_does_nothing() {
    let mut state = state_at(&[900.0]);
    state.tick();

    assert_eq!(state.key_down(KeyId::KeyE, false), None);
    assert_eq!(state.found_count(), 0);
}

#[derive(Default)]
struct CapturingSink {
    frames: Vec<FrameView>,
}

impl RenderSink for CapturingSink {
    type Error = std::convert::Infallible;

    fn present(&mut self, view: &FrameView) -> Result<(), Self::Error> {
        self.frames.push(view.clone());
        Ok(())
    }
}

#[test]
fn scene_driven_by_manual_scheduler_walks_and_inspects() {
    let raw = r#"<Scene>
  <ArtifactDef id="wheel" name="Wheel">Round.</ArtifactDef>
  <Artifact type="wheel" x="140" />
</Scene>"#;
    let description = parse_scene_description(Path::new("scene.xml"), raw).expect("scene");
    let world = WorldModel::build(WorldConfig::default(), &description).expect("world");
    let mut scene = ExplorationScene::new(world);
    let mut pump = FramePump::new(60, std::time::Duration::from_millis(250), 5);
    let mut sink = CapturingSink::default();
    let mut scheduler = ManualScheduler::new();

    scene.load();
    scene.key_down(KeyId::KeyD, false);
    scheduler.request_next_tick();
    let mut frames = 0;
    while frames < 10 && scheduler.take_pending() {
        pump.step(&mut scene, &mut sink, &mut scheduler)
            .expect("step");
        frames += 1;
    }
    scene.key_up(KeyId::KeyD);

    assert_eq!(scene.state().player_x(), 140.0);
    assert_eq!(scene.state().active_artifact(), Some(ArtifactId(0)));

    scene.key_down(KeyId::KeyE, false);
    scheduler.request_next_tick();
    assert!(scheduler.take_pending());
    pump.step(&mut scene, &mut sink, &mut scheduler)
        .expect("step");
    let last = sink.frames.last().expect("frame");
    assert!(last.popup_visible());
    assert_eq!(last.found_counter, "Artifacts found: 1 / 1");

    scene.activate_close_control();
    assert!(!scene.frame_view().popup_visible());
    assert_eq!(scene.frame_view().message, MISSION_COMPLETE_MESSAGE);
}

#[test]
fn reload_resets_progress() {
    let world = WorldModel::build(WorldConfig::default(), &description_at(&[100.0])).expect("world");
    let mut scene = ExplorationScene::new(world);
    scene.load();
    scene.tick();
    scene.key_down(KeyId::KeyE, false);
    assert_eq!(scene.state().found_count(), 1);

    scene.load();

    assert_eq!(scene.state().found_count(), 0);
    assert!(!scene.state().is_popup_open());
    assert!(!scene.frame_view().markers[0].collected);
}

#[test]
fn debug_title_reports_progress() {
    let world = WorldModel::build(WorldConfig::default(), &description_at(&[100.0])).expect("world");
    let scene = ExplorationScene::new(world);
    let title = scene.debug_title().expect("title");
    assert!(title.contains("found 0 / 1"), "{title}");
}
