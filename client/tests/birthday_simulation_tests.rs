use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use birthday_client::character::{IDLE_CLIP, WALK_CLIP};
use birthday_client::input::{InputState, MovementKeys};
use birthday_client::settings::GameSettings;
use birthday_client::{BirthdaySession, BirthdaySimulationPlugin};

const FRAME: Duration = Duration::from_millis(16);

fn simulation_app(session: Option<BirthdaySession>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    if let Some(session) = session {
        app.insert_resource(session);
    }
    app.add_plugins(BirthdaySimulationPlugin);
    app.update();
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn cake_beside_spawn() -> BirthdaySession {
    let mut settings = GameSettings::default();
    settings.interaction.position = [0.0, 0.0, -2.0];
    BirthdaySession::with_seed(&settings, 11)
}

#[test]
fn plugin_initializes_session_from_defaults() {
    let app = simulation_app(None);

    let session = app.world().resource::<BirthdaySession>();
    assert_eq!(session.actor().position, Vec3::ZERO);
    assert_eq!(session.animation().current(), Some(IDLE_CLIP));
    assert!(!session.show().started());
}

#[test]
fn held_forward_key_walks_the_actor_and_crossfades() {
    let mut app = simulation_app(None);

    app.world_mut()
        .resource_mut::<InputState>()
        .set_movement(MovementKeys {
            forward: true,
            ..MovementKeys::default()
        });
    run_frames(&mut app, 30);

    let session = app.world().resource::<BirthdaySession>();
    assert!(session.actor().position.z < -1.0);
    assert_eq!(session.actor().position.y, 0.0);
    assert_eq!(session.animation().current(), Some(WALK_CLIP));

    app.world_mut()
        .resource_mut::<InputState>()
        .set_movement(MovementKeys::default());
    run_frames(&mut app, 40);

    let session = app.world().resource::<BirthdaySession>();
    assert_eq!(session.animation().current(), Some(IDLE_CLIP));
    assert_eq!(session.animation().weight(IDLE_CLIP), 1.0);
}

#[test]
fn interacting_near_the_cake_starts_the_show_once() {
    let mut app = simulation_app(Some(cake_beside_spawn()));
    assert!(app.world().resource::<BirthdaySession>().prompt_visible());

    app.world_mut().resource_mut::<InputState>().trigger_interact();
    app.update();

    let session = app.world().resource::<BirthdaySession>();
    assert!(session.show().active());
    assert!(!session.prompt_visible());
    assert!(session.engine().ascending_count() >= 1);

    // One-shot actions are consumed by the tick.
    assert!(!app.world().resource::<InputState>().actions.interact);
}

#[test]
fn fireworks_explode_and_show_the_message() {
    let mut app = simulation_app(Some(cake_beside_spawn()));
    app.world_mut().resource_mut::<InputState>().trigger_interact();

    let mut saw_message = false;
    for _ in 0..(60 * 6) {
        app.update();
        if app.world().resource::<BirthdaySession>().message_visible() {
            saw_message = true;
            break;
        }
    }

    assert!(saw_message);
    assert!(app.world().resource::<BirthdaySession>().engine().particle_count() > 0);
}

#[test]
fn interacting_out_of_range_does_nothing() {
    let mut app = simulation_app(None);
    app.world_mut().resource_mut::<InputState>().trigger_interact();
    run_frames(&mut app, 5);

    let session = app.world().resource::<BirthdaySession>();
    assert!(!session.show().started());
    assert!(session.engine().is_idle());
}
