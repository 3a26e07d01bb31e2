use bevy::prelude::*;

use birthday_client::fireworks::{
    CelebrationShow, FireworkEngine, FireworkEvent, FireworkSettings, ShowSettings,
};

const DT: f32 = 1.0 / 60.0;

fn run(show: &mut CelebrationShow, engine: &mut FireworkEngine, seconds: f32) -> u32 {
    let mut launched = 0;
    let frames = (seconds / DT).round() as usize;
    for _ in 0..frames {
        launched += show.tick(DT, engine);
        let exploded = engine
            .update(DT)
            .iter()
            .filter(|event| matches!(event, FireworkEvent::Exploded { .. }))
            .count();
        show.notify_explosions(exploded);
    }
    launched
}

#[test]
fn show_runs_its_course_and_goes_quiet() {
    let settings = ShowSettings {
        duration: 8.0,
        message_duration: 2.0,
        ..ShowSettings::default()
    };
    let mut show = CelebrationShow::with_seed(settings, 5);
    let mut engine = FireworkEngine::with_seed(FireworkSettings::default(), Vec3::ZERO, 6);

    assert!(show.begin());
    assert!(!show.begin());

    let early = run(&mut show, &mut engine, 1.5);
    assert_eq!(early, 5);
    assert!(show.message_visible() || engine.ascending_count() > 0);

    run(&mut show, &mut engine, 8.0);
    assert!(!show.active());
    let total = show.launched();
    assert!(total > 5);

    // Nothing new launches after the show ends; existing fireworks drain.
    run(&mut show, &mut engine, 20.0);
    assert_eq!(show.launched(), total);
    assert!(!show.message_visible());
    assert!(engine.is_idle());
}
