use crate::input::InputState;
use crate::session::BirthdaySession;
use bevy::prelude::*;

/// Run one session tick with this frame's delta and input.
pub fn drive_session(
    time: Res<Time>,
    mut input: ResMut<InputState>,
    mut session: ResMut<BirthdaySession>,
) {
    let frame = input.consume_frame();
    let report = session.tick(time.delta_secs(), frame);

    if report.celebration_started {
        info!("Happy birthday! Fireworks show started");
    }
    if report.exploded > 0 {
        debug!(
            "{} firework(s) exploded, {} active",
            report.exploded,
            session.engine().fireworks().len()
        );
    }
}
