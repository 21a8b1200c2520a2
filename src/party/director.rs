//! The fixed party script
//!
//! [`party_timeline`] lays out the nine steps of the show; [`Director`] replays
//! it against the frame clock and applies each cue to the session at the time
//! its step was scheduled to start.

use cgmath::Vector3;

use crate::animation::{FiredCue, Timeline, TimelinePlayer};

use super::session::SceneSession;

/// Camera destination; `None` components keep their current value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGoal {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl CameraGoal {
    pub fn to(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn depth(z: f32) -> Self {
        Self {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub fn resolve(&self, current: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            self.x.unwrap_or(current.x),
            self.y.unwrap_or(current.y),
            self.z.unwrap_or(current.z),
        )
    }
}

/// Action fired when a timeline step starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// Moves the camera over the step's duration
    MoveCamera(CameraGoal),
    LightCandles,
    BlowCandles,
    CutCake,
    RevealMessage,
    /// Fades the music volume over the step's duration
    FadeMusic { to: f32 },
}

/// The show, in order
pub fn party_timeline() -> Timeline<Cue> {
    Timeline::new()
        .then("camera push-in", 2.0, Cue::MoveCamera(CameraGoal::depth(3.0)))
        .pause("hold", 1.0)
        .then("light candles", 2.0, Cue::LightCandles)
        .then("blow candles", 3.0, Cue::BlowCandles)
        .then("cut cake", 3.0, Cue::CutCake)
        .then("camera right", 5.0, Cue::MoveCamera(CameraGoal::to(2.0, 3.0, 5.0)))
        .then("camera left", 5.0, Cue::MoveCamera(CameraGoal::to(-2.0, 3.0, 6.0)))
        .then("reveal message", 6.0, Cue::RevealMessage)
        .then("music fade", 4.0, Cue::FadeMusic { to: 0.0 })
}

#[derive(Debug)]
pub struct Director {
    player: TimelinePlayer<Cue>,
}

impl Director {
    /// Starts the show with its first step at clock time `origin`
    pub fn new(origin: f32) -> Self {
        Self {
            player: TimelinePlayer::new(party_timeline(), origin),
        }
    }

    /// Applies every cue whose step has started by `now`
    ///
    /// Returns the cues applied this call, in order.
    pub fn advance(&mut self, now: f32, session: &mut SceneSession) -> Vec<FiredCue<Cue>> {
        let fired = self.player.advance(now);
        for step in &fired {
            log::info!("Timeline step {} '{}' at {:.2}s", step.index + 1, step.label, step.at);
            apply_cue(step, session);
        }
        fired
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.player.is_finished(now)
    }
}

fn apply_cue(step: &FiredCue<Cue>, session: &mut SceneSession) {
    let at = step.at;
    match step.cue {
        Cue::MoveCamera(goal) => {
            let target = goal.resolve(session.camera_position_at(at));
            session.move_camera(target, step.duration, at);
        }
        Cue::LightCandles => session.light_candles(),
        Cue::BlowCandles => {
            session.blow_candles(at);
        }
        Cue::CutCake => {
            session.cut_cake(at);
        }
        Cue::RevealMessage => session.reveal_message(),
        Cue::FadeMusic { to } => session.fade_music(to, step.duration, at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::party::session::FlameState;

    fn session() -> SceneSession {
        SceneSession::new(&mut StdRng::seed_from_u64(5), 0.0)
    }

    #[test]
    fn script_matches_the_show() {
        let timeline = party_timeline();
        let rows: Vec<(f32, f32)> = timeline
            .steps()
            .iter()
            .map(|step| (step.start, step.duration))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0.0, 2.0),
                (2.0, 1.0),
                (3.0, 2.0),
                (5.0, 3.0),
                (8.0, 3.0),
                (11.0, 5.0),
                (16.0, 5.0),
                (21.0, 6.0),
                (27.0, 4.0),
            ]
        );
        assert_eq!(timeline.duration(), 31.0);
    }

    #[test]
    fn cues_fire_in_order_with_minimum_spacing() {
        let mut director = Director::new(0.0);
        let mut session = session();
        let mut fired = Vec::new();

        let mut now = 0.0;
        while now <= 32.0 {
            fired.extend(director.advance(now, &mut session));
            session.update(now);
            now += 1.0 / 30.0;
        }

        let indices: Vec<usize> = fired.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 2, 3, 4, 5, 6, 7, 8]);
        for pair in fired.windows(2) {
            assert!(pair[1].at - pair[0].at >= pair[0].duration - 1e-4);
        }
        assert!(director.is_finished(now));
    }

    #[test]
    fn frozen_frame_catch_up_keeps_order() {
        let mut director = Director::new(0.0);
        let mut session = session();

        let fired = director.advance(12.0, &mut session);
        let cues: Vec<Cue> = fired.iter().map(|f| f.cue).collect();
        assert_eq!(
            cues,
            vec![
                Cue::MoveCamera(CameraGoal::depth(3.0)),
                Cue::LightCandles,
                Cue::BlowCandles,
                Cue::CutCake,
                Cue::MoveCamera(CameraGoal::to(2.0, 3.0, 5.0)),
            ]
        );
        assert_eq!(session.flame(), FlameState::Out);
    }

    #[test]
    fn whole_show_end_state() {
        let mut director = Director::new(0.0);
        let mut session = session();

        let mut now = 0.0;
        while now <= 32.0 {
            director.advance(now, &mut session);
            session.update(now);
            now += 0.05;
        }

        assert!(session.message_visible());
        assert_eq!(session.flame(), FlameState::Out);
        let camera = session.camera_position();
        assert_relative_eq!(camera.x, -2.0, epsilon = 1e-4);
        assert_relative_eq!(camera.y, 3.0, epsilon = 1e-4);
        assert_relative_eq!(camera.z, 6.0, epsilon = 1e-4);
        assert_eq!(session.music_volume(), 0.0);
    }

    #[test]
    fn push_in_keeps_height() {
        let goal = CameraGoal::depth(3.0);
        let resolved = goal.resolve(Vector3::new(0.0, 2.5, 5.0));
        assert_eq!(resolved, Vector3::new(0.0, 2.5, 3.0));
    }
}
