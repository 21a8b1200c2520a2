//! Mutable state of one party run
//!
//! [`SceneSession`] owns everything the timeline cues act upon: the lit flag,
//! candle lights, the cake, balloons, confetti, the camera rig, music level and
//! the birthday message. Cues never touch the GPU or the audio device directly;
//! playback side effects are queued as [`Effect`]s and drained by the app once
//! per frame.

use cgmath::{InnerSpace, Vector3};
use rand::Rng;

use crate::animation::{Ease, Repeat, TimerQueue, Tween};
use crate::audio::SoundEffect;

use super::balloons::{spawn_balloons, Balloon};
use super::candles::CandleLight;
use super::confetti::ConfettiCloud;

/// Uniform scale of the cake root
pub const CAKE_SCALE: f32 = 1.5;
/// Cake y scale at the bottom of the squash
pub const CAKE_SQUASH_SCALE: f32 = 0.7;
/// Duration of one way of the squash
pub const CAKE_SQUASH_SECONDS: f32 = 0.6;
/// Delay between blowing the candles and the confetti burst
pub const CONFETTI_DELAY_SECONDS: f32 = 2.5;
pub const CAMERA_START: Vector3<f32> = Vector3::new(0.0, 2.5, 5.0);

/// Whether the candles are burning
///
/// Starts `Lit` and moves to `Out` at most once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlameState {
    Lit,
    Out,
}

/// Playback request for the app to carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    PlaySound(SoundEffect),
    StartMusic { volume: f32 },
    SetMusicVolume(f32),
}

/// Work scheduled on the one-shot timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Confetti,
}

#[derive(Debug, Clone)]
struct CakeState {
    squash: Option<Tween>,
}

#[derive(Debug, Clone, Copy)]
struct CameraMove {
    from: Vector3<f32>,
    to: Vector3<f32>,
    progress: Tween,
}

#[derive(Debug, Clone)]
struct MusicLevel {
    volume: f32,
    fade: Option<Tween>,
}

#[derive(Debug)]
pub struct SceneSession {
    flame: FlameState,
    candles: Vec<CandleLight>,
    cake: Option<CakeState>,
    balloons: Vec<Balloon>,
    confetti: ConfettiCloud,
    camera_position: Vector3<f32>,
    camera_move: Option<CameraMove>,
    music: MusicLevel,
    message_visible: bool,
    timers: TimerQueue<Deferred>,
    effects: Vec<Effect>,
}

impl SceneSession {
    /// Sets up a fresh run with balloons bobbing from clock time `now`
    pub fn new<R: Rng>(rng: &mut R, now: f32) -> Self {
        Self {
            flame: FlameState::Lit,
            candles: Vec::new(),
            cake: None,
            balloons: spawn_balloons(rng, now),
            confetti: ConfettiCloud::scatter(rng),
            camera_position: CAMERA_START,
            camera_move: None,
            music: MusicLevel {
                volume: 0.0,
                fade: None,
            },
            message_visible: false,
            timers: TimerQueue::new(),
            effects: Vec::new(),
        }
    }

    /// Registers the loaded cake and spawns one light per candle
    ///
    /// # Arguments
    /// * `candles` - Name and model-space position of each candle node
    /// * `rng` - Source of the per-light flicker phase
    pub fn attach_cake<R, I>(&mut self, candles: I, rng: &mut R)
    where
        R: Rng,
        I: IntoIterator<Item = (String, Vector3<f32>)>,
    {
        self.cake = Some(CakeState { squash: None });
        for (name, position) in candles {
            let mut light = CandleLight::new(name, position, rng.random());
            if self.flame == FlameState::Out {
                light.intensity = 0.0;
            }
            self.candles.push(light);
        }
        log::info!("Cake attached with {} candle light(s)", self.candles.len());
    }

    /// Keeps the candles lit; a no-op once they have been blown out
    pub fn light_candles(&mut self) {
        match self.flame {
            FlameState::Lit => log::debug!("Candles lit"),
            FlameState::Out => log::debug!("Candles already blown out, not relighting"),
        }
    }

    /// Blows out the candles
    ///
    /// Fades every candle to zero, plays the blow sound and schedules the
    /// confetti burst. Returns false without doing anything if the candles are
    /// already out.
    pub fn blow_candles(&mut self, now: f32) -> bool {
        if self.flame != FlameState::Lit {
            log::debug!("Candles already out, ignoring blow at {now:.2}s");
            return false;
        }

        self.flame = FlameState::Out;
        for candle in &mut self.candles {
            candle.blow_out(now);
        }
        self.effects.push(Effect::PlaySound(SoundEffect::CandleBlow));
        self.timers
            .schedule(now + CONFETTI_DELAY_SECONDS, Deferred::Confetti);
        log::info!("Blowing out {} candle(s)", self.candles.len());
        true
    }

    /// Squashes the cake and plays the cut sound
    ///
    /// Returns false if the cake never loaded.
    pub fn cut_cake(&mut self, now: f32) -> bool {
        let Some(cake) = &mut self.cake else {
            log::warn!("No cake loaded, nothing to cut");
            return false;
        };

        cake.squash = Some(
            Tween::new(CAKE_SCALE, CAKE_SQUASH_SCALE, CAKE_SQUASH_SECONDS)
                .with_ease(Ease::Power1InOut)
                .with_yoyo(true)
                .with_repeat(Repeat::Times(1))
                .starting_at(now),
        );
        self.effects.push(Effect::PlaySound(SoundEffect::CakeCut));
        log::info!("Cutting the cake");
        true
    }

    /// Moves the camera from wherever it is at `now` to `target`
    pub fn move_camera(&mut self, target: Vector3<f32>, duration: f32, now: f32) {
        let from = self.camera_position_at(now);
        log::debug!(
            "Camera move to ({:.1}, {:.1}, {:.1}) over {duration}s, distance {:.2}",
            target.x,
            target.y,
            target.z,
            (target - from).magnitude()
        );
        self.camera_move = Some(CameraMove {
            from,
            to: target,
            progress: Tween::new(0.0, 1.0, duration).starting_at(now),
        });
    }

    /// Starts the background music at `volume`
    ///
    /// A fade already running keeps running and still sets the final level.
    pub fn start_music(&mut self, volume: f32) {
        self.music.volume = volume;
        self.effects.push(Effect::StartMusic { volume });
    }

    /// Fades the music volume from its current level to `to`
    pub fn fade_music(&mut self, to: f32, duration: f32, now: f32) {
        let from = self.music_volume_at(now);
        self.music.fade = Some(Tween::new(from, to, duration).starting_at(now));
    }

    pub fn reveal_message(&mut self) {
        self.message_visible = true;
        log::info!("Birthday message revealed");
    }

    /// Advances every running animation to clock time `now`
    pub fn update(&mut self, now: f32) {
        for (due, deferred) in self.timers.drain_due(now) {
            match deferred {
                Deferred::Confetti => {
                    self.confetti.trigger(due);
                }
            }
        }

        for candle in &mut self.candles {
            match self.flame {
                FlameState::Lit => candle.flicker(now),
                FlameState::Out => candle.update_fade(now),
            }
        }

        self.confetti.update(now);
        self.camera_position = self.camera_position_at(now);
        if let Some(camera_move) = self.camera_move {
            if camera_move.progress.is_complete(now) {
                self.camera_move = None;
            }
        }

        if let Some(fade) = self.music.fade {
            let volume = fade.value_at(now);
            if volume != self.music.volume {
                self.music.volume = volume;
                self.effects.push(Effect::SetMusicVolume(volume));
            }
            if fade.is_complete(now) {
                self.music.fade = None;
            }
        }
    }

    /// Takes the side effects queued since the last call
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Where the camera is, or will be, at clock time `now`
    pub fn camera_position_at(&self, now: f32) -> Vector3<f32> {
        match self.camera_move {
            Some(CameraMove { from, to, progress }) => from + (to - from) * progress.value_at(now),
            None => self.camera_position,
        }
    }

    fn music_volume_at(&self, now: f32) -> f32 {
        self.music
            .fade
            .map(|fade| fade.value_at(now))
            .unwrap_or(self.music.volume)
    }

    pub fn flame(&self) -> FlameState {
        self.flame
    }

    pub fn is_lit(&self) -> bool {
        self.flame == FlameState::Lit
    }

    pub fn candles(&self) -> &[CandleLight] {
        &self.candles
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn confetti(&self) -> &ConfettiCloud {
        &self.confetti
    }

    pub fn has_cake(&self) -> bool {
        self.cake.is_some()
    }

    /// Current y scale of the cake root, `None` before it loads
    pub fn cake_scale_y(&self, now: f32) -> Option<f32> {
        self.cake.as_ref().map(|cake| {
            cake.squash
                .map(|squash| squash.value_at(now))
                .unwrap_or(CAKE_SCALE)
        })
    }

    pub fn camera_position(&self) -> Vector3<f32> {
        self.camera_position
    }

    pub fn music_volume(&self) -> f32 {
        self.music.volume
    }

    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    pub fn pending_timers(&self) -> &TimerQueue<Deferred> {
        &self.timers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> (SceneSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let session = SceneSession::new(&mut rng, 0.0);
        (session, rng)
    }

    fn candles() -> Vec<(String, Vector3<f32>)> {
        vec![
            ("Candle_1".to_string(), Vector3::new(-0.2, 1.0, 0.0)),
            ("Candle_2".to_string(), Vector3::new(0.2, 1.0, 0.0)),
        ]
    }

    #[test]
    fn blowing_twice_only_acts_once() {
        let (mut session, mut rng) = session();
        session.attach_cake(candles(), &mut rng);
        assert!(session.is_lit());

        assert!(session.blow_candles(5.0));
        assert_eq!(session.flame(), FlameState::Out);
        let due: Vec<f32> = session.pending_timers().due_times().collect();
        assert_eq!(due, vec![5.0 + CONFETTI_DELAY_SECONDS]);
        assert_eq!(
            session.drain_effects(),
            vec![Effect::PlaySound(SoundEffect::CandleBlow)]
        );

        assert!(!session.blow_candles(6.0));
        assert_eq!(session.flame(), FlameState::Out);
        assert_eq!(session.pending_timers().len(), 1);
        assert!(session.drain_effects().is_empty());
    }

    #[test]
    fn confetti_fires_once_after_delay() {
        let (mut session, _) = session();
        session.blow_candles(5.0);

        session.update(7.49);
        assert!(!session.confetti().is_bursting());
        session.update(7.5);
        assert!(session.confetti().is_bursting());
        assert!(session.pending_timers().is_empty());
    }

    #[test]
    fn candles_fade_out_and_stay_out() {
        let (mut session, mut rng) = session();
        session.attach_cake(candles(), &mut rng);
        session.update(4.0);
        assert!(session.candles().iter().all(|c| c.intensity >= 0.7));

        session.blow_candles(5.0);
        session.light_candles();
        session.update(7.0);
        assert!(session.candles().iter().all(|c| c.intensity == 0.0));
        session.update(30.0);
        assert!(session.candles().iter().all(|c| c.intensity == 0.0));
        assert_eq!(session.flame(), FlameState::Out);
    }

    #[test]
    fn cutting_without_cake_changes_nothing() {
        let (mut session, _) = session();
        assert!(!session.cut_cake(8.0));
        session.update(8.3);
        assert_eq!(session.cake_scale_y(8.3), None);
        assert!(session.drain_effects().is_empty());
    }

    #[test]
    fn cutting_squashes_and_restores_cake() {
        let (mut session, mut rng) = session();
        session.attach_cake(candles(), &mut rng);
        assert!(session.cut_cake(8.0));

        assert_relative_eq!(session.cake_scale_y(8.6).unwrap(), CAKE_SQUASH_SCALE, epsilon = 1e-5);
        assert_relative_eq!(session.cake_scale_y(9.2).unwrap(), CAKE_SCALE, epsilon = 1e-5);
        assert_eq!(
            session.drain_effects(),
            vec![Effect::PlaySound(SoundEffect::CakeCut)]
        );
    }

    #[test]
    fn camera_moves_from_current_position() {
        let (mut session, _) = session();
        session.move_camera(Vector3::new(0.0, 2.5, 3.0), 2.0, 0.0);
        session.update(2.0);
        assert_relative_eq!(session.camera_position().z, 3.0, epsilon = 1e-5);

        session.move_camera(Vector3::new(2.0, 3.0, 5.0), 5.0, 11.0);
        session.update(11.0);
        assert_relative_eq!(session.camera_position().z, 3.0, epsilon = 1e-5);
        session.update(16.0);
        assert_relative_eq!(session.camera_position().x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(session.camera_position().y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn music_fade_reports_volume_changes() {
        let (mut session, _) = session();
        session.start_music(0.5);
        assert_eq!(
            session.drain_effects(),
            vec![Effect::StartMusic { volume: 0.5 }]
        );

        session.fade_music(0.0, 4.0, 27.0);
        session.update(29.0);
        let effects = session.drain_effects();
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::SetMusicVolume(v) if v > 0.0 && v < 0.5));

        session.update(31.0);
        assert_eq!(session.music_volume(), 0.0);
        assert_eq!(session.drain_effects(), vec![Effect::SetMusicVolume(0.0)]);
        session.update(32.0);
        assert!(session.drain_effects().is_empty());
    }

    #[test]
    fn candles_loaded_after_blow_start_dark() {
        let (mut session, mut rng) = session();
        session.blow_candles(5.0);
        session.attach_cake(candles(), &mut rng);
        session.update(6.0);
        assert!(session.candles().iter().all(|c| c.intensity == 0.0));
    }

    #[test]
    fn music_starting_mid_fade_still_ends_silent() {
        let (mut session, _) = session();
        session.fade_music(0.0, 4.0, 27.0);
        session.update(28.0);

        session.start_music(0.5);
        assert_eq!(session.music_volume(), 0.5);
        session.update(31.5);

        assert_eq!(session.music_volume(), 0.0);
        let effects = session.drain_effects();
        assert_eq!(effects.first(), Some(&Effect::StartMusic { volume: 0.5 }));
        assert_eq!(effects.last(), Some(&Effect::SetMusicVolume(0.0)));
    }
}
