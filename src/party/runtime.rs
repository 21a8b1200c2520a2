//! Per-frame driver
//!
//! [`PartyRuntime::frame`] is the single entry point the window loop calls on
//! every redraw. It is handed the elapsed time, so tests can run a whole party
//! without a window, a GPU or a real clock.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{CakeModel, LoadState, PendingModel};

use super::director::Director;
use super::session::SceneSession;

/// What the window loop should do after a tick
#[derive(Debug)]
pub struct Frame {
    /// False until the model has loaded; nothing is drawn before that
    pub render: bool,
    /// The model, handed out once on the tick it finished loading
    pub loaded: Option<CakeModel>,
}

#[derive(Debug)]
pub struct PartyRuntime {
    session: SceneSession,
    director: Director,
    loader: PendingModel,
    load_state: LoadState,
    rng: StdRng,
    music_volume: f32,
}

impl PartyRuntime {
    /// # Arguments
    /// * `loader` - The model load, already running
    /// * `seed` - Fixed RNG seed, or `None` for a fresh layout every run
    /// * `music_volume` - Volume the music starts at once the model is in
    /// * `now` - Clock time the timeline starts at
    pub fn new(loader: PendingModel, seed: Option<u64>, music_volume: f32, now: f32) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let session = SceneSession::new(&mut rng, now);

        Self {
            session,
            director: Director::new(now),
            loader,
            load_state: LoadState::Loading,
            rng,
            music_volume,
        }
    }

    /// Advances the party to clock time `now`
    pub fn frame(&mut self, now: f32) -> Frame {
        let loaded = self.poll_load();
        self.director.advance(now, &mut self.session);
        self.session.update(now);

        Frame {
            render: self.load_state == LoadState::Ready,
            loaded,
        }
    }

    fn poll_load(&mut self) -> Option<CakeModel> {
        if self.load_state != LoadState::Loading {
            return None;
        }

        match self.loader.poll()? {
            Ok(model) => {
                log::info!(
                    "Model ready: {} part(s), {} candle(s)",
                    model.parts.len(),
                    model.candles().count()
                );
                self.session
                    .attach_cake(model.candle_spots(), &mut self.rng);
                self.session.start_music(self.music_volume);
                self.load_state = LoadState::Ready;
                Some(model)
            }
            Err(err) => {
                log::error!("Error loading cake model: {err}");
                self.load_state = LoadState::Failed;
                None
            }
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn session(&self) -> &SceneSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SceneSession {
        &mut self.session
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.director.is_finished(now)
    }
}
