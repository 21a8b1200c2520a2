use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::animation::{Clock, SystemClock};
use crate::assets::PendingModel;
use crate::audio::{open_output, AudioOutput};
use crate::config::PartyConfig;
use crate::gfx::{FrameContent, RenderEngine, RenderError};
use crate::party::{Effect, Frame, PartyRuntime, SceneSession, Stage};
use crate::ui::{party_overlay, OverlayAction, OverlayState, UiManager};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The birthday party window
///
/// The timeline starts when the app is constructed; the cake model starts
/// loading at the same moment.
pub struct PartyApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: PartyConfig,
    clock: SystemClock,
    runtime: PartyRuntime,
    audio: Box<dyn AudioOutput>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    stage: Option<Stage>,
    finished: bool,
    fatal: Option<AppError>,
}

impl PartyApp {
    pub fn new(config: PartyConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new()?;

        let clock = SystemClock::new();
        let loader = PendingModel::spawn(config.assets.model_path.clone());
        let audio = open_output(config.assets.audio_paths());
        let runtime = PartyRuntime::new(loader, config.seed, config.music_volume, clock.now());

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                clock,
                runtime,
                audio,
                window: None,
                render_engine: None,
                ui_manager: None,
                stage: None,
                finished: false,
                fatal: None,
            },
        })
    }

    /// Runs until the window is closed
    ///
    /// # Errors
    /// Returns the error that stopped the loop if it was not a normal exit.
    pub fn run(mut self) -> Result<(), AppError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Hands a session effect to the audio output
///
/// Audio failures are logged and never stop the party.
pub fn apply_effect(audio: &mut dyn AudioOutput, effect: Effect) {
    let result = match effect {
        Effect::PlaySound(sound) => audio.play_effect(sound),
        Effect::StartMusic { volume } => audio.start_music(volume),
        Effect::SetMusicVolume(volume) => {
            audio.set_music_volume(volume);
            Ok(())
        }
    };

    if let Err(err) = result {
        log::warn!("Audio: {err}");
    }
}

/// Scene frames once the model is ready, backdrop frames before that
pub fn frame_content(frame: &Frame) -> FrameContent {
    if frame.render {
        FrameContent::Scene
    } else {
        FrameContent::Backdrop
    }
}

/// Overlay inputs for this frame, whether or not the scene is drawn
pub fn overlay_state<'a>(
    config: &'a PartyConfig,
    session: &SceneSession,
    audio: &dyn AudioOutput,
) -> OverlayState<'a> {
    OverlayState {
        message: &config.message,
        message_visible: session.message_visible(),
        music_playing: audio.is_music_playing(),
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<(), RenderError> {
        let Self {
            config,
            clock,
            runtime,
            audio,
            window,
            render_engine,
            ui_manager,
            stage,
            finished,
            ..
        } = self;
        let (Some(window), Some(render_engine), Some(ui_manager), Some(stage)) = (
            window.as_ref(),
            render_engine.as_mut(),
            ui_manager.as_mut(),
            stage.as_mut(),
        ) else {
            return Ok(());
        };

        let now = clock.now();
        let frame = runtime.frame(now);
        if let Some(model) = &frame.loaded {
            stage.attach_model(model);
        }

        for effect in runtime.session_mut().drain_effects() {
            apply_effect(audio.as_mut(), effect);
        }

        if !*finished && runtime.is_finished(now) {
            *finished = true;
            log::info!("Party timeline complete at {now:.1}s");
        }

        let session = runtime.session();
        stage.sync(session, now);

        let content = frame_content(&frame);
        if content == FrameContent::Scene {
            let confetti = Stage::confetti_instances(session);
            render_engine.update(stage.scene_mut(), &confetti);
        }

        let overlay = overlay_state(config, session, audio.as_ref());
        let action = ui_manager.update_logic(window, |ui| party_overlay(ui, &overlay));

        render_engine.render_frame(
            stage.scene(),
            content,
            Some(|device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                ui_manager.render_display_only(device, queue, encoder, view);
            }),
        )?;

        if action == Some(OverlayAction::ToggleMusic) {
            let playing = audio.toggle_music();
            log::info!("Music {}", if playing { "resumed" } else { "paused" });
        }

        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window_handle = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();

        let window_clone = window_handle.clone();
        let renderer = match pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height).await
        }) {
            Ok(renderer) => renderer,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );
        let (surface_width, surface_height) = renderer.get_surface_size();
        ui_manager.update_display_size(surface_width, surface_height);

        self.stage = Some(Stage::new(
            surface_width as f32 / surface_height as f32,
            self.runtime.session(),
        ));
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.resize(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(()) => {}
                Err(RenderError::Surface(err)) => {
                    log::warn!("Frame skipped: {err}");
                }
                Err(err) => self.fail(event_loop, err.into()),
            },
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualClock;
    use crate::assets::AssetError;
    use crate::audio::{SilentAudio, SoundEffect};

    #[test]
    fn effects_drive_the_audio_output() {
        let mut audio = SilentAudio::new();

        apply_effect(&mut audio, Effect::PlaySound(SoundEffect::CandleBlow));
        assert!(!audio.is_music_playing());

        apply_effect(&mut audio, Effect::StartMusic { volume: 0.5 });
        assert!(audio.is_music_playing());
        assert_eq!(audio.volume(), 0.5);

        apply_effect(&mut audio, Effect::SetMusicVolume(0.1));
        assert_eq!(audio.volume(), 0.1);
    }

    #[test]
    fn failed_load_keeps_the_overlay_on_backdrop_frames() {
        let clock = ManualClock::new();
        let failed = PendingModel::from_result(Err(AssetError::LoaderDropped));
        let mut runtime = PartyRuntime::new(failed, Some(5), 0.5, clock.now());
        let config = PartyConfig::default();
        let audio = SilentAudio::new();

        while clock.now() < 22.0 {
            let frame = runtime.frame(clock.now());
            assert_eq!(frame_content(&frame), FrameContent::Backdrop);
            clock.advance(0.1);
        }

        let overlay = overlay_state(&config, runtime.session(), &audio);
        assert!(overlay.message_visible);
        assert_eq!(overlay.message, "Happy Birthday!");
        assert!(!overlay.music_playing);
    }
}
