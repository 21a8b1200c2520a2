//! Render-side mirror of the session
//!
//! The session owns what happens; the stage owns the [`Scene`] the renderer
//! draws and copies positions, scales and light levels across once per frame.

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::assets::CakeModel;
use crate::gfx::{
    camera::PerspectiveCamera,
    geometry::primitives::{generate_plane, generate_sphere},
    rendering::ConfettiInstance,
    resources::Material,
    scene::{AmbientLight, Lighting, Mesh, Object, PointLight, Scene, SpotLight, MAX_POINT_LIGHTS},
};

use super::balloons::{BALLOON_METALNESS, BALLOON_RADIUS, BALLOON_ROUGHNESS, BALLOON_SEGMENTS};
use super::confetti::CONFETTI_SIZE;
use super::rgb;
use super::session::{SceneSession, CAKE_SCALE};

pub const BACKGROUND_COLOR: u32 = 0xfff4e2;
pub const AMBIENT_INTENSITY: f32 = 0.7;
pub const SPOT_COLOR: u32 = 0xffd27f;
pub const SPOT_INTENSITY: f32 = 1.2;
pub const SPOT_POSITION: Vector3<f32> = Vector3::new(5.0, 7.0, 5.0);
pub const FLOOR_SIZE: f32 = 20.0;
/// Alpha of the shadow drawn on the otherwise invisible floor
pub const FLOOR_SHADOW_OPACITY: f32 = 0.15;

const FLOOR: &str = "floor";

pub struct Stage {
    scene: Scene,
    /// Object index of each balloon, in session order
    balloons: Vec<usize>,
    /// Object indices of the cake parts
    cake: Vec<usize>,
    /// Set once the point-light cap has been logged
    light_cap_reported: bool,
}

impl Stage {
    /// Builds the static set: camera, lights, floor and balloons
    pub fn new(aspect: f32, session: &SceneSession) -> Self {
        let camera = PerspectiveCamera::new(session.camera_position(), aspect);
        let lighting = Lighting::new(
            AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: AMBIENT_INTENSITY,
            },
            SpotLight {
                position: SPOT_POSITION,
                target: Vector3::new(0.0, 0.0, 0.0),
                color: rgb(SPOT_COLOR),
                intensity: SPOT_INTENSITY,
                angle: PI / 6.0,
                penumbra: 0.3,
                cast_shadow: true,
                shadow_near: 0.5,
                shadow_far: 30.0,
            },
        );
        let mut scene = Scene::new(camera, lighting, rgb(BACKGROUND_COLOR));

        scene.add_material(Material::shadow_catcher(FLOOR, FLOOR_SHADOW_OPACITY));
        scene.add_object(
            Object::new(
                FLOOR,
                vec![Mesh::from_geometry(&generate_plane(FLOOR_SIZE, FLOOR_SIZE, 1))],
            )
            .with_material(FLOOR)
            .with_shadows(false, true),
        );

        let sphere = generate_sphere(BALLOON_RADIUS, BALLOON_SEGMENTS, BALLOON_SEGMENTS);
        let balloons = session
            .balloons()
            .iter()
            .enumerate()
            .map(|(i, balloon)| {
                let name = format!("balloon_{i}");
                let [r, g, b] = balloon.color;
                scene.add_material(Material::new(
                    &name,
                    [r, g, b, 1.0],
                    BALLOON_METALNESS,
                    BALLOON_ROUGHNESS,
                ));
                scene.add_object(
                    Object::new(name.as_str(), vec![Mesh::from_geometry(&sphere)])
                        .with_material(&name)
                        .with_translation(balloon.rest_position)
                        .with_shadows(true, false),
                )
            })
            .collect();

        Self {
            scene,
            balloons,
            cake: Vec::new(),
            light_cap_reported: false,
        }
    }

    /// Adds one object per model part, scaled up at the origin
    pub fn attach_model(&mut self, model: &CakeModel) {
        for (i, part) in model.parts.iter().enumerate() {
            let material_id = format!("cake_{i}_{}", part.name);
            self.scene
                .add_material(Material::new(&material_id, part.color, 0.0, part.roughness));
            let index = self.scene.add_object(
                Object::new(
                    part.name.as_str(),
                    vec![Mesh::new(&part.positions, &part.normals, part.indices.clone())],
                )
                .with_material(&material_id)
                .with_uniform_scale(CAKE_SCALE)
                .with_shadows(true, true),
            );
            self.cake.push(index);
        }

        let stats = self.scene.get_statistics();
        log::info!(
            "Model on stage: {} part(s), scene now {} object(s) / {} triangle(s)",
            model.parts.len(),
            stats.object_count,
            stats.total_triangles
        );
    }

    /// Copies the session's state at clock time `now` into the scene
    pub fn sync(&mut self, session: &SceneSession, now: f32) {
        self.scene.camera.set_eye(session.camera_position());

        for (&index, balloon) in self.balloons.iter().zip(session.balloons()) {
            if let Some(object) = self.scene.get_object_mut(index) {
                object.translation = balloon.position(now);
            }
        }

        let scale_y = session.cake_scale_y(now).unwrap_or(CAKE_SCALE);
        for &index in &self.cake {
            if let Some(object) = self.scene.get_object_mut(index) {
                object.scale.y = scale_y;
            }
        }

        let dropped =
            self.scene
                .lighting
                .set_point_lights(session.candles().iter().map(|candle| PointLight {
                    position: candle_world_position(candle.position, scale_y),
                    color: candle.color,
                    intensity: candle.intensity,
                    range: candle.range,
                }));
        self.report_dropped_lights(dropped);

        self.scene.update();
    }

    /// Warns the first time candles go unlit; returns true if it warned
    fn report_dropped_lights(&mut self, dropped: usize) -> bool {
        if dropped == 0 || self.light_cap_reported {
            return false;
        }
        self.light_cap_reported = true;
        log::warn!(
            "{dropped} candle light(s) over the limit of {MAX_POINT_LIGHTS} will not light the scene"
        );
        true
    }

    /// One billboard per confetti piece; empty while the cloud is invisible
    pub fn confetti_instances(session: &SceneSession) -> Vec<ConfettiInstance> {
        let confetti = session.confetti();
        let opacity = confetti.opacity();
        if opacity <= 0.0 {
            return Vec::new();
        }

        confetti
            .positions()
            .iter()
            .zip(confetti.colors())
            .map(|(&position, &color)| {
                ConfettiInstance::new(position, CONFETTI_SIZE, color, opacity)
            })
            .collect()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera.resize_projection(width, height);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

/// Places a candle light under the cake's transform
///
/// Candle positions are in model space and the cake sits at the origin, so
/// the light follows the 1.5 scale and the cut squash instead of staying at
/// the raw model-space point. This is deliberate: unscaled, the lights would
/// sit inside the cake.
fn candle_world_position(local: Vector3<f32>, scale_y: f32) -> Vector3<f32> {
    Vector3::new(local.x * CAKE_SCALE, local.y * scale_y, local.z * CAKE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ModelPart;
    use crate::party::session::CAMERA_START;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> SceneSession {
        SceneSession::new(&mut StdRng::seed_from_u64(7), 0.0)
    }

    fn candle_part() -> ModelPart {
        ModelPart {
            name: "Candle_1".to_string(),
            positions: vec![0.0, 1.0, 0.0, 0.2, 1.0, 0.0, 0.0, 1.4, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
            color: [1.0, 1.0, 1.0, 1.0],
            roughness: 0.5,
            is_candle: true,
        }
    }

    #[test]
    fn set_has_floor_and_one_sphere_per_balloon() {
        let session = session();
        let stage = Stage::new(16.0 / 9.0, &session);
        let scene = stage.scene();

        assert_eq!(scene.objects.len(), 1 + session.balloons().len());
        let floor = &scene.objects[scene.find_object(FLOOR).unwrap()];
        assert!(floor.receive_shadow);
        assert!(!floor.cast_shadow);
        assert!(scene.get_material_for_object(floor).shadow_only);
        assert!(scene.objects[1..].iter().all(|o| o.cast_shadow));
        assert_eq!(scene.camera.eye, CAMERA_START);
        assert!(scene.lighting.spot.cast_shadow);
    }

    #[test]
    fn sync_moves_balloons_and_camera() {
        let session = session();
        let mut stage = Stage::new(1.0, &session);
        stage.sync(&session, 0.75);

        for (i, balloon) in session.balloons().iter().enumerate() {
            assert_eq!(stage.scene().objects[i + 1].translation, balloon.position(0.75));
        }
        assert_eq!(stage.scene().camera.eye, session.camera_position());
    }

    #[test]
    fn attached_model_parts_are_scaled_cake_objects() {
        let mut session = session();
        let model = CakeModel {
            parts: vec![candle_part()],
        };
        let mut stage = Stage::new(1.0, &session);
        stage.attach_model(&model);
        session.attach_cake(model.candle_spots(), &mut StdRng::seed_from_u64(1));
        stage.sync(&session, 0.0);

        let cake = stage.scene().find_object("Candle_1").unwrap();
        let object = &stage.scene().objects[cake];
        assert_eq!(object.scale, Vector3::new(CAKE_SCALE, CAKE_SCALE, CAKE_SCALE));
        assert!(object.cast_shadow && object.receive_shadow);

        let lights = stage.scene().lighting.point_lights();
        assert_eq!(lights.len(), 1);
        let expected = candle_world_position(session.candles()[0].position, CAKE_SCALE);
        assert_relative_eq!(lights[0].position.x, expected.x);
        assert_relative_eq!(lights[0].position.y, expected.y);
        assert_relative_eq!(lights[0].position.z, expected.z);
    }

    #[test]
    fn extra_candles_are_reported_once() {
        let mut session = session();
        let model = CakeModel {
            parts: (0..MAX_POINT_LIGHTS + 4)
                .map(|i| ModelPart {
                    name: format!("Candle_{i}"),
                    ..candle_part()
                })
                .collect(),
        };
        let mut stage = Stage::new(1.0, &session);
        stage.attach_model(&model);
        session.attach_cake(model.candle_spots(), &mut StdRng::seed_from_u64(2));

        stage.sync(&session, 0.0);
        assert!(stage.light_cap_reported);
        assert_eq!(stage.scene().lighting.point_lights().len(), MAX_POINT_LIGHTS);

        stage.sync(&session, 0.1);
        assert!(!stage.report_dropped_lights(4));
        assert_eq!(stage.scene().lighting.point_lights().len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn candle_position_follows_cake_scale() {
        let p = candle_world_position(Vector3::new(1.0, 2.0, -1.0), 0.7);
        assert_relative_eq!(p.x, 1.5);
        assert_relative_eq!(p.y, 1.4);
        assert_relative_eq!(p.z, -1.5);
    }

    #[test]
    fn hidden_confetti_produces_no_instances() {
        let session = session();
        assert_eq!(session.confetti().opacity(), 0.0);
        assert!(Stage::confetti_instances(&session).is_empty());
    }
}
