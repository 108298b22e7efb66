// Software perspective projection of guide markers onto the viewport
use crate::application::capabilities::SceneRenderer;
use crate::application::error::CapabilityError;
use crate::domain::guide::{ProjectedMarker, RenderedFrame, SceneGraph, Vec3};
use async_trait::async_trait;

const CAPABILITY: &str = "scene renderer";
/// Floors stack along z, so z is "up" for the camera basis
const WORLD_UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const FALLBACK_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Frames per pulse cycle of a triggered marker
const PULSE_PERIOD: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveRenderer;

struct CameraBasis {
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl CameraBasis {
    fn look_at(position: Vec3, target: Vec3) -> Option<Self> {
        let forward = (target - position).normalized()?;
        let right = forward
            .cross(WORLD_UP)
            .normalized()
            .or_else(|| forward.cross(FALLBACK_UP).normalized())?;
        let up = right.cross(forward);
        Some(Self { right, up, forward })
    }
}

impl PerspectiveRenderer {
    pub fn project(scene: &SceneGraph, index: u64) -> Result<RenderedFrame, CapabilityError> {
        let camera = &scene.camera;
        let basis = CameraBasis::look_at(camera.position, camera.target)
            .ok_or_else(|| CapabilityError::malformed(CAPABILITY, "camera target equals position"))?;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(CapabilityError::malformed(CAPABILITY, "field of view out of range"));
        }

        let width = scene.viewport.width as f64;
        let height = scene.viewport.height as f64;
        let focal = (height / 2.0) / (camera.fov_degrees.to_radians() / 2.0).tan();
        let pulse = 1.0 + 0.15 * (index as f64 * std::f64::consts::TAU / PULSE_PERIOD).sin();

        let mut markers: Vec<ProjectedMarker> = scene
            .nodes
            .iter()
            .filter_map(|node| {
                let offset = node.position - camera.position;
                let depth = offset.dot(basis.forward);
                if depth < camera.near || depth > camera.far {
                    return None;
                }
                let scale = focal / depth;
                let screen_x = width / 2.0 + offset.dot(basis.right) * scale;
                let screen_y = height / 2.0 - offset.dot(basis.up) * scale;
                let mut radius_px = node.radius * scale;
                if node.triggered {
                    radius_px *= pulse;
                }
                let visible = screen_x + radius_px >= 0.0
                    && screen_x - radius_px <= width
                    && screen_y + radius_px >= 0.0
                    && screen_y - radius_px <= height;
                visible.then(|| ProjectedMarker {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    kind: node.kind,
                    screen_x,
                    screen_y,
                    depth,
                    radius_px,
                    triggered: node.triggered,
                })
            })
            .collect();

        // far to near, so nearer markers paint last
        markers.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        Ok(RenderedFrame { index, markers })
    }
}

#[async_trait]
impl SceneRenderer for PerspectiveRenderer {
    async fn render(&self, scene: &SceneGraph, index: u64) -> Result<RenderedFrame, CapabilityError> {
        Self::project(scene, index)
    }
}
