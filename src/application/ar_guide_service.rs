// AR guide service - script lookup, scene assembly and the per-session render loop
use crate::application::capabilities::SceneRenderer;
use crate::application::catalog::DashboardCatalog;
use crate::application::error::{with_timeout, ServiceError, ServiceResult};
use crate::domain::guide::{
    Camera, FloorPosition, GuideEvent, GuideScript, SceneGraph, SceneNode, StartGuideRequest,
    Viewport,
};
use crate::domain::validation::ValidationError;
use crate::infrastructure::config::ArSettings;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

const CAPABILITY: &str = "scene renderer";
const CHANNEL_CAPACITY: usize = 16;

pub const SCRIPT_NOT_FOUND: &str = "导购剧本不存在";
pub const SCRIPT_NOT_SUITABLE: &str = "该剧本不适合当前用户";

#[derive(Clone)]
pub struct ArGuideService {
    catalog: Arc<dyn DashboardCatalog>,
    renderer: Arc<dyn SceneRenderer>,
    settings: ArSettings,
}

impl ArGuideService {
    pub fn new(
        catalog: Arc<dyn DashboardCatalog>,
        renderer: Arc<dyn SceneRenderer>,
        settings: ArSettings,
    ) -> Self {
        Self {
            catalog,
            renderer,
            settings,
        }
    }

    /// Check the script and the shopper, then start rendering. The session
    /// ends after the frame budget or as soon as the receiver is dropped.
    pub async fn start_guide(
        &self,
        request: &StartGuideRequest,
    ) -> ServiceResult<mpsc::Receiver<GuideEvent>> {
        let script = self
            .catalog
            .guide_script(&request.script_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(SCRIPT_NOT_FOUND.to_string()))?;

        if !script.accepts(&request.user_profile) {
            return Err(ValidationError::new("userProfile", SCRIPT_NOT_SUITABLE).into());
        }

        let scene = build_scene(&script, request.start_location, &self.settings);
        let session_id = format!("{}-{}", script.id, Utc::now().timestamp_millis());

        tracing::info!(
            session = %session_id,
            script = %script.id,
            user = %request.user_profile.id,
            markers = scene.nodes.len(),
            "AR guide session started"
        );

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run_render_loop(
            self.renderer.clone(),
            scene,
            self.settings.clone(),
            tx,
            session_id,
            script.id,
        ));

        Ok(rx)
    }
}

/// Camera at the shopper's eye, one marker per scene of the script
pub fn build_scene(script: &GuideScript, start: FloorPosition, settings: &ArSettings) -> SceneGraph {
    let shopper = start.to_world();
    let nodes = script
        .scenes
        .iter()
        .map(|scene| {
            let position = scene.location.to_world();
            SceneNode {
                id: scene.id.clone(),
                label: scene.content.title.clone(),
                kind: scene.content.kind,
                position,
                radius: settings.marker_radius,
                triggered: shopper.distance(position) <= scene.trigger_distance,
            }
        })
        .collect();

    SceneGraph {
        camera: Camera::at_shopper(start, settings.fov_degrees),
        viewport: Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
        },
        nodes,
    }
}

async fn run_render_loop(
    renderer: Arc<dyn SceneRenderer>,
    scene: SceneGraph,
    settings: ArSettings,
    tx: mpsc::Sender<GuideEvent>,
    session_id: String,
    script_id: String,
) {
    let session = GuideEvent::Session {
        session_id: session_id.clone(),
        script_id,
        scene: scene.clone(),
    };
    if tx.send(session).await.is_err() {
        tracing::debug!(session = %session_id, "Guide client gone before the first frame");
        return;
    }

    let mut ticks = IntervalStream::new(tokio::time::interval(settings.frame_interval()))
        .take(settings.max_frames as usize);
    let mut rendered = 0u64;

    loop {
        let tick = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!(session = %session_id, frames = rendered, "Guide client disconnected");
                return;
            }
            tick = ticks.next() => tick,
        };
        if tick.is_none() {
            break;
        }

        let frame = with_timeout(
            CAPABILITY,
            settings.render_timeout(),
            renderer.render(&scene, rendered),
        )
        .await;

        let event = match frame {
            Ok(frame) => GuideEvent::Frame(frame),
            Err(e) => {
                tracing::warn!(session = %session_id, error = %e, "Guide render failed");
                let failed = GuideEvent::Error {
                    message: e.to_string(),
                };
                if tx.send(failed).await.is_err() {
                    tracing::debug!(session = %session_id, "Guide client gone before the error");
                }
                return;
            }
        };
        if tx.send(event).await.is_err() {
            return;
        }
        rendered += 1;
    }

    if tx.send(GuideEvent::Complete { frames: rendered }).await.is_err() {
        tracing::debug!(session = %session_id, "Guide client gone before completion");
        return;
    }
    tracing::info!(session = %session_id, frames = rendered, "AR guide session complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::capabilities::fakes::FlatRenderer;
    use crate::application::error::CapabilityError;
    use crate::domain::guide::fixtures::shopper;
    use crate::domain::guide::RenderedFrame;
    use crate::infrastructure::static_catalog::StaticCatalog;
    use async_trait::async_trait;
    use std::time::Duration;

    fn settings(max_frames: u64) -> ArSettings {
        ArSettings {
            frame_interval_ms: 1,
            max_frames,
            ..ArSettings::default()
        }
    }

    fn service(renderer: Arc<dyn SceneRenderer>, max_frames: u64) -> ArGuideService {
        ArGuideService::new(Arc::new(StaticCatalog::new()), renderer, settings(max_frames))
    }

    fn request(script_id: &str, age: u32) -> StartGuideRequest {
        StartGuideRequest {
            script_id: script_id.into(),
            user_profile: shopper(age, &["时尚"]),
            start_location: FloorPosition {
                x: 120.0,
                y: 85.0,
                floor: 1,
            },
        }
    }

    async fn drain(mut rx: mpsc::Receiver<GuideEvent>) -> Vec<GuideEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_session_streams_frames_then_completes() {
        let rx = service(Arc::new(FlatRenderer), 3)
            .start_guide(&request("spring-fashion", 28))
            .await
            .unwrap();
        let events = drain(rx).await;

        assert_eq!(events.len(), 5);
        match &events[0] {
            GuideEvent::Session { script_id, scene, .. } => {
                assert_eq!(script_id, "spring-fashion");
                assert_eq!(scene.nodes.len(), 3);
                let triggered: Vec<&str> = scene
                    .nodes
                    .iter()
                    .filter(|n| n.triggered)
                    .map(|n| n.id.as_str())
                    .collect();
                assert_eq!(triggered, vec!["atrium"]);
            }
            other => panic!("expected session, got {:?}", other),
        }
        let indices: Vec<u64> = events[1..4]
            .iter()
            .map(|e| match e {
                GuideEvent::Frame(frame) => frame.index,
                other => panic!("expected frame, got {:?}", other),
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(events[4], GuideEvent::Complete { frames: 3 });
    }

    #[tokio::test]
    async fn test_unknown_script_is_not_found() {
        let err = service(Arc::new(FlatRenderer), 1)
            .start_guide(&request("missing", 28))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == SCRIPT_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_incompatible_user_is_rejected() {
        let err = service(Arc::new(FlatRenderer), 1)
            .start_guide(&request("spring-fashion", 70))
            .await
            .unwrap_err();
        match err {
            ServiceError::InvalidRequest(e) => assert_eq!(e.field, "userProfile"),
            other => panic!("unexpected {:?}", other),
        }
    }

    struct BrokenRenderer;

    #[async_trait]
    impl SceneRenderer for BrokenRenderer {
        async fn render(&self, _: &SceneGraph, _: u64) -> Result<RenderedFrame, CapabilityError> {
            Err(CapabilityError::failed(CAPABILITY, "gpu lost"))
        }
    }

    #[tokio::test]
    async fn test_render_failure_ends_stream_with_error() {
        let rx = service(Arc::new(BrokenRenderer), 5)
            .start_guide(&request("spring-fashion", 28))
            .await
            .unwrap();
        let events = drain(rx).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GuideEvent::Error { .. }));
    }

    #[tokio::test]
    async fn test_dropped_receiver_stops_loop() {
        let script = StaticCatalog::new()
            .guide_script("spring-fashion")
            .await
            .unwrap()
            .unwrap();
        let settings = settings(1_000_000);
        let scene = build_scene(&script, request("spring-fashion", 28).start_location, &settings);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_render_loop(
                Arc::new(FlatRenderer),
                scene,
                settings,
                tx,
                "s".into(),
                script.id,
            ),
        )
        .await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_loop_announces_session_first() {
        let script = StaticCatalog::new()
            .guide_script("spring-fashion")
            .await
            .unwrap()
            .unwrap();
        let settings = settings(0);
        let scene = build_scene(&script, request("spring-fashion", 28).start_location, &settings);
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(run_render_loop(
            Arc::new(FlatRenderer),
            scene,
            settings,
            tx,
            "s-1".into(),
            script.id.clone(),
        ));
        let events = drain(rx).await;
        assert_eq!(events.len(), 2);
        match &events[0] {
            GuideEvent::Session {
                session_id,
                script_id,
                ..
            } => {
                assert_eq!(session_id, "s-1");
                assert_eq!(script_id, "spring-fashion");
            }
            other => panic!("unexpected first event {:?}", other),
        }
        assert!(matches!(events[1], GuideEvent::Complete { frames: 0 }));
    }
}
