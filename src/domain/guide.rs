// AR shopping guide domain models - scripts, scenes and the renderable scene graph
use super::validation::{ensure_not_blank, ensure_range, Validate, ValidationError};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Height of one storey in scene units
pub const FLOOR_HEIGHT: f64 = 3.0;
/// Eye height of a standing shopper above the floor point
pub const EYE_HEIGHT: f64 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub product_id: String,
    pub purchase_date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub preferences: Vec<String>,
    #[serde(default)]
    pub shopping_history: Vec<Purchase>,
    #[serde(default)]
    pub vip_level: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorPosition {
    pub x: f64,
    pub y: f64,
    pub floor: i32,
}

impl FloorPosition {
    pub fn to_world(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.floor as f64 * FLOOR_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneContentType {
    Story,
    Product,
    Interaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub product_id: String,
    pub price: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    pub availability: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneContent {
    #[serde(rename = "type")]
    pub kind: SceneContentType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub media: Vec<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub product_info: Option<ProductInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideScene {
    pub id: String,
    pub location: FloorPosition,
    pub content: SceneContent,
    /// Metres
    pub trigger_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    pub age_range: (u32, u32),
    pub interests: Vec<String>,
    #[serde(default)]
    pub vip_level_required: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideScript {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub target_audience: TargetAudience,
    pub scenes: Vec<GuideScene>,
    pub is_active: bool,
}

impl GuideScript {
    /// A user fits a script when their age is inside the target range, they
    /// share at least one interest, and they meet any VIP requirement.
    pub fn accepts(&self, user: &UserProfile) -> bool {
        let audience = &self.target_audience;
        let (min_age, max_age) = audience.age_range;
        if user.age < min_age || user.age > max_age {
            return false;
        }
        if let Some(required) = audience.vip_level_required {
            if user.vip_level.unwrap_or(0) < required {
                return false;
            }
        }
        audience
            .interests
            .iter()
            .any(|interest| user.preferences.contains(interest))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGuideRequest {
    pub script_id: String,
    pub user_profile: UserProfile,
    pub start_location: FloorPosition,
}

impl Validate for StartGuideRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("scriptId", &self.script_id)?;
        ensure_not_blank("userProfile.id", &self.user_profile.id)?;
        ensure_range("userProfile.age", self.user_profile.age as f64, 0.0, 130.0)?;
        ensure_range("startLocation.floor", self.start_location.floor as f64, -5.0, 50.0)?;
        if !self.start_location.x.is_finite() || !self.start_location.y.is_finite() {
            return Err(ValidationError::new("startLocation", "coordinates must be finite"));
        }
        Ok(())
    }
}

// ---- Scene graph ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        (len > f64::EPSILON).then(|| self * (1.0 / len))
    }

    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).length()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Shopper's eye view from a floor position, looking along the floor's -y axis
    pub fn at_shopper(position: FloorPosition, fov_degrees: f64) -> Self {
        let floor_point = position.to_world();
        Self {
            position: floor_point + Vec3::new(0.0, EYE_HEIGHT, 0.0),
            target: floor_point,
            fov_degrees,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub kind: SceneContentType,
    pub position: Vec3,
    pub radius: f64,
    /// The shopper is within the scene's trigger distance
    pub triggered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    pub camera: Camera,
    pub viewport: Viewport,
    pub nodes: Vec<SceneNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedMarker {
    pub id: String,
    pub label: String,
    pub kind: SceneContentType,
    pub screen_x: f64,
    pub screen_y: f64,
    pub depth: f64,
    pub radius_px: f64,
    pub triggered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFrame {
    pub index: u64,
    pub markers: Vec<ProjectedMarker>,
}

/// One line of a guide session stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GuideEvent {
    #[serde(rename_all = "camelCase")]
    Session {
        session_id: String,
        script_id: String,
        scene: SceneGraph,
    },
    Frame(RenderedFrame),
    #[serde(rename_all = "camelCase")]
    Complete { frames: u64 },
    Error { message: String },
}


#[cfg(test)]
mod tests {
    use super::fixtures::{script, shopper};
    use super::*;

    #[test]
    fn test_script_accepts_matching_shopper() {
        let script = script();
        assert!(script.accepts(&shopper(30, &["休闲"])));
        assert!(!script.accepts(&shopper(60, &["休闲"])));
        assert!(!script.accepts(&shopper(30, &["数码"])));
    }

    #[test]
    fn test_vip_requirement() {
        let mut script = script();
        script.target_audience.vip_level_required = Some(2);
        let mut user = shopper(30, &["时尚"]);
        assert!(!script.accepts(&user));
        user.vip_level = Some(3);
        assert!(script.accepts(&user));
    }

    #[test]
    fn test_camera_sits_at_eye_height_offset() {
        let camera = Camera::at_shopper(FloorPosition { x: 10.0, y: 5.0, floor: 2 }, 75.0);
        assert!(camera.position.distance(Vec3::new(10.0, 6.6, 6.0)) < 1e-9);
        assert_eq!(camera.target, Vec3::new(10.0, 5.0, 6.0));
    }
}
