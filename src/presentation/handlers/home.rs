// Home handler - platform title and module navigation
use crate::domain::module::HomeOverview;
use axum::Json;

pub async fn home() -> Json<HomeOverview> {
    Json(HomeOverview::new())
}
