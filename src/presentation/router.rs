// Router - /api routes per dashboard section, the HTML shell and the tower-http stack
use crate::presentation::app_state::AppState;
use crate::presentation::error::{error_response, NOT_FOUND_MESSAGE};
use crate::presentation::handlers::{
    asset, consumer, health_check, home, leasing, merchant, operations,
};
use crate::presentation::shell::{self, source::RouterPageSource};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

async fn api_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, None)
}

pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/home", get(home::home))
        // leasing
        .route("/api/leasing/location-analysis", get(leasing::location_analysis))
        .route("/api/leasing/analyze-location", post(leasing::analyze_location))
        .route("/api/leasing/analyze-combinations", post(leasing::analyze_combinations))
        .route("/api/leasing/simulate-store", post(leasing::simulate_store))
        .route("/api/leasing/scenario-analysis", post(leasing::scenario_analysis))
        .route("/api/leasing/brand-simulation", get(leasing::brand_simulation))
        .route("/api/leasing/virtual-store", get(leasing::virtual_store))
        // operations
        .route("/api/operations/morning-briefing", get(operations::morning_briefing))
        .route("/api/operations/morning-report", post(operations::morning_report))
        .route("/api/operations/handle-emergency", post(operations::handle_emergency))
        .route("/api/operations/energy-optimization", post(operations::energy_optimization))
        .route("/api/operations/energy-monitoring", get(operations::energy_monitoring))
        .route("/api/operations/comfort-assessment", post(operations::comfort_assessment))
        .route("/api/operations/energy", get(operations::energy_overview))
        .route("/api/operations/emergency", get(operations::emergency_overview))
        // consumer
        .route("/api/consumer/recommendations", get(consumer::recommendations))
        .route("/api/consumer/ar-guide", get(consumer::ar_guide))
        .route("/api/consumer/ar-guide/sessions", post(consumer::start_guide_session))
        .route("/api/consumer/status-analysis", get(consumer::status_analysis))
        // merchant
        .route("/api/merchant", get(merchant::list_merchants))
        .route("/api/merchant/analysis", get(merchant::analysis))
        .route("/api/merchant/collaboration", get(merchant::collaboration))
        .route("/api/merchant/supply-chain", get(merchant::supply_chain))
        // asset
        .route("/api/asset/evaluation", get(asset::evaluation))
        .fallback(api_not_found)
        .with_state(state)
}

/// Full application: API, shell pages fetching from the API in-process, middleware
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let api = api_routes(state);
    let pages = shell::routes(RouterPageSource::new(api.clone()));

    api.merge(pages)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ar_guide_service::ArGuideService;
    use crate::application::asset_service::AssetService;
    use crate::application::capabilities::fakes::{CannedText, FixedPredictor, FlatRenderer};
    use crate::application::capabilities::{Predictor, TextGenerator};
    use crate::application::catalog::DashboardCatalog;
    use crate::application::consumer_service::ConsumerService;
    use crate::application::energy_optimizer::EnergyOptimizer;
    use crate::application::leasing_service::LeasingService;
    use crate::application::location_optimizer::LocationOptimizer;
    use crate::application::merchant_service::MerchantService;
    use crate::application::operations_assistant::OperationsAssistant;
    use crate::application::operations_service::OperationsService;
    use crate::application::store_simulator::StoreSimulator;
    use crate::infrastructure::config::{
        ArSettings, EnergyPolicy, LeasingPolicy, SimulationPolicy,
    };
    use crate::infrastructure::http_response::NDJSON_CONTENT_TYPE;
    use crate::infrastructure::static_catalog::{StaticCatalog, MAIN_BUILDING_ID};
    use crate::infrastructure::unconfigured::Unconfigured;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const REPLY: &str = "1. 即时响应措施\n- 疏散顾客\n2. 资源调配建议\n- 保安：4人";

    fn state_with(predictor: Arc<dyn Predictor>, text: Arc<dyn TextGenerator>) -> Arc<AppState> {
        let catalog: Arc<dyn DashboardCatalog> = Arc::new(StaticCatalog::new());
        let timeout = Duration::from_secs(2);
        let leasing_policy = LeasingPolicy {
            simulation_count: 16,
            ..LeasingPolicy::default()
        };
        let ar = ArSettings {
            frame_interval_ms: 1,
            max_frames: 2,
            ..ArSettings::default()
        };

        Arc::new(AppState {
            leasing_service: LeasingService::new(
                catalog.clone(),
                LocationOptimizer::new(predictor.clone(), leasing_policy, timeout),
                StoreSimulator::new(predictor.clone(), SimulationPolicy::default(), timeout),
            ),
            operations_service: OperationsService::new(
                catalog.clone(),
                OperationsAssistant::new(text, timeout),
                EnergyOptimizer::new(predictor, EnergyPolicy::default(), timeout),
            ),
            consumer_service: ConsumerService::new(
                catalog.clone(),
                ArGuideService::new(catalog.clone(), Arc::new(FlatRenderer), ar),
            ),
            merchant_service: MerchantService::new(catalog.clone()),
            asset_service: AssetService::new(catalog),
            verbose_errors: false,
        })
    }

    fn app() -> Router {
        let state = state_with(
            Arc::new(FixedPredictor::new(vec![0.8, 300.0, 0.25, 200.0])),
            Arc::new(CannedText::new(REPLY)),
        );
        build_router(state, Duration::from_secs(5))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn brand(id: &str, category: &str) -> Value {
        json!({
            "id": id,
            "name": format!("品牌{}", id),
            "category": category,
            "marketShare": 0.2,
            "targetCustomerBase": ["白领"],
            "priceLevel": 3,
        })
    }

    fn location() -> Value {
        json!({
            "id": "NN-CBD-01",
            "coordinates": { "latitude": 22.8, "longitude": 108.3 },
            "trafficFlow": 8000,
            "demographics": { "population": 120000, "incomeLevel": 6, "consumptionPower": 7 },
            "infrastructure": { "parking": 8, "publicTransport": 9, "walkability": 7 },
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_home_lists_five_modules() {
        let (status, body) = get_json(app(), "/api/home").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["modules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["招商革命", "运营进化", "消费升维", "商户赋能", "资产评估"]);
        let paths: Vec<&str> = body["modules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["path"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            vec!["/leasing", "/operations", "/consumer", "/merchant", "/asset"]
        );
        assert!(body["title"].is_string());
    }

    #[tokio::test]
    async fn test_listing_shapes() {
        let cases: [(&str, &[&str]); 13] = [
            ("/api/leasing/location-analysis", &["score", "factors", "recommendations"]),
            ("/api/leasing/brand-simulation", &["optimalMix", "expectedRevenue", "riskLevel"]),
            (
                "/api/leasing/virtual-store",
                &["layoutEfficiency", "predictedSales", "customerFlow", "peakHours", "suggestions"],
            ),
            ("/api/operations/morning-briefing", &["date", "highlights", "weather", "tasks"]),
            ("/api/operations/energy", &["currentConsumption", "comparison", "areas", "suggestions"]),
            ("/api/operations/emergency", &["activeEvents", "resources", "protocols"]),
            ("/api/consumer/recommendations", &["recommendations"]),
            (
                "/api/consumer/ar-guide",
                &["currentLocation", "recommendedPath", "pointsOfInterest", "promotions"],
            ),
            ("/api/consumer/status-analysis", &["crowdDensity", "shoppingMood", "realTimeMetrics"]),
            ("/api/merchant/analysis", &["sales", "inventory"]),
            ("/api/merchant/collaboration", &["sharedData", "totalVolume", "activePartners"]),
            ("/api/merchant/supply-chain", &["vehicles", "avgUnloadTime", "alerts"]),
            ("/api/asset/evaluation", &["esg", "dataAssets"]),
        ];
        for (uri, keys) in cases {
            let (status, body) = get_json(app(), uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            for key in keys {
                assert!(body.get(key).is_some(), "{} lacks {}", uri, key);
            }
        }
    }

    #[tokio::test]
    async fn test_location_analysis_types() {
        let (_, body) = get_json(app(), "/api/leasing/location-analysis").await;
        let score = body["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));

        let factors = body["factors"].as_array().unwrap();
        assert!(!factors.is_empty());
        for factor in factors {
            assert!(factor["name"].is_string());
            assert!(factor["score"].is_number());
        }
        for rec in body["recommendations"].as_array().unwrap() {
            assert!(rec["brand"].is_string());
            assert!(rec["compatibility"].is_number());
        }
    }

    #[tokio::test]
    async fn test_merchant_sales_are_numbers() {
        let (_, body) = get_json(app(), "/api/merchant/analysis").await;
        for key in ["today", "yesterday", "growth"] {
            assert!(body["sales"][key].is_number(), "sales.{}", key);
        }
        assert!(body["inventory"]["warning"].is_u64());
        for item in body["inventory"]["items"].as_array().unwrap() {
            assert!(item["name"].is_string());
            assert!(item["stock"].as_u64().unwrap() < item["threshold"].as_u64().unwrap());
        }
    }

    #[tokio::test]
    async fn test_empty_body_rejected_by_every_action() {
        let routes = [
            "/api/leasing/analyze-location",
            "/api/leasing/analyze-combinations",
            "/api/leasing/simulate-store",
            "/api/leasing/scenario-analysis",
            "/api/operations/morning-report",
            "/api/operations/handle-emergency",
            "/api/operations/energy-optimization",
            "/api/operations/comfort-assessment",
            "/api/consumer/ar-guide/sessions",
        ];
        for uri in routes {
            let (status, body) = post_json(app(), uri, json!({})).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].is_string(), "{}", uri);
            assert!(body["message"].is_string(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_merchant_list_and_growth() {
        let (status, body) = get_json(app(), "/api/merchant").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.as_array().unwrap().is_empty());

        let (_, body) = get_json(app(), "/api/merchant/analysis").await;
        let today = body["sales"]["today"].as_f64().unwrap();
        let yesterday = body["sales"]["yesterday"].as_f64().unwrap();
        let growth = body["sales"]["growth"].as_f64().unwrap();
        assert!((growth - (today - yesterday) / yesterday).abs() < 1e-9);
        assert_eq!(
            body["inventory"]["warning"].as_u64().unwrap() as usize,
            body["inventory"]["items"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_analyze_location() {
        let (status, body) = post_json(
            app(),
            "/api/leasing/analyze-location",
            json!({ "brands": [brand("a", "服装"), brand("b", "餐饮")], "location": location() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!((body["riskScore"]["score"].as_f64().unwrap() - 0.8).abs() < 1e-9);
        assert_eq!(body["competitionIndex"]["matrix"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["customerFlowPrediction"]["weekly"].as_array().unwrap().len(),
            7
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (status, body) = post_json(
            app(),
            "/api/leasing/analyze-location",
            json!({ "brands": [brand("a", "服装")] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_out_of_range_is_bad_request() {
        let mut bad = brand("a", "服装");
        bad["priceLevel"] = json!(9);
        let (status, body) = post_json(
            app(),
            "/api/leasing/analyze-location",
            json!({ "brands": [bad], "location": location() }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("brands[0].priceLevel"));
    }

    #[tokio::test]
    async fn test_missing_model_is_service_unavailable() {
        let state = state_with(
            Arc::new(Unconfigured::new("model runtime")),
            Arc::new(Unconfigured::new("text generator")),
        );
        let (status, body) = post_json(
            build_router(state, Duration::from_secs(5)),
            "/api/leasing/analyze-location",
            json!({ "brands": [brand("a", "服装")], "location": location() }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "选址分析失败");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_simulate_and_scenarios() {
        let (status, body) = post_json(
            app(),
            "/api/leasing/simulate-store",
            json!({ "brand": brand("a", "服装"), "location": location(), "config": { "duration": 30 } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dailyRevenue"].as_array().unwrap().len(), 30);
        assert_eq!(body["peakHours"].as_array().unwrap().len(), 24);

        let (status, body) = post_json(
            app(),
            "/api/leasing/scenario-analysis",
            json!({
                "brand": brand("a", "服装"),
                "location": location(),
                "scenarios": [{ "duration": 10 }, { "duration": 20, "customerVolume": 500 }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_combinations_sorted() {
        let (status, body) = post_json(
            app(),
            "/api/leasing/analyze-combinations",
            json!({
                "brandCombinations": [[brand("a", "服装"), brand("b", "服装")], [brand("c", "数码")]],
                "location": location(),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let scores: Vec<f64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["score"].as_f64().unwrap())
            .collect();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] >= scores[1]);
    }

    #[tokio::test]
    async fn test_handle_emergency() {
        let (status, body) = post_json(
            app(),
            "/api/operations/handle-emergency",
            json!({
                "eventType": "security",
                "eventData": {
                    "id": "evt-9",
                    "type": "security",
                    "description": "2F发现可疑包裹",
                    "timestamp": "2024-03-08T10:00:00Z",
                    "affectedAreas": ["2F"],
                    "severity": "critical",
                    "status": "new",
                },
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "handled");
        assert_eq!(body["plan"]["communicationPlan"]["priority"], "urgent");
        assert_eq!(body["plan"]["resourceAllocation"]["保安"], "4人");
        assert_eq!(body["automatedActions"], json!(["lockdown", "notifyAuthorities"]));
    }

    #[tokio::test]
    async fn test_morning_report_requires_store_data() {
        let (status, _) = post_json(
            app(),
            "/api/operations/morning-report",
            json!({ "date": "2024-03-08" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_energy_optimization() {
        let (status, body) = post_json(
            app(),
            "/api/operations/energy-optimization",
            json!({
                "buildingData": {
                    "buildingId": MAIN_BUILDING_ID,
                    "timestamp": "2024-03-08T10:00:00Z",
                    "readings": {
                        "hvac": { "temperature": 25, "humidity": 55, "power": 100 },
                        "lighting": { "power": 40, "brightness": 600 },
                        "equipment": { "power": 60, "utilization": 0.7 },
                    },
                },
                "tenantPreferences": [{
                    "id": "t1",
                    "name": "品牌A",
                    "zone": "1F-A",
                    "temperatureRange": { "min": 22, "max": 26 },
                    "humidityRange": { "min": 40, "max": 60 },
                    "operatingHours": { "start": "10:00", "end": "22:00" },
                }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["recommendations"].is_array());
        assert!(body["projectedSavings"]["energy"].as_f64().unwrap() > 0.0);
        assert!(body["schedule"].is_array());
    }

    #[tokio::test]
    async fn test_comfort_assessment() {
        let (status, body) = post_json(
            app(),
            "/api/operations/comfort-assessment",
            json!({ "tenantId": "t1", "environmentalData": {} }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "tenantId": "t1", "score": 0.0 }));
    }

    #[tokio::test]
    async fn test_energy_monitoring_query() {
        let uri = format!(
            "/api/operations/energy-monitoring?buildingId={}&timeRange=6h",
            MAIN_BUILDING_ID
        );
        let (status, body) = get_json(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        let count = body.as_array().unwrap().len();
        assert!((5..=7).contains(&count));

        let (status, _) = get_json(app(), "/api/operations/energy-monitoring?timeRange=6h").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!(
            "/api/operations/energy-monitoring?buildingId={}&timeRange=1y",
            MAIN_BUILDING_ID
        );
        let (status, _) = get_json(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_guide_session_streams_ndjson() {
        let request = Request::post("/api/consumer/ar-guide/sessions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "scriptId": "spring-fashion",
                    "userProfile": {
                        "id": "u1",
                        "name": "李女士",
                        "age": 28,
                        "gender": "female",
                        "preferences": ["时尚"],
                    },
                    "startLocation": { "x": 120, "y": 85, "floor": 1 },
                })
                .to_string(),
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], NDJSON_CONTENT_TYPE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let types: Vec<String> = String::from_utf8(body.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, vec!["session", "frame", "frame", "complete"]);
    }

    #[tokio::test]
    async fn test_guide_session_unknown_script() {
        let (status, body) = post_json(
            app(),
            "/api/consumer/ar-guide/sessions",
            json!({
                "scriptId": "nope",
                "userProfile": { "id": "u1", "name": "李女士", "age": 28, "gender": "female", "preferences": [] },
                "startLocation": { "x": 0, "y": 0, "floor": 1 },
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "导购剧本不存在");
    }

    #[tokio::test]
    async fn test_unknown_api_route() {
        let (status, body) = get_json(app(), "/api/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_shell_pages() {
        let response = app()
            .oneshot(Request::get("/merchant").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("销售概况"));
        assert!(html.contains(r#"class="menu-item active" data-page="merchant""#));

        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, _) = get_json(app(), "/unknown-page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
