// In-memory catalog serving the dashboard's reference figures
use crate::application::catalog::DashboardCatalog;
use crate::domain::asset::{AssetCategory, AssetEvaluation, DataAssets, EsgScores};
use crate::domain::consumer::{
    ConsumerRecommendations, CrowdDensity, FloorPoint, GuideLocation, GuidePathOverview, Hotspot,
    MoodFactor, PathStop, PointOfInterest, ProductItem, Promotion, RealTimeMetrics,
    RecommendationGroup, ShoppingMood, StatusAnalysis, UserPreferences,
};
use crate::domain::guide::{
    FloorPosition, GuideScene, GuideScript, ProductInfo, SceneContent, SceneContentType,
    TargetAudience,
};
use crate::domain::leasing::{
    BrandCompatibility, BrandMixSimulation, CategoryShare, LocationAnalysis, ScoredFactor,
    VirtualStoreSnapshot,
};
use crate::domain::merchant::{
    CollaborationStats, InventoryItem, MerchantSummary, SalesSnapshot, SharedDataLink,
    SupplyChainStats,
};
use crate::domain::operations::{
    ActiveEvent, AreaConsumption, AreaStatus, ConsumptionComparison, EmergencyOverview,
    EnergyData, EnergyOverview, EnergyReadings, EquipmentReading, Highlight, HvacReading,
    LightingReading, MorningBriefing, ResourceRoster, Severity, WeatherOutlook, Zone,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, NaiveDate, Timelike, Utc};
use std::collections::HashMap;

pub const MAIN_BUILDING_ID: &str = "NNBH-MAIN";

/// Oldest reading kept for a building
const READING_RETENTION_DAYS: i64 = 30;

pub struct StaticCatalog {
    scripts: HashMap<String, GuideScript>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        let scripts = default_scripts()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        Self { scripts }
    }

    fn reading_at(building_id: &str, timestamp: DateTime<Utc>) -> EnergyData {
        let hour = timestamp.hour();
        let open = (10..=21).contains(&hour);
        let load = if open { 1.0 } else { 0.35 };
        EnergyData {
            building_id: building_id.to_string(),
            timestamp,
            readings: EnergyReadings {
                hvac: HvacReading {
                    temperature: if open { 24.5 } else { 26.0 },
                    humidity: 55.0,
                    power: 480.0 * load,
                },
                lighting: LightingReading {
                    power: 320.0 * load,
                    brightness: if open { 600.0 } else { 150.0 },
                },
                equipment: EquipmentReading {
                    power: 260.0 * load,
                    utilization: 0.75 * load,
                },
            },
            zones: vec![
                Zone {
                    id: "1F-A".into(),
                    kind: "retail".into(),
                    occupancy: if open { 420.0 } else { 0.0 },
                    temperature: 24.0,
                    humidity: 52.0,
                },
                Zone {
                    id: "2F-F&B".into(),
                    kind: "food".into(),
                    occupancy: if open { 260.0 } else { 0.0 },
                    temperature: 25.0,
                    humidity: 58.0,
                },
            ],
        }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DashboardCatalog for StaticCatalog {
    async fn location_analysis(&self) -> anyhow::Result<LocationAnalysis> {
        let factors = [("人流量", 90.0), ("消费能力", 85.0), ("竞争强度", 75.0), ("交通便利性", 88.0)]
            .into_iter()
            .map(|(name, score)| ScoredFactor {
                name: name.to_string(),
                score,
            })
            .collect();
        let recommendations = [("ZARA", 0.92), ("优衣库", 0.88), ("H&M", 0.85)]
            .into_iter()
            .map(|(brand, compatibility)| BrandCompatibility {
                brand: brand.to_string(),
                compatibility,
            })
            .collect();
        Ok(LocationAnalysis::new(factors, recommendations))
    }

    async fn brand_mix(&self) -> anyhow::Result<BrandMixSimulation> {
        let optimal_mix = [("餐饮", 35.0), ("服装", 25.0), ("娱乐", 20.0), ("零售", 20.0)]
            .into_iter()
            .map(|(category, percentage)| CategoryShare {
                category: category.to_string(),
                percentage,
            })
            .collect();
        Ok(BrandMixSimulation {
            optimal_mix,
            expected_revenue: 1_250_000.0,
            risk_level: "medium".to_string(),
        })
    }

    async fn virtual_store(&self) -> anyhow::Result<VirtualStoreSnapshot> {
        Ok(VirtualStoreSnapshot {
            layout_efficiency: 92.0,
            predicted_sales: 85_000.0,
            customer_flow: 1200.0,
            peak_hours: vec!["14:00".into(), "19:00".into()],
            suggestions: vec!["优化收银区布局".into(), "增加休息区座位".into(), "调整照明方案".into()],
        })
    }

    async fn morning_briefing(&self) -> anyhow::Result<MorningBriefing> {
        let highlights = [
            ("客流", "预计今日客流12000人次，较昨日+15%"),
            ("销售", "昨日销售额85.6万元，完成目标108%"),
            ("活动", "今日3场促销活动，2场品牌发布会"),
        ]
        .into_iter()
        .map(|(kind, value)| Highlight {
            kind: kind.to_string(),
            value: value.to_string(),
        })
        .collect();
        Ok(MorningBriefing {
            date: Utc::now(),
            highlights,
            weather: Some(WeatherOutlook {
                temperature: 26.0,
                condition: "晴".into(),
                suggestion: "适合举办户外活动".into(),
            }),
            tasks: vec![
                "9:30 商户联席会议".into(),
                "14:00 消防演习".into(),
                "16:00 VIP客户酒会".into(),
            ],
        })
    }

    async fn energy_overview(&self) -> anyhow::Result<EnergyOverview> {
        let areas = [
            ("中央空调", 1200.0, AreaStatus::Normal),
            ("照明系统", 800.0, AreaStatus::Warning),
            ("电梯系统", 500.0, AreaStatus::Normal),
            ("其他设备", 350.0, AreaStatus::Normal),
        ]
        .into_iter()
        .map(|(name, consumption, status)| AreaConsumption {
            name: name.to_string(),
            consumption,
            status,
        })
        .collect();
        Ok(EnergyOverview::new(
            ConsumptionComparison {
                yesterday: -5.0,
                last_week: -8.0,
            },
            areas,
            vec![
                "建议调整3楼照明亮度".into(),
                "优化中央空调运行时段".into(),
                "考虑更换节能灯具".into(),
            ],
        ))
    }

    async fn emergency_overview(&self) -> anyhow::Result<EmergencyOverview> {
        Ok(EmergencyOverview {
            active_events: vec![
                ActiveEvent {
                    kind: "设备故障".into(),
                    location: "3F-15号电梯".into(),
                    level: Severity::Medium,
                    action: "已通知维修团队，预计30分钟内修复".into(),
                },
                ActiveEvent {
                    kind: "客流拥堵".into(),
                    location: "1F中庭".into(),
                    level: Severity::High,
                    action: "已增派保安疏导，开放应急通道".into(),
                },
            ],
            resources: ResourceRoster {
                security: 12,
                medical: 3,
                maintenance: 5,
            },
            protocols: vec![
                "立即封锁事故区域".into(),
                "疏散周边顾客".into(),
                "联系相关部门支援".into(),
            ],
        })
    }

    async fn energy_readings(
        &self,
        building_id: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<EnergyData>> {
        if building_id != MAIN_BUILDING_ID {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let oldest = now - Duration::days(READING_RETENTION_DAYS);
        let start = since.max(oldest).duration_trunc(Duration::hours(1))?;
        let mut readings = Vec::new();
        let mut at = start;
        while at <= now {
            if at >= since {
                readings.push(Self::reading_at(building_id, at));
            }
            at += Duration::hours(1);
        }
        Ok(readings)
    }

    async fn product_recommendations(&self) -> anyhow::Result<ConsumerRecommendations> {
        Ok(ConsumerRecommendations {
            user_preferences: Some(UserPreferences {
                style: vec!["休闲".into(), "时尚".into()],
                price_range: "中等".into(),
                favorite_brands: vec!["优衣库".into(), "ZARA".into()],
            }),
            recommendations: vec![
                RecommendationGroup {
                    kind: "服装".into(),
                    items: vec![
                        ProductItem::new("ZARA", "春季外套", 599.0, 0.8, Some("2F-12号")),
                        ProductItem::new("优衣库", "休闲裤", 299.0, 0.9, Some("1F-08号")),
                    ],
                },
                RecommendationGroup {
                    kind: "配饰".into(),
                    items: vec![ProductItem::new("潘多拉", "手链", 999.0, 1.0, Some("1F-15号"))],
                },
            ],
            seasonal_trends: vec!["春季薄外套".into(), "亮色系配饰".into(), "运动休闲风".into()],
        })
    }

    async fn guide_path(&self) -> anyhow::Result<GuidePathOverview> {
        let stop = |floor, zone: &str, shop: &str, kind: &str| PathStop {
            floor,
            zone: zone.to_string(),
            shop: shop.to_string(),
            kind: kind.to_string(),
        };
        Ok(GuidePathOverview {
            current_location: GuideLocation {
                floor: 1,
                zone: "A".into(),
                coordinates: FloorPoint { x: 120.0, y: 85.0 },
            },
            recommended_path: vec![
                stop(1, "A", "优衣库", "服装"),
                stop(1, "B", "星巴克", "餐饮"),
                stop(2, "C", "无印良品", "生活"),
            ],
            points_of_interest: vec![
                PointOfInterest {
                    name: "新品发布区".into(),
                    description: "春季新品特惠".into(),
                    distance: 50.0,
                },
                PointOfInterest {
                    name: "休息区".into(),
                    description: "免费WiFi、充电".into(),
                    distance: 100.0,
                },
            ],
            promotions: vec![Promotion {
                shop: "优衣库".into(),
                offer: "新品8折".into(),
                valid_until: NaiveDate::from_ymd_opt(2024, 3, 31)
                    .ok_or_else(|| anyhow::anyhow!("invalid promotion date"))?,
            }],
        })
    }

    async fn status_analysis(&self) -> anyhow::Result<StatusAnalysis> {
        let factor = |name: &str, status: &str| MoodFactor {
            name: name.to_string(),
            status: status.to_string(),
        };
        Ok(StatusAnalysis {
            crowd_density: CrowdDensity {
                overall: 65.0,
                hotspots: vec![
                    Hotspot {
                        location: "1F中庭".into(),
                        density: 85.0,
                    },
                    Hotspot {
                        location: "2F美食区".into(),
                        density: 75.0,
                    },
                ],
            },
            shopping_mood: ShoppingMood {
                overall: "positive".into(),
                factors: vec![
                    factor("温度", "optimal"),
                    factor("音乐", "good"),
                    factor("照明", "good"),
                ],
            },
            real_time_metrics: RealTimeMetrics {
                average_stay_time: 95.0,
                conversion_rate: 35.0,
                return_rate: 42.0,
            },
        })
    }

    async fn guide_script(&self, script_id: &str) -> anyhow::Result<Option<GuideScript>> {
        Ok(self.scripts.get(script_id).filter(|s| s.is_active).cloned())
    }

    async fn merchants(&self) -> anyhow::Result<Vec<MerchantSummary>> {
        Ok(vec![
            MerchantSummary {
                id: 1,
                name: "品牌A".into(),
                kind: "服装".into(),
                status: "营业中".into(),
            },
            MerchantSummary {
                id: 2,
                name: "品牌B".into(),
                kind: "餐饮".into(),
                status: "营业中".into(),
            },
        ])
    }

    async fn sales(&self) -> anyhow::Result<SalesSnapshot> {
        Ok(SalesSnapshot::new(85_600.0, 78_900.0))
    }

    async fn inventory(&self) -> anyhow::Result<Vec<InventoryItem>> {
        let item = |name: &str, stock, threshold| InventoryItem {
            name: name.to_string(),
            stock,
            threshold,
        };
        Ok(vec![
            item("商品A", 5, 10),
            item("商品B", 3, 8),
            item("商品C", 42, 12),
        ])
    }

    async fn collaboration(&self) -> anyhow::Result<CollaborationStats> {
        let link = |merchant: &str, data_type: &str| SharedDataLink {
            merchant: merchant.to_string(),
            data_type: data_type.to_string(),
            status: "active".to_string(),
        };
        Ok(CollaborationStats {
            shared_data: 24,
            total_volume: "1.2TB".into(),
            active_partners: 18,
            links: vec![link("品牌A", "销售数据"), link("品牌B", "会员画像")],
        })
    }

    async fn supply_chain(&self) -> anyhow::Result<SupplyChainStats> {
        Ok(SupplyChainStats {
            vehicles: 45,
            avg_unload_time: 25.0,
            alerts: 3,
        })
    }

    async fn asset_evaluation(&self) -> anyhow::Result<AssetEvaluation> {
        let categories = [("用户数据", 500_000.0), ("交易数据", 400_000.0), ("运营数据", 300_000.0)]
            .into_iter()
            .map(|(name, value)| AssetCategory {
                name: name.to_string(),
                value,
            })
            .collect();
        Ok(AssetEvaluation {
            esg: EsgScores {
                environmental: 85.0,
                social: 78.0,
                governance: 92.0,
            },
            data_assets: DataAssets::new(0.15, categories),
        })
    }
}

fn default_scripts() -> Vec<GuideScript> {
    let scene = |id: &str, x, y, floor, kind, title: &str, description: &str| GuideScene {
        id: id.to_string(),
        location: FloorPosition { x, y, floor },
        content: SceneContent {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            media: Vec::new(),
            duration: Some(30),
            product_info: None,
        },
        trigger_distance: 15.0,
    };

    let mut spring_coat = scene(
        "coat",
        128.0,
        60.0,
        2,
        SceneContentType::Product,
        "春季外套",
        "ZARA 新品8折",
    );
    spring_coat.content.product_info = Some(ProductInfo {
        product_id: "zara-coat-24ss".into(),
        price: 599.0,
        discount: Some(0.8),
        availability: true,
    });

    vec![
        GuideScript {
            id: "spring-fashion".into(),
            name: "春季时尚之旅".into(),
            description: "从中庭出发，串联服装与配饰新品".into(),
            version: "1.0.0".into(),
            target_audience: TargetAudience {
                age_range: (18, 45),
                interests: vec!["时尚".into(), "休闲".into()],
                vip_level_required: None,
            },
            scenes: vec![
                scene("atrium", 120.0, 85.0, 1, SceneContentType::Story, "中庭", "百货历史与品牌故事"),
                spring_coat,
                scene("lounge", 90.0, 40.0, 2, SceneContentType::Interaction, "休息区", "免费WiFi、充电"),
            ],
            is_active: true,
        },
        GuideScript {
            id: "family-day".into(),
            name: "亲子欢乐日".into(),
            description: "儿童业态与亲子餐厅导览".into(),
            version: "1.0.0".into(),
            target_audience: TargetAudience {
                age_range: (25, 55),
                interests: vec!["亲子".into(), "美食".into()],
                vip_level_required: None,
            },
            scenes: vec![
                scene("kids", 60.0, 30.0, 3, SceneContentType::Story, "儿童乐园", "周末亲子活动"),
                scene("dining", 140.0, 20.0, 4, SceneContentType::Interaction, "亲子餐厅", "扫码领取儿童餐券"),
            ],
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inventory_lists_healthy_and_low_items() {
        let catalog = StaticCatalog::new();
        let items = catalog.inventory().await.unwrap();
        assert_eq!(items.iter().filter(|i| i.is_below_threshold()).count(), 2);
    }

    #[tokio::test]
    async fn test_readings_respect_window_and_building() {
        let catalog = StaticCatalog::new();
        let since = Utc::now() - Duration::hours(24);
        let readings = catalog.energy_readings(MAIN_BUILDING_ID, since).await.unwrap();
        assert!(readings.len() >= 23 && readings.len() <= 25);
        assert!(readings.iter().all(|r| r.timestamp >= since));
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let none = catalog.energy_readings("unknown", since).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_scripts_are_looked_up_by_id() {
        let catalog = StaticCatalog::new();
        assert!(catalog.guide_script("spring-fashion").await.unwrap().is_some());
        assert!(catalog.guide_script("missing").await.unwrap().is_none());
    }
}
