// Page renderers - decode an endpoint's JSON into widgets
use super::widgets::{ChartKind, ChartSpec, Widget};
use super::Page;
use crate::domain::asset::AssetEvaluation;
use crate::domain::consumer::ConsumerRecommendations;
use crate::domain::leasing::LocationAnalysis;
use crate::domain::merchant::MerchantAnalysis;
use crate::domain::module::HomeOverview;
use crate::domain::operations::MorningBriefing;
use serde::de::DeserializeOwned;
use serde_json::json;

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

pub fn render(page: Page, body: &[u8]) -> Result<Vec<Widget>, serde_json::Error> {
    Ok(match page {
        Page::Home => home(decode(body)?),
        Page::Leasing => leasing(decode(body)?),
        Page::Operations => operations(decode(body)?),
        Page::Consumer => consumer(decode(body)?),
        Page::Merchant => merchant(decode(body)?),
        Page::Asset => asset(decode(body)?),
    })
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn home(data: HomeOverview) -> Vec<Widget> {
    let links = data
        .modules
        .into_iter()
        .map(|m| (m.name, m.path))
        .collect();
    vec![Widget::card(
        format!("欢迎使用{}", data.title),
        vec![Widget::Links(links)],
    )]
}

fn leasing(data: LocationAnalysis) -> Vec<Widget> {
    let mut children = vec![Widget::stat("综合评分", format!("{}", data.score))];
    children.extend(
        data.factors
            .iter()
            .map(|f| Widget::stat(f.name.clone(), format!("{}", f.score))),
    );

    let chart = ChartSpec {
        id: "brandChart".into(),
        kind: ChartKind::Bar,
        option: json!({
            "tooltip": { "trigger": "axis", "axisPointer": { "type": "shadow" } },
            "xAxis": { "type": "value", "max": 1 },
            "yAxis": {
                "type": "category",
                "data": data.recommendations.iter().map(|r| r.brand.as_str()).collect::<Vec<_>>(),
            },
            "series": [{
                "name": "匹配度",
                "type": "bar",
                "data": data.recommendations.iter().map(|r| r.compatibility).collect::<Vec<_>>(),
            }],
        }),
    };

    vec![
        Widget::card("选址分析", children),
        Widget::card("品牌推荐", vec![Widget::Chart(chart)]),
    ]
}

fn operations(data: MorningBriefing) -> Vec<Widget> {
    let mut children = vec![Widget::Text(data.date.format("%Y/%-m/%-d").to_string())];
    children.extend(
        data.highlights
            .into_iter()
            .map(|h| Widget::stat(h.kind, h.value)),
    );
    if let Some(weather) = data.weather {
        children.push(Widget::stat(
            "天气",
            format!("{} {}°C，{}", weather.condition, weather.temperature, weather.suggestion),
        ));
    }
    if !data.tasks.is_empty() {
        children.push(Widget::Table {
            headers: vec!["今日任务".into()],
            rows: data.tasks.into_iter().map(|t| vec![t]).collect(),
        });
    }
    vec![Widget::card("晨会简报", children)]
}

fn consumer(data: ConsumerRecommendations) -> Vec<Widget> {
    let sections = data
        .recommendations
        .into_iter()
        .map(|group| Widget::Card {
            title: group.kind,
            children: vec![Widget::Table {
                headers: vec!["品牌".into(), "商品".into(), "原价".into(), "折后价".into()],
                rows: group
                    .items
                    .into_iter()
                    .map(|item| {
                        vec![
                            item.brand,
                            item.name,
                            format!("¥{}", item.price),
                            format!("¥{:.2}", item.discounted_price),
                        ]
                    })
                    .collect(),
            }],
        })
        .collect();
    vec![Widget::card("个性化推荐", sections)]
}

fn merchant(data: MerchantAnalysis) -> Vec<Widget> {
    vec![
        Widget::card(
            "销售概况",
            vec![
                Widget::stat("今日销售额", format!("¥{}", data.sales.today)),
                Widget::stat("同比增长", percent(data.sales.growth)),
            ],
        ),
        Widget::card(
            format!("库存预警 {}", data.inventory.warning),
            vec![Widget::Table {
                headers: vec!["商品".into(), "当前库存".into(), "警戒线".into()],
                rows: data
                    .inventory
                    .items
                    .into_iter()
                    .map(|i| vec![i.name, i.stock.to_string(), i.threshold.to_string()])
                    .collect(),
            }],
        ),
    ]
}

fn asset(data: AssetEvaluation) -> Vec<Widget> {
    let esg = ChartSpec {
        id: "esgChart".into(),
        kind: ChartKind::Radar,
        option: json!({
            "radar": {
                "indicator": [
                    { "name": "环境", "max": 100 },
                    { "name": "社会", "max": 100 },
                    { "name": "治理", "max": 100 },
                ],
            },
            "series": [{
                "type": "radar",
                "data": [{
                    "value": [data.esg.environmental, data.esg.social, data.esg.governance],
                    "name": "ESG 评分",
                }],
            }],
        }),
    };

    let assets = &data.data_assets;
    let breakdown = ChartSpec {
        id: "dataAssetsChart".into(),
        kind: ChartKind::Pie,
        option: json!({
            "tooltip": { "trigger": "item", "formatter": "{b}: ¥{c} ({d}%)" },
            "series": [{
                "type": "pie",
                "radius": "60%",
                "data": assets
                    .categories
                    .iter()
                    .map(|c| json!({ "name": c.name, "value": c.value }))
                    .collect::<Vec<_>>(),
            }],
        }),
    };

    vec![
        Widget::card("ESG 评估", vec![Widget::Chart(esg)]),
        Widget::card(
            "数据资产价值",
            vec![
                Widget::stat("总价值", format!("¥{}", assets.total_value)),
                Widget::stat("增长率", percent(assets.growth)),
                Widget::Chart(breakdown),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_links_every_module() {
        let body = serde_json::to_vec(&HomeOverview::new()).unwrap();
        let widgets = render(Page::Home, &body).unwrap();
        match &widgets[0] {
            Widget::Card { children, .. } => match &children[0] {
                Widget::Links(links) => {
                    assert_eq!(links.len(), 5);
                    assert_eq!(links[0].1, "/leasing");
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_merchant_shows_growth_percent() {
        let body = json!({
            "sales": { "today": 1200.0, "yesterday": 1000.0, "growth": 0.2 },
            "inventory": { "warning": 1, "items": [{ "name": "羊毛衫", "stock": 3, "threshold": 10 }] },
        });
        let widgets = render(Page::Merchant, body.to_string().as_bytes()).unwrap();
        match &widgets[0] {
            Widget::Card { children, .. } => {
                assert_eq!(children[1], Widget::stat("同比增长", "20.0%"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        assert!(render(Page::Asset, br#"{"unexpected":true}"#).is_err());
    }
}
