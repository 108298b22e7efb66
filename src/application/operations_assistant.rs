// Operations assistant - morning reports and emergency response plans via the text generator
use crate::application::capabilities::TextGenerator;
use crate::application::error::{with_timeout, CapabilityError};
use crate::domain::operations::{
    CommunicationPlan, EmergencyEvent, EmergencyResponse, EventStatus, MorningReport,
    ReportContent, ReportMetrics, ResponsePlan, Severity, StoreData,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

const CAPABILITY: &str = "text generator";

const REPORT_SYSTEM_PROMPT: &str = "你是一个专业的商业运营分析师，负责生成简洁而信息丰富的晨会简报。";
const EMERGENCY_SYSTEM_PROMPT: &str = "你是一个专业的商场应急管理专家，负责制定快速有效的应急响应方案。";

pub const PUSH_PROMOTIONS: &str = "建议加强促销力度，特别是在客流高峰时段";
pub const COACH_SALES_STAFF: &str = "需要优化导购配置，加强销售技能培训";
pub const PREPARE_FOR_RAIN: &str = "准备雨具租借服务，加强防滑措施";

#[derive(Debug, PartialEq, Eq)]
pub struct EmergencyStrategy {
    pub priority: &'static str,
    pub automated_actions: &'static [&'static str],
    pub channels: &'static [&'static str],
}

const WEATHER: EmergencyStrategy = EmergencyStrategy {
    priority: "high",
    automated_actions: &["adjustVentilation", "notifyTenants"],
    channels: &["sms", "app"],
};

const SECURITY: EmergencyStrategy = EmergencyStrategy {
    priority: "urgent",
    automated_actions: &["lockdown", "notifyAuthorities"],
    channels: &["sms", "app", "broadcast"],
};

const MAINTENANCE: EmergencyStrategy = EmergencyStrategy {
    priority: "medium",
    automated_actions: &["isolateArea", "redirectTraffic"],
    channels: &["app"],
};

/// Unknown event types are handled as maintenance
pub fn select_strategy(event_type: &str) -> &'static EmergencyStrategy {
    match event_type.trim() {
        "weather" => &WEATHER,
        "security" => &SECURITY,
        _ => &MAINTENANCE,
    }
}

#[derive(Clone)]
pub struct OperationsAssistant {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl OperationsAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn generate_morning_report(
        &self,
        date: NaiveDate,
        store_data: &StoreData,
    ) -> Result<MorningReport, CapabilityError> {
        let prompt = morning_report_prompt(date, store_data);
        let completion = with_timeout(
            CAPABILITY,
            self.timeout,
            self.generator.complete(REPORT_SYSTEM_PROMPT, &prompt),
        )
        .await?;

        Ok(MorningReport {
            date,
            content: parse_report_content(&completion)?,
            metrics: key_metrics(store_data),
            recommendations: rule_recommendations(store_data),
        })
    }

    pub async fn handle_emergency(
        &self,
        event_type: &str,
        event: &EmergencyEvent,
    ) -> Result<EmergencyResponse, CapabilityError> {
        let strategy = select_strategy(event_type);
        let prompt = response_plan_prompt(event, strategy);
        let completion = with_timeout(
            CAPABILITY,
            self.timeout,
            self.generator.complete(EMERGENCY_SYSTEM_PROMPT, &prompt),
        )
        .await?;
        let plan = parse_response_plan(&completion, strategy)?;

        let automated_actions = execute_automated_actions(event, strategy);

        Ok(EmergencyResponse {
            event_id: event.id.clone(),
            status: EventStatus::Handled,
            plan,
            automated_actions,
            next_steps: next_steps(event),
        })
    }
}

fn morning_report_prompt(date: NaiveDate, data: &StoreData) -> String {
    let mut prompt = String::new();
    let m = &data.yesterday_metrics;
    let _ = writeln!(prompt, "请生成{}的晨会简报，包含以下内容：", date.format("%Y/%-m/%-d"));
    let _ = writeln!(prompt, "1. 昨日经营概况");
    let _ = writeln!(prompt, "- 总客流：{}", m.total_traffic);
    let _ = writeln!(prompt, "- 总销售额：{}", m.total_sales);
    let _ = writeln!(prompt, "- 转化率：{}", m.conversion_rate);
    let _ = writeln!(prompt, "2. 重点关注");
    for issue in &data.key_issues {
        let _ = writeln!(prompt, "- {}", issue);
    }
    let _ = writeln!(prompt, "3. 今日预测");
    let _ = writeln!(prompt, "- 预计客流：{}", data.predictions.expected_traffic);
    let _ = writeln!(prompt, "- 天气情况：{}", data.predictions.weather);
    let _ = writeln!(prompt, "- 重要活动：{}", data.predictions.events.join(", "));
    prompt.push_str("请提供简明扼要的分析和具体可行的建议。");
    prompt
}

/// Blank-line separated blocks: summary, analysis, then one recommendation per line
fn parse_report_content(completion: &str) -> Result<ReportContent, CapabilityError> {
    let normalized = completion.replace("\r\n", "\n");
    let sections: Vec<&str> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let summary = sections
        .first()
        .ok_or_else(|| CapabilityError::malformed(CAPABILITY, "empty report"))?;

    Ok(ReportContent {
        summary: summary.to_string(),
        analysis: sections.get(1).map(|s| s.to_string()).unwrap_or_default(),
        recommendations: sections
            .get(2)
            .map(|block| {
                block
                    .lines()
                    .map(strip_bullet)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn percent_change(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (current - baseline) / baseline * 100.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn key_metrics(data: &StoreData) -> ReportMetrics {
    let m = &data.yesterday_metrics;
    let h = &data.historical_data;
    ReportMetrics {
        sales_growth: percent_change(m.total_sales, h.average_daily_sales),
        traffic_growth: percent_change(m.total_traffic, h.average_daily_traffic),
        conversion_rate: ratio(m.transactions, m.total_traffic),
        average_ticket_size: ratio(m.total_sales, m.transactions),
    }
}

pub fn rule_recommendations(data: &StoreData) -> Vec<String> {
    let m = &data.yesterday_metrics;
    let h = &data.historical_data;
    let mut recommendations = Vec::new();
    if m.total_sales < h.average_daily_sales {
        recommendations.push(PUSH_PROMOTIONS.to_string());
    }
    if m.conversion_rate < h.average_conversion_rate {
        recommendations.push(COACH_SALES_STAFF.to_string());
    }
    if data.predictions.weather.contains('雨') {
        recommendations.push(PREPARE_FOR_RAIN.to_string());
    }
    recommendations
}

fn response_plan_prompt(event: &EmergencyEvent, strategy: &EmergencyStrategy) -> String {
    format!(
        "请针对以下突发事件生成应急响应方案：\n\
         事件类型：{}\n\
         事件描述：{}\n\
         影响范围：{}\n\
         优先级：{}\n\
         请包含：\n\
         1. 即时响应措施\n\
         2. 资源调配建议\n\
         3. 沟通方案\n\
         4. 后续跟进事项\n\
         每个部分的条目以“- ”开头，资源调配使用“资源：安排”的格式。",
        event.kind,
        event.description,
        event.affected_areas.join(", "),
        strategy.priority
    )
}

/// Section number of a heading line such as `2. 资源调配建议` or `3、沟通方案`.
/// ASCII separators must be followed by whitespace so `1.5小时内` stays an item.
fn section_heading(line: &str) -> Option<(u8, &str)> {
    let mut chars = line.chars();
    let digit = chars.next()?.to_digit(10)?;
    let rest = chars.as_str();
    let rest = match rest.strip_prefix(['.', ')']) {
        Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => after,
        Some(_) => return None,
        None => rest.strip_prefix(['、', '）'])?,
    };
    (1..=4).contains(&digit).then(|| (digit as u8, rest.trim()))
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '*', '•', '·'])
        .trim()
}

fn split_pair(item: &str) -> (String, String) {
    match item.split_once(['：', ':']) {
        Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
        None => (item.to_string(), String::new()),
    }
}

/// Inline content after a heading, e.g. `1. 即时响应措施：封锁现场`
fn heading_inline(rest: &str) -> Option<&str> {
    rest.split_once(['：', ':'])
        .map(|(_, content)| content.trim())
        .filter(|content| !content.is_empty())
}

pub fn parse_response_plan(
    completion: &str,
    strategy: &EmergencyStrategy,
) -> Result<ResponsePlan, CapabilityError> {
    let mut sections: [Vec<String>; 4] = Default::default();
    let mut current: Option<usize> = None;

    for line in completion.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some((number, rest)) = section_heading(line) {
            let idx = (number - 1) as usize;
            current = Some(idx);
            if let Some(content) = heading_inline(rest) {
                sections[idx].push(content.to_string());
            }
            continue;
        }
        if let Some(idx) = current {
            let item = strip_bullet(line);
            if !item.is_empty() {
                sections[idx].push(item.to_string());
            }
        }
    }

    if sections.iter().all(Vec::is_empty) {
        return Err(CapabilityError::malformed(
            CAPABILITY,
            "response plan has no numbered sections",
        ));
    }

    let [immediate, resources, communication, follow_up] = sections;
    let resource_allocation: BTreeMap<String, String> =
        resources.iter().map(|item| split_pair(item)).collect();

    Ok(ResponsePlan {
        immediate_actions: immediate,
        resource_allocation,
        communication_plan: CommunicationPlan {
            priority: strategy.priority.to_string(),
            channels: strategy.channels.iter().map(|c| c.to_string()).collect(),
            briefing: communication,
        },
        follow_up_tasks: follow_up,
    })
}

fn execute_automated_actions(event: &EmergencyEvent, strategy: &EmergencyStrategy) -> Vec<String> {
    for action in strategy.automated_actions {
        tracing::info!(
            event_id = %event.id,
            action = %action,
            areas = ?event.affected_areas,
            "Automated emergency action dispatched"
        );
    }
    tracing::info!(
        event_id = %event.id,
        channels = ?strategy.channels,
        "Stakeholders notified"
    );
    strategy
        .automated_actions
        .iter()
        .map(|a| a.to_string())
        .collect()
}

pub fn next_steps(event: &EmergencyEvent) -> Vec<String> {
    let mut steps: Vec<String> = match event.severity {
        Severity::Critical => vec![
            "启动最高级别应急预案".into(),
            "每15分钟向管理层汇报处置进展".into(),
            "24小时内提交事故调查报告".into(),
        ],
        Severity::High => vec![
            "每30分钟更新处置进展".into(),
            "安排专人值守受影响区域".into(),
            "事件结束后提交事故报告".into(),
        ],
        Severity::Medium => vec!["2小时内复查处置结果".into(), "记录事件并归档".into()],
        Severity::Low => vec!["记录事件并归档".into()],
    };
    steps.extend(
        event
            .affected_areas
            .iter()
            .map(|area| format!("确认{}恢复正常运营", area)),
    );
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::capabilities::fakes::CannedText;
    use crate::domain::operations::{DailyMetrics, DayOutlook, HistoricalAverages};
    use chrono::Utc;

    fn store_data(weather: &str) -> StoreData {
        StoreData {
            yesterday_metrics: DailyMetrics {
                total_traffic: 10_000.0,
                total_sales: 800_000.0,
                conversion_rate: 0.3,
                transactions: 2_500.0,
            },
            historical_data: HistoricalAverages {
                average_daily_sales: 1_000_000.0,
                average_daily_traffic: 8_000.0,
                average_conversion_rate: 0.35,
            },
            key_issues: vec!["3楼扶梯维修".into()],
            predictions: DayOutlook {
                expected_traffic: 12_000.0,
                weather: weather.into(),
                events: vec!["品牌发布会".into()],
            },
        }
    }

    fn event(severity: Severity) -> EmergencyEvent {
        EmergencyEvent {
            id: "evt-1".into(),
            kind: "weather".into(),
            description: "暴雨导致1F入口积水".into(),
            timestamp: Utc::now(),
            affected_areas: vec!["1F入口".into()],
            severity,
            status: EventStatus::New,
        }
    }

    #[test]
    fn test_metrics() {
        let metrics = key_metrics(&store_data("晴"));
        assert!((metrics.sales_growth - -20.0).abs() < 1e-9);
        assert!((metrics.traffic_growth - 25.0).abs() < 1e-9);
        assert!((metrics.conversion_rate - 0.25).abs() < 1e-12);
        assert!((metrics.average_ticket_size - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_rule_recommendations() {
        assert_eq!(
            rule_recommendations(&store_data("中雨")),
            vec![PUSH_PROMOTIONS, COACH_SALES_STAFF, PREPARE_FOR_RAIN]
        );
        let mut good = store_data("晴");
        good.yesterday_metrics.total_sales = 1_200_000.0;
        good.yesterday_metrics.conversion_rate = 0.4;
        assert!(rule_recommendations(&good).is_empty());
    }

    #[test]
    fn test_report_sections() {
        let content = parse_report_content(
            "昨日客流1万人次。\r\n\r\n销售低于均值20%。\n\n- 加强促销\n- 增加导购\n",
        )
        .unwrap();
        assert_eq!(content.summary, "昨日客流1万人次。");
        assert_eq!(content.analysis, "销售低于均值20%。");
        assert_eq!(content.recommendations, vec!["加强促销", "增加导购"]);

        assert!(parse_report_content("   ").is_err());
    }

    #[tokio::test]
    async fn test_morning_report_uses_generator() {
        let generator = Arc::new(CannedText::new("概况\n\n分析\n\n建议一"));
        let assistant = OperationsAssistant::new(generator.clone(), Duration::from_secs(1));
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let report = assistant
            .generate_morning_report(date, &store_data("晴"))
            .await
            .unwrap();
        assert_eq!(report.content.recommendations, vec!["建议一"]);
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("2024/3/8"));
        assert!(prompts[0].contains("- 3楼扶梯维修"));
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(select_strategy("security").priority, "urgent");
        assert_eq!(select_strategy("weather").channels, &["sms", "app"]);
        assert_eq!(select_strategy("fire-drill"), &MAINTENANCE);
    }

    #[test]
    fn test_response_plan_parsing() {
        let completion = "\
1. 即时响应措施
- 封锁1F入口
- 铺设防滑垫
2、资源调配建议
- 保安：4人
- 保洁：2人
3. 沟通方案：通过广播提示顾客绕行
4. 后续跟进事项
* 检查排水系统";
        let plan = parse_response_plan(completion, &WEATHER).unwrap();
        assert_eq!(plan.immediate_actions, vec!["封锁1F入口", "铺设防滑垫"]);
        assert_eq!(plan.resource_allocation.get("保安").map(String::as_str), Some("4人"));
        assert_eq!(plan.communication_plan.briefing, vec!["通过广播提示顾客绕行"]);
        assert_eq!(plan.communication_plan.priority, "high");
        assert_eq!(plan.follow_up_tasks, vec!["检查排水系统"]);
    }

    #[test]
    fn test_decimal_item_is_not_a_heading() {
        let completion = "\
1. 即时响应措施
1.5小时内完成排查
2) 资源调配建议
- 电工：1人";
        let plan = parse_response_plan(completion, &MAINTENANCE).unwrap();
        assert_eq!(plan.immediate_actions, vec!["1.5小时内完成排查"]);
        assert_eq!(plan.resource_allocation.get("电工").map(String::as_str), Some("1人"));
        assert_eq!(section_heading("3.沟通方案"), None);
        assert_eq!(section_heading("4."), Some((4, "")));
    }

    #[test]
    fn test_unstructured_plan_is_malformed() {
        assert!(parse_response_plan("收到，马上处理。", &MAINTENANCE).is_err());
    }

    #[tokio::test]
    async fn test_handle_emergency() {
        let generator = Arc::new(CannedText::new("1. 即时响应措施\n- 疏散顾客"));
        let assistant = OperationsAssistant::new(generator, Duration::from_secs(1));
        let response = assistant
            .handle_emergency("weather", &event(Severity::High))
            .await
            .unwrap();
        assert_eq!(response.event_id, "evt-1");
        assert_eq!(response.status, EventStatus::Handled);
        assert_eq!(response.automated_actions, vec!["adjustVentilation", "notifyTenants"]);
        assert_eq!(response.next_steps.len(), 4);
        assert_eq!(response.next_steps[3], "确认1F入口恢复正常运营");
    }
}
