// Dashboard module descriptors
use serde::{Deserialize, Serialize};

pub const PLATFORM_TITLE: &str = "南宁百货AI提质增效平台";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardModule {
    Leasing,
    Operations,
    Consumer,
    Merchant,
    Asset,
}

impl DashboardModule {
    pub const ALL: [DashboardModule; 5] = [
        DashboardModule::Leasing,
        DashboardModule::Operations,
        DashboardModule::Consumer,
        DashboardModule::Merchant,
        DashboardModule::Asset,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DashboardModule::Leasing => "leasing",
            DashboardModule::Operations => "operations",
            DashboardModule::Consumer => "consumer",
            DashboardModule::Merchant => "merchant",
            DashboardModule::Asset => "asset",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DashboardModule::Leasing => "招商革命",
            DashboardModule::Operations => "运营进化",
            DashboardModule::Consumer => "消费升维",
            DashboardModule::Merchant => "商户赋能",
            DashboardModule::Asset => "资产评估",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.id())
    }

    pub fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            name: self.display_name().to_string(),
            path: self.path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeOverview {
    pub title: String,
    pub modules: Vec<ModuleDescriptor>,
}

impl HomeOverview {
    pub fn new() -> Self {
        Self {
            title: PLATFORM_TITLE.to_string(),
            modules: DashboardModule::ALL.iter().map(|m| m.descriptor()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_lists_five_modules_in_order() {
        let home = HomeOverview::new();
        let paths: Vec<&str> = home.modules.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/leasing", "/operations", "/consumer", "/merchant", "/asset"]
        );
        assert_eq!(home.modules[0].name, "招商革命");
    }
}
