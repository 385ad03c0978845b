// ==========================================
// 供应商到货管控 - 运行配置
// ==========================================
// 职责: 作业时间窗、看板周期选项
// 说明: 所有小时选择都被收敛到作业时间窗内
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("配置无效: {0}")]
pub struct InvalidConfig(pub String);

// ==========================================
// OperatingHours - 作业时间窗（闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl OperatingHours {
    /// 创建并校验: 0 <= open <= close <= 23
    pub fn new(open_hour: u32, close_hour: u32) -> Result<Self, InvalidConfig> {
        if open_hour > close_hour || close_hour > 23 {
            return Err(InvalidConfig(format!(
                "作业时间窗非法: open_hour={}, close_hour={}",
                open_hour, close_hour
            )));
        }
        Ok(Self {
            open_hour,
            close_hour,
        })
    }

    /// 将小时收敛到时间窗内
    pub fn clamp(&self, hour: u32) -> u32 {
        hour.clamp(self.open_hour, self.close_hour)
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.open_hour..=self.close_hour).contains(&hour)
    }

    /// 可选小时列表（界面下拉框）
    pub fn hours(&self) -> Vec<u32> {
        (self.open_hour..=self.close_hour).collect()
    }
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 18,
        }
    }
}

/// 看板回看周数上限（一个 ISO 年最多 53 周）
pub const MAX_WEEKS_BACK: u32 = 53;

// ==========================================
// DockConfig - 全局配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockConfig {
    pub operating_hours: OperatingHours,
    pub week_options: Vec<u32>,   // 看板"已完成周数"选项
    pub default_weeks_back: u32,
}

impl DockConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        OperatingHours::new(self.operating_hours.open_hour, self.operating_hours.close_hour)?;
        let in_range = |w: u32| (1..=MAX_WEEKS_BACK).contains(&w);
        if self.week_options.is_empty() || !self.week_options.iter().all(|&w| in_range(w)) {
            return Err(InvalidConfig(format!(
                "看板周期选项必须在 1..={} 之间: {:?}",
                MAX_WEEKS_BACK, self.week_options
            )));
        }
        if !in_range(self.default_weeks_back) {
            return Err(InvalidConfig(format!(
                "默认周期必须在 1..={} 之间: {}",
                MAX_WEEKS_BACK, self.default_weeks_back
            )));
        }
        Ok(())
    }
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            operating_hours: OperatingHours::default(),
            week_options: vec![1, 2, 4, 12, 24],
            default_weeks_back: 1,
        }
    }
}
