//! 成本計算配置

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::pricing::BillingType;
use crate::{CostingError, Result};

/// `Decimal` 支援的最大小數位數
const MAX_MONEY_SCALE: u32 = 28;

/// 成本計算參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostingConfig {
    /// 未指定時使用的計價類型
    pub default_billing_type: BillingType,

    /// 是否嚴格檢查快照
    /// - true: 有效剩餘為負時直接返回 `CostingError::InconsistentSnapshot`
    /// - false: 跳過該批次並以 `AllocationIssue::InconsistentSnapshot` 回報（預設）
    pub strict_snapshot: bool,

    /// 行成本小數位數（None 表示不四捨五入）
    pub money_scale: Option<u32>,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            default_billing_type: BillingType::Retail,
            strict_snapshot: false,
            money_scale: None,
        }
    }
}

impl CostingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置預設計價類型
    pub fn with_default_billing_type(mut self, billing_type: BillingType) -> Self {
        self.default_billing_type = billing_type;
        self
    }

    /// 建構器模式：設置嚴格快照檢查
    pub fn with_strict_snapshot(mut self, strict: bool) -> Self {
        self.strict_snapshot = strict;
        self
    }

    /// 建構器模式：設置金額小數位數
    pub fn with_money_scale(mut self, scale: u32) -> Self {
        self.money_scale = Some(scale);
        self
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(scale) = self.money_scale {
            if scale > MAX_MONEY_SCALE {
                return Err(CostingError::InvalidConfig(format!(
                    "money_scale 不可超過 {}: {}",
                    MAX_MONEY_SCALE, scale
                )));
            }
        }
        Ok(())
    }

    /// 依配置處理金額（四捨五入，遠離零）
    pub fn round_money(&self, amount: Decimal) -> Decimal {
        match self.money_scale {
            Some(scale) => {
                amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
            }
            None => amount,
        }
    }
}
