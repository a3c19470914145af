//! 報價模型

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 計價類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    /// 零售
    #[default]
    Retail,
    /// 批發
    Wholesale,
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingType::Retail => write!(f, "零售"),
            BillingType::Wholesale => write!(f, "批發"),
        }
    }
}

/// 報價結果（取自最早未用完的批次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub variant_id: String,
    pub lot_id: String,
    pub billing_type: BillingType,
    pub unit_price: Decimal,
}

/// 規格批次佇列狀態
///
/// `LotActive → (有效剩餘歸零) → 下一批次 → … → AllLotsExhausted`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LotQueueState {
    /// 目前報價所依據的批次
    LotActive { lot_id: String, remaining: Decimal },
    /// 所有批次皆已用完（缺貨）
    AllLotsExhausted,
}

impl LotQueueState {
    /// 目前作用中的批次ID
    pub fn active_lot_id(&self) -> Option<&str> {
        match self {
            LotQueueState::LotActive { lot_id, .. } => Some(lot_id),
            LotQueueState::AllLotsExhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, LotQueueState::AllLotsExhausted)
    }
}

/// 批次佇列轉移（報價可能因此改變）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTransition {
    /// 前一批次用完，改由下一批次報價
    AdvancedToNextLot { from: String, to: String },
    /// 最後一個批次用完
    Exhausted { from: String },
    /// 原本缺貨，重新有批次可用（例如移除明細後）
    Restocked { to: String },
}

impl PriceTransition {
    /// 比較前後狀態；作用批次相同時返回 `None`
    pub fn between(before: &LotQueueState, after: &LotQueueState) -> Option<Self> {
        match (before.active_lot_id(), after.active_lot_id()) {
            (Some(from), Some(to)) if from != to => Some(PriceTransition::AdvancedToNextLot {
                from: from.to_string(),
                to: to.to_string(),
            }),
            (Some(from), None) => Some(PriceTransition::Exhausted {
                from: from.to_string(),
            }),
            (None, Some(to)) => Some(PriceTransition::Restocked { to: to.to_string() }),
            _ => None,
        }
    }
}

/// 某規格的報價變動通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub variant_id: String,
    pub transition: PriceTransition,
}
