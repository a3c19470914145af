//! 配貨問題（以資料回報，非致命）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::BillingType;

/// 問題嚴重度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// 配貨/報價問題
///
/// 庫存不足等結果一律作為資料返回，讓介面可以即時顯示，不會中斷流程。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationIssue {
    /// 沒有任何批次有可用庫存
    #[error("{variant_id} 缺貨：需要 {required}, 可用 0")]
    OutOfStock { variant_id: String, required: Decimal },

    /// 有庫存但總量不足（仍返回部分配貨）
    #[error("{variant_id} 庫存不足：需要 {required}, 可用 {available}")]
    InsufficientStock {
        variant_id: String,
        required: Decimal,
        available: Decimal,
    },

    /// 報價 ≤ 0
    #[error("{item_id} 的{billing_type}價格無效: {price}")]
    InvalidPrice {
        item_id: String,
        lot_id: Option<String>,
        billing_type: BillingType,
        price: Decimal,
    },

    /// 組合商品的單一組件不足
    #[error("組合商品 {product_id} 的組件 {variant_id} 不足：需要 {required}, 可用 {available}, 短缺 {shortfall}")]
    CompositeComponentShortfall {
        product_id: String,
        component_product_id: String,
        variant_id: String,
        required: Decimal,
        available: Decimal,
        shortfall: Decimal,
    },

    /// 待提交佔用超過批次剩餘數量
    #[error("批次 {lot_id} 快照不一致：有效剩餘 {effective_remaining}")]
    InconsistentSnapshot {
        lot_id: String,
        effective_remaining: Decimal,
    },
}

impl AllocationIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            AllocationIssue::InconsistentSnapshot { .. } => IssueSeverity::Warning,
            _ => IssueSeverity::Error,
        }
    }

    /// 是否為庫存不足類問題
    pub fn is_stock_shortage(&self) -> bool {
        matches!(
            self,
            AllocationIssue::OutOfStock { .. }
                | AllocationIssue::InsufficientStock { .. }
                | AllocationIssue::CompositeComponentShortfall { .. }
        )
    }

    /// 介面用代碼
    pub fn code(&self) -> &'static str {
        match self {
            AllocationIssue::OutOfStock { .. } => "out_of_stock",
            AllocationIssue::InsufficientStock { .. } => "insufficient_stock",
            AllocationIssue::InvalidPrice { .. } => "invalid_price",
            AllocationIssue::CompositeComponentShortfall { .. } => "composite_component_shortfall",
            AllocationIssue::InconsistentSnapshot { .. } => "inconsistent_snapshot",
        }
    }
}
