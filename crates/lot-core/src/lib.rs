//! # Lot Core
//!
//! 採購批次成本計算的核心資料模型與類型定義

pub mod allocation;
pub mod composite;
pub mod config;
pub mod issue;
pub mod line;
pub mod lot;
pub mod pending;
pub mod pricing;

// Re-export 主要類型
pub use allocation::{
    AllocationEntry, AllocationResult, BundleCostBreakdown, ComponentCostRow, ScaledExpense,
};
pub use composite::{CompositeCatalog, CompositeComponent, CompositeProduct, FixedExpense};
pub use config::CostingConfig;
pub use issue::{AllocationIssue, IssueSeverity};
pub use line::{CostedLine, LineCostDetail, LineItemRequest, LotClaim};
pub use lot::{LotSnapshot, PurchaseLot};
pub use pending::PendingAllocationItem;
pub use pricing::{BillingType, LotQueueState, PriceChange, PriceQuote, PriceTransition};

use rust_decimal::Decimal;

/// 成本計算錯誤類型
///
/// 只有輸入格式錯誤（含數值溢位）才會以錯誤返回；
/// 庫存是否足夠一律以 [`AllocationIssue`] 資料回報。
#[derive(Debug, thiserror::Error)]
pub enum CostingError {
    #[error("無效的數量: {0}（必須大於 0）")]
    InvalidQuantity(Decimal),

    #[error("找不到組合商品: {0}")]
    CompositeNotFound(String),

    #[error("組合商品沒有任何組件: {0}")]
    EmptyComposite(String),

    #[error("無效的組件: {0}")]
    InvalidComponent(String),

    #[error("無效的批次: {0}")]
    InvalidLot(String),

    #[error("批次 {lot_id} 快照不一致：有效剩餘 {effective_remaining}")]
    InconsistentSnapshot {
        lot_id: String,
        effective_remaining: Decimal,
    },

    #[error("無效的明細: {0}")]
    InvalidLineItem(String),

    #[error("找不到明細: {0}")]
    LineNotFound(uuid::Uuid),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("配置解析錯誤: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("數值溢位: {0}")]
    ArithmeticOverflow(String),
}

pub type Result<T> = std::result::Result<T, CostingError>;

/// 檢查需求數量（必須大於 0）
pub fn ensure_positive_quantity(quantity: Decimal) -> Result<Decimal> {
    if quantity <= Decimal::ZERO {
        return Err(CostingError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// 乘法，溢位時返回 `ArithmeticOverflow`
pub fn checked_mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| CostingError::ArithmeticOverflow(format!("{} × {}", lhs, rhs)))
}

/// 加法，溢位時返回 `ArithmeticOverflow`
pub fn checked_add(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| CostingError::ArithmeticOverflow(format!("{} + {}", lhs, rhs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(checked_mul(Decimal::from(3), Decimal::from(4)).unwrap(), Decimal::from(12));
        assert_eq!(checked_add(Decimal::from(3), Decimal::from(4)).unwrap(), Decimal::from(7));

        assert!(matches!(
            checked_mul(Decimal::MAX, Decimal::from(2)),
            Err(CostingError::ArithmeticOverflow(_))
        ));
        assert!(matches!(
            checked_add(Decimal::MAX, Decimal::ONE),
            Err(CostingError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn test_ensure_positive_quantity() {
        assert_eq!(ensure_positive_quantity(Decimal::ONE).unwrap(), Decimal::ONE);
        assert!(matches!(
            ensure_positive_quantity(Decimal::ZERO),
            Err(CostingError::InvalidQuantity(_))
        ));
    }
}
