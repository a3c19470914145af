//! 配貨結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::issue::{AllocationIssue, IssueSeverity};
use crate::pending::PendingAllocationItem;

/// 單一批次的配貨明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// 批次ID
    pub lot_id: String,

    /// 配貨數量
    pub quantity: Decimal,

    /// 該批次單位成本（不取平均）
    pub unit_cost: Decimal,

    /// 行成本 = 數量 × 單位成本
    pub line_cost: Decimal,
}

/// 單一規格的 FIFO 配貨結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub variant_id: String,

    /// 需求數量
    pub requested_quantity: Decimal,

    /// 按 FIFO 順序排列的配貨明細
    pub entries: Vec<AllocationEntry>,

    pub total_cost: Decimal,

    pub can_fulfill: bool,

    /// 短缺數量（可滿足時為 0）
    pub shortfall: Decimal,

    pub errors: Vec<AllocationIssue>,
}

impl AllocationResult {
    /// 創建空的配貨結果
    pub fn empty(variant_id: String, requested_quantity: Decimal) -> Self {
        Self {
            variant_id,
            requested_quantity,
            entries: Vec::new(),
            total_cost: Decimal::ZERO,
            can_fulfill: false,
            shortfall: requested_quantity,
            errors: Vec::new(),
        }
    }

    /// 實際配貨總數量
    pub fn allocated_quantity(&self) -> Decimal {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// 轉為待提交佔用（供同一單據後續明細使用）
    pub fn to_pending_items(&self) -> Vec<PendingAllocationItem> {
        self.entries
            .iter()
            .map(|e| {
                PendingAllocationItem::new(self.variant_id.clone(), e.lot_id.clone(), e.quantity)
            })
            .collect()
    }

    /// 是否有錯誤等級的問題
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.severity() == IssueSeverity::Error)
    }
}

/// 組合商品成本明細行（每個組件 × 批次一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCostRow {
    pub component_product_id: String,
    pub variant_id: String,
    pub lot_id: String,
    /// 每單位組合商品用量
    pub quantity_per_unit: Decimal,
    /// 此批次配貨數量
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub line_cost: Decimal,
}

/// 按數量放大後的固定費用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledExpense {
    pub name: String,
    pub unit_amount: Decimal,
    pub units: Decimal,
    pub total: Decimal,
}

/// 組合商品成本分解
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleCostBreakdown {
    pub product_id: String,
    pub units_requested: Decimal,
    pub component_breakdown: Vec<ComponentCostRow>,
    pub custom_expenses: Vec<ScaledExpense>,
    pub total_component_cost: Decimal,
    pub total_custom_expenses: Decimal,
    /// 組件成本 + 固定費用
    pub total_cost: Decimal,
    pub can_fulfill: bool,
    pub errors: Vec<AllocationIssue>,
}

impl BundleCostBreakdown {
    /// 創建空的成本分解
    pub fn empty(product_id: String, units_requested: Decimal) -> Self {
        Self {
            product_id,
            units_requested,
            component_breakdown: Vec::new(),
            custom_expenses: Vec::new(),
            total_component_cost: Decimal::ZERO,
            total_custom_expenses: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            can_fulfill: true,
            errors: Vec::new(),
        }
    }

    /// 轉為待提交佔用
    pub fn to_pending_items(&self) -> Vec<PendingAllocationItem> {
        self.component_breakdown
            .iter()
            .map(|row| {
                PendingAllocationItem::new(row.variant_id.clone(), row.lot_id.clone(), row.quantity)
            })
            .collect()
    }

    /// 指定規格的配貨總數
    pub fn allocated_for(&self, variant_id: &str) -> Decimal {
        self.component_breakdown
            .iter()
            .filter(|row| row.variant_id == variant_id)
            .map(|row| row.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_result_helpers() {
        let mut result = AllocationResult::empty("TEA-50G".to_string(), Decimal::from(7));
        assert_eq!(result.shortfall, Decimal::from(7));
        assert!(!result.can_fulfill);

        result.entries.push(AllocationEntry {
            lot_id: "A".to_string(),
            quantity: Decimal::from(5),
            unit_cost: Decimal::from(10),
            line_cost: Decimal::from(50),
        });
        result.entries.push(AllocationEntry {
            lot_id: "B".to_string(),
            quantity: Decimal::from(2),
            unit_cost: Decimal::from(12),
            line_cost: Decimal::from(24),
        });

        assert_eq!(result.allocated_quantity(), Decimal::from(7));

        let pending = result.to_pending_items();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].lot_id, "B");
        assert_eq!(pending[1].variant_id, "TEA-50G");
        assert!(!result.has_errors());
    }

    #[test]
    fn test_breakdown_allocated_for() {
        let mut breakdown = BundleCostBreakdown::empty("GIFT-BOX".to_string(), Decimal::from(2));
        for (variant, lot, qty) in [("X", "L1", 3), ("X", "L2", 1), ("Y", "L3", 2)] {
            breakdown.component_breakdown.push(ComponentCostRow {
                component_product_id: "P".to_string(),
                variant_id: variant.to_string(),
                lot_id: lot.to_string(),
                quantity_per_unit: Decimal::from(2),
                quantity: Decimal::from(qty),
                unit_cost: Decimal::ONE,
                line_cost: Decimal::from(qty),
            });
        }

        assert_eq!(breakdown.allocated_for("X"), Decimal::from(4));
        assert_eq!(breakdown.allocated_for("Y"), Decimal::from(2));
        assert_eq!(breakdown.to_pending_items().len(), 3);
    }
}
