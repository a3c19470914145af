//! 組合商品成本解析

use lot_core::{
    checked_add, checked_mul, ensure_positive_quantity, AllocationIssue, BillingType,
    BundleCostBreakdown, ComponentCostRow, CompositeProduct, CostingConfig, PendingAllocationItem,
    PurchaseLot, ScaledExpense,
};
use rust_decimal::Decimal;

use crate::fifo::FifoAllocator;
use crate::pricing::PricingResolver;

/// 組合商品成本解析器
pub struct BundleCostResolver;

impl BundleCostResolver {
    /// 展開組合商品，逐組件執行 FIFO 配貨並彙總
    ///
    /// 不會因單一組件不足而中止：成功組件的明細照常返回，失敗組件各記一筆
    /// `CompositeComponentShortfall`。同一規格出現在多個組件時，前面組件的
    /// 配貨會作為後面組件的待提交佔用。
    pub fn resolve(
        composite: &CompositeProduct,
        units_requested: Decimal,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
        config: &CostingConfig,
    ) -> lot_core::Result<BundleCostBreakdown> {
        ensure_positive_quantity(units_requested)?;
        composite.validate()?;

        tracing::debug!(
            "展開組合商品 {}：{} 組，組件 {} 個",
            composite.product_id,
            units_requested,
            composite.components.len()
        );

        let mut breakdown =
            BundleCostBreakdown::empty(composite.product_id.clone(), units_requested);
        let mut running_pending: Vec<PendingAllocationItem> = pending.to_vec();

        for component in &composite.components {
            let required = component.required_for(units_requested)?;
            let allocation = FifoAllocator::allocate_with(
                &component.variant_id,
                required,
                lots,
                &running_pending,
                config,
            )?;

            for entry in &allocation.entries {
                breakdown.component_breakdown.push(ComponentCostRow {
                    component_product_id: component.product_id.clone(),
                    variant_id: component.variant_id.clone(),
                    lot_id: entry.lot_id.clone(),
                    quantity_per_unit: component.quantity_per_unit,
                    quantity: entry.quantity,
                    unit_cost: entry.unit_cost,
                    line_cost: entry.line_cost,
                });
                breakdown.total_component_cost =
                    checked_add(breakdown.total_component_cost, entry.line_cost)?;
            }
            running_pending.extend(allocation.to_pending_items());

            // 庫存不足類問題改以組件短缺回報，其他（快照警告）照原樣保留
            let kept = allocation.errors.iter().filter(|e| !e.is_stock_shortage());
            breakdown.errors.extend(kept.cloned());

            if !allocation.can_fulfill {
                let available = allocation.allocated_quantity();
                tracing::debug!(
                    "組件 {} 不足：需要 {}，可用 {}",
                    component.variant_id,
                    required,
                    available
                );
                breakdown.can_fulfill = false;
                breakdown.errors.push(AllocationIssue::CompositeComponentShortfall {
                    product_id: composite.product_id.clone(),
                    component_product_id: component.product_id.clone(),
                    variant_id: component.variant_id.clone(),
                    required,
                    available,
                    shortfall: allocation.shortfall,
                });
            }
        }

        for expense in &composite.fixed_expenses {
            let total = config.round_money(checked_mul(expense.amount, units_requested)?);
            breakdown.custom_expenses.push(ScaledExpense {
                name: expense.name.clone(),
                unit_amount: expense.amount,
                units: units_requested,
                total,
            });
            breakdown.total_custom_expenses = checked_add(breakdown.total_custom_expenses, total)?;
        }

        breakdown.total_cost =
            checked_add(breakdown.total_component_cost, breakdown.total_custom_expenses)?;

        tracing::debug!(
            "組合商品 {} 成本 {}（組件 {} + 費用 {}），可出貨: {}",
            composite.product_id,
            breakdown.total_cost,
            breakdown.total_component_cost,
            breakdown.total_custom_expenses,
            breakdown.can_fulfill
        );

        Ok(breakdown)
    }

    /// 組合商品單位報價
    ///
    /// 有自訂售價時使用自訂售價，否則為各組件報價 × 每單位用量之和。
    /// 外層錯誤為數值溢位；無法報價的原因以內層 [`AllocationIssue`] 回報。
    pub fn unit_price(
        composite: &CompositeProduct,
        billing_type: BillingType,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> lot_core::Result<Result<Decimal, AllocationIssue>> {
        if let Some(price) = composite.price_for(billing_type) {
            if price <= Decimal::ZERO {
                return Ok(Err(AllocationIssue::InvalidPrice {
                    item_id: composite.product_id.clone(),
                    lot_id: None,
                    billing_type,
                    price,
                }));
            }
            return Ok(Ok(price));
        }

        let mut total = Decimal::ZERO;
        for component in &composite.components {
            let quote =
                match PricingResolver::quote(&component.variant_id, billing_type, lots, pending) {
                    Ok(quote) => quote,
                    Err(issue) => return Ok(Err(issue)),
                };
            let component_price = checked_mul(quote.unit_price, component.quantity_per_unit)?;
            total = checked_add(total, component_price)?;
        }
        Ok(Ok(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lot_core::{CompositeComponent, CostingError, FixedExpense};

    fn lot(id: &str, variant: &str, remaining: i64, unit_cost: i64, day: u32) -> PurchaseLot {
        PurchaseLot::new(
            id.to_string(),
            variant.split('-').next().unwrap_or(variant).to_string(),
            variant.to_string(),
            Decimal::from(remaining),
            Decimal::from(unit_cost),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
        .with_prices(Decimal::from(unit_cost * 2), Decimal::from(unit_cost))
    }

    fn component(product_id: &str, variant_id: &str, per_unit: i64) -> CompositeComponent {
        let per_unit = Decimal::from(per_unit);
        CompositeComponent::new(product_id.to_string(), variant_id.to_string(), per_unit)
    }

    fn gift_box() -> CompositeProduct {
        CompositeProduct::new("GIFT-BOX".to_string(), "禮盒".to_string())
            .with_component(component("TEA", "TEA-50G", 2))
            .with_component(component("MUG", "MUG-RED", 1))
            .with_fixed_expense(FixedExpense::new("包裝".to_string(), Decimal::from(3)))
    }

    fn resolve(
        composite: &CompositeProduct,
        units: i64,
        lots: &[PurchaseLot],
    ) -> lot_core::Result<BundleCostBreakdown> {
        let config = CostingConfig::default();
        BundleCostResolver::resolve(composite, Decimal::from(units), lots, &[], &config)
    }

    #[test]
    fn test_resolve_all_components_available() {
        let lots = vec![
            lot("T1", "TEA-50G", 4, 5, 1),
            lot("T2", "TEA-50G", 10, 6, 2),
            lot("M1", "MUG-RED", 10, 8, 1),
        ];

        let breakdown = resolve(&gift_box(), 3, &lots).unwrap();

        // TEA 需要 6：T1 4 + T2 2；MUG 需要 3
        assert!(breakdown.can_fulfill);
        assert_eq!(breakdown.component_breakdown.len(), 3);
        assert_eq!(breakdown.allocated_for("TEA-50G"), Decimal::from(6));
        assert_eq!(breakdown.allocated_for("MUG-RED"), Decimal::from(3));
        assert_eq!(breakdown.total_component_cost, Decimal::from(20 + 12 + 24));
        assert_eq!(breakdown.custom_expenses.len(), 1);
        assert_eq!(breakdown.custom_expenses[0].total, Decimal::from(9));
        assert_eq!(breakdown.total_custom_expenses, Decimal::from(9));
        assert_eq!(breakdown.total_cost, Decimal::from(65));
        assert!(breakdown.errors.is_empty());
    }

    #[test]
    fn test_failing_component_does_not_block_others() {
        let lots = vec![lot("T1", "TEA-50G", 10, 5, 1), lot("M1", "MUG-RED", 2, 8, 1)];

        let breakdown = resolve(&gift_box(), 3, &lots).unwrap();

        assert!(!breakdown.can_fulfill);
        assert_eq!(breakdown.allocated_for("TEA-50G"), Decimal::from(6));
        assert_eq!(breakdown.allocated_for("MUG-RED"), Decimal::from(2));
        assert_eq!(breakdown.errors.len(), 1);
        assert_eq!(
            breakdown.errors[0],
            AllocationIssue::CompositeComponentShortfall {
                product_id: "GIFT-BOX".to_string(),
                component_product_id: "MUG".to_string(),
                variant_id: "MUG-RED".to_string(),
                required: Decimal::from(3),
                available: Decimal::from(2),
                shortfall: Decimal::ONE,
            }
        );
    }

    #[test]
    fn test_shared_variant_sees_earlier_claims() {
        let composite = CompositeProduct::new("DUO".to_string(), "雙杯組".to_string())
            .with_component(component("MUG", "MUG-RED", 1))
            .with_component(component("MUG", "MUG-RED", 1));
        let lots = vec![lot("M1", "MUG-RED", 3, 8, 1)];

        let breakdown = resolve(&composite, 2, &lots).unwrap();

        // 第二個組件只剩 1 個可用
        assert!(!breakdown.can_fulfill);
        assert_eq!(breakdown.allocated_for("MUG-RED"), Decimal::from(3));
    }

    #[test]
    fn test_invalid_units() {
        let result = resolve(&gift_box(), 0, &[]);
        assert!(matches!(result, Err(CostingError::InvalidQuantity(_))));
    }

    #[test]
    fn test_expense_overflow_is_error() {
        let composite = CompositeProduct::new("HEAVY".to_string(), "重型".to_string())
            .with_component(component("MUG", "MUG-RED", 1))
            .with_fixed_expense(FixedExpense::new("運費".to_string(), Decimal::MAX));
        let lots = vec![lot("M1", "MUG-RED", 10, 8, 1)];

        let result = resolve(&composite, 2, &lots);
        assert!(matches!(result, Err(CostingError::ArithmeticOverflow(_))));
    }

    #[test]
    fn test_unit_price() {
        let lots = vec![lot("T1", "TEA-50G", 10, 5, 1), lot("M1", "MUG-RED", 2, 8, 1)];
        let price =
            |composite: &CompositeProduct, billing_type: BillingType, lots: &[PurchaseLot]| {
                BundleCostResolver::unit_price(composite, billing_type, lots, &[]).unwrap()
            };

        // 零售：2 × 10 + 1 × 16
        assert_eq!(price(&gift_box(), BillingType::Retail, &lots), Ok(Decimal::from(36)));

        let listed = gift_box().with_retail_price(Decimal::from(50));
        assert_eq!(price(&listed, BillingType::Retail, &lots), Ok(Decimal::from(50)));

        let zero = gift_box().with_wholesale_price(Decimal::ZERO);
        assert!(matches!(
            price(&zero, BillingType::Wholesale, &lots),
            Err(AllocationIssue::InvalidPrice { .. })
        ));

        let missing_mug = vec![lot("T1", "TEA-50G", 10, 5, 1)];
        assert!(matches!(
            price(&gift_box(), BillingType::Retail, &missing_mug),
            Err(AllocationIssue::OutOfStock { .. })
        ));
    }
}
