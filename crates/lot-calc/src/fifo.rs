//! FIFO 批次配貨

use lot_core::{
    checked_add, checked_mul, ensure_positive_quantity, AllocationEntry, AllocationIssue,
    AllocationResult, CostingConfig, CostingError, PendingAllocationItem, PurchaseLot,
};
use rust_decimal::Decimal;

use crate::effective::{EffectiveLot, EffectiveRemainingCalculator};

/// FIFO 配貨器
pub struct FifoAllocator;

impl FifoAllocator {
    /// 以預設配置執行配貨
    pub fn allocate(
        variant_id: &str,
        demand_quantity: Decimal,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> lot_core::Result<AllocationResult> {
        Self::allocate_with(variant_id, demand_quantity, lots, pending, &CostingConfig::default())
    }

    /// 執行 FIFO 配貨
    ///
    /// 只有需求數量 ≤ 0 或成本溢位會返回錯誤（嚴格模式下另含快照不一致）；
    /// 庫存不足時仍返回部分配貨明細，`can_fulfill = false`。
    pub fn allocate_with(
        variant_id: &str,
        demand_quantity: Decimal,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
        config: &CostingConfig,
    ) -> lot_core::Result<AllocationResult> {
        ensure_positive_quantity(demand_quantity)?;

        let mut result = AllocationResult::empty(variant_id.to_string(), demand_quantity);

        // Step 1: 計算有效剩餘，FIFO 排序
        let evaluated = EffectiveRemainingCalculator::evaluate(variant_id, lots, pending);
        let available = Self::screen(&evaluated, config, &mut result.errors)?;

        tracing::debug!(
            "配貨 {}：需求 {}，可用批次 {} / {}",
            variant_id,
            demand_quantity,
            available.len(),
            evaluated.len()
        );

        // Step 2: 依序取用
        let mut remaining_demand = demand_quantity;
        for effective in &available {
            if remaining_demand <= Decimal::ZERO {
                break;
            }

            let take = effective.effective_remaining.min(remaining_demand);
            let line_cost = config.round_money(checked_mul(take, effective.lot.unit_cost)?);

            result.entries.push(AllocationEntry {
                lot_id: effective.lot.id.clone(),
                quantity: take,
                unit_cost: effective.lot.unit_cost,
                line_cost,
            });
            result.total_cost = checked_add(result.total_cost, line_cost)?;
            remaining_demand -= take;
        }

        // Step 3: 判斷是否滿足
        result.shortfall = remaining_demand;
        result.can_fulfill = remaining_demand <= Decimal::ZERO;

        if !result.can_fulfill {
            let total_available = available
                .iter()
                .try_fold(Decimal::ZERO, |total, e| checked_add(total, e.effective_remaining))?;
            let issue = if available.is_empty() {
                AllocationIssue::OutOfStock {
                    variant_id: variant_id.to_string(),
                    required: demand_quantity,
                }
            } else {
                AllocationIssue::InsufficientStock {
                    variant_id: variant_id.to_string(),
                    required: demand_quantity,
                    available: total_available,
                }
            };
            tracing::debug!("{}", issue);
            result.errors.push(issue);
        }

        Ok(result)
    }

    /// 篩選可用批次；有效剩餘為負時依配置回報或返回錯誤
    fn screen<'a>(
        evaluated: &[EffectiveLot<'a>],
        config: &CostingConfig,
        issues: &mut Vec<AllocationIssue>,
    ) -> lot_core::Result<Vec<EffectiveLot<'a>>> {
        let mut available = Vec::with_capacity(evaluated.len());

        for effective in evaluated {
            if effective.is_inconsistent() {
                if config.strict_snapshot {
                    return Err(CostingError::InconsistentSnapshot {
                        lot_id: effective.lot.id.clone(),
                        effective_remaining: effective.effective_remaining,
                    });
                }
                tracing::warn!(
                    "批次 {} 待提交佔用超過剩餘數量，有效剩餘 {}",
                    effective.lot.id,
                    effective.effective_remaining
                );
                issues.push(AllocationIssue::InconsistentSnapshot {
                    lot_id: effective.lot.id.clone(),
                    effective_remaining: effective.effective_remaining,
                });
            } else if effective.is_available() {
                available.push(*effective);
            }
        }

        Ok(available)
    }
}
