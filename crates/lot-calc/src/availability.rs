//! 可用庫存摘要（列表顯示用）

use lot_core::{AllocationIssue, BillingType, LotQueueState, PendingAllocationItem, PurchaseLot};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::effective::EffectiveRemainingCalculator;
use crate::pricing::PricingResolver;

/// 單一規格的可用庫存摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAvailability {
    pub product_id: String,
    pub variant_id: String,
    /// 有效剩餘 > 0 的批次數
    pub lot_count: usize,
    pub total_effective_remaining: Decimal,
    pub state: LotQueueState,
    pub quoted_price: Option<Decimal>,
    pub issues: Vec<AllocationIssue>,
}

/// 可用庫存計算器
pub struct AvailabilityCalculator;

impl AvailabilityCalculator {
    /// 並行計算所有規格的摘要（依規格ID排序）
    pub fn summarize(
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
        billing_type: BillingType,
    ) -> Vec<VariantAvailability> {
        let mut variant_ids: Vec<&str> = lots.iter().map(|lot| lot.variant_id.as_str()).collect();
        variant_ids.sort_unstable();
        variant_ids.dedup();

        tracing::debug!("計算 {} 個規格的可用庫存", variant_ids.len());

        variant_ids
            .par_iter()
            .map(|variant_id| Self::summarize_variant(variant_id, lots, pending, billing_type))
            .collect()
    }

    /// 計算單一規格摘要
    pub fn summarize_variant(
        variant_id: &str,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
        billing_type: BillingType,
    ) -> VariantAvailability {
        let evaluated = EffectiveRemainingCalculator::evaluate(variant_id, lots, pending);

        let mut issues: Vec<AllocationIssue> = evaluated
            .iter()
            .filter(|e| e.is_inconsistent())
            .map(|e| AllocationIssue::InconsistentSnapshot {
                lot_id: e.lot.id.clone(),
                effective_remaining: e.effective_remaining,
            })
            .collect();

        let available: Vec<_> = evaluated.iter().filter(|e| e.is_available()).collect();
        let quoted_price = match PricingResolver::quote_from(variant_id, billing_type, &evaluated) {
            Ok(quote) => Some(quote.unit_price),
            Err(issue) => {
                // 缺貨由 state 表示，不另列問題
                if !issue.is_stock_shortage() {
                    issues.push(issue);
                }
                None
            }
        };

        VariantAvailability {
            product_id: evaluated
                .first()
                .map(|e| e.lot.product_id.clone())
                .unwrap_or_default(),
            variant_id: variant_id.to_string(),
            lot_count: available.len(),
            total_effective_remaining: available
                .iter()
                .fold(Decimal::ZERO, |total, e| total.saturating_add(e.effective_remaining)),
            state: PricingResolver::state_of(&evaluated),
            quoted_price,
            issues,
        }
    }
}
