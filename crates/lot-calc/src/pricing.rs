//! 報價計算
//!
//! 報價一律取最早未用完批次的價格，即使本次配貨也用到了後面的批次。

use lot_core::{
    AllocationIssue, BillingType, LotQueueState, PendingAllocationItem, PriceChange, PriceQuote,
    PriceTransition, PurchaseLot,
};
use rust_decimal::Decimal;

use crate::effective::{EffectiveLot, EffectiveRemainingCalculator};

/// 佔用後的報價更新
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteUpdate {
    /// 下一筆銷售的報價
    pub quote: Result<PriceQuote, AllocationIssue>,
    /// 本次佔用造成的批次轉移
    pub transition: Option<PriceTransition>,
}

/// 報價解析器
pub struct PricingResolver;

impl PricingResolver {
    /// 取得規格批次佇列狀態
    pub fn queue_state(
        variant_id: &str,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> LotQueueState {
        Self::state_of(&EffectiveRemainingCalculator::evaluate(variant_id, lots, pending))
    }

    /// 由已計算的有效剩餘（FIFO 排序）推導佇列狀態
    pub fn state_of(evaluated: &[EffectiveLot<'_>]) -> LotQueueState {
        evaluated
            .iter()
            .find(|e| e.is_available())
            .map(|e| LotQueueState::LotActive {
                lot_id: e.lot.id.clone(),
                remaining: e.effective_remaining,
            })
            .unwrap_or(LotQueueState::AllLotsExhausted)
    }

    /// 報價：最早未用完批次的價格
    pub fn quote(
        variant_id: &str,
        billing_type: BillingType,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> Result<PriceQuote, AllocationIssue> {
        let evaluated = EffectiveRemainingCalculator::evaluate(variant_id, lots, pending);
        Self::quote_from(variant_id, billing_type, &evaluated)
    }

    /// 由已計算的有效剩餘（FIFO 排序）報價
    pub fn quote_from(
        variant_id: &str,
        billing_type: BillingType,
        evaluated: &[EffectiveLot<'_>],
    ) -> Result<PriceQuote, AllocationIssue> {
        let active = evaluated.iter().find(|e| e.is_available()).ok_or_else(|| {
            AllocationIssue::OutOfStock {
                variant_id: variant_id.to_string(),
                required: Decimal::ZERO,
            }
        })?;

        let unit_price = active.lot.price_for(billing_type);
        if unit_price <= Decimal::ZERO {
            return Err(AllocationIssue::InvalidPrice {
                item_id: variant_id.to_string(),
                lot_id: Some(active.lot.id.clone()),
                billing_type,
                price: unit_price,
            });
        }

        Ok(PriceQuote {
            variant_id: variant_id.to_string(),
            lot_id: active.lot.id.clone(),
            billing_type,
            unit_price,
        })
    }

    /// 加入新佔用後的報價與轉移
    pub fn quote_after(
        variant_id: &str,
        billing_type: BillingType,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
        new_claims: &[PendingAllocationItem],
    ) -> QuoteUpdate {
        let before = Self::queue_state(variant_id, lots, pending);

        let combined: Vec<PendingAllocationItem> =
            pending.iter().chain(new_claims).cloned().collect();
        let after = Self::queue_state(variant_id, lots, &combined);

        QuoteUpdate {
            quote: Self::quote(variant_id, billing_type, lots, &combined),
            transition: PriceTransition::between(&before, &after),
        }
    }

    /// 比較多個規格在佔用前後的佇列狀態，返回報價變動
    pub fn price_changes(
        variant_ids: &[String],
        lots: &[PurchaseLot],
        before: &[PendingAllocationItem],
        after: &[PendingAllocationItem],
    ) -> Vec<PriceChange> {
        let mut ids: Vec<&String> = variant_ids.iter().collect();
        ids.sort();
        ids.dedup();

        ids.into_iter()
            .filter_map(|variant_id| {
                let transition = PriceTransition::between(
                    &Self::queue_state(variant_id, lots, before),
                    &Self::queue_state(variant_id, lots, after),
                )?;
                tracing::info!("規格 {} 報價批次變動: {:?}", variant_id, transition);
                Some(PriceChange {
                    variant_id: variant_id.clone(),
                    transition,
                })
            })
            .collect()
    }
}
