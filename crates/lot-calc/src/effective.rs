//! 有效剩餘計算

use lot_core::{PendingAllocationItem, PurchaseLot};
use rust_decimal::Decimal;

/// 批次及其有效剩餘
#[derive(Debug, Clone, Copy)]
pub struct EffectiveLot<'a> {
    pub lot: &'a PurchaseLot,

    /// 持久化剩餘 − 待提交佔用（可能為負，表示快照不一致）
    pub effective_remaining: Decimal,
}

impl EffectiveLot<'_> {
    pub fn is_available(&self) -> bool {
        self.effective_remaining > Decimal::ZERO
    }

    pub fn is_inconsistent(&self) -> bool {
        self.effective_remaining < Decimal::ZERO
    }
}

/// 有效剩餘計算器
pub struct EffectiveRemainingCalculator;

impl EffectiveRemainingCalculator {
    /// 計算單一批次的有效剩餘
    ///
    /// 結果為負不會被截斷成 0，由呼叫端決定如何回報。
    /// 極端數值以飽和運算處理，溢位的佔用會呈現為快照不一致。
    pub fn calculate(lot: &PurchaseLot, pending: &[PendingAllocationItem]) -> Decimal {
        lot.remaining_quantity.saturating_sub(Self::claimed(&lot.id, pending))
    }

    /// 指定批次的待提交佔用合計
    pub fn claimed(lot_id: &str, pending: &[PendingAllocationItem]) -> Decimal {
        pending
            .iter()
            .filter(|p| p.lot_id == lot_id)
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.quantity))
    }

    /// 取得規格下所有批次的有效剩餘（FIFO 排序，包含 ≤ 0 的批次）
    pub fn evaluate<'a>(
        variant_id: &str,
        lots: &'a [PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> Vec<EffectiveLot<'a>> {
        let mut evaluated: Vec<EffectiveLot<'a>> = lots
            .iter()
            .filter(|lot| lot.variant_id == variant_id)
            .map(|lot| EffectiveLot {
                lot,
                effective_remaining: Self::calculate(lot, pending),
            })
            .collect();

        evaluated.sort_by(|a, b| a.lot.fifo_cmp(b.lot));
        evaluated
    }

    /// 規格的有效剩餘合計（只計正值）
    pub fn total_available(
        variant_id: &str,
        lots: &[PurchaseLot],
        pending: &[PendingAllocationItem],
    ) -> Decimal {
        Self::evaluate(variant_id, lots, pending)
            .iter()
            .filter(|e| e.is_available())
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.effective_remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lot(id: &str, variant: &str, remaining: i64, day: u32) -> PurchaseLot {
        PurchaseLot::new(
            id.to_string(),
            "TEA".to_string(),
            variant.to_string(),
            Decimal::from(remaining),
            Decimal::from(10),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
    }

    fn pending(lot_id: &str, qty: i64) -> PendingAllocationItem {
        PendingAllocationItem::new("TEA-50G".to_string(), lot_id.to_string(), Decimal::from(qty))
    }

    #[test]
    fn test_effective_remaining_subtracts_matching_lot_only() {
        let a = lot("A", "TEA-50G", 5, 1);
        let claims = vec![pending("A", 2), pending("B", 4), pending("A", 1)];

        assert_eq!(EffectiveRemainingCalculator::claimed("A", &claims), Decimal::from(3));
        assert_eq!(EffectiveRemainingCalculator::calculate(&a, &claims), Decimal::from(2));
        assert_eq!(EffectiveRemainingCalculator::calculate(&a, &[]), Decimal::from(5));
    }

    #[test]
    fn test_negative_is_not_clamped() {
        let a = lot("A", "TEA-50G", 2, 1);
        let claims = vec![pending("A", 3)];

        let effective = EffectiveRemainingCalculator::calculate(&a, &claims);
        assert_eq!(effective, Decimal::from(-1));
    }

    #[test]
    fn test_huge_claims_saturate() {
        let a = lot("A", "TEA-50G", 5, 1);
        let claims = vec![
            PendingAllocationItem::new("TEA-50G".to_string(), "A".to_string(), Decimal::MAX),
            PendingAllocationItem::new("TEA-50G".to_string(), "A".to_string(), Decimal::MAX),
        ];

        assert_eq!(EffectiveRemainingCalculator::claimed("A", &claims), Decimal::MAX);
        let effective = EffectiveRemainingCalculator::calculate(&a, &claims);
        assert!(effective < Decimal::ZERO);
    }

    #[test]
    fn test_evaluate_filters_and_sorts() {
        let lots = vec![
            lot("C", "TEA-50G", 1, 9),
            lot("X", "TEA-100G", 7, 1),
            lot("B", "TEA-50G", 4, 3),
            lot("A", "TEA-50G", 2, 3),
        ];
        let claims = vec![pending("A", 2)];

        let evaluated = EffectiveRemainingCalculator::evaluate("TEA-50G", &lots, &claims);
        let ids: Vec<_> = evaluated.iter().map(|e| e.lot.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);

        // A 已被佔滿，但仍保留在結果中
        assert_eq!(evaluated[0].effective_remaining, Decimal::ZERO);
        assert!(!evaluated[0].is_available());
        assert!(!evaluated[0].is_inconsistent());

        assert_eq!(
            EffectiveRemainingCalculator::total_available("TEA-50G", &lots, &claims),
            Decimal::from(5)
        );
    }
}
