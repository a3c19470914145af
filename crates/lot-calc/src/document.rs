//! 編輯中單據
//!
//! 單據內所有明細的批次佔用即為後續明細的待提交佔用，讓同一張單據
//! 不會重複使用同一批庫存。

use lot_core::{CostedLine, CostingError, LineItemRequest, PendingAllocationItem, PriceChange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::CostingEngine;
use crate::pricing::PricingResolver;

/// 加入明細的結果
#[derive(Debug, Clone)]
pub struct LineAdded {
    pub line_id: Uuid,
    pub can_fulfill: bool,
    /// 本明細造成的報價批次變動（通知編輯器）
    pub price_changes: Vec<PriceChange>,
}

/// 移除明細的結果
#[derive(Debug, Clone)]
pub struct LineRemoved {
    pub line: CostedLine,
    pub price_changes: Vec<PriceChange>,
}

/// 單據合計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub total_cost: Decimal,
    /// 已報價明細的售價合計
    pub total_price: Decimal,
    /// 售價合計 − 已報價明細成本
    pub margin: Decimal,
    /// 無法報價的明細數
    pub unpriced_lines: usize,
    pub can_fulfill: bool,
}

/// 編輯中單據（草稿）
#[derive(Debug, Clone, Default)]
pub struct DraftDocument {
    lines: Vec<CostedLine>,

    /// 其他草稿的佔用（由呼叫端提供）
    external_pending: Vec<PendingAllocationItem>,
}

impl DraftDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置其他草稿的佔用
    pub fn with_external_pending(mut self, pending: Vec<PendingAllocationItem>) -> Self {
        self.external_pending = pending;
        self
    }

    pub fn lines(&self) -> &[CostedLine] {
        &self.lines
    }

    pub fn line(&self, line_id: Uuid) -> Option<&CostedLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 所有待提交佔用（外部 + 本單據明細）
    pub fn pending_items(&self) -> Vec<PendingAllocationItem> {
        self.external_pending
            .iter()
            .cloned()
            .chain(self.lines.iter().flat_map(|line| line.pending_items()))
            .collect()
    }

    /// 只屬於本單據的佔用（提交時使用）
    pub fn own_claims(&self) -> Vec<PendingAllocationItem> {
        self.lines.iter().flat_map(|line| line.pending_items()).collect()
    }

    /// 加入明細
    pub fn add_line(
        &mut self,
        engine: &CostingEngine,
        request: LineItemRequest,
    ) -> lot_core::Result<LineAdded> {
        let before = self.pending_items();
        let line = engine.cost_line(request, &before)?;

        let mut after = before.clone();
        after.extend(line.pending_items());

        let mut touched: Vec<String> = line.claims.iter().map(|c| c.variant_id.clone()).collect();
        if let LineItemRequest::Single { variant_id, .. } = &line.request {
            touched.push(variant_id.clone());
        }
        let lots = engine.snapshot().lots();
        let price_changes = PricingResolver::price_changes(&touched, lots, &before, &after);

        let added = LineAdded {
            line_id: line.id,
            can_fulfill: line.can_fulfill(),
            price_changes,
        };
        self.lines.push(line);
        Ok(added)
    }

    /// 移除明細，釋放其佔用
    ///
    /// 其餘明細的配貨不會自動重算，需要時呼叫 [`DraftDocument::recost`]。
    pub fn remove_line(
        &mut self,
        engine: &CostingEngine,
        line_id: Uuid,
    ) -> lot_core::Result<LineRemoved> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or(CostingError::LineNotFound(line_id))?;

        let before = self.pending_items();
        let line = self.lines.remove(index);
        let after = self.pending_items();

        let touched: Vec<String> = line.claims.iter().map(|c| c.variant_id.clone()).collect();
        let lots = engine.snapshot().lots();
        let price_changes = PricingResolver::price_changes(&touched, lots, &before, &after);

        Ok(LineRemoved { line, price_changes })
    }

    /// 以新快照依原順序重算所有明細
    ///
    /// 任一明細失敗時返回錯誤，單據維持重算前的內容。
    pub fn recost(&mut self, engine: &CostingEngine) -> lot_core::Result<()> {
        tracing::debug!("重算單據明細 {} 筆", self.lines.len());

        let mut rebuilt = DraftDocument::new().with_external_pending(self.external_pending.clone());
        for line in &self.lines {
            rebuilt.add_line(engine, line.request.clone())?;
        }

        *self = rebuilt;
        Ok(())
    }

    /// 單據合計
    pub fn totals(&self) -> DocumentTotals {
        let mut totals = DocumentTotals {
            total_cost: Decimal::ZERO,
            total_price: Decimal::ZERO,
            margin: Decimal::ZERO,
            unpriced_lines: 0,
            can_fulfill: true,
        };

        for line in &self.lines {
            totals.total_cost += line.total_cost();
            totals.can_fulfill &= line.can_fulfill();
            match line.margin() {
                Some(margin) => {
                    totals.margin += margin;
                    totals.total_price += line.total_price.unwrap_or(Decimal::ZERO);
                }
                None => totals.unpriced_lines += 1,
            }
        }

        totals
    }
}
