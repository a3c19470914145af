//! 成本計算主入口

use lot_core::{
    AllocationIssue, AllocationResult, BillingType, BundleCostBreakdown, CompositeCatalog,
    CostedLine, CostingConfig, LineCostDetail, LineItemRequest, LotSnapshot, PendingAllocationItem,
    PriceQuote,
};
use rust_decimal::Decimal;

use crate::availability::{AvailabilityCalculator, VariantAvailability};
use crate::bundle::BundleCostResolver;
use crate::fifo::FifoAllocator;
use crate::pricing::PricingResolver;

/// 成本計算引擎
///
/// 持有呼叫端提供的唯讀快照，本身無可變狀態，可在多執行緒間共享。
#[derive(Debug, Clone)]
pub struct CostingEngine {
    /// 批次快照
    snapshot: LotSnapshot,

    /// 組合商品目錄
    catalog: CompositeCatalog,

    /// 計算配置
    config: CostingConfig,
}

impl CostingEngine {
    /// 創建新的成本計算引擎
    pub fn new(
        snapshot: LotSnapshot,
        catalog: CompositeCatalog,
        config: CostingConfig,
    ) -> lot_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            snapshot,
            catalog,
            config,
        })
    }

    /// 單一規格 FIFO 配貨
    pub fn allocate(
        &self,
        variant_id: &str,
        demand_quantity: Decimal,
        pending: &[PendingAllocationItem],
    ) -> lot_core::Result<AllocationResult> {
        FifoAllocator::allocate_with(
            variant_id,
            demand_quantity,
            self.snapshot.lots(),
            pending,
            &self.config,
        )
    }

    /// 組合商品成本解析
    pub fn resolve_bundle(
        &self,
        composite_product_id: &str,
        units_requested: Decimal,
        pending: &[PendingAllocationItem],
    ) -> lot_core::Result<BundleCostBreakdown> {
        let composite = self.catalog.get(composite_product_id)?;
        BundleCostResolver::resolve(
            composite,
            units_requested,
            self.snapshot.lots(),
            pending,
            &self.config,
        )
    }

    /// 單一規格報價（未指定計價類型時使用配置預設值）
    pub fn quote(
        &self,
        variant_id: &str,
        billing_type: Option<BillingType>,
        pending: &[PendingAllocationItem],
    ) -> Result<PriceQuote, AllocationIssue> {
        PricingResolver::quote(
            variant_id,
            billing_type.unwrap_or(self.config.default_billing_type),
            self.snapshot.lots(),
            pending,
        )
    }

    /// 計算單據明細：驗證請求、配貨並報價
    ///
    /// 報價以加入本明細前的佇列為準。
    pub fn cost_line(
        &self,
        request: LineItemRequest,
        pending: &[PendingAllocationItem],
    ) -> lot_core::Result<CostedLine> {
        request.validate()?;

        tracing::info!(
            "計算明細 {}：數量 {}，計價 {}，待提交佔用 {} 筆",
            request.product_id(),
            request.quantity(),
            request.billing_type(),
            pending.len()
        );

        let line = match &request {
            LineItemRequest::Single {
                variant_id,
                quantity,
                billing_type,
                ..
            } => {
                let lots = self.snapshot.lots();
                let price = PricingResolver::quote(variant_id, *billing_type, lots, pending)
                    .map(|quote| quote.unit_price);
                let allocation = self.allocate(variant_id, *quantity, pending)?;
                CostedLine::new(request.clone(), LineCostDetail::Single(allocation), price)?
            }
            LineItemRequest::Composite {
                product_id,
                units,
                billing_type,
            } => {
                let composite = self.catalog.get(product_id)?;
                let price = BundleCostResolver::unit_price(
                    composite,
                    *billing_type,
                    self.snapshot.lots(),
                    pending,
                )?;
                let breakdown = BundleCostResolver::resolve(
                    composite,
                    *units,
                    self.snapshot.lots(),
                    pending,
                    &self.config,
                )?;
                CostedLine::new(request.clone(), LineCostDetail::Composite(breakdown), price)?
            }
        };

        tracing::info!(
            "明細 {} 完成：成本 {}，可出貨 {}，問題 {} 筆",
            line.request.product_id(),
            line.total_cost(),
            line.can_fulfill(),
            line.issues.len()
        );

        Ok(line)
    }

    /// 各規格可用庫存摘要
    pub fn availability(
        &self,
        billing_type: Option<BillingType>,
        pending: &[PendingAllocationItem],
    ) -> Vec<VariantAvailability> {
        AvailabilityCalculator::summarize(
            self.snapshot.lots(),
            pending,
            billing_type.unwrap_or(self.config.default_billing_type),
        )
    }

    /// 獲取批次快照引用
    pub fn snapshot(&self) -> &LotSnapshot {
        &self.snapshot
    }

    /// 獲取組合商品目錄引用
    pub fn catalog(&self) -> &CompositeCatalog {
        &self.catalog
    }

    /// 獲取配置引用
    pub fn config(&self) -> &CostingConfig {
        &self.config
    }
}
