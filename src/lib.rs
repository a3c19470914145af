//! # Lot Engine
//!
//! 採購批次 FIFO 成本與配貨引擎
//!
//! - [`lot_core`]：資料模型、驗證、配置與錯誤類型
//! - [`lot_calc`]：有效剩餘、FIFO 配貨、報價、組合商品成本、單據草稿

pub use lot_calc;
pub use lot_core;

/// 常用類型
pub mod prelude {
    pub use lot_calc::{
        AvailabilityCalculator, BundleCostResolver, ClaimVerifier, CostingEngine, DraftDocument,
        EffectiveRemainingCalculator, FifoAllocator, PricingResolver,
    };
    pub use lot_core::{
        AllocationIssue, AllocationResult, BillingType, BundleCostBreakdown, CompositeCatalog,
        CompositeComponent, CompositeProduct, CostingConfig, CostingError, FixedExpense,
        LineItemRequest, LotSnapshot, PendingAllocationItem, PurchaseLot,
    };
}
