//! # Lot Calculation Engine
//!
//! FIFO 採購批次配貨、報價與組合商品成本計算
//!
//! 所有計算都是純函數：輸入為呼叫端提供的快照，不做 I/O、不修改輸入，
//! 可安全地併發呼叫。跨單據的併發正確性交由提交層處理。

pub mod availability;
pub mod bundle;
pub mod document;
pub mod effective;
pub mod engine;
pub mod fifo;
pub mod pricing;
pub mod verify;

// Re-export 主要類型
pub use availability::{AvailabilityCalculator, VariantAvailability};
pub use bundle::BundleCostResolver;
pub use document::{DocumentTotals, DraftDocument, LineAdded, LineRemoved};
pub use effective::{EffectiveLot, EffectiveRemainingCalculator};
pub use engine::CostingEngine;
pub use fifo::FifoAllocator;
pub use pricing::{PricingResolver, QuoteUpdate};
pub use verify::{ClaimVerifier, StaleClaim};
