//! 單據明細模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::{AllocationResult, BundleCostBreakdown};
use crate::issue::{AllocationIssue, IssueSeverity};
use crate::pending::PendingAllocationItem;
use crate::pricing::BillingType;
use crate::{checked_mul, ensure_positive_quantity, CostingError, Result};

/// 明細請求（在輸入邊界驗證一次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineItemRequest {
    /// 單一規格
    Single {
        product_id: String,
        variant_id: String,
        quantity: Decimal,
        billing_type: BillingType,
    },
    /// 組合商品
    Composite {
        product_id: String,
        units: Decimal,
        billing_type: BillingType,
    },
}

impl LineItemRequest {
    pub fn single(
        product_id: &str,
        variant_id: &str,
        quantity: Decimal,
        billing_type: BillingType,
    ) -> Self {
        LineItemRequest::Single {
            product_id: product_id.to_string(),
            variant_id: variant_id.to_string(),
            quantity,
            billing_type,
        }
    }

    pub fn composite(product_id: &str, units: Decimal, billing_type: BillingType) -> Self {
        LineItemRequest::Composite {
            product_id: product_id.to_string(),
            units,
            billing_type,
        }
    }

    pub fn product_id(&self) -> &str {
        match self {
            LineItemRequest::Single { product_id, .. }
            | LineItemRequest::Composite { product_id, .. } => product_id,
        }
    }

    /// 銷售數量（單一規格為數量，組合商品為組數）
    pub fn quantity(&self) -> Decimal {
        match self {
            LineItemRequest::Single { quantity, .. } => *quantity,
            LineItemRequest::Composite { units, .. } => *units,
        }
    }

    pub fn billing_type(&self) -> BillingType {
        match self {
            LineItemRequest::Single { billing_type, .. }
            | LineItemRequest::Composite { billing_type, .. } => *billing_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.product_id().trim().is_empty() {
            return Err(CostingError::InvalidLineItem("商品ID不可為空".to_string()));
        }
        if let LineItemRequest::Single { variant_id, .. } = self {
            if variant_id.trim().is_empty() {
                return Err(CostingError::InvalidLineItem(format!(
                    "商品 {} 缺少規格ID",
                    self.product_id()
                )));
            }
        }
        ensure_positive_quantity(self.quantity())?;
        Ok(())
    }
}

/// 明細對批次的佔用（提交時以此記錄採購單ID）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotClaim {
    pub product_id: String,
    pub variant_id: String,
    pub lot_id: String,
    pub quantity: Decimal,
}

impl LotClaim {
    pub fn to_pending(&self) -> PendingAllocationItem {
        PendingAllocationItem::new(self.variant_id.clone(), self.lot_id.clone(), self.quantity)
    }
}

/// 明細成本來源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineCostDetail {
    Single(AllocationResult),
    Composite(BundleCostBreakdown),
}

impl LineCostDetail {
    pub fn total_cost(&self) -> Decimal {
        match self {
            LineCostDetail::Single(result) => result.total_cost,
            LineCostDetail::Composite(breakdown) => breakdown.total_cost,
        }
    }

    pub fn can_fulfill(&self) -> bool {
        match self {
            LineCostDetail::Single(result) => result.can_fulfill,
            LineCostDetail::Composite(breakdown) => breakdown.can_fulfill,
        }
    }

    pub fn errors(&self) -> &[AllocationIssue] {
        match self {
            LineCostDetail::Single(result) => &result.errors,
            LineCostDetail::Composite(breakdown) => &breakdown.errors,
        }
    }
}

/// 已計算成本的明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostedLine {
    pub id: Uuid,
    pub request: LineItemRequest,
    pub detail: LineCostDetail,
    /// 批次佔用
    pub claims: Vec<LotClaim>,
    /// 報價（無法報價時為 None）
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    /// 配貨與報價問題
    pub issues: Vec<AllocationIssue>,
}

impl CostedLine {
    /// 由成本來源建立明細，佔用從配貨結果推導
    pub fn new(
        request: LineItemRequest,
        detail: LineCostDetail,
        price: std::result::Result<Decimal, AllocationIssue>,
    ) -> Result<Self> {
        let claims = match &detail {
            LineCostDetail::Single(result) => result
                .entries
                .iter()
                .map(|entry| LotClaim {
                    product_id: request.product_id().to_string(),
                    variant_id: result.variant_id.clone(),
                    lot_id: entry.lot_id.clone(),
                    quantity: entry.quantity,
                })
                .collect(),
            LineCostDetail::Composite(breakdown) => breakdown
                .component_breakdown
                .iter()
                .map(|row| LotClaim {
                    product_id: row.component_product_id.clone(),
                    variant_id: row.variant_id.clone(),
                    lot_id: row.lot_id.clone(),
                    quantity: row.quantity,
                })
                .collect(),
        };

        let mut issues = detail.errors().to_vec();
        let unit_price = match price {
            Ok(price) => Some(price),
            Err(issue) => {
                // 缺貨已由配貨結果回報，不重複
                let duplicate = issue.is_stock_shortage() && !detail.can_fulfill();
                if !duplicate && !issues.contains(&issue) {
                    issues.push(issue);
                }
                None
            }
        };
        let total_price = match unit_price {
            Some(price) => Some(checked_mul(price, request.quantity())?),
            None => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            request,
            detail,
            claims,
            unit_price,
            total_price,
            issues,
        })
    }

    pub fn total_cost(&self) -> Decimal {
        self.detail.total_cost()
    }

    pub fn can_fulfill(&self) -> bool {
        self.detail.can_fulfill()
    }

    /// 毛利（無報價時為 None）
    pub fn margin(&self) -> Option<Decimal> {
        self.total_price.map(|price| price - self.total_cost())
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == IssueSeverity::Error)
    }

    /// 轉為待提交佔用
    pub fn pending_items(&self) -> Vec<PendingAllocationItem> {
        self.claims.iter().map(LotClaim::to_pending).collect()
    }
}
