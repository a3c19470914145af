//! 組合商品（虛擬商品）模型

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::BillingType;
use crate::{checked_add, checked_mul, CostingError, Result};

/// 組合商品組件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeComponent {
    /// 組件商品ID
    pub product_id: String,

    /// 組件規格ID
    pub variant_id: String,

    /// 每單位組合商品消耗的數量
    pub quantity_per_unit: Decimal,
}

impl CompositeComponent {
    pub fn new(product_id: String, variant_id: String, quantity_per_unit: Decimal) -> Self {
        Self {
            product_id,
            variant_id,
            quantity_per_unit,
        }
    }

    /// 計算組件需求 = 每單位用量 × 組合數量
    pub fn required_for(&self, units: Decimal) -> Result<Decimal> {
        checked_mul(self.quantity_per_unit, units)
    }
}

/// 固定費用（包裝、人工等），每單位組合商品計一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpense {
    pub name: String,
    pub amount: Decimal,
}

impl FixedExpense {
    pub fn new(name: String, amount: Decimal) -> Self {
        Self { name, amount }
    }
}

/// 組合商品定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeProduct {
    pub product_id: String,

    pub name: String,

    /// 組件（依定義順序配貨）
    pub components: Vec<CompositeComponent>,

    pub fixed_expenses: Vec<FixedExpense>,

    /// 自訂零售價；未設定時以組件報價加總
    pub retail_price: Option<Decimal>,

    /// 自訂批發價；未設定時以組件報價加總
    pub wholesale_price: Option<Decimal>,
}

impl CompositeProduct {
    /// 創建新的組合商品
    pub fn new(product_id: String, name: String) -> Self {
        Self {
            product_id,
            name,
            components: Vec::new(),
            fixed_expenses: Vec::new(),
            retail_price: None,
            wholesale_price: None,
        }
    }

    /// 建構器模式：添加組件
    pub fn with_component(mut self, component: CompositeComponent) -> Self {
        self.components.push(component);
        self
    }

    /// 建構器模式：添加固定費用
    pub fn with_fixed_expense(mut self, expense: FixedExpense) -> Self {
        self.fixed_expenses.push(expense);
        self
    }

    /// 建構器模式：設置零售價
    pub fn with_retail_price(mut self, price: Decimal) -> Self {
        self.retail_price = Some(price);
        self
    }

    /// 建構器模式：設置批發價
    pub fn with_wholesale_price(mut self, price: Decimal) -> Self {
        self.wholesale_price = Some(price);
        self
    }

    /// 自訂售價（若有）
    pub fn price_for(&self, billing_type: BillingType) -> Option<Decimal> {
        match billing_type {
            BillingType::Retail => self.retail_price,
            BillingType::Wholesale => self.wholesale_price,
        }
    }

    /// 每單位固定費用合計
    pub fn unit_fixed_expense(&self) -> Result<Decimal> {
        self.fixed_expenses
            .iter()
            .try_fold(Decimal::ZERO, |total, e| checked_add(total, e.amount))
    }

    /// 驗證組合商品定義
    pub fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(CostingError::EmptyComposite(self.product_id.clone()));
        }

        for component in &self.components {
            if component.variant_id.trim().is_empty() {
                return Err(CostingError::InvalidComponent(format!(
                    "{} 的組件缺少規格ID",
                    self.product_id
                )));
            }
            if component.quantity_per_unit <= Decimal::ZERO {
                return Err(CostingError::InvalidComponent(format!(
                    "{} 的組件 {} 用量必須大於 0: {}",
                    self.product_id, component.variant_id, component.quantity_per_unit
                )));
            }
        }

        if let Some(expense) = self.fixed_expenses.iter().find(|e| e.amount < Decimal::ZERO) {
            return Err(CostingError::InvalidComponent(format!(
                "{} 的固定費用 {} 為負",
                self.product_id, expense.name
            )));
        }

        Ok(())
    }
}

/// 組合商品目錄
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositeCatalog {
    products: HashMap<String, CompositeProduct>,
}

impl CompositeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加組合商品（先驗證）
    pub fn insert(&mut self, product: CompositeProduct) -> Result<()> {
        product.validate()?;
        self.products.insert(product.product_id.clone(), product);
        Ok(())
    }

    /// 建構器模式：添加組合商品
    pub fn with_product(mut self, product: CompositeProduct) -> Result<Self> {
        self.insert(product)?;
        Ok(self)
    }

    /// 查找組合商品
    pub fn get(&self, product_id: &str) -> Result<&CompositeProduct> {
        self.products
            .get(product_id)
            .ok_or_else(|| CostingError::CompositeNotFound(product_id.to_string()))
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
