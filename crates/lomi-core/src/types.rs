//! # Domain Types
//!
//! Core domain types used throughout Lomi POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Extra       │   │   Exclusion     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  name           │       │
//! │  │  price          │   │  price (adds)   │   │  (no price)     │       │
//! │  │  category       │   └─────────────────┘   └─────────────────┘       │
//! │  │  extras[]       │                                                    │
//! │  │  exclusions[]   │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  is_available   │   │   OrderType     │   │ PaymentMethod   │       │
//! │  └─────────────────┘   │  DineIn         │   │  Cash           │       │
//! │                        │  Takeaway       │   │  Card           │       │
//! │  ┌─────────────────┐   │  Delivery (+fee)│   │  Transfer       │       │
//! │  │    TaxRate      │   └─────────────────┘   └─────────────────┘       │
//! │  │  bps (u32)      │                                                    │
//! │  │  2100 = 21%     │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │  DocumentType   │   │  Fulfillment    │       │
//! │                        │  Receipt        │   │  DineIn{table}  │       │
//! │                        │  Invoice        │   │  Takeaway       │       │
//! │                        │  Both           │   │  Delivery{cust} │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2100 bps = 21% (Argentine IVA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::TAX_RATE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Menu section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Lomitos,
    Hamburguesas,
    Panchos,
    Papas,
    Bebidas,
    Combos,
    Extras,
}

impl ProductCategory {
    /// All categories, in menu order.
    pub const ALL: [ProductCategory; 7] = [
        ProductCategory::Lomitos,
        ProductCategory::Hamburguesas,
        ProductCategory::Panchos,
        ProductCategory::Papas,
        ProductCategory::Bebidas,
        ProductCategory::Combos,
        ProductCategory::Extras,
    ];

    /// Serialized tag of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Lomitos => "lomitos",
            ProductCategory::Hamburguesas => "hamburguesas",
            ProductCategory::Panchos => "panchos",
            ProductCategory::Papas => "papas",
            ProductCategory::Bebidas => "bebidas",
            ProductCategory::Combos => "combos",
            ProductCategory::Extras => "extras",
        }
    }

    /// Parses a category tag, case-insensitively.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }
}

/// A paid add-on for a product (extra cheese, fried egg...).
///
/// Copied by value into a cart line, so later catalog edits never reprice
/// an open cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Extra {
    pub id: String,
    pub name: String,
    /// Added to the unit price of the line, once per unit.
    pub price: Money,
}

/// An ingredient the customer wants left out. No price effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Exclusion {
    pub id: String,
    pub name: String,
}

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Display name shown to the cashier and on the ticket.
    pub name: String,

    /// Menu description.
    #[serde(default)]
    pub description: String,

    /// Unit price before extras and tax.
    pub price: Money,

    pub category: ProductCategory,

    /// Add-ons offered for this product.
    #[serde(default)]
    pub extras: Vec<Extra>,

    /// Ingredients that can be removed.
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,

    #[serde(default)]
    pub is_combo: bool,

    #[serde(default)]
    pub is_best_seller: bool,

    /// Unavailable products stay listed but cannot be sold.
    pub is_available: bool,

    /// Kitchen preparation time in minutes.
    #[serde(default)]
    pub preparation_time: Option<u32>,
}

impl Product {
    /// Looks up an extra offered by this product.
    pub fn extra(&self, id: &str) -> Option<&Extra> {
        self.extras.iter().find(|e| e.id == id)
    }

    /// Looks up an exclusion offered by this product.
    pub fn exclusion(&self, id: &str) -> Option<&Exclusion> {
        self.exclusions.iter().find(|e| e.id == id)
    }
}

// =============================================================================
// Order Type
// =============================================================================

/// How the order leaves the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Eaten in the salon, optionally at a numbered table.
    #[default]
    DineIn,
    Takeaway,
    /// Carries the delivery fee and needs customer contact details.
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "dine_in" | "salon" => Some(OrderType::DineIn),
            "takeaway" => Some(OrderType::Takeaway),
            "delivery" => Some(OrderType::Delivery),
            _ => None,
        }
    }
}

// =============================================================================
// Customer & Fulfillment
// =============================================================================

/// Contact details collected by the delivery form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Order-type dependent data, carrying only what each channel needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "order_type", rename_all = "snake_case")]
pub enum Fulfillment {
    DineIn {
        table_number: Option<u32>,
    },
    Takeaway {
        /// Name to call out at pickup, if one was taken.
        customer_name: Option<String>,
    },
    Delivery {
        customer_name: String,
        customer_phone: String,
        customer_address: String,
    },
}

impl Fulfillment {
    pub fn order_type(&self) -> OrderType {
        match self {
            Fulfillment::DineIn { .. } => OrderType::DineIn,
            Fulfillment::Takeaway { .. } => OrderType::Takeaway,
            Fulfillment::Delivery { .. } => OrderType::Delivery,
        }
    }

    pub fn table_number(&self) -> Option<u32> {
        match self {
            Fulfillment::DineIn { table_number } => *table_number,
            _ => None,
        }
    }
}

// =============================================================================
// Payment & Document
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment, needs a tendered amount.
    #[default]
    Cash,
    /// Debit or credit card on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Some(PaymentMethod::Card),
            "transfer" => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }
}

/// Proof of purchase requested by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Simple ticket.
    #[default]
    Receipt,
    /// Tax invoice, needs billing name and tax id.
    Invoice,
    /// Ticket and invoice.
    Both,
}

impl DocumentType {
    /// Whether billing details must be collected.
    pub fn requires_billing(&self) -> bool {
        matches!(self, DocumentType::Invoice | DocumentType::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Receipt => "receipt",
            DocumentType::Invoice => "invoice",
            DocumentType::Both => "both",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "receipt" | "ticket" => Some(DocumentType::Receipt),
            "invoice" | "factura" => Some(DocumentType::Invoice),
            "both" => Some(DocumentType::Both),
            _ => None,
        }
    }
}

/// Name and tax id printed on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingDetails {
    pub name: String,
    pub tax_id: String,
}

// =============================================================================
// Order Status
// =============================================================================

/// Kitchen/delivery progress of an order.
///
/// Orders leave the payment workflow as `Preparing`; the other states are
/// driven by collaborators outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    #[default]
    Preparing,
    Ready,
    Delivered,
    Completed,
    Cancelled,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Manager,
    Cashier,
    Kitchen,
    Delivery,
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Manager => "manager",
            UserRole::Cashier => "cashier",
            UserRole::Kitchen => "kitchen",
            UserRole::Delivery => "delivery",
            UserRole::Employee => "employee",
        }
    }
}

/// A staff member who can log into the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

// =============================================================================
// Unit Tests
// =============================================================================
