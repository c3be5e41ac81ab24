use contracts::enums::DiscountMergePolicy;
use serde_json::Value;
use std::fmt;

use crate::shared::fields::{as_amount, as_text, pick, pick_amount, pick_text, JsonObject};

/// Pre-computed line totals, most specific first
pub const GROSS_AMOUNT_KEYS: &[&str] = &[
    "price",
    "amount",
    "lineGrossAmount",
    "totalPrice",
    "totalAmount",
];
pub const UNIT_PRICE_KEYS: &[&str] = &["lineUnitPrice", "unitPrice", "unitSalePrice", "sellingPrice"];
// "amount" is a gross candidate, so it is not read as a quantity
pub const QUANTITY_KEYS: &[&str] = &["quantity", "qty", "count"];
pub const COMMISSION_KEYS: &[&str] = &[
    "commission",
    "commissionAmount",
    "tyCommissionAmount",
    "commissionTotal",
];
pub const SELLER_DISCOUNT_KEYS: &[&str] =
    &["lineSellerDiscount", "sellerDiscountAmount", "sellerDiscount"];
pub const MARKETPLACE_DISCOUNT_KEYS: &[&str] = &["lineTyDiscount", "tyDiscount", "tyDiscountAmount"];
pub const LINE_ID_KEYS: &[&str] = &["lineId", "id"];
pub const SKU_KEYS: &[&str] = &["barcode", "merchantSku"];

const DISCOUNT_DETAILS_KEY: &str = "discountDetails";
const ITEM_SELLER_DISCOUNT_KEY: &str = "lineItemSellerDiscount";
const ITEM_MARKETPLACE_DISCOUNT_KEY: &str = "lineItemTyDiscount";
const CAMPAIGN_KEY: &str = "salesCampaignId";

/// Line identity inside one order. Integer ids stay integers so that
/// `15` and `"15"` from different payload versions do not collide silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineId {
    Int(i64),
    Text(String),
}

impl LineId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(LineId::Int(i)),
                None => Some(LineId::Text(n.to_string())),
            },
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(LineId::Text(s.to_string()))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineId::Int(i) => write!(f, "{}", i),
            LineId::Text(s) => f.write_str(s),
        }
    }
}

/// Read-only view over one raw order line
#[derive(Debug, Clone, Copy)]
pub struct LineView<'a> {
    raw: &'a JsonObject,
}

impl<'a> LineView<'a> {
    /// None for entries that are not JSON objects
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|raw| Self { raw })
    }

    /// `lineId`, falling back to `id`; empty or non-scalar ids count as missing
    pub fn id(&self) -> Option<LineId> {
        LINE_ID_KEYS
            .iter()
            .filter_map(|key| self.raw.get(*key))
            .find_map(LineId::from_value)
    }

    /// Quantity, treated as 1 when missing, zero, negative or malformed
    pub fn quantity(&self) -> f64 {
        let qty = pick_amount(self.raw, QUANTITY_KEYS, 1.0);
        if qty > 0.0 {
            qty
        } else {
            1.0
        }
    }

    /// Gross sale amount of the line.
    ///
    /// The first gross candidate with a positive value wins. Only when none
    /// is positive the amount is rebuilt as unit price × quantity, so a line
    /// reporting both never counts twice. Never negative.
    pub fn sale_price(&self) -> f64 {
        let gross = GROSS_AMOUNT_KEYS
            .iter()
            .filter_map(|key| self.raw.get(*key).filter(|v| !v.is_null()))
            .map(|value| as_amount(Some(value)))
            .find(|amount| *amount > 0.0);
        if let Some(gross) = gross {
            return gross;
        }

        let unit_price = pick_amount(self.raw, UNIT_PRICE_KEYS, 0.0);
        (unit_price * self.quantity()).max(0.0)
    }

    pub fn commission(&self) -> f64 {
        pick_amount(self.raw, COMMISSION_KEYS, 0.0)
    }

    /// (seller_discount, marketplace_discount), both ≥ 0.
    ///
    /// Flat fields and `discountDetails[]` entries are merged per `policy`.
    /// With `Sum` a payload that reports the same discount both ways is
    /// counted twice; undercounting is the worse failure here.
    pub fn discounts(&self, policy: DiscountMergePolicy) -> (f64, f64) {
        let flat_seller = pick_amount(self.raw, SELLER_DISCOUNT_KEYS, 0.0).max(0.0);
        let flat_marketplace = pick_amount(self.raw, MARKETPLACE_DISCOUNT_KEYS, 0.0).max(0.0);

        let mut item_seller = 0.0;
        let mut item_marketplace = 0.0;
        if let Some(Value::Array(details)) = self.raw.get(DISCOUNT_DETAILS_KEY) {
            for detail in details.iter().filter_map(Value::as_object) {
                item_seller += pick_amount(detail, &[ITEM_SELLER_DISCOUNT_KEY], 0.0).max(0.0);
                item_marketplace +=
                    pick_amount(detail, &[ITEM_MARKETPLACE_DISCOUNT_KEY], 0.0).max(0.0);
            }
        }

        match policy {
            DiscountMergePolicy::Sum => (flat_seller + item_seller, flat_marketplace + item_marketplace),
            DiscountMergePolicy::Max => (
                flat_seller.max(item_seller),
                flat_marketplace.max(item_marketplace),
            ),
        }
    }

    /// "salesCampaignId:<id>" or empty
    pub fn campaign(&self) -> String {
        match pick(self.raw, &[CAMPAIGN_KEY]).and_then(as_text) {
            Some(id) => format!("{}:{}", CAMPAIGN_KEY, id),
            None => String::new(),
        }
    }

    /// Barcode, falling back to merchant SKU, empty when neither is set
    pub fn sku(&self) -> String {
        pick_text(self.raw, SKU_KEYS).unwrap_or_default()
    }

    pub fn product_name(&self) -> String {
        pick_text(self.raw, &["productName"]).unwrap_or_default()
    }
}
