//! `drugs` table: the inventory record and its validation rules.

use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationErrors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drugs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: Uuid,
    #[sea_orm(indexed)]
    pub manufacturer: String,
    pub name: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(None)")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Drug = Model;

impl Model {
    pub fn from_fields(uid: Uuid, fields: DrugFields) -> Self {
        Self {
            uid,
            manufacturer: fields.manufacturer,
            name: fields.name,
            quantity: fields.quantity,
            price: fields.price,
        }
    }

    /// Same record with the four business fields replaced; `uid` is kept.
    pub fn with_fields(self, fields: DrugFields) -> Self {
        Self::from_fields(self.uid, fields)
    }

    /// Active model with every column set, suitable for insert or upsert.
    pub fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            uid: Set(self.uid),
            manufacturer: Set(self.manufacturer.clone()),
            name: Set(self.name.clone()),
            quantity: Set(self.quantity),
            price: Set(self.price),
        }
    }
}

/// Business fields that passed validation. Only constructible through
/// [`DrugFields::new`] or [`DrugPayload::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrugFields {
    manufacturer: String,
    name: String,
    quantity: i32,
    price: Decimal,
}

impl DrugFields {
    pub fn new(
        manufacturer: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        price: Decimal,
    ) -> Result<Self, ValidationErrors> {
        DrugPayload {
            uid: None,
            manufacturer: Some(manufacturer.into()),
            name: Some(name.into()),
            quantity: Some(quantity),
            price: Some(price),
        }
        .validate()
    }

    pub fn manufacturer(&self) -> &str { &self.manufacturer }
    pub fn name(&self) -> &str { &self.name }
    pub fn quantity(&self) -> i32 { self.quantity }
    pub fn price(&self) -> Decimal { self.price }
}

/// A validated drug ready for creation; `uid` is assigned by the service when absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDrug {
    pub uid: Option<Uuid>,
    pub fields: DrugFields,
}

/// Request body for create and update. Every field is optional on the wire so
/// that missing values surface as field errors instead of decode failures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DrugPayload {
    #[serde(default)]
    pub uid: Option<Uuid>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

pub fn validate_manufacturer(value: Option<&str>, errs: &mut ValidationErrors) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errs.push("manufacturer", "Manufacturer is required");
    }
}

pub fn validate_name(value: Option<&str>, errs: &mut ValidationErrors) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errs.push("name", "Drug name is required");
    }
}

pub fn validate_quantity(value: Option<i64>, errs: &mut ValidationErrors) {
    match value {
        None => errs.push("quantity", "Quantity is required"),
        Some(q) if q <= 0 => errs.push("quantity", "Quantity must be greater than zero"),
        Some(q) if q > i64::from(i32::MAX) => errs.push("quantity", "Quantity is out of range"),
        Some(_) => {}
    }
}

pub fn validate_price(value: Option<Decimal>, errs: &mut ValidationErrors) {
    match value {
        None => errs.push("price", "Price is required"),
        Some(p) if p <= Decimal::ZERO => errs.push("price", "Price must be greater than zero"),
        Some(_) => {}
    }
}

impl DrugPayload {
    /// Check the four business fields, collecting every failure. `uid` is not
    /// inspected.
    pub fn validate(self) -> Result<DrugFields, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        validate_manufacturer(self.manufacturer.as_deref(), &mut errs);
        validate_name(self.name.as_deref(), &mut errs);
        validate_quantity(self.quantity, &mut errs);
        validate_price(self.price, &mut errs);

        match (self.manufacturer, self.name, self.quantity, self.price) {
            (Some(manufacturer), Some(name), Some(quantity), Some(price)) if errs.is_empty() => {
                let quantity = i32::try_from(quantity).unwrap_or(i32::MAX);
                Ok(DrugFields { manufacturer, name, quantity, price })
            }
            _ => Err(errs),
        }
    }

    pub fn into_new_drug(self) -> Result<NewDrug, ValidationErrors> {
        let uid = self.uid;
        let fields = self.validate()?;
        Ok(NewDrug { uid, fields })
    }
}

/// Validate a batch; errors are reported per item as `[index].field` and the
/// batch is rejected as a whole if any item fails.
pub fn validate_batch(payloads: Vec<DrugPayload>) -> Result<Vec<NewDrug>, ValidationErrors> {
    let mut errs = ValidationErrors::default();
    let mut drugs = Vec::with_capacity(payloads.len());
    for (i, payload) in payloads.into_iter().enumerate() {
        match payload.into_new_drug() {
            Ok(d) => drugs.push(d),
            Err(e) => errs.extend_prefixed(&format!("[{i}]"), e),
        }
    }
    errs.into_result(drugs)
}
