//! Dimension builders.
//!
//! Each builder is a pure function over the raw table set producing one
//! dimension table. Dimensions are column projections of one raw table,
//! renamed to warehouse-facing names, with at most one denormalizing join
//! (category name into the product dimension). No deduplication and no null
//! handling beyond what the joins produce.

use chrono::{Datelike, NaiveDate};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

use super::datekey;
use super::with_name;
use crate::error::TableResult;
use crate::table::{RawTables, Table};

/// Timestamp columns pooled into the calendar dimension: every date a fact
/// row can reference.
const CALENDAR_SOURCES: &[(&str, &str)] = &[
    ("sales_order", "order_date"),
    ("web_session", "started_at"),
    ("nps_response", "responded_at"),
];

/// Calendar dimension: one row per distinct date observed in the fact
/// sources, sorted ascending by date key.
///
/// Unparseable timestamps are dropped here rather than kept as a sentinel
/// row; the date-key codec used by the fact builders handles those with
/// key `0` instead.
pub fn dim_calendar(raw: &RawTables) -> TableResult<Table> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for (table_name, column) in CALENDAR_SOURCES {
        let table = raw.required(table_name)?;
        for value in table.column(column)? {
            if let Some(dt) = datekey::parse_timestamp(value) {
                dates.insert(dt.date());
            }
        }
    }

    let headers = [
        "date_id",
        "date",
        "year",
        "quarter",
        "month",
        "month_name",
        "day",
        "day_of_week",
        "week_of_year",
    ];

    let rows = dates
        .into_iter()
        .map(|date| {
            let mut row = Map::new();
            row.insert("date_id".into(), json!(datekey::key_of_date(date)));
            row.insert("date".into(), json!(date.format("%Y-%m-%d").to_string()));
            row.insert("year".into(), json!(date.year()));
            row.insert("quarter".into(), json!((date.month() + 2) / 3));
            row.insert("month".into(), json!(date.month()));
            row.insert("month_name".into(), json!(date.format("%B").to_string()));
            row.insert("day".into(), json!(date.day()));
            // Monday-start week: 0 = Monday, 6 = Sunday.
            row.insert(
                "day_of_week".into(),
                json!(date.weekday().num_days_from_monday()),
            );
            row.insert("week_of_year".into(), json!(date.iso_week().week()));
            row
        })
        .collect();

    Ok(Table {
        name: "dim_calendar".into(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    })
}

/// Customer dimension (PK: `customer_id`), concatenating first and last name.
///
/// A missing name part reads as the empty string, so a customer with only a
/// first name gets a full name with a trailing space.
pub fn dim_customer(raw: &RawTables) -> TableResult<Table> {
    let customer = raw.required("customer")?;
    let mut t = customer.select(&[
        "customer_id",
        "email",
        "first_name",
        "last_name",
        "phone",
        "status",
        "created_at",
    ])?;

    for row in &mut t.rows {
        let full = format!("{} {}", text(row.get("first_name")), text(row.get("last_name")));
        row.insert("full_name".into(), json!(full));
    }
    t.headers.push("full_name".into());

    let t = t
        .select(&["customer_id", "email", "full_name", "phone", "status", "created_at"])?
        .rename(&[("created_at", "signup_date")])?;

    Ok(with_name("dim_customers", t))
}

/// Product dimension (PK: `product_id`), denormalizing the category name.
///
/// A product whose category is missing keeps a null `category_name`.
pub fn dim_product(raw: &RawTables) -> TableResult<Table> {
    let product = raw.required("product")?;
    let category = raw
        .required("product_category")?
        .select(&["category_id", "name"])?
        .rename(&[("name", "category_name")])?;

    let t = product
        .left_join(&category, "category_id", "category_id")?
        .select(&[
            "product_id",
            "sku",
            "name",
            "list_price",
            "category_name",
            "status",
            "created_at",
        ])?
        .rename(&[("name", "product_name")])?;

    Ok(with_name("dim_products", t))
}

/// Channel dimension (PK: `channel_id`), rename only.
pub fn dim_channel(raw: &RawTables) -> TableResult<Table> {
    let t = raw
        .required("channel")?
        .select(&["channel_id", "code", "name"])?
        .rename(&[("code", "channel_code"), ("name", "channel_name")])?;

    Ok(with_name("dim_channels", t))
}

/// Province dimension (PK: `province_id`), rename only.
pub fn dim_province(raw: &RawTables) -> TableResult<Table> {
    let t = raw
        .required("province")?
        .select(&["province_id", "name", "code"])?
        .rename(&[("name", "province_name"), ("code", "province_code")])?;

    Ok(with_name("dim_provinces", t))
}

/// Store dimension (PK: `store_id`), rename only.
///
/// `address_id` is deliberately not resolved to a province; the store
/// dimension keeps the bare foreign key.
pub fn dim_store(raw: &RawTables) -> TableResult<Table> {
    let t = raw
        .required("store")?
        .select(&["store_id", "name", "address_id"])?
        .rename(&[("name", "store_name")])?;

    Ok(with_name("dim_stores", t))
}

/// String form of a cell for concatenation; null and missing read as "".
fn text(value: Option<&Value>) -> &str {
    match value {
        Some(Value::String(s)) => s.as_str(),
        _ => "",
    }
}
