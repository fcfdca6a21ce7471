//! Fact builders.
//!
//! Each builder is a pure function `(raw tables, dimensions) -> fact table`
//! at a fixed grain. All joins are left joins, so a fact table always has
//! exactly one row per row of its primary input. Surrogate keys are 1-based
//! sequence numbers assigned in construction order; they are unique within a
//! run but not durable across reruns if source row order changes.
//!
//! The dimension set is passed to every builder for uniformity even though
//! most builders re-derive keys from raw data instead of consulting it.
//!
//! Null handling deliberately differs per builder: a bad timestamp yields
//! date key `0`, a session with a bad endpoint yields duration `0`, and a
//! shipment with a bad timestamp yields a null delivery time. These are
//! observable output policies, not accidents.

use serde_json::{json, Number, Value};

use super::datekey;
use super::with_name;
use crate::error::TableResult;
use crate::table::{Dimensions, RawTables, Table};

/// Sales fact, grain: one row per order line item.
///
/// Line items pull in their order header and the shipping address province.
/// Both the line total and the order-level total are retained.
pub fn fact_sales(raw: &RawTables, _dims: &Dimensions) -> TableResult<Table> {
    let items = raw.required("sales_order_item")?;
    let orders = raw.required("sales_order")?.select(&[
        "order_id",
        "order_date",
        "customer_id",
        "channel_id",
        "status",
        "total_amount",
        "shipping_address_id",
    ])?;
    let address = raw.required("address")?.select(&["address_id", "province_id"])?;

    let mut t = items
        .left_join(&orders, "order_id", "order_id")?
        .left_join(&address, "shipping_address_id", "address_id")?
        .rename(&[("province_id", "shipping_province_id")])?;

    for (i, row) in t.rows.iter_mut().enumerate() {
        let date_id = datekey::date_key(row.get("order_date").unwrap_or(&Value::Null));
        row.insert("order_item_pk".into(), json!(i as u64 + 1));
        row.insert("date_id".into(), json!(date_id));
    }
    t.headers.push("order_item_pk".into());
    t.headers.push("date_id".into());

    let t = t.select(&[
        "order_item_pk",
        "date_id",
        "order_id",
        "customer_id",
        "product_id",
        "channel_id",
        "shipping_province_id",
        "quantity",
        "line_total",
        "total_amount",
        "status",
    ])?;

    Ok(with_name("fact_sales", t))
}

/// Payment fact, grain: one row per payment record. Straight projection.
pub fn fact_payment(raw: &RawTables, _dims: &Dimensions) -> TableResult<Table> {
    let mut t = raw.required("payment")?.clone();
    t.require_column("paid_at")?;

    for (i, row) in t.rows.iter_mut().enumerate() {
        let date_id = datekey::date_key(row.get("paid_at").unwrap_or(&Value::Null));
        row.insert("payment_pk".into(), json!(i as u64 + 1));
        row.insert("date_id".into(), json!(date_id));
    }
    t.headers.push("payment_pk".into());
    t.headers.push("date_id".into());

    let t = t.select(&[
        "payment_pk",
        "date_id",
        "order_id",
        "method",
        "status",
        "amount",
        "transaction_ref",
    ])?;

    Ok(with_name("fact_payment", t))
}

/// NPS fact, grain: one row per survey response.
///
/// Categorization is total over the input domain: scores of 9 and above are
/// promoters, 7-8 passives, and everything else, including out-of-range or
/// unparseable scores, detractors.
pub fn fact_nps(raw: &RawTables, _dims: &Dimensions) -> TableResult<Table> {
    let mut t = raw.required("nps_response")?.clone();
    t.require_column("responded_at")?;
    t.require_column("score")?;

    for (i, row) in t.rows.iter_mut().enumerate() {
        let date_id = datekey::date_key(row.get("responded_at").unwrap_or(&Value::Null));
        let category = categorize_score(score_of(row.get("score")));
        row.insert("nps_pk".into(), json!(i as u64 + 1));
        row.insert("date_id".into(), json!(date_id));
        row.insert("nps_category".into(), json!(category));
    }
    t.headers.push("nps_pk".into());
    t.headers.push("date_id".into());
    t.headers.push("nps_category".into());

    let t = t.select(&[
        "nps_pk",
        "date_id",
        "customer_id",
        "channel_id",
        "score",
        "nps_category",
    ])?;

    Ok(with_name("fact_nps", t))
}

/// Web session fact, grain: one row per session.
///
/// Duration is the truncated second count between start and end; a missing
/// or unparseable endpoint yields `0`. An end earlier than the start is not
/// clamped and produces a negative duration.
pub fn fact_web_session(raw: &RawTables, _dims: &Dimensions) -> TableResult<Table> {
    let mut t = raw.required("web_session")?.clone();
    t.require_column("started_at")?;
    t.require_column("ended_at")?;

    for (i, row) in t.rows.iter_mut().enumerate() {
        let started = row.get("started_at").unwrap_or(&Value::Null);
        let date_id = datekey::date_key(started);
        let duration = match (
            datekey::parse_timestamp(started),
            datekey::parse_timestamp(row.get("ended_at").unwrap_or(&Value::Null)),
        ) {
            (Some(start), Some(end)) => (end - start).num_seconds(),
            _ => 0,
        };
        row.insert("session_pk".into(), json!(i as u64 + 1));
        row.insert("date_id".into(), json!(date_id));
        row.insert("duration_seconds".into(), json!(duration));
    }
    t.headers.push("session_pk".into());
    t.headers.push("date_id".into());
    t.headers.push("duration_seconds".into());

    let t = t.select(&[
        "session_pk",
        "date_id",
        "customer_id",
        "source",
        "device",
        "duration_seconds",
    ])?;

    Ok(with_name("fact_web_session", t))
}

/// Shipment fact, grain: one row per shipment.
///
/// Delivery time is fractional days between shipped and delivered; unlike
/// the session duration it stays null when either timestamp fails to parse.
pub fn fact_shipment(raw: &RawTables, _dims: &Dimensions) -> TableResult<Table> {
    let shipment = raw.required("shipment")?;
    let orders = raw
        .required("sales_order")?
        .select(&["order_id", "shipping_address_id"])?;
    let address = raw.required("address")?.select(&["address_id", "province_id"])?;

    let mut t = shipment
        .left_join(&orders, "order_id", "order_id")?
        .left_join(&address, "shipping_address_id", "address_id")?
        .rename(&[("province_id", "shipping_province_id")])?;
    t.require_column("shipped_at")?;
    t.require_column("delivered_at")?;

    for (i, row) in t.rows.iter_mut().enumerate() {
        let shipped = row.get("shipped_at").unwrap_or(&Value::Null);
        let shipped_date_id = datekey::date_key(shipped);
        let delivery_days = match (
            datekey::parse_timestamp(shipped),
            datekey::parse_timestamp(row.get("delivered_at").unwrap_or(&Value::Null)),
        ) {
            (Some(start), Some(end)) => {
                let days = (end - start).num_seconds() as f64 / 86_400.0;
                Number::from_f64(days).map(Value::Number).unwrap_or(Value::Null)
            }
            _ => Value::Null,
        };
        row.insert("shipment_pk".into(), json!(i as u64 + 1));
        row.insert("shipped_date_id".into(), json!(shipped_date_id));
        row.insert("delivery_time_days".into(), delivery_days);
    }
    t.headers.push("shipment_pk".into());
    t.headers.push("shipped_date_id".into());
    t.headers.push("delivery_time_days".into());

    let t = t.select(&[
        "shipment_pk",
        "shipped_date_id",
        "order_id",
        "shipping_province_id",
        "carrier",
        "status",
        "delivery_time_days",
    ])?;

    Ok(with_name("fact_shipment", t))
}

/// Numeric form of a score cell.
fn score_of(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// NPS thresholds: >= 9 Promoter, 7-8 Passive, everything else Detractor.
fn categorize_score(score: Option<f64>) -> &'static str {
    match score {
        Some(s) if s >= 9.0 => "Promoter",
        Some(s) if s >= 7.0 => "Passive",
        _ => "Detractor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;

    fn raw_with(tables: &[(&str, &str)]) -> RawTables {
        let mut raw = RawTables::new();
        for (name, csv) in tables {
            raw.insert(parse_table(name, csv, ',').unwrap());
        }
        raw
    }

    fn no_dims() -> Dimensions {
        Dimensions::new()
    }

    #[test]
    fn test_fact_sales_joins_and_keys() {
        let raw = raw_with(&[
            (
                "sales_order_item",
                "order_item_id,order_id,product_id,quantity,line_total\n\
                 1,100,7,2,20.00\n\
                 2,100,8,1,5.00\n\
                 3,999,9,1,9.00",
            ),
            (
                "sales_order",
                "order_id,order_date,customer_id,channel_id,status,total_amount,shipping_address_id\n\
                 100,2024-04-05 10:30:00,55,1,paid,25.00,200",
            ),
            ("address", "address_id,province_id\n200,13"),
        ]);

        let fact = fact_sales(&raw, &no_dims()).unwrap();
        // Row count equals the line-item count; the dangling order is kept.
        assert_eq!(fact.len(), 3);
        assert_eq!(fact.rows[0]["order_item_pk"], 1);
        assert_eq!(fact.rows[2]["order_item_pk"], 3);
        assert_eq!(fact.rows[0]["date_id"], 20240405);
        assert_eq!(fact.rows[0]["shipping_province_id"], "13");
        assert_eq!(fact.rows[0]["line_total"], "20.00");
        assert_eq!(fact.rows[0]["total_amount"], "25.00");
        // Unmatched order header: null joins, sentinel date key.
        assert_eq!(fact.rows[2]["customer_id"], Value::Null);
        assert_eq!(fact.rows[2]["shipping_province_id"], Value::Null);
        assert_eq!(fact.rows[2]["date_id"], 0);
    }

    #[test]
    fn test_fact_payment_projection() {
        let raw = raw_with(&[(
            "payment",
            "payment_id,order_id,method,status,amount,transaction_ref,paid_at\n\
             1,100,card,ok,25.00,TX1,2024-04-06 09:00:00\n\
             2,101,cash,ok,10.00,TX2,garbage",
        )]);

        let fact = fact_payment(&raw, &no_dims()).unwrap();
        assert_eq!(fact.len(), 2);
        assert_eq!(
            fact.headers,
            vec!["payment_pk", "date_id", "order_id", "method", "status", "amount", "transaction_ref"]
        );
        assert_eq!(fact.rows[0]["date_id"], 20240406);
        assert_eq!(fact.rows[1]["date_id"], 0);
    }

    #[test]
    fn test_fact_nps_thresholds() {
        let raw = raw_with(&[(
            "nps_response",
            "response_id,customer_id,channel_id,score,responded_at\n\
             1,1,1,9,2024-01-01 08:00:00\n\
             2,2,1,8,2024-01-01 08:00:00\n\
             3,3,1,7,2024-01-01 08:00:00\n\
             4,4,1,6,2024-01-01 08:00:00\n\
             5,5,1,-3,2024-01-01 08:00:00\n\
             6,6,1,,2024-01-01 08:00:00",
        )]);

        let fact = fact_nps(&raw, &no_dims()).unwrap();
        let categories: Vec<&str> = fact
            .rows
            .iter()
            .map(|r| r["nps_category"].as_str().unwrap())
            .collect();
        assert_eq!(
            categories,
            vec!["Promoter", "Passive", "Passive", "Detractor", "Detractor", "Detractor"]
        );
    }

    #[test]
    fn test_fact_web_session_duration() {
        let raw = raw_with(&[(
            "web_session",
            "session_id,customer_id,source,device,started_at,ended_at\n\
             1,1,ads,mobile,2024-01-01 08:00:00,2024-01-01 08:02:05\n\
             2,2,seo,desktop,2024-01-01 09:00:00,\n\
             3,3,seo,desktop,2024-01-01 10:00:00,2024-01-01 09:59:00",
        )]);

        let fact = fact_web_session(&raw, &no_dims()).unwrap();
        assert_eq!(fact.rows[0]["duration_seconds"], 125);
        // Missing end collapses to zero, not null.
        assert_eq!(fact.rows[1]["duration_seconds"], 0);
        // End before start is not clamped.
        assert_eq!(fact.rows[2]["duration_seconds"], -60);
    }

    #[test]
    fn test_fact_shipment_delivery_time() {
        let raw = raw_with(&[
            (
                "shipment",
                "shipment_id,order_id,carrier,status,shipped_at,delivered_at\n\
                 1,100,andreani,delivered,2024-04-01 00:00:00,2024-04-03 12:00:00\n\
                 2,100,andreani,in_transit,2024-04-02 00:00:00,",
            ),
            (
                "sales_order",
                "order_id,shipping_address_id\n100,200",
            ),
            ("address", "address_id,province_id\n200,13"),
        ]);

        let fact = fact_shipment(&raw, &no_dims()).unwrap();
        assert_eq!(fact.len(), 2);
        assert_eq!(fact.rows[0]["delivery_time_days"], 2.5);
        assert_eq!(fact.rows[0]["shipped_date_id"], 20240401);
        assert_eq!(fact.rows[0]["shipping_province_id"], "13");
        // Missing delivery timestamp stays null, not zero.
        assert_eq!(fact.rows[1]["delivery_time_days"], Value::Null);
    }

    #[test]
    fn test_fact_missing_table_fails() {
        let raw = raw_with(&[("payment", "payment_id,order_id\n1,100")]);
        assert!(fact_shipment(&raw, &no_dims()).is_err());
    }

    #[test]
    fn test_fact_missing_column_fails() {
        let raw = raw_with(&[("payment", "payment_id,order_id\n1,100")]);
        assert!(fact_payment(&raw, &no_dims()).is_err());
    }
}
