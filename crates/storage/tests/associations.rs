#![forbid(unsafe_code)]

mod support;

use mw_storage::{PlannedStatement, Session, SessionOptions, StoreLayout, WriteMode};
use rusqlite::params;
use rusqlite::types::Value;
use support::*;

#[test]
fn category_splits_are_planned_in_caller_order() {
    let path = fixture_store("split_order");
    let mut session = Session::open(&path, WriteMode::Preview).expect("open preview session");

    session
        .assign_categories(WITHDRAW_B, [(10, 5.00), (11, 7.25)])
        .expect("assign categories");

    let sql = "INSERT INTO ZCATEGORYASSIGMENT (ZTRANSACTION, ZCATEGORY, ZAMOUNT) VALUES (?1, ?2, ?3)";
    assert_eq!(
        session.planned_statements(),
        &[
            PlannedStatement {
                sql: sql.to_string(),
                params: Some(vec![
                    Value::Integer(WITHDRAW_B),
                    Value::Integer(10),
                    Value::Real(5.00),
                ]),
            },
            PlannedStatement {
                sql: sql.to_string(),
                params: Some(vec![
                    Value::Integer(WITHDRAW_B),
                    Value::Integer(11),
                    Value::Real(7.25),
                ]),
            },
        ]
    );
}

#[test]
fn category_splits_land_in_the_junction_table() {
    let path = fixture_store("split_apply");
    let mut session = Session::open(&path, WriteMode::Apply).expect("open apply session");

    session
        .assign_categories(WITHDRAW_B, vec![(GROCERIES, -30.0), (DINING, -12.5)])
        .expect("assign categories");

    let conn = open_raw(&path);
    let mut stmt = conn
        .prepare(
            "SELECT ZCATEGORY, ZAMOUNT FROM ZCATEGORYASSIGMENT WHERE ZTRANSACTION = ?1 ORDER BY Z_PK",
        )
        .expect("prepare");
    let rows = stmt
        .query_map(params![WITHDRAW_B], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    assert_eq!(rows, vec![(GROCERIES, -30.0), (DINING, -12.5)]);
}

#[test]
fn empty_split_list_plans_nothing() {
    let path = fixture_store("split_empty");
    let mut session = Session::open(&path, WriteMode::Apply).expect("open apply session");

    session
        .assign_categories(WITHDRAW_B, Vec::<(i64, f64)>::new())
        .expect("assign categories");
    session.assign_tags(WITHDRAW_B, Vec::<i64>::new()).expect("assign tags");
    assert!(session.planned_statements().is_empty());
}

#[test]
fn tags_are_linked_one_row_per_tag() {
    let path = fixture_store("tags_apply");
    let layout = StoreLayout {
        scan_composite_key_members: true,
        ..StoreLayout::default()
    };
    let options = SessionOptions::default()
        .with_mode(WriteMode::Apply)
        .with_layout(layout);
    let mut session = Session::open_with(&path, options).expect("open apply session");

    session
        .assign_tags(WITHDRAW_A, [VACATION_TAG, 8002])
        .expect("assign tags");

    let plan = session.planned_statements();
    assert_eq!(plan.len(), 2);
    assert_eq!(
        plan[1].sql,
        "INSERT INTO Z_36TAGS (Z_36TRANSACTIONS, Z_35TAGS) VALUES (?1, ?2)"
    );
    assert_eq!(
        plan[1].params,
        Some(vec![Value::Integer(WITHDRAW_A), Value::Integer(8002)])
    );
    assert_eq!(
        count(&path, "SELECT COUNT(*) FROM Z_36TAGS WHERE Z_36TRANSACTIONS = 7001"),
        2
    );

    // The new tag link now shows up as a reference to the tag.
    let hits = session.find_references(VACATION_TAG).expect("scan");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].count, 2);
}

#[test]
fn refund_link_points_at_the_original_withdrawal() {
    let path = fixture_store("refund_link");
    let mut session = Session::open(&path, WriteMode::Apply).expect("open apply session");

    session.link_refund(REFUND, WITHDRAW_B).expect("link refund");
    assert_eq!(
        session.planned_statements()[0].to_string(),
        "INSERT INTO ZWITHDRAWREFUNDTRANSACTIONLINK (ZREFUNDTRANSACTION, ZWITHDRAWTRANSACTION) VALUES (?1, ?2)  -- [7003, 7002]"
    );

    let withdraw: i64 = open_raw(&path)
        .query_row(
            "SELECT ZWITHDRAWTRANSACTION FROM ZWITHDRAWREFUNDTRANSACTIONLINK WHERE ZREFUNDTRANSACTION = ?1",
            params![REFUND],
            |row| row.get(0),
        )
        .expect("refund link row");
    assert_eq!(withdraw, WITHDRAW_B);

    // The withdrawal can no longer be safely deleted.
    let hits = session.safe_delete(WITHDRAW_B).expect("safe delete");
    assert!(hits.iter().any(|hit| hit.table == "ZWITHDRAWREFUNDTRANSACTIONLINK"
        && hit.column == "ZWITHDRAWTRANSACTION"));
    assert!(entity_exists(&path, WITHDRAW_B));
}

#[test]
fn junction_names_come_from_layout() {
    let path = fixture_store("junction_layout");
    let layout = StoreLayout::from_json(
        r#"{ "tag_assignments": { "table": "Z_41TAGS", "transaction_column": "Z_41TRANSACTIONS", "tag_column": "Z_40TAGS" } }"#,
    )
    .expect("layout");
    let mut session = Session::open_with(&path, SessionOptions::default().with_layout(layout))
        .expect("open preview session");

    session.assign_tags(WITHDRAW_A, [VACATION_TAG]).expect("assign tags");
    assert_eq!(
        session.planned_statements()[0].sql,
        "INSERT INTO Z_41TAGS (Z_41TRANSACTIONS, Z_40TAGS) VALUES (?1, ?2)"
    );
}
