#![allow(dead_code)]

use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

pub const DEPOSIT_ENT: i64 = 37;
pub const WITHDRAW_ENT: i64 = 41;

pub const CHECKING: i64 = 5309;
pub const SAVINGS: i64 = 5310;
pub const GROCERIES: i64 = 6001;
pub const DINING: i64 = 6002;
pub const ORPHAN_CATEGORY: i64 = 6003;
pub const WITHDRAW_A: i64 = 7001;
pub const WITHDRAW_B: i64 = 7002;
pub const REFUND: i64 = 7003;
pub const VACATION_TAG: i64 = 8001;

pub fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("mw_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// A small store shaped like the application's: one shared entity table,
/// the type registry, and the junction tables.
pub fn fixture_store(test_name: &str) -> PathBuf {
    let path = temp_dir(test_name).join("store.sqlite");
    let conn = Connection::open(&path).expect("create fixture store");
    conn.execute_batch(
        r#"
        CREATE TABLE Z_PRIMARYKEY (
          Z_ENT INTEGER PRIMARY KEY,
          Z_NAME VARCHAR,
          Z_SUPER INTEGER,
          Z_MAX INTEGER
        );

        CREATE TABLE ZSYNCOBJECT (
          Z_PK INTEGER PRIMARY KEY,
          Z_ENT INTEGER,
          Z_OPT INTEGER,
          ZACCOUNT2 INTEGER,
          ZPARENTCATEGORY INTEGER,
          ZAMOUNT1 FLOAT,
          ZDATE1 TIMESTAMP,
          ZOBJECTCREATIONDATE TIMESTAMP,
          ZDESC2 VARCHAR,
          ZNAME VARCHAR,
          ZGID VARCHAR
        );

        CREATE TABLE ZCATEGORYASSIGMENT (
          Z_PK INTEGER PRIMARY KEY,
          Z_ENT INTEGER,
          Z_OPT INTEGER,
          ZCATEGORY INTEGER,
          ZTRANSACTION INTEGER,
          ZAMOUNT FLOAT
        );

        CREATE TABLE Z_36TAGS (
          Z_36TRANSACTIONS INTEGER,
          Z_35TAGS INTEGER,
          PRIMARY KEY (Z_36TRANSACTIONS, Z_35TAGS)
        );

        CREATE TABLE ZWITHDRAWREFUNDTRANSACTIONLINK (
          Z_PK INTEGER PRIMARY KEY,
          Z_ENT INTEGER,
          Z_OPT INTEGER,
          ZREFUNDTRANSACTION INTEGER,
          ZWITHDRAWTRANSACTION INTEGER
        );

        CREATE TABLE app_settings (
          id INTEGER PRIMARY KEY,
          last_account INTEGER
        );

        INSERT INTO Z_PRIMARYKEY (Z_ENT, Z_NAME, Z_SUPER, Z_MAX) VALUES
          (12, 'BankAccount', 0, 5310),
          (19, 'Category', 0, 6003),
          (35, 'Tag', 0, 8001),
          (37, 'DepositTransaction', 0, 0),
          (41, 'WithdrawTransaction', 0, 7002),
          (45, 'RefundTransaction', 0, 7003);

        INSERT INTO ZSYNCOBJECT (Z_PK, Z_ENT, Z_OPT, ZACCOUNT2, ZPARENTCATEGORY, ZAMOUNT1, ZDESC2, ZNAME, ZGID) VALUES
          (5309, 12, 1, NULL, NULL, NULL, NULL, 'Checking', 'A0000000-0000-4000-8000-000000005309'),
          (5310, 12, 1, NULL, NULL, NULL, NULL, 'Savings', 'A0000000-0000-4000-8000-000000005310'),
          (6001, 19, 1, NULL, NULL, NULL, NULL, 'Groceries', 'A0000000-0000-4000-8000-000000006001'),
          (6002, 19, 1, NULL, NULL, NULL, NULL, 'Dining', 'A0000000-0000-4000-8000-000000006002'),
          (6003, 19, 1, NULL, NULL, NULL, NULL, 'Unused', 'A0000000-0000-4000-8000-000000006003'),
          (7001, 41, 1, 5309, NULL, -20.0, 'Market', NULL, 'A0000000-0000-4000-8000-000000007001'),
          (7002, 41, 1, 5309, NULL, -42.5, 'Hotel', NULL, 'A0000000-0000-4000-8000-000000007002'),
          (7003, 45, 1, 5309, NULL, 10.0, 'Hotel refund', NULL, 'A0000000-0000-4000-8000-000000007003'),
          (8001, 35, 1, NULL, NULL, NULL, NULL, 'vacation', 'A0000000-0000-4000-8000-000000008001');

        INSERT INTO ZCATEGORYASSIGMENT (Z_PK, Z_ENT, Z_OPT, ZCATEGORY, ZTRANSACTION, ZAMOUNT) VALUES
          (1, 21, 1, 6001, 7001, -20.0);

        INSERT INTO Z_36TAGS (Z_36TRANSACTIONS, Z_35TAGS) VALUES (7002, 8001);

        INSERT INTO app_settings (id, last_account) VALUES (1, 5309);
        "#,
    )
    .expect("seed fixture store");
    path
}

pub fn open_raw(path: &Path) -> Connection {
    Connection::open(path).expect("open fixture store")
}

pub fn count(path: &Path, sql: &str) -> i64 {
    open_raw(path)
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .expect("count query")
}

pub fn entity_exists(path: &Path, id: i64) -> bool {
    open_raw(path)
        .query_row(
            "SELECT COUNT(*) FROM ZSYNCOBJECT WHERE Z_PK = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .expect("entity lookup")
        > 0
}
