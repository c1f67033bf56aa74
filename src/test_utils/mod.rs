#![allow(missing_docs)]

pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::{SharedConnection, initialize};

pub(crate) use http::{assert_status, parse_json_body};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// [get_test_connection] wrapped for sharing between handlers.
pub(crate) fn get_shared_test_connection() -> SharedConnection {
    Arc::new(Mutex::new(get_test_connection()))
}
