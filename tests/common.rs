use std::{net::TcpListener, time::Duration};

use httptest::Server;
use sixpack::{
    models::{SessionOptions, SessionParams},
    Session,
};

pub const API_KEY: &str = "api_key";
pub const CLIENT_ID: &str = "visitor-1";

pub fn session_for(server: &Server, params: SessionParams) -> Session {
    Session::new(
        Some(CLIENT_ID.to_string()),
        SessionOptions {
            host: Some(format!("http://{}", server.addr())),
            timeout: Some(Duration::from_secs(2)),
        },
        params,
    )
}

/// Host on a local port nobody listens on.
pub fn unreachable_session() -> Session {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind a free port");
    let addr = listener.local_addr().expect("should have a local addr");
    drop(listener);

    Session::new(
        Some(CLIENT_ID.to_string()),
        SessionOptions {
            host: Some(format!("http://{}", addr)),
            timeout: Some(Duration::from_millis(500)),
        },
        SessionParams::default(),
    )
}
