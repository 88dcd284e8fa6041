//! End-to-end test of the `--serve` binary over plain HTTP.

#![cfg(feature = "api")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

const STATE_KEYS: &[&str] = &["energia_total", "energia_disponible", "hogares", "renovables"];

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn served_grid_follows_the_contract() {
    let port = allocate_port();
    let addr = format!("127.0.0.1:{port}");
    let _child = spawn_api_process(port);

    wait_for_server(&addr, Duration::from_secs(8));

    let (status, body) = http(&addr, "GET", "/energia/estado").expect("state request");
    assert_eq!(status, 200);
    let state: Value = serde_json::from_str(&body).expect("state body should be JSON");
    assert_has_state_keys(&state);
    assert_eq!(state["energia_total"], 50);

    let (status, _) =
        http(&addr, "POST", "/energia/renovable?tipo=wind&capacidad=15").expect("renewable request");
    assert_eq!(status, 204);

    let (status, body) =
        http(&addr, "POST", "/energia/renovable?tipo=wind&capacidad=0").expect("renewable request");
    assert_eq!(status, 400);
    let err: Value = serde_json::from_str(&body).expect("error body should be JSON");
    assert!(err.get("error").is_some());

    let (status, _) = http(&addr, "POST", "/energia/simular").expect("start request");
    assert_eq!(status, 202);
    thread::sleep(Duration::from_millis(300));

    let (_, body) = http(&addr, "GET", "/energia/estado").expect("state request");
    let state: Value = serde_json::from_str(&body).expect("state body should be JSON");
    assert_has_state_keys(&state);
    assert_eq!(state["hogares"].as_array().map(Vec::len), Some(5));
    assert_eq!(state["renovables"][0]["tipo"], "wind");
    let total = state["energia_total"].as_u64().expect("total");
    let available = state["energia_disponible"].as_u64().expect("available");
    assert!(total >= 65);
    assert!(available <= total);
}

fn allocate_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    let port = listener
        .local_addr()
        .expect("local_addr should be available")
        .port();
    drop(listener);
    port
}

fn spawn_api_process(port: u16) -> ChildGuard {
    let child = Command::new(env!("CARGO_BIN_EXE_microgrid-sim"))
        .args(["--preset", "baseline", "--seed", "3", "--serve", "--port"])
        .arg(port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("microgrid-sim process should spawn");

    ChildGuard { child }
}

fn wait_for_server(addr: &str, timeout: Duration) {
    let start = Instant::now();
    loop {
        if let Ok((200, _)) = http(addr, "GET", "/energia/estado") {
            return;
        }

        if start.elapsed() >= timeout {
            panic!("timed out waiting for API server on {addr}");
        }

        thread::sleep(Duration::from_millis(50));
    }
}

fn http(addr: &str, method: &str, path: &str) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr).map_err(|err| format!("connect: {err}"))?;
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write: {err}"))?;

    let mut raw = String::new();
    stream
        .read_to_string(&mut raw)
        .map_err(|err| format!("read: {err}"))?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| "invalid HTTP response".to_string())?;
    let status_code = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| "missing status code".to_string())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status code: {err}"))?;

    Ok((status_code, body.to_string()))
}

fn assert_has_state_keys(state: &Value) {
    let object = state.as_object().expect("state should be an object");
    for key in STATE_KEYS {
        assert!(object.contains_key(*key), "missing key: {key}");
    }
}
