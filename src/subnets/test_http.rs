//! One-shot local HTTP server for remote source tests.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Raw HTTP/1.1 response with `Connection: close`.
///
/// Without `content_length` the body ends when the connection closes.
pub fn http_response(status: &str, body: &str, content_length: bool) -> Vec<u8> {
    let mut head = format!("HTTP/1.1 {status}\r\nContent-Type: application/json\r\nConnection: close\r\n");
    if content_length {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("\r\n");
    let mut raw = head.into_bytes();
    raw.extend_from_slice(body.as_bytes());
    raw
}

/// Answer the first request on a fresh port with `response`, return the URL to fetch.
pub fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        // The client hangs up early on oversize bodies.
        let _ = stream.write_all(&response);
        let _ = stream.flush();
    });
    format!("http://{addr}/ips.json")
}

/// Client that ignores proxy settings from the environment.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
