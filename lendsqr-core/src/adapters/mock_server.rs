//! Mock users REST server
//!
//! A small JSON server over a plain `TcpListener` that serves a fixed user
//! dataset the way the development JSON server does:
//! - GET /            returns a welcome document listing endpoints
//! - GET /health      returns { status, message, timestamp, totalUsers }
//! - GET /users       returns the full array
//! - GET /users/{id}  returns one record, or 404 with `{}`
//!
//! Used by the integration tests and by `lq serve`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use crate::domain::User;

/// Behaviour knobs for the mock server
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
    /// Answer every /users request with this status instead of data
    pub fail_status: Option<u16>,
    /// Serve `[]` from /users (an invalid response for the client)
    pub empty_list: bool,
}

/// State shared between the accept loop and connection handlers
struct Shared {
    users: Vec<User>,
    config: MockConfig,
    failing: AtomicBool,
    user_requests: AtomicUsize,
}

/// Mock users API server
pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    shared: Arc<Shared>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockApiServer {
    /// Start a new mock server on a random available port
    pub fn start(users: Vec<User>, config: MockConfig) -> std::io::Result<Self> {
        Self::start_on_port(0, users, config)
    }

    /// Start the server on a specific port (0 for random)
    pub fn start_on_port(port: u16, users: Vec<User>, config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(format!("127.0.0.1:{}", port))?;
        let actual_port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        let shared = Arc::new(Shared {
            users,
            failing: AtomicBool::new(config.fail_status.is_some()),
            config,
            user_requests: AtomicUsize::new(0),
        });
        let shared_clone = Arc::clone(&shared);

        // Non-blocking accept so `stop` can end the loop
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let shared = Arc::clone(&shared_clone);
                        thread::spawn(move || handle_connection(stream, &shared));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port: actual_port,
            running,
            shared,
            thread_handle: Some(thread_handle),
        })
    }

    /// Port the server is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of users served
    pub fn user_count(&self) -> usize {
        self.shared.users.len()
    }

    /// Number of requests received under /users so far
    pub fn user_requests(&self) -> usize {
        self.shared.user_requests.load(Ordering::SeqCst)
    }

    /// Toggle failure mode at runtime (uses `fail_status`, or 500)
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    /// Block until the server stops
    pub fn join(mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    /// Stop the server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, shared: &Shared) {
    // Accepted sockets inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    let n = match stream.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    if shared.config.delay_ms > 0 {
        thread::sleep(Duration::from_millis(shared.config.delay_ms));
    }

    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let (method, path) = match (parts.next(), parts.next()) {
        (Some(method), Some(path)) => (method, path),
        _ => {
            send_response(&mut stream, 400, r#"{"error": "Invalid request"}"#);
            return;
        }
    };

    if method != "GET" {
        send_response(&mut stream, 405, r#"{"error": "Method not allowed"}"#);
        return;
    }

    let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => {
            let body = json!({
                "message": "Welcome to Lendsqr Mock API",
                "endpoints": { "users": "/users", "health": "/health" }
            });
            send_response(&mut stream, 200, &body.to_string());
        }
        ["health"] => {
            let body = json!({
                "status": "OK",
                "message": "Lendsqr Mock API is running",
                "timestamp": Utc::now().to_rfc3339(),
                "totalUsers": shared.users.len()
            });
            send_response(&mut stream, 200, &body.to_string());
        }
        ["users", rest @ ..] => {
            shared.user_requests.fetch_add(1, Ordering::SeqCst);

            if shared.failing.load(Ordering::SeqCst) {
                let status = shared.config.fail_status.unwrap_or(500);
                send_response(&mut stream, status, r#"{"error": "Simulated failure"}"#);
                return;
            }

            match rest {
                [] => {
                    let body = if shared.config.empty_list {
                        "[]".to_string()
                    } else {
                        serde_json::to_string(&shared.users).unwrap_or_else(|_| "[]".to_string())
                    };
                    send_response(&mut stream, 200, &body);
                }
                [id] => match shared.users.iter().find(|u| u.id == *id) {
                    Some(user) => {
                        let body =
                            serde_json::to_string(user).unwrap_or_else(|_| "{}".to_string());
                        send_response(&mut stream, 200, &body);
                    }
                    None => send_response(&mut stream, 404, "{}"),
                },
                _ => send_response(&mut stream, 404, "{}"),
            }
        }
        _ => send_response(&mut stream, 404, r#"{"error": "Endpoint not found"}"#),
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json; charset=utf-8\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status,
        status_text(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
