//! In-process fake engine for unit tests.
//!
//! Speaks just enough HTTP to satisfy the blocking control-channel
//! client; each test supplies a handler mapping decoded requests to
//! canned responses.

use std::io::{BufRead, BufReader, Read as _, Write as _};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use phantomjs_protocol::{Request, Response};

pub(crate) struct MockEngine {
    port: u16,
    stopped: Arc<AtomicBool>,
    streams: Arc<Mutex<Vec<TcpStream>>>,
    accept_thread: Option<JoinHandle<()>>,
}

impl MockEngine {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let stopped = Arc::new(AtomicBool::new(false));
        let streams: Arc<Mutex<Vec<TcpStream>>> = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let accept_stopped = Arc::clone(&stopped);
        let accept_streams = Arc::clone(&streams);
        let accept_thread = thread::spawn(move || {
            for stream in listener.incoming() {
                if accept_stopped.load(Ordering::Acquire) {
                    break;
                }
                let Ok(stream) = stream else { break };
                if let Ok(clone) = stream.try_clone() {
                    accept_streams.lock().push(clone);
                }
                let handler = Arc::clone(&handler);
                thread::spawn(move || serve_connection(stream, handler));
            }
        });

        Self {
            port,
            stopped,
            streams,
            accept_thread: Some(accept_thread),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stops accepting and severs every open connection, so callers see a
    /// channel fault on their next request.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        // Wake the accept loop so it observes the flag and drops the
        // listener.
        let _ = TcpStream::connect(("127.0.0.1", self.port));
        for stream in self.streams.lock().drain(..) {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.accept_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Serves HTTP/1.1 requests on one connection until the peer hangs up.
fn serve_connection<F>(stream: TcpStream, handler: Arc<F>)
where
    F: Fn(&Request) -> Response + Send + Sync + 'static,
{
    let mut reader = BufReader::new(match stream.try_clone() {
        Ok(clone) => clone,
        Err(_) => return,
    });
    let mut stream = stream;
    loop {
        let mut content_length = 0usize;
        let mut saw_request_line = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                return;
            }
            if line.trim().is_empty() {
                break;
            }
            saw_request_line = true;
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap_or(0);
            }
        }
        if !saw_request_line {
            return;
        }
        let mut body = vec![0u8; content_length];
        if reader.read_exact(&mut body).is_err() {
            return;
        }

        let response = match serde_json::from_slice::<Request>(&body) {
            Ok(request) => handler(&request),
            Err(e) => Response::error(format!("malformed request: {e}")),
        };
        let data = serde_json::to_string(&response).unwrap();
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            data.len(),
            data
        );
        if stream.write_all(reply.as_bytes()).is_err() {
            return;
        }
    }
}
