//! Local HTTP fixture server for end-to-end tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

const FRAMESET: &str = r#"<html>
<head><title>FRAMESET TITLE</title></head>
<frameset cols="50%,50%">
<frame name="FRAME1" src="/frame1.html">
<frame name="FRAME2" src="/frame2.html">
</frameset>
</html>"#;

const FRAME1: &str = r#"<html>
<head><title>FRAME 1 TITLE</title></head>
<body>FRAME 1 BODY</body>
</html>"#;

const FRAME2: &str = r#"<html>
<head><title>FRAME 2 TITLE</title></head>
<body>FRAME 2 BODY</body>
</html>"#;

const FOCUS_FRAMESET: &str = r#"<html>
<frameset rows="*,*">
<frame name="FRAME1" src="/frame1.html">
<frame name="FRAME2" src="/autofocus.html">
</frameset>
</html>"#;

const AUTOFOCUS: &str = r#"<html><body><input autofocus></body></html>"#;

const PLAIN: &str = r#"<html>
<head><title>PLAIN TITLE</title></head>
<body>SOME PLAIN TEXT</body>
</html>"#;

const OTHER: &str = r#"<html>
<head><title>OTHER TITLE</title></head>
<body>OTHER BODY</body>
</html>"#;

/// Serves a fixed set of pages on a loopback port until dropped.
pub struct FixtureServer {
    port: u16,
    stopped: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FixtureServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let stopped = Arc::new(AtomicBool::new(false));

        let accept_stopped = Arc::clone(&stopped);
        let thread = thread::spawn(move || {
            for stream in listener.incoming() {
                if accept_stopped.load(Ordering::Acquire) {
                    break;
                }
                let Ok(stream) = stream else { break };
                thread::spawn(move || serve(stream));
            }
        });

        Self {
            port,
            stopped,
            thread: Some(thread),
        }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        let _ = TcpStream::connect(("127.0.0.1", self.port));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn serve(stream: TcpStream) {
    let mut reader = BufReader::new(match stream.try_clone() {
        Ok(clone) => clone,
        Err(_) => return,
    });
    let mut stream = stream;

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line.trim().is_empty() {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = match path {
        "/" => ("200 OK", FRAMESET),
        "/frame1.html" => ("200 OK", FRAME1),
        "/frame2.html" => ("200 OK", FRAME2),
        "/focus" => ("200 OK", FOCUS_FRAMESET),
        "/autofocus.html" => ("200 OK", AUTOFOCUS),
        "/plain" => ("200 OK", PLAIN),
        "/other" => ("200 OK", OTHER),
        _ => ("404 Not Found", "<html><body>not found</body></html>"),
    };
    let reply = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(reply.as_bytes());
    let _ = stream.shutdown(Shutdown::Both);
}
