pub mod gemini;
pub mod whisper;

/// Base URL of a local port that was just released, so connecting to it is refused.
#[cfg(test)]
pub(crate) fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
