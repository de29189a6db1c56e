// LineTransport - capability interface for the line-oriented text link
//
// The core never touches a serial port directly; it only polls for complete
// input lines and sends response/telemetry lines. The queue-backed transport
// serves the CLI harness and tests.

use std::collections::VecDeque;

/// Capability for line-oriented text I/O
pub trait LineTransport {
    /// Poll for one complete buffered input line, without blocking
    fn poll_line(&mut self) -> Option<String>;

    /// Send one line to the peer
    fn send_line(&mut self, line: &str);
}

/// In-memory transport: a queue of scripted input lines and a log of output
#[derive(Debug, Default)]
pub struct QueueTransport {
    incoming: VecDeque<String>,
    outgoing: Vec<String>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one input line for the engine to read
    pub fn push_line<L: Into<String>>(&mut self, line: L) {
        self.incoming.push_back(line.into());
    }

    /// Input lines still waiting to be read
    pub fn pending_input(&self) -> usize {
        self.incoming.len()
    }

    /// All lines the engine has sent so far
    pub fn sent_lines(&self) -> &[String] {
        &self.outgoing
    }

    /// Drain and return the lines the engine has sent
    pub fn take_sent_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }
}

impl LineTransport for QueueTransport {
    fn poll_line(&mut self) -> Option<String> {
        self.incoming.pop_front()
    }

    fn send_line(&mut self, line: &str) {
        self.outgoing.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_transport_fifo() {
        let mut transport = QueueTransport::new();
        transport.push_line("R");
        transport.push_line("SNAP");

        assert_eq!(transport.pending_input(), 2);
        assert_eq!(transport.poll_line().as_deref(), Some("R"));
        assert_eq!(transport.poll_line().as_deref(), Some("SNAP"));
        assert_eq!(transport.poll_line(), None);
    }

    #[test]
    fn test_queue_transport_collects_output() {
        let mut transport = QueueTransport::new();
        transport.send_line("CSVTEST:READY");
        transport.send_line("ROW:1 OK");

        assert_eq!(transport.sent_lines().len(), 2);
        let sent = transport.take_sent_lines();
        assert_eq!(sent, vec!["CSVTEST:READY", "ROW:1 OK"]);
        assert!(transport.sent_lines().is_empty());
    }
}
