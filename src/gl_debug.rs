//! Graphics-API fault probe.
//!
//! The runtime never owns a GL context; the rendering subsystem hands it a
//! queue of pending error codes to drain.  Any pending error is a
//! programming fault, so [`check`] terminates the process after logging
//! every entry with a readable translation.  Like the trace channel, the
//! probe only runs in debug builds.

use std::process;

use crate::diag;
use crate::error::EXIT_GRAPHICS_FAULT;

const GL_INVALID_ENUM: u32 = 0x0500;
const GL_INVALID_VALUE: u32 = 0x0501;
const GL_INVALID_OPERATION: u32 = 0x0502;
const GL_STACK_OVERFLOW: u32 = 0x0503;
const GL_STACK_UNDERFLOW: u32 = 0x0504;
const GL_OUT_OF_MEMORY: u32 = 0x0505;
const GL_INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;

const GL_FRAMEBUFFER_COMPLETE: u32 = 0x8CD5;
const GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT: u32 = 0x8CD6;
const GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT: u32 = 0x8CD7;
const GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER: u32 = 0x8CDB;
const GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER: u32 = 0x8CDC;
const GL_FRAMEBUFFER_UNSUPPORTED: u32 = 0x8CDD;
const GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE: u32 = 0x8D56;
const GL_FRAMEBUFFER_UNDEFINED: u32 = 0x8219;

/// Source of pending graphics errors, in the shape of `glGetError`:
/// repeated polling yields queued codes until the queue is empty.
pub trait ErrorQueue {
    fn poll_error(&mut self) -> Option<u32>;
}

/// Human-readable name for a GL error code.
pub fn error_string(code: u32) -> &'static str {
    match code {
        GL_INVALID_ENUM => "GL_INVALID_ENUM",
        GL_INVALID_VALUE => "GL_INVALID_VALUE",
        GL_INVALID_OPERATION => "GL_INVALID_OPERATION",
        GL_STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        GL_STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        GL_OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        GL_INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown GL error",
    }
}

/// Human-readable name for a framebuffer completeness status.
pub fn framebuffer_status_string(status: u32) -> &'static str {
    match status {
        GL_FRAMEBUFFER_COMPLETE => "GL_FRAMEBUFFER_COMPLETE",
        GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
        GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT"
        }
        GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER",
        GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER",
        GL_FRAMEBUFFER_UNSUPPORTED => "GL_FRAMEBUFFER_UNSUPPORTED",
        GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
        GL_FRAMEBUFFER_UNDEFINED => "GL_FRAMEBUFFER_UNDEFINED",
        _ => "unknown framebuffer status",
    }
}

/// Drains the queue, logging each pending error.  Returns how many were
/// found so callers can decide severity.
pub fn drain(queue: &mut dyn ErrorQueue, op: &str) -> usize {
    let mut found = 0;
    while let Some(code) = queue.poll_error() {
        diag::alert(
            op,
            format_args!("[ERROR] [OpenGL] 0x{code:04X} {}", error_string(code)),
        );
        found += 1;
    }
    found
}

/// Drains the queue and terminates the process if anything was pending.
/// No-op in release builds, like the rest of the trace channel.
pub fn check(queue: &mut dyn ErrorQueue, op: &str) {
    if !diag::enabled() {
        return;
    }
    if drain(queue, op) > 0 {
        process::exit(EXIT_GRAPHICS_FAULT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::capture;
    use std::collections::VecDeque;

    struct MockQueue {
        pending: VecDeque<u32>,
    }

    impl MockQueue {
        fn new(codes: &[u32]) -> Self {
            Self {
                pending: codes.iter().copied().collect(),
            }
        }
    }

    impl ErrorQueue for MockQueue {
        fn poll_error(&mut self) -> Option<u32> {
            self.pending.pop_front()
        }
    }

    #[test]
    fn empty_queue_drains_without_logging() {
        let capture = capture::install();
        let mut queue = MockQueue::new(&[]);
        assert_eq!(drain(&mut queue, "render"), 0);
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn pending_errors_are_each_logged_with_a_translation() {
        let capture = capture::install();
        let mut queue = MockQueue::new(&[GL_INVALID_ENUM, GL_OUT_OF_MEMORY, 0xBEEF]);
        assert_eq!(drain(&mut queue, "render"), 3);
        let lines = capture.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("0x0500 GL_INVALID_ENUM"));
        assert!(lines[1].contains("0x0505 GL_OUT_OF_MEMORY"));
        assert!(lines[2].contains("unknown GL error"));
        // queue is left empty
        assert_eq!(drain(&mut queue, "render"), 0);
    }

    #[test]
    fn framebuffer_statuses_translate() {
        assert_eq!(
            framebuffer_status_string(GL_FRAMEBUFFER_COMPLETE),
            "GL_FRAMEBUFFER_COMPLETE"
        );
        assert_eq!(
            framebuffer_status_string(GL_FRAMEBUFFER_UNSUPPORTED),
            "GL_FRAMEBUFFER_UNSUPPORTED"
        );
        assert_eq!(framebuffer_status_string(0), "unknown framebuffer status");
    }
}
