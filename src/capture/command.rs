use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::capture::{CaptureError, CaptureEvent, SpeechCaptureAdapter};

/// Runs an external speech-to-text program and treats every non-empty line it
/// prints as a finalized transcript chunk.
pub struct CommandCapture {
    argv: Vec<String>,
    child: Option<Arc<Mutex<Child>>>,
    stopping: Arc<AtomicBool>,
}

impl CommandCapture {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            child: None,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SpeechCaptureAdapter for CommandCapture {
    fn is_available(&self) -> bool {
        !self.argv.is_empty()
    }

    fn start(&mut self, sink: Sender<CaptureEvent>) -> Result<(), CaptureError> {
        let (program, args) = self.argv.split_first().ok_or(CaptureError::Unavailable)?;
        if let Some(child) = &self.child {
            let finished = child
                .lock()
                .map(|mut c| matches!(c.try_wait(), Ok(Some(_))))
                .unwrap_or(true);
            if !finished {
                return Err(CaptureError::AlreadyRunning);
            }
            self.child = None;
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdout = child.stdout.take().ok_or(CaptureError::Unavailable)?;
        info!("speech capture started: {program}");

        let child = Arc::new(Mutex::new(child));
        let stopping = Arc::new(AtomicBool::new(false));
        self.child = Some(Arc::clone(&child));
        self.stopping = Arc::clone(&stopping);

        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if sink.send(CaptureEvent::Chunk(line.to_string())).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = sink.send(CaptureEvent::Error(e.to_string()));
                        return;
                    }
                }
            }

            // Poll rather than wait() so stop() never blocks on the lock.
            let status = loop {
                match child.lock() {
                    Ok(mut c) => match c.try_wait() {
                        Ok(Some(status)) => break Some(status),
                        Ok(None) => {}
                        Err(_) => break None,
                    },
                    Err(_) => break None,
                }
                thread::sleep(Duration::from_millis(20));
            };
            if stopping.load(Ordering::SeqCst) {
                let _ = sink.send(CaptureEvent::Ended);
                return;
            }
            match status {
                Some(status) if status.success() => {
                    let _ = sink.send(CaptureEvent::Ended);
                }
                Some(status) => {
                    let _ = sink.send(CaptureEvent::Error(format!(
                        "capture command exited with {status}"
                    )));
                }
                None => {
                    let _ = sink.send(CaptureEvent::Error(
                        "capture command could not be reaped".to_string(),
                    ));
                }
            }
        });

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(child) = self.child.take() {
            self.stopping.store(true, Ordering::SeqCst);
            match child.lock() {
                Ok(mut c) => {
                    if let Err(e) = c.kill() {
                        debug!("capture command already exited: {e}");
                    }
                }
                Err(_) => warn!("capture process handle poisoned"),
            }
        }
    }
}

impl Drop for CommandCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn empty_argv_is_unavailable() {
        let (tx, _rx) = mpsc::channel();
        let mut capture = CommandCapture::new(Vec::new());
        assert!(!capture.is_available());
        assert!(matches!(capture.start(tx), Err(CaptureError::Unavailable)));
    }

    #[test]
    fn missing_program_fails_to_start() {
        let (tx, _rx) = mpsc::channel();
        let mut capture = CommandCapture::new(vec!["voice2career-no-such-binary".to_string()]);
        assert!(matches!(capture.start(tx), Err(CaptureError::Start(_))));
    }

    #[cfg(unix)]
    #[test]
    fn stdout_lines_become_chunks_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut capture = CommandCapture::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "printf 'first part\\n\\nsecond part\\n'".to_string(),
        ]);
        capture.start(tx).unwrap();

        let mut events = Vec::new();
        while let Ok(ev) = rx.recv_timeout(Duration::from_secs(5)) {
            let done = ev == CaptureEvent::Ended;
            events.push(ev);
            if done {
                break;
            }
        }
        assert_eq!(
            events,
            vec![
                CaptureEvent::Chunk("first part".to_string()),
                CaptureEvent::Chunk("second part".to_string()),
                CaptureEvent::Ended,
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_error() {
        let (tx, rx) = mpsc::channel();
        let mut capture =
            CommandCapture::new(vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()]);
        capture.start(tx).unwrap();
        let ev = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(ev, CaptureEvent::Error(_)));
    }
}
