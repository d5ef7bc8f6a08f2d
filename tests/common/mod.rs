//! Shared test harness for pipeline integration tests.
//!
//! Provides [`ScriptedRunner`], a command runner that replays canned
//! responses instead of spawning processes, plus helpers for stub tool
//! directories and configurations.

use framelift::config::Config;
use framelift_av::{CommandOutput, CommandRunner, CommandSpec, Error, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Command runner fed with a queue of responses, recording every command
/// it is asked to run. Commands beyond the scripted queue succeed with
/// empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<CommandOutput>>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with the given stdout.
    pub fn push_ok(&self, stdout: &str) {
        self.responses.lock().unwrap().push_back(Ok(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
    }

    /// Queue a failure response.
    pub fn push_fail(&self, program: &str, output: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::CommandFailed {
                program: program.to_string(),
                code: Some(1),
                output: output.to_string(),
            }));
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// File stems of the programs invoked, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|spec| {
                spec.program
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::default()))
    }
}

/// Command runner whose calls block until the release sender is used or
/// dropped. Signals on the entered channel when a command arrives, so a
/// test can wait for a run to be mid-flight.
pub struct BlockingRunner {
    entered_tx: Sender<()>,
    gate: Mutex<Receiver<()>>,
}

impl BlockingRunner {
    pub fn new() -> (Self, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = channel();
        let (release_tx, release_rx) = channel();
        let runner = Self {
            entered_tx,
            gate: Mutex::new(release_rx),
        };
        (runner, entered_rx, release_tx)
    }
}

impl CommandRunner for BlockingRunner {
    fn run(&self, _spec: &CommandSpec) -> Result<CommandOutput> {
        let _ = self.entered_tx.send(());
        let _ = self.gate.lock().unwrap().recv();
        Ok(CommandOutput {
            stdout: "30/1\n".to_string(),
            stderr: String::new(),
        })
    }
}

/// Create stub tool binaries and a model directory under `dir`.
pub fn stub_tools_dir(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    for name in ["ffmpeg", "ffprobe", "rife-ncnn-vulkan"] {
        std::fs::write(dir.join(exe_name(name)), b"").unwrap();
    }
    std::fs::create_dir_all(dir.join("rife-v4.6")).unwrap();
}

fn exe_name(base: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", base)
    } else {
        base.to_string()
    }
}

/// Config pointing at stub tools, with a dedicated output directory and a
/// fixed thread count so command arguments are deterministic.
pub fn test_config(tools_dir: &Path, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.tools.dir = Some(tools_dir.to_path_buf());
    config.output.dir = Some(output_dir.to_path_buf());
    config.interpolation.threads = 4;
    config
}
