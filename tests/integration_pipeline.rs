//! Pipeline integration tests
//!
//! Drives the orchestrator against scripted command runners and verifies
//! the exact subprocess sequence, scratch cleanup, and the event stream.

mod common;

use assert_matches::assert_matches;
use common::{BlockingRunner, ScriptedRunner};
use framelift::config::Config;
use framelift::pipeline::{OutputMode, PipelineOrchestrator, PipelineRequest};
use framelift::state::{
    EventSink, PipelineEvent, PipelineState, RunOutcome, Stage, StepStatus,
};
use framelift_av::actions::video_codec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc::UnboundedReceiver;

/// Stub tools, an output directory, and a fake input video in one tempdir.
fn setup() -> (TempDir, Config, PathBuf) {
    let temp = tempdir().unwrap();
    let tools = temp.path().join("tools");
    let output = temp.path().join("output");
    common::stub_tools_dir(&tools);
    std::fs::create_dir_all(&output).unwrap();
    let config = common::test_config(&tools, &output);

    let input = temp.path().join("clip.mp4");
    std::fs::write(&input, b"fake video").unwrap();

    (temp, config, input)
}

fn drain(mut rx: UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn fold(events: &[PipelineEvent]) -> PipelineState {
    let mut state = PipelineState::default();
    for event in events {
        state.apply(event);
    }
    state
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn leftover_work_dirs(output_root: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(output_root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("work_"))
        .map(|e| e.path())
        .collect()
}

/// Doubling a 30 fps clip runs probe, audio, frames, interpolation, and
/// remux with the exact expected arguments, then removes the scratch space.
#[test]
fn test_double_rate_runs_expected_commands() {
    let (_temp, config, input) = setup();
    let tools_dir = config.tools.dir.clone().unwrap();
    let output_root = config.output.dir.clone().unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    runner.push_ok("30/1\n");

    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());

    let output = orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::DoubleRate))
        .unwrap();

    assert_eq!(output, output_root.join("clip_60fps.mp4"));
    assert_eq!(
        runner.programs(),
        ["ffprobe", "ffmpeg", "ffmpeg", "rife-ncnn-vulkan", "ffmpeg"]
    );

    let calls = runner.calls();
    let input_str = path_str(&input);

    assert_eq!(
        calls[0].args,
        [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=r_frame_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            input_str.as_str(),
        ]
    );

    // The audio extraction reveals the timestamped scratch root.
    let audio_path = PathBuf::from(&calls[1].args[6]);
    let work_root = audio_path.parent().unwrap().to_path_buf();
    assert!(work_root
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("work_clip_"));
    assert!(work_root.starts_with(&output_root));

    let audio_str = path_str(&audio_path);
    assert_eq!(
        calls[1].args,
        [
            "-y",
            "-i",
            input_str.as_str(),
            "-vn",
            "-c:a",
            "copy",
            audio_str.as_str(),
        ]
    );

    let in_pattern = path_str(&work_root.join("in").join("%08d.jpg"));
    assert_eq!(
        calls[2].args,
        [
            "-y",
            "-i",
            input_str.as_str(),
            "-q:v",
            "2",
            in_pattern.as_str(),
        ]
    );

    let in_dir = path_str(&work_root.join("in"));
    let out_dir = path_str(&work_root.join("out"));
    let model_dir = path_str(&tools_dir.join("rife-v4.6"));
    assert_eq!(
        calls[3].args,
        [
            "-i",
            in_dir.as_str(),
            "-o",
            out_dir.as_str(),
            "-j",
            "4:2:2",
            "-m",
            model_dir.as_str(),
        ]
    );

    // Doubling remuxes straight from the interpolator output.
    let out_pattern = path_str(&work_root.join("out").join("%08d.png"));
    let output_str = path_str(&output);
    assert_eq!(
        calls[4].args,
        [
            "-y",
            "-framerate",
            "60",
            "-i",
            out_pattern.as_str(),
            "-i",
            audio_str.as_str(),
            "-c:v",
            video_codec(),
            "-b:v",
            "15M",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "copy",
            "-shortest",
            output_str.as_str(),
        ]
    );

    assert!(leftover_work_dirs(&output_root).is_empty());

    let events = drain(rx);
    assert!(events.iter().any(|e| matches!(
        e,
        PipelineEvent::Progress { message, .. } if message == "Frame rate: 30 -> 60"
    )));

    let state = fold(&events);
    assert_eq!(state.progress, 100.0);
    assert!(state.is_terminal());
    assert_eq!(state.stage_status(Stage::Remux), StepStatus::Completed);
    assert_eq!(
        state.stage_status(Stage::SecondaryInterpolate),
        StepStatus::Pending
    );
    assert_matches!(state.outcome, Some(RunOutcome::Finished { .. }));
}

/// Raising 24 fps to a fixed 60 needs the second interpolation pass: an
/// intermediate 48 fps encode, the motion filter, and a remux from out60.
#[test]
fn test_fixed60_adds_secondary_pass() {
    let (_temp, config, input) = setup();
    let output_root = config.output.dir.clone().unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    runner.push_ok("24/1\n");

    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());

    let output = orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::Fixed60))
        .unwrap();

    assert_eq!(output, output_root.join("clip_60fps.mp4"));
    assert_eq!(
        runner.programs(),
        [
            "ffprobe",
            "ffmpeg",
            "ffmpeg",
            "rife-ncnn-vulkan",
            "ffmpeg",
            "ffmpeg",
            "ffmpeg"
        ]
    );

    let calls = runner.calls();
    let audio_path = PathBuf::from(&calls[1].args[6]);
    let work_root = audio_path.parent().unwrap().to_path_buf();

    // Intermediate clip is encoded at double the source rate.
    let out_pattern = path_str(&work_root.join("out").join("%08d.png"));
    assert_eq!(calls[4].args[0..3], ["-y", "-framerate", "48"]);
    assert_eq!(calls[4].args[4], out_pattern);

    let clip_str = path_str(&work_root.join("temp_rife.mp4"));
    assert_eq!(*calls[4].args.last().unwrap(), clip_str);

    let out60_pattern = path_str(&work_root.join("out60").join("%08d.png"));
    assert_eq!(
        calls[5].args,
        [
            "-y",
            "-i",
            clip_str.as_str(),
            "-filter:v",
            "minterpolate=fps=60:mi_mode=mci:mc_mode=aobmc:me_mode=bidir_ref:vsbmc=1",
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-crf",
            "18",
            "-pix_fmt",
            "yuv420p",
            out60_pattern.as_str(),
        ]
    );

    // Final remux pulls the re-timed 60 fps frames.
    assert_eq!(calls[6].args[0..3], ["-y", "-framerate", "60"]);
    assert_eq!(calls[6].args[4], out60_pattern);

    assert!(leftover_work_dirs(&output_root).is_empty());

    let state = fold(&drain(rx));
    assert_eq!(
        state.stage_status(Stage::SecondaryInterpolate),
        StepStatus::Completed
    );
    assert_matches!(state.outcome, Some(RunOutcome::Finished { .. }));
}

/// A 20 fps source divides 60 exactly, so fixed-60 skips the second pass.
#[test]
fn test_fixed60_integer_ratio_skips_secondary() {
    let (_temp, config, input) = setup();

    let runner = Arc::new(ScriptedRunner::new());
    runner.push_ok("20/1\n");

    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());

    orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::Fixed60))
        .unwrap();

    assert_eq!(runner.call_count(), 5);
    let state = fold(&drain(rx));
    assert_eq!(
        state.stage_status(Stage::SecondaryInterpolate),
        StepStatus::Pending
    );
}

struct FailingRun {
    _temp: TempDir,
    result: anyhow::Result<PathBuf>,
    events: Vec<PipelineEvent>,
    output_root: PathBuf,
    call_count: usize,
}

/// Run a fixed-60 pipeline on a 24 fps source with the command at
/// `fail_index` scripted to fail.
fn run_failing_at(fail_index: usize) -> FailingRun {
    let temp = tempdir().unwrap();
    let tools = temp.path().join("tools");
    let output_root = temp.path().join("output");
    common::stub_tools_dir(&tools);
    std::fs::create_dir_all(&output_root).unwrap();
    let config = common::test_config(&tools, &output_root);

    let input = temp.path().join("clip.mp4");
    std::fs::write(&input, b"fake video").unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    for i in 0..fail_index {
        if i == 0 {
            runner.push_ok("24/1\n");
        } else {
            runner.push_ok("");
        }
    }
    runner.push_fail("tool", "boom");

    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());
    let result = orchestrator.run(&PipelineRequest::new(&input, OutputMode::Fixed60));
    let call_count = runner.call_count();

    FailingRun {
        _temp: temp,
        result,
        events: drain(rx),
        output_root,
        call_count,
    }
}

/// Whichever command fails, the run stops there, marks the right stage,
/// emits a Failed event, and leaves no scratch directory behind.
#[test]
fn test_failure_at_any_command_cleans_up() {
    let expected = [
        (0, Stage::RateProbe),
        (1, Stage::AudioExtract),
        (2, Stage::FrameExtract),
        (3, Stage::Interpolate),
        (4, Stage::SecondaryInterpolate),
        (5, Stage::SecondaryInterpolate),
        (6, Stage::Remux),
    ];

    for (fail_index, stage) in expected {
        let run = run_failing_at(fail_index);

        assert!(run.result.is_err(), "call {} should fail the run", fail_index);
        assert_eq!(run.call_count, fail_index + 1, "failing call {}", fail_index);

        let state = fold(&run.events);
        assert_eq!(
            state.stage_status(stage),
            StepStatus::Error,
            "failing call {}",
            fail_index
        );
        assert_matches!(state.outcome, Some(RunOutcome::Failed { .. }));

        assert!(
            leftover_work_dirs(&run.output_root).is_empty(),
            "scratch left behind for failing call {}",
            fail_index
        );
    }
}

/// A missing model directory aborts the run before any subprocess spawns.
#[test]
fn test_missing_model_aborts_before_any_command() {
    let (_temp, config, input) = setup();
    let tools_dir = config.tools.dir.clone().unwrap();
    std::fs::remove_dir(tools_dir.join("rife-v4.6")).unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());

    let err = orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::DoubleRate))
        .unwrap_err();

    assert_eq!(runner.call_count(), 0);
    assert_matches!(
        err.downcast_ref::<framelift_av::Error>(),
        Some(framelift_av::Error::ToolNotFound {
            tool: framelift_av::Tool::RifeModel
        })
    );

    let state = fold(&drain(rx));
    assert_eq!(
        state.stage_status(Stage::DependencyCheck),
        StepStatus::Error
    );
    assert_matches!(state.outcome, Some(RunOutcome::Failed { .. }));
}

/// A second run on a busy orchestrator is rejected without emitting events,
/// and the first run is unaffected.
#[test]
fn test_second_run_rejected_while_busy() {
    let (_temp, config, input) = setup();

    let (runner, entered_rx, release_tx) = BlockingRunner::new();
    let (events, rx) = EventSink::channel();
    let orchestrator =
        PipelineOrchestrator::with_runner(Arc::new(config), events, Arc::new(runner));

    let worker = {
        let orchestrator = orchestrator.clone();
        let request = PipelineRequest::new(&input, OutputMode::DoubleRate);
        std::thread::spawn(move || orchestrator.run(&request))
    };

    // Wait until the first run is inside its probe command.
    entered_rx.recv().unwrap();

    let err = orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::DoubleRate))
        .unwrap_err();
    assert!(err.to_string().contains("already active"));

    drop(release_tx);
    worker.join().unwrap().unwrap();

    // Only the first run reported anything.
    let events = drain(rx);
    let finished = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Finished { .. }))
        .count();
    let failed = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Failed { .. }))
        .count();
    assert_eq!(finished, 1);
    assert_eq!(failed, 0);

    let state = fold(&events);
    assert!(state.stages.iter().all(|s| s.status != StepStatus::Error));
}

/// Missing input is caught before dependency checks or subprocess calls.
#[test]
fn test_missing_input_fails_fast() {
    let (_temp, config, input) = setup();
    std::fs::remove_file(&input).unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    let (events, rx) = EventSink::channel();
    let orchestrator = PipelineOrchestrator::with_runner(Arc::new(config), events, runner.clone());

    let err = orchestrator
        .run(&PipelineRequest::new(&input, OutputMode::DoubleRate))
        .unwrap_err();

    assert!(err.to_string().contains("does not exist"));
    assert_eq!(runner.call_count(), 0);

    let state = fold(&drain(rx));
    assert_eq!(
        state.stage_status(Stage::DependencyCheck),
        StepStatus::Pending
    );
    assert_matches!(state.outcome, Some(RunOutcome::Failed { .. }));
}
