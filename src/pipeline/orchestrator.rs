use crate::config::Config;
use crate::pipeline::plan::{PipelineRequest, TargetPlan};
use crate::state::{EventSink, PipelineEvent, Stage, StepStatus};
use anyhow::{Context, Result};
use framelift_av::actions;
use framelift_av::command::{CommandRunner, SystemRunner};
use framelift_av::workspace::WorkDirectory;
use framelift_av::{probe, threads};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Drives one pipeline run from input file to finished video.
///
/// All subprocess work is synchronous; callers run the pipeline on a
/// blocking task and watch the event stream for progress.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    config: Arc<Config>,
    runner: Arc<dyn CommandRunner>,
    events: EventSink,
    busy: Arc<AtomicBool>,
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PipelineOrchestrator {
    pub fn new(config: Arc<Config>, events: EventSink) -> Self {
        Self::with_runner(config, events, Arc::new(SystemRunner))
    }

    /// Build an orchestrator with a custom command runner.
    pub fn with_runner(
        config: Arc<Config>,
        events: EventSink,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            runner,
            events,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Execute a full run, emitting events along the way.
    ///
    /// Only one run may be active at a time; a second call while busy
    /// fails immediately without emitting anything.
    pub fn run(&self, request: &PipelineRequest) -> Result<PathBuf> {
        if self.busy.swap(true, Ordering::SeqCst) {
            anyhow::bail!("A pipeline run is already active");
        }
        let _guard = BusyGuard(Arc::clone(&self.busy));

        match self.execute(request) {
            Ok(output) => {
                self.events.emit(PipelineEvent::finished(output.clone()));
                Ok(output)
            }
            Err(e) => {
                tracing::error!("Pipeline failed: {:#}", e);
                self.events.emit(PipelineEvent::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn report_progress(&self, progress: f32, step: &str) {
        tracing::info!("[{:.0}%] {}", progress, step);
        self.events.progress(progress, step);
    }

    fn stage<T>(&self, stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.events.stage(stage, StepStatus::Running);
        match f() {
            Ok(value) => {
                self.events.stage(stage, StepStatus::Completed);
                Ok(value)
            }
            Err(e) => {
                self.events.stage(stage, StepStatus::Error);
                Err(e)
            }
        }
    }

    fn execute(&self, request: &PipelineRequest) -> Result<PathBuf> {
        let input = request.input.as_path();
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {:?}", input);
        }
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Input file has no usable name: {:?}", input))?;

        let binaries = self.stage(Stage::DependencyCheck, || {
            Ok(self.config.tool_resolver().resolve()?)
        })?;

        let output_root = self.config.output_dir()?;
        std::fs::create_dir_all(&output_root)
            .with_context(|| format!("Failed to create output directory: {:?}", output_root))?;

        // Scratch space is removed when `work` drops, on any exit path.
        let work = self.stage(Stage::WorkspacePrepare, || {
            Ok(WorkDirectory::create(&output_root, input)?)
        })?;

        self.report_progress(10.0, "Probing frame rate...");
        let fps_origin = self.stage(Stage::RateProbe, || {
            Ok(probe::frame_rate(self.runner.as_ref(), &binaries.ffprobe, input)?)
        })?;

        let plan = self.stage(Stage::TargetCompute, || {
            Ok(TargetPlan::compute(fps_origin, request.mode))
        })?;
        self.report_progress(
            20.0,
            &format!("Frame rate: {:.0} -> {:.0}", plan.fps_origin, plan.fps_target),
        );

        let audio_path = work.file("audio.m4a");
        self.report_progress(30.0, "Extracting audio...");
        self.stage(Stage::AudioExtract, || {
            let spec = actions::extract_audio_spec(&binaries.ffmpeg, input, &audio_path);
            self.runner.run(&spec)?;
            Ok(())
        })?;

        self.report_progress(40.0, "Extracting frames...");
        self.stage(Stage::FrameExtract, || {
            let spec = actions::extract_frames_spec(&binaries.ffmpeg, input, &work.frames_in());
            self.runner.run(&spec)?;
            Ok(())
        })?;

        self.report_progress(60.0, "AI interpolation (this may take a few minutes)...");
        let thread_count = match self.config.interpolation.threads {
            0 => threads::interpolation_threads(num_cpus::get()),
            n => n,
        };
        self.stage(Stage::Interpolate, || {
            let spec = actions::interpolate_spec(
                &binaries.rife,
                &binaries.rife_model,
                &work.frames_in(),
                &work.frames_out(),
                thread_count,
            );
            self.runner.run(&spec)?;
            Ok(())
        })?;

        let frames_dir = if plan.needs_secondary {
            self.report_progress(70.0, "Raising frame rate to 60 fps...");
            self.stage(Stage::SecondaryInterpolate, || {
                let clip = work.file("temp_rife.mp4");
                let spec = actions::intermediate_encode_spec(
                    &binaries.ffmpeg,
                    plan.fps_origin * 2.0,
                    &work.frames_out(),
                    &clip,
                );
                self.runner.run(&spec)?;

                let out60 = work.frames_out60()?;
                let spec = actions::minterpolate_spec(&binaries.ffmpeg, &clip, &out60);
                self.runner.run(&spec)?;
                Ok(out60)
            })?
        } else {
            work.frames_out()
        };

        self.report_progress(80.0, "Encoding final video...");
        let output = output_root.join(actions::output_file_name(&stem, plan.fps_target));
        self.stage(Stage::Remux, || {
            let spec = actions::remux_spec(
                &binaries.ffmpeg,
                plan.fps_target,
                &frames_dir,
                &audio_path,
                &self.config.encode.video_bitrate,
                &output,
            );
            self.runner.run(&spec)?;
            Ok(())
        })?;

        self.report_progress(100.0, "Processing complete");

        Ok(output)
    }
}
