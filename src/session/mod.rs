//! Interactive session loop
//!
//! Reads a line, lets the interpreter handle it, and renders any text it
//! hands back. Failures inside one iteration are reported and the loop
//! carries on; only quit, Ctrl-C, or end of input stop it.

pub mod render;

pub use render::{prepare_scratch_dir, RenderPipeline, RenderResult};

use crate::input::{CommandInterpreter, LineEvent, LineSource};
use crate::state::SessionState;
use crate::Result;
use log::{debug, error, info};
use std::io::Write;

/// Default prompt
pub const PROMPT: &str = "👄";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct SessionLoop<I: LineSource, W: Write> {
    input: I,
    interpreter: CommandInterpreter<W>,
    pipeline: RenderPipeline,
    state: SessionState,
    loop_state: LoopState,
    prompt: String,
    /// Results of the most recent utterance, if it rendered
    last_render: Option<RenderResult>,
}

impl<I: LineSource, W: Write> SessionLoop<I, W> {
    pub fn new(
        input: I,
        out: W,
        pipeline: RenderPipeline,
        state: SessionState,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            input,
            interpreter: CommandInterpreter::new(out),
            pipeline,
            state,
            loop_state: LoopState::Running,
            prompt: prompt.into(),
            last_render: None,
        }
    }

    /// Run until stopped
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.interpreter.output_mut(), "Type help for help")?;
        info!("Session started");

        while self.loop_state == LoopState::Running {
            self.step()?;
        }
        Ok(())
    }

    /// Handle one line of input
    pub fn step(&mut self) -> Result<LoopState> {
        match self.input.read_line(&self.prompt) {
            Ok(LineEvent::Line(line)) => {
                debug!("Got input: {:?}", line);
                let text = self
                    .interpreter
                    .process(&line, &mut self.state, self.pipeline.generator_mut());
                if let Some(text) = text {
                    self.speak(&text)?;
                }
                if self.interpreter.quit_requested() {
                    self.stop()?;
                }
            }
            Ok(LineEvent::Interrupted) => {
                debug!("Interrupted");
                self.stop()?;
            }
            Ok(LineEvent::Eof) => {
                debug!("End of input");
                self.stop()?;
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                self.stop()?;
            }
        }
        Ok(self.loop_state)
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        match self.pipeline.render(&mut self.state, text) {
            Ok(result) => {
                debug!(
                    "Rendered {} -> {:?}",
                    result.raw_file_path.display(),
                    result.resynth_file_paths()
                );
                self.last_render = Some(result);
            }
            Err(e) => {
                error!("Render failed: {}", e);
                writeln!(self.interpreter.output_mut(), "Error: {}", e)?;
                self.last_render = None;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        writeln!(self.interpreter.output_mut(), "Exit Robop...")?;
        self.loop_state = LoopState::Stopped;
        Ok(())
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn last_render(&self) -> Option<&RenderResult> {
        self.last_render.as_ref()
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }
}
