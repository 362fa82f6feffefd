use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::direction::{presentation_for, Direction, Presentation};
use crate::feedback::Feedback;
use crate::input::TextInput;
use crate::platform::{Clipboard, FileSaver};
use crate::service::{ConversionError, ConversionRequest, ConversionService, ServiceReply};

pub const MSG_EMPTY_INPUT: &str = "Please enter input data";
pub const MSG_CONVERSION_FAILED: &str = "Conversion failed";
pub const MSG_NO_OUTPUT: &str = "No output data in response";
pub const MSG_CONVERTED: &str = "Conversion successful!";
pub const MSG_NOTHING_TO_COPY: &str = "No data to copy";
pub const MSG_COPIED: &str = "Copied!";
pub const MSG_COPY_FAILED: &str = "Copy failed";
pub const MSG_NOTHING_TO_DOWNLOAD: &str = "No data to download";
pub const MSG_DOWNLOADED: &str = "Downloaded!";
pub const MSG_DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Interpreted outcome of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Success {
        output: String,
        original_size: u64,
        output_size: u64,
        change_label: Option<String>,
    },
    Failure {
        message: String,
    },
}

/// Map whatever came back from the service onto a result the UI can show.
pub fn interpret_reply(
    direction: Direction,
    outcome: Result<ServiceReply, ConversionError>,
) -> ConversionResult {
    let reply = match outcome {
        Ok(reply) => reply,
        Err(e) => {
            return ConversionResult::Failure {
                message: format!("Error: {}", e),
            }
        }
    };

    match reply {
        ServiceReply::Rejected { error } => ConversionResult::Failure {
            message: error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| MSG_CONVERSION_FAILED.to_string()),
        },
        ServiceReply::Converted(body) => match body.output {
            Some(output) if !output.is_empty() => {
                let change_label = match direction {
                    Direction::JsonToStructuredText => body.reduction,
                    Direction::StructuredTextToJson => body.increase,
                };
                ConversionResult::Success {
                    output,
                    original_size: body.original_size.unwrap_or(0),
                    output_size: body.output_size.unwrap_or(0),
                    change_label,
                }
            }
            _ => ConversionResult::Failure {
                message: MSG_NO_OUTPUT.to_string(),
            },
        },
    }
}

pub fn format_stats(
    direction: Direction,
    original_size: u64,
    output_size: u64,
    change_label: Option<&str>,
) -> String {
    let mut stats = format!("From {} to {} characters", original_size, output_size);
    if let Some(change) = change_label {
        stats.push_str(&format!("\n{}: {}", presentation_for(direction).change_label, change));
    }
    stats
}

struct PendingConversion {
    direction: Direction,
    task: JoinHandle<Result<ServiceReply, ConversionError>>,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub output_scroll: u16,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    direction: Direction,
    input: TextInput,
    output: String,
    busy: bool,
    feedback: Feedback,
    pending: Option<PendingConversion>,

    service: Arc<dyn ConversionService>,
    clipboard: Box<dyn Clipboard>,
    saver: Box<dyn FileSaver>,
}

impl App {
    pub fn new(
        service: Arc<dyn ConversionService>,
        clipboard: Box<dyn Clipboard>,
        saver: Box<dyn FileSaver>,
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            output_scroll: 0,
            animation_frame: 0,

            direction: Direction::default(),
            input: TextInput::default(),
            output: String::new(),
            busy: false,
            feedback: Feedback::default(),
            pending: None,

            service,
            clipboard,
            saver,
        }
    }

    /// Start in a direction other than the default
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn presentation(&self) -> Presentation {
        presentation_for(self.direction)
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// The input buffer belongs to the user; key handling edits it directly
    pub fn input_mut(&mut self) -> &mut TextInput {
        &mut self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn toggle_direction(&mut self) {
        if self.busy {
            tracing::debug!("direction toggle ignored while a conversion is pending");
            return;
        }
        self.direction = self.direction.toggle();
        self.input.clear();
        self.output.clear();
        self.output_scroll = 0;
        self.feedback.clear_all();
        tracing::info!(direction = self.direction.as_str(), "direction changed");
    }

    /// Validate the input and move into the busy state.
    ///
    /// Returns the request to send, or `None` when nothing should be sent
    /// (already busy, or the input is blank).
    pub fn begin_submit(&mut self) -> Option<ConversionRequest> {
        if self.busy {
            return None;
        }

        let data = self.input.text().trim();
        if data.is_empty() {
            self.feedback.report_error(MSG_EMPTY_INPUT);
            return None;
        }
        let request = ConversionRequest {
            direction: self.direction,
            data: data.to_string(),
        };

        self.busy = true;
        self.feedback.clear_all();
        self.output.clear();
        self.output_scroll = 0;
        debug_assert!(self.feedback.is_empty());

        tracing::info!(direction = request.direction.as_str(), bytes = request.data.len(), "conversion started");
        Some(request)
    }

    /// Apply the outcome of a request and leave the busy state.
    pub fn settle(&mut self, direction: Direction, outcome: Result<ServiceReply, ConversionError>) {
        match interpret_reply(direction, outcome) {
            ConversionResult::Success {
                output,
                original_size,
                output_size,
                change_label,
            } => {
                tracing::info!(original_size, output_size, "conversion succeeded");
                self.feedback.set_stats(Some(format_stats(
                    direction,
                    original_size,
                    output_size,
                    change_label.as_deref(),
                )));
                self.output = output;
                self.feedback.report_success(MSG_CONVERTED);
            }
            ConversionResult::Failure { message } => {
                tracing::warn!(%message, "conversion failed");
                self.feedback.report_error(message);
            }
        }
        self.busy = false;
    }

    /// Run a whole conversion in place, waiting for the service.
    pub async fn submit(&mut self) {
        let Some(request) = self.begin_submit() else {
            return;
        };
        let outcome = self.service.convert(&request).await;
        self.settle(request.direction, outcome);
    }

    /// Start a conversion on a background task; `poll_conversion` settles it.
    pub fn spawn_submit(&mut self) {
        let Some(request) = self.begin_submit() else {
            return;
        };
        let direction = request.direction;
        let service = Arc::clone(&self.service);
        let task = tokio::spawn(async move { service.convert(&request).await });
        self.pending = Some(PendingConversion { direction, task });
    }

    /// Settle the background conversion if it has finished.
    pub async fn poll_conversion(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.task.is_finished());
        if !finished {
            return;
        }

        if let Some(pending) = self.pending.take() {
            let outcome = match pending.task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ConversionError::Task(e.to_string())),
            };
            self.settle(pending.direction, outcome);
        }
    }

    pub fn copy(&mut self) {
        if self.busy {
            return;
        }
        if self.output.is_empty() {
            self.feedback.report_error(MSG_NOTHING_TO_COPY);
            return;
        }
        match self.clipboard.write_text(&self.output) {
            Ok(()) => self.feedback.flash_success(MSG_COPIED, Instant::now()),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.feedback.report_error(MSG_COPY_FAILED);
            }
        }
    }

    pub fn download(&mut self) {
        if self.busy {
            return;
        }
        if self.output.is_empty() {
            self.feedback.report_error(MSG_NOTHING_TO_DOWNLOAD);
            return;
        }
        let file_name = format!("output.{}", self.presentation().file_extension);
        match self.saver.save(self.output.as_bytes(), &file_name) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "output saved");
                self.feedback.flash_success(MSG_DOWNLOADED, Instant::now());
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving output failed");
                self.feedback.report_error(MSG_DOWNLOAD_FAILED);
            }
        }
    }

    pub fn load_example(&mut self) {
        self.input.set(self.presentation().example_content);
        self.feedback.clear_error();
        self.feedback.clear_success();
    }

    pub fn clear_all(&mut self) {
        self.input.clear();
        self.output.clear();
        self.output_scroll = 0;
        self.feedback.clear_all();
    }

    pub fn scroll_output_down(&mut self) {
        let max = u16::try_from(self.output.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
        self.output_scroll = self.output_scroll.saturating_add(1).min(max);
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    /// Called on every Tick event
    pub fn tick(&mut self, now: Instant) {
        self.feedback.expire(now);
        if self.busy {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
