use crate::prelude::{eprintln, println, *};
use codegen_core::download::DownloadArtifact;
use codegen_core::notice::{Action, Notice, NoticeKind};
use codegen_core::quality::{QualityBand, ValidationView};
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Passive renderer driven by the orchestrator
///
/// Implementations only display what they are told to. The one piece of state
/// they own is the displayed code, which is what gets validated.
pub trait Presenter {
    /// Show a transient status message
    fn notify(&self, notice: Notice);

    /// Toggle the loading indicator for an action
    fn set_busy(&self, action: Action, busy: bool);

    fn set_validate_enabled(&self, enabled: bool);

    fn show_generated_code(&self, code: &str);

    /// The code currently on screen, including any edit made outside the session
    fn displayed_code(&self) -> String;

    fn show_validation(&self, view: &ValidationView);

    fn clear_validation(&self);

    /// Trigger a local save of the artifact, returning where it was written
    fn save_file(&self, artifact: &DownloadArtifact) -> std::io::Result<PathBuf>;
}

#[derive(Default)]
struct DisplayState {
    displayed_code: String,
    validate_enabled: bool,
    validation: Option<ValidationView>,
    last_notice: Option<(Notice, Instant)>,
    spinner: Option<ProgressBar>,
}

/// Renders the session to the terminal
///
/// Code and validation results go to stdout, notices go to stderr. With
/// `quiet` set only notices are printed, which leaves stdout free for JSON.
pub struct TerminalPresenter {
    output_dir: PathBuf,
    quiet: bool,
    state: Mutex<DisplayState>,
}

impl TerminalPresenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            quiet: false,
            state: Mutex::new(DisplayState::default()),
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the displayed code without touching the session
    pub fn edit_displayed_code(&self, code: String) {
        self.state().displayed_code = code;
    }

    pub fn validate_enabled(&self) -> bool {
        self.state().validate_enabled
    }

    /// The last notice, if it has not expired yet
    pub fn visible_notice(&self) -> Option<Notice> {
        self.state()
            .last_notice
            .as_ref()
            .filter(|(notice, issued)| notice.is_visible_after(issued.elapsed()))
            .map(|(notice, _)| notice.clone())
    }

    /// Print whatever is currently on screen again
    pub fn redraw(&self) {
        let (code, validation) = {
            let state = self.state();
            (state.displayed_code.clone(), state.validation.clone())
        };

        if code.is_empty() {
            println!("{}", "No generated code yet.".yellow());
        } else {
            println!("{}", format_code(&code));
        }
        if let Some(view) = validation {
            println!("{}", format_validation(&view));
        }
    }
}

impl Presenter for TerminalPresenter {
    fn notify(&self, notice: Notice) {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Warning => Color::Yellow,
            NoticeKind::Error => Color::Red,
        };
        eprintln!("{}", notice.message.color(color).bold());

        self.state().last_notice = Some((notice, Instant::now()));
    }

    fn set_busy(&self, action: Action, busy: bool) {
        let mut state = self.state();

        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }

        if busy {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message(match action {
                Action::Generate => "Generating code...",
                Action::Validate => "Validating code...",
            });
            spinner.enable_steady_tick(Duration::from_millis(100));
            state.spinner = Some(spinner);
        }
    }

    fn set_validate_enabled(&self, enabled: bool) {
        self.state().validate_enabled = enabled;
    }

    fn show_generated_code(&self, code: &str) {
        self.state().displayed_code = code.to_string();

        if !self.quiet {
            println!("{}", format_code(code));
        }
    }

    fn displayed_code(&self) -> String {
        self.state().displayed_code.clone()
    }

    fn show_validation(&self, view: &ValidationView) {
        self.state().validation = Some(view.clone());

        if !self.quiet {
            println!("{}", format_validation(view));
        }
    }

    fn clear_validation(&self) {
        self.state().validation = None;
    }

    fn save_file(&self, artifact: &DownloadArtifact) -> std::io::Result<PathBuf> {
        // Only the final component of the server-provided name is used
        let filename = Path::new(&artifact.filename).file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("`{}` is not a file name", artifact.filename),
            )
        })?;

        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(filename);
        fs::write(&path, artifact.content.as_bytes())?;

        Ok(path)
    }
}

pub fn band_color(band: QualityBand) -> Color {
    match band {
        QualityBand::Good => Color::Green,
        QualityBand::Fair => Color::Blue,
        QualityBand::Weak => Color::Yellow,
        QualityBand::Poor => Color::Red,
    }
}

/// Render a percentage as a fixed-width bar
fn render_bar(width_percent: f64, cells: usize) -> String {
    let filled = ((width_percent / 100.0) * cells as f64).round() as usize;
    let filled = filled.min(cells);
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn format_code(code: &str) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", "GENERATED CODE".bright_cyan().bold()));
    result.push_str(&format!("{}\n\n", "=".repeat(80).bright_cyan()));
    result.push_str(code);
    result.push('\n');

    result
}

fn format_validation(view: &ValidationView) -> String {
    let mut result = String::new();
    let color = band_color(view.band);

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_yellow()));
    result.push_str(&format!("{}\n", "VALIDATION RESULTS".bright_yellow().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_yellow()));

    let mut table = new_table();
    table.add_row(prettytable::row![
        "CodeBLEU".green(),
        format!("{}", view.codebleu).color(color).bold()
    ]);
    table.add_row(prettytable::row![
        "Weighted n-gram".green(),
        view.weighted_ngram_match.to_string().bright_white()
    ]);
    table.add_row(prettytable::row![
        "Quality".green(),
        format!(" {} ", view.quality).on_color(color).black()
    ]);
    table.add_row(prettytable::row!["Band".green(), view.band.label().color(color)]);
    result.push_str(&format!("\n{}", table));

    result.push_str(&format!("\n{}\n", "Component scores".bright_white().bold()));
    for bar in &view.component_bars {
        result.push_str(&format!(
            "  {:<16} {} {}\n",
            bar.label.green(),
            render_bar(bar.width_percent, 20).color(color),
            bar.value.to_string().bright_white()
        ));
    }

    result.push_str(&format!("\n{}\n", "Recommendations".bright_white().bold()));
    if view.recommendations.is_empty() {
        result.push_str(&format!("  {}\n", "(none)".bright_black()));
    }
    for recommendation in &view.recommendations {
        result.push_str(&format!("  - {}\n", recommendation));
    }

    result
}
