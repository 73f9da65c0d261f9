use std::io::{self, Write};

use uploader_core::{AppViewModel, PhaseKind, SaveOutcome};
use uploader_logging::uploader_trace;

/// Presentation side of the controller: whatever shows the view model and
/// hosts the drop surface and file picker.
pub(crate) trait InteractionSurface {
    fn show(&mut self, lines: &[String]);
    fn notify(&mut self, text: &str);
    fn open_file_picker(&mut self);
    fn suppress_default_action(&mut self);
}

pub(crate) struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSurface<W> {
    #[cfg(test)]
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout leaves nothing to report to.
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl<W: Write> InteractionSurface for TerminalSurface<W> {
    fn show(&mut self, lines: &[String]) {
        for line in lines {
            self.write_line(line);
        }
    }

    fn notify(&mut self, text: &str) {
        self.write_line(text);
    }

    fn open_file_picker(&mut self) {
        let _ = write!(self.out, "Select file(s) (blank line cancels): ");
        let _ = self.out.flush();
    }

    fn suppress_default_action(&mut self) {
        // Nothing would open a dropped file here; the call marks where a
        // graphical surface must prevent it.
        uploader_trace!("default drag/drop action suppressed");
    }
}

/// Renders the view model as the lines a terminal shows.
pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let surface = if view.drop_highlighted {
        "[ Drop surface: release to drop ]"
    } else {
        "[ Drop surface: click (open) or drag a PDF here ]"
    };
    lines.push(surface.to_string());

    if let Some(file) = &view.file {
        lines.push(format!("File: {} ({})", file.name, file.size_text));
    }

    let convert = if view.submit_enabled {
        "enabled"
    } else {
        "disabled"
    };
    lines.push(format!("Convert: {convert}"));

    if !view.status_text.is_empty() {
        let spinner = if view.busy { " [working]" } else { "" };
        lines.push(format!("Status: {}{}", view.status_text, spinner));
    }

    if view.result_visible {
        if let Some(download) = &view.download {
            lines.push(format!("Download: {} <{}>", download.name, download.url));
        }
    }
    if view.error_visible {
        lines.push(format!("Error: {}", view.error_text));
    }

    match &view.save_outcome {
        Some(SaveOutcome::Saved(path)) => lines.push(format!("Saved to {}", path.display())),
        Some(SaveOutcome::Failed(message)) => lines.push(format!("Save failed: {message}")),
        None => {}
    }

    if view.phase == PhaseKind::Idle {
        lines.push("Type `help` for commands.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uploader_core::{DownloadLinkView, FileInfoView};

    #[test]
    fn idle_view_shows_disabled_convert() {
        let lines = render(&AppViewModel::default());

        assert_eq!(
            lines,
            vec![
                "[ Drop surface: click (open) or drag a PDF here ]".to_string(),
                "Convert: disabled".to_string(),
                "Type `help` for commands.".to_string(),
            ]
        );
    }

    #[test]
    fn success_view_shows_download_link() {
        let view = AppViewModel {
            phase: PhaseKind::Success,
            file: Some(FileInfoView {
                name: "scan.pdf".to_string(),
                size_text: "2.00 MB".to_string(),
            }),
            submit_enabled: true,
            status_text: "Conversion complete.".to_string(),
            result_visible: true,
            download: Some(DownloadLinkView {
                name: "output.xlsx".to_string(),
                url: "file:///tmp/x/output.xlsx".to_string(),
            }),
            ..AppViewModel::default()
        };

        let lines = render(&view);

        assert!(lines.contains(&"File: scan.pdf (2.00 MB)".to_string()));
        assert!(lines.contains(&"Status: Conversion complete.".to_string()));
        assert!(lines.contains(&"Download: output.xlsx <file:///tmp/x/output.xlsx>".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Error:")));
    }

    #[test]
    fn failed_view_shows_error_only() {
        let view = AppViewModel {
            phase: PhaseKind::Failed,
            submit_enabled: true,
            error_visible: true,
            error_text: "Server error or OCR failed".to_string(),
            ..AppViewModel::default()
        };

        let lines = render(&view);

        assert!(lines.contains(&"Error: Server error or OCR failed".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Download:")));
    }

    #[test]
    fn terminal_surface_writes_lines() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.show(&["one".to_string(), "two".to_string()]);
        surface.notify("three");

        let written = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(written, "one\ntwo\nthree\n");
    }
}
