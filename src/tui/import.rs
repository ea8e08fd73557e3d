//! Import screen: pick a CSV, preview it, upload it.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table},
};

use crate::cli::picker::{discover_csv_files, pretty_path};
use crate::data::SalesClient;
use crate::error::ImportError;
use crate::io::preview::{preview_file, CsvPreview};

/// How long the success banner stays before the selection is cleared.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

const GENERIC_UPLOAD_ERROR: &str = "Upload failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    /// Requested; the event loop draws this state, then performs the upload.
    Uploading,
    Success { at: Instant },
    Error(String),
}

pub struct ImportScreen {
    root: PathBuf,
    files: Vec<PathBuf>,
    list_index: usize,
    /// `Some` while the user is typing a path.
    path_input: Option<String>,
    pub file: Option<PathBuf>,
    pub preview: CsvPreview,
    pub status: UploadStatus,
}

impl ImportScreen {
    pub fn new(root: PathBuf) -> Self {
        let files = discover_csv_files(&root);
        Self {
            root,
            files,
            list_index: 0,
            path_input: None,
            file: None,
            preview: CsvPreview::default(),
            status: UploadStatus::Idle,
        }
    }

    /// True while keystrokes belong to the path input.
    pub fn is_typing(&self) -> bool {
        self.path_input.is_some()
    }

    pub fn rescan(&mut self) {
        self.files = discover_csv_files(&self.root);
        self.list_index = self.list_index.min(self.files.len().saturating_sub(1));
    }

    /// Select a file: extension check, read, preview.
    ///
    /// On failure the previous selection and preview stay in place.
    pub fn select(&mut self, path: &Path) {
        match preview_file(path) {
            Ok(preview) => {
                tracing::info!(file = %path.display(), rows = preview.rows.len(), "selected file for import");
                self.file = Some(path.to_path_buf());
                self.preview = preview;
                self.status = UploadStatus::Idle;
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "file rejected");
                self.status = UploadStatus::Error(err.to_string());
            }
        }
    }

    /// Request an upload of the selected file. No-op without a selection.
    pub fn begin_upload(&mut self) {
        if self.file.is_some() {
            self.status = UploadStatus::Uploading;
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    /// Perform a requested upload (blocking).
    pub fn upload(&mut self, client: &SalesClient) {
        let Some(path) = self.file.clone().filter(|_| self.is_uploading()) else {
            return;
        };
        let result = client.upload_csv(&path);
        self.finish_upload(result, Instant::now());
    }

    pub fn finish_upload(&mut self, result: Result<(), ImportError>, now: Instant) {
        self.status = match result {
            Ok(()) => UploadStatus::Success { at: now },
            Err(err) => {
                let message = err.to_string();
                if message.trim().is_empty() {
                    UploadStatus::Error(GENERIC_UPLOAD_ERROR.to_string())
                } else {
                    UploadStatus::Error(message)
                }
            }
        };
    }

    /// Clear the selection once the success banner has been shown long enough.
    /// Returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let UploadStatus::Success { at } = self.status else {
            return false;
        };
        if now.duration_since(at) < SUCCESS_DISPLAY {
            return false;
        }
        self.file = None;
        self.preview = CsvPreview::default();
        self.status = UploadStatus::Idle;
        true
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if let Some(input) = &mut self.path_input {
            match code {
                KeyCode::Esc => self.path_input = None,
                KeyCode::Enter => {
                    let typed = input.trim().to_string();
                    self.path_input = None;
                    if !typed.is_empty() {
                        self.select(Path::new(&typed));
                    }
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Up => self.list_index = self.list_index.saturating_sub(1),
            KeyCode::Down => {
                if self.list_index + 1 < self.files.len() {
                    self.list_index += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(path) = self.files.get(self.list_index).cloned() {
                    self.select(&path);
                }
            }
            KeyCode::Char('/') => self.path_input = Some(String::new()),
            KeyCode::Char('s') => self.rescan(),
            KeyCode::Char('u') => self.begin_upload(),
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        self.draw_file_list(frame, top[0]);
        self.draw_selection(frame, top[1]);
        self.draw_preview(frame, chunks[1]);
    }

    fn draw_file_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = if self.files.is_empty() {
            vec![ListItem::new("(no .csv files found; press / to type a path)")]
        } else {
            self.files.iter().map(|p| ListItem::new(pretty_path(p))).collect()
        };

        let list = List::new(items)
            .block(Block::default().title("CSV files").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.files.is_empty() {
            state.select(Some(self.list_index));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_selection(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = Vec::new();
        let chosen = self
            .file
            .as_deref()
            .map(pretty_path)
            .unwrap_or_else(|| "Choose a CSV file".to_string());
        lines.push(Line::from(vec![Span::raw("File: "), Span::styled(chosen, Style::default().fg(Color::Cyan))]));

        if let Some(input) = &self.path_input {
            lines.push(Line::from(Span::styled(
                format!("Path: {input}_"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }

        match &self.status {
            UploadStatus::Idle => {}
            UploadStatus::Uploading => lines.push(Line::from(Span::styled(
                "Uploading...",
                Style::default().fg(Color::Yellow),
            ))),
            UploadStatus::Success { .. } => lines.push(Line::from(Span::styled(
                "File uploaded successfully!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))),
            UploadStatus::Error(message) => lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))),
        }

        let hint = if self.file.is_some() { "u upload" } else { "select a file to enable upload" };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(lines).block(Block::default().title("Import Products").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Preview (First 10 Rows)")
            .borders(Borders::ALL);

        let Some(header) = self.preview.header() else {
            frame.render_widget(Paragraph::new("No file selected.").block(block), area);
            return;
        };

        let columns = header.len().max(1) as u32;
        let widths: Vec<Constraint> = (0..columns).map(|_| Constraint::Ratio(1, columns)).collect();
        let header_row = Row::new(header.iter().map(|h| h.to_uppercase()))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.preview.body().iter().map(|r| Row::new(r.iter().cloned()));

        let table = Table::new(rows, widths).header(header_row).block(block);
        frame.render_widget(table, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with_csv() -> (tempfile::TempDir, ImportScreen, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "id,name\n1,GAP\n").unwrap();
        let screen = ImportScreen::new(dir.path().to_path_buf());
        (dir, screen, path)
    }

    #[test]
    fn discovers_files_under_root() {
        let (_dir, screen, path) = screen_with_csv();
        assert_eq!(screen.files, vec![path]);
    }

    #[test]
    fn wrong_extension_keeps_previous_selection() {
        let (dir, mut screen, path) = screen_with_csv();
        screen.select(&path);
        assert_eq!(screen.preview.rows.len(), 2);

        screen.select(&dir.path().join("data.txt"));
        assert_eq!(screen.status, UploadStatus::Error("Please select a valid CSV file".to_string()));
        assert_eq!(screen.file.as_deref(), Some(path.as_path()));
        assert_eq!(screen.preview.rows.len(), 2);
    }

    #[test]
    fn success_clears_selection_after_three_seconds() {
        let (_dir, mut screen, path) = screen_with_csv();
        screen.select(&path);
        let t0 = Instant::now();
        screen.finish_upload(Ok(()), t0);

        assert!(!screen.tick(t0 + Duration::from_millis(2900)));
        assert!(screen.file.is_some());

        assert!(screen.tick(t0 + SUCCESS_DISPLAY));
        assert!(screen.file.is_none());
        assert!(screen.preview.is_empty());
        assert_eq!(screen.status, UploadStatus::Idle);
    }

    #[test]
    fn upload_key_enters_uploading_before_sending() {
        let (_dir, mut screen, path) = screen_with_csv();
        screen.handle_key(KeyCode::Char('u'));
        assert_eq!(screen.status, UploadStatus::Idle);

        screen.select(&path);
        screen.handle_key(KeyCode::Char('u'));
        assert!(screen.is_uploading());

        let config = crate::config::DashboardConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            log_file: None,
        };
        let client = SalesClient::new(&config).unwrap();
        screen.upload(&client);
        assert!(matches!(screen.status, UploadStatus::Error(_)));
        assert!(screen.file.is_some());
    }

    #[test]
    fn rejected_upload_shows_error_and_keeps_file() {
        let (_dir, mut screen, path) = screen_with_csv();
        screen.select(&path);
        screen.finish_upload(Err(ImportError::Rejected { status: 500 }), Instant::now());
        assert_eq!(screen.status, UploadStatus::Error("Upload failed".to_string()));
        assert!(screen.file.is_some());
        assert!(!screen.tick(Instant::now() + Duration::from_secs(10)));
    }
}
