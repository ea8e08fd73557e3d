//! Ratatui-based terminal UI.
//!
//! Two screens, switched with Tab:
//! - Dashboard: totals, range filters + presets, units chart, revenue table
//! - Import: CSV picker, preview, upload

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Terminal,
};

use crate::analytics::RangeBound;
use crate::app::pipeline::{load_sales, SalesData};
use crate::config::DashboardConfig;
use crate::data::SalesClient;
use crate::domain::{FilterState, Preset};
use crate::error::AppError;
use crate::report::{build_view, fmt_money, fmt_thousands, DashboardView};

mod import;
mod plotters_chart;

use import::ImportScreen;
use plotters_chart::{chart_bars, legend_lines, UnitsChart};

const EXPORT_DIR: &str = "exports";

/// Start the TUI.
pub fn run(config: DashboardConfig, from_csv: Option<PathBuf>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, from_csv)?;
    // Show the loading state before the (blocking) first fetch.
    terminal
        .draw(|f| app.draw(f))
        .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
    app.reload()?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Import,
}

struct App {
    config: DashboardConfig,
    from_csv: Option<PathBuf>,
    client: SalesClient,
    page: Page,
    data: Option<SalesData>,
    filter: FilterState,
    view: DashboardView,
    selected_bound: usize,
    /// Text buffer while a bound is being edited.
    bound_input: Option<String>,
    status: String,
    import: ImportScreen,
}

impl App {
    fn new(config: DashboardConfig, from_csv: Option<PathBuf>) -> Result<Self, AppError> {
        let client = SalesClient::new(&config)?;
        let cwd = std::env::current_dir()
            .map_err(|e| AppError::new(4, format!("Failed to resolve working directory: {e}")))?;
        Ok(Self {
            config,
            from_csv,
            client,
            page: Page::Dashboard,
            data: None,
            filter: FilterState::default(),
            view: build_view(&[], &FilterState::default()),
            selected_bound: 0,
            bound_input: None,
            status: "Loading sales data...".to_string(),
            import: ImportScreen::new(cwd),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // "Uploading..." is on screen now; send the file.
            if self.import.is_uploading() {
                self.import.upload(&self.client);
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                needs_redraw = self.import.tick(Instant::now());
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.bound_input.is_some() {
            self.handle_bound_edit(code);
            return false;
        }
        if self.page == Page::Import && self.import.is_typing() {
            self.import.handle_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.page = match self.page {
                    Page::Dashboard => Page::Import,
                    Page::Import => Page::Dashboard,
                };
                return false;
            }
            _ => {}
        }

        match self.page {
            Page::Dashboard => self.handle_dashboard_key(code),
            Page::Import => self.import.handle_key(code),
        }
        false
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_bound = self.selected_bound.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_bound + 1 < RangeBound::ALL.len() {
                    self.selected_bound += 1;
                }
            }
            KeyCode::Enter => {
                let current = self.filter.bound(RangeBound::ALL[self.selected_bound]);
                self.bound_input = Some(format!("{current}"));
                self.status = "Editing bound. Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('1') => self.apply_preset(Preset::Top5),
            KeyCode::Char('2') => self.apply_preset(Preset::Top10revenue),
            KeyCode::Char('0') => {
                self.filter.reset();
                self.refresh_view();
                self.status = "Filters reset.".to_string();
            }
            KeyCode::Char('r') => {
                // Only the first load is fatal; later failures keep the current data.
                if let Err(err) = self.reload() {
                    tracing::warn!(error = %err, "reload failed");
                    self.status = format!("Reload failed: {err}");
                }
            }
            KeyCode::Char('e') => {
                match crate::io::export::write_timestamped_csv(std::path::Path::new(EXPORT_DIR), &self.view.table) {
                    Ok(path) => self.status = format!("Exported {}", path.display()),
                    Err(err) => self.status = format!("Export failed: {err}"),
                }
            }
            _ => {}
        }
    }

    fn handle_bound_edit(&mut self, code: KeyCode) {
        let Some(input) = &mut self.bound_input else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.bound_input = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let raw = input.trim().to_string();
                self.bound_input = None;
                let bound = RangeBound::ALL[self.selected_bound];
                match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => {
                        self.filter.set_bound(bound, v);
                        self.refresh_view();
                        self.status = format!("{}: {v}", bound.label());
                    }
                    _ => self.status = format!("Invalid number '{raw}'."),
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => input.push(c),
            _ => {}
        }
    }

    fn apply_preset(&mut self, preset: Preset) {
        let aggregated = self.data.as_ref().map(|d| d.aggregated.as_slice()).unwrap_or(&[]);
        self.filter.apply_preset(preset, aggregated);
        self.refresh_view();
        self.status = format!("preset: {}", preset.display_name());
    }

    /// Re-fetch (or re-read) sales and recompute the aggregation.
    fn reload(&mut self) -> Result<(), AppError> {
        let data = load_sales(&self.config, self.from_csv.as_deref())?;
        self.status = format!("Loaded {} records ({})", data.records.len(), data.source.label());
        self.data = Some(data);
        self.refresh_view();
        Ok(())
    }

    fn refresh_view(&mut self) {
        let aggregated = self.data.as_ref().map(|d| d.aggregated.as_slice()).unwrap_or(&[]);
        self.view = build_view(aggregated, &self.filter);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.page {
            Page::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Page::Import => self.import.draw(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        let tab = |page: Page, label: &'static str| {
            if self.page == page {
                Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan))
            } else {
                Span::styled(label, Style::default().fg(Color::Gray))
            }
        };
        lines.push(Line::from(vec![
            Span::styled("dash", Style::default().fg(Color::Cyan)),
            Span::raw(" products dashboard  "),
            tab(Page::Dashboard, " Dashboard "),
            Span::raw(" "),
            tab(Page::Import, " Import "),
        ]));

        let source = self
            .data
            .as_ref()
            .map(|d| d.source.label())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!("source: {source} | api: {}", self.config.api_base),
            Style::default().fg(Color::Gray),
        )));

        let totals = &self.view.totals;
        lines.push(Line::from(Span::styled(
            format!(
                "Total products: {} | Total sold: {} | Total revenue: ${}",
                totals.products,
                fmt_thousands(totals.units_sold),
                fmt_money(totals.revenue),
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_dashboard(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(area);
        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        self.draw_filters(frame, chunks[0]);
        self.draw_chart(frame, lower[0]);
        self.draw_table(frame, lower[1]);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let items: Vec<ListItem> = RangeBound::ALL
            .iter()
            .enumerate()
            .map(|(i, bound)| {
                let value = match (&self.bound_input, i == self.selected_bound) {
                    (Some(input), true) => format!("{input}_"),
                    _ => format!("{}", self.filter.bound(*bound)),
                };
                ListItem::new(format!("{:<16} {value}", bound.label()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.selected_bound));
        frame.render_stateful_widget(list, cols[0], &mut state);

        let mut lines = vec![
            Line::from(format!("Sold Count Range: {}", self.filter.ranges.sold_count)),
            Line::from(format!("Avg Price Range: ${}", self.filter.ranges.avg_price)),
        ];
        let mut presets = Vec::new();
        for (key, preset) in [("1", Preset::Top5), ("2", Preset::Top10revenue)] {
            let style = if self.filter.active == Some(preset) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            presets.push(Span::styled(format!("[{key}] {}", preset.display_name()), style));
            presets.push(Span::raw("  "));
        }
        presets.push(Span::styled("[0] Reset Filters", Style::default().fg(Color::Gray)));
        lines.push(Line::from(presets));

        let p = Paragraph::new(lines).block(Block::default().title("Presets").borders(Borders::ALL));
        frame.render_widget(p, cols[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales Distribution").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.data.is_none() {
            let msg = Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }
        if self.view.chart.is_empty() {
            let msg = Paragraph::new("No products match the current filters.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (bars, y_max) = chart_bars(&self.view.chart);
        let legend_height = (bars.len() as u16).min(inner.height / 3);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
            .split(inner);
        frame.render_widget(UnitsChart { bars: &bars, y_max }, parts[0]);
        frame.render_widget(Paragraph::new(legend_lines(&bars)), parts[1]);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(["Product", "Sold", "Avg Price", "Revenue"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.view.table.iter().map(|p| {
            Row::new([
                p.name.clone(),
                p.sold_count.to_string(),
                format!("${:.2}", p.avg_price),
                format!("${}", fmt_money(p.total_revenue)),
            ])
        });
        let widths = [
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title("Top Products").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.page {
            Page::Dashboard => "Tab import  ↑/↓ bound  Enter edit  1 top5  2 top10 revenue  0 reset  r reload  e export  q quit",
            Page::Import => "Tab dashboard  ↑/↓ file  Enter select  / type path  s rescan  u upload  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_sales;
    use crate::data::sample::fallback_sales;
    use crate::domain::SalesSource;

    fn app() -> App {
        let config = DashboardConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            log_file: None,
        };
        let mut app = App::new(config, None).unwrap();
        app.data = Some(SalesData::from_records(fallback_sales(), SalesSource::Fallback));
        app.refresh_view();
        app
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn editing_a_bound_refilters() {
        let mut app = app();
        assert_eq!(app.view.totals.products, 6);

        // SoldMax is the second bound.
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        for _ in 0..3 {
            app.handle_key(KeyCode::Backspace);
        }
        type_keys(&mut app, "200");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.filter.ranges.sold_count.max, 200.0);
        assert_eq!(app.view.totals.products, 7);
    }

    #[test]
    fn invalid_bound_input_is_ignored() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        app.bound_input = Some("1.2.3".to_string());
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.filter.ranges.sold_count.min, 0.0);
        assert!(app.status.starts_with("Invalid number"));
    }

    #[test]
    fn preset_keys_and_reset() {
        let mut app = app();
        app.handle_key(KeyCode::Char('1'));
        assert_eq!(app.filter.active, Some(Preset::Top5));
        assert_eq!(app.view.totals.products, 5);
        assert_eq!(app.view.totals.products, aggregate_sales(&fallback_sales()).len() - 2);

        app.handle_key(KeyCode::Char('0'));
        assert_eq!(app.filter, FilterState::default());
    }

    #[test]
    fn tab_switches_pages_and_q_quits() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Tab));
        assert_eq!(app.page, Page::Import);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn failed_reload_keeps_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "id,name,sold_count,avg_price\n1,GAP,10,100\n").unwrap();

        let config = DashboardConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            log_file: None,
        };
        let mut app = App::new(config, Some(path.clone())).unwrap();
        app.reload().unwrap();
        assert_eq!(app.view.totals.products, 1);

        std::fs::remove_file(&path).unwrap();
        assert!(!app.handle_key(KeyCode::Char('r')));
        assert!(app.status.starts_with("Reload failed"));
        assert_eq!(app.data.as_ref().map(|d| d.records.len()), Some(1));
        assert_eq!(app.view.totals.products, 1);
    }
}
