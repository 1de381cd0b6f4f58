//! Time-series plot rendering
//!
//! The sampler exposes its rolling window as an ordered sequence of
//! (timestamp-label, value) pairs; the [`Visualizer`] trait is the narrow
//! surface that consumes it. [`TerminalChart`] renders the series as a
//! braille line chart in the alternate screen and waits for a key press
//! before restoring the terminal.

use std::io;

use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::execute;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset};
use ratatui::Terminal;

use crate::error::Result;
use crate::unit::TemperatureUnit;

/// Renders an ordered, bounded series of (timestamp-label, value) pairs.
pub trait Visualizer {
    fn render(&mut self, series: &[(String, f64)]) -> Result<()>;
}

/// One-shot terminal line chart over the sampled window.
pub struct TerminalChart {
    title: String,
    unit: TemperatureUnit,
}

impl TerminalChart {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { title: "CPU temperature over time".to_string(), unit }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Visualizer for TerminalChart {
    fn render(&mut self, series: &[(String, f64)]) -> Result<()> {
        if series.is_empty() {
            return Ok(());
        }

        let data: Vec<(f64, f64)> =
            series.iter().enumerate().map(|(i, (_, v))| (i as f64, *v)).collect();
        let min_val = data.iter().map(|(_, v)| *v).fold(f64::MAX, f64::min);
        let max_val = data.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max);
        let y_min = min_val - 1.0;
        let y_max = max_val + 1.0;
        let x_max = (series.len() - 1).max(1) as f64;
        let latest = data.last().map(|(_, v)| *v).unwrap_or_default();
        let suffix = self.unit.suffix();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let draw_result = terminal.draw(|f| {
            let datasets = vec![Dataset::default()
                .name(format!("{latest:.2}{suffix}"))
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(Color::Cyan))
                .data(&data)];

            let first_label = series.first().map(|(t, _)| t.clone()).unwrap_or_default();
            let last_label = series.last().map(|(t, _)| t.clone()).unwrap_or_default();

            let chart = Chart::new(datasets)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} — press any key to exit ", self.title)),
                )
                .x_axis(
                    Axis::default()
                        .bounds([0.0, x_max])
                        .labels(vec![Line::from(first_label), Line::from(last_label)]),
                )
                .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
                    Line::from(format!("{y_min:.1}{suffix}")),
                    Line::from(format!("{y_max:.1}{suffix}")),
                ]));

            f.render_widget(chart, f.area());
        }).map(|_| ());

        // Block until a key press so the chart stays visible.
        let wait_result = wait_for_key();

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

        draw_result?;
        wait_result?;
        Ok(())
    }
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if let Event::Key(_) = event::read()? {
            return Ok(());
        }
    }
}
