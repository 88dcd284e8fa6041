//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::{App, RENEWABLE_SHORTCUTS};
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // headroom gauge
            Constraint::Length(8), // households + renewables
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_headroom_gauge(frame, app, chunks[2]);
    render_panels(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: scenario name, refresh rate, run state, last action.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_running() {
        ("▶", "RUNNING")
    } else {
        ("■", "IDLE")
    };

    let header = Line::from(vec![
        Span::styled(
            " MICROGRID ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.scenario_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ {}ms │ {} {} │ {}",
            app.tick_interval_ms(),
            state_icon,
            state_label,
            app.message,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Pool total vs available over time.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let total_data: Vec<(f64, f64)> = app
        .history
        .iter()
        .map(|s| (s.elapsed_s, s.total as f64))
        .collect();
    let available_data: Vec<(f64, f64)> = app
        .history
        .iter()
        .map(|s| (s.elapsed_s, s.available as f64))
        .collect();

    let y_bounds = style::auto_bounds_y(&[&total_data, &available_data]);

    let x_lo = total_data.first().map_or(0.0, |p| p.0);
    let x_hi = total_data.last().map_or(1.0, |p| p.0).max(x_lo + 1.0);

    let datasets = vec![
        Dataset::default()
            .name("Total")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::TOTAL_COLOR))
            .data(&total_data),
        Dataset::default()
            .name("Available")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::AVAILABLE_COLOR))
            .data(&available_data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Energy Pool ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("s")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{x_lo:.0}"), format!("{x_hi:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("units")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.0}", y_bounds[0]),
                    format!("{:.0}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Available / total gauge.
fn render_headroom_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let snap = &app.latest;
    let ratio = snap.headroom();

    let gauge = Gauge::default()
        .block(Block::default().title(" Available ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::headroom_color(ratio)))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}/{}", snap.available, snap.total));
    frame.render_widget(gauge, area);
}

/// Households on the left, renewables on the right.
fn render_panels(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let snap = &app.latest;
    let households: Vec<Line> = if snap.households.is_empty() {
        vec![Line::from("  No households yet, press s")]
    } else {
        snap.households
            .iter()
            .map(|h| {
                let bar = "█".repeat(h.consumption as usize);
                Line::from(vec![
                    Span::raw(format!("  {:<4}{:>3} ", h.id, h.consumption)),
                    Span::styled(bar, Style::default().fg(style::CONSUMING)),
                ])
            })
            .collect()
    };
    let title = format!(" Households (draw {}) ", snap.household_draw());
    frame.render_widget(
        Paragraph::new(households).block(Block::default().title(title).borders(Borders::ALL)),
        chunks[0],
    );

    let renewables: Vec<Line> = if snap.renewables.is_empty() {
        vec![Line::from("  None registered")]
    } else {
        snap.renewables
            .iter()
            .map(|r| {
                Line::from(Span::styled(
                    format!("  {:<8}+{}", r.kind, r.capacity),
                    Style::default().fg(style::RENEWABLE),
                ))
            })
            .collect()
    };
    let title = format!(" Renewables (+{}) ", snap.renewable_capacity());
    frame.render_widget(
        Paragraph::new(renewables).block(Block::default().title(title).borders(Borders::ALL)),
        chunks[1],
    );
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let shortcuts: Vec<String> = RENEWABLE_SHORTCUTS
        .iter()
        .enumerate()
        .map(|(i, (kind, cap))| format!("{}:{kind}+{cap}", i + 1))
        .collect();
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" q:Quit  s:Start  +/-:Speed  {}", shortcuts.join("  ")),
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
