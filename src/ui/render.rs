use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::panels::notify::Severity;

use super::app::App;
use super::{Focus, Overlay};

fn loading_anim(tick: u64) -> &'static str {
    // Small/medium/large dot pulse while a request is in flight.
    const FRAMES: [&str; 4] = ["·", "●", "⬤", "●"];
    FRAMES[(tick as usize) % FRAMES.len()]
}

/// Main render function
pub(super) fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_main(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    render_notifications(f, f.area(), app);

    match app.overlay() {
        Overlay::FilePicker => render_file_picker(f, f.area(), app),
        Overlay::Help => render_help(f, f.area()),
        Overlay::None => {}
    }
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("Repolens: codebase investigator")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(title, area);
}

fn render_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(area);

    render_side_panel(f, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(cols[1]);

    render_code_viewer(f, right[0], app);
    render_assistant(f, right[1], app);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn input_line(text: &str, focused: bool) -> Line<'_> {
    let mut spans = vec![Span::raw(text)];
    if focused {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

fn render_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Length(3), // Repository URL
            Constraint::Length(4), // Source
            Constraint::Min(0),    // File tree
        ])
        .split(area);

    let status = Paragraph::new(app.repo().status_label())
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, rows[0]);

    let focused = app.focus() == Focus::RepoUrl && app.overlay() == Overlay::None;
    let url_text = app.repo().url_input.text();
    let url = if url_text.is_empty() && !focused {
        Paragraph::new(Span::styled(
            "https://github.com/org/repo",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(input_line(url_text, focused))
    };
    f.render_widget(
        url.block(
            Block::default()
                .borders(Borders::ALL)
                .title("Repository URL")
                .border_style(focus_border(focused)),
        ),
        rows[1],
    );

    let source = app.repo().source();
    let source_widget = if source.is_empty() {
        Paragraph::new(Span::styled(
            "No source yet.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(source).wrap(Wrap { trim: false })
    };
    f.render_widget(
        source_widget.block(Block::default().borders(Borders::ALL).title("Source")),
        rows[2],
    );

    let tree_title = match app.repo().last_refreshed() {
        Some(at) => format!("File Tree (updated {})", at.format("%H:%M:%S")),
        None => "File Tree".to_string(),
    };
    let tree_text = app.repo().tree_text();
    let tree_widget = if tree_text.is_empty() {
        Paragraph::new(Span::styled(
            "No responses yet.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(tree_text).style(Style::default().fg(Color::Green))
    };
    f.render_widget(
        tree_widget.block(Block::default().borders(Borders::ALL).title(tree_title)),
        rows[3],
    );
}

fn render_code_viewer(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus() == Focus::Files && app.overlay() == Overlay::None;
    let viewer = app.viewer();

    let title = if viewer.loading_files() {
        format!("Code Viewer {}", loading_anim(app.tick_count()))
    } else {
        match viewer.selected_name() {
            Some(name) => format!("Code Viewer: {name}"),
            None => "Code Viewer: Choose the file (Enter)".to_string(),
        }
    };

    let body = if viewer.loading() {
        Paragraph::new(Line::from(vec![
            Span::styled(
                loading_anim(app.tick_count()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(" Loading code...", Style::default().fg(Color::Yellow)),
        ]))
    } else if viewer.content().is_empty() {
        Paragraph::new(Span::styled(
            "No file loaded.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(viewer.content()).scroll((app.viewer_scroll(), 0))
    };

    f.render_widget(
        body.block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(focus_border(focused)),
        ),
        area,
    );
}

fn render_assistant(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus() == Focus::Question && app.overlay() == Overlay::None;
    let assistant = app.assistant();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Answer
            Constraint::Length(3), // Question input
        ])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if assistant.loading() {
        lines.push(Line::from(vec![
            Span::styled(
                loading_anim(app.tick_count()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(" Loading...", Style::default().fg(Color::Yellow)),
        ]));
    } else if assistant.answer().is_empty() {
        lines.push(Line::from(Span::styled(
            "No responses yet.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        if !assistant.question().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("> {}", assistant.question()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(assistant.answer()));
        if !assistant.attribution().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("source: {}", assistant.attribution()),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    let answer = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Assistant"));
    f.render_widget(answer, rows[0]);

    let question = Paragraph::new(input_line(assistant.input.text(), focused)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Ask about the repo")
            .border_style(focus_border(focused)),
    );
    f.render_widget(question, rows[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hints =
        "Tab focus | Enter submit/open | PgUp/PgDn scroll | ^R reset | ^F refetch files | ^H help | Esc quit";
    let left = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(left, area);

    let url = app.repo().committed_url();
    if !url.is_empty() {
        let right = Paragraph::new(url)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::NONE));
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(right, inner);
    }
}

fn render_notifications(f: &mut Frame, area: Rect, app: &App) {
    let notifications = app.notifications();
    if notifications.is_empty() {
        return;
    }

    let lines: Vec<Line> = notifications
        .iter()
        .rev()
        .take(3)
        .map(|n| {
            let style = match n.severity {
                Severity::Success => Style::default().fg(Color::Green),
                Severity::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(n.text.clone(), style))
        })
        .collect();

    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(0)
        .saturating_add(4)
        .min(area.width);
    let height = (lines.len() as u16).saturating_add(2).min(area.height);
    let popup = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_file_picker(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);

    let entries = app.viewer().entries();
    if entries.is_empty() {
        let empty = Paragraph::new("No files listed. ^F to refetch.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Files"));
        f.render_widget(empty, popup);
        return;
    }

    // Window the listing around the highlighted row.
    let visible = popup.height.saturating_sub(2) as usize;
    let selected = app.picker_index().min(entries.len().saturating_sub(1));
    let start = selected
        .saturating_sub(visible / 2)
        .min(entries.len().saturating_sub(visible.max(1)));

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
        .map(|(i, entry)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(entry.name.clone(), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Files ({})", entries.len())),
    );
    f.render_widget(list, popup);
}

fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Tab / Shift+Tab   cycle focus (URL, files, question)"),
        Line::from("Enter             submit the focused control"),
        Line::from("Up / Down         open the file picker (files focus)"),
        Line::from("PgUp / PgDn       scroll the code viewer"),
        Line::from("Ctrl+R            reset backend memory"),
        Line::from("Ctrl+F            refetch the file listing"),
        Line::from("Ctrl+H            this help"),
        Line::from("Esc / Ctrl+Q      quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Esc closes this overlay.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
