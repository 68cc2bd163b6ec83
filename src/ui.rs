use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use land_plots::currency::format_price;
use land_plots::{
    evaluate, suggest_locations, Catalog, Currency, FilterSpec, ProjectType, RawParams, ResultItem,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    MinPrice,
    MaxPrice,
    Location,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::List => Focus::MinPrice,
            Focus::MinPrice => Focus::MaxPrice,
            Focus::MaxPrice => Focus::Location,
            Focus::Location => Focus::List,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Focus::List => "Plots",
            Focus::MinPrice => "Min Price",
            Focus::MaxPrice => "Max Price",
            Focus::Location => "Location",
        }
    }
}

pub struct App {
    pub catalog: Catalog,
    pub results: Vec<ResultItem>,
    pub state: TableState,
    pub focus: Focus,
    pub min_input: String,
    pub max_input: String,
    pub location_input: String,
    pub currency: Currency,
    pub suggestions: Vec<String>,
    pub suggestion_index: Option<usize>,
    pub show_detail: bool,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = Self {
            catalog,
            results: Vec::new(),
            state: TableState::default(),
            focus: Focus::List,
            min_input: String::new(),
            max_input: String::new(),
            location_input: String::new(),
            currency: Currency::Usd,
            suggestions: Vec::new(),
            suggestion_index: None,
            show_detail: false,
        };
        app.refresh();
        app
    }

    /// Current filter inputs as a spec; the text fields are the raw
    /// parameter source, same as a query string would be
    pub fn spec(&self) -> FilterSpec {
        FilterSpec::from_params(
            &RawParams::new()
                .with("minPrice", &self.min_input)
                .with("maxPrice", &self.max_input)
                .with("location", &self.location_input)
                .with("currency", self.currency.code()),
        )
    }

    /// Re-evaluate the pipeline after any filter edit
    pub fn refresh(&mut self) {
        self.results = evaluate(&self.catalog, &self.spec());
        self.suggestions = suggest_locations(&self.catalog, &self.location_input)
            .into_iter()
            .map(String::from)
            .collect();

        // Keep the selection on a valid row
        if self.results.is_empty() {
            self.state.select(None);
        } else {
            let i = self.state.selected().unwrap_or(0).min(self.results.len() - 1);
            self.state.select(Some(i));
        }
    }

    pub fn toggle_detail(&mut self) {
        if self.selected_item().is_some() {
            self.show_detail = !self.show_detail;
        }
    }

    pub fn selected_item(&self) -> Option<&ResultItem> {
        self.state.selected().and_then(|i| self.results.get(i))
    }

    pub fn toggle_currency(&mut self) {
        self.currency = self.currency.toggled();
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.min_input.clear();
        self.max_input.clear();
        self.location_input.clear();
        self.suggestion_index = None;
        self.refresh();
    }

    pub fn has_filter(&self) -> bool {
        !self.min_input.is_empty() || !self.max_input.is_empty() || !self.location_input.is_empty()
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Accept a typed character into the focused field. Price fields
    /// take digits only, the location field letters and spaces; other
    /// characters are dropped at the door.
    pub fn push_input(&mut self, c: char) {
        let accepted = match self.focus {
            Focus::MinPrice | Focus::MaxPrice => c.is_ascii_digit(),
            Focus::Location => c.is_alphabetic() || c.is_whitespace(),
            Focus::List => false,
        };
        if !accepted {
            return;
        }

        match self.focus {
            Focus::MinPrice => self.min_input.push(c),
            Focus::MaxPrice => self.max_input.push(c),
            Focus::Location => self.location_input.push(c),
            Focus::List => {}
        }
        self.suggestion_index = None;
        self.refresh();
    }

    pub fn pop_input(&mut self) {
        match self.focus {
            Focus::MinPrice => self.min_input.pop(),
            Focus::MaxPrice => self.max_input.pop(),
            Focus::Location => self.location_input.pop(),
            Focus::List => None,
        };
        self.suggestion_index = None;
        self.refresh();
    }

    pub fn next_suggestion(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.suggestion_index = Some(match self.suggestion_index {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn previous_suggestion(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.suggestion_index = Some(match self.suggestion_index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Copy the highlighted dropdown entry into the location field.
    /// Returns false when nothing is highlighted.
    pub fn accept_suggestion(&mut self) -> bool {
        let index = match self.suggestion_index {
            Some(i) => i,
            None => return false,
        };
        match self.suggestions.get(index).cloned() {
            Some(location) => {
                self.location_input = location;
                self.suggestion_index = None;
                self.refresh();
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // A focused input field captures printable keys
            if app.focus != Focus::List {
                match key.code {
                    KeyCode::Esc => {
                        app.suggestion_index = None;
                        app.focus = Focus::List;
                    }
                    KeyCode::Enter => {
                        // Enter picks the highlighted suggestion, or blurs
                        if !app.accept_suggestion() {
                            app.focus = Focus::List;
                        }
                    }
                    KeyCode::Tab => {
                        app.suggestion_index = None;
                        app.next_focus();
                    }
                    KeyCode::Backspace => app.pop_input(),
                    KeyCode::Down if app.focus == Focus::Location && !app.suggestions.is_empty() => {
                        app.next_suggestion();
                    }
                    KeyCode::Up if app.focus == Focus::Location && !app.suggestions.is_empty() => {
                        app.previous_suggestion();
                    }
                    KeyCode::Down => {
                        app.focus = Focus::List;
                        app.next();
                    }
                    KeyCode::Char(c) => app.push_input(c),
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Esc => {
                    // Layered escape: detail, then filters, then quit
                    if app.show_detail {
                        app.show_detail = false;
                    } else if app.has_filter() {
                        app.clear_filters();
                    } else {
                        return Ok(());
                    }
                }
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => app.next_focus(),
                KeyCode::Char('x') => app.toggle_currency(),
                KeyCode::Char('c') => app.clear_filters(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => {
                    if !app.results.is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.results.is_empty() {
                        app.state.select(Some(app.results.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Plot list (and detail / suggestions)
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_filter_bar(f, chunks[1], app);

    // Content area: optional suggestion dropdown above the table,
    // optional detail panel beside it
    let mut content = chunks[2];
    if app.focus == Focus::Location && !app.suggestions.is_empty() {
        let height = (app.suggestions.len() as u16 + 2).min(8);
        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(height), Constraint::Min(0)])
            .split(content);

        render_suggestions(f, content_chunks[0], app);
        content = content_chunks[1];
    }

    if app.show_detail && app.selected_item().is_some() {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(content);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, content, app);
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_spans = vec![
        Span::styled(
            "🌍 Land Plots",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Catalog: {} plots", app.catalog.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Matching: {}", app.results.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Prices in {}", app.currency.code()),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(header_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
        ])
        .split(area);

    render_input_box(f, chunks[0], app, Focus::MinPrice, &app.min_input);
    render_input_box(f, chunks[1], app, Focus::MaxPrice, &app.max_input);
    render_input_box(f, chunks[2], app, Focus::Location, &app.location_input);

    // Currency is a toggle, not a text field
    let currency = Paragraph::new(format!(
        "{} {}",
        app.currency.symbol(),
        app.currency.code()
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Currency (x) "),
    );
    f.render_widget(currency, chunks[3]);
}

fn render_input_box(f: &mut Frame, area: Rect, app: &App, focus: Focus, value: &str) {
    let focused = app.focus == focus;

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = if focused {
        format!("{}█", value)
    } else if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", focus.title())),
    );

    f.render_widget(input, area);
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let highlighted = app.suggestion_index == Some(i);
            let marker = if highlighted { "→ " } else { "  " };
            let style = if highlighted {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(vec![Span::raw(marker), Span::styled(location.clone(), style)])
        })
        .collect();

    let dropdown = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Matching Locations (↑/↓ + Enter) "),
    );

    f.render_widget(dropdown, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Title", "Location", "Size", "Price", "Project"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.results.iter().map(|item| {
        let type_color = project_type_color(item.plot.project_type);

        let cells = vec![
            Cell::from(item.plot.id.clone()),
            Cell::from(truncate(&item.plot.title, 30)),
            Cell::from(truncate(&item.plot.location, 32)),
            Cell::from(format!("{:.0} m²", item.plot.size)),
            Cell::from(format_price(item.display_price, item.currency))
                .style(Style::default().fg(Color::Green)),
            Cell::from(item.plot.project_type.name())
                .style(Style::default().fg(type_color)),
        ];

        Row::new(cells).height(1)
    });

    let title = if app.has_filter() {
        " Plots (filtered) "
    } else {
        " Plots "
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(32),
            Constraint::Length(34),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let item = match app.selected_item() {
        Some(item) => item,
        None => {
            let no_selection = Paragraph::new("No plot selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Plot Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Title: ", label),
            Span::raw(&item.plot.title),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Location: ", label),
            Span::raw(&item.plot.location),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Size: ", label),
            Span::raw(format!("{:.0} m²", item.plot.size)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Price: ", label),
            Span::styled(
                format_price(item.display_price, item.currency),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" "),
            Span::raw(item.currency.code()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Project: ", label),
            Span::styled(
                item.plot.project_type.name(),
                Style::default().fg(project_type_color(item.plot.project_type)),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  OWNER",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Name: ", label),
            Span::raw(&item.plot.owner),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Contact: ", label),
            Span::styled(&item.plot.contact, Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  DESCRIPTION",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                wrap_text(&item.plot.description, 35),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Plot Details "),
    );

    f.render_widget(detail_panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Plot: {}/{} ", selected, app.results.len()),
        Style::default().fg(Color::Cyan),
    )];

    if app.has_filter() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            "Filter active",
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fields | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("x", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Currency | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn project_type_color(project_type: ProjectType) -> Color {
    match project_type {
        ProjectType::Moore => Color::Cyan,
        ProjectType::Feldhecken => Color::Green,
        ProjectType::Waelder => Color::LightGreen,
        ProjectType::Streuobstwiesen => Color::Yellow,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn wrap_text(text: &str, width: usize) -> String {
    if text.len() <= width {
        text.to_string()
    } else {
        let mut result = String::new();
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut current_line = String::new();

        for word in words {
            if current_line.len() + word.len() + 1 <= width {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
            } else {
                if !result.is_empty() {
                    result.push_str("\n  ");
                }
                result.push_str(&current_line);
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            if !result.is_empty() {
                result.push_str("\n  ");
            }
            result.push_str(&current_line);
        }

        result
    }
}
