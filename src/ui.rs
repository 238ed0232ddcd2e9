use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use photo_diary::{available_dates, build_feed, category_counts, Feed, Post, PostStore, SelectionState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Feed,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::Sidebar => Focus::Feed,
            Focus::Feed => Focus::Sidebar,
        }
    }
}

pub struct App {
    pub store: PostStore,
    pub selection: SelectionState,
    pub focus: Focus,
    /// Row 0 is "All Posts", then one row per timeline entry
    pub sidebar_state: ListState,
    /// Index into the flattened feed
    pub feed_state: ListState,
    /// Open date popover; row 0 is "All Diaries", then one row per date
    pub date_popover: Option<ListState>,
}

impl App {
    pub fn new(store: PostStore) -> Self {
        let mut sidebar_state = ListState::default();
        sidebar_state.select(Some(0));

        let mut app = Self {
            store,
            selection: SelectionState::new(),
            focus: Focus::Sidebar,
            sidebar_state,
            feed_state: ListState::default(),
            date_popover: None,
        };
        app.reset_feed_cursor();
        app
    }

    pub fn feed(&self) -> Feed<'_> {
        build_feed(&self.store, &self.selection)
    }

    pub fn sidebar_len(&self) -> usize {
        self.store.categories().len() + 1
    }

    pub fn date_menu(&self) -> Vec<String> {
        let mut entries = vec![photo_diary::ALL_DIARIES.to_string()];
        entries.extend(available_dates(&self.store).into_iter().map(str::to_string));
        entries
    }

    pub fn selected_post(&self) -> Option<&Post> {
        let index = self.feed_state.selected()?;
        build_feed(&self.store, &self.selection).posts().nth(index)
    }

    fn reset_feed_cursor(&mut self) {
        let has_posts = !self.feed().is_empty();
        self.feed_state.select(if has_posts { Some(0) } else { None });
    }

    /// Apply the highlighted sidebar row
    pub fn activate_sidebar(&mut self) {
        match self.sidebar_state.selected() {
            Some(0) | None => self.selection.reset(),
            Some(i) => {
                if let Some(category) = self.store.categories().get(i - 1).cloned() {
                    self.selection.select_timeline(&category);
                }
            }
        }
        self.reset_feed_cursor();
    }

    /// Title click
    pub fn reset(&mut self) {
        self.selection.reset();
        self.sidebar_state.select(Some(0));
        self.reset_feed_cursor();
    }

    pub fn open_date_popover(&mut self) {
        let menu = self.date_menu();
        let current = self
            .selection
            .active_date()
            .and_then(|date| menu.iter().position(|entry| entry == date))
            .unwrap_or(0);

        let mut state = ListState::default();
        state.select(Some(current));
        self.date_popover = Some(state);
    }

    pub fn close_date_popover(&mut self) {
        self.date_popover = None;
    }

    /// Apply the highlighted popover row and close the popover
    pub fn confirm_date_popover(&mut self) {
        let Some(state) = self.date_popover.take() else {
            return;
        };

        match state.selected() {
            Some(0) | None => self.selection.select_date(None),
            Some(i) => {
                if let Some(date) = self.date_menu().get(i) {
                    self.selection.select_date(Some(date.as_str()));
                }
            }
        }
        self.reset_feed_cursor();
    }

    pub fn next(&mut self) {
        let len = self.focused_len();
        if let Some(state) = self.focused_state() {
            step(state, len, true);
        }
    }

    pub fn previous(&mut self) {
        let len = self.focused_len();
        if let Some(state) = self.focused_state() {
            step(state, len, false);
        }
    }

    fn focused_len(&self) -> usize {
        if self.date_popover.is_some() {
            return self.date_menu().len();
        }
        match self.focus {
            Focus::Sidebar => self.sidebar_len(),
            Focus::Feed => self.feed().post_count(),
        }
    }

    fn focused_state(&mut self) -> Option<&mut ListState> {
        if self.date_popover.is_some() {
            return self.date_popover.as_mut();
        }
        match self.focus {
            Focus::Sidebar => Some(&mut self.sidebar_state),
            Focus::Feed => Some(&mut self.feed_state),
        }
    }
}

/// Move a list cursor one row, wrapping at both ends
fn step(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.date_popover.is_some() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('d') => app.close_date_popover(),
                KeyCode::Enter => app.confirm_date_popover(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.toggle(),
            KeyCode::Enter if app.focus == Focus::Sidebar => app.activate_sidebar(),
            KeyCode::Char('d') => app.open_date_popover(),
            KeyCode::Char('r') | KeyCode::Char('h') => app.reset(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Sidebar + feed
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(f, body[0], app);
    render_feed(f, body[1], app);
    render_status_bar(f, chunks[2], app);

    if app.date_popover.is_some() {
        let area = f.size();
        render_date_popover(f, area, app);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let feed = app.feed();

    let spans = vec![
        Span::styled(
            feed.header_label.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("{} posts", feed.post_count()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} days", feed.groups.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &mut App) {
    let profile = app.store.profile();
    let links = profile.social_links.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(links + 2),
        ])
        .split(area);

    let profile_block = Paragraph::new(vec![
        Line::from(Span::styled(
            profile.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(profile.tagline.clone(), Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(border_style(false)));
    f.render_widget(profile_block, chunks[0]);

    let active = app.selection.active_category().cloned();
    let highlight = |on: bool| {
        if on {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        "All Posts",
        highlight(app.selection.is_all()),
    )))];

    for (category, count) in category_counts(&app.store) {
        let on = active.as_ref() == Some(&category.id);
        items.push(ListItem::new(vec![
            Line::from(vec![
                Span::styled(category.label.clone(), highlight(on)),
                Span::styled(format!("  ({})", count), Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(Span::styled(
                format!("  {}", category.subtitle),
                Style::default().fg(Color::DarkGray),
            )),
        ]));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Sidebar))
                .title(" Timeline "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");
    f.render_stateful_widget(list, chunks[1], &mut app.sidebar_state);

    let social: Vec<Line> = app
        .store
        .profile()
        .social_links
        .iter()
        .map(|link| {
            Line::from(vec![
                Span::styled(format!("{}: ", link.network), Style::default().fg(Color::Cyan)),
                Span::raw(truncate(&link.url, 22)),
            ])
        })
        .collect();
    let social_block = Paragraph::new(social)
        .block(Block::default().borders(Borders::ALL).border_style(border_style(false)));
    f.render_widget(social_block, chunks[2]);
}

fn post_card(author: &str, post: &Post, first_of_group: bool) -> ListItem<'static> {
    let mut lines = Vec::new();

    if first_of_group {
        lines.push(Line::from(Span::styled(
            format!("── {} ──", post.date),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(vec![
        Span::styled(author.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", post.date), Style::default().fg(Color::DarkGray)),
    ]));

    let layout = if post.images.len() > 1 { "grid" } else { "single" };
    lines.push(Line::from(Span::styled(
        format!("[{} image(s), {}] {}", post.images.len(), layout, truncate(&post.images.join(", "), 60)),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(Span::raw(post.caption.clone())));
    lines.push(Line::from(Span::styled(
        "♥  💬  ➤                  🔖",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn render_feed(f: &mut Frame, area: Rect, app: &mut App) {
    let feed = build_feed(&app.store, &app.selection);
    let author = app.store.profile().name.clone();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Feed))
        .title(format!(" {} ", feed.header_label));

    if feed.is_empty() {
        let empty = Paragraph::new("No posts match this selection").block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = feed
        .groups
        .iter()
        .flat_map(|group| {
            group
                .posts
                .iter()
                .enumerate()
                .map(|(i, post)| post_card(&author, post, i == 0))
                .collect::<Vec<_>>()
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▌ ");

    f.render_stateful_widget(list, area, &mut app.feed_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.feed_state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.feed().post_count();

    let status_spans = vec![
        Span::styled(format!(" Post: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled(
            format!("[{} ▾]", app.selection.button_label()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" | "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(" Dates | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Select | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Focus | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Reset | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn render_date_popover(f: &mut Frame, area: Rect, app: &mut App) {
    let menu = app.date_menu();
    let height = (menu.len() as u16 + 2).min(area.height);
    let popup = centered_rect(34, height, area);

    let items: Vec<ListItem> = menu.into_iter().map(ListItem::new).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Diaries "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_widget(Clear, popup);
    if let Some(state) = app.date_popover.as_mut() {
        f.render_stateful_widget(list, popup, state);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
