use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketGrid, BracketView};
use crate::components::theme::{Theme, ThemeColor, resolve, side_style};
use crate::state::app_state::series_record;
use crate::state::loader::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use playoff_engine::snapshot::team_label;
use playoff_engine::{Bracket, SeriesKey, SeriesResult, Side, SideResult, TeamKey};

static TABS: &[&str; 3] = &["Bracket", "Alliances", "Series"];

const DETAIL_PANEL_WIDTH: u16 = 38;
const DETAIL_PANEL_HEIGHT: u16 = 12;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Alliances => draw_alliances(f, layout.main, app),
            MenuItem::Series => draw_series_table(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        let full = f.area();
        draw_loading_spinner(f, full, app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Alliances => 1,
        MenuItem::Series => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Placeholder shown on every tab until the first snapshot arrives.
fn draw_not_loaded(f: &mut Frame, area: Rect, app: &App) {
    let msg = if let Some(err) = app.state.last_error.as_deref() {
        format!("Event load failed:\n{err}\n\nPress r to retry.")
    } else {
        "Loading event data...".to_string()
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn event_title(app: &App) -> String {
    let state = &app.state.bracket;
    match state.year {
        Some(year) if !state.event_name.contains(&year.to_string()) => format!(" {} {} ", year, state.event_name),
        _ => format!(" {} ", state.event_name),
    }
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White).title(event_title(app));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.bracket.bracket.is_none() {
        draw_not_loaded(f, inner, app);
        return;
    }

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    f.render_widget(Paragraph::new(status_line(app)), header);
    f.render_widget(
        Paragraph::new("Keys: j/k=series  h/l=follow path  Enter=focus winner  PgUp/PgDn=scroll  r=reload")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let mut bracket_area = content;
    let mut detail_area: Option<Rect> = None;
    if content.width >= 120 {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(DETAIL_PANEL_WIDTH)]).areas(content);
        bracket_area = left;
        detail_area = Some(right);
    } else if content.height >= 28 {
        let [top, bottom] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(DETAIL_PANEL_HEIGHT)]).areas(content);
        bracket_area = top;
        detail_area = Some(bottom);
    }

    let state = &mut app.state.bracket;
    let grid = BracketGrid::compute(state.topology(), bracket_area.width);
    let selected = state.selected_key();
    if let Some(cell) = selected.and_then(|k| grid.cell(k)) {
        let rect = cell.rect;
        state.keep_visible(rect.y, rect.y + rect.height, bracket_area.height);
    }
    state.clamp_scroll(grid.total_height, bracket_area.height);

    let state = &app.state.bracket;
    let Some(bracket) = state.bracket.as_ref() else {
        return;
    };
    f.render_widget(
        BracketView {
            bracket,
            grid: &grid,
            selected,
            focused_alliance: state.focused_alliance,
            scroll_offset: state.scroll_offset,
            theme: Theme::Dark,
        },
        bracket_area,
    );

    if let (Some(detail_area), Some(key)) = (detail_area, selected) {
        draw_series_detail(f, detail_area, bracket, key);
    }
}

fn status_line(app: &App) -> Line<'static> {
    let state = &app.state.bracket;
    let Some(bracket) = state.bracket.as_ref() else {
        return Line::default();
    };

    let mut spans = vec![Span::raw(bracket.topology.label().to_string())];
    let decided = bracket.results().values().filter(|r| r.is_decided()).count();
    spans.push(Span::raw(format!(" | {decided}/{} decided", bracket.topology.series().len())));

    if let Some(champion) = bracket.champion() {
        let name = bracket
            .alliance(champion)
            .map(|a| a.display_name())
            .unwrap_or_else(|| format!("Alliance {champion}"));
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(format!("Champion: {name}"), resolve(ThemeColor::Accent, Theme::Dark)));
    }
    if let Some(focused) = state.focused_alliance {
        spans.push(Span::raw(format!(" | following A{focused}")));
    }
    if let Some(loaded) = state.last_loaded {
        spans.push(Span::styled(
            format!(" | loaded {}", loaded.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(format!(" | {err}"), Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn draw_series_detail(f: &mut Frame, area: Rect, bracket: &Bracket, key: SeriesKey) {
    let title = format!(" {} ", bracket.topology.series_name(key));
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    let Some(result) = bracket.result(key) else {
        lines.push(Line::from("Not scheduled yet"));
        if let Some(next) = bracket.topology.feeds_into(key) {
            lines.push(Line::from(format!("Winner advances to {}", bracket.topology.series_name(next))));
        }
        f.render_widget(Paragraph::new(lines), inner);
        return;
    };

    lines.push(Line::from(series_status(bracket, key, result)));
    lines.push(Line::default());
    for side in [Side::Red, Side::Blue] {
        lines.extend(side_detail_lines(bracket, side, result.side(side)));
    }
    if [Side::Red, Side::Blue].iter().any(|s| result.side(*s).sat_out().next().is_some()) {
        lines.push(Line::styled("* sat out the opening match", Style::default().fg(Color::DarkGray)));
    }
    if let Some(next) = bracket.topology.feeds_into(key) {
        lines.push(Line::from(format!("Winner advances to {}", bracket.topology.series_name(next))));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn side_detail_lines(bracket: &Bracket, side: Side, result: &SideResult) -> Vec<Line<'static>> {
    let style = side_style(side, Theme::Dark);
    let heading = match result.alliance.and_then(|n| bracket.alliance(n)) {
        Some(alliance) => format!("{}: {}", side.label(), alliance.display_name()),
        None => format!("{}: unmatched roster", side.label()),
    };
    let heading_style = if result.won_series { style.add_modifier(Modifier::BOLD) } else { style };

    let roster = result
        .full_roster
        .iter()
        .map(|t| roster_entry(t, result))
        .collect::<Vec<_>>()
        .join(" ");
    let games = result.games.iter().map(|g| g.to_string()).collect::<Vec<_>>().join("  ");

    vec![
        Line::styled(heading, heading_style),
        Line::from(format!("  Teams: {roster}")),
        Line::from(format!("  Games: {games}")),
    ]
}

fn roster_entry(team: &TeamKey, result: &SideResult) -> String {
    if result.played_roster.contains(team) {
        team_label(team).to_string()
    } else {
        format!("{}*", team_label(team))
    }
}

/// One-line progress summary for a series.
fn series_status(bracket: &Bracket, key: SeriesKey, result: &SeriesResult) -> String {
    if let Some(winner) = result.winner() {
        let who = result
            .side(winner)
            .alliance
            .map(|n| format!("Alliance {n}"))
            .unwrap_or_else(|| winner.label().to_string());
        return format!("{who} won");
    }

    let matches = bracket.matches(key);
    let played = matches.iter().filter(|m| m.is_played()).count();
    if played > 0 {
        return format!("In progress, {played} of {} played", matches.len());
    }
    match matches.iter().find_map(|m| m.scheduled_time) {
        Some(t) => format!("Scheduled {}", t.with_timezone(&Local).format("%a %H:%M")),
        None => "Scheduled".to_string(),
    }
}

fn draw_alliances(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Alliances ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bracket) = app.state.bracket.bracket.as_ref() else {
        draw_not_loaded(f, inner, app);
        return;
    };

    let header = Row::new(["#", "Name", "Teams", "Series", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = bracket
        .alliances()
        .iter()
        .map(|alliance| {
            let teams = alliance.team_keys.iter().map(team_label).collect::<Vec<_>>().join(" ");
            let record = series_record(bracket, alliance.number);
            let (status, style) = if alliance.is_winner {
                ("Winner", resolve(ThemeColor::Accent, Theme::Dark))
            } else if alliance.is_finalist {
                ("Finalist", Style::default().fg(Color::White))
            } else {
                ("", Style::default())
            };
            Row::new([
                Cell::from(alliance.number.to_string()),
                Cell::from(alliance.display_name()),
                Cell::from(teams),
                Cell::from(format!("{}-{}", record.won, record.lost)),
                Cell::from(status).style(style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(14),
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .row_highlight_style(resolve(ThemeColor::Selected, Theme::Dark).add_modifier(Modifier::REVERSED));

    let mut table_state = TableState::default().with_selected(Some(app.state.alliances.selected));
    f.render_stateful_widget(table, inner, &mut table_state);
}

fn draw_series_table(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Series ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bracket) = app.state.bracket.bracket.as_ref() else {
        draw_not_loaded(f, inner, app);
        return;
    };

    let header = Row::new(["Series", "Red", "Blue", "Games", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = bracket
        .topology
        .series()
        .iter()
        .map(|key| {
            let name = bracket.topology.series_short_name(*key);
            let Some(result) = bracket.result(*key) else {
                return Row::new([name, "TBD".into(), "TBD".into(), String::new(), "Not scheduled".into()])
                    .style(Style::default().fg(Color::DarkGray));
            };
            let games = result
                .red
                .games
                .iter()
                .zip(&result.blue.games)
                .map(|(r, b)| format!("{r}-{b}"))
                .collect::<Vec<_>>()
                .join(" ");
            Row::new([
                Cell::from(name),
                side_cell(result, Side::Red),
                side_cell(result, Side::Blue),
                Cell::from(games),
                Cell::from(series_status(bracket, *key, result)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Length(26),
        ],
    )
    .header(header)
    .row_highlight_style(resolve(ThemeColor::Selected, Theme::Dark).add_modifier(Modifier::REVERSED));

    let mut table_state = TableState::default().with_selected(Some(app.state.bracket.selected));
    f.render_stateful_widget(table, inner, &mut table_state);
}

fn side_cell(result: &SeriesResult, side: Side) -> Cell<'static> {
    let label = result
        .side(side)
        .alliance
        .map(|n| format!("A{n}"))
        .unwrap_or_else(|| "?".to_string());
    let mut style = side_style(side, Theme::Dark);
    if result.winner() == Some(side) {
        style = style.add_modifier(Modifier::BOLD);
    }
    Cell::from(label).style(style)
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = [
        "1 / 2 / 3      Bracket / Alliances / Series",
        "j k  ↓ ↑       select next / previous series",
        "l →            follow the winner to its next series",
        "h ←            step back to a feeding series",
        "Enter          focus the selected winner's path (Bracket)",
        "               show the alliance's path (Alliances)",
        "PgUp PgDn      scroll the bracket",
        "r              reload the event snapshot",
        "f              toggle full screen",
        "\"              toggle the log pane",
        "Esc            leave help",
        "q              quit",
    ];
    f.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
