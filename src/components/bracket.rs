use playoff_engine::snapshot::team_label;
use playoff_engine::{
    AllianceNumber, Bracket, BoundingBox, CardGeometry, CompLevel, ConnectorPath, CubicCurve, PathProjector,
    SeriesKey, Side, SideResult, Topology,
};
use std::collections::HashMap;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{Theme, ThemeColor, resolve, side_style};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per card: top border with title, red row, blue row, bottom border.
pub const CARD_HEIGHT: u16 = 4;

/// Vertical distance between two cards stacked in the same column.
const ROW_STRIDE: u16 = CARD_HEIGHT + 1;

/// Width of the gap between card columns where connectors are drawn.
pub const CONNECTOR_WIDTH: u16 = 4;

/// Card width in wide terminals.
const CELL_W_FULL: u16 = 26;

/// Narrowest card that still fits an alliance tag and one score.
const CELL_W_MIN: u16 = 14;

// ---------------------------------------------------------------------------
// Slot tables: where each series sits, per topology
// ---------------------------------------------------------------------------

/// Grid position of one card: `half_row` counts half-card steps so a
/// parent can sit centered between its two feeders.
#[derive(Debug, Clone, Copy)]
struct Slot {
    key: SeriesKey,
    col: u16,
    half_row: u16,
}

const fn slot(level: CompLevel, set: u32, col: u16, half_row: u16) -> Slot {
    Slot { key: SeriesKey::new(level, set), col, half_row }
}

const fn finals(col: u16, half_row: u16) -> Slot {
    Slot { key: SeriesKey::FINALS, col, half_row }
}

use playoff_engine::CompLevel::{Eighth as EF, Quarter as QF, Semi as SF};

// Upper bracket on top, lower bracket below, Finals on the far right.
const DOUBLE_ELIM_8_SLOTS: [Slot; 14] = [
    slot(SF, 1, 0, 0),
    slot(SF, 2, 0, 2),
    slot(SF, 3, 0, 4),
    slot(SF, 4, 0, 6),
    slot(SF, 7, 1, 1),
    slot(SF, 8, 1, 5),
    slot(SF, 11, 2, 3),
    slot(SF, 5, 0, 9),
    slot(SF, 6, 0, 11),
    slot(SF, 10, 1, 9),
    slot(SF, 9, 1, 11),
    slot(SF, 12, 2, 10),
    slot(SF, 13, 3, 10),
    finals(4, 6),
];

const DOUBLE_ELIM_4_SLOTS: [Slot; 6] = [
    slot(SF, 1, 0, 0),
    slot(SF, 2, 0, 2),
    slot(SF, 4, 1, 1),
    slot(SF, 3, 1, 4),
    slot(SF, 5, 2, 4),
    finals(3, 2),
];

const BRACKET_4_SLOTS: [Slot; 3] = [slot(SF, 1, 0, 0), slot(SF, 2, 0, 2), finals(1, 1)];

const BRACKET_8_SLOTS: [Slot; 7] = [
    slot(QF, 1, 0, 0),
    slot(QF, 2, 0, 2),
    slot(QF, 3, 0, 4),
    slot(QF, 4, 0, 6),
    slot(SF, 1, 1, 1),
    slot(SF, 2, 1, 5),
    finals(2, 3),
];

const BRACKET_16_SLOTS: [Slot; 15] = [
    slot(EF, 1, 0, 0),
    slot(EF, 2, 0, 2),
    slot(EF, 3, 0, 4),
    slot(EF, 4, 0, 6),
    slot(EF, 5, 0, 8),
    slot(EF, 6, 0, 10),
    slot(EF, 7, 0, 12),
    slot(EF, 8, 0, 14),
    slot(QF, 1, 1, 1),
    slot(QF, 2, 1, 5),
    slot(QF, 3, 1, 9),
    slot(QF, 4, 1, 13),
    slot(SF, 1, 2, 3),
    slot(SF, 2, 2, 11),
    finals(3, 7),
];

fn slots(topology: Topology) -> &'static [Slot] {
    match topology {
        Topology::DoubleElim8 => &DOUBLE_ELIM_8_SLOTS,
        Topology::DoubleElim4 => &DOUBLE_ELIM_4_SLOTS,
        Topology::Bracket4 => &BRACKET_4_SLOTS,
        Topology::Bracket8 => &BRACKET_8_SLOTS,
        Topology::Bracket16 => &BRACKET_16_SLOTS,
    }
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine for one topology
// ---------------------------------------------------------------------------

/// Laid-out position of one series card, relative to the grid origin.
#[derive(Debug, Clone, Copy)]
pub struct CardCell {
    pub key: SeriesKey,
    pub rect: Rect,
}

impl CardCell {
    /// Boxes handed to the path projector. Row boxes span the full card
    /// width so anchors land on the card's outer edge.
    pub fn geometry(&self) -> CardGeometry {
        let Rect { x, y, width, height } = self.rect;
        let (x, y, w) = (f64::from(x), f64::from(y), f64::from(width));
        CardGeometry {
            card: Some(BoundingBox::new(x, y, w, f64::from(height))),
            red_row: Some(BoundingBox::new(x, y + 1.0, w, 1.0)),
            blue_row: Some(BoundingBox::new(x, y + 2.0, w, 1.0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BracketGrid {
    pub topology: Topology,
    pub cells: Vec<CardCell>,
    pub cell_width: u16,
    pub total_width: u16,
    pub total_height: u16,
}

impl BracketGrid {
    /// Lay out `topology` for an area `available_width` columns wide.
    /// Rebuild on every resize; the projector runs against the result.
    pub fn compute(topology: Topology, available_width: u16) -> Self {
        let table = slots(topology);
        let columns = table.iter().map(|s| s.col).max().unwrap_or(0) + 1;
        let connector_total = CONNECTOR_WIDTH * (columns - 1);
        let per_col = available_width.saturating_sub(connector_total) / columns;
        let cell_width = per_col.clamp(CELL_W_MIN, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;

        let cells: Vec<CardCell> = table
            .iter()
            .map(|s| CardCell {
                key: s.key,
                rect: Rect::new(s.col * stride, s.half_row * ROW_STRIDE / 2, cell_width, CARD_HEIGHT),
            })
            .collect();

        let total_width = stride * (columns - 1) + cell_width;
        let total_height = cells.iter().map(|c| c.rect.y + c.rect.height).max().unwrap_or(0);
        Self { topology, cells, cell_width, total_width, total_height }
    }

    pub fn cell(&self, key: SeriesKey) -> Option<&CardCell> {
        self.cells.iter().find(|c| c.key == key)
    }

    pub fn geometry(&self) -> HashMap<SeriesKey, CardGeometry> {
        self.cells.iter().map(|c| (c.key, c.geometry())).collect()
    }

    /// Grid-space container; projected curves come back in grid coordinates.
    pub fn container(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, f64::from(self.total_width), f64::from(self.total_height))
    }

    pub fn projector(&self) -> PathProjector {
        PathProjector::new(f64::from(CONNECTOR_WIDTH) / 2.0)
    }

    pub fn connectors(&self, bracket: &Bracket) -> Vec<ConnectorPath> {
        bracket.project(&self.projector(), &self.geometry(), self.container())
    }
}

// ---------------------------------------------------------------------------
// Curve rasterization
// ---------------------------------------------------------------------------

/// Walk a curve cell by cell, producing a 4-connected run of grid cells.
pub fn rasterize(curve: &CubicCurve) -> Vec<(i32, i32)> {
    let span = (curve.end.x - curve.start.x).abs() + (curve.end.y - curve.start.y).abs();
    let steps = ((span * 4.0).ceil() as usize).max(8);

    let mut cells: Vec<(i32, i32)> = Vec::new();
    for p in curve.sample(steps) {
        let target = (p.x.floor() as i32, p.y.floor() as i32);
        let Some(&(mut x, mut y)) = cells.last() else {
            cells.push(target);
            continue;
        };
        // Horizontal first so turns read as corners.
        while (x, y) != target {
            if x != target.0 {
                x += (target.0 - x).signum();
            } else {
                y += (target.1 - y).signum();
            }
            cells.push((x, y));
        }
    }
    cells
}

/// Box-drawing glyph for every cell of a rasterized connector.
///
/// The line enters from the left (source card) and leaves to the right
/// (destination card).
pub fn connector_glyphs(curve: &CubicCurve) -> Vec<(i32, i32, char)> {
    let cells = rasterize(curve);
    cells
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let prev = if i == 0 { (x - 1, y) } else { cells[i - 1] };
            let next = cells.get(i + 1).copied().unwrap_or((x + 1, y));
            (x, y, glyph_for((prev.0 - x, prev.1 - y), (next.0 - x, next.1 - y)))
        })
        .collect()
}

fn glyph_for(a: (i32, i32), b: (i32, i32)) -> char {
    let has = |d: (i32, i32)| a == d || b == d;
    let (left, right, up, down) = (has((-1, 0)), has((1, 0)), has((0, -1)), has((0, 1)));
    match (left, right, up, down) {
        (_, _, true, true) => '│',
        (false, true, false, true) => '╭',
        (true, false, false, true) => '╮',
        (false, true, true, false) => '╰',
        (true, false, true, false) => '╯',
        (false, false, _, _) => '│',
        _ => '─',
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders every card of the bracket plus the winners' connector lines.
pub struct BracketView<'a> {
    pub bracket: &'a Bracket,
    /// Layout for the area this view is rendered into.
    pub grid: &'a BracketGrid,
    pub selected: Option<SeriesKey>,
    /// Alliance whose connectors are drawn emphasized.
    pub focused_alliance: Option<AllianceNumber>,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
    pub theme: Theme,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CELL_W_MIN || area.height < CARD_HEIGHT {
            return;
        }

        // Pass 1: connectors, so card borders overwrite the line ends.
        for path in self.grid.connectors(self.bracket) {
            let mut style = side_style(path.winning_side, self.theme);
            if self.focused_alliance == Some(path.alliance) {
                style = style.add_modifier(Modifier::BOLD);
            }
            for (gx, gy, ch) in connector_glyphs(&path.curve) {
                let (Ok(gx), Ok(gy)) = (u16::try_from(gx), u16::try_from(gy)) else {
                    continue;
                };
                let Some(sy) = screen_y(gy, self.scroll_offset, area) else {
                    continue;
                };
                let sx = area.x.saturating_add(gx);
                if sx < area.x + area.width {
                    put_char(buf, sx, sy, ch, style);
                }
            }
        }

        // Pass 2: cards.
        for cell in &self.grid.cells {
            let selected = self.selected == Some(cell.key);
            draw_card(self.bracket, cell, selected, area, self.scroll_offset, self.theme, buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Card drawing helpers
// ---------------------------------------------------------------------------

/// Convert a grid-relative row to an absolute screen y, applying scroll + area bounds.
/// Returns `None` if the row is off-screen.
fn screen_y(grid_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if grid_row < scroll {
        return None;
    }
    let rel = grid_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn draw_card(bracket: &Bracket, cell: &CardCell, selected: bool, area: Rect, scroll: u16, theme: Theme, buf: &mut Buffer) {
    let x = area.x.saturating_add(cell.rect.x);
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;
    let width = cell.rect.width as usize;
    let inner_w = width.saturating_sub(2);

    let border = if selected { resolve(ThemeColor::Selected, theme) } else { resolve(ThemeColor::Dim, theme) };
    let result = bracket.result(cell.key);
    let title = if width < 20 {
        bracket.topology.series_short_name(cell.key)
    } else {
        bracket.topology.series_name(cell.key)
    };

    for dy in 0..CARD_HEIGHT {
        let Some(sy) = screen_y(cell.rect.y + dy, scroll, area) else {
            continue;
        };
        let side = match dy {
            0 => {
                draw_clipped(buf, x, sy, &format_title_line(&title, width), border, avail_w);
                continue;
            }
            1 => Side::Red,
            2 => Side::Blue,
            _ => {
                draw_clipped(buf, x, sy, &format!("╰{}╯", "─".repeat(inner_w)), border, avail_w);
                continue;
            }
        };
        let content = format_side_line(result.map(|r| r.side(side)), inner_w);
        let content_style = side_row_style(side, result.and_then(|r| r.winner()), theme);
        draw_clipped(buf, x, sy, "│", border, avail_w);
        draw_clipped(buf, x + 1, sy, &content, content_style, avail_w.saturating_sub(1));
        draw_clipped(buf, x + 1 + inner_w as u16, sy, "│", border, avail_w.saturating_sub(1 + inner_w));
    }
}

fn draw_clipped(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style, avail: usize) {
    if avail == 0 {
        return;
    }
    let clipped: String = text.chars().take(avail).collect();
    buf.set_string(x, y, &clipped, style);
}

fn side_row_style(side: Side, winner: Option<Side>, theme: Theme) -> Style {
    match winner {
        Some(w) if w == side => side_style(side, theme).add_modifier(Modifier::BOLD),
        Some(_) => resolve(ThemeColor::Eliminated, theme),
        None => side_style(side, theme),
    }
}

/// `╭ Match 7 ────────╮`, truncating the title to fit.
pub fn format_title_line(title: &str, width: usize) -> String {
    let inner_w = width.saturating_sub(2);
    let label: String = format!(" {title} ").chars().take(inner_w).collect();
    let fill = inner_w.saturating_sub(label.chars().count());
    format!("╭{label}{}╮", "─".repeat(fill))
}

/// One side's row: `"A1 254 1678 971  142  -"`.
///
/// Alliance tag (or raw team numbers when the roster matched no alliance),
/// then one right-aligned score column per game. Exactly `width` chars.
pub fn format_side_line(side: Option<&SideResult>, width: usize) -> String {
    let Some(side) = side else {
        return format!("{:<width$}", " TBD").chars().take(width).collect();
    };

    let scores: String = side.games.iter().map(|g| format!("{:>4}", g.to_string())).collect();
    let teams = side
        .played_roster
        .iter()
        .map(team_label)
        .collect::<Vec<_>>()
        .join(" ");
    let label = match side.alliance {
        Some(n) => format!(" A{n} {teams}"),
        None => format!(" {teams}"),
    };

    let score_w = scores.chars().count().min(width);
    let name_w = width - score_w;
    let name: String = label.chars().take(name_w).collect();
    let line = format!("{name:<name_w$}{scores}");
    line.chars().take(width).collect()
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
