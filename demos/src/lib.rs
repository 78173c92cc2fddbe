//! Interactive A* visualizer model, shared by the terminal binary and tests.
//!
//! The board is drawn on the left, two terminal columns per cell, with an
//! instruction panel on the right and a status line underneath. A running
//! search advances one step per [`Msg::Tick`], so the screen updates between
//! steps and input (cancel, quit) stays responsive.

use gridpath_core::{
    AttrMask, Canvas, Color, Glyph, Point, Range, Style,
    app::{Effect, Model, tick},
    messages::{Key, MouseAction, Msg},
};
use gridpath_search::{CellState, Edit, Outcome, Pos, Search, SearchError, Session, Step};
use log::{debug, info};

/// Terminal columns per board cell.
pub const CELL_WIDTH: i32 = 2;

// Colours
const COL_UNVISITED: Color = Color::from_rgb(255, 255, 255);
const COL_VISITED: Color = Color::from_rgb(255, 0, 0);
const COL_FRONTIER: Color = Color::from_rgb(0, 255, 0);
// Pure black is indistinguishable from `Color::DEFAULT`.
const COL_BARRIER: Color = Color::from_rgb(0, 0, 1);
const COL_START: Color = Color::from_rgb(255, 165, 0);
const COL_GOAL: Color = Color::from_rgb(64, 224, 208);
const COL_PATH: Color = Color::from_rgb(128, 0, 128);
const COL_STATUS_FG: Color = Color::from_rgb(200, 200, 200);
const COL_STATUS_BG: Color = Color::from_rgb(30, 30, 50);

const TITLE: &str = "Instructions:";
const INSTRUCTIONS: [&str; 6] = [
    "Left click to place the start point, then the end point, then barriers. Hold and drag to paint.",
    "Right click to clear cells.",
    "SPACE to start the A* shortest path search.",
    "ESC to stop a running search.",
    "C to clear the entire board.",
    "Q to quit.",
];
const BULLET: &str = "\u{2022} ";

/// Display colour of a cell state.
pub fn state_color(state: CellState) -> Color {
    match state {
        CellState::Unvisited => COL_UNVISITED,
        CellState::Frontier => COL_FRONTIER,
        CellState::Visited => COL_VISITED,
        CellState::Barrier => COL_BARRIER,
        CellState::Start => COL_START,
        CellState::Goal => COL_GOAL,
        CellState::Path => COL_PATH,
    }
}

/// Greedy word wrap: as many whole words per line as fit in `max_width`
/// characters. A word longer than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= max_width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Layout settings for a [`Visualizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Rows (and columns) of the board.
    pub rows: usize,
    /// Width of the instruction panel, in terminal columns.
    pub panel_width: i32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            panel_width: 34,
        }
    }
}

/// Result of the most recent run, shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastRun {
    Idle,
    Found { steps: usize, expanded: usize },
    NoPath { expanded: usize },
    Cancelled { expanded: usize },
    Rejected(SearchError),
}

/// The visualizer model.
pub struct Visualizer {
    config: VisualizerConfig,
    session: Session,
    search: Option<Search>,
    held: Option<MouseAction>,
    last: LastRun,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        let n = config.rows;
        Self {
            config,
            session: Session::new(n, (n as i32 * CELL_WIDTH) as u32),
            search: None,
            held: None,
            last: LastRun::Idle,
        }
    }

    /// Canvas size needed to show board, panel and status line.
    pub fn size(&self) -> (i32, i32) {
        let rows = self.config.rows as i32;
        (rows * CELL_WIDTH + 1 + self.config.panel_width, rows + 1)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_run(&self) -> &LastRun {
        &self.last
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    fn board_range(&self) -> Range {
        let rows = self.config.rows as i32;
        Range::new(0, 0, rows * CELL_WIDTH, rows)
    }

    /// Board cell under canvas point `p`, if any.
    fn cell_under(&self, p: Point) -> Option<Pos> {
        if !self.board_range().contains(p) {
            return None;
        }
        // The board is laid out with `cell_size == CELL_WIDTH` horizontally
        // and one line per row; scale `y` to the same unit.
        self.session.board().locate(p.x, p.y * CELL_WIDTH)
    }

    fn apply(&mut self, action: MouseAction, p: Point) {
        let Some(pos) = self.cell_under(p) else {
            return;
        };
        let edit = match action {
            MouseAction::Main => self.session.primary(pos),
            MouseAction::Secondary => self.session.secondary(pos),
            _ => Edit::Ignored,
        };
        if edit != Edit::Ignored {
            self.last = LastRun::Idle;
        }
    }

    fn start_search(&mut self) -> Option<Effect> {
        match self.session.begin() {
            Ok(search) => {
                info!(
                    "searching {:?} -> {:?}",
                    self.session.start(),
                    self.session.goal()
                );
                self.search = Some(search);
                self.held = None;
                Some(tick())
            }
            Err(e) => {
                debug!("search rejected: {e}");
                self.last = LastRun::Rejected(e);
                None
            }
        }
    }

    fn advance(&mut self) -> Option<Effect> {
        let search = self.search.as_mut()?;
        match self.session.step(search) {
            Step::Expanded(_) | Step::Marked(_) => Some(tick()),
            Step::Finished(outcome) => {
                let expanded = search.expanded();
                self.last = match outcome {
                    Outcome::Found(path) => LastRun::Found {
                        steps: path.steps(),
                        expanded,
                    },
                    Outcome::Exhausted => LastRun::NoPath { expanded },
                    Outcome::Cancelled => LastRun::Cancelled { expanded },
                };
                info!("search finished: {:?}", self.last);
                self.search = None;
                None
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut search) = self.search.take() {
            self.session.abandon(&mut search);
            self.last = LastRun::Cancelled {
                expanded: search.expanded(),
            };
            info!("search cancelled");
        }
    }

    fn status_text(&self) -> String {
        if let Some(search) = &self.search {
            return format!("Searching... {} expanded", search.expanded());
        }
        match &self.last {
            LastRun::Idle if self.session.ready() => "Ready: press SPACE".into(),
            LastRun::Idle if self.session.start().is_none() => "Place the start point".into(),
            LastRun::Idle => "Place the end point".into(),
            LastRun::Found { steps, expanded } => {
                format!("Path found: {steps} steps, {expanded} cells expanded")
            }
            LastRun::NoPath { expanded } => format!("No path ({expanded} cells expanded)"),
            LastRun::Cancelled { expanded } => {
                format!("Search cancelled after {expanded} expansions")
            }
            LastRun::Rejected(e) => format!("Cannot search: {e}"),
        }
    }

    fn draw_board(&self, canvas: &mut Canvas) {
        for cell in self.session.board().cells() {
            let style = Style::default().with_bg(state_color(cell.state()));
            let at = cell.pos().to_point(CELL_WIDTH);
            for dx in 0..CELL_WIDTH {
                canvas.set(at.shift(dx, 0), Glyph::new(' ', style));
            }
        }
    }

    fn draw_panel(&self, canvas: &mut Canvas) {
        let x = self.board_range().width() + 1;
        let width = self.config.panel_width.max(1) as usize;
        let text_style = Style::default();
        let mut y = 0;

        canvas.text(
            Point::new(x, y),
            TITLE,
            text_style.with_attrs(AttrMask::BOLD),
        );
        y += 2;

        for item in INSTRUCTIONS {
            let indent = BULLET.chars().count();
            for (i, line) in wrap_text(item, width.saturating_sub(indent).max(1))
                .iter()
                .enumerate()
            {
                let prefix = if i == 0 { BULLET } else { "  " };
                canvas.text(Point::new(x, y), &format!("{prefix}{line}"), text_style);
                y += 1;
            }
            y += 1;
        }
    }

    fn draw_status(&self, canvas: &mut Canvas) {
        let y = self.config.rows as i32;
        let style = Style::default()
            .with_fg(COL_STATUS_FG)
            .with_bg(COL_STATUS_BG);
        canvas.fill_range(
            Range::new(0, y, canvas.width(), y + 1),
            Glyph::new(' ', style),
        );
        canvas.text(Point::new(1, y), &self.status_text(), style);
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init | Msg::Screen { .. } => None,
            Msg::Quit => {
                self.cancel();
                Some(Effect::End)
            }
            Msg::Tick => self.advance(),

            // ---- Keyboard ----
            Msg::KeyDown { key } if self.is_searching() => match key {
                Key::Escape => {
                    self.cancel();
                    None
                }
                Key::Char('q') | Key::Char('Q') => {
                    self.cancel();
                    Some(Effect::End)
                }
                _ => None,
            },
            Msg::KeyDown { key } => match key {
                Key::Space => self.start_search(),
                Key::Char('c') | Key::Char('C') => {
                    self.session.clear();
                    self.last = LastRun::Idle;
                    None
                }
                Key::Escape | Key::Char('q') | Key::Char('Q') => Some(Effect::End),
                _ => None,
            },

            // ---- Mouse ----
            Msg::Mouse { .. } if self.is_searching() => None,
            Msg::Mouse { action, pos } => {
                match action {
                    MouseAction::Main | MouseAction::Secondary => {
                        self.held = Some(action);
                        self.apply(action, pos);
                    }
                    MouseAction::Move => {
                        if let Some(held) = self.held {
                            self.apply(held, pos);
                        }
                    }
                    MouseAction::Release => self.held = None,
                    MouseAction::Auxiliary => {}
                }
                None
            }
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        self.draw_board(canvas);
        self.draw_panel(canvas);
        self.draw_status(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Visualizer {
        Visualizer::new(VisualizerConfig {
            rows: 5,
            panel_width: 20,
        })
    }

    fn click(v: &mut Visualizer, action: MouseAction, row: i32, col: i32) {
        let p = Point::new(col * CELL_WIDTH, row);
        v.update(Msg::mouse(action, p));
        v.update(Msg::mouse(MouseAction::Release, p));
    }

    /// Feed ticks until the model stops asking for them.
    fn run_to_end(v: &mut Visualizer, effect: Option<Effect>) -> usize {
        let mut ticks = 0;
        let mut next = effect;
        while let Some(Effect::Cmd(f)) = next {
            let msg = f().expect("tick command yields a message");
            next = v.update(msg);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn wrap_keeps_whole_words() {
        assert_eq!(
            wrap_text("SPACE to start the search", 10),
            vec!["SPACE to", "start the", "search"]
        );
        assert_eq!(wrap_text("a verylongword b", 4), vec!["a", "verylongword", "b"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn clicks_map_to_board_cells() {
        let mut v = small();
        // Either column of a two-column cell hits the same cell.
        v.update(Msg::mouse(MouseAction::Main, Point::new(3, 2)));
        v.update(Msg::mouse(MouseAction::Release, Point::new(3, 2)));
        assert_eq!(v.session().start(), Some(Pos::new(2, 1)));
        // Outside the board: the panel and the status line.
        click(&mut v, MouseAction::Main, 0, 7);
        v.update(Msg::mouse(MouseAction::Main, Point::new(0, 5)));
        assert_eq!(v.session().goal(), None);
    }

    #[test]
    fn drag_paints_barriers_until_release() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 4, 4);
        v.update(Msg::mouse(MouseAction::Main, Point::new(0, 2)));
        v.update(Msg::mouse(MouseAction::Move, Point::new(2, 2)));
        v.update(Msg::mouse(MouseAction::Move, Point::new(4, 2)));
        v.update(Msg::mouse(MouseAction::Release, Point::new(4, 2)));
        v.update(Msg::mouse(MouseAction::Move, Point::new(6, 2)));
        let board = v.session().board();
        assert_eq!(board.count(CellState::Barrier), 3);
        assert!(board.cell_at(Pos::new(2, 2)).is_barrier());
        assert!(!board.cell_at(Pos::new(2, 3)).is_barrier());
    }

    #[test]
    fn space_runs_search_one_step_per_tick() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 0, 4);
        let effect = v.update(Msg::key(Key::Space));
        assert!(v.is_searching());
        let ticks = run_to_end(&mut v, effect);
        assert!(!v.is_searching());
        assert!(ticks > 4);
        assert!(matches!(v.last_run(), LastRun::Found { steps: 4, .. }));
        assert_eq!(v.session().board().count(CellState::Path), 3);
    }

    #[test]
    fn space_without_endpoints_is_rejected() {
        let mut v = small();
        assert!(v.update(Msg::key(Key::Space)).is_none());
        assert_eq!(v.last_run(), &LastRun::Rejected(SearchError::MissingStart));
    }

    #[test]
    fn escape_cancels_running_search() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 4, 4);
        let effect = v.update(Msg::key(Key::Space));
        if let Some(Effect::Cmd(f)) = effect {
            v.update(f().expect("tick"));
        }
        assert!(v.update(Msg::key(Key::Escape)).is_none());
        assert!(!v.is_searching());
        assert!(matches!(v.last_run(), LastRun::Cancelled { .. }));
        let board = v.session().board();
        assert!(board.cell_at(Pos::new(0, 0)).is_start());
        assert!(board.cell_at(Pos::new(4, 4)).is_goal());
        assert_eq!(board.count(CellState::Path), 0);
        // A stray tick after cancelling does nothing.
        assert!(v.update(Msg::Tick).is_none());
    }

    #[test]
    fn editing_is_ignored_while_searching() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 4, 4);
        v.update(Msg::key(Key::Space));
        click(&mut v, MouseAction::Main, 2, 2);
        v.update(Msg::key(Key::Char('c')));
        assert!(v.is_searching());
        assert_eq!(v.session().board().count(CellState::Barrier), 0);
        assert_eq!(v.session().start(), Some(Pos::new(0, 0)));
    }

    #[test]
    fn quit_ends_even_mid_search() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 4, 4);
        v.update(Msg::key(Key::Space));
        assert!(matches!(v.update(Msg::Quit), Some(Effect::End)));
        assert!(!v.is_searching());
        assert!(matches!(
            v.update(Msg::key(Key::Char('q'))),
            Some(Effect::End)
        ));
    }

    #[test]
    fn clear_resets_board() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 0, 0);
        click(&mut v, MouseAction::Main, 1, 1);
        click(&mut v, MouseAction::Main, 2, 2);
        v.update(Msg::key(Key::Char('c')));
        assert!(v.session().board().cells().all(|c| c.is_unvisited()));
        assert_eq!(v.session().start(), None);
    }

    #[test]
    fn draw_colours_cells_and_shows_status() {
        let mut v = small();
        click(&mut v, MouseAction::Main, 1, 2);
        let (w, h) = v.size();
        assert_eq!((w, h), (5 * CELL_WIDTH + 1 + 20, 6));
        let mut canvas = Canvas::new(w, h);
        v.draw(&mut canvas);
        for x in [4, 5] {
            assert_eq!(canvas.at(Point::new(x, 1)).style.bg, COL_START);
        }
        assert_eq!(canvas.at(Point::new(0, 0)).style.bg, COL_UNVISITED);
        assert_eq!(canvas.at(Point::new(11, 0)).ch, 'I');
        let status: String = (1..20).map(|x| canvas.at(Point::new(x, 5)).ch).collect();
        assert!(status.starts_with("Place the end point"));
    }
}
