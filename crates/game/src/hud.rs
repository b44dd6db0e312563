//! Cockpit presentation: the OLED-style text screens, the distance readout, and log telemetry.

use std::io::Write;
use std::time::Duration;

use input::Levers;
use lander::{ApproachPhase, LanderConfig, LanderSnapshot, Outcome};

/// Everything shown for one tick: the lander state plus the levers sampled that tick.
#[derive(Debug, Clone, Copy)]
pub struct CockpitView {
    pub lander: LanderSnapshot,
    pub levers: Levers,
}

/// The final screen of an approach.
#[derive(Debug, Clone, Copy)]
pub struct Ending {
    pub outcome: Outcome,
    pub elapsed: Duration,
    pub lander: LanderSnapshot,
}

/// Consumer of per-tick state. Called after `advance` and before the next sample.
pub trait PresentationSink {
    fn render(&mut self, view: &CockpitView);

    /// Called once when the lander arrives.
    fn game_over(&mut self, _ending: &Ending) {}
}

impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    fn render(&mut self, view: &CockpitView) {
        self.0.render(view);
        self.1.render(view);
    }

    fn game_over(&mut self, ending: &Ending) {
        self.0.game_over(ending);
        self.1.game_over(ending);
    }
}

// ── Radar geometry ─────────────────────────────────────────────────────────

/// Drift beyond which the radar shows a direction arrow, per axis.
pub const DRIFT_BEFORE_ARROW: i32 = 2;
/// Radar circle radius in display pixels.
pub const RADAR_RADIUS_PX: i32 = 25;

/// Direction from the radar centre to the mother ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Arrow {
    /// Arrow for a drift offset, `None` while the ship is close to centre.
    /// Screen y grows downwards, so negative y drift points up.
    pub fn for_drift(drift_x: i32, drift_y: i32) -> Option<Self> {
        let up = drift_y < -DRIFT_BEFORE_ARROW;
        let down = drift_y > DRIFT_BEFORE_ARROW;
        if drift_x < -DRIFT_BEFORE_ARROW {
            Some(if up { Self::UpLeft } else if down { Self::DownLeft } else { Self::Left })
        } else if drift_x > DRIFT_BEFORE_ARROW {
            Some(if up { Self::UpRight } else if down { Self::DownRight } else { Self::Right })
        } else if up {
            Some(Self::Up)
        } else if down {
            Some(Self::Down)
        } else {
            None
        }
    }

    fn glyph(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
            Self::UpLeft | Self::DownRight => '\\',
            Self::UpRight | Self::DownLeft => '/',
        }
    }

    /// Unit step towards the radar rim.
    fn direction(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (1, -1),
            Self::DownLeft => (-1, 1),
            Self::DownRight => (1, 1),
        }
    }
}

/// Size of the mother ship on the radar, in pixels. The ship grows as the lander closes in.
pub fn ship_size(distance: i32, config: &LanderConfig) -> (i32, i32) {
    let segment_size = (config.initial_distance / (config.max_ship_width - 1).max(1)).max(1);
    let segment = (distance / segment_size).max(0);
    let width = (config.max_ship_width - segment).max(1);
    let height = (config.max_ship_height - segment).max(1);
    (width, height)
}

const PX_PER_COL: i32 = 2;
const PX_PER_ROW: i32 = 4;
const HALF_COLS: i32 = RADAR_RADIUS_PX / PX_PER_COL;
const HALF_ROWS: i32 = RADAR_RADIUS_PX / PX_PER_ROW;
const RADAR_COLS: usize = (2 * HALF_COLS + 1) as usize;
const RADAR_ROWS: usize = (2 * HALF_ROWS + 1) as usize;

/// Character grid for the radar scope.
struct Scope {
    cells: [[char; RADAR_COLS]; RADAR_ROWS],
}

impl Scope {
    fn new() -> Self {
        let mut cells = [[' '; RADAR_COLS]; RADAR_ROWS];
        let radius = RADAR_RADIUS_PX as f32;
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let dx = ((col as i32 - HALF_COLS) * PX_PER_COL) as f32;
                let dy = ((row as i32 - HALF_ROWS) * PX_PER_ROW) as f32;
                if ((dx * dx + dy * dy).sqrt() - radius).abs() < 2.0 {
                    *cell = '.';
                }
            }
        }
        cells[HALF_ROWS as usize][HALF_COLS as usize] = '+';
        Self { cells }
    }

    /// Put `c` at the cell covering pixel offset (`x`, `y`) from centre. Off-scope pixels are clipped.
    fn plot(&mut self, x: i32, y: i32, c: char) {
        let col = HALF_COLS + (x as f32 / PX_PER_COL as f32).round() as i32;
        let row = HALF_ROWS + (y as f32 / PX_PER_ROW as f32).round() as i32;
        if (0..RADAR_COLS as i32).contains(&col) && (0..RADAR_ROWS as i32).contains(&row) {
            self.cells[row as usize][col as usize] = c;
        }
    }

    fn frame(&mut self, left: i32, top: i32, width: i32, height: i32) {
        let right = left + width - 1;
        let bottom = top + height - 1;
        for x in left..=right {
            self.plot(x, top, '#');
            self.plot(x, bottom, '#');
        }
        for y in top..=bottom {
            self.plot(left, y, '#');
            self.plot(right, y, '#');
        }
    }

    fn lines(&self) -> Vec<String> {
        self.cells.iter().map(|row| row.iter().collect()).collect()
    }
}

fn radar_lines(lander: &LanderSnapshot, config: &LanderConfig) -> Vec<String> {
    let mut scope = Scope::new();
    if let Some(arrow) = Arrow::for_drift(lander.drift_x, lander.drift_y) {
        let (dx, dy) = arrow.direction();
        scope.plot(dx * (RADAR_RADIUS_PX - 3), dy * (RADAR_RADIUS_PX - 6), arrow.glyph());
    }
    let (width, height) = ship_size(lander.distance, config);
    scope.frame(lander.drift_x - width / 2, lander.drift_y - height / 2, width, height);
    scope.lines()
}

// ── Text screens ───────────────────────────────────────────────────────────

fn on_off(val: bool) -> &'static str {
    if val { "ON" } else { "OFF" }
}

/// Gear status line shown on final approach.
pub fn gear_status(gear_index: usize, config: &LanderConfig) -> &'static str {
    if gear_index == 0 {
        "Drop gear"
    } else if gear_index < config.gear_down_index() {
        "Lowering"
    } else {
        "Gear OK"
    }
}

/// Elapsed time as seconds with milliseconds, e.g. `"  12.345 Sec"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    format!("{:4}.{:03} Sec", ms / 1000, ms % 1000)
}

fn gear_gauge(gear_index: usize, config: &LanderConfig) -> String {
    let frames = config.gear_frame_count.max(1);
    let lowered = gear_index.min(frames - 1);
    format!("[{}{}]", "|".repeat(lowered), " ".repeat(frames - 1 - lowered))
}

/// Screen text for one tick.
pub fn screen_text(view: &CockpitView, config: &LanderConfig) -> Vec<String> {
    let lander = &view.lander;
    match lander.phase {
        ApproachPhase::Init | ApproachPhase::Preflight => vec![
            "Exploration Lander".to_string(),
            "Approach Sequence".to_string(),
            String::new(),
            format!("Thrusters: {}", on_off(view.levers.thrust)),
            format!("Systems  : {}", on_off(view.levers.systems)),
            format!("Confirm  : {}", on_off(view.levers.confirm)),
            format!("Countdown {}", lander.phase.label()),
        ],
        ApproachPhase::InFlight | ApproachPhase::Final => {
            let mut panel = vec![format!("SPD: {:2}", lander.speed), format!("DST: {:4}", lander.distance)];
            if lander.phase == ApproachPhase::Final {
                panel.push(String::new());
                panel.push(gear_status(lander.gear_index, config).to_string());
                panel.push(gear_gauge(lander.gear_index, config));
            }
            radar_lines(lander, config)
                .into_iter()
                .enumerate()
                .map(|(i, radar)| match panel.get(i) {
                    Some(text) => format!("{radar}  {text}"),
                    None => radar,
                })
                .collect()
        }
    }
}

/// Ending screen text.
pub fn ending_text(ending: &Ending, config: &LanderConfig) -> Vec<String> {
    let lander = &ending.lander;
    vec![
        format_elapsed(ending.elapsed),
        ending.outcome.headline().to_string(),
        format!(
            "SPD: {}  Drift: ({}, {})  {}",
            lander.speed,
            lander.drift_x,
            lander.drift_y,
            gear_status(lander.gear_index, config)
        ),
    ]
}

/// The 4-digit 7-segment distance display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DistanceReadout {
    value: Option<i32>,
}

impl DistanceReadout {
    pub fn show(&mut self, distance: i32) {
        self.value = Some(distance);
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Four characters as the display shows them.
    pub fn digits(&self) -> String {
        match self.value {
            None => "    ".to_string(),
            Some(v) if !(-999..=9999).contains(&v) => "----".to_string(),
            Some(v) => format!("{v:>4}"),
        }
    }
}

/// Text cockpit written to a terminal or any other writer.
pub struct TextCockpit<W: Write> {
    out: W,
    config: LanderConfig,
    readout: DistanceReadout,
    /// Clear the terminal before each frame.
    clear: bool,
    write_failed: bool,
}

impl TextCockpit<std::io::Stdout> {
    pub fn stdout(config: LanderConfig, clear: bool) -> Self {
        Self::new(std::io::stdout(), config, clear)
    }
}

impl<W: Write> TextCockpit<W> {
    pub fn new(out: W, config: LanderConfig, clear: bool) -> Self {
        Self {
            out,
            config,
            readout: DistanceReadout::default(),
            clear,
            write_failed: false,
        }
    }

    pub fn readout(&self) -> &DistanceReadout {
        &self.readout
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String]) {
        let mut text = String::new();
        if self.clear {
            text.push_str("\x1b[2J\x1b[H");
        } else {
            text.push_str("----------------------------------------\n");
        }
        for line in lines {
            text.push_str(line.trim_end());
            text.push('\n');
        }
        text.push_str(&format!("[{}]\n", self.readout.digits()));

        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            if !self.write_failed {
                log::warn!("Cockpit display write failed: {}", e);
                self.write_failed = true;
            }
        }
    }
}

impl<W: Write> PresentationSink for TextCockpit<W> {
    fn render(&mut self, view: &CockpitView) {
        self.readout.show(view.lander.distance);
        let lines = screen_text(view, &self.config);
        self.write_lines(&lines);
    }

    fn game_over(&mut self, ending: &Ending) {
        self.readout.clear();
        let lines = ending_text(ending, &self.config);
        self.write_lines(&lines);
    }
}

/// Sink that logs a one-line summary per tick.
#[derive(Debug, Default)]
pub struct LogTelemetry {
    last_phase: Option<ApproachPhase>,
}

impl PresentationSink for LogTelemetry {
    fn render(&mut self, view: &CockpitView) {
        let l = &view.lander;
        if self.last_phase != Some(l.phase) {
            log::debug!("Cockpit now showing {} screen", l.phase.label());
            self.last_phase = Some(l.phase);
        }
        log::debug!(
            "phase={} dist={} spd={} drift=({}, {}) gear={} {:?}",
            l.phase.label(),
            l.distance,
            l.speed,
            l.drift_x,
            l.drift_y,
            l.gear_index,
            l.gear_state
        );
    }

    fn game_over(&mut self, ending: &Ending) {
        log::info!("Landed: {:?} after {}", ending.outcome, format_elapsed(ending.elapsed).trim());
    }
}
