// Application state for the TUI: a circular trace of probed input values
// plus the currently selected control.

use crate::backend::NetworkBackend;

/// Glyphs for values from -radius (first) to +radius (last).
const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Step applied by one nudge of a control.
pub const NUDGE: f64 = 0.1;

pub struct App<B: NetworkBackend> {
    pub backend: B,
    pub tick: u64,
    pub dt: f64,
    pub width: usize,           // number of columns (time window)
    pub trace: Vec<Vec<char>>,  // [probe][col]
    pub running: bool,
    pub selected: usize,        // index into controls
    pub selected_dim: usize,
    pub status: Option<String>, // last rejected action
}

impl<B: NetworkBackend> App<B> {
    /// `width` is clamped to at least one column.
    pub fn new(backend: B, width: usize, dt: f64) -> Self {
        let width = width.max(1);
        let rows = backend.probes().len();
        Self {
            backend,
            tick: 0,
            dt,
            width,
            trace: vec![vec![' '; width]; rows],
            running: false,
            selected: 0,
            selected_dim: 0,
            status: None,
        }
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    /// Advance the clock by one tick and write the sampled values into the
    /// current column.
    pub fn step(&mut self) {
        self.tick = self.tick.saturating_add(1);
        let col = (self.tick as usize) % self.width;
        let values = self.backend.sample(self.time());
        for (row, v) in self.trace.iter_mut().zip(values) {
            row[col] = level(v);
        }
    }

    pub fn selected_control(&self) -> Option<String> {
        self.backend.controls().get(self.selected).cloned()
    }

    pub fn next_control(&mut self) {
        let n = self.backend.controls().len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
            self.selected_dim = 0;
        }
    }

    pub fn move_dim(&mut self, forward: bool) {
        let dims = self
            .selected_control()
            .and_then(|name| self.backend.handle().graph().node(&name).map(|n| n.dimensions))
            .unwrap_or(1);
        self.selected_dim = if forward {
            (self.selected_dim + 1) % dims
        } else {
            (self.selected_dim + dims - 1) % dims
        };
    }

    /// Add `delta` to the selected dimension of the selected control.
    pub fn nudge(&mut self, delta: f64) {
        let Some(name) = self.selected_control() else {
            self.status = Some("no controllable inputs".to_string());
            return;
        };
        let mut values = match self.backend.handle().input_value(&name, self.time()) {
            Ok(v) => v,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };
        if let Some(v) = values.get_mut(self.selected_dim) {
            *v = ((*v + delta) * 100.0).round() / 100.0;
        }
        self.status = self.backend.set_control(&name, &values).err().map(|e| e.to_string());
    }
}

fn level(v: f64) -> char {
    let x = (v.clamp(-1.0, 1.0) + 1.0) / 2.0;
    LEVELS[(x * (LEVELS.len() - 1) as f64).round() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HandleBackend;
    use nef_core::Network;

    fn app_with_width(width: usize) -> App<HandleBackend> {
        let mut net = Network::new("net");
        net.make_input("input", vec![0.0, 0.0]).unwrap();
        net.make_input("switch", vec![0.0]).unwrap();
        App::new(HandleBackend::new(net.finalize().unwrap()), width, 0.01)
    }

    fn app() -> App<HandleBackend> {
        app_with_width(10)
    }

    #[test]
    fn levels_span_radius() {
        assert_eq!(level(-1.0), ' ');
        assert_eq!(level(0.0), '▄');
        assert_eq!(level(1.0), '█');
        assert_eq!(level(7.0), '█');
    }

    #[test]
    fn step_writes_current_column() {
        let mut app = app();
        app.step();
        assert_eq!(app.tick, 1);
        assert_eq!(app.trace.len(), 3);
        assert_eq!(app.trace[0][1], '▄');
    }

    #[test]
    fn zero_width_keeps_one_column() {
        let mut app = app_with_width(0);
        assert_eq!(app.width, 1);
        app.step();
        app.step();
        assert_eq!(app.tick, 2);
        assert!(app.trace.iter().all(|row| row.len() == 1));
        assert_eq!(app.trace[0][0], '▄');
    }

    #[test]
    fn nudge_selected_control() {
        let mut app = app();
        app.move_dim(true);
        app.nudge(NUDGE);
        app.nudge(NUDGE);
        let input = app.backend.handle().input_value("input", 0.0).unwrap();
        assert_eq!(input, vec![0.0, 0.2]);
        assert!(app.status.is_none());

        app.next_control();
        assert_eq!(app.selected_control().as_deref(), Some("switch"));
        assert_eq!(app.selected_dim, 0);
        app.nudge(-NUDGE);
        let switch = app.backend.handle().input_value("switch", 0.0).unwrap();
        assert_eq!(switch, vec![-0.1]);
    }
}
