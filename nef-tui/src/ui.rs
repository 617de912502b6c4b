// TUI rendering: input trace (time on X, probes on Y), network structure, status panel.

use std::io::Stdout;

use nef_core::{NodeKind, Weight};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::App;
use crate::backend::NetworkBackend;

const KEYS: &str =
    "[s] Step  [r] Run/Pause  [Tab] Next control  [←/→] Dimension  [↑/↓] Adjust  [q] Quit";

/// Draws the UI each frame:
/// - Top left: trace grid as rows (input dimensions) x columns (time, circular).
/// - Top right: nodes and connections of the finalized network.
/// - Bottom: Status including time, selected control, run state, controls.
pub fn draw<B: NetworkBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App<B>,
) -> anyhow::Result<()> {
    terminal.draw(|f| {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Percentage(80), Constraint::Percentage(20)].as_ref())
            .split(f.size());
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
            .split(rows[0]);

        // Each row: "name[d] |....."
        let label_width = app
            .backend
            .probes()
            .iter()
            .map(|p| p.node.len() + 2 + p.dim.to_string().len())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = app
            .backend
            .probes()
            .iter()
            .zip(&app.trace)
            .map(|(p, row)| {
                let label = format!("{}[{}]", p.node, p.dim);
                let cells: String = row.iter().collect();
                format!("{:<width$} |{}", label, cells, width = label_width)
            })
            .collect();
        let trace_widget = Paragraph::new(Text::from(lines.join("\n")))
            .block(Block::default().title("Inputs  (time →)").borders(Borders::ALL))
            .style(Style::default().fg(Color::White));
        f.render_widget(trace_widget, top[0]);

        let graph = app.backend.handle().graph();
        let mut structure = Vec::with_capacity(graph.len() + graph.connections().len() + 1);
        for n in graph.nodes() {
            structure.push(match &n.kind {
                NodeKind::Input(i) if i.controllable => {
                    format!("◇ {} ({}-D, control)", n.name, n.dimensions)
                }
                NodeKind::Input(_) => format!("◇ {} ({}-D)", n.name, n.dimensions),
                NodeKind::Population(p) => {
                    format!(
                        "○ {} ({} units, {}-D, {:?})",
                        n.name, p.units, n.dimensions, p.options.mode
                    )
                }
            });
        }
        structure.push(String::new());
        let name_of = |id| graph.node_by_id(id).map(|n| n.name.as_str()).unwrap_or("?");
        for c in graph.connections() {
            let weight = match &c.weight {
                Weight::Identity => String::new(),
                Weight::Scalar(w) => format!(" ×{}", w),
                Weight::Matrix(m) => {
                    format!(" ×[{}x{}]", m.len(), m.first().map(|r| r.len()).unwrap_or(0))
                }
            };
            structure.push(format!(
                "{} → {}:{}{}{}",
                name_of(c.source.node),
                name_of(c.destination.node),
                c.destination.signal,
                weight,
                if c.learning_rate.is_some() { " (learned)" } else { "" }
            ));
        }
        let structure_widget = Paragraph::new(Text::from(structure.join("\n")))
            .block(Block::default().title(graph.name().to_string()).borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        f.render_widget(structure_widget, top[1]);

        // Status and controls
        let control = match app.selected_control() {
            Some(name) => {
                let values =
                    app.backend.handle().input_value(&name, app.time()).unwrap_or_default();
                format!("{}[{}] = {:?}", name, app.selected_dim, values)
            }
            None => "none".to_string(),
        };
        let mut status = format!(
            "t: {:.2}s | Control: {} | Running: {}\n{}",
            app.time(),
            control,
            if app.running { "yes" } else { "no" },
            KEYS
        );
        if let Some(msg) = &app.status {
            status.push_str(&format!("\n{}", msg));
        }
        let status_widget = Paragraph::new(status)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status_widget, rows[1]);
    })?;
    Ok(())
}
