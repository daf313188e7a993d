use anyhow::Result;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::Write;

use upkeep_compute::{Evaluation, ModelReport};
use upkeep_core::Zone;

/// Width of the risk bar in characters.
const BAR_WIDTH: usize = 30;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const WARNING: Color = Color::Yellow;
    const DIM: Color = Color::DarkGrey;
    const SAFE: Color = Color::Green;
    const ORANGE: Color = Color::Rgb { r: 255, g: 165, b: 0 };
    const DANGER: Color = Color::Red;

    fn zone(zone: Zone) -> Color {
        match zone {
            Zone::Safe => Self::SAFE,
            Zone::Warning => Self::ORANGE,
            Zone::Danger => Self::DANGER,
        }
    }
}

/// Filled/empty block bar for a score in [0, 1].
pub fn render_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Renders evaluation results as colored text.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    pub fn print_evaluation<W: Write>(&self, out: &mut W, eval: &Evaluation) -> Result<()> {
        let r = &eval.reading;
        queue!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print("Predictive Maintenance System\n"),
            ResetColor,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "Temperature: {} | Vibration: {} | Pressure: {}\n",
                r.temperature, r.vibration, r.pressure
            )),
            ResetColor,
            Print(format!(
                "Maintenance Probability: {:.2}\n",
                eval.decision.probability
            )),
        )?;

        if eval.decision.rule_triggered {
            let fired: Vec<String> = eval.breached_rules.iter().map(|f| f.to_string()).collect();
            queue!(
                out,
                SetForegroundColor(Colors::WARNING),
                Print(format!(
                    "Rule Triggered: Extreme condition detected ({})\n",
                    fired.join(", ")
                )),
                ResetColor,
            )?;
        }

        let verdict = if eval.decision.final_decision {
            "Decision: Maintenance Needed\n"
        } else {
            "Decision: No Maintenance Needed\n"
        };
        let zone_color = Colors::zone(eval.risk.zone);
        queue!(
            out,
            Print(verdict),
            Print("Risk: "),
            SetForegroundColor(zone_color),
            Print(render_bar(eval.risk.score, BAR_WIDTH)),
            Print(format!(" {:.2} {}\n", eval.risk.score, eval.risk.zone)),
            ResetColor,
        )?;
        out.flush()?;
        Ok(())
    }

    pub fn print_model_report<W: Write>(&self, out: &mut W, report: &ModelReport) -> Result<()> {
        let accuracy = report
            .test_accuracy
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "n/a".to_string());
        let [t, v, p] = report.coefficients;
        queue!(
            out,
            SetForegroundColor(Colors::DIM),
            Print("---\n"),
            Print(format!(
                "Model: {} train / {} test rows, held-out accuracy {}\n",
                report.train_size, report.test_size, accuracy
            )),
            Print(format!(
                "Coefficients: temperature={:.4} vibration={:.4} pressure={:.4} intercept={:.4} ({} iterations)\n",
                t, v, p, report.intercept, report.iterations
            )),
            ResetColor,
        )?;
        out.flush()?;
        Ok(())
    }
}
