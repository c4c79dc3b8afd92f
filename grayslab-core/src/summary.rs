//! Text summary of a run.
//!
//! The historical report prints the *final* atmosphere temperature under the
//! label "Atmosphere maximum temperature". [`SummaryStyle::Legacy`] keeps that
//! output byte for byte. [`SummaryStyle::Corrected`] reports the final value
//! and the true maximum under their own labels.

use crate::errors::GraySlabResult;
use crate::integrator::SimulationResult;
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// Two lines, final atmosphere temperature under the "maximum" label
    #[default]
    Legacy,
    /// Three lines with accurate labels
    Corrected,
}

impl FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(SummaryStyle::Legacy),
            "corrected" => Ok(SummaryStyle::Corrected),
            other => Err(format!(
                "unknown summary style '{}', expected 'legacy' or 'corrected'",
                other
            )),
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryStyle::Legacy => write!(f, "legacy"),
            SummaryStyle::Corrected => write!(f, "corrected"),
        }
    }
}

/// Scalars reported at the end of a run (K)
///
/// The maxima are `NaN` for a run with no steps; the final atmosphere
/// temperature is then the initial 0 K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub earth_maximum: FloatValue,
    pub atmosphere_final: FloatValue,
    pub atmosphere_maximum: FloatValue,
}

impl Summary {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            earth_maximum: result.max_surface_temperature().unwrap_or(FloatValue::NAN),
            atmosphere_final: result.final_atmosphere_temperature(),
            atmosphere_maximum: result
                .max_atmosphere_temperature()
                .unwrap_or(FloatValue::NAN),
        }
    }

    /// Report lines without trailing newlines
    pub fn lines(&self, style: SummaryStyle) -> Vec<String> {
        match style {
            SummaryStyle::Legacy => vec![
                line("Earth maximum temperature", self.earth_maximum),
                line("Atmosphere maximum temperature", self.atmosphere_final),
            ],
            SummaryStyle::Corrected => vec![
                line("Earth maximum temperature", self.earth_maximum),
                line("Atmosphere final temperature", self.atmosphere_final),
                line("Atmosphere maximum temperature", self.atmosphere_maximum),
            ],
        }
    }
}

fn line(label: &str, value: FloatValue) -> String {
    format!("{} {:.3} K", label, value)
}

/// Consumer of the end-of-run scalars
pub trait SummarySink {
    fn emit(&mut self, summary: &Summary) -> GraySlabResult<()>;
}

/// Writes the summary as plain text lines
pub struct TextSummary<W: Write> {
    writer: W,
    style: SummaryStyle,
}

impl<W: Write> TextSummary<W> {
    pub fn new(writer: W, style: SummaryStyle) -> Self {
        Self { writer, style }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SummarySink for TextSummary<W> {
    fn emit(&mut self, summary: &Summary) -> GraySlabResult<()> {
        for line in summary.lines(self.style) {
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        Summary {
            earth_maximum: 286.6393480780303,
            atmosphere_final: 241.03395795260897,
            atmosphere_maximum: 241.5,
        }
    }

    #[test]
    fn legacy_lines() {
        assert_eq!(
            summary().lines(SummaryStyle::Legacy),
            vec![
                "Earth maximum temperature 286.639 K",
                "Atmosphere maximum temperature 241.034 K",
            ]
        );
    }

    #[test]
    fn corrected_lines() {
        assert_eq!(
            summary().lines(SummaryStyle::Corrected),
            vec![
                "Earth maximum temperature 286.639 K",
                "Atmosphere final temperature 241.034 K",
                "Atmosphere maximum temperature 241.500 K",
            ]
        );
    }

    #[test]
    fn text_sink_writes_lines() {
        let mut sink = TextSummary::new(Vec::new(), SummaryStyle::Legacy);
        sink.emit(&summary()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "Earth maximum temperature 286.639 K\nAtmosphere maximum temperature 241.034 K\n"
        );
    }

    #[test]
    fn nan_is_printed() {
        let summary = Summary {
            earth_maximum: f64::NAN,
            atmosphere_final: f64::NAN,
            atmosphere_maximum: f64::NAN,
        };
        assert_eq!(
            summary.lines(SummaryStyle::Legacy)[0],
            "Earth maximum temperature NaN K"
        );
    }

    #[test]
    fn parse_style() {
        assert_eq!("legacy".parse::<SummaryStyle>(), Ok(SummaryStyle::Legacy));
        assert_eq!(
            "Corrected".parse::<SummaryStyle>(),
            Ok(SummaryStyle::Corrected)
        );
        assert!("maximum".parse::<SummaryStyle>().is_err());
        assert_eq!(SummaryStyle::Corrected.to_string(), "corrected");
    }
}
