use crate::core::{AuditReport, Severity};
use colored::*;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()>;
}

/// The serialized document is the engine's stable interface: UTF-8, with
/// `hallazgos` and `resumen` blocks, byte-identical across identical runs.
pub struct YamlWriter<W: Write> {
    writer: W,
}

impl<W: Write> YamlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for YamlWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(report)?;
        self.writer.write_all(yaml.as_bytes())?;
        Ok(())
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Human-oriented summary for interactive runs.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn severity_label(severity: Severity) -> ColoredString {
        match severity {
            Severity::Alto => "ALTO ".red().bold(),
            Severity::Medio => "MEDIO".yellow(),
            Severity::Bajo => "BAJO ".normal(),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        for finding in &report.findings {
            let mark = if finding.justified { " (justificado)" } else { "" };
            writeln!(
                self.writer,
                "{} {}:{} [{}] {} - {}{}",
                Self::severity_label(finding.severity),
                finding.file,
                finding.line,
                finding.category,
                finding.rule,
                finding.detail,
                mark,
            )?;
        }

        let s = &report.summary;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "hallazgos: {} (ALTO {}, MEDIO {}, BAJO {}; ALTO sin justificar {})",
            s.total, s.alto, s.medio, s.bajo, s.alto_unjustified
        )?;
        writeln!(self.writer, "riesgo global: {:.2} / 10.00", s.risk)?;
        Ok(())
    }
}

pub fn write_report_to<W: Write>(
    format: OutputFormat,
    report: &AuditReport,
    writer: W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Yaml => YamlWriter::new(writer).write_report(report),
        OutputFormat::Json => JsonWriter::new(writer).write_report(report),
        OutputFormat::Terminal => TerminalWriter::new(writer).write_report(report),
    }
}

/// Render the serialized document into memory, so callers writing to a
/// file can surface every I/O error instead of losing flush failures.
pub fn render_report(format: OutputFormat, report: &AuditReport) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_report_to(format, report, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, Finding, Summary};

    fn sample_report() -> AuditReport {
        let findings = vec![Finding::new(
            Severity::Alto,
            Category::Coupling,
            "Import prohibido aplicacion->infraestructura",
            "aplicacion/servicio.py",
            2,
            "from infraestructura.db import Conn",
        )];
        AuditReport {
            summary: Summary {
                total: findings.len(),
                alto: 1,
                medio: 0,
                bajo: 0,
                alto_unjustified: 1,
                risk: 8.5,
            },
            findings,
        }
    }

    #[test]
    fn yaml_document_uses_stable_field_names() {
        let mut buffer = Vec::new();
        YamlWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("hallazgos:"));
        assert!(text.contains("resumen:"));
        assert!(text.contains("severidad: ALTO"));
        assert!(text.contains("linea: 2"));
        assert!(text.contains("riesgo_global: 8.5"));
    }

    #[test]
    fn json_document_round_trips() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let parsed: AuditReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.summary.alto_unjustified, 1);
        assert_eq!(parsed.findings[0].line, 2);
    }
}
