use anyhow::Result;
use colored::Colorize;
use skribbl_engine::FrequencyReport;
use std::io::Write;

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &FrequencyReport,
    top: usize,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Word Encounter Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=========================".cyan())?;
    writeln!(writer, "Total encounters: {}", report.total_word_encounters)?;
    writeln!(writer, "Unique words: {}", report.unique_words)?;
    writeln!(
        writer,
        "Average frequency: {:.2}",
        report.average_frequency()
    )?;
    writeln!(writer)?;

    if top > 0 {
        writeln!(writer, "{}", format!("🔝 Top {top} words").bright_yellow().bold())?;
        for (rank, entry) in report.top(top).iter().enumerate() {
            writeln!(
                writer,
                "{:>4}. {:<24} {}",
                rank + 1,
                entry.word.green(),
                entry.frequency
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, report: &FrequencyReport) -> Result<()> {
    report.write_json(&mut *writer)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &FrequencyReport,
    top: usize,
) -> Result<()> {
    writeln!(writer, "# Word Encounter Report\n")?;
    writeln!(writer, "| Metric | Value |")?;
    writeln!(writer, "|--------|-------|")?;
    writeln!(writer, "| Total encounters | {} |", report.total_word_encounters)?;
    writeln!(writer, "| Unique words | {} |", report.unique_words)?;
    writeln!(
        writer,
        "| Average frequency | {:.2} |",
        report.average_frequency()
    )?;

    if top > 0 {
        writeln!(writer, "\n## Most frequent\n")?;
        writeln!(writer, "| Rank | Word | Frequency |")?;
        writeln!(writer, "|------|------|-----------|")?;
        for (rank, entry) in report.top(top).iter().enumerate() {
            writeln!(writer, "| {} | {} | {} |", rank + 1, entry.word, entry.frequency)?;
        }
    }
    Ok(())
}
