//! CSV exports of the working set, the analytics details and the period report.
//!
//! Files are UTF-8 with a byte order mark so spreadsheet software picks the
//! right encoding for the Cyrillic headers.

use api_types::analytics::{Aggregate, Analytics};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;

use crate::{DateRange, ExportError, Record, analytics::format_major};

const BOM: &[u8] = b"\xEF\xBB\xBF";
const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Records,
    Analytics,
    Report,
}

const RECORD_HEADER: [&str; 6] = ["ID", "Тип", "Сумма", "Дата", "Категория", "Описание"];

#[derive(Serialize)]
struct DetailRow<'a> {
    #[serde(rename = "Дата")]
    date: String,
    #[serde(rename = "Тип")]
    kind: &'a str,
    #[serde(rename = "Сумма")]
    amount: String,
    #[serde(rename = "Категория")]
    category: &'a str,
}

/// `ID,Тип,Сумма,Дата,Категория,Описание` rows for `records`, in order.
///
/// The header is written bare; every data field is quoted, so a description
/// is always enclosed in quotes with inner quotes doubled.
pub fn records_csv(records: &[Record], tz: Tz) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut header = writer(false);
    header.write_record(RECORD_HEADER)?;
    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(finish(header)?);
    for record in records {
        rows.write_record([
            record.id.to_string(),
            record.kind.label().to_string(),
            record.amount.plain(),
            format_date(record.timestamp, tz),
            record.category.clone().unwrap_or_default(),
            record.note.clone().unwrap_or_default(),
        ])?;
    }
    finish(rows)
}

/// `Дата,Тип,Сумма,Категория` rows of the analytics detail table.
pub fn analytics_csv(details: &[Record], tz: Tz) -> Result<Vec<u8>, ExportError> {
    if details.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = writer(false);
    for record in details {
        writer.serialize(DetailRow {
            date: format_date(record.timestamp, tz),
            kind: record.kind.label(),
            amount: record.amount.plain(),
            category: record.category.as_deref().unwrap_or(""),
        })?;
    }
    finish(writer)
}

/// Period report: header block, income and expense aggregates, then every
/// operation with its server timestamps.
///
/// When the server only sends the flat aggregate, it is reported as a single
/// block.
pub fn report_csv(
    analytics: &Analytics,
    details: &[Record],
    range: DateRange,
    tz: Tz,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = writer(true);

    writer.write_record(["ОТЧЁТ"])?;
    writer.write_record([format!(
        "Период: {} - {}",
        format_date(range.from, tz),
        format_date(range.to, tz)
    )])?;
    writer.write_record([""])?;

    match (analytics.income, analytics.expense) {
        (None, None) => write_aggregate(&mut writer, "АНАЛИТИКА", analytics.totals())?,
        (income, expense) => {
            write_aggregate(&mut writer, "АНАЛИТИКА ДОХОДОВ", income.unwrap_or_default())?;
            write_aggregate(&mut writer, "АНАЛИТИКА РАСХОДОВ", expense.unwrap_or_default())?;
        }
    }

    writer.write_record(["ОПЕРАЦИИ"])?;
    writer.write_record([
        "ID",
        "Тип",
        "Сумма",
        "Дата",
        "Категория",
        "Описание",
        "Создано",
        "Обновлено",
    ])?;
    for record in details {
        writer.write_record([
            record.id.to_string(),
            record.kind.label().to_string(),
            record.amount.plain(),
            format_date(record.timestamp, tz),
            record.category.clone().unwrap_or_default(),
            record.note.clone().unwrap_or_default(),
            record.created_at.map(|at| format_date(at, tz)).unwrap_or_default(),
            record.updated_at.map(|at| format_date(at, tz)).unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

/// Download name of an export made on `today`.
pub fn file_name(kind: ExportKind, today: NaiveDate, range: Option<(NaiveDate, NaiveDate)>) -> String {
    match (kind, range) {
        (ExportKind::Report, Some((from, to))) => format!("ledger_report_{from}_{to}.csv"),
        (ExportKind::Report, None) => format!("ledger_report_{today}.csv"),
        (ExportKind::Analytics, _) => format!("analytics_export_{today}.csv"),
        (ExportKind::Records, _) => format!("ledger_export_{today}.csv"),
    }
}

fn write_aggregate(
    writer: &mut Writer<Vec<u8>>,
    title: &str,
    aggregate: Aggregate,
) -> Result<(), ExportError> {
    writer.write_record([title])?;
    writer.write_record(["Сумма", "Среднее", "Количество", "Медиана", "90-й перцентиль"])?;
    writer.write_record([
        format_major(aggregate.sum),
        format_major(aggregate.avg),
        aggregate.count.to_string(),
        format_major(aggregate.median),
        format_major(aggregate.percent90),
    ])?;
    writer.write_record([""])?;
    Ok(())
}

fn writer(flexible: bool) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .flexible(flexible)
        .from_writer(BOM.to_vec())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

fn format_date(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format(DATE_FORMAT).to_string()
}
