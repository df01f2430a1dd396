//! User-facing texts for recoverable failures.

use ledger_view::{DraftError, ExportError, RecordError};

use crate::client::ClientError;

pub fn client_message(err: &ClientError) -> String {
    match err {
        ClientError::Transport(err) => format!("Сервер недоступен: {err}"),
        ClientError::NotFound => "Запись не найдена.".to_string(),
        ClientError::BadRequest(message) => format!("Некорректный запрос: {message}"),
        ClientError::Server { status, message } => {
            format!("Ошибка сервера ({status}): {message}")
        }
        ClientError::Decode(message) => format!("Некорректный ответ сервера: {message}"),
    }
}

pub fn draft_message(err: &DraftError) -> String {
    match err {
        DraftError::MissingKind => "Укажите тип операции.".to_string(),
        DraftError::UnknownKind(kind) => format!("Неизвестный тип операции: {kind}"),
        DraftError::MissingAmount => "Укажите сумму.".to_string(),
        DraftError::InvalidAmount(amount) => format!("Некорректная сумма: {amount}"),
        DraftError::NonPositiveAmount => "Сумма должна быть больше нуля.".to_string(),
        DraftError::MissingDate => "Укажите дату.".to_string(),
        DraftError::InvalidDate(date) => {
            format!("Некорректная дата: {date} (ожидается ГГГГ-ММ-ДД ЧЧ:ММ)")
        }
        DraftError::InvalidRange => "Дата начала позже даты окончания.".to_string(),
    }
}

pub fn export_message(err: &ExportError) -> String {
    match err {
        ExportError::Empty => "Нет данных для экспорта.".to_string(),
        ExportError::Csv(err) => format!("Ошибка формирования CSV: {err}"),
        ExportError::Io(err) => format!("Ошибка записи файла: {err}"),
    }
}

pub fn skipped_message(errors: &[RecordError]) -> String {
    format!("Пропущено некорректных записей: {}", errors.len())
}
