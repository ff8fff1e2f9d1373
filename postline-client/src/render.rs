//! Подготовка данных поста к отображению.

use chrono::{DateTime, Locale, Utc};

use crate::models::TextBlock;

/// Заглушка даты у ещё не опубликованного документа.
const UNPUBLISHED_DATE: &str = "—";

/// Дата публикации для отображения: день с ведущим нулём, сокращённый месяц
/// по бразильской локали, четырёхзначный год, например `02 jan 2021`.
///
/// Для `None` (документ ещё не опубликован) возвращает заглушку; попытки
/// форматировать отсутствующую дату не происходит.
pub fn format_publication_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(date) => date
            .format_localized("%d %b %Y", Locale::pt_BR)
            .to_string(),
        None => UNPUBLISHED_DATE.to_string(),
    }
}

/// Строка времени чтения для отображения: `5 min`.
pub fn format_reading_time(minutes: u64) -> String {
    format!("{minutes} min")
}

/// Склеивает текстовые блоки в обычный текст для терминала.
///
/// Пустые блоки пропускаются, остальные разделяются пустой строкой.
pub fn plain_text(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .filter(|block| !block.text.is_empty())
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Склеивает текстовые блоки в HTML: каждый непустой блок превращается в
/// экранированный параграф `<p>…</p>`.
pub fn as_html(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .filter(|block| !block.text.is_empty())
        .map(|block| format!("<p>{}</p>", escape_html(&block.text)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
