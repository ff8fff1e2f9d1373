//! Оценка времени чтения поста.

use crate::models::Section;

/// Скорость чтения, слов в минуту.
pub const WORDS_PER_MINUTE: u64 = 200;

/// Оценка времени чтения в целых минутах, с округлением вверх.
///
/// Суммирует слова заголовков секций и всех текстовых блоков тела, затем
/// делит на [`WORDS_PER_MINUTE`]. Документ без слов даёт 0 минут, а не 1.
pub fn estimate_minutes(content: &[Section]) -> u64 {
    let total: u64 = content
        .iter()
        .map(|section| {
            let heading = count_words(&section.heading);
            let body: u64 = section
                .body
                .iter()
                .map(|block| count_words(&block.text))
                .sum();
            heading + body
        })
        .sum();

    total.div_ceil(WORDS_PER_MINUTE)
}

/// Слово: максимальная последовательность непробельных символов при разбиении
/// по одиночным пробелам. Пустые токены словами не считаются, поэтому пустая
/// строка и повторные пробелы дают 0 слов.
fn count_words(text: &str) -> u64 {
    text.split(' ').filter(|token| !token.is_empty()).count() as u64
}
