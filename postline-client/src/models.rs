use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост в списке (краткая форма).
pub struct PostSummary {
    /// Уникальный идентификатор документа; ключ маршрута `/post/{uid}`.
    ///
    /// У сконструированного значения всегда непустой: документы без `uid`
    /// отбрасываются на границе разбора ответа.
    pub uid: String,
    /// Дата первой публикации (UTC). `None` у ещё не опубликованного
    /// документа; это штатное состояние, а не ошибка.
    pub first_publication_date: Option<DateTime<Utc>>,
    /// Заголовок.
    pub title: String,
    /// Подзаголовок.
    pub subtitle: String,
    /// Автор.
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост целиком (страница просмотра).
pub struct PostDetail {
    /// Уникальный идентификатор документа.
    pub uid: String,
    /// Дата первой публикации (UTC). `None` у ещё не опубликованного
    /// документа.
    pub first_publication_date: Option<DateTime<Utc>>,
    /// Заголовок.
    pub title: String,
    /// Автор.
    pub author: String,
    /// URL баннера. Пустая строка означает, что баннера нет.
    pub banner_url: String,
    /// Секции поста в авторском порядке.
    pub content: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Секция поста: подзаголовок и текстовые блоки.
pub struct Section {
    /// Заголовок секции. Может быть пустым.
    pub heading: String,
    /// Текстовые блоки тела секции в авторском порядке.
    pub body: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Фрагмент форматированного текста, уже выделенный источником в отдельную
/// строку. Дополнительный разбор разметки внутри строки не выполняется.
pub struct TextBlock {
    /// Текст фрагмента.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Одна страница списка постов.
pub struct PageResult {
    /// Посты страницы в порядке, выданном источником.
    pub results: Vec<PostSummary>,
    /// Continuation-токен следующей страницы. `None` означает, что постов
    /// у источника больше нет.
    ///
    /// Токен непрозрачен: клиент никогда не разбирает его и не собирает сам,
    /// а только выполняет по нему готовый GET-запрос.
    pub next_page: Option<String>,
}
