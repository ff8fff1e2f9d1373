//! Клиентская библиотека для чтения блога из headless CMS.
//!
//! Предоставляет:
//! - `CmsClient`: HTTP-доступ к API контента (`reqwest`): первая страница
//!   списка постов, пост по `uid`, переход по continuation-токену;
//! - `PostFeed`: накопитель страниц списка для «загрузить ещё»;
//! - подсчёт времени чтения и подготовку данных к отображению.
//!
//! Клиент работает с источником только на чтение. Все модели после
//! конструирования неизменяемы; докачка списка порождает новое состояние,
//! а не правит загруженные страницы.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;
mod pagination;
mod reading_time;
mod render;

pub use error::{CmsError, CmsResult};
pub use http_client::CmsClient;
pub use models::{PageResult, PostDetail, PostSummary, Section, TextBlock};
pub use pagination::{FeedEvent, PageFetcher, PostFeed};
pub use reading_time::{WORDS_PER_MINUTE, estimate_minutes};
pub use render::{as_html, format_publication_date, format_reading_time, plain_text};
