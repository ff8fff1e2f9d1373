//! Накопление страниц списка постов («загрузить ещё»).
//!
//! Состояние списка вынесено в явную структуру `PostFeed`; единственное
//! изменяющее событие применяется чистой функцией `apply`, поэтому логика
//! докачки проверяется без UI и без сети. Сам запрос следующей страницы
//! выполняет `load_more` через абстракцию `PageFetcher`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::CmsResult;
use crate::models::{PageResult, PostSummary};

#[async_trait]
/// Источник страниц по continuation-токену.
pub trait PageFetcher: Send + Sync {
    /// Загружает страницу по токену `next_page` и разбирает её в [`PageResult`].
    async fn fetch_page(&self, next_page: &str) -> CmsResult<PageResult>;
}

#[derive(Debug, Clone, PartialEq)]
/// Событие, изменяющее состояние списка.
pub enum FeedEvent {
    /// Успешно загружена и разобрана очередная страница.
    PageLoaded(PageResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Состояние списка постов с постраничной докачкой.
pub struct PostFeed {
    posts: Vec<PostSummary>,
    next_page: Option<String>,
}

impl PostFeed {
    /// Создаёт состояние из первой загруженной страницы выдачи.
    pub fn new(initial: PageResult) -> Self {
        Self {
            posts: initial.results,
            next_page: initial.next_page,
        }
    }

    /// Накопленные посты в порядке добавления.
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    /// Текущий continuation-токен, если источник сообщил о следующей странице.
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// `true`, пока у источника остаются незагруженные посты.
    ///
    /// Когда возвращает `false`, элемент «загрузить ещё» следует скрывать,
    /// а не показывать отключённым.
    pub fn can_load_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Чистый переход состояния: `(состояние, событие) -> состояние`.
    ///
    /// Посты загруженной страницы дописываются в конец без переупорядочивания
    /// и без дедупликации: повтор, выданный источником, дописывается ещё раз.
    /// Continuation-токен заменяется токеном загруженной страницы, в том
    /// числе отсутствующим.
    pub fn apply(mut self, event: FeedEvent) -> Self {
        match event {
            FeedEvent::PageLoaded(page) => {
                self.posts.extend(page.results);
                self.next_page = page.next_page;
                self
            }
        }
    }

    /// Загружает следующую страницу и дописывает её посты в состояние.
    ///
    /// Выполняет ровно один запрос, без автоматических повторов. При ошибке
    /// загрузки или разбора состояние остаётся прежним, а ошибка возвращается
    /// вызывающему для показа уведомления; уже показанные посты при этом не
    /// теряются. Без continuation-токена запрос не выполняется, результат
    /// `Ok(0)`.
    ///
    /// `&mut self` исключает две одновременные загрузки на одно состояние,
    /// так что дописывания не перемешиваются.
    pub async fn load_more<F>(&mut self, fetcher: &F) -> CmsResult<usize>
    where
        F: PageFetcher + ?Sized,
    {
        let Some(next_page) = self.next_page.clone() else {
            return Ok(0);
        };

        let page = fetcher.fetch_page(&next_page).await?;
        let appended = page.results.len();
        debug!(appended, has_next = page.next_page.is_some(), "next page loaded");

        let current = std::mem::replace(
            self,
            Self {
                posts: Vec::new(),
                next_page: None,
            },
        );
        *self = current.apply(FeedEvent::PageLoaded(page));
        Ok(appended)
    }
}
