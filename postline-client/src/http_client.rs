use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{CmsError, CmsResult};
use crate::models::{PageResult, PostDetail, PostSummary, Section, TextBlock};
use crate::pagination::PageFetcher;

/// Тип документа блога в репозитории контента.
const DOCUMENT_TYPE: &str = "post";
/// Поля, запрашиваемые для краткой формы поста в списке.
const SUMMARY_FETCH_FIELDS: &str = "post.title,post.subtitle,post.author";

#[derive(Debug, Deserialize)]
struct PageResponseDto {
    results: Vec<SummaryDto>,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryDto {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    first_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    data: SummaryDataDto,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDataDto {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponseDto {
    results: Vec<DetailDto>,
}

#[derive(Debug, Deserialize)]
struct DetailDto {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    first_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    data: DetailDataDto,
}

#[derive(Debug, Default, Deserialize)]
struct DetailDataDto {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    banner: Option<BannerDto>,
    #[serde(default)]
    content: Vec<SectionDto>,
}

#[derive(Debug, Deserialize)]
struct BannerDto {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SectionDto {
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    body: Vec<TextBlockDto>,
}

#[derive(Debug, Deserialize)]
struct TextBlockDto {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn map_page(dto: PageResponseDto) -> PageResult {
    let results = dto.results.into_iter().filter_map(map_summary).collect();
    PageResult {
        results,
        next_page: dto.next_page,
    }
}

fn map_summary(dto: SummaryDto) -> Option<PostSummary> {
    // Документ без uid нельзя ни отрисовать в списке, ни открыть по маршруту;
    // такой элемент отбрасывается, остальная страница остаётся валидной.
    let uid = match dto.uid {
        Some(uid) if !uid.is_empty() => uid,
        _ => {
            warn!("document without uid dropped from the feed");
            return None;
        }
    };

    Some(PostSummary {
        uid,
        first_publication_date: dto.first_publication_date,
        title: dto.data.title.unwrap_or_default(),
        subtitle: dto.data.subtitle.unwrap_or_default(),
        author: dto.data.author.unwrap_or_default(),
    })
}

fn map_detail(dto: DetailDto) -> CmsResult<PostDetail> {
    let uid = match dto.uid {
        Some(uid) if !uid.is_empty() => uid,
        _ => return Err(CmsError::Malformed("document without uid".to_string())),
    };

    let content = dto
        .data
        .content
        .into_iter()
        .map(|section| Section {
            heading: section.heading.unwrap_or_default(),
            body: section
                .body
                .into_iter()
                .map(|block| TextBlock {
                    text: block.text.unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    Ok(PostDetail {
        uid,
        first_publication_date: dto.first_publication_date,
        title: dto.data.title.unwrap_or_default(),
        author: dto.data.author.unwrap_or_default(),
        banner_url: dto
            .data
            .banner
            .and_then(|banner| banner.url)
            .unwrap_or_default(),
        content,
    })
}

#[derive(Debug, Clone)]
/// HTTP-клиент Content Source API (headless CMS), только чтение.
pub struct CmsClient {
    base_url: String,
    access_token: Option<String>,
    client: Client,
}

impl CmsClient {
    /// Создаёт клиент с базовым URL API контента.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            access_token: None,
            client,
        }
    }

    /// Задаёт access token репозитория; передаётся query-параметром.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> CmsError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.message.or(body.error),
            Err(_) => None,
        };
        CmsError::from_http_status(status, message)
    }

    /// универсальный helper: GET с query-параметрами и разбором JSON-тела
    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> CmsResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(CmsError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let body = response.text().await.map_err(CmsError::from_reqwest)?;
        serde_json::from_str(&body).map_err(|err| CmsError::Malformed(err.to_string()))
    }

    fn with_token(&self, mut query: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(token) = &self.access_token {
            query.push(("access_token", token.clone()));
        }
        query
    }

    /// Возвращает первую страницу списка постов (краткие поля) вместе с
    /// continuation-токеном следующей страницы, если она есть.
    pub async fn query_posts(&self, page_size: u32) -> CmsResult<PageResult> {
        let url = self.endpoint("/documents/search");
        let query = self.with_token(vec![
            ("q", format!(r#"[[at(document.type,"{DOCUMENT_TYPE}")]]"#)),
            ("fetch", SUMMARY_FETCH_FIELDS.to_string()),
            ("pageSize", page_size.to_string()),
        ]);

        debug!(page_size, "query posts");
        let dto: PageResponseDto = self.get_json(&url, &query).await?;
        Ok(map_page(dto))
    }

    /// Загружает пост целиком по уникальному идентификатору.
    ///
    /// Пустая выдача означает отсутствие документа: [`CmsError::NotFound`].
    pub async fn get_by_uid(&self, uid: &str) -> CmsResult<PostDetail> {
        let url = self.endpoint("/documents/search");
        let query = self.with_token(vec![
            ("q", format!(r#"[[at(my.{DOCUMENT_TYPE}.uid,"{uid}")]]"#)),
            ("pageSize", "1".to_string()),
        ]);

        debug!(uid, "get post by uid");
        let dto: DetailResponseDto = self.get_json(&url, &query).await?;
        let Some(first) = dto.results.into_iter().next() else {
            return Err(CmsError::NotFound);
        };
        map_detail(first)
    }

    /// Загружает страницу списка по continuation-токену.
    ///
    /// Токен используется как готовый URL, без разбора и модификации.
    pub async fn fetch_page(&self, next_page: &str) -> CmsResult<PageResult> {
        debug!("fetch continuation page");
        let dto: PageResponseDto = self.get_json(next_page, &[]).await?;
        Ok(map_page(dto))
    }
}

#[async_trait]
impl PageFetcher for CmsClient {
    async fn fetch_page(&self, next_page: &str) -> CmsResult<PageResult> {
        CmsClient::fetch_page(self, next_page).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = CmsClient::new("https://repo.example.com/api/v2/");
        let full = client.endpoint("/documents/search");
        assert_eq!(full, "https://repo.example.com/api/v2/documents/search");
    }

    #[test]
    fn page_response_maps_items_in_order() {
        let dto: PageResponseDto = serde_json::from_value(json!({
            "results": [
                {
                    "uid": "first-post",
                    "first_publication_date": "2021-03-15T19:25:28Z",
                    "data": {
                        "title": "First",
                        "subtitle": "About the first",
                        "author": "Ana"
                    }
                },
                {
                    "uid": "second-post",
                    "first_publication_date": null,
                    "data": { "title": "Second" }
                }
            ],
            "next_page": "https://api/example?page=2"
        }))
        .expect("valid payload");

        let page = map_page(dto);

        assert_eq!(page.next_page.as_deref(), Some("https://api/example?page=2"));
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].uid, "first-post");
        assert_eq!(
            page.results[0].first_publication_date,
            Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).single()
        );
        assert_eq!(page.results[0].subtitle, "About the first");
        // Необязательные поля берутся пустыми, отсутствие даты остаётся None.
        assert_eq!(page.results[1].first_publication_date, None);
        assert_eq!(page.results[1].subtitle, "");
        assert_eq!(page.results[1].author, "");
    }

    #[test]
    fn items_without_uid_are_dropped() {
        let dto: PageResponseDto = serde_json::from_value(json!({
            "results": [
                { "uid": "kept", "data": {} },
                { "data": { "title": "no uid" } },
                { "uid": "", "data": { "title": "blank uid" } }
            ],
            "next_page": null
        }))
        .expect("valid payload");

        let page = map_page(dto);

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid, "kept");
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn detail_maps_banner_and_content() {
        let dto: DetailDto = serde_json::from_value(json!({
            "uid": "trip-to-mars",
            "first_publication_date": "2021-01-02T10:00:00Z",
            "data": {
                "title": "Trip to Mars",
                "author": "Ana",
                "banner": { "url": "https://images.example.com/mars.png" },
                "content": [
                    {
                        "heading": "Departure",
                        "body": [
                            { "text": "First paragraph." },
                            { "text": "Second paragraph." }
                        ]
                    },
                    {
                        "heading": "Arrival",
                        "body": []
                    }
                ]
            }
        }))
        .expect("valid payload");

        let detail = map_detail(dto).expect("detail must map");

        assert_eq!(detail.uid, "trip-to-mars");
        assert_eq!(detail.banner_url, "https://images.example.com/mars.png");
        assert_eq!(detail.content.len(), 2);
        assert_eq!(detail.content[0].heading, "Departure");
        assert_eq!(detail.content[0].body.len(), 2);
        assert_eq!(detail.content[0].body[1].text, "Second paragraph.");
        assert_eq!(detail.content[1].body.len(), 0);
    }

    #[test]
    fn detail_without_banner_renders_empty_url() {
        let dto: DetailDto = serde_json::from_value(json!({
            "uid": "no-banner",
            "data": { "title": "No banner" }
        }))
        .expect("valid payload");

        let detail = map_detail(dto).expect("detail must map");

        assert_eq!(detail.banner_url, "");
        assert_eq!(detail.content.len(), 0);
        assert_eq!(detail.first_publication_date, None);
    }

    #[test]
    fn detail_without_uid_is_malformed() {
        let dto: DetailDto = serde_json::from_value(json!({
            "data": { "title": "orphan" }
        }))
        .expect("valid payload");

        let result = map_detail(dto);
        assert!(matches!(result, Err(CmsError::Malformed(_))));
    }
}
